// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::open_ledger;
use crate::db::save_ledger;
use crate::error::LedgerError;
use crate::ledger::{Ledger, LedgerSource};
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::utils::{
    fmt_amount, maybe_print_json, parse_date, parse_datetime, parse_decimal, pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<TransactionType> {
    s.parse::<TransactionType>().map_err(|e| anyhow!(e))
}

pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let category_id = *sub.get_one::<i64>("category").unwrap();
    let ty = parse_type(sub.get_one::<String>("type").unwrap())?;
    let mut draft = NewTransaction::new(amount, description.as_str(), category_id, ty);
    if let Some(d) = sub.get_one::<String>("date") {
        draft = draft.on(parse_datetime(d)?);
    }
    if let Some(id) = sub.get_one::<i64>("id") {
        draft = draft.with_id(*id);
    }
    Ok(draft)
}

/// Builds the replacement value for `tx update`: given flags win, the rest
/// is copied from the stored record.
pub fn replacement_from_args(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Transaction> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = ledger
        .transaction(id)
        .ok_or_else(|| LedgerError::transaction_not_found(id))?;
    Ok(Transaction {
        id,
        amount: match sub.get_one::<String>("amount") {
            Some(s) => parse_decimal(s)?,
            None => current.amount,
        },
        date: match sub.get_one::<String>("date") {
            Some(s) => parse_datetime(s)?,
            None => current.date,
        },
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_else(|| current.description.clone()),
        category_id: sub
            .get_one::<i64>("category")
            .copied()
            .unwrap_or(current.category_id),
        r#type: match sub.get_one::<String>("type") {
            Some(s) => parse_type(s)?,
            None => current.r#type,
        },
    })
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    let (mut ledger, _) = open_ledger(conn)?;
    let tx = ledger.add_transaction(draft)?;
    save_ledger(conn, &ledger)?;
    println!(
        "Recorded #{} {} {} on {} '{}'",
        tx.id,
        tx.r#type,
        fmt_amount(&tx.amount),
        tx.date.format("%Y-%m-%d %H:%M"),
        tx.description
    );
    Ok(())
}

fn update(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (mut ledger, _) = open_ledger(conn)?;
    let replacement = replacement_from_args(&ledger, sub)?;
    let tx = ledger.update_transaction(replacement)?;
    save_ledger(conn, &ledger)?;
    println!("Updated #{}", tx.id);
    Ok(())
}

fn remove(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let (mut ledger, _) = open_ledger(conn)?;
    match ledger.delete_by_id(id) {
        Some(tx) => {
            save_ledger(conn, &ledger)?;
            println!("Removed #{} '{}'", tx.id, tx.description);
        }
        None => println!("No transaction #{}; nothing removed", id),
    }
    Ok(())
}

fn list(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (ledger, _) = open_ledger(conn)?;
    let data = query_rows(&ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

/// Transactions matching `--from`/`--to`, newest first, capped by `--limit`.
pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = ledger
        .query_transactions(from, to)
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            category: ledger
                .category_by_id(t.category_id)
                .map(|c| c.name.to_string())
                .unwrap_or_else(|_| format!("(unknown #{})", t.category_id)),
            description: t.description,
        })
        .collect();
    Ok(data)
}
