// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::open_ledger;
use crate::db::save_ledger;
use crate::ledger::{Ledger, LedgerSource};
use crate::models::{CategoryName, TransactionType};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .unwrap()
                .parse::<CategoryName>()
                .map_err(|e| anyhow!(e))?;
            let ty = sub
                .get_one::<String>("type")
                .unwrap()
                .parse::<TransactionType>()
                .map_err(|e| anyhow!(e))?;
            let id = sub.get_one::<i64>("id").copied().unwrap_or(0);
            let (mut ledger, _) = open_ledger(conn)?;
            let category = ledger.add_category(id, name, ty)?;
            save_ledger(conn, &ledger)?;
            println!(
                "Added category #{} '{}' ({})",
                category.id, category.name, category.r#type
            );
        }
        Some(("list", sub)) => {
            let (ledger, _) = open_ledger(conn)?;
            let categories = ledger.all_categories();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let rows = categories
                    .iter()
                    .map(|c| vec![c.id.to_string(), c.name.to_string(), c.r#type.to_string()])
                    .collect();
                println!("{}", pretty_table(&["Id", "Category", "Type"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Registers the nine built-in categories on an empty ledger. Transfers
/// count as income, everything else as expense. Returns how many were added.
pub fn seed_defaults(ledger: &mut Ledger) -> Result<usize> {
    if !ledger.categories().is_empty() {
        return Ok(0);
    }
    for name in CategoryName::ALL {
        let ty = match name {
            CategoryName::Transfers => TransactionType::Income,
            _ => TransactionType::Expense,
        };
        ledger.add_category(name.code(), name, ty)?;
    }
    Ok(CategoryName::ALL.len())
}
