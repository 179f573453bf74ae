// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ledger::Ledger;
use crate::models::{Category, CategoryName, Transaction, TransactionType};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Finorg", "finorg"));

pub const DB_ENV: &str = "FINORG_DB";

/// Resolves the database file: explicit path, then `FINORG_DB`, then the
/// platform data directory.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    if let Some(p) = std::env::var_os(DB_ENV) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finorg.sqlite"))
}

pub fn open_or_init(explicit: Option<&Path>) -> Result<Connection> {
    let path = db_path(explicit)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        seq INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    "#,
    )?;
    Ok(())
}

fn parse_type(s: &str) -> Result<TransactionType> {
    s.parse::<TransactionType>().map_err(|e| anyhow!(e))
}

/// Reads the stored ledger into memory. Transactions come back in the
/// order they were saved, not in id order.
pub fn load_ledger(conn: &Connection) -> Result<Ledger> {
    let mut stmt = conn.prepare("SELECT id, name, type FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut categories = Vec::new();
    for row in rows {
        let (id, name, ty) = row?;
        let name = name
            .parse::<CategoryName>()
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Category {} has an invalid name", id))?;
        categories.push(Category {
            id,
            name,
            r#type: parse_type(&ty)?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, date, amount, description, category_id, type FROM transactions ORDER BY seq",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, NaiveDateTime>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;
    let mut transactions = Vec::new();
    for row in rows {
        let (id, date, amount_s, description, category_id, ty) = row?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in transaction {}", amount_s, id))?;
        transactions.push(Transaction {
            id,
            amount,
            date,
            description,
            category_id,
            r#type: parse_type(&ty)?,
        });
    }

    info!(
        categories = categories.len(),
        transactions = transactions.len(),
        "ledger loaded"
    );
    Ok(Ledger::from_parts(categories, transactions))
}

/// Replaces the stored ledger with `ledger` in one SQL transaction.
pub fn save_ledger(conn: &mut Connection, ledger: &Ledger) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM transactions", [])?;
    tx.execute("DELETE FROM categories", [])?;
    {
        let mut cat_stmt =
            tx.prepare("INSERT INTO categories(id, name, type) VALUES (?1, ?2, ?3)")?;
        for c in ledger.categories() {
            cat_stmt.execute(params![c.id, c.name.key(), c.r#type.as_str()])?;
        }
        let mut tx_stmt = tx.prepare(
            "INSERT INTO transactions(id, seq, date, amount, description, category_id, type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (seq, t) in ledger.transactions().iter().enumerate() {
            tx_stmt.execute(params![
                t.id,
                seq as i64,
                t.date,
                t.amount.to_string(),
                t.description,
                t.category_id,
                t.r#type.as_str()
            ])?;
        }
    }
    tx.commit().context("Failed to save ledger")?;
    info!(
        categories = ledger.categories().len(),
        transactions = ledger.transactions().len(),
        "ledger saved"
    );
    Ok(())
}
