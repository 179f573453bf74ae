// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod transactions;
pub mod reports;
pub mod exporter;
pub mod settings;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::{Settings, load_settings};
use crate::db::load_ledger;
use crate::ledger::Ledger;

/// Loads the stored ledger with the stored category/type policy applied.
pub fn open_ledger(conn: &Connection) -> Result<(Ledger, Settings)> {
    let settings = load_settings(conn)?;
    let ledger = load_ledger(conn)?.with_category_type_check(settings.enforce_category_type);
    Ok((ledger, settings))
}
