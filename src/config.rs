// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User settings kept in the `settings` table.

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tracing::warn;

use crate::report::{BreakdownOrder, DEFAULT_TREND_MONTHS, ReportOptions};

pub const TREND_MONTHS: &str = "trend_months";
pub const BREAKDOWN_ORDER: &str = "breakdown_order";
pub const ENFORCE_CATEGORY_TYPE: &str = "enforce_category_type";

pub const KEYS: [&str; 3] = [TREND_MONTHS, BREAKDOWN_ORDER, ENFORCE_CATEGORY_TYPE];

const MAX_TREND_MONTHS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub trend_months: u32,
    pub breakdown_order: BreakdownOrder,
    pub enforce_category_type: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trend_months: DEFAULT_TREND_MONTHS,
            breakdown_order: BreakdownOrder::Encounter,
            enforce_category_type: false,
        }
    }
}

impl Settings {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            trend_months: self.trend_months,
            order: self.breakdown_order,
        }
    }

    /// Applies one `key = value` pair, rejecting unknown keys and bad values.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            TREND_MONTHS => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {} '{}'", TREND_MONTHS, value))?;
                if n == 0 || n > MAX_TREND_MONTHS {
                    bail!("{} must be between 1 and {}", TREND_MONTHS, MAX_TREND_MONTHS);
                }
                self.trend_months = n;
            }
            BREAKDOWN_ORDER => {
                self.breakdown_order = value.parse::<BreakdownOrder>().map_err(|e| anyhow!(e))?;
            }
            ENFORCE_CATEGORY_TYPE => {
                self.enforce_category_type = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => bail!("Invalid {} '{}', expected true|false", ENFORCE_CATEGORY_TYPE, value),
                };
            }
            other => bail!("Unknown setting '{}' (known: {})", other, KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (TREND_MONTHS, self.trend_months.to_string()),
            (BREAKDOWN_ORDER, self.breakdown_order.to_string()),
            (ENFORCE_CATEGORY_TYPE, self.enforce_category_type.to_string()),
        ]
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

/// Validates and stores one setting.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    Settings::default().apply(key, value)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value.trim()],
    )?;
    Ok(())
}

pub fn load_settings(conn: &Connection) -> Result<Settings> {
    let mut settings = Settings::default();
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    for row in rows {
        let (key, value) = row?;
        if !KEYS.contains(&key.as_str()) {
            warn!(key = %key, "ignoring unknown setting");
            continue;
        }
        settings
            .apply(&key, &value)
            .with_context(|| format!("Stored setting '{}' is invalid", key))?;
    }
    Ok(settings)
}
