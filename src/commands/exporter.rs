// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::clock::{Clock, SystemClock};
use crate::commands::reports::build_report;
use crate::models::FinancialReport;
use anyhow::{Result, bail};
use rusqlite::Connection;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub, SystemClock),
        _ => Ok(()),
    }
}

pub fn export_report<C: Clock>(conn: &Connection, sub: &clap::ArgMatches, clock: C) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let report = build_report(conn, sub, clock)?;
    match fmt.as_str() {
        "csv" => write_breakdown_csv(&report, Path::new(out))?,
        _ => std::fs::write(out, serde_json::to_string_pretty(&report)?)?,
    }
    println!("Exported report to {}", out);
    Ok(())
}

/// One row per breakdown entry, in report order.
pub fn write_breakdown_csv(report: &FinancialReport, out: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record(["category", "type", "amount", "percentage"])?;
    for row in &report.category_breakdown {
        wtr.write_record([
            row.category_name.key().to_string(),
            row.r#type.to_string(),
            row.amount.to_string(),
            format!("{:.2}", row.percentage),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
