// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::chart::{ChartData, expense_chart};
use crate::clock::{Clock, SystemClock};
use crate::commands::open_ledger;
use crate::models::{FinancialReport, ReportPeriod, ReportType};
use crate::report::ReportEngine;
use crate::utils::{fmt_amount, fmt_percent, maybe_print_json, parse_date, pretty_table};
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("chart", sub)) => chart(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Turns `--period/--from/--to` into a period. Explicit dates override the
/// conventional window of the chosen type; `custom` needs both dates.
pub fn resolve_period(sub: &clap::ArgMatches, today: NaiveDate) -> Result<ReportPeriod> {
    let from = sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let ty = match sub.get_one::<String>("period") {
        Some(p) => p.parse::<ReportType>().map_err(|e| anyhow!(e))?,
        None if from.is_some() || to.is_some() => ReportType::Custom,
        None => ReportType::Monthly,
    };

    if ty == ReportType::Custom {
        let (Some(start_date), Some(end_date)) = (from, to) else {
            bail!("A custom period needs both --from and --to");
        };
        return Ok(ReportPeriod::custom(start_date, end_date));
    }

    let mut period = ReportPeriod::ending_on(ty, today)
        .with_context(|| format!("Cannot build a {:?} period ending {}", ty, today))?;
    if let Some(d) = from {
        period.start_date = d;
    }
    if let Some(d) = to {
        period.end_date = d;
    }
    Ok(period)
}

/// Loads the ledger and settings behind `conn` and runs the report engine
/// for the period described by `sub`.
pub fn build_report<C: Clock>(
    conn: &Connection,
    sub: &clap::ArgMatches,
    clock: C,
) -> Result<FinancialReport> {
    let (ledger, settings) = open_ledger(conn)?;
    let period = resolve_period(sub, clock.today())?;
    let engine = ReportEngine::with_clock(clock, settings.report_options());
    let report = engine.generate(&ledger, &period)?;
    Ok(report)
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_report(conn, sub, SystemClock)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    println!(
        "Report {} .. {} ({:?})",
        report.period_start, report.period_end, report.period_type
    );
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance"],
            vec![vec![
                fmt_amount(&report.total_income),
                fmt_amount(&report.total_expenses),
                fmt_amount(&report.balance),
            ]],
        )
    );

    let rows = report
        .category_breakdown
        .iter()
        .map(|c| {
            vec![
                c.category_name.to_string(),
                c.r#type.to_string(),
                fmt_amount(&c.amount),
                fmt_percent(&c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Type", "Amount", "Share"], rows)
    );

    let rows = report
        .monthly_trends
        .iter()
        .map(|m| {
            vec![
                format!("{:04}-{:02}", m.year, m.month),
                fmt_amount(&m.income),
                fmt_amount(&m.expenses),
                fmt_amount(&m.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance"], rows)
    );
    Ok(())
}

pub fn chart_payload(report: &FinancialReport, sub: &clap::ArgMatches) -> ChartData {
    let canvas = sub.get_one::<String>("canvas").unwrap();
    if sub.get_flag("all-types") {
        ChartData::from_breakdown(canvas.as_str(), &report.category_breakdown)
    } else {
        expense_chart(report, canvas)
    }
}

fn chart(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_report(conn, sub, SystemClock)?;
    let payload = chart_payload(&report, sub);
    if payload.is_empty() {
        warn!(canvas = %payload.canvas_id, "no breakdown entries to chart");
    }
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
