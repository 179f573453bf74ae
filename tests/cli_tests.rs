// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use clap::ArgMatches;
use finorg::chart::DEFAULT_CANVAS;
use finorg::clock::FixedClock;
use finorg::commands::{categories, exporter, reports, transactions};
use finorg::db::{init_schema, save_ledger};
use finorg::models::{CategoryName, NewTransaction, ReportType, TransactionType};
use finorg::{Ledger, cli};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(day(2025, 7, 15).and_hms_opt(12, 0, 0).unwrap())
}

/// Walks `args` down to the innermost subcommand's matches.
fn leaf(args: &[&str]) -> ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args);
    while let Some((_, sub)) = m.subcommand() {
        let sub = sub.clone();
        m = sub;
    }
    m
}

fn seeded_ledger() -> Ledger {
    let mut l = Ledger::new();
    categories::seed_defaults(&mut l).unwrap();
    for (amount, cat, ty, d) in [
        ("1000", 5, TransactionType::Income, day(2025, 7, 1)),
        ("300", 1, TransactionType::Expense, day(2025, 7, 3)),
        ("100", 2, TransactionType::Expense, day(2025, 7, 8)),
        ("50", 1, TransactionType::Expense, day(2025, 6, 20)),
    ] {
        l.add_transaction(
            NewTransaction::new(dec(amount), "entry", cat, ty).on(d.and_hms_opt(10, 0, 0).unwrap()),
        )
        .unwrap();
    }
    l
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    save_ledger(&mut conn, &seeded_ledger()).unwrap();
    conn
}

#[test]
fn seed_defaults_only_fills_empty_ledger() {
    let mut l = Ledger::new();
    assert_eq!(categories::seed_defaults(&mut l).unwrap(), 9);
    assert_eq!(categories::seed_defaults(&mut l).unwrap(), 0);
    let transfers = l
        .categories()
        .iter()
        .find(|c| c.name == CategoryName::Transfers)
        .unwrap();
    assert_eq!(transfers.r#type, TransactionType::Income);
    assert_eq!(transfers.id, 5);
}

#[test]
fn tx_add_args_build_a_draft() {
    let m = leaf(&[
        "finorg",
        "tx",
        "add",
        "--amount",
        "12.50",
        "-d",
        "Groceries",
        "--category",
        "8",
        "--type",
        "expense",
        "--date",
        "2025-07-02 18:30",
    ]);
    let draft = transactions::draft_from_args(&m).unwrap();
    assert_eq!(draft.amount, dec("12.5"));
    assert_eq!(draft.category_id, 8);
    assert_eq!(draft.r#type, TransactionType::Expense);
    assert_eq!(
        draft.date,
        Some(day(2025, 7, 2).and_hms_opt(18, 30, 0).unwrap())
    );
    assert_eq!(draft.id, 0);
}

#[test]
fn tx_update_keeps_unspecified_fields() {
    let ledger = seeded_ledger();
    let m = leaf(&["finorg", "tx", "update", "--id", "2", "--amount", "320"]);
    let replacement = transactions::replacement_from_args(&ledger, &m).unwrap();
    let stored = ledger.transaction(2).unwrap();
    assert_eq!(replacement.amount, dec("320"));
    assert_eq!(replacement.date, stored.date);
    assert_eq!(replacement.category_id, stored.category_id);
    assert_eq!(replacement.description, stored.description);

    let missing = leaf(&["finorg", "tx", "update", "--id", "99"]);
    assert!(transactions::replacement_from_args(&ledger, &missing).is_err());
}

#[test]
fn tx_list_respects_range_and_limit() {
    let ledger = seeded_ledger();
    let m = leaf(&["finorg", "tx", "list", "--from", "2025-07-01", "--limit", "2"]);
    let rows = transactions::query_rows(&ledger, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-07-08 10:00");
    assert_eq!(rows[0].category, "Taxi");
    assert_eq!(rows[1].amount, "300");
}

#[test]
fn period_defaults_to_current_month() {
    let m = leaf(&["finorg", "report", "summary"]);
    let p = reports::resolve_period(&m, day(2025, 7, 15)).unwrap();
    assert_eq!(p.start_date, day(2025, 7, 1));
    assert_eq!(p.end_date, day(2025, 7, 15));
    assert_eq!(p.r#type, ReportType::Monthly);
}

#[test]
fn period_from_dates_is_custom() {
    let m = leaf(&[
        "finorg", "report", "summary", "--from", "2025-06-01", "--to", "2025-06-30",
    ]);
    let p = reports::resolve_period(&m, day(2025, 7, 15)).unwrap();
    assert_eq!(p.r#type, ReportType::Custom);
    assert_eq!(p.start_date, day(2025, 6, 1));

    let half = leaf(&["finorg", "report", "summary", "--period", "custom", "--from", "2025-06-01"]);
    assert!(reports::resolve_period(&half, day(2025, 7, 15)).is_err());
}

#[test]
fn weekly_period_covers_seven_days() {
    let m = leaf(&["finorg", "report", "summary", "--period", "weekly"]);
    let p = reports::resolve_period(&m, day(2025, 7, 15)).unwrap();
    assert_eq!(p.start_date, day(2025, 7, 9));
    assert_eq!(p.end_date, day(2025, 7, 15));
}

#[test]
fn summary_report_from_stored_ledger() {
    let conn = setup();
    let m = leaf(&["finorg", "report", "summary", "--period", "monthly"]);
    let report = reports::build_report(&conn, &m, clock()).unwrap();
    assert_eq!(report.total_income, dec("1000"));
    assert_eq!(report.total_expenses, dec("400"));
    assert_eq!(report.balance, dec("600"));
    assert_eq!(report.category_breakdown.len(), 3);
    assert_eq!(report.monthly_trends.len(), 2);
    assert_eq!(report.monthly_trends[0].expenses, dec("50"));
}

#[test]
fn chart_payload_lists_expense_categories() {
    let conn = setup();
    let m = leaf(&["finorg", "report", "chart", "--period", "monthly"]);
    let report = reports::build_report(&conn, &m, clock()).unwrap();
    let chart = reports::chart_payload(&report, &m);
    assert_eq!(chart.canvas_id, "expenseChart");
    assert_eq!(chart.labels, vec!["Taxi", "Food"]);
    assert_eq!(chart.data, vec![100.0, 300.0]);

    let all = leaf(&["finorg", "report", "chart", "--period", "monthly", "--all-types"]);
    assert_eq!(reports::chart_payload(&report, &all).labels.len(), 3);
}

#[test]
fn export_report_writes_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.json");
    let out_str = out.to_string_lossy().to_string();
    let m = leaf(&[
        "finorg", "export", "report", "--format", "json", "--out", &out_str, "--from",
        "2025-07-01", "--to", "2025-07-31",
    ]);
    exporter::export_report(&conn, &m, clock()).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed["total_income"], "1000");
    assert_eq!(parsed["period_type"], "custom");
    assert_eq!(parsed["category_breakdown"].as_array().unwrap().len(), 3);
}

#[test]
fn export_report_writes_csv_breakdown() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.csv");
    let out_str = out.to_string_lossy().to_string();
    let m = leaf(&[
        "finorg", "export", "report", "--format", "csv", "--out", &out_str, "--period",
        "monthly",
    ]);
    exporter::export_report(&conn, &m, clock()).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "category,type,amount,percentage");
    assert_eq!(lines[1], "taxi,expense,100,25.00");
    assert_eq!(lines[2], "food,expense,300,75.00");
    assert_eq!(lines[3], "transfers,income,1000,100.00");
}

#[test]
fn export_report_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("report.xml");
    let out_str = out.to_string_lossy().to_string();
    let m = leaf(&["finorg", "export", "report", "--format", "xml", "--out", &out_str]);
    assert!(exporter::export_report(&conn, &m, clock()).is_err());
    assert!(!out.exists());
}

#[test]
fn chart_payload_is_empty_without_expenses() {
    let conn = setup();
    let m = leaf(&[
        "finorg", "report", "chart", "--from", "2024-01-01", "--to", "2024-01-31",
    ]);
    let report = reports::build_report(&conn, &m, clock()).unwrap();
    let chart = reports::chart_payload(&report, &m);
    assert!(chart.is_empty());
    assert_eq!(chart.canvas_id, DEFAULT_CANVAS);
}
