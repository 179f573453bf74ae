// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use finorg::clock::FixedClock;
use finorg::models::{
    CategoryName, NewTransaction, ReportPeriod, Transaction, TransactionType,
};
use finorg::{Ledger, LedgerError, LedgerSource, ReportEngine, ReportOptions, SharedLedger};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn setup() -> Ledger {
    let mut l = Ledger::new();
    l.add_category(1, CategoryName::Transfers, TransactionType::Income)
        .unwrap();
    l.add_category(2, CategoryName::Food, TransactionType::Expense)
        .unwrap();
    l
}

fn expense(amount: &str, when: NaiveDateTime) -> NewTransaction {
    NewTransaction::new(dec(amount), "lunch", 2, TransactionType::Expense).on(when)
}

#[test]
fn add_assigns_sequential_ids() {
    let mut l = setup();
    let a = l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();
    let b = l.add_transaction(expense("20", at(2025, 1, 2, 9, 0))).unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(b.id, 2);
    assert_eq!(l.transactions().len(), 2);
}

#[test]
fn add_keeps_explicit_id_and_continues_after_max() {
    let mut l = setup();
    l.add_transaction(expense("10", at(2025, 1, 1, 9, 0)).with_id(40))
        .unwrap();
    let next = l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();
    assert_eq!(next.id, 41);

    let err = l
        .add_transaction(expense("10", at(2025, 1, 1, 9, 0)).with_id(40))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn add_without_date_uses_now() {
    let mut l = setup();
    let now = at(2025, 3, 3, 14, 30);
    let tx = l
        .add_transaction_at(
            NewTransaction::new(dec("5"), "coffee", 2, TransactionType::Expense),
            now,
        )
        .unwrap();
    assert_eq!(tx.date, now);
}

#[test]
fn add_rejects_non_positive_amount() {
    let mut l = setup();
    for amount in ["0", "-3.50"] {
        let err = l
            .add_transaction(expense(amount, at(2025, 1, 1, 9, 0)))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }
    assert!(l.transactions().is_empty());
}

#[test]
fn add_rejects_blank_description() {
    let mut l = setup();
    let err = l
        .add_transaction(NewTransaction::new(
            dec("5"),
            "   \t",
            2,
            TransactionType::Expense,
        ))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(l.transactions().is_empty());
}

#[test]
fn update_unknown_id_is_not_found() {
    let mut l = setup();
    l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();
    let before = l.transactions().to_vec();

    let ghost = Transaction {
        id: 77,
        amount: dec("1"),
        date: at(2025, 1, 1, 9, 0),
        description: "ghost".into(),
        category_id: 2,
        r#type: TransactionType::Expense,
    };
    let err = l.update_transaction(ghost).unwrap_err();
    assert_eq!(err, LedgerError::transaction_not_found(77));
    assert_eq!(l.transactions(), before.as_slice());
}

#[test]
fn update_replaces_record_and_leaves_old_copy_alone() {
    let mut l = setup();
    let original = l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();

    let mut changed = original.clone();
    changed.amount = dec("12.5");
    changed.description = "dinner".into();
    changed.date = at(2025, 1, 2, 20, 0);
    let stored = l.update_transaction(changed.clone()).unwrap();

    assert_eq!(stored, changed);
    assert_eq!(l.transaction(original.id), Some(&changed));
    assert_eq!(original.amount, dec("10"));
    assert_eq!(original.description, "lunch");
}

#[test]
fn update_revalidates_input() {
    let mut l = setup();
    let tx = l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();

    let mut bad = tx.clone();
    bad.amount = Decimal::ZERO;
    assert!(matches!(
        l.update_transaction(bad),
        Err(LedgerError::Validation(_))
    ));

    let mut bad = tx.clone();
    bad.description = String::new();
    assert!(matches!(
        l.update_transaction(bad),
        Err(LedgerError::Validation(_))
    ));
    assert_eq!(l.transaction(tx.id), Some(&tx));
}

#[test]
fn delete_is_structural_and_idempotent() {
    let mut l = setup();
    let a = l.add_transaction(expense("10", at(2025, 1, 1, 9, 0))).unwrap();
    let b = l.add_transaction(expense("20", at(2025, 1, 2, 9, 0))).unwrap();

    assert!(l.delete_transaction(&a));
    assert!(!l.delete_transaction(&a));
    assert_eq!(l.transactions(), std::slice::from_ref(&b));

    let mut stale = b.clone();
    stale.amount = dec("99");
    assert!(!l.delete_transaction(&stale));
    assert_eq!(l.transactions().len(), 1);

    assert_eq!(l.delete_by_id(b.id), Some(b));
    assert_eq!(l.delete_by_id(123), None);
    assert!(l.transactions().is_empty());
}

#[test]
fn query_filters_by_calendar_date_newest_first() {
    let mut l = setup();
    l.add_transaction(expense("1", at(2025, 1, 1, 8, 0))).unwrap();
    l.add_transaction(expense("2", at(2025, 1, 5, 23, 59))).unwrap();
    l.add_transaction(expense("3", at(2025, 1, 3, 0, 0))).unwrap();
    l.add_transaction(expense("4", at(2025, 1, 6, 0, 0))).unwrap();

    let hits = l.query_transactions(Some(day(2025, 1, 3)), Some(day(2025, 1, 5)));
    let amounts: Vec<Decimal> = hits.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![dec("2"), dec("3")]);

    let all = l.query_transactions(None, None);
    let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![4, 2, 3, 1]);

    let open_end = l.query_transactions(Some(day(2025, 1, 5)), None);
    assert_eq!(open_end.len(), 2);

    assert!(
        l.query_transactions(Some(day(2025, 1, 6)), Some(day(2025, 1, 1)))
            .is_empty()
    );
}

#[test]
fn categories_are_listed_in_full() {
    let l = setup();
    let cats = l.all_categories();
    assert_eq!(cats.len(), 2);
    assert_eq!(l.category_by_id(2).unwrap().name, CategoryName::Food);
    assert_eq!(
        l.category_by_id(9).unwrap_err(),
        LedgerError::category_not_found(9)
    );
}

#[test]
fn category_ids_are_unique() {
    let mut l = setup();
    let c = l
        .add_category(0, CategoryName::Taxi, TransactionType::Expense)
        .unwrap();
    assert_eq!(c.id, 3);
    assert!(matches!(
        l.add_category(3, CategoryName::Education, TransactionType::Expense),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn type_check_is_off_by_default() {
    let mut l = setup();
    assert!(!l.enforces_category_type());
    let tx = NewTransaction::new(dec("5"), "refund", 2, TransactionType::Income);
    assert!(l.add_transaction(tx).is_ok());
}

#[test]
fn type_check_rejects_mismatch_and_unknown_category() {
    let mut l = setup().with_category_type_check(true);

    let mismatch = NewTransaction::new(dec("5"), "refund", 2, TransactionType::Income);
    assert!(matches!(
        l.add_transaction(mismatch),
        Err(LedgerError::Validation(_))
    ));

    let orphan = NewTransaction::new(dec("5"), "mystery", 42, TransactionType::Expense);
    assert_eq!(
        l.add_transaction(orphan).unwrap_err(),
        LedgerError::category_not_found(42)
    );

    let ok = l
        .add_transaction(NewTransaction::new(dec("5"), "salary", 1, TransactionType::Income))
        .unwrap();
    let mut moved = ok.clone();
    moved.category_id = 2;
    assert!(matches!(
        l.update_transaction(moved),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn shared_ledger_serves_concurrent_reports() {
    let shared = SharedLedger::new(setup());
    shared
        .write(|l| {
            l.add_transaction(expense("30", at(2025, 7, 2, 9, 0)))
                .map(|_| ())
        })
        .unwrap()
        .unwrap();

    let period = ReportPeriod::custom(day(2025, 7, 1), day(2025, 7, 31));
    let engine = ReportEngine::with_clock(FixedClock(at(2025, 7, 15, 0, 0)), ReportOptions::default());

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    shared
                        .read(|l| engine.generate(l, &period))
                        .unwrap()
                        .unwrap()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().total_expenses, dec("30"));
        }
    });

    let snapshot = shared.snapshot().unwrap();
    shared.write(|l| l.delete_by_id(1)).unwrap();
    assert_eq!(snapshot.transactions().len(), 1);
    assert!(shared.read(|l| l.transactions().is_empty()).unwrap());
}
