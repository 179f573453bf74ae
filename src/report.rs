// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Report generation: totals, per-category breakdown and the monthly trend.
//!
//! Every call recomputes from the source; nothing is cached. The trend
//! window always trails the clock and ignores the requested period.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, Result};
use crate::ledger::LedgerSource;
use crate::models::{
    CategorySummary, FinancialReport, MonthlySummary, ReportPeriod, Transaction, TransactionType,
};

pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Order of the category breakdown rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakdownOrder {
    /// First appearance while scanning the period, newest transaction first.
    #[default]
    Encounter,
    CategoryId,
    Name,
    /// Largest amount first.
    Amount,
}

impl BreakdownOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownOrder::Encounter => "encounter",
            BreakdownOrder::CategoryId => "category-id",
            BreakdownOrder::Name => "name",
            BreakdownOrder::Amount => "amount",
        }
    }

    fn apply(&self, rows: &mut [CategorySummary]) {
        match self {
            BreakdownOrder::Encounter => {}
            BreakdownOrder::CategoryId => rows.sort_by_key(|r| r.category_id),
            BreakdownOrder::Name => {
                rows.sort_by(|a, b| a.category_name.label().cmp(b.category_name.label()))
            }
            BreakdownOrder::Amount => rows.sort_by(|a, b| b.amount.cmp(&a.amount)),
        }
    }
}

impl fmt::Display for BreakdownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BreakdownOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encounter" => Ok(BreakdownOrder::Encounter),
            "category-id" | "id" => Ok(BreakdownOrder::CategoryId),
            "name" => Ok(BreakdownOrder::Name),
            "amount" => Ok(BreakdownOrder::Amount),
            other => Err(format!(
                "Unknown breakdown order '{}' (use encounter|category-id|name|amount)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub trend_months: u32,
    pub order: BreakdownOrder,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            trend_months: DEFAULT_TREND_MONTHS,
            order: BreakdownOrder::Encounter,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

impl Totals {
    /// Sum of all amounts of the given type.
    pub fn for_type(&self, r#type: TransactionType) -> Decimal {
        match r#type {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expenses,
        }
    }
}

fn add(sum: &mut Decimal, amount: Decimal, what: &'static str) -> Result<()> {
    *sum = sum.checked_add(amount).ok_or(LedgerError::Overflow(what))?;
    Ok(())
}

/// Sums a slice by type. A sum outside the `Decimal` range is an `Overflow`.
pub fn compute_totals(transactions: &[Transaction]) -> Result<Totals> {
    let mut totals = Totals::default();
    for t in transactions {
        match t.r#type {
            TransactionType::Income => add(&mut totals.income, t.amount, "total income")?,
            TransactionType::Expense => add(&mut totals.expenses, t.amount, "total expenses")?,
        }
    }
    totals.balance = totals
        .income
        .checked_sub(totals.expenses)
        .ok_or(LedgerError::Overflow("balance"))?;
    Ok(totals)
}

/// Groups `transactions` by category in encounter order.
///
/// Each row's percentage is taken against the total of every transaction
/// whose own type equals the *category's* type, so a transaction filed
/// under a category of the other type counts toward the other type's
/// denominator. A category id missing from `source` aborts with `NotFound`.
pub fn category_breakdown<S: LedgerSource + ?Sized>(
    source: &S,
    transactions: &[Transaction],
    totals: &Totals,
) -> Result<Vec<CategorySummary>> {
    let mut groups: Vec<(i64, Decimal)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for t in transactions {
        match index.get(&t.category_id) {
            Some(&i) => add(&mut groups[i].1, t.amount, "category amount")?,
            None => {
                index.insert(t.category_id, groups.len());
                groups.push((t.category_id, t.amount));
            }
        }
    }

    let mut rows = Vec::with_capacity(groups.len());
    for (category_id, amount) in groups {
        let category = source.category_by_id(category_id)?;
        let denominator = totals.for_type(category.r#type);
        let percentage = if denominator > Decimal::ZERO {
            amount
                .checked_div(denominator)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(LedgerError::Overflow("category percentage"))?
        } else {
            Decimal::ZERO
        };
        debug!(category_id, %amount, %percentage, "category aggregated");
        rows.push(CategorySummary {
            category_id,
            category_name: category.name,
            r#type: category.r#type,
            amount,
            percentage,
        });
    }
    Ok(rows)
}

/// Earliest instant inside a trailing window of `months` calendar months.
pub fn trend_window_start(now: NaiveDateTime, months: u32) -> NaiveDateTime {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Income and expense sums per (year, month) for transactions dated at or
/// after `since`, ascending. Months without transactions are left out.
pub fn monthly_trends(
    transactions: &[Transaction],
    since: NaiveDateTime,
) -> Result<Vec<MonthlySummary>> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.date >= since) {
        let entry = buckets
            .entry((t.date.year(), t.date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TransactionType::Income => add(&mut entry.0, t.amount, "monthly income")?,
            TransactionType::Expense => add(&mut entry.1, t.amount, "monthly expenses")?,
        }
    }
    buckets
        .into_iter()
        .map(|((year, month), (income, expenses))| {
            let balance = income
                .checked_sub(expenses)
                .ok_or(LedgerError::Overflow("monthly balance"))?;
            Ok(MonthlySummary {
                year,
                month,
                income,
                expenses,
                balance,
            })
        })
        .collect()
}

pub struct ReportEngine<C: Clock = SystemClock> {
    clock: C,
    options: ReportOptions,
}

impl ReportEngine<SystemClock> {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            clock: SystemClock,
            options,
        }
    }
}

impl<C: Clock> ReportEngine<C> {
    pub fn with_clock(clock: C, options: ReportOptions) -> Self {
        Self { clock, options }
    }

    pub fn generate<S: LedgerSource + ?Sized>(
        &self,
        source: &S,
        period: &ReportPeriod,
    ) -> Result<FinancialReport> {
        let filtered = source.query_transactions(Some(period.start_date), Some(period.end_date));
        info!(
            start = %period.start_date,
            end = %period.end_date,
            transactions = filtered.len(),
            "generating report"
        );

        let totals = compute_totals(&filtered)?;
        let mut breakdown = category_breakdown(source, &filtered, &totals)?;
        self.options.order.apply(&mut breakdown);

        let since = trend_window_start(self.clock.now(), self.options.trend_months);
        let trends = monthly_trends(&source.all_transactions(), since)?;

        Ok(FinancialReport {
            period_start: period.start_date,
            period_end: period.end_date,
            period_type: period.r#type,
            total_income: totals.income,
            total_expenses: totals.expenses,
            balance: totals.balance,
            category_breakdown: breakdown,
            monthly_trends: trends,
        })
    }
}
