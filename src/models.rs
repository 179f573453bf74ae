// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(TransactionType::Income),
            "expense" | "out" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type '{}' (use income|expense)", other)),
        }
    }
}

/// Closed set of category labels. The numeric codes are stable and
/// used as the on-disk representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryName {
    Food = 1,
    Taxi = 2,
    PublicTransport = 3,
    FastFood = 4,
    Transfers = 5,
    DigitalGoods = 6,
    MobileService = 7,
    Supermarkets = 8,
    Education = 9,
}

impl CategoryName {
    pub const ALL: [CategoryName; 9] = [
        CategoryName::Food,
        CategoryName::Taxi,
        CategoryName::PublicTransport,
        CategoryName::FastFood,
        CategoryName::Transfers,
        CategoryName::DigitalGoods,
        CategoryName::MobileService,
        CategoryName::Supermarkets,
        CategoryName::Education,
    ];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    /// Machine-friendly key, accepted by `FromStr`.
    pub fn key(&self) -> &'static str {
        match self {
            CategoryName::Food => "food",
            CategoryName::Taxi => "taxi",
            CategoryName::PublicTransport => "public-transport",
            CategoryName::FastFood => "fast-food",
            CategoryName::Transfers => "transfers",
            CategoryName::DigitalGoods => "digital-goods",
            CategoryName::MobileService => "mobile-service",
            CategoryName::Supermarkets => "supermarkets",
            CategoryName::Education => "education",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryName::Food => "Food",
            CategoryName::Taxi => "Taxi",
            CategoryName::PublicTransport => "Public transport",
            CategoryName::FastFood => "Fast food",
            CategoryName::Transfers => "Transfers",
            CategoryName::DigitalGoods => "Digital goods",
            CategoryName::MobileService => "Mobile service",
            CategoryName::Supermarkets => "Supermarkets",
            CategoryName::Education => "Education",
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|n| n.key() == norm)
            .ok_or_else(|| format!("Unknown category name '{}'", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: CategoryName,
    pub r#type: TransactionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: String,
    pub category_id: i64,
    pub r#type: TransactionType,
}

/// Input for adding a transaction. `id == 0` asks the ledger to assign
/// one; a missing date means "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub id: i64,
    pub amount: Decimal,
    pub date: Option<NaiveDateTime>,
    pub description: String,
    pub category_id: i64,
    pub r#type: TransactionType,
}

impl NewTransaction {
    pub fn new(
        amount: Decimal,
        description: impl Into<String>,
        category_id: i64,
        r#type: TransactionType,
    ) -> Self {
        Self {
            id: 0,
            amount,
            date: None,
            description: description.into(),
            category_id,
            r#type,
        }
    }

    pub fn on(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ReportType::Daily),
            "weekly" => Ok(ReportType::Weekly),
            "monthly" => Ok(ReportType::Monthly),
            "yearly" => Ok(ReportType::Yearly),
            "custom" => Ok(ReportType::Custom),
            other => Err(format!("Unknown report period '{}'", other)),
        }
    }
}

/// Requested report window. `r#type` is informational; filtering always
/// uses the two dates, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub r#type: ReportType,
}

impl ReportPeriod {
    pub fn custom(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            r#type: ReportType::Custom,
        }
    }

    /// Conventional window of the given type ending on `today`.
    /// `Custom` has no conventional window and yields `None`.
    pub fn ending_on(r#type: ReportType, today: NaiveDate) -> Option<Self> {
        let start_date = match r#type {
            ReportType::Daily => today,
            ReportType::Weekly => today.checked_sub_days(Days::new(6))?,
            ReportType::Monthly => today.with_day(1)?,
            ReportType::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            ReportType::Custom => return None,
        };
        Some(Self {
            start_date,
            end_date: today,
            r#type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: i64,
    pub category_name: CategoryName,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub period_type: ReportType,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub category_breakdown: Vec<CategorySummary>,
    pub monthly_trends: Vec<MonthlySummary>,
}
