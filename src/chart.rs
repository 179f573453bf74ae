// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart payloads for an external 2D charting library.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CategorySummary, FinancialReport, TransactionType};

pub const DEFAULT_CANVAS: &str = "expenseChart";

/// Colours indexed by category code, so a category keeps its colour
/// across renders.
pub const PALETTE: [&str; 9] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#8BC34A", "#E91E63",
    "#C9CBCF",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub canvas_id: String,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartData {
    /// Projects breakdown rows into parallel label/value/colour lists,
    /// keeping the row order.
    pub fn from_breakdown<'a>(
        canvas_id: impl Into<String>,
        rows: impl IntoIterator<Item = &'a CategorySummary>,
    ) -> Self {
        let mut chart = ChartData {
            canvas_id: canvas_id.into(),
            labels: Vec::new(),
            data: Vec::new(),
            colors: Vec::new(),
        };
        for row in rows {
            let code = row.category_name.code();
            chart.labels.push(row.category_name.label().to_string());
            chart.data.push(row.amount.to_f64().unwrap_or_default());
            chart
                .colors
                .push(PALETTE[(code as usize - 1) % PALETTE.len()].to_string());
        }
        chart
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Expense categories of a report, as a pie-chart payload.
pub fn expense_chart(report: &FinancialReport, canvas_id: &str) -> ChartData {
    ChartData::from_breakdown(
        canvas_id,
        report
            .category_breakdown
            .iter()
            .filter(|r| r.r#type == TransactionType::Expense),
    )
}

/// Rendered charts keyed by canvas id. At most one chart lives on a
/// canvas; rendering again disposes the previous instance first.
#[derive(Debug, Default)]
pub struct ChartBoard {
    charts: HashMap<String, ChartData>,
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `chart` on its canvas and hands back the instance it replaced.
    pub fn render(&mut self, chart: ChartData) -> Option<ChartData> {
        let previous = self.clear(&chart.canvas_id);
        debug!(canvas = %chart.canvas_id, entries = chart.labels.len(), "chart rendered");
        self.charts.insert(chart.canvas_id.clone(), chart);
        previous
    }

    pub fn clear(&mut self, canvas_id: &str) -> Option<ChartData> {
        let removed = self.charts.remove(canvas_id);
        if removed.is_some() {
            debug!(canvas = canvas_id, "chart disposed");
        }
        removed
    }

    pub fn get(&self, canvas_id: &str) -> Option<&ChartData> {
        self.charts.get(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
