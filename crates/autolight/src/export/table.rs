//! Tabular snapshot of a selection, shared by every renderer.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::Project;
use crate::selection::SelectionState;

pub const COLUMNS: [&str; 7] = [
    "Symbol",
    "Room",
    "Model",
    "Manufacturer",
    "Quantity",
    "Unit Price",
    "Line Total",
];

/// Placeholder for model fields when a fixture has no resolved model.
pub const MISSING: &str = "N/A";

const UNIT_PRICE_COLUMN: usize = 5;
const LINE_TOTAL_COLUMN: usize = 6;

/// `$` followed by the amount with exactly two decimals, half-cents rounded up.
pub fn format_money(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportTable {
    pub title: String,
    pub info: Vec<(String, String)>,
    /// One row per fixture followed by the total row.
    pub rows: Vec<[String; 7]>,
}

impl ExportTable {
    /// Builds the table from the in-memory state; nothing is re-queried.
    pub fn build(
        project: &Project,
        selection: &SelectionState,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut rows: Vec<[String; 7]> = selection
            .entries()
            .iter()
            .map(|entry| {
                let model = entry.selected_model.as_ref();
                [
                    entry.fixture.detected_symbol.clone(),
                    entry.fixture.room_name.clone(),
                    model.map_or_else(|| MISSING.to_string(), |m| m.model_name.clone()),
                    model.map_or_else(|| MISSING.to_string(), |m| m.manufacturer.clone()),
                    entry.fixture.quantity.to_string(),
                    format_money(model.map_or(Decimal::ZERO, |m| m.unit_price)),
                    format_money(entry.line_total()),
                ]
            })
            .collect();

        let total_quantity: u64 = selection
            .entries()
            .iter()
            .map(|e| u64::from(e.fixture.quantity))
            .sum();
        rows.push([
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            total_quantity.to_string(),
            String::new(),
            format_money(selection.total_cost()),
        ]);

        Self {
            title: "AutoLight Lighting Report".to_string(),
            info: vec![
                ("Project".to_string(), project.name.clone()),
                ("Source file".to_string(), project.source_file_name.clone()),
                (
                    "Generated".to_string(),
                    generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                ),
                ("Average lux".to_string(), format!("{:.0}", project.average_lux)),
            ],
            rows,
        }
    }

    pub fn header(&self) -> [&'static str; 7] {
        COLUMNS
    }

    pub fn fixture_rows(&self) -> &[[String; 7]] {
        &self.rows[..self.rows.len().saturating_sub(1)]
    }

    pub fn total_row(&self) -> Option<&[String; 7]> {
        self.rows.last()
    }

    /// Every populated money cell, in row order.
    pub fn money_cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flat_map(|row| {
            [&row[UNIT_PRICE_COLUMN], &row[LINE_TOTAL_COLUMN]]
                .into_iter()
                .filter(|cell| !cell.is_empty())
                .map(String::as_str)
        })
    }
}
