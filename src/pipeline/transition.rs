use crate::constants::{PARENT_QUINTILE_COLUMN, QUINTILE_LABELS};
use crate::error::{MobilityError, Result};
use crate::pipeline::tabular::Table;

pub const QUINTILE_COUNT: usize = 5;

/// One matrix row: a parent quintile label and the probability-like weights
/// for each child quintile, in fixed label order.
#[derive(Debug, Clone)]
pub struct TransitionRow {
    pub label: String,
    pub weights: [f64; QUINTILE_COUNT],
}

/// Ordered quintile-transition rows keyed by parent quintile label. Weights
/// are expected to sum to roughly 100 per row but are not validated; the
/// simulator's underflow fallback handles rows that sum short.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    rows: Vec<TransitionRow>,
}

impl TransitionMatrix {
    /// Builds the matrix from parsed rows. The parent-label column is
    /// required; rows with an empty or numeric label are skipped. Missing or
    /// non-numeric child weights read as 0.
    pub fn from_table(table: &Table, source: &str) -> Result<TransitionMatrix> {
        if !table.schema().has_column(PARENT_QUINTILE_COLUMN) {
            return Err(MobilityError::MissingColumn(
                PARENT_QUINTILE_COLUMN.to_string(),
            ));
        }

        let mut rows = Vec::new();
        for row in table.rows() {
            let label = match row.text(PARENT_QUINTILE_COLUMN) {
                Some(label) if !label.is_empty() => label.to_string(),
                _ => continue,
            };
            let mut weights = [0.0_f64; QUINTILE_COUNT];
            for (i, child_label) in QUINTILE_LABELS.iter().enumerate() {
                weights[i] = row.number(child_label).unwrap_or(0.0);
            }
            rows.push(TransitionRow { label, weights });
        }

        if rows.is_empty() {
            return Err(MobilityError::EmptyDataset(source.to_string()));
        }
        Ok(TransitionMatrix { rows })
    }

    /// The row whose parent label matches, if any.
    pub fn row(&self, label: &str) -> Option<&TransitionRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
