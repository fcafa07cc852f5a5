use crate::constants::{CENTILE_COLUMN, INCOME_COLUMN};
use crate::error::{MobilityError, Result};
use crate::pipeline::tabular::Table;

pub const PERCENTILE_COUNT: usize = 100;

/// Dense percentile-to-income lookup: exactly 100 entries for percentiles
/// 1..=100, zero where no source row contributed. Built once, read-only
/// afterward.
#[derive(Debug, Clone)]
pub struct ConverterTable {
    incomes: [f64; PERCENTILE_COUNT],
}

impl ConverterTable {
    /// Aggregates raw (centil, renta) rows into the dense lookup, averaging
    /// duplicate percentiles. Rows with a missing or non-numeric field, or a
    /// centil outside 1..=100 or non-integral, are skipped silently.
    pub fn from_table(table: &Table, source: &str) -> Result<ConverterTable> {
        let mut sums = [0.0_f64; PERCENTILE_COUNT];
        let mut counts = [0_u32; PERCENTILE_COUNT];

        for row in table.rows() {
            let Some(centile) = row.number(CENTILE_COLUMN) else {
                continue;
            };
            let Some(income) = row.number(INCOME_COLUMN) else {
                continue;
            };
            if centile.fract() != 0.0 || !(1.0..=100.0).contains(&centile) {
                continue;
            }
            let idx = centile as usize - 1;
            sums[idx] += income;
            counts[idx] += 1;
        }

        if counts.iter().all(|&c| c == 0) {
            return Err(MobilityError::EmptyDataset(source.to_string()));
        }

        let mut incomes = [0.0_f64; PERCENTILE_COUNT];
        for i in 0..PERCENTILE_COUNT {
            if counts[i] > 0 {
                incomes[i] = sums[i] / counts[i] as f64;
            }
        }
        Ok(ConverterTable { incomes })
    }

    /// Income for a percentile in 1..=100; anything out of range maps to 0.
    pub fn income_at(&self, percentile: usize) -> f64 {
        if (1..=PERCENTILE_COUNT).contains(&percentile) {
            self.incomes[percentile - 1]
        } else {
            0.0
        }
    }
}
