use crate::constants::{NATIONAL_REGION, QUINTILE_LABELS};
use crate::domain::MobilityPoint;
use crate::pipeline::converter::ConverterTable;
use crate::pipeline::transition::{TransitionMatrix, QUINTILE_COUNT};

/// 64-bit linear congruential generator with Knuth's MMIX constants:
/// `state = state * 6364136223846793005 + 1442695040888963407 (mod 2^64)`.
/// The recurrence is fixed so that identical seeds always reproduce the
/// same stream, independent of any library version.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng { state: seed }
    }

    /// Next value in [0, 1): advance the state and map its top 53 bits onto
    /// the unit interval.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Draws up to `count` synthetic parent/child income pairs from the
/// transition matrix and the two converter tables. The generator is
/// constructed from the seed on every call, so repeated runs with the same
/// inputs produce identical sequences.
///
/// Per point: one draw picks the parent quintile bin; a missing matrix row
/// for that bin skips the point without consuming further draws. A second
/// draw in [0,100) walks the child-quintile weights cumulatively, falling
/// back to the last quintile when the weights sum short. Two more draws pick
/// the exact percentile inside each bin, parent first.
pub fn simulate_points(
    matrix: &TransitionMatrix,
    parent_incomes: &ConverterTable,
    child_incomes: &ConverterTable,
    count: usize,
    seed: u64,
) -> Vec<MobilityPoint> {
    let mut rng = SeededRng::new(seed);
    let mut points = Vec::with_capacity(count);

    for _ in 0..count {
        let parent_quintile = (rng.next_f64() * QUINTILE_COUNT as f64) as usize;
        let Some(row) = matrix.row(QUINTILE_LABELS[parent_quintile]) else {
            continue;
        };

        let target = rng.next_f64() * 100.0;
        let mut child_quintile = QUINTILE_COUNT - 1;
        let mut cumulative = 0.0;
        for (i, weight) in row.weights.iter().enumerate() {
            cumulative += weight;
            if cumulative >= target {
                child_quintile = i;
                break;
            }
        }

        let parent_percentile = parent_quintile * 20 + (rng.next_f64() * 20.0) as usize + 1;
        let child_percentile = child_quintile * 20 + (rng.next_f64() * 20.0) as usize + 1;

        points.push(MobilityPoint {
            parent_income: parent_incomes.income_at(parent_percentile),
            child_income: child_incomes.income_at(child_percentile),
            region: NATIONAL_REGION.to_string(),
        });
    }
    points
}
