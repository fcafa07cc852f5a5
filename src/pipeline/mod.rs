// Data derivation pipeline: parsing, converter tables, simulation, and statistics

pub mod converter;
pub mod simulate;
pub mod stats;
pub mod tabular;
pub mod transition;

// Re-export the types downstream stages pass between each other
pub use converter::ConverterTable;
pub use simulate::{simulate_points, SeededRng};
pub use stats::StatsStrategy;
pub use tabular::Table;
pub use transition::TransitionMatrix;
