//! Name constants shared across the pipeline, registry and HTTP layer.

// Dataset names (used in routes and the registry)
pub const SIMULATED_DATASET: &str = "simulado";
pub const SURVEY_DATASET: &str = "encuesta";
pub const RANKING_DATASET: &str = "ranking";

// Source file names resolved against the configured data directory
pub const PARENT_CENTILES_FILE: &str = "centiles_padres.csv";
pub const CHILD_CENTILES_FILE: &str = "centiles_hijos.csv";
pub const TRANSITION_MATRIX_FILE: &str = "matriz_transicion.csv";
pub const SURVEY_FILE: &str = "encuesta_regional.csv";
pub const RANKING_FILE: &str = "ranking_movilidad.csv";

// Source column names (Spanish, as shipped by the statistics office extracts)
pub const CENTILE_COLUMN: &str = "centil";
pub const INCOME_COLUMN: &str = "renta";
pub const PARENT_QUINTILE_COLUMN: &str = "quintil_padres";
pub const REGION_COLUMN: &str = "region";
pub const PARENT_INCOME_COLUMN: &str = "ingresos_padres";
pub const CHILD_INCOME_COLUMN: &str = "ingresos_hijo";
pub const LOESS_COLUMN: &str = "movilidad_loess";

/// Parent/child quintile bin labels, in walk order.
pub const QUINTILE_LABELS: [&str; 5] = ["0-20", "20-40", "40-60", "60-80", "80-100"];

/// Region label attached to every simulated point.
pub const NATIONAL_REGION: &str = "España";

// Simulation defaults (overridable via config.toml)
pub const DEFAULT_POINT_COUNT: usize = 800;
pub const DEFAULT_SEED: u64 = 20_240_615;

// Point listing limits, matching what the dashboard frontend requests
pub const DEFAULT_POINT_LIMIT: usize = 500;
pub const MAX_POINT_LIMIT: usize = 2000;

/// All configured dataset names, in the order the registry builds them.
pub fn configured_datasets() -> Vec<&'static str> {
    vec![SIMULATED_DATASET, SURVEY_DATASET, RANKING_DATASET]
}
