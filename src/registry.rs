use crate::config::Config;
use crate::constants::{
    configured_datasets, CHILD_CENTILES_FILE, CHILD_INCOME_COLUMN, LOESS_COLUMN,
    PARENT_CENTILES_FILE, PARENT_INCOME_COLUMN, RANKING_DATASET, RANKING_FILE, REGION_COLUMN,
    SIMULATED_DATASET, SURVEY_DATASET, SURVEY_FILE, TRANSITION_MATRIX_FILE,
};
use crate::domain::{Dataset, DatasetSummary, MobilityPoint, RegionMobility};
use crate::error::{MobilityError, Result};
use crate::pipeline::converter::ConverterTable;
use crate::pipeline::simulate::simulate_points;
use crate::pipeline::stats::StatsStrategy;
use crate::pipeline::tabular::Table;
use crate::pipeline::transition::TransitionMatrix;
use crate::sources::SourceDir;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Named, immutable datasets built once at startup and read-only afterward.
/// Every configured name is always present: a dataset whose load failed is
/// stored as an empty entry rather than dropped, so one bad source never
/// blocks the others or the service itself.
pub struct DatasetRegistry {
    datasets: HashMap<String, Dataset>,
}

impl DatasetRegistry {
    /// Runs the pipeline for every configured dataset, degrading failures
    /// to empty entries with a logged diagnostic.
    pub fn build(sources: &SourceDir, config: &Config) -> DatasetRegistry {
        let mut datasets = HashMap::new();
        for name in configured_datasets() {
            let dataset = match load_dataset(name, sources, config) {
                Ok(dataset) => {
                    info!(
                        "dataset '{}' loaded: {} points, {} regions",
                        name,
                        dataset.points.len(),
                        dataset.summary.region_mobility.len()
                    );
                    dataset
                }
                Err(e) => {
                    warn!("dataset '{}' failed to load, serving empty: {}", name, e);
                    Dataset::empty(name)
                }
            };
            datasets.insert(name.to_string(), dataset);
        }
        DatasetRegistry { datasets }
    }

    /// Configured dataset names, in stable order.
    pub fn names(&self) -> Vec<String> {
        configured_datasets()
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// `Some` with a possibly-empty slice for configured names, `None` only
    /// for names that were never configured.
    pub fn points(&self, name: &str) -> Option<&[MobilityPoint]> {
        self.get(name).map(|d| d.points.as_slice())
    }

    pub fn summary(&self, name: &str) -> Option<&DatasetSummary> {
        self.get(name).map(|d| &d.summary)
    }
}

fn load_dataset(name: &str, sources: &SourceDir, config: &Config) -> Result<Dataset> {
    match name {
        SIMULATED_DATASET => load_simulated(sources, config),
        SURVEY_DATASET => load_survey(sources),
        RANKING_DATASET => load_ranking(sources),
        other => Err(MobilityError::DataLoad(format!(
            "no loader for dataset '{other}'"
        ))),
    }
}

/// Simulated national cloud: transition matrix plus the two converter
/// tables feed the seeded simulator. No per-region aggregation.
fn load_simulated(sources: &SourceDir, config: &Config) -> Result<Dataset> {
    let parents = ConverterTable::from_table(
        &Table::parse(&sources.read(PARENT_CENTILES_FILE)?)?,
        PARENT_CENTILES_FILE,
    )?;
    let children = ConverterTable::from_table(
        &Table::parse(&sources.read(CHILD_CENTILES_FILE)?)?,
        CHILD_CENTILES_FILE,
    )?;
    let matrix = TransitionMatrix::from_table(
        &Table::parse(&sources.read(TRANSITION_MATRIX_FILE)?)?,
        TRANSITION_MATRIX_FILE,
    )?;

    let points = simulate_points(
        &matrix,
        &parents,
        &children,
        config.simulation.points,
        config.simulation.seed,
    );
    debug!(
        "simulated {} of {} requested points (seed {})",
        points.len(),
        config.simulation.points,
        config.simulation.seed
    );

    let summary = StatsStrategy::PointsOnly.summarize(&points, &[]);
    Ok(Dataset {
        name: SIMULATED_DATASET.to_string(),
        points,
        summary,
    })
}

/// Regional survey: one observed income pair per row, aggregated per region
/// with the legacy mobility index.
fn load_survey(sources: &SourceDir) -> Result<Dataset> {
    let table = Table::parse(&sources.read(SURVEY_FILE)?)?;
    for column in [REGION_COLUMN, PARENT_INCOME_COLUMN, CHILD_INCOME_COLUMN] {
        if !table.schema().has_column(column) {
            return Err(MobilityError::MissingColumn(column.to_string()));
        }
    }

    let mut points = Vec::new();
    for row in table.rows() {
        let Some(region) = row.text(REGION_COLUMN).filter(|r| !r.is_empty()) else {
            continue;
        };
        let Some(parent_income) = row.number(PARENT_INCOME_COLUMN) else {
            continue;
        };
        let Some(child_income) = row.number(CHILD_INCOME_COLUMN) else {
            continue;
        };
        points.push(MobilityPoint {
            parent_income,
            child_income,
            region: region.to_string(),
        });
    }
    if points.is_empty() {
        return Err(MobilityError::EmptyDataset(SURVEY_FILE.to_string()));
    }

    let summary = StatsStrategy::RegionAggregate.summarize(&points, &[]);
    Ok(Dataset {
        name: SURVEY_DATASET.to_string(),
        points,
        summary,
    })
}

/// Mobility ranking: precomputed loess percentile per region, scaled to
/// [0,1] at load. Serves no points.
fn load_ranking(sources: &SourceDir) -> Result<Dataset> {
    let table = Table::parse(&sources.read(RANKING_FILE)?)?;
    for column in [REGION_COLUMN, LOESS_COLUMN] {
        if !table.schema().has_column(column) {
            return Err(MobilityError::MissingColumn(column.to_string()));
        }
    }

    let mut ranking = Vec::new();
    for row in table.rows() {
        let Some(region) = row.text(REGION_COLUMN).filter(|r| !r.is_empty()) else {
            continue;
        };
        let Some(loess) = row.number(LOESS_COLUMN) else {
            continue;
        };
        ranking.push(RegionMobility {
            region: region.to_string(),
            mobility: loess / 100.0,
        });
    }
    if ranking.is_empty() {
        return Err(MobilityError::EmptyDataset(RANKING_FILE.to_string()));
    }

    let summary = StatsStrategy::RankingLookup.summarize(&[], &ranking);
    Ok(Dataset {
        name: RANKING_DATASET.to_string(),
        points: Vec::new(),
        summary,
    })
}
