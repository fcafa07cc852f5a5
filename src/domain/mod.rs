use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilityPoint {
    pub parent_income: f64,
    pub child_income: f64,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMobility {
    pub region: String,
    pub mobility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub count: usize,
    pub correlation: Option<f64>,
    pub region_mobility: Vec<RegionMobility>,
}

/// A named, immutable collection of records plus its precomputed summary.
/// Built once at startup, never mutated afterward.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub points: Vec<MobilityPoint>,
    pub summary: DatasetSummary,
}

impl Dataset {
    pub fn empty(name: &str) -> Self {
        Dataset {
            name: name.to_string(),
            points: Vec::new(),
            summary: DatasetSummary {
                count: 0,
                correlation: None,
                region_mobility: Vec::new(),
            },
        }
    }
}
