use crate::domain::{DatasetSummary, MobilityPoint, RegionMobility};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Pearson correlation over two parallel series. Total over all inputs:
/// zero points yield 0, and degenerate inputs (single point, zero variance)
/// yield a non-finite value the guarded entry point screens out.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    covariance / (var_x * var_y).sqrt()
}

/// Correlation between parent and child incomes, or `None` when the
/// statistic is undefined (fewer than 2 points, or zero variance in either
/// series). NaN and infinity never escape this function.
pub fn correlation(points: &[MobilityPoint]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = points.iter().map(|p| p.parent_income).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.child_income).collect();
    let r = pearson(&xs, &ys);
    r.is_finite().then_some(r)
}

/// Normalized mobility for one income pair, clamped to [0, 1]:
/// `max(0, 1 - |child - parent| / max(1, parent))`.
pub fn mobility_index(parent_income: f64, child_income: f64) -> f64 {
    (1.0 - (child_income - parent_income).abs() / parent_income.max(1.0)).max(0.0)
}

/// Averages the mobility index per region, rounded to 3 decimals, sorted
/// descending by mobility. Records with an empty region label are ignored.
/// Ties keep region-alphabetical order.
pub fn region_aggregate(points: &[MobilityPoint]) -> Vec<RegionMobility> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for point in points {
        if point.region.is_empty() {
            continue;
        }
        let entry = groups.entry(point.region.as_str()).or_insert((0.0, 0));
        entry.0 += mobility_index(point.parent_income, point.child_income);
        entry.1 += 1;
    }

    let mut regions: Vec<RegionMobility> = groups
        .into_iter()
        .map(|(region, (sum, count))| RegionMobility {
            region: region.to_string(),
            mobility: round3(sum / count as f64),
        })
        .collect();
    sort_descending(&mut regions);
    regions
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn sort_descending(regions: &mut [RegionMobility]) {
    // Stable sort: equal mobilities keep their incoming order
    regions.sort_by(|a, b| {
        b.mobility
            .partial_cmp(&a.mobility)
            .unwrap_or(Ordering::Equal)
    });
}

/// How a dataset's summary statistics are computed. Chosen once when the
/// dataset is loaded; request handling never branches on dataset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsStrategy {
    /// Point cloud with no per-region aggregation.
    PointsOnly,
    /// Mobility index averaged per region from the income pairs.
    RegionAggregate,
    /// Precomputed per-region ranking values mapped directly.
    RankingLookup,
}

impl StatsStrategy {
    pub fn summarize(
        &self,
        points: &[MobilityPoint],
        ranking: &[RegionMobility],
    ) -> DatasetSummary {
        match self {
            StatsStrategy::PointsOnly => DatasetSummary {
                count: points.len(),
                correlation: rounded_correlation(points),
                region_mobility: Vec::new(),
            },
            StatsStrategy::RegionAggregate => DatasetSummary {
                count: points.len(),
                correlation: rounded_correlation(points),
                region_mobility: region_aggregate(points),
            },
            StatsStrategy::RankingLookup => {
                let mut regions = ranking.to_vec();
                sort_descending(&mut regions);
                DatasetSummary {
                    count: regions.len(),
                    correlation: None,
                    region_mobility: regions,
                }
            }
        }
    }
}

fn rounded_correlation(points: &[MobilityPoint]) -> Option<f64> {
    correlation(points).map(round3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(region: &str, parent: f64, child: f64) -> MobilityPoint {
        MobilityPoint {
            parent_income: parent,
            child_income: child,
            region: region.to_string(),
        }
    }

    #[test]
    fn perfect_linear_relation_correlates_to_one() {
        let points = vec![
            point("x", 1.0, 2.0),
            point("x", 2.0, 4.0),
            point("x", 3.0, 6.0),
        ];
        assert_eq!(correlation(&points), Some(1.0));
    }

    #[test]
    fn correlation_stays_within_unit_bounds() {
        let points = vec![
            point("x", 10.0, 52.0),
            point("x", 35.0, 14.0),
            point("x", 28.0, 40.0),
            point("x", 90.0, 61.0),
        ];
        let r = correlation(&points).unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn pearson_of_empty_series_is_zero() {
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn degenerate_inputs_are_undefined_not_nan() {
        assert_eq!(correlation(&[]), None);
        assert_eq!(correlation(&[point("x", 1.0, 2.0)]), None);

        // Constant parent series has zero variance
        let flat = vec![
            point("x", 5.0, 1.0),
            point("x", 5.0, 2.0),
            point("x", 5.0, 3.0),
        ];
        assert_eq!(correlation(&flat), None);
    }

    #[test]
    fn mobility_index_clamps_to_unit_interval() {
        assert_eq!(mobility_index(50_000.0, 50_000.0), 1.0);
        assert_eq!(mobility_index(50_000.0, 0.0), 0.0);
        assert_eq!(mobility_index(50_000.0, 150_000.0), 0.0);
        assert_eq!(mobility_index(0.0, 0.0), 1.0);
    }

    #[test]
    fn region_aggregate_averages_and_sorts_descending() {
        let points = vec![
            point("Galicia", 100.0, 50.0),
            point("Madrid", 100.0, 100.0),
            point("Galicia", 100.0, 100.0),
            point("", 100.0, 100.0),
        ];
        let regions = region_aggregate(&points);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region, "Madrid");
        assert_eq!(regions[0].mobility, 1.0);
        assert_eq!(regions[1].region, "Galicia");
        assert_eq!(regions[1].mobility, 0.75);
    }

    #[test]
    fn region_aggregate_breaks_ties_alphabetically() {
        let points = vec![
            point("Navarra", 100.0, 100.0),
            point("Aragon", 100.0, 100.0),
        ];
        let regions = region_aggregate(&points);
        assert_eq!(regions[0].region, "Aragon");
        assert_eq!(regions[1].region, "Navarra");
    }

    #[test]
    fn points_only_strategy_skips_region_aggregation() {
        let points = vec![point("España", 1.0, 2.0), point("España", 2.0, 4.0)];
        let summary = StatsStrategy::PointsOnly.summarize(&points, &[]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.correlation, Some(1.0));
        assert!(summary.region_mobility.is_empty());
    }

    #[test]
    fn region_aggregate_strategy_rounds_correlation() {
        let points = vec![
            point("A", 10.0, 20.0),
            point("A", 20.0, 39.0),
            point("B", 30.0, 61.0),
        ];
        let summary = StatsStrategy::RegionAggregate.summarize(&points, &[]);
        assert_eq!(summary.count, 3);
        let r = summary.correlation.unwrap();
        assert_eq!(r, round3(r));
        assert_eq!(summary.region_mobility.len(), 2);
    }

    #[test]
    fn ranking_strategy_sorts_and_reports_null_correlation() {
        let ranking = vec![
            RegionMobility {
                region: "Galicia".to_string(),
                mobility: 0.41,
            },
            RegionMobility {
                region: "Madrid".to_string(),
                mobility: 0.87,
            },
        ];
        let summary = StatsStrategy::RankingLookup.summarize(&[], &ranking);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.correlation, None);
        assert_eq!(summary.region_mobility[0].region, "Madrid");
        assert_eq!(summary.region_mobility[1].region, "Galicia");
    }
}
