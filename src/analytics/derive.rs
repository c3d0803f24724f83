use std::cmp::Ordering;

use crate::analytics::types::{DerivedRouteAnalytics, ResolvedRoute, RouteInput};
use crate::analytics::utility::{ratio, round_to};
use crate::config::AnalyticsConfig;

/// Derives one [`DerivedRouteAnalytics`] per input route, in input order.
///
/// Risk and congestion ranks are 1-based positions in a stable ascending sort,
/// so equal values keep their input order and never share a rank.
pub fn derive_route_analytics(
    routes: &[RouteInput],
    config: &AnalyticsConfig,
) -> Vec<DerivedRouteAnalytics> {
    if routes.is_empty() {
        return Vec::new();
    }

    let resolved: Vec<ResolvedRoute> = routes
        .iter()
        .enumerate()
        .map(|(idx, route)| route.resolve(idx))
        .collect();

    let best_time = resolved
        .iter()
        .map(|r| r.predicted_time_min)
        .fold(f64::INFINITY, f64::min);

    let risk_ranks = positional_ranks(&resolved, |a, b| {
        a.risk_score
            .partial_cmp(&b.risk_score)
            .unwrap_or(Ordering::Equal)
    });
    let congestion_ranks = positional_ranks(&resolved, |a, b| {
        config
            .congestion_severity(&a.congestion_level)
            .cmp(&config.congestion_severity(&b.congestion_level))
    });

    resolved
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            let delay_pct = ratio(r.predicted_delay_min, r.base_time_min) * 100.0;
            let time_saved = r.predicted_time_min - best_time;
            let efficiency = ratio(r.distance_km, r.predicted_time_min);

            DerivedRouteAnalytics {
                rank: r.rank,
                route_id: format!("route_{}", r.rank),
                name: r.name,
                distance_km: r.distance_km,
                base_time_min: r.base_time_min,
                predicted_delay_min: r.predicted_delay_min,
                predicted_time_min: r.predicted_time_min,
                risk: r.risk,
                congestion_level: r.congestion_level,
                risk_score: r.risk_score,
                delay_percentage: round_to(delay_pct, 2),
                time_saved_vs_best_route: round_to(time_saved, 2),
                efficiency_km_per_min: round_to(efficiency, 3),
                relative_risk_rank: risk_ranks[idx],
                relative_congestion_rank: congestion_ranks[idx],
            }
        })
        .collect()
}

/// Stable-sorts route indices with `compare` and returns each route's 1-based
/// position, indexed by input position.
fn positional_ranks<F>(routes: &[ResolvedRoute], mut compare: F) -> Vec<usize>
where
    F: FnMut(&ResolvedRoute, &ResolvedRoute) -> Ordering,
{
    let mut order: Vec<usize> = (0..routes.len()).collect();
    order.sort_by(|&a, &b| compare(&routes[a], &routes[b]));

    let mut ranks = vec![0; routes.len()];
    for (position, idx) in order.into_iter().enumerate() {
        ranks[idx] = position + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate::derive_run_level_analytics;
    use serde_json::{Value, json};

    fn inputs(value: Value) -> Vec<RouteInput> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(RouteInput::from_value)
            .collect()
    }

    fn derive(value: Value) -> Vec<DerivedRouteAnalytics> {
        derive_route_analytics(&inputs(value), &AnalyticsConfig::default())
    }

    #[test]
    fn test_empty_routes() {
        assert!(derive(json!([])).is_empty());
    }

    #[test]
    fn test_two_route_scenario() {
        let derived = derive(json!([
            {"name": "A", "distance_km": 10, "base_time_min": 20, "predicted_delay_min": 5,
             "riskScore": 10, "congestionLevel": "Light", "rank": 1},
            {"name": "B", "distance_km": 12, "base_time_min": 25, "predicted_delay_min": 15,
             "riskScore": 40, "congestionLevel": "Heavy", "rank": 2}
        ]));

        assert_eq!(derived.len(), 2);

        let a = &derived[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.route_id, "route_1");
        assert_eq!(a.predicted_time_min, 25.0);
        assert_eq!(a.delay_percentage, 25.0);
        assert_eq!(a.time_saved_vs_best_route, 0.0);
        assert_eq!(a.efficiency_km_per_min, 0.4);
        assert_eq!(a.relative_risk_rank, 1);
        assert_eq!(a.relative_congestion_rank, 1);

        let b = &derived[1];
        assert_eq!(b.name, "B");
        assert_eq!(b.predicted_time_min, 40.0);
        assert_eq!(b.delay_percentage, 60.0);
        assert_eq!(b.time_saved_vs_best_route, 15.0);
        assert_eq!(b.efficiency_km_per_min, 0.3);
        assert_eq!(b.relative_risk_rank, 2);
        assert_eq!(b.relative_congestion_rank, 2);
    }

    #[test]
    fn test_preserves_input_order() {
        let derived = derive(json!([
            {"name": "slow", "predicted_time_min": 50},
            {"name": "fast", "predicted_time_min": 10},
            {"name": "mid", "predicted_time_min": 30}
        ]));
        let names: Vec<_> = derived.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["slow", "fast", "mid"]);
        assert_eq!(derived[1].time_saved_vs_best_route, 0.0);
        assert_eq!(derived[0].time_saved_vs_best_route, 40.0);
    }

    #[test]
    fn test_risk_ranks_follow_stable_sort() {
        let derived = derive(json!([
            {"riskScore": 50}, {"riskScore": 10}, {"riskScore": 30}
        ]));
        let ranks: Vec<_> = derived.iter().map(|d| d.relative_risk_rank).collect();
        assert_eq!(ranks, [3, 1, 2]);
    }

    #[test]
    fn test_risk_rank_ties_keep_input_order() {
        let derived = derive(json!([
            {"riskScore": 20}, {"riskScore": 5}, {"riskScore": 20}
        ]));
        let ranks: Vec<_> = derived.iter().map(|d| d.relative_risk_rank).collect();
        assert_eq!(ranks, [2, 1, 3]);
    }

    #[test]
    fn test_signed_zero_risk_scores_tie() {
        let routes: Vec<RouteInput> = serde_json::from_str::<Value>(
            r#"[{"name": "first", "riskScore": 0}, {"name": "second", "riskScore": -0.0}]"#,
        )
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(RouteInput::from_value)
        .collect();
        assert_eq!(routes[1].risk_score.map(f64::is_sign_negative), Some(true));

        let derived = derive_route_analytics(&routes, &AnalyticsConfig::default());
        let ranks: Vec<_> = derived.iter().map(|d| d.relative_risk_rank).collect();
        assert_eq!(ranks, [1, 2]);

        let run = derive_run_level_analytics(&routes, &derived);
        assert_eq!(run.safest_route_name, "first");
    }

    #[test]
    fn test_congestion_ranks_put_unrecognized_last() {
        let derived = derive(json!([
            {"congestionLevel": "Gridlock"},
            {"congestionLevel": "HEAVY"},
            {"congestionLevel": "light"},
            {"congestionLevel": "Moderate"}
        ]));
        let ranks: Vec<_> = derived.iter().map(|d| d.relative_congestion_rank).collect();
        assert_eq!(ranks, [4, 3, 1, 2]);
    }

    #[test]
    fn test_zero_base_time_has_zero_delay_percentage() {
        let derived = derive(json!([{"base_time_min": 0, "predicted_delay_min": 12}]));
        assert_eq!(derived[0].delay_percentage, 0.0);
        assert_eq!(derived[0].predicted_time_min, 12.0);
    }

    #[test]
    fn test_zero_total_time_has_zero_efficiency() {
        let derived = derive(json!([{"distance_km": 8}]));
        assert_eq!(derived[0].efficiency_km_per_min, 0.0);
    }

    #[test]
    fn test_single_route_without_labels() {
        let derived = derive(json!([{"name": "Solo", "base_time_min": 30}]));
        let solo = &derived[0];
        assert_eq!(solo.risk, "Unknown");
        assert_eq!(solo.congestion_level, "Unknown");
        assert_eq!(solo.risk_score, 0.0);
        assert_eq!(solo.rank, 1);
        assert_eq!(solo.relative_risk_rank, 1);
        assert_eq!(solo.relative_congestion_rank, 1);
    }

    #[test]
    fn test_rounding() {
        let derived = derive(json!([
            {"distance_km": 10, "base_time_min": 3, "predicted_delay_min": 1, "predicted_time_min": 3},
            {"distance_km": 10, "base_time_min": 3, "predicted_delay_min": 1, "predicted_time_min": 3.333}
        ]));
        assert_eq!(derived[0].delay_percentage, 33.33);
        assert_eq!(derived[0].efficiency_km_per_min, 3.333);
        assert_eq!(derived[1].time_saved_vs_best_route, 0.33);
    }

    #[test]
    fn test_custom_congestion_order() {
        let config = AnalyticsConfig {
            congestion_order: vec!["heavy".to_string(), "light".to_string()],
            ..AnalyticsConfig::default()
        };
        let routes = inputs(json!([
            {"congestionLevel": "Light"}, {"congestionLevel": "Heavy"}
        ]));
        let derived = derive_route_analytics(&routes, &config);
        assert_eq!(derived[0].relative_congestion_rank, 2);
        assert_eq!(derived[1].relative_congestion_rank, 1);
    }
}
