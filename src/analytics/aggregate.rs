use std::collections::HashSet;

use crate::analytics::types::{
    CongestionConsistency, DerivedRouteAnalytics, RouteInput, RunLevelAnalytics,
};
use crate::analytics::utility::{mean, round_to, spread, variance};

/// Reduces the derived routes of one run into a single [`RunLevelAnalytics`].
///
/// An empty `routes` list yields the zeroed default record. Fastest and safest
/// are the first route holding the minimum, scanning left to right.
pub fn derive_run_level_analytics(
    routes: &[RouteInput],
    derived: &[DerivedRouteAnalytics],
) -> RunLevelAnalytics {
    if routes.is_empty() {
        return RunLevelAnalytics::default();
    }
    let Some(first) = derived.first() else {
        return RunLevelAnalytics::default();
    };

    let delays: Vec<f64> = derived.iter().map(|d| d.predicted_delay_min).collect();
    let average_delay = mean(&delays);
    let delay_variance = variance(&delays, average_delay);

    let risk_scores: Vec<f64> = derived.iter().map(|d| d.risk_score).collect();

    let fastest = derived.iter().fold(first, |best, d| {
        if d.predicted_time_min < best.predicted_time_min {
            d
        } else {
            best
        }
    });
    let safest = derived.iter().fold(first, |best, d| {
        if d.risk_score < best.risk_score {
            d
        } else {
            best
        }
    });

    RunLevelAnalytics {
        total_routes: routes.len(),
        fastest_route_id: fastest.route_id.clone(),
        fastest_route_name: fastest.name.clone(),
        safest_route_id: safest.route_id.clone(),
        safest_route_name: safest.name.clone(),
        average_delay: round_to(average_delay, 2),
        delay_variance: round_to(delay_variance, 2),
        risk_spread_across_routes: round_to(spread(&risk_scores), 2),
        congestion_consistency_indicator: congestion_consistency(derived, routes.len()),
    }
}

/// Classifies congestion labels (case-insensitive) against the run's route count.
pub fn congestion_consistency(
    derived: &[DerivedRouteAnalytics],
    total_routes: usize,
) -> CongestionConsistency {
    let unique: HashSet<String> = derived
        .iter()
        .map(|d| d.congestion_level.to_lowercase())
        .collect();

    match unique.len() {
        0 => CongestionConsistency::Undetermined,
        1 => CongestionConsistency::Consistent,
        n if n == total_routes => CongestionConsistency::Varied,
        _ => CongestionConsistency::Mixed,
    }
}
