//! # Performance Report
//!
//! Per-task report: total duration, per-agent summaries, bottlenecks and
//! heuristic recommendations.

use serde::{Deserialize, Serialize};

use super::AgentPerformanceSummary;
use crate::config::PerformanceConfig;
use crate::constants::performance::WITHIN_EXPECTED_PARAMETERS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub task_id: String,
    /// Sum of the durations of this task's samples
    pub total_duration_ms: u64,
    /// One summary per distinct agent in the task, in first-seen order
    pub agent_metrics: Vec<AgentPerformanceSummary>,
    /// Slowest agents by average duration, slowest first
    pub bottlenecks: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PerformanceReport {
    pub fn metrics_for(&self, agent_name: &str) -> Option<&AgentPerformanceSummary> {
        self.agent_metrics.iter().find(|m| m.agent_name == agent_name)
    }

    pub fn is_within_expected_parameters(&self) -> bool {
        self.recommendations.len() == 1 && self.recommendations[0] == WITHIN_EXPECTED_PARAMETERS
    }
}

/// Top `ceil(fraction * n)` agents by average duration, ties in input order
pub fn identify_bottlenecks(metrics: &[AgentPerformanceSummary], fraction: f64) -> Vec<String> {
    if metrics.is_empty() {
        return Vec::new();
    }

    let take = ((metrics.len() as f64) * fraction).ceil() as usize;
    let mut ranked: Vec<&AgentPerformanceSummary> = metrics.iter().collect();
    ranked.sort_by(|a, b| b.average_duration_ms.total_cmp(&a.average_duration_ms));

    ranked
        .into_iter()
        .take(take.min(metrics.len()))
        .map(|m| m.agent_name.clone())
        .collect()
}

pub fn generate_recommendations(
    metrics: &[AgentPerformanceSummary],
    bottlenecks: &[String],
    config: &PerformanceConfig,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    for name in bottlenecks {
        let Some(summary) = metrics.iter().find(|m| &m.agent_name == name) else {
            continue;
        };
        if summary.average_duration_ms > config.slow_average_threshold_ms as f64 {
            recommendations.push(format!(
                "{name}: average duration is very high ({:.2}s). Consider optimization or caching.",
                summary.average_duration_ms / 1000.0
            ));
        }
    }

    for summary in metrics {
        let failure_rate = summary.failure_rate();
        if failure_rate > config.failure_rate_threshold {
            recommendations.push(format!(
                "{}: high failure rate ({:.1}%). Review error handling and retry logic.",
                summary.agent_name,
                failure_rate * 100.0
            ));
        }
    }

    for summary in metrics {
        if summary.total_executions < config.variability_min_executions {
            continue;
        }
        // A zero minimum makes any non-zero maximum infinitely variable;
        // 0/0 is NaN and never exceeds the threshold
        let ratio = summary.max_duration_ms as f64 / summary.min_duration_ms as f64;
        if ratio > config.variability_ratio_threshold {
            recommendations.push(format!(
                "{}: high duration variability ({:.1}x). May indicate external dependencies or resource contention.",
                summary.agent_name, ratio
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push(WITHIN_EXPECTED_PARAMETERS.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, avg: f64, total: usize, failed: usize, min: u64, max: u64) -> AgentPerformanceSummary {
        AgentPerformanceSummary {
            agent_name: name.to_string(),
            total_executions: total,
            successful_executions: total - failed,
            failed_executions: failed,
            average_duration_ms: avg,
            min_duration_ms: min,
            max_duration_ms: max,
            p50_duration_ms: min,
            p95_duration_ms: max,
            p99_duration_ms: max,
        }
    }

    #[test]
    fn test_bottleneck_count_rounds_up() {
        let metrics = vec![
            summary("a", 100.0, 1, 0, 100, 100),
            summary("b", 300.0, 1, 0, 300, 300),
            summary("c", 200.0, 1, 0, 200, 200),
            summary("d", 50.0, 1, 0, 50, 50),
        ];
        // ceil(0.3 * 4) = 2
        assert_eq!(identify_bottlenecks(&metrics, 0.3), vec!["b", "c"]);
        assert_eq!(identify_bottlenecks(&metrics[..1], 0.3), vec!["a"]);
        assert!(identify_bottlenecks(&[], 0.3).is_empty());
    }

    #[test]
    fn test_bottleneck_ties_keep_input_order() {
        let metrics = vec![
            summary("first", 10.0, 1, 0, 10, 10),
            summary("second", 10.0, 1, 0, 10, 10),
        ];
        assert_eq!(identify_bottlenecks(&metrics, 0.3), vec!["first"]);
    }

    #[test]
    fn test_healthy_metrics_are_within_expected_parameters() {
        let metrics = vec![summary("a", 100.0, 3, 0, 90, 110)];
        let recs = generate_recommendations(&metrics, &["a".to_string()], &PerformanceConfig::default());
        assert_eq!(recs, vec![WITHIN_EXPECTED_PARAMETERS.to_string()]);
    }

    #[test]
    fn test_slow_bottleneck_recommendation() {
        let metrics = vec![summary("slow-agent", 12_500.0, 1, 0, 12_500, 12_500)];
        let recs = generate_recommendations(
            &metrics,
            &["slow-agent".to_string()],
            &PerformanceConfig::default(),
        );
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("slow-agent"));
        assert!(recs[0].contains("12.50s"));
    }

    #[test]
    fn test_slow_agent_outside_bottlenecks_is_not_flagged() {
        let metrics = vec![summary("slow-agent", 12_500.0, 1, 0, 12_500, 12_500)];
        let recs = generate_recommendations(&metrics, &[], &PerformanceConfig::default());
        assert_eq!(recs, vec![WITHIN_EXPECTED_PARAMETERS.to_string()]);
    }

    #[test]
    fn test_failure_rate_recommendation() {
        let metrics = vec![summary("flaky-agent", 10.0, 4, 1, 10, 10)];
        let recs = generate_recommendations(&metrics, &[], &PerformanceConfig::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("25.0%"));
    }

    #[test]
    fn test_variability_requires_minimum_executions() {
        let config = PerformanceConfig::default();
        let few = vec![summary("a", 100.0, 4, 0, 10, 1000)];
        assert_eq!(
            generate_recommendations(&few, &[], &config),
            vec![WITHIN_EXPECTED_PARAMETERS.to_string()]
        );

        let enough = vec![summary("a", 100.0, 5, 0, 10, 1000)];
        let recs = generate_recommendations(&enough, &[], &config);
        assert!(recs[0].contains("100.0x"));
    }

    #[test]
    fn test_zero_minimum_with_nonzero_maximum_is_flagged() {
        let metrics = vec![summary("a", 3.0, 5, 0, 0, 3)];
        let recs = generate_recommendations(&metrics, &[], &PerformanceConfig::default());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("a: high duration variability (inf"));
    }

    #[test]
    fn test_all_zero_durations_are_not_variable() {
        let metrics = vec![summary("a", 0.0, 5, 0, 0, 0)];
        let recs = generate_recommendations(&metrics, &[], &PerformanceConfig::default());
        assert_eq!(recs, vec![WITHIN_EXPECTED_PARAMETERS.to_string()]);
    }
}
