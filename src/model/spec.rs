//! Validated network specification.

use crate::error::{QnetError, Result};
use crate::numeric::{Matrix, Vector};
use crate::ROW_SUM_TOLERANCE;

/// The structured input of the analyzer.
///
/// `routing` has one row per node and `nodes + 1` columns: column 0 is
/// the virtual sink (the probability of leaving the network), columns
/// `1..=nodes` are the nodes themselves. Every row, sink included, must
/// sum to 1. Diagonal self-routing entries are tolerated here; the
/// traffic-equation builder excludes them structurally.
///
/// `lambda[class]` and `mu[class]` carry the exogenous arrival rate and
/// the service rate per node for one traffic class.
#[derive(Debug, Clone)]
pub struct NetworkSpec {
    pub name: String,
    pub routing: Matrix,
    pub lambda: Vec<Vector>,
    pub mu: Vec<Vector>,
    pub start_node: usize,
    pub target_node: usize,
}

impl NetworkSpec {
    /// Number of service nodes.
    pub fn nodes(&self) -> usize {
        self.routing.row_count()
    }

    /// Number of traffic classes.
    pub fn classes(&self) -> usize {
        self.lambda.len()
    }

    /// Check every structural invariant before anything reaches the
    /// solver: matrix shape, row sums, rate vector lengths, rate signs
    /// and the start/target pair.
    pub fn validate(&self) -> Result<()> {
        let nodes = self.nodes();
        if self.routing.col_count() != nodes + 1 {
            return Err(QnetError::shape(
                "routing matrix columns",
                nodes + 1,
                self.routing.col_count(),
            ));
        }

        for (r, row) in self.routing.iter_rows().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                // written so NaN fails too
                if !(value >= 0.0) {
                    return Err(QnetError::RoutingEntry {
                        row: r,
                        col: c,
                        value,
                    });
                }
            }
            let sum = row.sum();
            if !sum.is_finite() || (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(QnetError::RowSum { row: r, sum });
            }
        }

        if self.lambda.is_empty() || self.mu.len() != self.lambda.len() {
            return Err(QnetError::shape(
                "service rate classes",
                self.lambda.len().max(1),
                self.mu.len(),
            ));
        }

        for (class, (lambda, mu)) in self.lambda.iter().zip(self.mu.iter()).enumerate() {
            if lambda.len() != nodes {
                return Err(QnetError::shape("arrival rate vector", nodes, lambda.len()));
            }
            if mu.len() != nodes {
                return Err(QnetError::shape("service rate vector", nodes, mu.len()));
            }
            for (node, &rate) in mu.iter().enumerate() {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(QnetError::ServiceRate {
                        class,
                        node,
                        value: rate,
                    });
                }
            }
            for &rate in lambda.iter() {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(QnetError::ArrivalRate { class });
                }
            }
            if !(lambda.sum() > 0.0) {
                return Err(QnetError::ArrivalRate { class });
            }
        }

        if self.start_node >= nodes {
            return Err(QnetError::index("start node", self.start_node, nodes));
        }
        if self.target_node >= nodes {
            return Err(QnetError::index("target node", self.target_node, nodes));
        }
        if self.start_node == self.target_node {
            return Err(QnetError::PathEndpoints {
                node: self.start_node,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_spec() -> NetworkSpec {
        // 0 -> 1 -> 2 -> sink, deterministic
        NetworkSpec {
            name: "ring".to_string(),
            routing: Matrix::from_rows(vec![
                Vector::from(vec![0.0, 0.0, 1.0, 0.0]),
                Vector::from(vec![0.0, 0.0, 0.0, 1.0]),
                Vector::from(vec![1.0, 0.0, 0.0, 0.0]),
            ])
            .unwrap(),
            lambda: vec![Vector::from(vec![5.0, 5.0, 5.0])],
            mu: vec![Vector::from(vec![100.0, 100.0, 100.0])],
            start_node: 0,
            target_node: 2,
        }
    }

    #[test]
    fn test_valid_spec_passes() {
        ring_spec().validate().unwrap();
    }

    #[test]
    fn test_bad_row_sum_rejected() {
        let mut spec = ring_spec();
        spec.routing[(1, 3)] = 0.5;
        assert!(matches!(
            spec.validate(),
            Err(QnetError::RowSum { row: 1, .. })
        ));
    }

    #[test]
    fn test_row_sum_within_tolerance_passes() {
        let mut spec = ring_spec();
        spec.routing[(1, 3)] = 1.0 + 1e-12;
        spec.validate().unwrap();
    }

    #[test]
    fn test_negative_probability_rejected() {
        let mut spec = ring_spec();
        spec.routing[(0, 1)] = -0.5;
        spec.routing[(0, 2)] = 1.5;
        assert!(matches!(
            spec.validate(),
            Err(QnetError::RoutingEntry { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn test_nan_routing_entry_rejected() {
        let mut spec = ring_spec();
        spec.routing[(0, 2)] = f64::NAN;
        assert!(matches!(
            spec.validate(),
            Err(QnetError::RoutingEntry { row: 0, col: 2, .. })
        ));
    }

    #[test]
    fn test_infinite_routing_entry_rejected() {
        let mut spec = ring_spec();
        spec.routing[(0, 2)] = f64::INFINITY;
        // passes the sign check, the row sum catches it
        assert!(matches!(
            spec.validate(),
            Err(QnetError::RowSum { row: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_service_rate_rejected() {
        for bad in [f64::NAN, f64::INFINITY] {
            let mut spec = ring_spec();
            spec.mu[0][1] = bad;
            assert!(matches!(
                spec.validate(),
                Err(QnetError::ServiceRate { class: 0, node: 1, .. })
            ));
        }
    }

    #[test]
    fn test_nan_arrival_rate_rejected() {
        let mut spec = ring_spec();
        spec.lambda[0][0] = f64::NAN;
        assert!(matches!(spec.validate(), Err(QnetError::ArrivalRate { class: 0 })));
    }

    #[test]
    fn test_zero_service_rate_rejected() {
        let mut spec = ring_spec();
        spec.mu[0][1] = 0.0;
        assert!(matches!(
            spec.validate(),
            Err(QnetError::ServiceRate { class: 0, node: 1, .. })
        ));
    }

    #[test]
    fn test_zero_arrivals_rejected() {
        let mut spec = ring_spec();
        spec.lambda[0] = Vector::zeros(3);
        assert!(matches!(spec.validate(), Err(QnetError::ArrivalRate { class: 0 })));
    }

    #[test]
    fn test_equal_endpoints_rejected() {
        let mut spec = ring_spec();
        spec.target_node = 0;
        assert!(matches!(
            spec.validate(),
            Err(QnetError::PathEndpoints { node: 0 })
        ));
    }
}
