//! Transit-time probability density along a fixed path.
//!
//! A job crossing a path sees a tandem of independent exponential
//! stages; with distinct effective rates `d = mu - lambda_bar` the
//! total transit time follows the hypoexponential (generalized Erlang)
//! distribution:
//!
//! ```text
//! f(t) = sum_i h_i * d_i * exp(-d_i * t)
//! h_i  = prod_{k != i} d_k / (d_k - d_i)
//! ```
//!
//! The formula has a pole when two stages share one effective rate, so
//! a repeated rate is rejected up front instead of dividing by zero.

use log::debug;

use super::NetworkModel;
use crate::error::{QnetError, Result};

impl NetworkModel {
    /// Sample the transit-time density of `class` along `path` at every
    /// point of the time grid, in grid order.
    ///
    /// `path` must hold at least two distinct in-range nodes; the
    /// effective rates of its nodes must be pairwise distinct.
    pub fn transit_time_density(
        &self,
        path: &[usize],
        class: usize,
        times: &[f64],
    ) -> Result<Vec<f64>> {
        let rates = self.effective_rates(path, class)?;
        debug!(
            "sampling density for class {class} over {} nodes at {} grid points",
            path.len(),
            times.len()
        );

        Ok(times
            .iter()
            .map(|&t| {
                rates
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| coefficient(&rates, i) * d * (-d * t).exp())
                    .sum()
            })
            .collect())
    }

    /// Effective rates `mu - lambda_bar` of the path nodes, with all
    /// argument checking for a density request.
    fn effective_rates(&self, path: &[usize], class: usize) -> Result<Vec<f64>> {
        if class >= self.spec.classes() {
            return Err(QnetError::Class {
                class,
                classes: self.spec.classes(),
            });
        }
        if path.len() < 2 {
            return Err(QnetError::PathEndpoints {
                node: path.first().copied().unwrap_or(0),
            });
        }
        for &node in path {
            if node >= self.spec.nodes() {
                return Err(QnetError::index("density path node", node, self.spec.nodes()));
            }
        }

        let rates: Vec<f64> = path
            .iter()
            .map(|&node| self.spec.mu[class][node] - self.lambda_bar[class][node])
            .collect();

        for i in 0..rates.len() {
            for j in i + 1..rates.len() {
                if rates[i] == rates[j] {
                    return Err(QnetError::RepeatedRate {
                        first: path[i],
                        second: path[j],
                        rate: rates[i],
                    });
                }
            }
        }

        Ok(rates)
    }
}

/// `h_i` of the hypoexponential density.
fn coefficient(rates: &[f64], i: usize) -> f64 {
    rates
        .iter()
        .enumerate()
        .filter(|&(k, _)| k != i)
        .map(|(_, &d)| d / (d - rates[i]))
        .product()
}
