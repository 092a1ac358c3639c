//! Staged computation of the network characteristics.

use log::{debug, info};

use super::NetworkSpec;
use crate::error::{QnetError, Result};
use crate::graph::enumerate_paths;
use crate::numeric::{Matrix, Vector};
use crate::solver;

/// An evaluated queueing network.
///
/// Built by [`NetworkModel::evaluate`], which runs the stages in strict
/// order: traffic equations per class, utilization with the stability
/// check, stationary probability-time characteristics, path enumeration
/// with transition probabilities, and the path-integrated
/// characteristics. Any stage failure aborts the rest; a model either
/// carries the complete result set or is never constructed.
#[derive(Debug)]
pub struct NetworkModel {
    /// The validated input the model was built from
    pub spec: NetworkSpec,

    /// Total exogenous arrival rate per class
    pub lambda0: Vector,

    /// External-arrival distribution per class (virtual sink prepended)
    pub input_intensity: Vec<Vector>,

    /// Visit ratios per class
    pub e: Vec<Vector>,

    /// Total arrival rate per node and class
    pub lambda_bar: Vec<Vector>,

    /// Utilization per node and class
    pub ro_bar: Vec<Vector>,

    /// Pooled utilization per node
    pub ro_total: Vector,

    /// Mean waiting time per node, pooled over classes
    pub ws: Vector,

    /// Mean sojourn time per node and class
    pub us: Vec<Vector>,

    /// Mean queue length per node and class (Little's law)
    pub ls: Vec<Vector>,

    /// Mean number in system per node and class
    pub ns: Vec<Vector>,

    /// All simple paths from the start node to the target node
    pub paths: Vec<Vec<usize>>,

    /// Conditional probability of each enumerated path
    pub transition_probabilities: Vec<f64>,

    /// Path-integrated waiting time
    pub wi: f64,

    /// Path-integrated sojourn time per class
    pub ui: Vec<f64>,

    /// Path-integrated queue length per class
    pub li: Vec<f64>,

    /// Path-integrated number in system per class
    pub ni: Vec<f64>,
}

impl NetworkModel {
    /// Validate the specification and run the full pipeline.
    pub fn evaluate(spec: NetworkSpec) -> Result<Self> {
        spec.validate()?;
        info!(
            "evaluating network '{}': {} nodes, {} classes, path {} -> {}",
            spec.name,
            spec.nodes(),
            spec.classes(),
            spec.start_node,
            spec.target_node
        );

        let mut model = Self {
            spec,
            lambda0: Vector::default(),
            input_intensity: Vec::new(),
            e: Vec::new(),
            lambda_bar: Vec::new(),
            ro_bar: Vec::new(),
            ro_total: Vector::default(),
            ws: Vector::default(),
            us: Vec::new(),
            ls: Vec::new(),
            ns: Vec::new(),
            paths: Vec::new(),
            transition_probabilities: Vec::new(),
            wi: 0.0,
            ui: Vec::new(),
            li: Vec::new(),
            ni: Vec::new(),
        };

        model.compute_traffic()?;
        model.check_stability()?;
        model.compute_stationary();
        model.compute_paths()?;
        model.compute_integrated();

        Ok(model)
    }

    /// Stage 1: per-class traffic balance equations,
    /// `lambda_bar = e * lambda0`.
    fn compute_traffic(&mut self) -> Result<()> {
        self.lambda0 = self.spec.lambda.iter().map(Vector::sum).collect();

        for class in 0..self.spec.classes() {
            let mut intensity = self.spec.lambda[class].clone();
            intensity.insert(0, 0.0);
            let intensity = intensity.scale(1.0 / self.lambda0[class]);

            let e = solver::solve(self.balance_matrix(class, &intensity)?)?;
            if e.has_nan() {
                return Err(QnetError::Degenerate { class });
            }
            debug!("class {class}: visit ratios {e}");

            self.lambda_bar.push(e.scale(self.lambda0[class]));
            self.e.push(e);
            self.input_intensity.push(intensity);
        }

        Ok(())
    }

    /// Build the augmented balance system of one class: prepend the
    /// virtual arrival row, transpose, drop the virtual row, append the
    /// negated sink column as RHS, drop the sink column and set the
    /// diagonal to -1 (which also excludes self-routing terms).
    fn balance_matrix(&self, class: usize, intensity: &Vector) -> Result<Matrix> {
        debug!("building balance equations for class {class}");

        let mut matrix = self.spec.routing.clone();
        matrix.insert_row(0, intensity.clone())?;
        matrix.transpose();
        matrix.remove_row(0)?;
        let rhs = matrix.column(0)?.negate();
        matrix.push_column(&rhs)?;
        matrix.remove_column(0)?;
        matrix.set_diagonal(-1.0);

        Ok(matrix)
    }

    /// Stage 2: utilizations; any value at or above 1 means the network
    /// never reaches steady state.
    fn check_stability(&mut self) -> Result<()> {
        self.ro_total = Vector::zeros(self.spec.nodes());

        for class in 0..self.spec.classes() {
            let ro_bar = self.lambda_bar[class].div(&self.spec.mu[class]);
            if let Some(node) = (0..ro_bar.len()).find(|&i| ro_bar[i] >= 1.0) {
                return Err(QnetError::Instability {
                    node,
                    utilization: ro_bar[node],
                });
            }
            self.ro_total = self.ro_total.add(&ro_bar);
            self.ro_bar.push(ro_bar);
        }

        if let Some(node) = (0..self.ro_total.len()).find(|&i| self.ro_total[i] >= 1.0) {
            return Err(QnetError::Instability {
                node,
                utilization: self.ro_total[node],
            });
        }

        debug!("utilization per node: {}", self.ro_total);
        Ok(())
    }

    /// Stage 3: stationary probability-time characteristics.
    fn compute_stationary(&mut self) {
        self.ws = (0..self.spec.nodes())
            .map(|i| {
                let pooled: f64 = (0..self.spec.classes())
                    .map(|s| self.ro_bar[s][i] / self.spec.mu[s][i])
                    .sum();
                pooled / (1.0 - self.ro_total[i])
            })
            .collect();

        for class in 0..self.spec.classes() {
            let us = self.ws.add(&self.spec.mu[class].powf(-1.0));
            self.ls.push(self.lambda_bar[class].mul(&self.ws));
            self.ns.push(self.lambda_bar[class].mul(&us));
            self.us.push(us);
        }
    }

    /// Stage 4: enumerate start -> target paths on the routing matrix
    /// with the sink column removed and normalize the raw edge-product
    /// probabilities over the enumerated set.
    fn compute_paths(&mut self) -> Result<()> {
        let routing = self.node_routing()?;
        self.paths = enumerate_paths(&routing, self.spec.start_node, self.spec.target_node)?;
        debug!("{} simple paths enumerated", self.paths.len());

        let raw: Vec<f64> = self
            .paths
            .iter()
            .map(|path| {
                path.windows(2)
                    .map(|pair| routing[(pair[0], pair[1])])
                    .product()
            })
            .collect();
        let total: f64 = raw.iter().sum();
        self.transition_probabilities = raw.iter().map(|p| p / total).collect();

        Ok(())
    }

    /// Stage 5: integrated characteristics over the enumerated paths.
    fn compute_integrated(&mut self) {
        self.wi = self.integrate(&self.ws);
        for class in 0..self.spec.classes() {
            self.ui.push(self.integrate(&self.us[class]));
            self.li.push(self.integrate(&self.ls[class]));
            self.ni.push(self.integrate(&self.ns[class]));
        }
    }

    /// `c[start] + c[target] + sum over paths of tp * (sum of c at the
    /// interior nodes)`.
    fn integrate(&self, characteristic: &Vector) -> f64 {
        let endpoints =
            characteristic[self.spec.start_node] + characteristic[self.spec.target_node];

        endpoints
            + self
                .paths
                .iter()
                .zip(&self.transition_probabilities)
                .map(|(path, tp)| {
                    let interior: f64 = path[1..path.len() - 1]
                        .iter()
                        .map(|&node| characteristic[node])
                        .sum();
                    tp * interior
                })
                .sum::<f64>()
    }

    /// The routing matrix restricted to node columns (sink removed),
    /// square over the node indices.
    pub(crate) fn node_routing(&self) -> Result<Matrix> {
        let mut routing = self.spec.routing.clone();
        routing.remove_column(0)?;
        Ok(routing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Deterministic 3-node tandem: 0 -> 1 -> 2 -> sink.
    fn tandem_spec() -> NetworkSpec {
        NetworkSpec {
            name: "tandem".to_string(),
            routing: Matrix::from_rows(vec![
                Vector::from(vec![0.0, 0.0, 1.0, 0.0]),
                Vector::from(vec![0.0, 0.0, 0.0, 1.0]),
                Vector::from(vec![1.0, 0.0, 0.0, 0.0]),
            ])
            .unwrap(),
            lambda: vec![
                Vector::from(vec![5.0, 5.0, 5.0]),
                Vector::from(vec![2.0, 2.0, 2.0]),
            ],
            mu: vec![
                Vector::from(vec![100.0, 100.0, 100.0]),
                Vector::from(vec![80.0, 80.0, 80.0]),
            ],
            start_node: 0,
            target_node: 2,
        }
    }

    #[test]
    fn test_visit_ratios_satisfy_balance() {
        let model = NetworkModel::evaluate(tandem_spec()).unwrap();

        // arrivals split evenly, each node feeds the next:
        // e = [1/3, 2/3, 1]
        let e = &model.e[0];
        assert_relative_eq!(e[0], 1.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(e[1], 2.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(e[2], 1.0, epsilon = 1e-9);

        assert_relative_eq!(model.lambda0[0], 15.0);
        assert_relative_eq!(model.lambda_bar[0][2], 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_end_to_end_single_path() {
        let model = NetworkModel::evaluate(tandem_spec()).unwrap();

        assert_eq!(model.paths, vec![vec![0, 1, 2]]);
        assert_eq!(model.transition_probabilities.len(), 1);
        assert_relative_eq!(model.transition_probabilities[0], 1.0, epsilon = 1e-12);

        for class in 0..2 {
            for node in 0..3 {
                let ro = model.ro_bar[class][node];
                assert!(ro > 0.0 && ro < 1.0, "ro_bar[{class}][{node}] = {ro}");
            }
        }
    }

    #[test]
    fn test_littles_law() {
        let model = NetworkModel::evaluate(tandem_spec()).unwrap();

        for class in 0..2 {
            for node in 0..3 {
                assert_relative_eq!(
                    model.ls[class][node],
                    model.lambda_bar[class][node] * model.ws[node],
                    epsilon = 1e-12
                );
                assert_relative_eq!(
                    model.ns[class][node],
                    model.lambda_bar[class][node] * model.us[class][node],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_sojourn_adds_service_time() {
        let model = NetworkModel::evaluate(tandem_spec()).unwrap();
        for class in 0..2 {
            for node in 0..3 {
                assert_relative_eq!(
                    model.us[class][node],
                    model.ws[node] + 1.0 / model.spec.mu[class][node],
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_unstable_network_rejected() {
        let mut spec = tandem_spec();
        // node 2 sees all 15 arrivals/ms of class 0 but serves only 12
        spec.mu[0] = Vector::from(vec![12.0, 12.0, 12.0]);
        assert!(matches!(
            NetworkModel::evaluate(spec),
            Err(QnetError::Instability { .. })
        ));
    }

    #[test]
    fn test_pooled_instability_rejected() {
        let mut spec = tandem_spec();
        // each class alone stays below 1, the pool does not
        spec.mu[0] = Vector::from(vec![100.0, 100.0, 16.0]);
        spec.mu[1] = Vector::from(vec![80.0, 80.0, 10.0]);
        assert!(matches!(
            NetworkModel::evaluate(spec),
            Err(QnetError::Instability { node: 2, .. })
        ));
    }

    #[test]
    fn test_transition_probabilities_sum_to_one() {
        // diamond: 0 -> {1, 2} -> 3 -> sink, unequal branch weights
        let spec = NetworkSpec {
            name: "diamond".to_string(),
            routing: Matrix::from_rows(vec![
                Vector::from(vec![0.0, 0.0, 0.7, 0.3, 0.0]),
                Vector::from(vec![0.0, 0.0, 0.0, 0.0, 1.0]),
                Vector::from(vec![0.0, 0.0, 0.0, 0.0, 1.0]),
                Vector::from(vec![1.0, 0.0, 0.0, 0.0, 0.0]),
            ])
            .unwrap(),
            lambda: vec![Vector::from(vec![4.0, 0.0, 0.0, 0.0])],
            mu: vec![Vector::from(vec![50.0, 50.0, 50.0, 50.0])],
            start_node: 0,
            target_node: 3,
        };
        let model = NetworkModel::evaluate(spec).unwrap();

        assert_eq!(model.paths.len(), 2);
        let total: f64 = model.transition_probabilities.iter().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        // branch weights survive normalization
        let heavier = model.transition_probabilities.iter().cloned().fold(0.0, f64::max);
        assert_relative_eq!(heavier, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_integrated_includes_endpoints() {
        let model = NetworkModel::evaluate(tandem_spec()).unwrap();
        // single path with tp = 1: wi = ws[0] + ws[1] + ws[2]
        assert_relative_eq!(
            model.wi,
            model.ws[0] + model.ws[1] + model.ws[2],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_nan_service_rate_never_reaches_results() {
        // a NaN rate must fail validation up front, not flow through
        // the stages into a "complete" model of NaN characteristics
        let mut spec = tandem_spec();
        spec.mu[0][1] = f64::NAN;
        assert!(matches!(
            NetworkModel::evaluate(spec),
            Err(QnetError::ServiceRate { class: 0, node: 1, .. })
        ));
    }

    #[test]
    fn test_closed_loop_routing_is_degenerate() {
        // 0 -> 1 -> 0 with no exit: the balance system is singular and
        // the solver reports it through an all-NaN vector, which the
        // pipeline promotes to an error
        let spec = NetworkSpec {
            name: "closed-loop".to_string(),
            routing: Matrix::from_rows(vec![
                Vector::from(vec![0.0, 0.0, 1.0]),
                Vector::from(vec![0.0, 1.0, 0.0]),
            ])
            .unwrap(),
            lambda: vec![Vector::from(vec![1.0, 1.0])],
            mu: vec![Vector::from(vec![100.0, 100.0])],
            start_node: 0,
            target_node: 1,
        };
        assert!(matches!(
            NetworkModel::evaluate(spec),
            Err(QnetError::Degenerate { class: 0 })
        ));
    }
}
