//! # Qnet Core
//!
//! Analytic performance evaluation of open multi-class queueing
//! networks (Jackson-type networks of exponential servers with
//! probabilistic routing).
//!
//! This library provides:
//! - Dense matrix/vector containers with structural edit operations
//! - A Gaussian-elimination solver for the traffic balance equations
//! - Enumeration of all simple paths between two routing-graph nodes
//! - The staged characteristic pipeline: visit ratios, utilizations,
//!   waiting/sojourn times, queue lengths, path transition
//!   probabilities, path-integrated characteristics and the
//!   hypoexponential transit-time density
//! - A declarative network-description format (CLI input)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`numeric`] - `Vector` and `Matrix` storage substrate
//! - [`solver`] - pivotless Gaussian elimination
//! - [`graph`] - simple-path enumeration over the routing graph
//! - [`model`] - network specification and the computation pipeline
//! - [`config`] - network-description parsing and link capacities
//!
//! ## Usage
//!
//! ```no_run
//! use qnet_core::{config, NetworkModel};
//!
//! let mut rng = rand::thread_rng();
//! let spec = config::parse("network t\n...", 0, 2, &mut rng)?;
//! let model = NetworkModel::evaluate(spec)?;
//! println!("visit ratios: {}", model.e[0]);
//! # Ok::<(), qnet_core::QnetError>(())
//! ```
//!
//! ## Computation method
//!
//! For each traffic class the per-node visit ratios come from the
//! balance equations of the routing chain, solved by Gaussian
//! elimination; utilizations follow as `lambda_bar / mu` and must stay
//! below 1 for a steady state to exist. Stationary characteristics use
//! the pooled M/M/1 waiting-time formula and Little's law; path-level
//! characteristics weight per-node values by normalized path
//! probabilities over all enumerated simple paths.

pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod numeric;
pub mod solver;

// Re-export main types for convenience
pub use error::{QnetError, Result};
pub use model::{NetworkModel, NetworkSpec};
pub use numeric::{Matrix, Vector};

/// Tolerance for routing-matrix row sums.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;
