//! Error types for the qnet queueing-network analyzer.
//!
//! This module provides a unified error type [`QnetError`] that covers
//! all error conditions that can occur during configuration parsing,
//! network validation and characteristic computation.

use thiserror::Error;

/// Result type alias using [`QnetError`].
pub type Result<T> = std::result::Result<T, QnetError>;

/// Unified error type for all qnet operations.
#[derive(Error, Debug)]
pub enum QnetError {
    // ============ Container Errors ============
    /// Matrix constructed with a zero row or column count
    #[error("Matrix dimensions must be positive (got {rows}x{cols})")]
    Dimension { rows: usize, cols: usize },

    /// Row/column length does not match the opposite dimension
    #[error("Shape mismatch in {context}: expected length {expected}, got {actual}")]
    Shape {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Row/column/node index outside the valid range
    #[error("Index {index} out of range in {context} (valid range 0..{len})")]
    Index {
        context: &'static str,
        index: usize,
        len: usize,
    },

    // ============ Solver Errors ============
    /// Fewer equations than unknowns
    #[error("Underdetermined system: {equations} equations for {unknowns} unknowns")]
    Underdetermined { equations: usize, unknowns: usize },

    /// Traffic equations of a class solved to an all-NaN vector (zero pivot)
    #[error("Degenerate traffic equations for class {class}: routing matrix yields no unique visit ratios")]
    Degenerate { class: usize },

    // ============ Model Errors ============
    /// Routing matrix row does not sum to one
    #[error("Routing matrix row {row} sums to {sum}, must be 1 within tolerance")]
    RowSum { row: usize, sum: f64 },

    /// Routing matrix entry outside [0, 1]
    #[error("Routing probability at ({row}, {col}) is {value}, must be non-negative")]
    RoutingEntry { row: usize, col: usize, value: f64 },

    /// Non-positive service rate
    #[error("Service rate for class {class} at node {node} is {value}, must be positive")]
    ServiceRate { class: usize, node: usize, value: f64 },

    /// Class with no exogenous arrivals at all
    #[error("Class {class} has zero total arrival rate")]
    ArrivalRate { class: usize },

    /// Utilization at or above one, the network has no steady state
    #[error("Unstable network: utilization {utilization:.6} at node {node} (must stay below 1)")]
    Instability { node: usize, utilization: f64 },

    /// Path requested between a node and itself
    #[error("Path endpoints must differ (both are node {node})")]
    PathEndpoints { node: usize },

    /// Class index outside the configured class count
    #[error("Unknown traffic class {class} (network has {classes} classes)")]
    Class { class: usize, classes: usize },

    /// Transit-time density requested for a path with repeated effective rates
    #[error("Transit-time density undefined: nodes {first} and {second} share effective rate {rate}")]
    RepeatedRate {
        first: usize,
        second: usize,
        rate: f64,
    },

    // ============ Configuration Errors ============
    /// Error in the network description text
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Ethernet frame length outside the allowed range
    #[error("Frame length {length} outside allowed range {min}..={max}")]
    FrameLength { length: u32, min: u32, max: u32 },

    /// Error reading a network description file
    #[error("Failed to read network description '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl QnetError {
    /// Create a shape-mismatch error
    pub fn shape(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::Shape {
            context,
            expected,
            actual,
        }
    }

    /// Create an index-out-of-range error
    pub fn index(context: &'static str, index: usize, len: usize) -> Self {
        Self::Index {
            context,
            index,
            len,
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
