//! Queueing-network model and characteristic computation.
//!
//! [`NetworkSpec`] is the validated input record; [`NetworkModel`] runs
//! the staged pipeline over it: traffic equations per class, the
//! stability check, stationary probability-time characteristics, path
//! enumeration with transition probabilities and the path-integrated
//! characteristics. The transit-time density is computed on demand from
//! an evaluated model.
//!
//! Each stage consumes only the outputs of the ones before it; a stage
//! failure aborts the rest and no partial result escapes.

mod density;
mod pipeline;
mod spec;

pub use pipeline::NetworkModel;
pub use spec::NetworkSpec;
