//! Declarative network descriptions.
//!
//! Translates a plain-text network description into a validated
//! [`NetworkSpec`](crate::model::NetworkSpec): the routing matrix with
//! "don't care" mass distribution, per-class arrival-rate vectors
//! (literal, scalar or randomized) and per-class service-rate vectors
//! (literal, scalar or derived from an Ethernet link capacity).

mod capacity;
mod parser;

pub use capacity::{link_capacity, EthernetType, MAX_FRAME_LENGTH, MIN_FRAME_LENGTH};
pub use parser::{load, parse};
