//! Dense numeric containers.
//!
//! [`Vector`] and [`Matrix`] are the storage substrate for the whole
//! analyzer: the traffic-equation builder, the Gaussian solver and the
//! path enumerator all operate on them. Elementwise arithmetic always
//! produces new values; the structural edit operations (insert/remove
//! row or column, transpose) mutate in place and are only ever applied
//! to working copies, never to a caller's data.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
