//! Ancillary mathematics shared between the projection implementations.

mod ancillary;
mod angular;

pub use ancillary::{enfn, inv_mlfn, mlfn, msfn, phi2, phi_from_q, qsfn, ts};
pub use angular::{aasin, dms_to_dd, normalize_symmetric};

/// Iteration ceiling for the convergence loops. All iterative inversions in
/// the crate return their best estimate, rather than failing, if the budget
/// is exhausted.
pub const MAX_ITERATIONS: usize = 15;
