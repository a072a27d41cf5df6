pub mod weighted_sum;

pub use weighted_sum::*;

use crate::model::{Assessment, Transaction};

/// Turns a validated transaction into a fraud assessment.
///
/// Implementations must be pure: no I/O, and identical input yields an
/// identical assessment.
pub trait Scorer: Send + Sync {
    fn score(&self, transaction: &Transaction) -> Assessment;
}
