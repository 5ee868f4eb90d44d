//! Domain services for the health tracker.
//!
//! Services contain business logic that operates on domain models and
//! reads through the store traits.

pub mod aggregation;
pub mod proximity;
pub mod suppression;
pub mod triggers;

pub use aggregation::{compute_bmi, Aggregator};
pub use proximity::PlaceProximityIndex;
pub use suppression::RecencySuppression;
pub use triggers::{TriggerEngine, TriggerSettings};
