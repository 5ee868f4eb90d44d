//! Common view over the timestamped user logs.

use super::trigger::Position;

/// A user-owned, timestamped log entry that may carry a position.
///
/// Timestamps are epoch milliseconds and always `i64`.
pub trait LogEvent {
    fn user_id(&self) -> i64;

    /// The instant the event is bucketed and suppressed by.
    fn occurred_at_ms(&self) -> i64;

    fn position(&self) -> Option<Position> {
        None
    }
}

pub(crate) fn position_of(latitude: Option<f64>, longitude: Option<f64>) -> Option<Position> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
        _ => None,
    }
}
