//! Capacity arithmetic for the invitation reconciler.
//!
//! The decision is a pure function of the event's fixed capacity and the
//! current accepted count. Both the Postgres ledger and the in-memory test
//! ledger route through these functions so they cascade identically.

/// Remaining capacity: open spots minus current accepted count.
///
/// Can go negative when a host over-admits via direct status updates; any
/// value ≤ 0 means the event is full.
pub fn remaining_spots(open_spots: i32, accepted: i64) -> i64 {
    i64::from(open_spots) - accepted
}

/// The bulk transition the reconciler must apply to restore the capacity
/// invariant. Only Pending and Closed rows are ever touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityShift {
    /// Event is full: every Pending invitation becomes Closed.
    ClosePending,
    /// Capacity is free: every Closed invitation reopens to Pending.
    ReopenClosed,
}

/// Decide the required shift for the given capacity state.
///
/// Deliberately unconditional: callers apply it after every status
/// mutation without knowing which direction capacity moved.
pub fn required_shift(open_spots: i32, accepted: i64) -> CapacityShift {
    if remaining_spots(open_spots, accepted) <= 0 {
        CapacityShift::ClosePending
    } else {
        CapacityShift::ReopenClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_spots() {
        assert_eq!(remaining_spots(4, 0), 4);
        assert_eq!(remaining_spots(4, 3), 1);
        assert_eq!(remaining_spots(4, 4), 0);
        assert_eq!(remaining_spots(2, 5), -3);
    }

    #[test]
    fn test_shift_when_full() {
        assert_eq!(required_shift(2, 2), CapacityShift::ClosePending);
        assert_eq!(required_shift(2, 3), CapacityShift::ClosePending);
    }

    #[test]
    fn test_shift_when_capacity_free() {
        assert_eq!(required_shift(2, 0), CapacityShift::ReopenClosed);
        assert_eq!(required_shift(2, 1), CapacityShift::ReopenClosed);
    }
}
