use serde::{Deserialize, Serialize};

/// Load figures derived from a truck's weight and its model's capacity.
///
/// Never stored; recomputed whenever a truck is projected with its model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadFigures {
    /// `current_weight / max_capacity * 100`, two decimals, never negative.
    /// Zero when the capacity is not positive.
    pub load_percentage: f64,
    /// Share above 100%, zero when not overloaded.
    pub overload_percentage: f64,
    pub is_overloaded: bool,
}

impl LoadFigures {
    pub fn compute(current_weight: i64, max_capacity: i64) -> Self {
        let load_percentage = if max_capacity > 0 {
            round2(current_weight as f64 / max_capacity as f64 * 100.0).max(0.0)
        } else {
            0.0
        };

        Self {
            load_percentage,
            overload_percentage: round2((load_percentage - 100.0).max(0.0)),
            is_overloaded: load_percentage > 100.0,
        }
    }
}

/// Two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
