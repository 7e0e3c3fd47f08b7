//! Scoring module - sweep rewards and gravity speed-up
//!
//! A sweep is the single pass that removes every full row after a lock.
//! Inside one sweep the first row is worth `LINE_SCORE_BASE` points and each
//! further row doubles the previous row's value, so 1, 2, 3 and 4 rows pay
//! 10, 30, 70 and 150. Every removed row also shortens the gravity interval.

use crate::types::LINE_SCORE_BASE;

/// Points for the row at position `index` (0-based) within one sweep.
pub fn row_reward(index: u32) -> u64 {
    let multiplier = 1u64.checked_shl(index).unwrap_or(u64::MAX);
    LINE_SCORE_BASE.saturating_mul(multiplier)
}

/// Total points for a sweep that removed `rows` rows.
pub fn sweep_reward(rows: u32) -> u64 {
    (0..rows).fold(0u64, |total, i| total.saturating_add(row_reward(i)))
}

/// Gravity interval after one more row has been cleared.
///
/// Intervals already at or below `floor` are left alone.
pub fn next_drop_interval(current_ms: u32, step_ms: u32, floor_ms: u32) -> u32 {
    if current_ms <= floor_ms {
        return current_ms;
    }
    current_ms.saturating_sub(step_ms).max(floor_ms)
}

/// Gravity interval after `rows` rows have been cleared.
pub fn drop_interval_after(current_ms: u32, rows: u32, step_ms: u32, floor_ms: u32) -> u32 {
    (0..rows).fold(current_ms, |ms, _| next_drop_interval(ms, step_ms, floor_ms))
}
