//! Sampling-interval estimation.

use crate::sample::RawSample;
use crate::window::SampleWindow;

/// Estimate the inter-sample period (ms) from the window span up to
/// `timestamp`.
///
/// Returns 0 when fewer than two samples are buffered. The span is narrowed
/// to `i32` before dividing, so spans beyond `i32::MAX` ms truncate and a
/// negative quotient wraps when widened back to `u64`.
pub fn estimate_interval<T: RawSample>(window: &SampleWindow<T>, timestamp: u64) -> u64 {
    let head = match window.head() {
        Some(head) if window.len() >= 2 => head,
        _ => return 0,
    };

    let duration = timestamp.wrapping_sub(head.timestamp()) as i32;
    let gaps = (window.len() - 1) as i32;
    duration.wrapping_div(gaps) as u64
}
