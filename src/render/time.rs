//! Elapsed-time formatting.

/// Scales a nanosecond measurement into the largest unit that keeps the value
/// below one: `ns`, `μs`, `ms`, then `s`, with two decimals past nanoseconds.
#[allow(clippy::cast_precision_loss)]
pub fn format_nanos(nanos: u64) -> String {
    if nanos < 1_000 {
        return format!("{nanos} ns");
    }
    if nanos < 1_000_000 {
        return format!("{:.2} μs", nanos as f64 / 1_000.0);
    }
    if nanos < 1_000_000_000 {
        return format!("{:.2} ms", nanos as f64 / 1_000_000.0);
    }
    format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
}
