//! Human-readable file sizes.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const STEP: u64 = 1024;

/// Format a byte count with base-1024 units and at most two decimals.
///
/// Trailing zeros are dropped (`1536` renders as `1.5 KB`), zero renders as
/// `0 Bytes`, and anything past gigabytes stays in `GB`.
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit < UNITS.len() - 1 && bytes / divisor >= STEP {
        divisor *= STEP;
        unit += 1;
    }

    let value = format!("{:.2}", bytes as f64 / divisor as f64);
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{value} {}", UNITS[unit])
}
