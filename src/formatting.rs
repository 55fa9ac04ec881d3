//! Display formatting utilities

use std::time::Duration;

/// Format bytes in human-readable format (KB, MB, GB)
#[inline]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a latency with a unit suited to its magnitude
pub fn format_duration(duration: Duration) -> String {
    const MICRO: Duration = Duration::from_micros(1);
    const MILLI: Duration = Duration::from_millis(1);
    const SECOND: Duration = Duration::from_secs(1);

    let nanos = duration.as_nanos() as f64;
    if duration >= SECOND {
        format!("{:.2}s", duration.as_secs_f64())
    } else if duration >= MILLI {
        format!("{:.2}ms", nanos / 1_000_000.0)
    } else if duration >= MICRO {
        format!("{:.2}µs", nanos / 1_000.0)
    } else {
        format!("{}ns", duration.as_nanos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(4_096), "4.00 KB");
        // A page-sized row payload
        assert_eq!(format_bytes(8_192 * 3 + 512), "24.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 256 * 1024), "5.25 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_bytes(u64::MAX), "17179869184.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(2_300)), "2.30s");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_nanos(12_000)), "12.00µs");
        assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
        assert_eq!(format_duration(Duration::ZERO), "0ns");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.00s");
    }
}
