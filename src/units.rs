// Byte counts <-> human-readable sizes (binary multiples of 1024)

use tracing::debug;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Render a byte count using the largest unit that keeps the magnitude
/// below 1024, up to PB, with two fractional digits (e.g. "1.50 KB").
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // 1023.996 KB would print as "1024.00 KB".
    if (value * 100.0).round() >= 102_400.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Parse an engine-reported size such as "10GB", "1.5 KiB" or "512.3kB".
///
/// Never fails: an unparseable magnitude counts as 0 bytes and an unknown
/// unit counts as plain bytes. Fractional bytes are truncated.
pub fn parse_size(raw: &str) -> u64 {
    let s = raw.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    // Locale decimals ("1,5GB") deliberately fail here.
    let magnitude = match number.parse::<f64>() {
        Ok(m) if m.is_finite() => m,
        _ => {
            debug!(size = raw, "unparseable size magnitude, counting as 0 bytes");
            return 0;
        }
    };

    let exponent = unit_exponent(unit.trim()).unwrap_or_else(|| {
        debug!(size = raw, unit = unit.trim(), "unknown size unit, counting as bytes");
        0
    });

    // `as` truncates toward zero and saturates at u64::MAX.
    (magnitude * 1024f64.powi(exponent)) as u64
}

fn unit_exponent(unit: &str) -> Option<i32> {
    let unit = unit.to_ascii_lowercase();
    let stem = unit
        .strip_suffix("ib")
        .or_else(|| unit.strip_suffix('b'))
        .unwrap_or(unit.as_str());
    match stem {
        "" => Some(0),
        "k" => Some(1),
        "m" => Some(2),
        "g" => Some(3),
        "t" => Some(4),
        "p" => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    const TIB: u64 = GIB * 1024;
    const PIB: u64 = TIB * 1024;

    #[test]
    fn format_picks_largest_unit_below_1024() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(512 * MIB), "512.00 MB");
        assert_eq!(format_bytes(10 * GIB), "10.00 GB");
        assert_eq!(format_bytes(3 * TIB / 2), "1.50 TB");
    }

    #[test]
    fn format_stops_at_petabytes() {
        assert_eq!(format_bytes(PIB), "1.00 PB");
        assert_eq!(format_bytes(2048 * PIB), "2048.00 PB");
    }

    #[test]
    fn format_moves_up_a_unit_when_rounding_reaches_1024() {
        assert_eq!(format_bytes(1_048_575), "1.00 MB");
        assert_eq!(format_bytes(MIB - 1024), "1023.00 KB");
        assert_eq!(format_bytes(GIB - 1), "1.00 GB");
    }

    #[test]
    fn parse_accepts_all_suffix_styles() {
        assert_eq!(parse_size("1.50 KB"), 1536);
        assert_eq!(parse_size("1.5KiB"), 1536);
        assert_eq!(parse_size("1.5kB"), 1536);
        assert_eq!(parse_size("1.5k"), 1536);
        assert_eq!(parse_size("10GB"), 10 * GIB);
        assert_eq!(parse_size("512MB"), 512 * MIB);
        assert_eq!(parse_size("2TB"), 2 * TIB);
        assert_eq!(parse_size("1PiB"), PIB);
        assert_eq!(parse_size("42B"), 42);
        assert_eq!(parse_size("42"), 42);
    }

    #[test]
    fn parse_truncates_fractional_bytes() {
        assert_eq!(parse_size("1.3B"), 1);
        assert_eq!(parse_size("0.001KB"), 1);
    }

    #[test]
    fn parse_treats_zero_and_garbage_as_zero() {
        assert_eq!(parse_size("0B"), 0);
        assert_eq!(parse_size(""), 0);
        assert_eq!(parse_size("   "), 0);
        assert_eq!(parse_size("N/A"), 0);
        assert_eq!(parse_size("1,5GB"), 0);
        assert_eq!(parse_size("1.2.3MB"), 0);
    }

    #[test]
    fn parse_unknown_unit_counts_as_bytes() {
        assert_eq!(parse_size("7XB"), 7);
        assert_eq!(parse_size("12 parsecs"), 12);
    }

    #[test]
    fn format_then_parse_stays_within_rounding_tolerance() {
        for bytes in [0, 1, 1000, 1536, 123_456, 987_654_321, 5 * TIB + 17, 3 * PIB] {
            let parsed = parse_size(&format_bytes(bytes));
            let mut scale = 1u64;
            while bytes / scale >= 1024 && scale < PIB {
                scale *= 1024;
            }
            // Two displayed decimals: off by at most half a hundredth of a unit.
            let tolerance = scale / 200 + 1;
            assert!(
                parsed.abs_diff(bytes) <= tolerance,
                "{bytes} -> {} -> {parsed}",
                format_bytes(bytes)
            );
        }
    }
}
