// Before/after usage summary

use crate::models::{SummaryReport, UsageSample};
use crate::style::{Tone, paint};
use crate::units::format_bytes;

/// Usage can grow between samples (other processes keep working), so the
/// reclaimed amount is clamped at zero.
pub fn summarize(initial: UsageSample, final_: UsageSample) -> SummaryReport {
    SummaryReport {
        initial,
        final_,
        reclaimed: UsageSample::from_bytes(initial.bytes().saturating_sub(final_.bytes())),
    }
}

pub fn render(report: &SummaryReport, styled: bool) -> String {
    let rows = [
        ("Disk usage before:", format_bytes(report.initial.bytes()), Tone::Info),
        ("Disk usage after:", format_bytes(report.final_.bytes()), Tone::Info),
        ("Space reclaimed:", format_bytes(report.reclaimed.bytes()), Tone::Success),
    ];
    let mut out = paint("Cleanup summary", Tone::Heading, styled);
    out.push('\n');
    for (label, value, tone) in rows {
        out.push_str(&format!("  {label:<19}{}\n", paint(&value, tone, styled)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(bytes: u64) -> UsageSample {
        UsageSample::from_bytes(bytes)
    }

    #[test]
    fn reclaimed_is_the_drop_in_usage() {
        let r = summarize(sample(5000), sample(2000));
        assert_eq!(r.reclaimed.bytes(), 3000);
        assert_eq!(r.initial.bytes(), 5000);
        assert_eq!(r.final_.bytes(), 2000);
    }

    #[test]
    fn reclaimed_never_goes_negative() {
        assert_eq!(summarize(sample(1000), sample(1200)).reclaimed.bytes(), 0);
        assert_eq!(summarize(sample(0), sample(u64::MAX)).reclaimed.bytes(), 0);
        assert_eq!(summarize(sample(7), sample(7)).reclaimed.bytes(), 0);
    }

    #[test]
    fn render_shows_all_three_values() {
        let text = render(&summarize(sample(3 * 1024 * 1024), sample(1536)), false);
        assert!(text.starts_with("Cleanup summary\n"));
        assert!(text.contains("Disk usage before: 3.00 MB"));
        assert!(text.contains("Disk usage after:  1.50 KB"));
        assert!(text.contains("Space reclaimed:   3.00 MB"));
        assert!(!text.contains('\u{1b}'));
    }
}
