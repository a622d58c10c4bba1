//! Composite risk scoring: severity + entropy + length + context keywords
//! folded into a single 0-100 score, with a derived severity band.

use crate::entropy;
use crate::model::{DetectedPattern, Severity};

/// Case-insensitive keywords that add to the context bonus when they
/// appear in the matched line (spec §4.4), capped at +10.
const CONTEXT_KEYWORDS: &[&str] = &[
    "password",
    "secret",
    "token",
    "key",
    "private",
    "credential",
    "auth",
    "api",
    "access",
    "aws",
];

/// `severity.score() * 10`, i.e. 10-40.
fn severity_component(severity: Severity) -> u32 {
    severity.score() * 10
}

/// 0/10/20/30 at entropy thresholds 3.5/4.5/5.5.
fn entropy_bonus(entropy_value: f64) -> u32 {
    if entropy_value >= 5.5 {
        30
    } else if entropy_value >= 4.5 {
        20
    } else if entropy_value >= 3.5 {
        10
    } else {
        0
    }
}

/// 0/5/10/15/20 at match lengths 8/16/32/64.
fn length_bonus(len: usize) -> u32 {
    if len >= 64 {
        20
    } else if len >= 32 {
        15
    } else if len >= 16 {
        10
    } else if len >= 8 {
        5
    } else {
        0
    }
}

/// +2 per case-insensitive keyword occurrence in `line`, capped at 10.
fn context_bonus(line: &str) -> u32 {
    let lower = line.to_lowercase();
    let hits: u32 = CONTEXT_KEYWORDS
        .iter()
        .map(|kw| lower.matches(kw).count() as u32)
        .sum();
    (hits * 2).min(10)
}

/// Derives the final severity band from a composite score (spec §4.4):
/// >=75 Critical, >=50 High, >=25 Medium, else Low.
pub fn severity_band(score: u32) -> Severity {
    if score >= 75 {
        Severity::Critical
    } else if score >= 50 {
        Severity::High
    } else if score >= 25 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Result of scoring one detected pattern.
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessment {
    pub score: u32,
    pub entropy: f64,
    pub severity: Severity,
}

/// Computes risk for a [`DetectedPattern`] matched against `context_line`.
///
/// The composite score sums the severity, entropy, length, and context
/// components, capped at 100. The returned severity is the base pattern
/// severity raised (never lowered) to the derived band.
pub fn score(pattern: &DetectedPattern, context_line: &str) -> RiskAssessment {
    let entropy_value = entropy::shannon_entropy(&pattern.matched_text);
    let raw = severity_component(pattern.base_severity)
        + entropy_bonus(entropy_value)
        + length_bonus(pattern.matched_text.len())
        + context_bonus(context_line);
    let capped = raw.min(100);

    let derived = severity_band(capped);
    let severity = derived.max(pattern.base_severity);

    RiskAssessment {
        score: capped,
        entropy: entropy_value,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PatternType;

    fn detected(matched_text: &str, base_severity: Severity) -> DetectedPattern {
        DetectedPattern {
            pattern_type: PatternType::Password,
            base_severity,
            description: "test",
            start: 0,
            end: matched_text.len(),
            matched_text: matched_text.to_string(),
            line_number: None,
            file: None,
            context_line: None,
            entropy: None,
        }
    }

    #[test]
    fn score_is_bounded_0_to_100() {
        let d = detected("xK9mP2qR7vL4wT6bN3jH8xK9mP2qR7vL4wT6bN3jH8", Severity::Critical);
        let r = score(&d, "password = xK9mP2qR7vL4wT6bN3jH8xK9mP2qR7vL4wT6bN3jH8");
        assert!(r.score <= 100);
    }

    #[test]
    fn severity_never_lowered_below_base() {
        let d = detected("abc", Severity::Critical);
        let r = score(&d, "abc");
        assert_eq!(r.severity, Severity::Critical);
    }

    #[test]
    fn higher_entropy_never_lowers_score_other_things_equal() {
        let low = detected("aaaaaaaaaaaaaaaa", Severity::Low);
        let high = detected("xK9mP2qR7vL4wT6b", Severity::Low);
        let r_low = score(&low, "value");
        let r_high = score(&high, "value");
        assert!(r_high.score >= r_low.score);
    }

    #[test]
    fn context_keywords_raise_score() {
        let d = detected("abcdefgh", Severity::Low);
        let plain = score(&d, "value = abcdefgh");
        let with_context = score(&d, "password secret token key = abcdefgh");
        assert!(with_context.score > plain.score);
    }

    #[test]
    fn severity_band_thresholds() {
        assert_eq!(severity_band(80), Severity::Critical);
        assert_eq!(severity_band(60), Severity::High);
        assert_eq!(severity_band(30), Severity::Medium);
        assert_eq!(severity_band(10), Severity::Low);
    }
}
