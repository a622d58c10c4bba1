//! Shannon entropy over a character histogram, used to separate
//! random-looking secrets from ordinary words.

use std::collections::HashMap;

/// Strings shorter than this always score entropy 0 — there isn't enough
/// signal to say anything about randomness.
pub const MIN_LENGTH: usize = 8;

/// Entropy at or above this value is flagged "high entropy".
pub const HIGH_ENTROPY_THRESHOLD: f64 = 4.5;

/// Characters considered part of a candidate secret token when scanning
/// free text for high-entropy runs.
fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '+' | '/' | ':' | '.' | '~')
}

/// Suspicion band derived from an entropy value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuspicionBand {
    VeryHigh,
    High,
    Medium,
    Low,
}

/// Result of analyzing one string's entropy.
#[derive(Debug, Clone, Copy)]
pub struct EntropyAnalysis {
    pub entropy: f64,
    pub high_entropy: bool,
    pub band: SuspicionBand,
}

/// Shannon entropy of `s` in bits per character, `0.0` for strings shorter
/// than [`MIN_LENGTH`].
pub fn shannon_entropy(s: &str) -> f64 {
    if s.chars().count() < MIN_LENGTH {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Full analysis of one string: entropy, the high-entropy flag, and a band.
pub fn analyze_string(s: &str) -> EntropyAnalysis {
    let entropy = shannon_entropy(s);
    let band = if entropy >= 5.5 {
        SuspicionBand::VeryHigh
    } else if entropy >= 4.5 {
        SuspicionBand::High
    } else if entropy >= 3.5 {
        SuspicionBand::Medium
    } else {
        SuspicionBand::Low
    };

    EntropyAnalysis {
        entropy,
        high_entropy: entropy >= HIGH_ENTROPY_THRESHOLD,
        band,
    }
}

/// Slides over runs of "secret characters" in `text` and returns every run
/// of length >= [`MIN_LENGTH`] whose entropy is >= `threshold`.
pub fn extract_potential_secrets(text: &str, threshold: f64) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    let mut flush = |start: usize, end_byte: usize, out: &mut Vec<(String, f64)>| {
        let run = &text[start..end_byte];
        if run.chars().count() >= MIN_LENGTH {
            let entropy = shannon_entropy(run);
            if entropy >= threshold {
                out.push((run.to_string(), entropy));
            }
        }
    };

    for &(byte_idx, c) in &chars {
        if is_secret_char(c) {
            if run_start.is_none() {
                run_start = Some(byte_idx);
            }
        } else if let Some(start) = run_start.take() {
            flush(start, byte_idx, &mut out);
        }
    }
    if let Some(start) = run_start {
        flush(start, text.len(), &mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_have_zero_entropy() {
        assert_eq!(shannon_entropy("short"), 0.0);
    }

    #[test]
    fn entropy_is_never_negative() {
        assert!(shannon_entropy("aaaaaaaaaaaaaaaa") >= 0.0);
        assert!(shannon_entropy("xK9#mP2$qR7@vL4!") >= 0.0);
    }

    #[test]
    fn uniform_histogram_maximizes_entropy() {
        let uniform = "abcdefgh"; // 8 distinct chars, uniform distribution
        let skewed = "aaaaaaab";
        assert!(shannon_entropy(uniform) > shannon_entropy(skewed));
    }

    #[test]
    fn extract_potential_secrets_finds_long_random_run() {
        let text = "config value = xK9mP2qR7vL4wT6bN3jH8 ok";
        let hits = extract_potential_secrets(text, 3.5);
        assert!(!hits.is_empty());
    }
}
