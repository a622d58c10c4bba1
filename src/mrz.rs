//! ICAO 9303 machine-readable-zone extraction: finds MRZ-looking lines in
//! free text, groups them into a TD1/TD2/TD3/MRV-A/MRV-B layout, parses
//! fixed-offset fields, and validates check digits.

use crate::model::{CheckDigitResult, MrzType, ParsedMrz};
use std::collections::HashMap;

/// ICAO 9303 check-digit weight cycle.
const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Character value for the ICAO 9303 check-digit algorithm: digits are
/// themselves, `A..Z` are `10..35`, `<` is `0`.
fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => 0,
    }
}

/// Computes the ICAO 9303 check digit over `s`.
pub fn check_digit(s: &str) -> u8 {
    let sum: u32 = s
        .chars()
        .enumerate()
        .map(|(i, c)| char_value(c) * WEIGHTS[i % 3])
        .sum();
    (sum % 10) as u8
}

/// Runs [`check_digit`] over `field` and records the result under `name`
/// if `expected` parses as a single digit.
fn record_check(
    results: &mut HashMap<String, CheckDigitResult>,
    name: &str,
    field: &str,
    expected_char: char,
) {
    if let Some(expected) = expected_char.to_digit(10) {
        results.insert(
            name.to_string(),
            CheckDigitResult {
                expected: expected as u8,
                computed: check_digit(field),
            },
        );
    }
}

/// `true` iff `s` is six digits forming a valid `YYMMDD` date (month
/// 1-12, day 1-31).
pub fn is_valid_date(s: &str) -> bool {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let month: u32 = s[2..4].parse().unwrap_or(0);
    let day: u32 = s[4..6].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Normalizes a raw text line into MRZ alphabet: uppercase, spaces
/// stripped, dash variants folded to `<`.
fn normalize_line(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' | '‐' | '‑' | '‒' | '–' | '—' | '―' => '<',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Fraction of characters in `line` that belong to the MRZ alphabet
/// `[A-Z0-9<]`.
fn mrz_alphabet_ratio(line: &str) -> f64 {
    if line.is_empty() {
        return 0.0;
    }
    let hits = line
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '<')
        .count();
    hits as f64 / line.chars().count() as f64
}

/// `true` if `line` passes the candidate-MRZ-line heuristic (spec §4.6):
/// length 28-46 and alphabet ratio >= 0.90 (or >= 0.85 at an exact valid
/// length of 30/36/44).
fn is_candidate_line(line: &str) -> bool {
    let len = line.chars().count();
    if !(28..=46).contains(&len) {
        return false;
    }
    let ratio = mrz_alphabet_ratio(line);
    if matches!(len, 30 | 36 | 44) {
        ratio >= 0.85
    } else {
        ratio >= 0.90
    }
}

/// A candidate MRZ line group: its lines and the number of lines.
struct LineGroup {
    lines: Vec<String>,
}

/// Finds the best-matching group of consecutive candidate lines: a 44-char
/// pair, else a 36-char pair, else a 30-char triple, else every candidate
/// line found (spec §4.6 grouping preference).
fn find_line_group(text: &str) -> Option<LineGroup> {
    let candidates: Vec<String> = text
        .lines()
        .map(normalize_line)
        .filter(|l| is_candidate_line(l))
        .collect();

    if candidates.is_empty() {
        return None;
    }

    for width in [44usize, 36] {
        if let Some(pair) = consecutive_run(&candidates, width, 2) {
            return Some(LineGroup { lines: pair });
        }
    }
    if let Some(triple) = consecutive_run(&candidates, 30, 3) {
        return Some(LineGroup { lines: triple });
    }

    Some(LineGroup { lines: candidates })
}

/// Finds the first run of `count` consecutive lines of exact `width`
/// characters within `candidates`.
fn consecutive_run(candidates: &[String], width: usize, count: usize) -> Option<Vec<String>> {
    if candidates.len() < count {
        return None;
    }
    for window in candidates.windows(count) {
        if window.iter().all(|l| l.chars().count() == width) {
            return Some(window.to_vec());
        }
    }
    None
}

/// Splits an ICAO name field (`SURNAME<<GIVEN<NAMES<<<...`) into surname
/// and given-names, converting internal `<` to spaces in given names.
fn split_name_field(field: &str) -> (String, String) {
    let mut parts = field.splitn(2, "<<");
    let surname = parts.next().unwrap_or("").trim_end_matches('<').to_string();
    let given_raw = parts.next().unwrap_or("");
    let given = given_raw
        .trim_end_matches('<')
        .split('<')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (surname, given)
}

fn strip_fillers(s: &str) -> String {
    s.trim_end_matches('<').to_string()
}

/// Parses a TD3 (passport, 2x44) or MRV-A (visa, 2x44) pair.
fn parse_44_pair(lines: &[String], mrz_type: MrzType) -> ParsedMrz {
    let l1 = &lines[0];
    let l2 = &lines[1];
    let mut checks = HashMap::new();

    let country = l1.get(2..5).unwrap_or("").to_string();
    let (surname, given) = split_name_field(l1.get(5..44).unwrap_or(""));

    let doc_number_field = l2.get(0..9).unwrap_or("");
    let doc_check_char = l2.chars().nth(9).unwrap_or(' ');
    record_check(&mut checks, "document_number", doc_number_field, doc_check_char);

    let nationality = l2.get(10..13).unwrap_or("").to_string();
    let dob = l2.get(13..19).unwrap_or("").to_string();
    let dob_check_char = l2.chars().nth(19).unwrap_or(' ');
    record_check(&mut checks, "date_of_birth", &dob, dob_check_char);

    let sex = l2.chars().nth(20).unwrap_or('<');

    let expiry = l2.get(21..27).unwrap_or("").to_string();
    let expiry_check_char = l2.chars().nth(27).unwrap_or(' ');
    record_check(&mut checks, "expiry", &expiry, expiry_check_char);

    let personal_number = l2.get(28..42).unwrap_or("").to_string();
    let personal_check_char = l2.chars().nth(42).unwrap_or(' ');
    record_check(&mut checks, "personal_number", &personal_number, personal_check_char);

    let composite_field = format!(
        "{}{}{}{}",
        doc_number_field,
        doc_check_char,
        l2.get(13..20).unwrap_or(""),
        l2.get(21..43).unwrap_or(""),
    );
    let overall_check_char = l2.chars().nth(43).unwrap_or(' ');
    record_check(&mut checks, "overall", &composite_field, overall_check_char);

    ParsedMrz {
        mrz_type,
        issuing_country: country,
        surname,
        given_names: given,
        document_number: strip_fillers(doc_number_field),
        nationality,
        date_of_birth: dob,
        sex,
        expiry,
        personal_number: strip_fillers(&personal_number),
        optional_data: String::new(),
        confidence: 0,
        check_digits: checks,
    }
}

/// Parses a TD2 (2x36) or MRV-B (2x36) pair.
fn parse_36_pair(lines: &[String], mrz_type: MrzType) -> ParsedMrz {
    let l1 = &lines[0];
    let l2 = &lines[1];
    let mut checks = HashMap::new();

    let country = l1.get(2..5).unwrap_or("").to_string();
    let (surname, given) = split_name_field(l1.get(5..36).unwrap_or(""));

    let doc_number_field = l2.get(0..9).unwrap_or("");
    let doc_check_char = l2.chars().nth(9).unwrap_or(' ');
    record_check(&mut checks, "document_number", doc_number_field, doc_check_char);

    let nationality = l2.get(10..13).unwrap_or("").to_string();
    let dob = l2.get(13..19).unwrap_or("").to_string();
    let dob_check_char = l2.chars().nth(19).unwrap_or(' ');
    record_check(&mut checks, "date_of_birth", &dob, dob_check_char);

    let sex = l2.chars().nth(20).unwrap_or('<');

    let expiry = l2.get(21..27).unwrap_or("").to_string();
    let expiry_check_char = l2.chars().nth(27).unwrap_or(' ');
    record_check(&mut checks, "expiry", &expiry, expiry_check_char);

    let optional_data = l2.get(28..35).unwrap_or("").to_string();

    if mrz_type == MrzType::Td2 {
        let composite_field = format!(
            "{}{}{}{}",
            doc_number_field,
            doc_check_char,
            l2.get(13..20).unwrap_or(""),
            optional_data,
        );
        let overall_check_char = l2.chars().nth(35).unwrap_or(' ');
        record_check(&mut checks, "overall", &composite_field, overall_check_char);
    }

    ParsedMrz {
        mrz_type,
        issuing_country: country,
        surname,
        given_names: given,
        document_number: strip_fillers(doc_number_field),
        nationality,
        date_of_birth: dob,
        sex,
        expiry,
        personal_number: String::new(),
        optional_data: strip_fillers(&optional_data),
        confidence: 0,
        check_digits: checks,
    }
}

/// Parses a TD1 (3x30) triple.
fn parse_30_triple(lines: &[String]) -> ParsedMrz {
    let l1 = &lines[0];
    let l2 = &lines[1];
    let l3 = &lines[2];
    let mut checks = HashMap::new();

    let country = l1.get(2..5).unwrap_or("").to_string();

    let doc_number_field = l1.get(5..14).unwrap_or("");
    let doc_check_char = l1.chars().nth(14).unwrap_or(' ');
    record_check(&mut checks, "document_number", doc_number_field, doc_check_char);
    let optional_data_1 = l1.get(15..30).unwrap_or("").to_string();

    let dob = l2.get(0..6).unwrap_or("").to_string();
    let dob_check_char = l2.chars().nth(6).unwrap_or(' ');
    record_check(&mut checks, "date_of_birth", &dob, dob_check_char);

    let sex = l2.chars().nth(7).unwrap_or('<');

    let expiry = l2.get(8..14).unwrap_or("").to_string();
    let expiry_check_char = l2.chars().nth(14).unwrap_or(' ');
    record_check(&mut checks, "expiry", &expiry, expiry_check_char);

    let nationality = l2.get(15..18).unwrap_or("").to_string();
    let optional_data_2 = l2.get(18..29).unwrap_or("").to_string();

    let composite_field = format!(
        "{}{}{}{}{}{}{}",
        doc_number_field,
        doc_check_char,
        optional_data_1,
        dob,
        dob_check_char,
        expiry,
        expiry_check_char,
    );
    let overall_check_char = l2.chars().nth(29).unwrap_or(' ');
    record_check(&mut checks, "overall", &composite_field, overall_check_char);

    let (surname, given) = split_name_field(l3);

    ParsedMrz {
        mrz_type: MrzType::Td1,
        issuing_country: country,
        surname,
        given_names: given,
        document_number: strip_fillers(doc_number_field),
        nationality,
        date_of_birth: dob,
        sex,
        expiry,
        personal_number: String::new(),
        optional_data: format!(
            "{}{}",
            strip_fillers(&optional_data_1),
            strip_fillers(&optional_data_2)
        ),
        confidence: 0,
        check_digits: checks,
    }
}

/// Computes the 0-100 confidence score (spec §4.6).
fn compute_confidence(mrz: &ParsedMrz) -> u32 {
    let mut score = 0.0f64;

    if !mrz.check_digits.is_empty() {
        let passed = mrz.check_digits.values().filter(|r| r.passed()).count();
        score += 40.0 * (passed as f64 / mrz.check_digits.len() as f64);
    }

    if !mrz.surname.is_empty() {
        score += 10.0;
    }
    if !mrz.given_names.is_empty() {
        score += 10.0;
    }
    if !mrz.document_number.is_empty() {
        score += 10.0;
    }
    if is_valid_date(&mrz.date_of_birth) {
        score += 10.0;
    }
    if is_valid_date(&mrz.expiry) {
        score += 10.0;
    }
    if mrz.nationality.chars().count() == 3 && mrz.nationality.chars().all(|c| c.is_ascii_alphabetic()) {
        score += 5.0;
    }
    if matches!(mrz.sex, 'M' | 'F' | '<') {
        score += 5.0;
    }

    score.min(100.0).round() as u32
}

/// Chooses the MRZ type for a line group by its first character and shape
/// (spec §4.6): `P` -> TD3, `V`+44 -> MRV-A, `V`+36 -> MRV-B, `I`/`A`/`C`+30
/// lines -> TD1, else TD2 where plausible.
fn classify_group(group: &LineGroup) -> Option<MrzType> {
    let first_char = group.lines.first()?.chars().next()?;
    let len = group.lines.first()?.chars().count();
    let n_lines = group.lines.len();

    match (first_char, len, n_lines) {
        ('P', 44, 2) => Some(MrzType::Td3),
        ('V', 44, 2) => Some(MrzType::MrvA),
        ('V', 36, 2) => Some(MrzType::MrvB),
        (c, 30, 3) if matches!(c, 'I' | 'A' | 'C') => Some(MrzType::Td1),
        (_, 36, 2) => Some(MrzType::Td2),
        _ => None,
    }
}

/// Finds MRZ-looking lines in `text`, groups them, and parses fields with
/// check-digit validation. Returns `None` if no plausible MRZ group exists.
pub fn find_and_parse(text: &str) -> Option<ParsedMrz> {
    let group = find_line_group(text)?;
    let mrz_type = classify_group(&group)?;

    let mut parsed = match mrz_type {
        MrzType::Td3 | MrzType::MrvA => parse_44_pair(&group.lines, mrz_type),
        MrzType::Td2 | MrzType::MrvB => parse_36_pair(&group.lines, mrz_type),
        MrzType::Td1 => parse_30_triple(&group.lines),
        MrzType::Unknown => return None,
    };

    parsed.confidence = compute_confidence(&parsed);
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "P<RUSIVANOV<<IVAN<<<<<<<<<<<<<<<<<<<<<<<<<<\n\
                           1234567890RUS8501011M2501017<<<<<<<<<<<<<<04";

    #[test]
    fn parses_td3_sample() {
        let mrz = find_and_parse(SAMPLE).expect("should find MRZ");
        assert_eq!(mrz.mrz_type, MrzType::Td3);
        assert_eq!(mrz.surname, "IVANOV");
        assert_eq!(mrz.given_names, "IVAN");
        assert_eq!(mrz.issuing_country, "RUS");
        assert_eq!(mrz.sex, 'M');
    }

    #[test]
    fn document_number_strips_fillers() {
        let mrz = find_and_parse(SAMPLE).unwrap();
        assert!(!mrz.document_number.is_empty());
        assert!(!mrz.document_number.contains('<'));
    }

    #[test]
    fn check_digit_round_trips() {
        let field = "123456789";
        let c = check_digit(field);
        let mut checks = HashMap::new();
        record_check(&mut checks, "x", field, char::from_digit(c as u32, 10).unwrap());
        assert!(checks["x"].passed());
    }

    #[test]
    fn valid_date_rejects_bad_month_and_day() {
        assert!(is_valid_date("850101"));
        assert!(!is_valid_date("851301")); // month 13
        assert!(!is_valid_date("850132")); // day 32
        assert!(!is_valid_date("85010A"));
    }

    #[test]
    fn no_mrz_in_plain_text_returns_none() {
        assert!(find_and_parse("just some ordinary log output\nwith nothing special").is_none());
    }

    #[test]
    fn confidence_is_bounded() {
        let mrz = find_and_parse(SAMPLE).unwrap();
        assert!(mrz.confidence <= 100);
    }
}
