//! Multi-signal identity-document analysis for images.
//!
//! The analyzer never decodes image formats itself — pixel dimensions and
//! any OCR'd text arrive from the text-extraction boundary (see
//! [`crate::extract`]). It fuses bounded signals (MRZ, keywords, barcode,
//! face, geometry, structure, quality) into a single classification and
//! confidence, searching up to four rotations with early exit.

use crate::mrz;
use std::sync::LazyLock;

/// Pixel dimensions of a decoded image, supplied by the extraction
/// boundary alongside any OCR'd text.
#[derive(Debug, Clone, Copy)]
pub struct ImageMeta {
    pub width: u32,
    pub height: u32,
}

impl ImageMeta {
    fn megapixels(self) -> f64 {
        (self.width as f64 * self.height as f64) / 1_000_000.0
    }

    fn aspect_ratio(self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// Known document aspect ratios, in tie-break priority order (spec §4.7).
const DOCUMENT_RATIOS: &[(&str, f64)] = &[
    ("passport_page", 0.70),
    ("passport_closed", 1.42),
    ("passport_card", 1.37),
    ("id_card", 1.58),
    ("a4_portrait", 0.71),
];

/// Passport-photo aspect ratios checked when the image is small.
const PASSPORT_PHOTO_RATIOS: &[f64] = &[0.75, 0.78];

/// Document classification, in the precedence order spec §4.7 requires
/// when fusing signals: MRZ-derived beats keyword-derived beats
/// geometry-derived beats `UnknownDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Passport,
    Visa,
    IdCard,
    UnknownDocument,
    PassportPhoto,
}

/// Confidence band derived from the fused score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

/// Result of analyzing one image (at its best-scoring rotation).
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub is_document: bool,
    pub document_type: DocumentType,
    pub confidence: Confidence,
    pub score: u32,
    pub rotation: u16,
    pub mrz: Option<crate::model::ParsedMrz>,
}

struct SignalBreakdown {
    mrz: f64,
    mrz_present: bool,
    keywords: f64,
    barcode: f64,
    face: f64,
    geometry: f64,
    geometry_doctype: Option<&'static str>,
    structure: f64,
    quality: f64,
    passport_photo: bool,
}

struct KeywordWeight {
    word: &'static str,
    weight: u32,
}

static KEYWORDS: LazyLock<Vec<KeywordWeight>> = LazyLock::new(|| {
    vec![
        KeywordWeight { word: "passport", weight: 15 },
        KeywordWeight { word: "паспорт", weight: 15 },
        KeywordWeight { word: "mrz", weight: 20 },
        KeywordWeight { word: "date of birth", weight: 8 },
        KeywordWeight { word: "date of issue", weight: 5 },
        KeywordWeight { word: "date of expiry", weight: 8 },
        KeywordWeight { word: "nationality", weight: 8 },
        KeywordWeight { word: "surname", weight: 5 },
        KeywordWeight { word: "given name", weight: 5 },
        KeywordWeight { word: "identity card", weight: 12 },
        KeywordWeight { word: "driver license", weight: 10 },
        KeywordWeight { word: "driving licence", weight: 10 },
        KeywordWeight { word: "residence permit", weight: 10 },
        KeywordWeight { word: "снилс", weight: 12 },
        KeywordWeight { word: "инн", weight: 10 },
        KeywordWeight { word: "паспорт рф", weight: 15 },
        KeywordWeight { word: "код подразделения", weight: 8 },
    ]
});

fn mrz_signal(text: &str) -> (f64, bool, Option<crate::model::ParsedMrz>) {
    match mrz::find_and_parse(text) {
        Some(parsed) => {
            let mut score = 30.0;
            if parsed.confidence >= 50 {
                score = 60.0;
            }
            if parsed.check_digits.values().any(|c| c.passed()) {
                score = 70.0;
            }
            (score, true, Some(parsed))
        }
        None => (0.0, false, None),
    }
}

fn keyword_signal(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let total: u32 = KEYWORDS
        .iter()
        .map(|kw| (lower.matches(kw.word).count() as u32) * kw.weight)
        .sum();
    (total as f64).min(30.0)
}

fn barcode_signal(text: &str) -> f64 {
    let upper = text.to_uppercase();
    if upper.contains("AAMVA") || upper.contains("ANSI ") {
        return 20.0;
    }
    let has_long_alnum_run = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|tok| tok.len() >= 20);
    if has_long_alnum_run {
        10.0
    } else {
        0.0
    }
}

/// Placeholder: face detection is not implemented in this core; returns 0
/// always. Kept as an explicit signal so the fusion weights and interface
/// stay stable if a real detector is plugged in later.
fn face_signal() -> f64 {
    0.0
}

fn geometry_signal(meta: ImageMeta) -> (f64, Option<&'static str>, bool) {
    if meta.width == 0 || meta.height == 0 {
        return (0.0, None, false);
    }

    let megapixels = meta.megapixels();
    let ratio = meta.aspect_ratio();

    if megapixels < 0.5 {
        for &photo_ratio in PASSPORT_PHOTO_RATIOS {
            if (ratio - photo_ratio).abs() <= 0.05 {
                return (0.0, None, true);
            }
        }
    }

    for &(name, target) in DOCUMENT_RATIOS {
        if (ratio - target).abs() <= 0.08 {
            return (12.0, Some(name), false);
        }
    }
    for &(name, target) in DOCUMENT_RATIOS {
        if (ratio - target).abs() <= 0.15 {
            return (5.0, Some(name), false);
        }
    }
    (0.0, None, false)
}

static DATE_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\b\d{2}[./\- ]\d{2}[./\- ]\d{2,4}\b").unwrap());
static MRZ_NAME_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[A-Z]+<<[A-Z<]+").unwrap());
static LABELED_NAME_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)(surname|given name|full name)\s*[:=]?\s*[A-Za-z]+").unwrap());

fn structure_signal(text: &str) -> f64 {
    let mut score = 0.0;
    if DATE_PATTERN.find_iter(text).count() >= 2 {
        score += 10.0;
    }
    if MRZ_NAME_PATTERN.is_match(text) {
        score += 10.0;
    } else if LABELED_NAME_PATTERN.is_match(text) {
        score += 5.0;
    }
    score
}

fn quality_signal(meta: ImageMeta) -> f64 {
    let mp = meta.megapixels();
    if mp > 2.0 {
        10.0
    } else if mp > 0.5 {
        7.0
    } else {
        3.0
    }
}

fn gather_signals(
    text: &str,
    meta: ImageMeta,
    mrz_score: f64,
    mrz_present: bool,
) -> SignalBreakdown {
    let (geometry, geometry_doctype, passport_photo) = geometry_signal(meta);

    SignalBreakdown {
        mrz: mrz_score,
        mrz_present,
        keywords: keyword_signal(text),
        barcode: barcode_signal(text),
        face: face_signal(),
        geometry,
        geometry_doctype,
        structure: structure_signal(text),
        quality: quality_signal(meta),
        passport_photo,
    }
}

/// Fuses bounded signals into a 0-100 score using the weights in spec
/// §4.7, redistributing the MRZ weight when no MRZ signal is present.
fn fuse(signals: &SignalBreakdown) -> f64 {
    let (w_mrz, w_keywords, w_barcode, w_face, w_geometry, w_structure, w_quality) =
        if signals.mrz_present {
            (0.35, 0.20, 0.12, 0.10, 0.08, 0.10, 0.05)
        } else {
            (0.0, 0.35, 0.12, 0.10, 0.18, 0.20, 0.05)
        };

    let normalized_mrz = signals.mrz / 70.0 * 100.0;
    let normalized_keywords = signals.keywords / 30.0 * 100.0;
    let normalized_barcode = signals.barcode / 20.0 * 100.0;
    let normalized_face = signals.face / 15.0 * 100.0;
    let normalized_geometry = signals.geometry / 15.0 * 100.0;
    let normalized_structure = signals.structure / 20.0 * 100.0;
    let normalized_quality = signals.quality / 10.0 * 100.0;

    normalized_mrz * w_mrz
        + normalized_keywords * w_keywords
        + normalized_barcode * w_barcode
        + normalized_face * w_face
        + normalized_geometry * w_geometry
        + normalized_structure * w_structure
        + normalized_quality * w_quality
}

fn classify(signals: &SignalBreakdown, score: f64, parsed_mrz: &Option<crate::model::ParsedMrz>) -> (bool, DocumentType, Confidence) {
    if signals.passport_photo {
        return (false, DocumentType::PassportPhoto, Confidence::None);
    }

    let text_bearing = signals.keywords > 10.0 || signals.mrz > 0.0 || signals.structure > 10.0;

    let confidence = if score >= 65.0 {
        Confidence::High
    } else if score >= 40.0 {
        Confidence::Medium
    } else if score >= 25.0 {
        Confidence::Low
    } else {
        Confidence::None
    };

    if !text_bearing {
        return (false, DocumentType::UnknownDocument, Confidence::None);
    }

    let is_document = matches!(confidence, Confidence::High | Confidence::Medium);

    let document_type = if let Some(parsed) = parsed_mrz {
        match parsed.mrz_type {
            crate::model::MrzType::MrvA | crate::model::MrzType::MrvB => DocumentType::Visa,
            crate::model::MrzType::Td1 => DocumentType::IdCard,
            _ => DocumentType::Passport,
        }
    } else if signals.keywords > 10.0 {
        DocumentType::IdCard
    } else if let Some(name) = signals.geometry_doctype {
        match name {
            "passport_page" | "passport_closed" | "passport_card" => DocumentType::Passport,
            "id_card" => DocumentType::IdCard,
            _ => DocumentType::UnknownDocument,
        }
    } else {
        DocumentType::UnknownDocument
    };

    (is_document, document_type, confidence)
}

/// Analyzes one already-extracted (text, dimensions) pair with no rotation
/// search; used internally by [`analyze_with_rotations`] and directly when
/// the caller already knows the right orientation.
pub fn analyze_one(text: &str, meta: ImageMeta, rotation: u16) -> ImageAnalysis {
    let (mrz_score, mrz_present, parsed_mrz) = mrz_signal(text);
    let signals = gather_signals(text, meta, mrz_score, mrz_present);
    let score = fuse(&signals).round().clamp(0.0, 100.0) as u32;
    let (is_document, document_type, confidence) = classify(&signals, score as f64, &parsed_mrz);

    ImageAnalysis {
        is_document,
        document_type,
        confidence,
        score,
        rotation,
        mrz: parsed_mrz,
    }
}

/// Bounded rotation search over {0, 90, 180, 270} degrees with early exit:
/// stops as soon as a rotation scores >=70 (spec §4.7). `try_rotation`
/// supplies the OCR'd text and pixel dimensions for a given rotation (the
/// extraction boundary's job); returning `None` skips that rotation.
pub fn analyze_with_rotations<F>(mut try_rotation: F) -> Option<ImageAnalysis>
where
    F: FnMut(u16) -> Option<(String, ImageMeta)>,
{
    const EARLY_EXIT_THRESHOLD: u32 = 70;
    let mut best: Option<ImageAnalysis> = None;

    for rotation in [0u16, 90, 180, 270] {
        let Some((text, meta)) = try_rotation(rotation) else {
            continue;
        };
        let analysis = analyze_one(&text, meta, rotation);
        let should_replace = best.as_ref().map(|b| analysis.score > b.score).unwrap_or(true);
        if should_replace {
            let hit_threshold = analysis.score >= EARLY_EXIT_THRESHOLD;
            best = Some(analysis);
            if hit_threshold {
                break;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const MRZ_TEXT: &str = "P<RUSIVANOV<<IVAN<<<<<<<<<<<<<<<<<<<<<<<<<<\n\
                             1234567890RUS8501011M2501017<<<<<<<<<<<<<<04";

    #[test]
    fn strong_mrz_text_is_classified_as_document() {
        let analysis = analyze_one(MRZ_TEXT, ImageMeta { width: 1200, height: 1700 }, 0);
        assert!(analysis.is_document);
        assert_eq!(analysis.document_type, DocumentType::Passport);
    }

    #[test]
    fn geometry_alone_never_suffices() {
        let analysis = analyze_one("random unrelated text here", ImageMeta { width: 1000, height: 1410 }, 0);
        assert!(!analysis.is_document);
    }

    #[test]
    fn small_near_photo_ratio_is_passport_photo() {
        let analysis = analyze_one("", ImageMeta { width: 300, height: 400 }, 0);
        assert_eq!(analysis.document_type, DocumentType::PassportPhoto);
        assert!(!analysis.is_document);
    }

    #[test]
    fn rotation_search_finds_mrz_at_any_angle() {
        let analysis = analyze_with_rotations(|rotation| {
            if rotation == 180 {
                Some((MRZ_TEXT.to_string(), ImageMeta { width: 1200, height: 1700 }))
            } else {
                Some(("no document text here".to_string(), ImageMeta { width: 1200, height: 1700 }))
            }
        })
        .expect("should find a result");
        assert!(analysis.is_document);
        assert_eq!(analysis.rotation, 180);
    }

    #[test]
    fn score_is_bounded() {
        let analysis = analyze_one(MRZ_TEXT, ImageMeta { width: 1200, height: 1700 }, 0);
        assert!(analysis.score <= 100);
    }
}
