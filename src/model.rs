//! Core data types for the scan engine.
//!
//! This module contains the value types shared across the whole pipeline:
//!
//! - [`Severity`], [`PatternType`] — classification enums.
//! - [`DetectedPattern`] — the raw output of matching one pattern against one line.
//! - [`Finding`] — the scanner's output record for one match.
//! - [`ScanResult`] — thread-safe aggregation of a single scan.
//! - [`ScanEvent`], [`ScanProgress`], [`ScanState`] — the streaming control surface.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Severity level for a detected pattern or finding.
///
/// Variants are ordered from least to most critical and implement [`Ord`],
/// so `Severity::Critical > Severity::Low` and findings can be sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl Severity {
    /// The numeric score used by the risk scorer's severity component
    /// (spec §4.4: `severity.score * 10`).
    pub fn score(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Closed set of pattern kinds recognized by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Password,
    ApiKey,
    Token,
    PrivateKey,
    AwsKey,
    GithubToken,
    Email,
    Phone,
    Ssn,
    Passport,
    CreditCard,
    Iban,
    Bic,
    EnvVar,
    JsonSecret,
    YamlSecret,
    HardcodedSecret,
    ConnectionString,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Password => "password",
            Self::ApiKey => "api_key",
            Self::Token => "token",
            Self::PrivateKey => "private_key",
            Self::AwsKey => "aws_key",
            Self::GithubToken => "github_token",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::Passport => "passport",
            Self::CreditCard => "credit_card",
            Self::Iban => "iban",
            Self::Bic => "bic",
            Self::EnvVar => "env_var",
            Self::JsonSecret => "json_secret",
            Self::YamlSecret => "yaml_secret",
            Self::HardcodedSecret => "hardcoded_secret",
            Self::ConnectionString => "connection_string",
        };
        write!(f, "{s}")
    }
}

/// The raw output of matching one [`crate::patterns::Pattern`] against one line.
///
/// Produced by [`crate::patterns::PatternCatalog::find_all`]; the byte
/// `start`/`end` fields are offsets within the *line*, not the file. The
/// remaining fields are filled in by the scanner as it enriches the match
/// into a [`Finding`].
#[derive(Debug, Clone)]
pub struct DetectedPattern {
    pub pattern_type: PatternType,
    pub base_severity: Severity,
    pub description: &'static str,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    pub line_number: Option<usize>,
    pub file: Option<PathBuf>,
    pub context_line: Option<String>,
    pub entropy: Option<f64>,
}

/// One reported sensitive-data match: location, classification, and score.
///
/// Findings are append-only — once pushed into [`ScanResult::findings`] they
/// are never mutated.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Finding {
    pub file: PathBuf,
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub pattern_type: PatternType,
    pub severity: Severity,
    pub description: String,
    pub matched_text: String,
    pub context_line: String,
    pub entropy: f64,
    pub risk_score: u32,
}

/// Aggregated output of a single scan.
///
/// All mutators are thread-safe: counters are lock-free atomics, while the
/// findings list, severity histogram, and skip-reason map share a single
/// mutex that is only ever held for the duration of one `push`/`insert`
/// (spec §5: "the mutex is held only briefly").
#[derive(Debug)]
pub struct ScanResult {
    pub(crate) inner: Mutex<ScanResultInner>,
    pub files_scanned: AtomicUsize,
    pub files_skipped: AtomicUsize,
    pub errors: AtomicUsize,
    pub bytes_scanned: AtomicU64,
    pub(crate) start: Instant,
    pub(crate) end: Mutex<Option<Instant>>,
}

#[derive(Debug, Default)]
pub(crate) struct ScanResultInner {
    pub findings: Vec<Finding>,
    pub severity_histogram: HashMap<Severity, usize>,
    pub skip_reasons: HashMap<PathBuf, String>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ScanResultInner::default()),
            files_scanned: AtomicUsize::new(0),
            files_skipped: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            bytes_scanned: AtomicU64::new(0),
            start: Instant::now(),
            end: Mutex::new(None),
        }
    }

    /// Appends a finding and bumps the severity histogram (I2/I3).
    pub fn push_finding(&self, finding: Finding) {
        let mut inner = self.inner.lock().unwrap();
        *inner.severity_histogram.entry(finding.severity).or_insert(0) += 1;
        inner.findings.push(finding);
    }

    /// Records a human-readable reason a path was skipped.
    pub fn record_skip_reason(&self, path: PathBuf, reason: impl Into<String>) {
        let mut inner = self.inner.lock().unwrap();
        inner.skip_reasons.insert(path, reason.into());
    }

    pub fn mark_complete(&self) {
        let mut end = self.end.lock().unwrap();
        if end.is_none() {
            *end = Some(Instant::now());
        }
    }

    pub fn elapsed(&self) -> Duration {
        match *self.end.lock().unwrap() {
            Some(end) => end.saturating_duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.inner.lock().unwrap().findings.clone()
    }

    pub fn findings_len(&self) -> usize {
        self.inner.lock().unwrap().findings.len()
    }

    pub fn severity_histogram(&self) -> HashMap<Severity, usize> {
        self.inner.lock().unwrap().severity_histogram.clone()
    }

    pub fn skip_reasons(&self) -> HashMap<PathBuf, String> {
        self.inner.lock().unwrap().skip_reasons.clone()
    }
}

impl Default for ScanResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of scan progress, suitable for a UI to poll or
/// receive via [`ScanEvent::Progress`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanProgress {
    pub files_queued: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub findings_count: usize,
    pub errors_count: usize,
    pub bytes_scanned: u64,
    pub current_file: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Lifecycle state of a [`crate::scanner::Scanner`].
///
/// Transitions: `Idle -> Running -> {Paused <-> Running} -> {Completed | Cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    Running,
    Paused,
    Cancelled,
    Completed,
}

impl ScanState {
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Cancelled,
            4 => Self::Completed,
            _ => unreachable!("invalid ScanState discriminant"),
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Paused => 2,
            Self::Cancelled => 3,
            Self::Completed => 4,
        }
    }
}

/// Tagged union of everything a UI or log sink might want to observe during
/// a scan. Consumers drain the event channel until it closes; the terminal
/// [`ScanEvent::ScanCompleted`]/[`ScanEvent::ScanCancelled`] is always the
/// last value seen (I4).
#[derive(Debug, Clone)]
pub enum ScanEvent {
    ScanStarted {
        root: PathBuf,
    },
    FileStarted {
        file: PathBuf,
    },
    Finding(Finding),
    FileCompleted {
        file: PathBuf,
    },
    FileSkipped {
        file: PathBuf,
        reason: String,
    },
    Error {
        file: Option<PathBuf>,
        message: String,
    },
    Progress(ScanProgress),
    LogInfo(String),
    LogWarning(String),
    LogError(String),
    ScanPaused,
    ScanResumed,
    ScanCompleted(ScanSummary),
    ScanCancelled(ScanSummary),
}

/// Terminal summary carried by the final scan event.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub findings: usize,
    pub bytes_scanned: u64,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// MRZ types (spec §3 / §4.6)
// ---------------------------------------------------------------------------

/// MRZ document layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum MrzType {
    Td1,
    Td2,
    Td3,
    MrvA,
    MrvB,
    Unknown,
}

/// Result of validating one MRZ check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CheckDigitResult {
    pub expected: u8,
    pub computed: u8,
}

impl CheckDigitResult {
    pub fn passed(&self) -> bool {
        self.expected == self.computed
    }
}

/// Parsed MRZ fields plus check-digit results and a confidence score.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ParsedMrz {
    pub mrz_type: MrzType,
    pub issuing_country: String,
    pub surname: String,
    pub given_names: String,
    pub document_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub sex: char,
    pub expiry: String,
    pub personal_number: String,
    pub optional_data: String,
    pub check_digits: HashMap<String, CheckDigitResult>,
    pub confidence: u32,
}

impl ParsedMrz {
    /// "valid" iff confidence >= 50 and at least one check digit passed (spec §3).
    pub fn is_valid(&self) -> bool {
        self.confidence >= 50 && self.check_digits.values().any(|r| r.passed())
    }
}
