//! # datasentry-core
//!
//! A concurrent filesystem secret-scanning engine.
//!
//! `datasentry-core` walks a directory tree with a bounded worker pool,
//! classifies and reads textual content, matches a catalog of sensitive-data
//! patterns (credentials, cryptographic material, personal identifiers,
//! financial numbers, identity documents), scores each hit, and streams
//! findings to an observer while exposing pause/resume/cancel control.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use datasentry_core::{config::ScanConfig, scanner::{CancellationToken, Scanner}};
//!
//! let scanner = Scanner::new(ScanConfig::default());
//! let cancel = CancellationToken::new();
//! let result = scanner.scan(Path::new("./some-dir"), &cancel).expect("scan failed");
//!
//! println!("{} findings in {} files", result.findings_len(), result.files_scanned.load(std::sync::atomic::Ordering::SeqCst));
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around a pipeline:
//!
//! 1. **[`model`]** — core value types: [`model::Severity`], [`model::PatternType`],
//!    [`model::Finding`], [`model::ScanResult`], [`model::ScanEvent`].
//! 2. **[`patterns`]** — the compiled, process-wide pattern catalog.
//! 3. **[`entropy`]**, **[`luhn`]**, **[`scorer`]** — the entropy calculator, Luhn
//!    validator, and composite risk scorer consumed by the scanner.
//! 4. **[`ignore`]** — path-eligibility filtering (directory/file/extension
//!    skip-sets, glob patterns, per-root ignore file).
//! 5. **[`mrz`]** — ICAO 9303 machine-readable-zone parsing and check-digit
//!    validation.
//! 6. **[`image_analyzer`]** — multi-signal identity-document classification
//!    for images and rasterized document pages.
//! 7. **[`extract`]** — the text-extraction boundary the scanner consumes;
//!    the engine never decodes documents, archives, or images itself.
//! 8. **[`scanner`]** — the streaming scan engine: directory walker, bounded
//!    worker pool, pause/resume/cancel, and event streaming.
//! 9. **[`config`]** — the engine's programmatic configuration knobs.
//! 10. **[`error`]** — crate-level error types.
//!
//! This crate has no CLI or report-formatting surface of its own — those
//! are external collaborators that consume a finished [`model::ScanResult`]
//! or drain the [`model::ScanEvent`] stream produced by [`scanner::Scanner::scan`].

pub mod config;
pub mod entropy;
pub mod error;
pub mod extract;
pub mod ignore;
pub mod image_analyzer;
pub mod luhn;
pub mod model;
pub mod mrz;
pub mod patterns;
pub mod scanner;
pub mod scorer;
