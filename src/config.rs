//! Programmatic configuration for the scan engine.
//!
//! There is no application-level config *file* inside the core — the CLI
//! driver and other embedders own that (spec §1's excluded collaborators).
//! [`ScanConfig`] is the engine's own in-memory knob set (spec §4.8),
//! constructed programmatically with a [`Default`] impl carrying sane
//! limits, in the teacher's `Config`-with-validated-defaults idiom.

use std::collections::HashSet;

/// Default maximum file size eligible for scanning: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Upper bound on configurable worker-pool concurrency (spec §5).
pub const MAX_CONCURRENCY: usize = 64;

/// Capacity of the bounded path queue and event channel (spec §4.8/§5).
pub const CHANNEL_CAPACITY: usize = 1000;

/// Every configurable knob the streaming scanner reads (spec §4.8).
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Files larger than this are skipped before being opened.
    pub max_file_size: u64,
    /// Worker-pool size, clamped to `[1, 64]`.
    pub max_concurrent: usize,
    /// Whether symlinked files are followed and scanned.
    pub follow_symlinks: bool,
    /// Whether files that look binary (a null byte in the first 512 bytes)
    /// are scanned anyway.
    pub scan_binaries: bool,
    /// If non-empty, only files with one of these extensions (no leading
    /// dot, lowercase) are scanned.
    pub include_exts: HashSet<String>,
    /// Files with one of these extensions are always skipped, even if
    /// `include_exts` would otherwise admit them.
    pub exclude_exts: HashSet<String>,
    /// If non-empty, only paths under one of these directory names are
    /// scanned.
    pub include_dirs: HashSet<String>,
    /// Paths under one of these directory names are always skipped.
    pub exclude_dirs: HashSet<String>,
    /// Offer document files (pdf/docx/doc/xlsx/xls) to the text extractor.
    pub enable_documents: bool,
    /// Offer archive files (zip/tar/gz/tgz) to the text extractor.
    pub enable_archives: bool,
    /// Offer image files (png/jpg/jpeg/gif/bmp/tiff) to the text extractor.
    pub enable_images: bool,
    /// Run image-document analysis on each page of a PDF once it has been
    /// rasterized by the extractor.
    pub enable_ocr: bool,
}

impl ScanConfig {
    /// Clamps `max_concurrent` into `[1, MAX_CONCURRENCY]`, falling back to
    /// the host's available parallelism when unset.
    pub fn resolved_concurrency(&self) -> usize {
        self.max_concurrent.clamp(1, MAX_CONCURRENCY)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_concurrent: available.clamp(1, MAX_CONCURRENCY),
            follow_symlinks: false,
            scan_binaries: false,
            include_exts: HashSet::new(),
            exclude_exts: HashSet::new(),
            include_dirs: HashSet::new(),
            exclude_dirs: HashSet::new(),
            enable_documents: false,
            enable_archives: false,
            enable_images: false,
            enable_ocr: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_concurrency_is_at_least_one() {
        let config = ScanConfig::default();
        assert!(config.resolved_concurrency() >= 1);
        assert!(config.resolved_concurrency() <= MAX_CONCURRENCY);
    }

    #[test]
    fn concurrency_is_clamped() {
        let mut config = ScanConfig::default();
        config.max_concurrent = 0;
        assert_eq!(config.resolved_concurrency(), 1);

        config.max_concurrent = 9000;
        assert_eq!(config.resolved_concurrency(), MAX_CONCURRENCY);
    }
}
