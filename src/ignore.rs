//! Path-eligibility filtering: directory/file/extension skip-sets plus
//! glob-derived regex patterns, loadable from a per-root ignore file.
//!
//! Mirrors the teacher's `scanners::which_exists`/suppression-file idiom:
//! a small set of loadable rules decide whether a path is considered at
//! all, evaluated before any scanner ever opens it.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Directory basenames skipped by default (spec §4.5).
const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git", ".hg", ".svn", ".bzr", "node_modules", "vendor", ".cargo", "target", "build", "dist",
    "out", ".venv", "venv", "__pycache__", ".tox", ".coverage",
];

/// File basenames skipped by default.
const DEFAULT_SKIP_FILES: &[&str] = &[
    ".env",
    ".env.local",
    "package-lock.json",
    "yarn.lock",
];

/// Extensions skipped by default (without the leading dot, lowercase).
const DEFAULT_SKIP_EXTS: &[&str] = &[
    "exe", "dll", "so", "dylib", "zip", "tar", "gz", "rar", "7z", "jpg", "png", "gif", "pdf",
    "iso", "mp3", "mp4", "avi", "mov", "log", "bak", "tmp", "swp",
];

/// Document extensions offered to the extractor once [`IgnoreList::enable_documents`] is called.
const DOCUMENT_EXTS: &[&str] = &["pdf", "docx", "doc", "xlsx", "xls"];
/// Archive extensions offered to the extractor once [`IgnoreList::enable_archives`] is called.
const ARCHIVE_EXTS: &[&str] = &["zip", "tar", "gz", "tgz"];
/// Image extensions offered to the extractor once [`IgnoreList::enable_images`] is called.
const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// The media class a file extension routes to at the text-extraction
/// boundary (spec §4.8 step 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaClass {
    Document,
    Archive,
    Image,
}

/// Classifies a (lowercase, no leading dot) extension into the media class
/// that gates it at the extraction boundary, or `None` for plain text.
pub fn classify_extension(ext: &str) -> Option<MediaClass> {
    let lower = ext.to_lowercase();
    if DOCUMENT_EXTS.contains(&lower.as_str()) {
        Some(MediaClass::Document)
    } else if ARCHIVE_EXTS.contains(&lower.as_str()) {
        Some(MediaClass::Archive)
    } else if IMAGE_EXTS.contains(&lower.as_str()) {
        Some(MediaClass::Image)
    } else {
        None
    }
}

/// Decides whether a path is eligible for scanning.
///
/// Built from the default sets in spec §4.5; callers may merge in a
/// per-root ignore file via [`IgnoreList::from_root`] and re-enable
/// document/image/archive extensions so those media classes can be
/// offered to the text-extraction boundary.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    skip_dirs: HashSet<String>,
    skip_files: HashSet<String>,
    skip_exts: HashSet<String>,
    glob_patterns: Vec<Regex>,
}

impl IgnoreList {
    /// The default ignore set, with no per-root overrides.
    pub fn new() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            skip_files: DEFAULT_SKIP_FILES.iter().map(|s| s.to_string()).collect(),
            skip_exts: DEFAULT_SKIP_EXTS.iter().map(|s| s.to_string()).collect(),
            glob_patterns: Vec::new(),
        }
    }

    /// Builds the default set and merges in `<root>/.dataLeak-ignore` if present.
    pub fn from_root(root: &Path) -> Self {
        let mut list = Self::new();
        let ignore_file = root.join(".dataLeak-ignore");
        if let Ok(content) = std::fs::read_to_string(&ignore_file) {
            list.merge_ignore_file(&content);
        }
        list
    }

    /// Parses the per-root ignore-file format (spec §4.5/§6) and merges
    /// the rules into this list.
    pub fn merge_ignore_file(&mut self, content: &str) {
        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(dir) = line.strip_prefix('/') {
                self.skip_dirs.insert(dir.to_string());
            } else if let Some(ext) = line.strip_prefix("*.") {
                if !ext.contains('*') && !ext.contains('?') {
                    self.skip_exts.insert(ext.to_lowercase());
                    continue;
                }
                self.add_glob(line);
            } else if line.contains('*') || line.contains('?') {
                self.add_glob(line);
            } else {
                self.skip_files.insert(line.to_string());
            }
        }
    }

    /// Compiles a glob pattern (`*` -> `[^/]*`, `**` -> `.*`, `?` -> `[^/]`,
    /// other regex metacharacters escaped) and adds it to the pattern list.
    /// Invalid patterns are dropped silently, matching the pattern-catalog's
    /// startup-time failure policy.
    fn add_glob(&mut self, glob: &str) {
        if let Some(re) = glob_to_regex(glob) {
            self.glob_patterns.push(re);
        }
    }

    /// Removes document extensions from the skip set (spec §4.5).
    pub fn enable_documents(&mut self) {
        for ext in DOCUMENT_EXTS {
            self.skip_exts.remove(*ext);
        }
    }

    /// Removes archive extensions from the skip set.
    pub fn enable_archives(&mut self) {
        for ext in ARCHIVE_EXTS {
            self.skip_exts.remove(*ext);
        }
    }

    /// Removes image extensions from the skip set.
    pub fn enable_images(&mut self) {
        for ext in IMAGE_EXTS {
            self.skip_exts.remove(*ext);
        }
    }

    /// `true` if any component of `path` is a skip-directory, the basename
    /// is a skip-file, the extension is skipped, or any glob pattern
    /// matches the full path.
    pub fn should_ignore_path(&self, path: &Path) -> bool {
        for component in path.components() {
            if let Some(name) = component.as_os_str().to_str() {
                if self.skip_dirs.contains(name) {
                    return true;
                }
            }
        }

        if let Some(basename) = path.file_name().and_then(|n| n.to_str()) {
            if self.skip_files.contains(basename) {
                return true;
            }
        }

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if self.skip_exts.contains(&ext.to_lowercase()) {
                return true;
            }
        }

        let path_str = path.to_string_lossy();
        self.glob_patterns.iter().any(|re| re.is_match(&path_str))
    }
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates a shell-style glob into an anchored regex.
fn glob_to_regex(glob: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    pattern.push_str(".*");
                } else {
                    pattern.push_str("[^/]*");
                }
            }
            '?' => pattern.push_str("[^/]"),
            '.' | '+' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            _ => pattern.push(c),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn default_skips_vcs_and_dependency_dirs() {
        let list = IgnoreList::new();
        assert!(list.should_ignore_path(&PathBuf::from("repo/.git/HEAD")));
        assert!(list.should_ignore_path(&PathBuf::from("repo/node_modules/pkg/index.js")));
        assert!(!list.should_ignore_path(&PathBuf::from("repo/src/main.rs")));
    }

    #[test]
    fn default_skips_binary_extensions() {
        let list = IgnoreList::new();
        assert!(list.should_ignore_path(&PathBuf::from("photo.jpg")));
        assert!(!list.should_ignore_path(&PathBuf::from("notes.txt")));
    }

    #[test]
    fn enable_documents_removes_pdf_from_skip_set() {
        let mut list = IgnoreList::new();
        assert!(list.should_ignore_path(&PathBuf::from("report.pdf")));
        list.enable_documents();
        assert!(!list.should_ignore_path(&PathBuf::from("report.pdf")));
    }

    #[test]
    fn ignore_file_directory_and_extension_lines() {
        let mut list = IgnoreList::new();
        list.merge_ignore_file("# comment\n\n/fixtures\n*.secret\ncustom.txt\n*.tmp?\n");
        assert!(list.should_ignore_path(&PathBuf::from("repo/fixtures/a.txt")));
        assert!(list.should_ignore_path(&PathBuf::from("a.secret")));
        assert!(list.should_ignore_path(&PathBuf::from("repo/custom.txt")));
    }

    #[test]
    fn glob_pattern_matches_nested_paths() {
        let mut list = IgnoreList::new();
        list.merge_ignore_file("**/fixtures/*.json\n");
        assert!(list.should_ignore_path(&PathBuf::from("a/b/fixtures/data.json")));
        assert!(!list.should_ignore_path(&PathBuf::from("a/b/fixtures/data.yaml")));
    }
}
