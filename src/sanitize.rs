//! Short, human-readable file identifiers for issue summaries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default source-file pattern. Only segments that contain an alphanumeric
/// stem followed by a `p`/`h` extension (`.php`, `.phtml`, `.h`, ...) match.
pub const DEFAULT_FILE_PATTERN: &str = r"[a-zA-Z0-9]+\.[php]+";

static DEFAULT_FILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_FILE_PATTERN).expect("invalid default file pattern"));

/// Extracts the source file name from the full path reported by the runner.
#[derive(Debug, Clone)]
pub struct FileNameSanitizer {
    pattern: Regex,
}

impl Default for FileNameSanitizer {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_FILE_REGEX.clone(),
        }
    }
}

impl FileNameSanitizer {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Concatenates every `/`-separated segment of `path` containing a match.
    /// Returns an empty string when nothing matches.
    pub fn sanitize(&self, path: &str) -> String {
        path.split('/')
            .filter(|segment| self.pattern.is_match(segment))
            .collect()
    }
}
