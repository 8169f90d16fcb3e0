use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{AppResult, ReportError};

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*([^:\s]+)\s*:\s*(\d+)").expect("invalid ENTRY_RE pattern")
});

/// Extra kills to credit per class, maintained by hand in `pitest.ignore`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreMap {
    credits: HashMap<String, u32>,
}

impl IgnoreMap {
    /// Load the ignore file if it exists; a missing file is an empty map
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            debug!("No ignore file at {}", path.display());
            return Ok(Self::default());
        }
        let map = Self::parse(&fs::read_to_string(path)?);
        debug!("Loaded {} ignore entries from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parse `<ClassName>:<count>` lines; anything else is skipped.
    /// A repeated class keeps its last count.
    pub fn parse(content: &str) -> Self {
        let credits: HashMap<String, u32> = ENTRY_RE
            .captures_iter(content)
            .filter_map(|caps| Some((caps[1].to_string(), caps[2].parse().ok()?)))
            .collect();
        Self { credits }
    }

    pub fn credit(&self, class_name: &str) -> u32 {
        self.credits.get(class_name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.credits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }
}

/// Counts inline comments marking a mutant as manually confirmed equivalent
#[derive(Debug, Clone)]
pub struct EquivalenceMarker {
    pattern: Regex,
}

impl EquivalenceMarker {
    pub fn new(pattern: &str) -> AppResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn count(&self, source: &str) -> u32 {
        self.pattern.find_iter(source).count() as u32
    }

    /// Count markers in a source file that has to exist
    pub fn count_in_file(&self, path: &Path) -> AppResult<u32> {
        let source = fs::read_to_string(path).map_err(|source| ReportError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.count(&source))
    }
}

/// `<root>/<package as directories>/<Class>.<ext>`
pub fn source_path(root: &Path, package: &str, class_name: &str, extension: &str) -> PathBuf {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
        .join(format!("{class_name}.{extension}"))
}
