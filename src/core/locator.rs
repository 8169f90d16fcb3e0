use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::types::AppResult;

/// Where PIT writes its reports and how they are nested
#[derive(Debug, Clone)]
pub struct ReportLayout {
    /// Root holding the project-wide runs and one directory per test class
    pub root: PathBuf,
    /// Extension of the mutated sources, used in report file names
    pub extension: String,
}

impl ReportLayout {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// PIT's default location: `../<project dir name>-pit-reports`
    pub fn default_root(project_dir: &Path) -> PathBuf {
        let name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        PathBuf::from("..").join(format!("{name}-pit-reports"))
    }

    /// Directory holding the timestamped runs for one test class
    pub fn test_family(&self, test_name: &str) -> PathBuf {
        self.root.join(test_name)
    }

    /// Per-package index fragment inside one test class report
    pub fn fragment_path(&self, report_dir: &Path, package: &str) -> PathBuf {
        report_dir.join(package).join("index.html")
    }

    fn class_report_suffix(&self) -> String {
        format!(".{}.html", self.extension)
    }
}

/// Latest run under a report family: the all-digit subdirectory with the largest value.
///
/// Returns `None` when the family does not exist or holds no such directory.
pub fn latest_report_dir(family: &Path) -> AppResult<Option<PathBuf>> {
    let latest = subdirectories(family)?
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            is_timestamp(&name).then_some((name, path))
        })
        .max_by(|(a, _), (b, _)| numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b)));

    Ok(latest.map(|(name, path)| {
        match report_time(&name) {
            Some(time) => debug!("Using report {} generated at {time}", path.display()),
            None => debug!("Using report {}", path.display()),
        }
        path
    }))
}

/// Class name to owning package, as listed in a project-wide report
#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    packages: Vec<String>,
    classes: BTreeMap<String, String>,
}

impl PackageIndex {
    /// Scan `<report_dir>/<package>/<Class>.<ext>.html` entries.
    ///
    /// An unknown `package_filter` is reported and ignored.
    pub fn scan(
        report_dir: &Path,
        layout: &ReportLayout,
        package_filter: Option<&str>,
    ) -> AppResult<Self> {
        let mut packages: Vec<String> = subdirectories(report_dir)?
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();

        if let Some(filter) = package_filter {
            if packages.iter().any(|p| p == filter) {
                packages = vec![filter.to_string()];
            } else {
                warn!(
                    "Package {filter} could not be found in the list of packages; will continue without package filter."
                );
            }
        }

        let suffix = layout.class_report_suffix();
        let mut classes = BTreeMap::new();
        for package in &packages {
            let pattern = format!(
                "{}/*{}",
                glob::Pattern::escape(&report_dir.join(package).to_string_lossy()),
                glob::Pattern::escape(&suffix)
            );
            for entry in glob::glob(&pattern)?.flatten() {
                if !entry.is_file() {
                    continue;
                }
                let Some(file_name) = entry.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(class_name) = file_name.strip_suffix(&suffix) else {
                    continue;
                };
                if let Some(previous) = classes.insert(class_name.to_string(), package.clone()) {
                    warn!("Class {class_name} found in both {previous} and {package}; using {package}");
                }
            }
        }

        Ok(Self { packages, classes })
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Classes in ascending name order with their package
    pub fn classes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Immediate subdirectories of `dir`, sorted; empty if `dir` is missing
fn subdirectories(dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    Ok(glob::glob(&pattern)?
        .flatten()
        .filter(|p| p.is_dir())
        .collect())
}

fn is_timestamp(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

// Orders digit strings by value without parsing, so overlong names still compare
fn numeric_key(digits: &str) -> (usize, &str) {
    let significant = digits.trim_start_matches('0');
    (significant.len(), significant)
}

/// PIT names each run `yyyyMMddHHmm`
fn report_time(name: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(name, "%Y%m%d%H%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn picks_the_largest_numeric_directory() {
        let tmp = tempdir().unwrap();
        for name in ["202101011200", "99", "202112312359", "latest", "2021x"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        fs::write(tmp.path().join("300000000000000"), "not a dir").unwrap();

        let latest = latest_report_dir(tmp.path()).unwrap().unwrap();
        assert_eq!(latest.file_name().unwrap(), "202112312359");
    }

    #[test]
    fn compares_by_value_not_text() {
        let tmp = tempdir().unwrap();
        for name in ["9", "10", "0011"] {
            fs::create_dir(tmp.path().join(name)).unwrap();
        }
        let latest = latest_report_dir(tmp.path()).unwrap().unwrap();
        assert_eq!(latest.file_name().unwrap(), "0011");
    }

    #[test]
    fn no_report_when_family_is_missing_or_empty() {
        let tmp = tempdir().unwrap();
        assert!(latest_report_dir(&tmp.path().join("nope")).unwrap().is_none());
        fs::create_dir(tmp.path().join("html")).unwrap();
        assert!(latest_report_dir(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn report_time_reads_pit_timestamps() {
        let time = report_time("202103041530").unwrap();
        assert_eq!(time.to_string(), "2021-03-04 15:30:00");
        assert!(report_time("12").is_none());
    }

    #[test]
    fn default_root_sits_next_to_the_project() {
        assert_eq!(
            ReportLayout::default_root(Path::new("/work/shop")),
            PathBuf::from("../shop-pit-reports")
        );
    }

    fn report_with_packages(root: &Path) {
        for (package, class) in [
            ("com.example", "Alpha"),
            ("com.example", "Beta"),
            ("com.example.util", "Gamma"),
        ] {
            let dir = root.join(package);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{class}.java.html")), "").unwrap();
            fs::write(dir.join("index.html"), "").unwrap();
        }
    }

    #[test]
    fn index_maps_classes_to_packages() {
        let tmp = tempdir().unwrap();
        report_with_packages(tmp.path());
        let layout = ReportLayout::new(tmp.path(), "java");

        let index = PackageIndex::scan(tmp.path(), &layout, None).unwrap();
        let classes: Vec<_> = index.classes().collect();
        assert_eq!(
            classes,
            vec![
                ("Alpha", "com.example"),
                ("Beta", "com.example"),
                ("Gamma", "com.example.util"),
            ]
        );
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn package_filter_narrows_or_is_ignored() {
        let tmp = tempdir().unwrap();
        report_with_packages(tmp.path());
        let layout = ReportLayout::new(tmp.path(), "java");

        let index = PackageIndex::scan(tmp.path(), &layout, Some("com.example.util")).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.packages(), ["com.example.util".to_string()]);

        let index = PackageIndex::scan(tmp.path(), &layout, Some("org.missing")).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.packages().len(), 2);
    }
}
