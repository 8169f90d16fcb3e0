use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::types::Fraction;

/// A row for the requested file exists but has no `killed/total` legend
#[derive(Debug, Error, PartialEq, Eq)]
#[error("coverage row carries no killed/total legend")]
pub struct MissingLegend;

/// Pulls a class's killed/total figure out of a report fragment.
pub trait CoverageScraper {
    /// `Ok(None)` when the fragment has no row for `file_name`.
    fn scrape(&self, fragment: &str, file_name: &str) -> Result<Option<Fraction>, MissingLegend>;
}

static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<tr>.*?</tr>").expect("invalid ROW_RE pattern"));
static CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<td>.*?</td>").expect("invalid CELL_RE pattern"));
static LEGEND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<div class="coverage_legend">(\d+)/(\d+)</div>"#)
        .expect("invalid LEGEND_RE pattern")
});

/// Reads the package `index.html` PIT writes for each test class report.
///
/// Relies on PIT's fixed table layout: one `<tr>` per source file, the file name
/// as a link text, and mutation coverage in the third `<td>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PitHtmlScraper;

impl CoverageScraper for PitHtmlScraper {
    fn scrape(&self, fragment: &str, file_name: &str) -> Result<Option<Fraction>, MissingLegend> {
        let needle = format!(">{file_name}");
        let Some(row) = ROW_RE
            .find_iter(fragment)
            .map(|m| m.as_str())
            .find(|row| row.contains(&needle))
        else {
            return Ok(None);
        };

        let cell = CELL_RE.find_iter(row).nth(2).ok_or(MissingLegend)?;
        let caps = LEGEND_RE.captures(cell.as_str()).ok_or(MissingLegend)?;
        let killed = caps[1].parse().map_err(|_| MissingLegend)?;
        let total = caps[2].parse().map_err(|_| MissingLegend)?;
        Ok(Some(Fraction { killed, total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = r#"
<table>
    <thead><tr><th>Name</th><th>Line Coverage</th><th>Mutation Coverage</th></tr></thead>
    <tbody>
        <tr>
            <td><a href="./FooBar.java.html">FooBar.java</a></td>
            <td>90%</td>
            <td><div class="coverage_percentage">50%</div>
                <div class="coverage_legend">1/2</div></td>
        </tr>
        <tr>
            <td><a href="./Bar.java.html">Bar.java</a></td>
            <td><div class="coverage_percentage">75%</div>
                <div class="coverage_legend">6/8</div></td>
            <td><div class="coverage_percentage">80%</div>
                <div class="coverage_legend">8/10</div></td>
        </tr>
    </tbody>
</table>
"#;

    #[test]
    fn reads_the_third_cell_of_the_matching_row() {
        let fraction = PitHtmlScraper.scrape(FRAGMENT, "Bar.java").unwrap();
        assert_eq!(fraction, Some(Fraction { killed: 8, total: 10 }));
    }

    #[test]
    fn file_names_must_match_from_the_start() {
        let fraction = PitHtmlScraper.scrape(FRAGMENT, "FooBar.java").unwrap();
        assert_eq!(fraction, Some(Fraction { killed: 1, total: 2 }));
        assert_eq!(PitHtmlScraper.scrape(FRAGMENT, "oBar.java").unwrap(), None);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert_eq!(PitHtmlScraper.scrape(FRAGMENT, "bar.java").unwrap(), None);
    }

    #[test]
    fn row_without_legend_is_an_error() {
        let fragment = "<tr><td>>Baz.java</td><td></td><td>n/a</td></tr>";
        assert_eq!(PitHtmlScraper.scrape(fragment, "Baz.java"), Err(MissingLegend));
        let fragment = "<tr><td>>Baz.java</td></tr>";
        assert_eq!(PitHtmlScraper.scrape(fragment, "Baz.java"), Err(MissingLegend));
    }
}
