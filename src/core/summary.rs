use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{ClassCoverage, CoverageTotals, SortKey};

/// Glyph printed in place of a class name on the totals row
pub const TOTALS_GLYPH: &str = "Σ";

/// Sorted, optionally filtered rows plus totals over every class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub classes: Vec<ClassCoverage>,
    pub totals: CoverageTotals,
}

impl Summary {
    /// Totals are taken before `survivors_only` drops fully covered classes.
    pub fn build(mut classes: Vec<ClassCoverage>, sort_key: SortKey, survivors_only: bool) -> Self {
        sort_classes(&mut classes, sort_key);
        let totals = CoverageTotals::from_classes(&classes);
        if survivors_only {
            classes.retain(|c| c.survived != 0);
        }
        Self { classes, totals }
    }

    /// Fixed-width table, one line per class and a closing totals line
    pub fn table_lines(&self) -> Vec<String> {
        let name_width = self
            .classes
            .iter()
            .map(|c| c.class_name.chars().count())
            .max()
            .unwrap_or(0);
        let number_width = self.totals.total.to_string().len();

        let mut lines: Vec<String> = self
            .classes
            .iter()
            .map(|c| {
                format!(
                    "{:<name_width$}: {:>number_width$} / {:>number_width$} ({}, {})",
                    c.class_name,
                    c.killed,
                    c.total,
                    c.survived,
                    format_percentage(c.percentage)
                )
            })
            .collect();
        lines.push(format!(
            "{:>name_width$}: {:>number_width$} / {:>number_width$} ({}, {})",
            TOTALS_GLYPH,
            self.totals.killed,
            self.totals.total,
            self.totals.survived,
            format_percentage(self.totals.percentage)
        ));
        lines
    }
}

/// Order rows in place; the class name is always the last tiebreak
pub fn sort_classes(classes: &mut [ClassCoverage], sort_key: SortKey) {
    match sort_key {
        SortKey::Alphabetical => classes.sort_by(|a, b| a.class_name.cmp(&b.class_name)),
        SortKey::PercentageDescending => classes.sort_by(|a, b| {
            compare_percentage_desc(a.percentage, b.percentage)
                .then_with(|| a.survived.cmp(&b.survived))
                .then_with(|| a.class_name.cmp(&b.class_name))
        }),
        SortKey::SurvivorsAscending => classes.sort_by(|a, b| {
            a.survived
                .cmp(&b.survived)
                .then_with(|| a.class_name.cmp(&b.class_name))
        }),
    }
}

// Classes without mutants have no percentage and go after every real one
fn compare_percentage_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn format_percentage(percentage: Option<f64>) -> String {
    match percentage {
        Some(p) => format!("{:.1}%", p * 100.0),
        None => "N/A".to_string(),
    }
}
