use clap::ValueEnum;
use strum::{Display, EnumString};

/// Ordering applied to the per-class rows before printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
pub enum SortKey {
    /// Alphabetically by class name
    #[value(name = "a", alias = "alphabetical")]
    #[strum(to_string = "alphabetical", serialize = "a")]
    Alphabetical,
    /// Descending by percentage of killed mutants
    #[value(name = "p", alias = "percentage")]
    #[strum(to_string = "percentage", serialize = "p")]
    PercentageDescending,
    /// Ascending by number of surviving mutants
    #[default]
    #[value(name = "s", alias = "survivors")]
    #[strum(to_string = "survivors", serialize = "s")]
    SurvivorsAscending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Options for a single report run, fixed once the arguments are parsed
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub package_filter: Option<String>,
    pub report_only: bool,
    pub survivors_only: bool,
    pub sort_key: SortKey,
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sort_key_parses_short_and_long_names() {
        assert_eq!(<SortKey as FromStr>::from_str("a").unwrap(), SortKey::Alphabetical);
        assert_eq!(
            <SortKey as FromStr>::from_str("percentage").unwrap(),
            SortKey::PercentageDescending
        );
        assert_eq!(<SortKey as FromStr>::from_str("s").unwrap(), SortKey::SurvivorsAscending);
        assert!(<SortKey as FromStr>::from_str("x").is_err());
        assert_eq!(SortKey::default().to_string(), "survivors");
    }
}
