use serde::Serialize;

/// Killed/total pair as scraped from a report, before any adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub killed: u32,
    pub total: u32,
}

/// Mutation coverage of one class against its own test class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCoverage {
    pub class_name: String,
    pub killed: u32,
    pub total: u32,
    /// `total - killed`; negative only when the ignore file over-credits a class
    pub survived: i64,
    /// `killed / total`, or `None` for a class without mutants
    pub percentage: Option<f64>,
}

impl ClassCoverage {
    pub fn new(class_name: impl Into<String>, killed: u32, total: u32) -> Self {
        Self {
            class_name: class_name.into(),
            killed,
            total,
            survived: i64::from(total) - i64::from(killed),
            percentage: ratio(u64::from(killed), u64::from(total)),
        }
    }

    /// True when more mutants are credited as killed than were generated
    pub fn is_over_credited(&self) -> bool {
        self.killed > self.total
    }
}

/// Grand totals over every processed class
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CoverageTotals {
    pub killed: u64,
    pub total: u64,
    pub survived: i64,
    pub percentage: Option<f64>,
}

impl CoverageTotals {
    pub fn from_classes(classes: &[ClassCoverage]) -> Self {
        let killed = classes.iter().map(|c| u64::from(c.killed)).sum();
        let total = classes.iter().map(|c| u64::from(c.total)).sum();
        let survived = classes.iter().map(|c| c.survived).sum();
        Self {
            killed,
            total,
            survived,
            percentage: ratio(killed, total),
        }
    }
}

fn ratio(killed: u64, total: u64) -> Option<f64> {
    if total > 0 {
        Some(killed as f64 / total as f64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survivors_follow_killed_and_total() {
        let c = ClassCoverage::new("Alpha", 8, 10);
        assert_eq!(c.survived, 2);
        assert_eq!(c.percentage, Some(0.8));
        assert!(!c.is_over_credited());
    }

    #[test]
    fn zero_mutants_has_no_percentage() {
        let c = ClassCoverage::new("Empty", 0, 0);
        assert_eq!(c.survived, 0);
        assert_eq!(c.percentage, None);
    }

    #[test]
    fn over_credit_goes_negative_instead_of_clamping() {
        let c = ClassCoverage::new("Beta", 12, 10);
        assert_eq!(c.survived, -2);
        assert!(c.is_over_credited());
    }

    #[test]
    fn totals_sum_every_class() {
        let classes = vec![
            ClassCoverage::new("Alpha", 8, 10),
            ClassCoverage::new("Beta", 10, 10),
            ClassCoverage::new("Gamma", 3, 10),
        ];
        let totals = CoverageTotals::from_classes(&classes);
        assert_eq!(totals.killed, 21);
        assert_eq!(totals.total, 30);
        assert_eq!(totals.survived, 9);
        assert_eq!(totals.percentage, Some(0.7));
    }
}
