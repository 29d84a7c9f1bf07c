use std::time::Duration;

use super::status::TestStatus;
use super::test::TestRecord;

/// Tests running longer than this are flagged as long running.
pub const LONG_RUNNING_MILLIS: u64 = 300_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Error,
    Warning,
    Timing,
}

impl Highlight {
    pub fn row_class(self) -> &'static str {
        match self {
            Highlight::Error => "errorRow",
            Highlight::Warning => "warningRow",
            Highlight::Timing => "timingRow",
        }
    }

    pub fn column_class(self) -> &'static str {
        match self {
            Highlight::Error => "errorColumn",
            Highlight::Warning => "warningColumn",
            Highlight::Timing => "timingColumn",
        }
    }
}

/// Highlights computed for one test, split by the cell they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Classification {
    pub status: Option<Highlight>,
    pub duration: Option<Highlight>,
}

/// Which highlights a form should emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightCriteria {
    None,
    Failing,
    /// Only suite summaries mark passing tests.
    Passing,
    Skipped,
}

impl Default for HighlightCriteria {
    fn default() -> Self {
        HighlightCriteria::Failing
    }
}

impl HighlightCriteria {
    /// Codes follow the form parameter values. Anything else selects the
    /// default.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => HighlightCriteria::None,
            2 => HighlightCriteria::Passing,
            3 => HighlightCriteria::Skipped,
            _ => HighlightCriteria::default(),
        }
    }

    /// Whether a single test may carry `highlight`.
    pub fn allows(self, highlight: Highlight) -> bool {
        match self {
            HighlightCriteria::None | HighlightCriteria::Passing => false,
            HighlightCriteria::Failing => true,
            HighlightCriteria::Skipped => highlight == Highlight::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    long_running: Duration,
    criteria: HighlightCriteria,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(Duration::from_millis(LONG_RUNNING_MILLIS))
    }
}

impl Highlighter {
    pub fn new(long_running: Duration) -> Self {
        Self {
            long_running,
            criteria: HighlightCriteria::default(),
        }
    }

    pub fn with_criteria(mut self, criteria: HighlightCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    #[inline]
    pub fn criteria(&self) -> HighlightCriteria {
        self.criteria
    }

    pub fn is_long_running(&self, test: &TestRecord) -> bool {
        test.elapsed_millis() > self.long_running.as_millis()
    }

    pub fn classify(&self, test: &TestRecord) -> Classification {
        let status = match test.status {
            status if status.is_failure() => Some(Highlight::Error),
            TestStatus::Skip => Some(Highlight::Warning),
            _ => None,
        };
        let duration = if self.is_long_running(test) {
            Some(Highlight::Timing)
        } else {
            None
        };
        Classification {
            status: status.filter(|h| self.criteria.allows(*h)),
            duration: duration.filter(|h| self.criteria.allows(*h)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test::tests::record;

    #[test]
    fn test_failure_is_error() {
        let highlighter = Highlighter::default();
        for status in &[TestStatus::Fail, TestStatus::Error, TestStatus::Kill] {
            let class = highlighter.classify(&record(1, "t", *status, 10));
            assert_eq!(class.status, Some(Highlight::Error));
            assert_eq!(class.duration, None);
        }
    }

    #[test]
    fn test_long_passing_test_only_flags_duration() {
        let class = Highlighter::default().classify(&record(1, "t", TestStatus::Pass, 400_000));

        assert_eq!(class.status, None);
        assert_eq!(class.duration, Some(Highlight::Timing));
    }

    #[test]
    fn test_fast_passing_test_has_no_class() {
        let class = Highlighter::default().classify(&record(1, "t", TestStatus::Pass, 100));

        assert_eq!(class, Classification::default());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let highlighter = Highlighter::default();

        assert!(!highlighter.is_long_running(&record(1, "t", TestStatus::Pass, 300_000)));
        assert!(highlighter.is_long_running(&record(1, "t", TestStatus::Pass, 300_001)));
    }

    #[test]
    fn test_skip_and_unknown_statuses() {
        let highlighter = Highlighter::default();

        assert_eq!(
            highlighter.classify(&record(1, "t", TestStatus::Skip, 10)).status,
            Some(Highlight::Warning)
        );
        assert_eq!(
            highlighter.classify(&record(1, "t", TestStatus::Unknown, 10)),
            Classification::default()
        );
    }

    #[test]
    fn test_missing_timestamps_never_flag_timing() {
        let mut test = record(1, "t", TestStatus::Pass, 900_000);
        test.start_time = None;

        assert_eq!(Highlighter::default().classify(&test).duration, None);
    }

    #[test]
    fn test_criteria_limits_highlights() {
        let failed = record(1, "t", TestStatus::Fail, 900_000);
        let skipped = record(2, "t", TestStatus::Skip, 900_000);
        let none = Highlighter::default().with_criteria(HighlightCriteria::None);
        let skips = Highlighter::default().with_criteria(HighlightCriteria::Skipped);
        let passing = Highlighter::default().with_criteria(HighlightCriteria::Passing);

        assert_eq!(none.classify(&failed), Classification::default());
        assert_eq!(skips.classify(&failed), Classification::default());
        assert_eq!(skips.classify(&skipped).status, Some(Highlight::Warning));
        assert_eq!(skips.classify(&skipped).duration, None);
        assert_eq!(passing.classify(&failed), Classification::default());
    }

    #[test]
    fn test_criteria_codes() {
        assert_eq!(HighlightCriteria::from_code(0), HighlightCriteria::None);
        assert_eq!(HighlightCriteria::from_code(1), HighlightCriteria::Failing);
        assert_eq!(HighlightCriteria::from_code(2), HighlightCriteria::Passing);
        assert_eq!(HighlightCriteria::from_code(3), HighlightCriteria::Skipped);
        assert_eq!(HighlightCriteria::from_code(4), HighlightCriteria::Failing);
        assert_eq!(HighlightCriteria::from_code(-1), HighlightCriteria::Failing);
    }
}
