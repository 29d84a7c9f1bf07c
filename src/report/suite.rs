use std::collections::HashMap;
use std::time::Duration;

use super::highlight::{Highlight, HighlightCriteria, Highlighter};
use super::status::TestStatus;
use super::test::TestRecord;

/// Name of the summary collecting tests that carry neither a group name
/// nor a suite.
pub const UNGROUPED_SUITE: &str = "Ungrouped";

/// Outcome counts of the tests run by a suite.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuiteTotals {
    pub passing: usize,
    /// Failures and errors.
    pub failing: usize,
    pub skipped: usize,
    pub blacklisted: usize,
    pub killed: usize,
    pub long: usize,
    pub total: usize,
}

impl SuiteTotals {
    /// Tests that reached a final status.
    pub fn completed(&self) -> usize {
        self.passing + self.failing + self.skipped + self.blacklisted + self.killed
    }

    #[inline]
    pub fn is_incomplete(&self) -> bool {
        self.total > self.completed()
    }
}

/// Classes applied to the cells of a suite row. Cells without a
/// highlight of their own share the row class.
#[derive(Debug, Default, PartialEq)]
pub struct SuiteRowClasses {
    pub row: &'static str,
    pub passing: &'static str,
    pub failing: &'static str,
    pub skipped: &'static str,
    pub long: &'static str,
    pub total: &'static str,
}

impl SuiteRowClasses {
    fn filled(highlight: Highlight) -> Self {
        let class = highlight.row_class();
        Self {
            row: class,
            passing: class,
            failing: class,
            skipped: class,
            long: class,
            total: class,
        }
    }
}

/// Tests sharing a group name, summarized into a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteSummary {
    name: String,
    suite_id: u64,
    status: TestStatus,
    elapsed: Duration,
    totals: SuiteTotals,
}

impl SuiteSummary {
    pub fn new(name: String) -> Self {
        Self {
            name,
            suite_id: 0,
            status: TestStatus::Unknown,
            elapsed: Duration::default(),
            totals: SuiteTotals::default(),
        }
    }

    pub fn add_test(&mut self, test: &TestRecord, highlighter: &Highlighter) {
        if self.suite_id == 0 {
            self.suite_id = test.suite_id;
        }
        self.status = self.status.update(test.status);
        self.elapsed = self.elapsed.saturating_add(test.elapsed().unwrap_or_default());

        let totals = &mut self.totals;
        totals.total += 1;
        match test.status {
            TestStatus::Pass => totals.passing += 1,
            TestStatus::Fail | TestStatus::Error => totals.failing += 1,
            TestStatus::Skip => totals.skipped += 1,
            TestStatus::Blacklist => totals.blacklisted += 1,
            TestStatus::Kill => totals.killed += 1,
            TestStatus::Running | TestStatus::Pending | TestStatus::Unknown => {}
        }
        if highlighter.is_long_running(test) {
            totals.long += 1;
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First suite any member ran in, 0 when none did.
    #[inline]
    pub fn suite_id(&self) -> u64 {
        self.suite_id
    }

    /// Status of the suite after folding in every member in order.
    #[inline]
    pub fn status(&self) -> TestStatus {
        self.status
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn totals(&self) -> &SuiteTotals {
        &self.totals
    }

    /// Incomplete suites are always marked. Otherwise the first rule that
    /// applies under `criteria` wins: failures (with long running tests
    /// marked as well), passing tests, long running tests, skipped tests.
    pub fn classes(&self, criteria: HighlightCriteria) -> SuiteRowClasses {
        let totals = &self.totals;
        if totals.is_incomplete() {
            return SuiteRowClasses {
                total: Highlight::Warning.column_class(),
                ..SuiteRowClasses::filled(Highlight::Warning)
            };
        }
        match criteria {
            HighlightCriteria::Failing if totals.failing > 0 => {
                let mut classes = SuiteRowClasses::filled(Highlight::Error);
                classes.failing = Highlight::Error.column_class();
                if totals.long > 0 {
                    classes.long = Highlight::Timing.column_class();
                }
                classes
            }
            HighlightCriteria::Passing if totals.passing > 0 => SuiteRowClasses {
                passing: Highlight::Warning.column_class(),
                ..SuiteRowClasses::filled(Highlight::Warning)
            },
            HighlightCriteria::Failing if totals.long > 0 => SuiteRowClasses {
                long: Highlight::Timing.column_class(),
                ..SuiteRowClasses::filled(Highlight::Timing)
            },
            HighlightCriteria::Skipped if totals.skipped > 0 => SuiteRowClasses {
                skipped: Highlight::Warning.column_class(),
                ..SuiteRowClasses::filled(Highlight::Warning)
            },
            _ => SuiteRowClasses::default(),
        }
    }
}

fn suite_name(test: &TestRecord) -> String {
    match test.group_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ if test.has_suite() => format!("Suite {}", test.suite_id),
        _ => UNGROUPED_SUITE.to_owned(),
    }
}

/// Summarizes tests by group name, falling back to the suite they ran
/// in. Summaries appear in the order their first member was seen.
pub fn summarize_suites(tests: &[TestRecord], highlighter: &Highlighter) -> Vec<SuiteSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut suites: Vec<SuiteSummary> = Vec::new();
    for test in tests {
        let name = suite_name(test);
        let idx = match index.get(&name) {
            Some(&idx) => idx,
            None => {
                index.insert(name.clone(), suites.len());
                suites.push(SuiteSummary::new(name));
                suites.len() - 1
            }
        };
        suites[idx].add_test(test, highlighter);
    }
    suites
}
