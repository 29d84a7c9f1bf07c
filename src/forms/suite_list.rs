use regex::Regex;
use url::Url;

use super::template::{ObjectBuilder, TemplateContext, TemplateValue};
use super::Form;
use crate::configuration::constants::params::SUITE_ID_LABEL;
use crate::error::Error;
use crate::report::highlight::Highlighter;
use crate::report::suite::{summarize_suites, SuiteSummary};
use crate::report::test::TestRecord;
use crate::time::format_elapsed;

const TEMPLATE: &str = include_str!("templates/suite_list.liquid");

/// One row of totals per suite.
#[derive(Debug)]
pub struct SuiteListForm {
    form_url: Url,
    suites: Vec<SuiteSummary>,
    highlighter: Highlighter,
}

impl SuiteListForm {
    /// The highlighter decides which tests count as long running, so it
    /// is fixed before the tests are summarized.
    pub fn new(form_url: Url, tests: &[TestRecord], highlighter: Highlighter) -> Self {
        Self {
            form_url,
            suites: summarize_suites(tests, &highlighter),
            highlighter,
        }
    }

    pub fn filter(&mut self, filter: &Regex) {
        self.suites.retain(|suite| filter.is_match(suite.name()));
    }

    pub fn suites(&self) -> &[SuiteSummary] {
        &self.suites
    }

    fn suite_url(&self, suite: &SuiteSummary) -> Option<String> {
        if suite.suite_id() == 0 {
            return None;
        }
        let mut url = self.form_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(SUITE_ID_LABEL, &suite.suite_id().to_string());
        Some(url.to_string())
    }

    fn row(&self, suite: &SuiteSummary) -> TemplateValue {
        let totals = suite.totals();
        let classes = suite.classes(self.highlighter.criteria());
        let total = if totals.is_incomplete() {
            format!("{} of {}", totals.completed(), totals.total)
        } else {
            totals.total.to_string()
        };
        let url = match self.suite_url(suite) {
            Some(url) => TemplateValue::scalar(url),
            None => TemplateValue::Nil,
        };
        ObjectBuilder::new()
            .text("name", suite.name())
            .value("url", url)
            .flag("incomplete", totals.is_incomplete())
            .text("status", suite.status().label())
            .text("elapsed", format_elapsed(suite.elapsed()))
            .count("passing", totals.passing)
            .count("failing", totals.failing)
            .count("skipped", totals.skipped)
            .count("blacklisted", totals.blacklisted)
            .count("long", totals.long)
            .count("killed", totals.killed)
            .text("total", total)
            .text("row_class", classes.row)
            .text("passing_class", classes.passing)
            .text("failing_class", classes.failing)
            .text("skipped_class", classes.skipped)
            .text("long_class", classes.long)
            .text("total_class", classes.total)
            .into_value()
    }
}

impl Form for SuiteListForm {
    fn render(&self, context: &TemplateContext) -> Result<String, Error> {
        let rows: Vec<TemplateValue> = self.suites.iter().map(|suite| self.row(suite)).collect();
        let globals = ObjectBuilder::new()
            .flag("no_results", rows.is_empty())
            .value("rows", TemplateValue::Array(rows))
            .build();
        context.apply(TEMPLATE, &globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::group::full_match_regex;
    use crate::report::highlight::HighlightCriteria;
    use crate::report::status::TestStatus;
    use crate::report::test::tests::record;

    fn member(id: u64, group: &str, status: TestStatus, elapsed_ms: i64) -> TestRecord {
        let mut test = record(id, "t", status, elapsed_ms);
        test.group_name = Some(group.to_owned());
        test
    }

    fn form(tests: &[TestRecord], criteria: HighlightCriteria) -> SuiteListForm {
        SuiteListForm::new(
            Url::parse("http://build.example.com/report/suite").unwrap(),
            tests,
            Highlighter::default().with_criteria(criteria),
        )
    }

    fn render(form: &SuiteListForm) -> String {
        form.render(&TemplateContext::new().unwrap()).unwrap()
    }

    #[test]
    fn test_failing_suite_row() {
        let mut failed = member(1, "web", TestStatus::Fail, 65_000);
        failed.suite_id = 4;
        let html = render(&form(
            &[failed, member(2, "web", TestStatus::Pass, 10)],
            HighlightCriteria::Failing,
        ));

        assert!(html.contains(
            r#"<td class="errorRow"><a href="http://build.example.com/report/suite?suiteId=4">web</a></td>"#
        ));
        assert!(html.contains(r#"<td class="errorRow" align="right" nowrap><b> 1m 05s</b></td>"#));
        assert!(html.contains(r#"<td class="errorColumn" align="right" nowrap><b>1</b></td>"#));
        assert!(html.contains(r#"<td class="errorRow" align="center">FAIL</td>"#));
        assert!(html.contains(r#"<td class="errorRow" align="right" nowrap><b>2</b></td>"#));
    }

    #[test]
    fn test_incomplete_suite_row() {
        let html = render(&form(
            &[
                member(1, "api", TestStatus::Pass, 10),
                member(2, "api", TestStatus::Running, 10),
            ],
            HighlightCriteria::None,
        ));

        assert!(html.contains(r#"<td class="warningRow">api (incomplete)</td>"#));
        assert!(html.contains(r#"<td class="warningColumn" align="right" nowrap><b>1 of 2</b></td>"#));
    }

    #[test]
    fn test_passing_criteria() {
        let html = render(&form(&[member(1, "api", TestStatus::Pass, 10)], HighlightCriteria::Passing));

        assert!(html.contains(r#"<td class="warningColumn" align="right" nowrap><b>1</b></td>"#));
    }

    #[test]
    fn test_filter_keeps_matching_suites() {
        let mut form = form(
            &[
                member(1, "web", TestStatus::Pass, 10),
                member(2, "api", TestStatus::Pass, 10),
            ],
            HighlightCriteria::Failing,
        );
        form.filter(&full_match_regex("we.").unwrap());

        assert_eq!(form.suites().len(), 1);
        assert!(!render(&form).contains("api"));

        form.filter(&full_match_regex("none").unwrap());
        assert!(render(&form).contains("No Results Found"));
    }
}
