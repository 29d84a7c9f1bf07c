use chrono::{DateTime, Utc};
use url::Url;

use super::template::{ObjectBuilder, TemplateContext, TemplateValue};
use super::{elapsed_cell, test_url, Form, BLANK_CELL, SHORT_DATE_FORMAT};
use crate::error::Error;
use crate::report::highlight::{Classification, Highlight, Highlighter};
use crate::report::test::TestRecord;

const TEMPLATE: &str = include_str!("templates/test_history.liquid");

/// Classes applied to a history row.
#[derive(Debug, Default, PartialEq)]
pub struct RowClasses {
    pub row: &'static str,
    pub status: &'static str,
    pub time: &'static str,
}

impl From<Classification> for RowClasses {
    /// Failures colour the whole row. A long running test without any
    /// other highlight is marked as a timing row.
    fn from(class: Classification) -> Self {
        let mut row = class.status.map(Highlight::row_class);
        let mut status = class.status.map(Highlight::column_class);
        let time = match class.duration {
            Some(highlight) => {
                row = row.or(Some(Highlight::Timing.row_class()));
                status = status.or(Some(Highlight::Timing.row_class()));
                Some(highlight.column_class())
            }
            None => row,
        };
        Self {
            row: row.unwrap_or_default(),
            status: status.unwrap_or_default(),
            time: time.unwrap_or_default(),
        }
    }
}

/// Past executions of a single test.
#[derive(Debug)]
pub struct TestHistoryForm {
    form_url: Url,
    tests: Vec<TestRecord>,
    highlighter: Highlighter,
}

fn timestamp_cell(time: Option<DateTime<Utc>>) -> String {
    time.map(|time| time.format(SHORT_DATE_FORMAT).to_string())
        .unwrap_or_else(|| BLANK_CELL.to_owned())
}

impl TestHistoryForm {
    pub fn new(form_url: Url, tests: Vec<TestRecord>) -> Self {
        Self {
            form_url,
            tests,
            highlighter: Highlighter::default(),
        }
    }

    pub fn set_highlighter(&mut self, highlighter: Highlighter) {
        self.highlighter = highlighter;
    }

    fn rows(&self) -> Vec<TemplateValue> {
        self.tests
            .iter()
            .map(|test| {
                let classes = RowClasses::from(self.highlighter.classify(test));
                ObjectBuilder::new()
                    .text("id", test.id.to_string())
                    .text("url", test_url(&self.form_url, test).as_str())
                    .text("start", timestamp_cell(test.start_time))
                    .text("end", timestamp_cell(test.end_time))
                    .text("elapsed", elapsed_cell(test))
                    .text("status", test.display_status())
                    .text("row_class", classes.row)
                    .text("status_class", classes.status)
                    .text("time_class", classes.time)
                    .into_value()
            })
            .collect()
    }
}

impl Form for TestHistoryForm {
    fn render(&self, context: &TemplateContext) -> Result<String, Error> {
        let rows = self.rows();
        let globals = ObjectBuilder::new()
            .text("form_url", self.form_url.as_str())
            .flag("no_results", rows.is_empty())
            .value("rows", TemplateValue::Array(rows))
            .build();
        context.apply(TEMPLATE, &globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::status::TestStatus;
    use crate::report::test::tests::record;

    fn render(tests: Vec<TestRecord>) -> String {
        let form = TestHistoryForm::new(Url::parse("http://build.example.com/report/test").unwrap(), tests);
        form.render(&TemplateContext::new().unwrap()).unwrap()
    }

    #[test]
    fn test_row_classes() {
        let highlighter = Highlighter::default();

        let failed = RowClasses::from(highlighter.classify(&record(1, "t", TestStatus::Fail, 10)));
        assert_eq!(failed, RowClasses { row: "errorRow", status: "errorColumn", time: "errorRow" });

        let slow = RowClasses::from(highlighter.classify(&record(1, "t", TestStatus::Pass, 400_000)));
        assert_eq!(slow, RowClasses { row: "timingRow", status: "timingRow", time: "timingColumn" });

        let slow_skip = RowClasses::from(highlighter.classify(&record(1, "t", TestStatus::Skip, 400_000)));
        assert_eq!(slow_skip, RowClasses { row: "warningRow", status: "warningColumn", time: "timingColumn" });

        let passed = RowClasses::from(highlighter.classify(&record(1, "t", TestStatus::Pass, 10)));
        assert_eq!(passed, RowClasses::default());
    }

    #[test]
    fn test_history_rows() {
        let html = render(vec![record(7, "login", TestStatus::Fail, 65_000)]);

        assert!(html.contains(
            r#"<td class="errorRow" align="right"><a href="http://build.example.com/report/test?testId=7">7</a></td>"#
        ));
        assert!(html.contains(r#"<td class="errorRow" align="center">2020-06-01 12:00:00</td>"#));
        assert!(html.contains(r#"<td class="errorRow" align="center">2020-06-01 12:01:05</td>"#));
        assert!(html.contains(r#"<td class="errorRow" align="right"> 1m 05s</td>"#));
        assert!(html.contains(r#"<td class="errorColumn" align="center">FAIL</td>"#));
    }

    #[test]
    fn test_missing_timestamps_are_blank() {
        let mut test = record(7, "login", TestStatus::Pass, 10);
        test.start_time = None;
        let html = render(vec![test]);

        assert!(html.contains(r#"<td class="" align="center">&nbsp;</td>"#));
        assert!(html.contains(r#"<td class="" align="right">&nbsp;</td>"#));
        assert!(html.contains(r#"<td class="" align="center">2020-06-01 12:00:00</td>"#));
    }

    #[test]
    fn test_large_ids_are_rendered_verbatim() {
        let html = render(vec![record(u64::MAX, "login", TestStatus::Pass, 10)]);

        assert!(html.contains(&format!("testId={}\">{}</a>", u64::MAX, u64::MAX)));
    }

    #[test]
    fn test_empty_history() {
        assert!(render(Vec::new()).contains("No Results Found"));
    }
}
