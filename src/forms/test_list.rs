use regex::Regex;
use url::Url;

use super::template::{ObjectBuilder, TemplateContext, TemplateValue};
use super::{elapsed_cell, test_url, Form};
use crate::error::Error;
use crate::report::group::{filter_groups, group_by_display_name, sort_groups, GroupComparator, TestGroup};
use crate::report::highlight::{Highlight, Highlighter};
use crate::report::test::{priority_order, TestRecord};

const TEMPLATE: &str = include_str!("templates/test_list.liquid");

const EVEN_ROW_CLASS: &str = "shadeEvenRow";
const ODD_ROW_CLASS: &str = "shadeOddRow";

/// Test results grouped by display name. Every execution gets a row of
/// its own unless the list is collapsed.
#[derive(Debug)]
pub struct TestListForm {
    form_url: Url,
    groups: Vec<TestGroup>,
    highlighter: Highlighter,
    collapsed: bool,
}

impl TestListForm {
    pub fn new(form_url: Url, tests: Vec<TestRecord>) -> Self {
        Self {
            form_url,
            groups: group_by_display_name(tests),
            highlighter: Highlighter::default(),
            collapsed: false,
        }
    }

    pub fn sort(&mut self, comparator: &dyn GroupComparator) {
        sort_groups(&mut self.groups, comparator);
    }

    pub fn filter(&mut self, filter: &Regex) {
        let groups = std::mem::take(&mut self.groups);
        self.groups = filter_groups(groups, filter);
    }

    pub fn set_highlighter(&mut self, highlighter: Highlighter) {
        self.highlighter = highlighter;
    }

    /// Collapsed groups show only their most significant execution.
    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    fn rows(&self) -> Vec<TemplateValue> {
        let mut rows = Vec::new();
        for (idx, group) in self.groups.iter().enumerate() {
            let number = idx + 1;
            let shade = if number % 2 == 0 {
                EVEN_ROW_CLASS
            } else {
                ODD_ROW_CLASS
            };
            let tests: Vec<&TestRecord> = if self.collapsed {
                group
                    .tests()
                    .iter()
                    .min_by(|test1, test2| priority_order(test1, test2))
                    .into_iter()
                    .collect()
            } else {
                group.tests().iter().collect()
            };
            let rowspan = tests.len();
            for (pos, test) in tests.into_iter().enumerate() {
                let class = self.highlighter.classify(test);
                let row = ObjectBuilder::new()
                    .flag("first", pos == 0)
                    .count("number", number)
                    .count("rowspan", rowspan)
                    .count("count", group.test_count())
                    .text("group", group.name())
                    .text("elapsed", elapsed_cell(test))
                    .text("status", test.display_status())
                    .text("url", test_url(&self.form_url, test).as_str())
                    .text("row_class", shade)
                    .text(
                        "status_class",
                        class.status.map(Highlight::column_class).unwrap_or(shade),
                    )
                    .text(
                        "time_class",
                        class.duration.map(Highlight::column_class).unwrap_or(shade),
                    );
                rows.push(row.into_value());
            }
        }
        rows
    }
}

impl Form for TestListForm {
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
