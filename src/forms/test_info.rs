use chrono::{DateTime, Utc};

use super::request::FormMode;
use super::template::{Convert, ObjectBuilder, TemplateContext, TemplateValue};
use super::{test_url, Field, Form, FormCapabilities, FormUrls, FULL_DATE_FORMAT};
use crate::configuration::constants::params::{FORM_STATUS_LABEL, TEST_ID_LABEL};
use crate::error::Error;
use crate::report::test::{AcceptanceTestRecord, TestRecord};

const TEMPLATE: &str = include_str!("templates/test_info.liquid");

const NAME_WIDTH: usize = 40;
const STATUS_WIDTH: usize = 40;

/// Authoring details shown for acceptance tests.
#[derive(Debug, Clone, Default)]
pub struct ExtendedInfo {
    pub author: String,
    pub test_cases: Vec<String>,
    pub stories: Vec<String>,
}

struct InfoRow {
    label: &'static str,
    field: Field,
    link: Option<String>,
}

impl Convert<TemplateValue> for InfoRow {
    fn convert(&self) -> TemplateValue {
        ObjectBuilder::new()
            .text("label", self.label)
            .value("field", self.field.convert())
            .value("link", self.link.convert())
            .into_value()
    }
}

/// Details of a single test together with its most recent pass and
/// failure.
#[derive(Debug)]
pub struct TestInfoForm {
    urls: FormUrls,
    capabilities: FormCapabilities,
    input_mode: bool,
    admin_mode: bool,
    test: Option<TestRecord>,
    extended: Option<ExtendedInfo>,
    last_pass: Option<TestRecord>,
    last_fail: Option<TestRecord>,
}

fn full_date(time: Option<DateTime<Utc>>) -> Option<String> {
    time.map(|time| time.format(FULL_DATE_FORMAT).to_string())
}

impl TestInfoForm {
    pub fn new(urls: FormUrls) -> Self {
        Self {
            urls,
            capabilities: FormCapabilities::default(),
            input_mode: false,
            admin_mode: false,
            test: None,
            extended: None,
            last_pass: None,
            last_fail: None,
        }
    }

    pub fn set_capabilities(&mut self, capabilities: FormCapabilities) {
        self.capabilities = capabilities;
    }

    pub fn set_input_mode(&mut self, enabled: bool) {
        self.input_mode = enabled;
    }

    pub fn set_admin_mode(&mut self, enabled: bool) {
        self.admin_mode = enabled;
    }

    pub fn set_values(
        &mut self,
        test: Option<TestRecord>,
        last_pass: Option<TestRecord>,
        last_fail: Option<TestRecord>,
    ) {
        self.test = test;
        self.extended = None;
        self.last_pass = last_pass;
        self.last_fail = last_fail;
    }

    pub fn set_acceptance_values(
        &mut self,
        test: AcceptanceTestRecord,
        last_pass: Option<TestRecord>,
        last_fail: Option<TestRecord>,
    ) {
        let extended = ExtendedInfo {
            author: test.author,
            test_cases: test.test_cases,
            stories: test.stories,
        };
        self.set_values(Some(test.test), last_pass, last_fail);
        self.extended = Some(extended);
    }

    pub fn values(&self) -> Option<&TestRecord> {
        self.test.as_ref()
    }

    fn recent_row(&self, label: &'static str, name: &str, recent: Option<&TestRecord>) -> InfoRow {
        let date = recent.and_then(|test| full_date(test.start_time));
        InfoRow {
            label,
            field: Field {
                name: name.to_owned(),
                value: date.clone().unwrap_or_else(|| "None".to_owned()),
                width: 0,
                disabled: true,
                hidden: false,
            },
            link: recent
                .filter(|_| date.is_some())
                .map(|test| test_url(&self.urls.form_url, test).to_string()),
        }
    }

    fn rows(&self) -> Vec<InfoRow> {
        let test = self.test.as_ref();
        let text = |name: &str, value: String, width: usize| Field {
            name: name.to_owned(),
            value,
            width,
            disabled: false,
            hidden: false,
        };

        let mut rows = vec![
            InfoRow {
                label: "Test ID",
                field: Field {
                    hidden: true,
                    ..text(TEST_ID_LABEL, test.map(|t| t.id.to_string()).unwrap_or_default(), 0)
                },
                link: None,
            },
            InfoRow {
                label: "Test Name",
                field: text(
                    "testName",
                    test.map(|t| t.display_name.clone()).unwrap_or_default(),
                    NAME_WIDTH,
                ),
                link: test.map(|t| test_url(&self.urls.form_url, t).to_string()),
            },
        ];

        if let Some(extended) = &self.extended {
            rows.push(InfoRow {
                label: "Test Author",
                field: text("author", extended.author.clone(), 0),
                link: None,
            });
            rows.push(InfoRow {
                label: "Test Cases",
                field: text("testcase", extended.test_cases.join(", "), 0),
                link: None,
            });
            rows.push(InfoRow {
                label: "Agile Stories",
                field: text("story", extended.stories.join(", "), 0),
                link: None,
            });
        }

        if self.capabilities.has_date_fields {
            rows.push(InfoRow {
                label: "Run Date",
                field: Field {
                    disabled: true,
                    ..text("runDate", full_date(test.and_then(|t| t.start_time)).unwrap_or_default(), 0)
                },
                link: None,
            });
        }

        if self.capabilities.has_status_field {
            rows.push(InfoRow {
                label: "Status",
                field: text(
                    "status",
                    test.map(|t| t.display_status().to_owned()).unwrap_or_default(),
                    STATUS_WIDTH,
                ),
                link: None,
            });
            rows.push(InfoRow {
                label: "Message",
                field: text("message", test.map(|t| t.message.clone()).unwrap_or_default(), 0),
                link: None,
            });
        }

        if self.capabilities.has_date_fields {
            rows.push(self.recent_row("Most Recently Passed", "lastPass", self.last_pass.as_ref()));
            rows.push(self.recent_row("Most Recently Failed", "lastFail", self.last_fail.as_ref()));
        }
        rows
    }

    /// Administrators can remove the test when an admin page is configured.
    fn delete_url(&self) -> Option<String> {
        if !(self.capabilities.admin_renderable && self.admin_mode) {
            return None;
        }
        let test = self.test.as_ref()?;
        let mut url = self.urls.admin_url.clone()?;
        url.query_pairs_mut()
            .append_pair(TEST_ID_LABEL, &test.id.to_string())
            .append_pair(FORM_STATUS_LABEL, FormMode::Delete.label());
        Some(url.to_string())
    }
}

impl Form for TestInfoForm {
    fn render(&self, context: &TemplateContext) -> Result<String, Error> {
        let (hidden, rows): (Vec<InfoRow>, Vec<InfoRow>) =
            self.rows().into_iter().partition(|row| row.field.hidden);
        let hidden: Vec<Field> = hidden.into_iter().map(|row| row.field).collect();
        let globals = ObjectBuilder::new()
            .text("form_url", self.urls.form_url.as_str())
            .flag("input_mode", self.input_mode)
            .value("hidden", hidden.convert())
            .value("rows", rows.convert())
            .value("delete_url", self.delete_url().convert())
            .build();
        context.apply(TEMPLATE, &globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::status::TestStatus;
    use crate::report::test::tests::record;
    use url::Url;

    fn urls() -> FormUrls {
        let mut urls = FormUrls::new(Url::parse("http://build.example.com/report/test").unwrap());
        urls.admin_url = Some(Url::parse("http://build.example.com/admin/test").unwrap());
        urls
    }

    fn render(form: &TestInfoForm) -> String {
        form.render(&TemplateContext::new().unwrap()).unwrap()
    }

    #[test]
    fn test_view_mode() {
        let mut form = TestInfoForm::new(urls());
        form.set_values(
            Some(record(12, "login", TestStatus::Fail, 10)),
            Some(record(9, "login", TestStatus::Pass, 10)),
            None,
        );
        let html = render(&form);

        assert!(html.contains(r#"<input type="hidden" name="testId" value="12"/>"#));
        assert!(html.contains(r#"<a href="http://build.example.com/report/test?testId=12">login</a>"#));
        assert!(html.contains("<td width=\"70%\">Mon, Jun 01, 2020 at 12:00:00</td>"));
        assert!(html.contains("<td width=\"70%\">FAIL</td>"));
        assert!(html.contains(
            r#"<a href="http://build.example.com/report/test?testId=9">Mon, Jun 01, 2020 at 12:00:00</a>"#
        ));
        assert!(html.contains("<b>Most Recently Failed:</b></td>\n    <td width=\"70%\">None</td>"));
        assert!(!html.contains("<form"));
        assert!(!html.contains("Delete"));
    }

    #[test]
    fn test_input_mode_renders_fields() {
        let mut form = TestInfoForm::new(urls());
        form.set_input_mode(true);
        form.set_values(Some(record(12, "login", TestStatus::Pass, 10)), None, None);
        let html = render(&form);

        assert!(html.starts_with("<form action=\"http://build.example.com/report/test\" method=\"post\">"));
        assert!(html.contains(r#"<input type="text" name="testName" value="login" size="40"/>"#));
        assert!(html.contains(r#"name="runDate" value="Mon, Jun 01, 2020 at 12:00:00" disabled/>"#));
        assert!(html.contains(r#"<input type="submit" value="Update"/>"#));
    }

    #[test]
    fn test_capabilities_hide_rows() {
        let mut form = TestInfoForm::new(urls());
        form.set_capabilities(FormCapabilities {
            has_date_fields: false,
            has_status_field: false,
            admin_renderable: true,
        });
        form.set_values(Some(record(12, "login", TestStatus::Pass, 10)), None, None);
        let html = render(&form);

        assert!(!html.contains("Run Date"));
        assert!(!html.contains("Status:"));
        assert!(!html.contains("Message:"));
        assert!(!html.contains("Most Recently"));
        assert!(html.contains("Test Name:"));
    }

    #[test]
    fn test_message_is_shown_with_status() {
        let mut test = record(12, "login", TestStatus::Fail, 10);
        test.message = "expected <200>".to_owned();
        let mut form = TestInfoForm::new(urls());
        form.set_values(Some(test), None, None);

        assert!(render(&form).contains(
            "<b>Message:</b></td>\n    <td width=\"70%\">expected &lt;200&gt;</td>"
        ));
    }

    #[test]
    fn test_acceptance_test_details() {
        let json = r#"{
            "id": 7,
            "display_name": "order entry",
            "status": "PASS",
            "author": "qa",
            "test_cases": ["TC-1", "TC-2"],
            "stories": ["ST-9"]
        }"#;
        let act: AcceptanceTestRecord = serde_json::from_str(json).unwrap();
        let mut form = TestInfoForm::new(urls());
        form.set_acceptance_values(act, None, None);
        let html = render(&form);

        assert!(html.contains("<b>Test Author:</b></td>\n    <td width=\"70%\">qa</td>"));
        assert!(html.contains("TC-1, TC-2"));
        assert!(html.contains("ST-9"));
        assert!(html.contains("<b>Run Date:</b></td>\n    <td width=\"70%\"></td>"));
        assert_eq!(form.values().map(|t| t.id), Some(7));
    }

    #[test]
    fn test_admin_delete_link() {
        let mut form = TestInfoForm::new(urls());
        form.set_admin_mode(true);
        form.set_values(Some(record(12, "login", TestStatus::Pass, 10)), None, None);

        assert!(render(&form).contains(
            r#"<a href="http://build.example.com/admin/test?testId=12&amp;mode=delete">Delete</a>"#
        ));

        form.set_capabilities(FormCapabilities {
            admin_renderable: false,
            ..FormCapabilities::default()
        });
        assert!(!render(&form).contains("Delete"));
    }

    #[test]
    fn test_without_test_fields_are_empty() {
        let html = render(&TestInfoForm::new(urls()));

        assert!(html.contains(r#"<input type="hidden" name="testId" value=""/>"#));
        assert!(html.contains("<b>Test Name:</b></td>\n    <td width=\"70%\"></td>"));
    }
}
