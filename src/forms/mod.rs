pub mod release_list;
pub mod request;
pub mod suite_list;
pub mod template;
pub mod test_history;
pub mod test_info;
pub mod test_list;

use serde_derive::Deserialize;
use url::Url;

use crate::configuration::constants::params::{SUITE_ID_LABEL, TEST_ID_LABEL};
use crate::configuration::manifest::Manifest;
use crate::error::Error;
use crate::report::test::TestRecord;
use crate::time::format_elapsed;

use self::template::{Convert, ObjectBuilder, TemplateContext, TemplateValue};

/// Long date used for run dates, e.g. `Mon, Jun 01, 2020 at 12:00:00`.
pub const FULL_DATE_FORMAT: &str = "%a, %b %d, %Y at %H:%M:%S";
pub const SHORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder rendered in table cells without a value.
pub const BLANK_CELL: &str = "&nbsp;";

pub trait Form {
    fn render(&self, context: &TemplateContext) -> Result<String, Error>;
}

/// Renders `form`, writing the failure into the page when it cannot be
/// rendered.
pub fn render_best_effort(form: &dyn Form, context: &TemplateContext) -> String {
    match form.render(context) {
        Ok(html) => html,
        Err(err) => {
            error!("Unable to render form: {}", err);
            format!("<pre>\n{}\n</pre>\n", escape_html(&err.to_string()))
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Which optional parts of a test form are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormCapabilities {
    pub has_date_fields: bool,
    pub has_status_field: bool,
    pub admin_renderable: bool,
}

impl Default for FormCapabilities {
    fn default() -> Self {
        Self {
            has_date_fields: true,
            has_status_field: true,
            admin_renderable: true,
        }
    }
}

/// Immutable description of a single form input.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct Field {
    pub name: String,
    #[builder(default = "String::new()")]
    pub value: String,
    #[builder(default = "0")]
    pub width: usize,
    #[builder(default = "false")]
    pub disabled: bool,
    #[builder(default = "false")]
    pub hidden: bool,
}

impl Field {
    pub fn builder() -> FieldBuilder {
        FieldBuilder::default()
    }
}

impl Convert<TemplateValue> for Field {
    fn convert(&self) -> TemplateValue {
        ObjectBuilder::new()
            .text("name", &self.name)
            .text("value", &self.value)
            .count("width", self.width)
            .flag("disabled", self.disabled)
            .flag("hidden", self.hidden)
            .into_value()
    }
}

/// Locations the rendered pages link to.
#[derive(Debug, Clone)]
pub struct FormUrls {
    pub form_url: Url,
    pub admin_url: Option<Url>,
    pub summary_url: Option<Url>,
}

impl FormUrls {
    pub fn new(form_url: Url) -> Self {
        Self {
            form_url,
            admin_url: None,
            summary_url: None,
        }
    }

    /// Build summaries are searched through the form url unless a
    /// dedicated one is configured.
    pub fn summary_url(&self) -> &Url {
        self.summary_url.as_ref().unwrap_or(&self.form_url)
    }
}

impl From<&Manifest> for FormUrls {
    fn from(manifest: &Manifest) -> Self {
        Self {
            form_url: manifest.form_url.clone(),
            admin_url: manifest.admin_url.clone(),
            summary_url: manifest.summary_url.clone(),
        }
    }
}

/// Link to the details of a single test. The suite is only referenced
/// when the test belongs to one.
pub fn test_url(base: &Url, test: &TestRecord) -> Url {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        if test.has_suite() {
            query.append_pair(SUITE_ID_LABEL, &test.suite_id.to_string());
        }
        query.append_pair(TEST_ID_LABEL, &test.id.to_string());
    }
    url
}

/// Elapsed time of the test, blank when a timestamp is missing.
pub fn elapsed_cell(test: &TestRecord) -> String {
    test.elapsed()
        .map(format_elapsed)
        .unwrap_or_else(|| BLANK_CELL.to_owned())
}
