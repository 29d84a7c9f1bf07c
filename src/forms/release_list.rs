use url::Url;

use super::template::{Convert, ObjectBuilder, TemplateContext, TemplateValue};
use super::{Form, FormUrls};
use crate::configuration::constants::params::{
    BUILD_CHANGELIST_LABEL, BUILD_CHANGELIST_OP_LABEL, BUILD_VERSION_LABEL,
};
use crate::error::Error;
use crate::release::model::{ChangelistGroup, ReleaseSummary};
use crate::release::version::{encode_version_param, VersionFormat};

const TEMPLATE: &str = include_str!("templates/release_list.liquid");

/// Search operator selecting builds of exactly one changelist.
const CHANGELIST_OP_EQUAL: &str = "eq";

/// Releases with links to the builds of each changelist. The builds of
/// retired releases start out hidden.
#[derive(Debug)]
pub struct ReleaseListForm {
    form_url: Url,
    summary_url: Url,
    format: VersionFormat,
    releases: Vec<ReleaseSummary>,
}

impl ReleaseListForm {
    pub fn new(urls: &FormUrls, releases: Vec<ReleaseSummary>) -> Self {
        Self {
            form_url: urls.form_url.clone(),
            summary_url: urls.summary_url().clone(),
            format: VersionFormat::default(),
            releases,
        }
    }

    pub fn set_version_format(&mut self, format: VersionFormat) {
        self.format = format;
    }

    fn release_url(&self, release: &ReleaseSummary) -> String {
        format!(
            "{}?{}={}",
            self.form_url,
            BUILD_VERSION_LABEL,
            encode_version_param(&release.build_version)
        )
    }

    fn group(&self, release: &ReleaseSummary, group: &ChangelistGroup<'_>) -> TemplateValue {
        let build = group.head();
        let number = self.format.version_number(&build.build_version);
        let changelist = group.changelist.unwrap_or_default();
        let url = format!(
            "{}?{}={}&{}={}&{}={}",
            self.summary_url,
            BUILD_VERSION_LABEL,
            encode_version_param(&format!("%{}%", number)),
            BUILD_CHANGELIST_OP_LABEL,
            CHANGELIST_OP_EQUAL,
            BUILD_CHANGELIST_LABEL,
            encode_version_param(changelist)
        );
        let version = group
            .changelist
            .and_then(|changelist| release.version_by_changelist(changelist, &self.format));
        ObjectBuilder::new()
            .text("url", url)
            .text("label", format!("{} {}", number, build.release_id))
            .value("version", version.convert())
            .into_value()
    }

    fn release(&self, release: &ReleaseSummary) -> TemplateValue {
        let groups: Vec<TemplateValue> = release
            .changelist_groups()
            .iter()
            .map(|group| self.group(release, group))
            .collect();
        ObjectBuilder::new()
            .text("id", &release.id)
            .text("name", &release.name)
            .text("text", &release.text)
            .text("url", self.release_url(release))
            .flag("retired", release.is_retired())
            .value("groups", TemplateValue::Array(groups))
            .into_value()
    }
}

impl Form for ReleaseListForm {
    fn render(&self, context: &TemplateContext) -> Result<String, Error> {
        let releases: Vec<TemplateValue> = self
            .releases
            .iter()
            .map(|release| self.release(release))
            .collect();
        let globals = ObjectBuilder::new()
            .value("releases", TemplateValue::Array(releases))
            .build();
        context.apply(TEMPLATE, &globals)
    }
}
