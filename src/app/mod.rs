use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::configuration::constants::params::TEST_ID_LABEL;
use crate::configuration::manifest::{Manifest, ReportKind};
use crate::error::Error;
use crate::forms::release_list::ReleaseListForm;
use crate::forms::request::{id_value, FormMode, QueryRequest, Request, TestFormCriteria};
use crate::forms::suite_list::SuiteListForm;
use crate::forms::template::TemplateContext;
use crate::forms::test_history::TestHistoryForm;
use crate::forms::test_info::TestInfoForm;
use crate::forms::test_list::TestListForm;
use crate::forms::{render_best_effort, Form, FormUrls};
use crate::release::version::VersionFormat;
use crate::report::highlight::Highlighter;
use crate::report::test::TestRecord;
use crate::store::{self, RecordFormat, RecordSource};

fn source<'a>(path: &'a Option<PathBuf>, name: &'static str) -> Result<&'a Path, Error> {
    path.as_deref().ok_or(Error::MissingSource(name))
}

pub struct App {
    manifest: Manifest,
    urls: FormUrls,
    context: TemplateContext,
}

impl App {
    pub fn new(manifest: Manifest) -> Result<Self, Error> {
        Ok(App {
            urls: FormUrls::from(&manifest),
            context: TemplateContext::new()?,
            manifest,
        })
    }

    /// Renders the report named by the manifest for the given query string.
    pub fn run(&self, query: &str) -> Result<String, Error> {
        info!("Rendering {} report '{}'", self.manifest.report, self.manifest.name);
        let request = QueryRequest::parse(query).with_attributes(self.manifest.attributes.clone());
        let now = Instant::now();
        let html = match self.manifest.report {
            ReportKind::List => self.test_list(&request)?,
            ReportKind::History => self.test_history(&request)?,
            ReportKind::Info => self.test_info(&request)?,
            ReportKind::Release => self.release_list()?,
            ReportKind::Suites => self.suite_list(&request)?,
        };
        info!(
            "Rendered {} bytes in {} ms",
            html.len(),
            now.elapsed().as_millis()
        );
        Ok(html)
    }

    /// Request criteria, falling back to the manifest filter.
    fn criteria(&self, req: &dyn Request) -> Result<TestFormCriteria, Error> {
        let mut criteria = TestFormCriteria::from_request(req)?;
        if !criteria.has_filter() {
            if let Some(filter) = &self.manifest.filter {
                criteria.set_filter(filter.as_str())?;
            }
        }
        debug!("Form criteria {:?}", criteria);
        Ok(criteria)
    }

    fn highlighter(&self, criteria: &TestFormCriteria) -> Highlighter {
        Highlighter::new(self.manifest.long_running).with_criteria(criteria.highlight)
    }

    fn load_tests(&self) -> Result<Vec<TestRecord>, Error> {
        store::load_tests(source(&self.manifest.sources.tests, "tests")?)
    }

    fn test_list(&self, req: &dyn Request) -> Result<String, Error> {
        let criteria = self.criteria(req)?;
        let mut form = TestListForm::new(self.urls.form_url.clone(), self.load_tests()?);
        form.sort(&criteria.sort.unwrap_or(self.manifest.group_order));
        if let Some(filter) = criteria.filter() {
            form.filter(filter);
        }
        form.set_collapsed(criteria.is_collapsed());
        form.set_highlighter(self.highlighter(&criteria));
        info!("Listing {} test groups", form.groups().len());
        Ok(render_best_effort(&form, &self.context))
    }

    /// Executions of the test named by `testId`, or every execution when
    /// the request does not name one. An unknown test has no history.
    fn test_history(&self, req: &dyn Request) -> Result<String, Error> {
        let criteria = self.criteria(req)?;
        let mut tests = self.load_tests()?;
        if let Some(id) = id_value(req, TEST_ID_LABEL) {
            let selected = tests
                .iter()
                .find(|test| test.id == id)
                .map(|test| test.display_name.clone());
            match selected {
                Some(name) => tests.retain(|test| test.display_name == name),
                None => {
                    warn!("Test {} not found", id);
                    tests.clear();
                }
            }
        }
        let mut form = TestHistoryForm::new(self.urls.form_url.clone(), tests);
        form.set_highlighter(self.highlighter(&criteria));
        Ok(render_best_effort(&form, &self.context))
    }

    fn test_info(&self, req: &dyn Request) -> Result<String, Error> {
        let sources = &self.manifest.sources;
        let last_pass = match &sources.last_pass {
            Some(path) => store::load_test(path)?,
            None => None,
        };
        let last_fail = match &sources.last_fail {
            Some(path) => store::load_test(path)?,
            None => None,
        };

        let mut form = TestInfoForm::new(self.urls.clone());
        form.set_capabilities(self.manifest.capabilities);
        form.set_input_mode(self.manifest.input_mode || FormMode::from_request(req) == FormMode::Update);
        form.set_admin_mode(self.manifest.admin_mode);

        let path = source(&sources.test, "test")?;
        match RecordSource::open(path)?.format() {
            RecordFormat::Json => match store::load_acceptance_test(path)? {
                Some(act) if !act.author.is_empty() || !act.test_cases.is_empty() || !act.stories.is_empty() => {
                    form.set_acceptance_values(act, last_pass, last_fail)
                }
                act => form.set_values(act.map(|act| act.test), last_pass, last_fail),
            },
            RecordFormat::Csv => form.set_values(store::load_test(path)?, last_pass, last_fail),
        }
        if form.values().is_none() {
            warn!("No test found in {}", path.display());
        }
        form.render(&self.context)
    }

    fn suite_list(&self, req: &dyn Request) -> Result<String, Error> {
        let criteria = self.criteria(req)?;
        let tests = self.load_tests()?;
        let mut form = SuiteListForm::new(self.urls.form_url.clone(), &tests, self.highlighter(&criteria));
        if let Some(filter) = criteria.filter() {
            form.filter(filter);
        }
        info!("Summarizing {} suites", form.suites().len());
        Ok(render_best_effort(&form, &self.context))
    }

    fn release_list(&self) -> Result<String, Error> {
        let releases = store::load_releases(source(&self.manifest.sources.releases, "releases")?)?;
        info!("Listing {} releases", releases.len());
        let mut form = ReleaseListForm::new(&self.urls, releases);
        form.set_version_format(VersionFormat::new(self.manifest.separator));
        form.render(&self.context)
    }
}
