use std::collections::HashMap;

use regex::Regex;
use url::form_urlencoded;

use crate::configuration::constants::params::*;
use crate::error::Error;
use crate::report::group::{full_match_regex, GroupOrder};
use crate::report::highlight::HighlightCriteria;

/// Source of the values a form reads while it is being populated.
///
/// Parameters are supplied with the current request, attributes are
/// longer lived values such as the ones kept in a session.
pub trait Request {
    fn parameter(&self, name: &str) -> Option<&str>;
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// Request backed by an url-encoded query string. Attribute names are
/// case-insensitive.
#[derive(Debug, Default, Clone)]
pub struct QueryRequest {
    parameters: HashMap<String, String>,
    attributes: HashMap<String, String>,
}

impl QueryRequest {
    /// The first occurrence of a repeated parameter wins.
    pub fn parse(query: &str) -> Self {
        let mut parameters = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            parameters
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self {
            parameters,
            attributes: HashMap::new(),
        }
    }

    pub fn with_attributes<T>(mut self, iter: T) -> Self
    where
        T: IntoIterator<Item = (String, String)>,
    {
        self.attributes
            .extend(iter.into_iter().map(|(name, value)| (name.to_ascii_lowercase(), value)));
        self
    }
}

impl Request for QueryRequest {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Reads a numeric parameter. Missing or malformed values count as zero.
pub fn int_parameter(req: &dyn Request, name: &str) -> i64 {
    match req.parameter(name) {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            debug!("Ignoring malformed value '{}' of parameter {}", value, name);
            0
        }),
        None => 0,
    }
}

/// Reads an identifier from the parameters, falling back to the attributes.
pub fn id_value(req: &dyn Request, name: &str) -> Option<u64> {
    req.parameter(name)
        .or_else(|| req.attribute(name))
        .and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode {
    View,
    Update,
    Delete,
}

impl FormMode {
    pub fn from_request(req: &dyn Request) -> Self {
        match req.parameter(FORM_STATUS_LABEL) {
            Some("update") => FormMode::Update,
            Some("delete") => FormMode::Delete,
            _ => FormMode::View,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormMode::View => "view",
            FormMode::Update => "update",
            FormMode::Delete => "delete",
        }
    }
}

/// Collapse code that folds every group into a single row.
pub const COLLAPSE_BY_NAME: i64 = 2;

/// How the test forms sort, collapse, highlight and filter results.
#[derive(Debug, Clone, Default)]
pub struct TestFormCriteria {
    /// Overrides the configured group order when present.
    pub sort: Option<GroupOrder>,
    pub collapse: i64,
    pub highlight: HighlightCriteria,
    filter: Option<Regex>,
}

impl TestFormCriteria {
    /// The filter parameter takes precedence over the attribute of the
    /// same name. An expression that does not compile is rejected.
    pub fn from_request(req: &dyn Request) -> Result<Self, Error> {
        let highlight = match req.parameter(FORM_HIGHLIGHT_LABEL) {
            Some(_) => HighlightCriteria::from_code(int_parameter(req, FORM_HIGHLIGHT_LABEL)),
            None => HighlightCriteria::default(),
        };
        let sort = req.parameter(FORM_SORT_LABEL).and_then(|value| match value.parse::<GroupOrder>() {
            Ok(order) => Some(order),
            Err(err) => {
                debug!("{}", err);
                None
            }
        });
        let mut criteria = Self {
            sort,
            collapse: int_parameter(req, FORM_COLLAPSE_LABEL),
            highlight,
            filter: None,
        };
        let regex = req
            .parameter(FORM_FILTER_LABEL)
            .or_else(|| req.attribute(FORM_FILTER_LABEL));
        if let Some(regex) = regex {
            criteria.set_filter(regex)?;
        }
        Ok(criteria)
    }

    pub fn set_filter(&mut self, regex: &str) -> Result<(), Error> {
        let compiled = full_match_regex(regex).map_err(|err| Error::Parameter {
            field: FORM_FILTER_LABEL.to_owned(),
            value: regex.to_owned(),
            cause: err.to_string(),
        })?;
        self.filter = Some(compiled);
        Ok(())
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.collapse == COLLAPSE_BY_NAME
    }

    #[inline]
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filter(&self) -> Option<&Regex> {
        self.filter.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(criteria: &TestFormCriteria, text: &str) -> bool {
        criteria.filter().unwrap().is_match(text)
    }

    #[test]
    fn test_parse_query_string() {
        let req = QueryRequest::parse("?testId=12&filter=log%2Bin&grp=4&grp=5");

        assert_eq!(req.parameter("testId"), Some("12"));
        assert_eq!(req.parameter("filter"), Some("log+in"));
        assert_eq!(req.parameter("grp"), Some("4"));
        assert_eq!(req.parameter("missing"), None);
    }

    #[test]
    fn test_malformed_numbers_default_to_zero() {
        let req = QueryRequest::parse("grp=abc&sort=3&collapse=");

        assert_eq!(int_parameter(&req, "grp"), 0);
        assert_eq!(int_parameter(&req, "sort"), 3);
        assert_eq!(int_parameter(&req, "collapse"), 0);
        assert_eq!(int_parameter(&req, "highlight"), 0);
    }

    #[test]
    fn test_id_value_falls_back_to_attribute() {
        let req = QueryRequest::parse("testId=x")
            .with_attributes(vec![("suiteId".to_owned(), "7".to_owned())]);

        assert_eq!(id_value(&req, "testId"), None);
        assert_eq!(id_value(&req, "suiteId"), Some(7));
    }

    #[test]
    fn test_criteria_from_request() {
        let req = QueryRequest::parse("sort=priority&collapse=2&highlight=0&filter=login.*");
        let criteria = TestFormCriteria::from_request(&req).unwrap();

        assert_eq!(criteria.sort, Some(GroupOrder::Priority));
        assert!(criteria.is_collapsed());
        assert_eq!(criteria.highlight, HighlightCriteria::None);
        assert!(matches(&criteria, "login_admin"));
        assert!(!matches(&criteria, "admin_login"));
    }

    #[test]
    fn test_filter_parameter_overrides_attribute() {
        let req = QueryRequest::parse("filter=checkout")
            .with_attributes(vec![("filter".to_owned(), "login".to_owned())]);
        let criteria = TestFormCriteria::from_request(&req).unwrap();

        assert!(matches(&criteria, "checkout"));
        assert!(!matches(&criteria, "login"));

        let session = QueryRequest::default()
            .with_attributes(vec![("filter".to_owned(), "login".to_owned())]);
        assert!(matches(&TestFormCriteria::from_request(&session).unwrap(), "login"));
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let req = QueryRequest::parse("filter=login(");
        let err = TestFormCriteria::from_request(&req).unwrap_err();

        assert!(err.to_string().contains("field=filter, value=login("));
    }

    #[test]
    fn test_without_filter_everything_matches() {
        let criteria = TestFormCriteria::from_request(&QueryRequest::default()).unwrap();

        assert!(!criteria.has_filter());
        assert!(criteria.filter().is_none());
        assert_eq!(criteria.highlight, HighlightCriteria::Failing);
        assert_eq!(criteria.sort, None);
    }

    #[test]
    fn test_form_mode() {
        assert_eq!(FormMode::from_request(&QueryRequest::parse("mode=update")), FormMode::Update);
        assert_eq!(FormMode::from_request(&QueryRequest::parse("mode=bogus")), FormMode::View);
    }
}
