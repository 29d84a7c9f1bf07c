use derivative::*;
use liquid::model::Value;
use liquid::{Object, Parser};
use std::convert::TryFrom;
use std::sync::Arc;

use crate::error::Error;

pub type TemplateValue = Value;

/// Turns a view model into something a template can read.
pub trait Convert<T> {
    fn convert(&self) -> T;
}

impl Convert<TemplateValue> for str {
    fn convert(&self) -> TemplateValue {
        TemplateValue::scalar(self.to_owned())
    }
}

impl Convert<TemplateValue> for String {
    fn convert(&self) -> TemplateValue {
        self.as_str().convert()
    }
}

impl<T> Convert<TemplateValue> for Option<T>
where
    T: Convert<TemplateValue>,
{
    fn convert(&self) -> TemplateValue {
        match self {
            Some(value) => value.convert(),
            None => TemplateValue::Nil,
        }
    }
}

impl<T> Convert<TemplateValue> for Vec<T>
where
    T: Convert<TemplateValue>,
{
    fn convert(&self) -> TemplateValue {
        TemplateValue::Array(self.iter().map(Convert::convert).collect())
    }
}

/// Builds template objects field by field.
#[derive(Default)]
pub struct ObjectBuilder {
    object: Object,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, key: &str, value: TemplateValue) -> Self {
        self.object.insert(key.to_owned().into(), value);
        self
    }

    pub fn text<S: AsRef<str>>(self, key: &str, text: S) -> Self {
        self.value(key, text.as_ref().convert())
    }

    pub fn number(self, key: &str, number: i64) -> Self {
        self.value(key, TemplateValue::scalar(number))
    }

    /// Counts beyond the template number range saturate.
    pub fn count(self, key: &str, count: usize) -> Self {
        self.number(key, i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub fn flag(self, key: &str, flag: bool) -> Self {
        self.value(key, TemplateValue::scalar(flag))
    }

    pub fn build(self) -> Object {
        self.object
    }

    pub fn into_value(self) -> TemplateValue {
        TemplateValue::Object(self.object)
    }
}

/// Owns the template parser shared by every form.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct TemplateContext {
    #[derivative(Debug = "ignore")]
    parser: Arc<Parser>,
}

impl TemplateContext {
    pub fn new() -> Result<Self, Error> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        Ok(Self {
            parser: Arc::new(parser),
        })
    }

    pub fn apply(&self, source: &str, variables: &Object) -> Result<String, Error> {
        let template = self.parser.parse(source)?;
        Ok(template.render(variables)?)
    }
}
