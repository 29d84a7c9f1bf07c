use clap::arg_enum;
use config::{Config, File};
use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use serde_derive::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::Error;
use crate::forms::FormCapabilities;
use crate::release::version::DEFAULT_SEPARATOR_CHAR;
use crate::report::group::GroupOrder;
use crate::report::highlight::LONG_RUNNING_MILLIS;

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum ReportKind {
        List, History, Info, Release, Suites,
    }
}

impl<'de> Deserialize<'de> for ReportKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(<D::Error as serde::de::Error>::custom)
    }
}

/// Files holding the records the report is rendered from. JSON and CSV
/// are told apart by extension.
#[derive(Debug, Default, Deserialize)]
pub struct Sources {
    pub tests: Option<PathBuf>,
    pub releases: Option<PathBuf>,
    /// Single test shown by the info report.
    pub test: Option<PathBuf>,
    pub last_pass: Option<PathBuf>,
    pub last_fail: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub report: ReportKind,
    #[serde(with = "crate::configuration::deserialize::url")]
    pub form_url: Url,
    /// Build search page linked from the release list.
    #[serde(default, with = "crate::configuration::deserialize::optional_url")]
    pub summary_url: Option<Url>,
    #[serde(default, with = "crate::configuration::deserialize::optional_url")]
    pub admin_url: Option<Url>,
    #[serde(default)]
    pub sources: Sources,
    #[serde(
        default = "default_long_running",
        with = "crate::configuration::deserialize::duration"
    )]
    pub long_running: Duration,
    #[serde(default)]
    pub group_order: GroupOrder,
    /// Used when the request carries no filter of its own.
    #[serde(default, with = "serde_regex")]
    pub filter: Option<Regex>,
    /// Values exposed to the forms as request attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Optional rows and links of the info report.
    #[serde(default)]
    pub capabilities: FormCapabilities,
    #[serde(default)]
    pub input_mode: bool,
    #[serde(default)]
    pub admin_mode: bool,
    #[serde(default = "default_separator")]
    pub separator: char,
}

fn default_long_running() -> Duration {
    Duration::from_millis(LONG_RUNNING_MILLIS)
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR_CHAR
}

impl Manifest {
    pub fn from(file: PathBuf) -> Result<Self, Error> {
        let mut config = Config::new();
        config.merge(File::from(file))?;
        Ok(config.try_into()?)
    }
}
