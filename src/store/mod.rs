use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::release::model::ReleaseSummary;
use crate::report::test::{AcceptanceTestRecord, TestRecord};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordFormat {
    Json,
    Csv,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(RecordFormat::Json),
            Some("csv") => Ok(RecordFormat::Csv),
            _ => Err(Error::UnsupportedSource(path.display().to_string())),
        }
    }
}

/// JSON sources may hold a single record instead of an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// File of exported records, decoded according to its extension.
#[derive(Debug, Clone)]
pub struct RecordSource {
    path: PathBuf,
    format: RecordFormat,
}

impl RecordSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        Ok(Self {
            path: path.to_path_buf(),
            format: RecordFormat::from_path(path)?,
        })
    }

    #[inline]
    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Fails for sources that are not JSON, for records CSV cannot hold.
    pub fn require_json(self) -> Result<Self, Error> {
        match self.format {
            RecordFormat::Json => Ok(self),
            RecordFormat::Csv => Err(Error::UnsupportedSource(self.path.display().to_string())),
        }
    }

    pub fn load<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let records = match self.format {
            RecordFormat::Json => {
                let reader = BufReader::new(File::open(&self.path)?);
                match serde_json::from_reader(reader)? {
                    OneOrMany::Many(records) => records,
                    OneOrMany::One(record) => vec![record],
                }
            }
            RecordFormat::Csv => {
                let mut reader = csv::Reader::from_path(&self.path)?;
                reader
                    .deserialize()
                    .collect::<Result<Vec<T>, csv::Error>>()?
            }
        };
        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// The first record of the source, if there is any.
    pub fn load_first<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        Ok(self.load()?.into_iter().next())
    }
}

pub fn load_tests(path: &Path) -> Result<Vec<TestRecord>, Error> {
    RecordSource::open(path)?.load()
}

pub fn load_test(path: &Path) -> Result<Option<TestRecord>, Error> {
    RecordSource::open(path)?.load_first()
}

pub fn load_acceptance_test(path: &Path) -> Result<Option<AcceptanceTestRecord>, Error> {
    RecordSource::open(path)?.require_json()?.load_first()
}

/// Releases nest their builds and are only read from JSON.
pub fn load_releases(path: &Path) -> Result<Vec<ReleaseSummary>, Error> {
    RecordSource::open(path)?.require_json()?.load()
}
