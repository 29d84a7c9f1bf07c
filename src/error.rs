use std::fmt;

/// Failures surfaced while loading a report and rendering it.
pub enum Error {
    Config(config::ConfigError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Template(liquid::Error),
    /// A form parameter did not conform to the rules for its field.
    Parameter { field: String, value: String, cause: String },
    /// A data source has an extension no decoder is registered for.
    UnsupportedSource(String),
    MissingSource(&'static str),
}

impl ::std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Config(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            Error::Json(ref err) => Some(err),
            Error::Csv(ref err) => Some(err),
            Error::Template(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Config(ref err) => write!(f, "Invalid manifest: {}", err),
            Error::Io(ref err) => write!(f, "I/O failure: {}", err),
            Error::Json(ref err) => write!(f, "Malformed JSON records: {}", err),
            Error::Csv(ref err) => write!(f, "Malformed CSV records: {}", err),
            Error::Template(ref err) => write!(f, "Cannot render template: {}", err),
            Error::Parameter {
                ref field,
                ref value,
                ref cause,
            } => write!(
                f,
                "The form value does not conform to the rules for this field: field={}, value={} ({})",
                field, value, cause
            ),
            Error::UnsupportedSource(ref path) => {
                write!(f, "Unsupported record source '{}'", path)
            }
            Error::MissingSource(name) => write!(f, "Data source '{}' is not configured", name),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let hr: String = std::iter::repeat('~').take(79).collect();
        writeln!(f, "Error(")?;
        writeln!(f, "{}", hr)?;
        writeln!(f, "{}", self)?;
        writeln!(f, "{}", hr)?;
        write!(f, ")")
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<liquid::Error> for Error {
    fn from(err: liquid::Error) -> Self {
        Error::Template(err)
    }
}
