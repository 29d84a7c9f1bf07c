use std::fmt;

/// Failure to read a duration such as `5m` or `300000ms`.
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    Syntax(String),
    UnitNotSupported(String),
    Overflow(String),
}

impl ::std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref value) => write!(f, "'{}' is not a duration, expected <number><unit>", value),
            Error::UnitNotSupported(ref unit) => write!(f, "Unit '{}' not supported", unit),
            Error::Overflow(ref value) => write!(f, "Duration '{}' is out of range", value),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let hr: String = std::iter::repeat('~').take(79).collect();
        writeln!(f, "DurationError(")?;
        writeln!(f, "{}", hr)?;
        writeln!(f, "{}", self)?;
        writeln!(f, "{}", hr)?;
        write!(f, ")")
    }
}
