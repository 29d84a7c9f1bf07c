use core::str::FromStr;
use lazy_static::*;
use regex::Regex;
use std::time::Duration;

use crate::time::error::Error;

lazy_static! {
    static ref DURATION_REGEX: Regex =
        Regex::new(r"^\s*(?P<value>\d+)\s*(?P<unit>[a-z]+)\s*$").expect("Regex compilation error");
}

/// Duration written as a number followed by a unit, e.g. `5m`.
#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    fn millis(self) -> u64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1000,
            TimeUnit::Minute => 60 * 1000,
            TimeUnit::Hour => 60 * 60 * 1000,
        }
    }
}

impl DurationUnit {
    pub fn to_duration(&self) -> Result<Duration, Error> {
        self.value
            .checked_mul(self.unit.millis())
            .map(Duration::from_millis)
            .ok_or_else(|| Error::Overflow(format!("{}{:?}", self.value, self.unit)))
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DURATION_REGEX
            .captures(s)
            .ok_or_else(|| Error::Syntax(s.to_owned()))?;
        let value = caps["value"]
            .parse()
            .map_err(|_| Error::Overflow(s.to_owned()))?;
        let unit = caps["unit"].parse::<TimeUnit>()?;
        Ok(Self { value, unit })
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "millisecond" | "millis" | "milliseconds" => Ok(TimeUnit::Millisecond),
            "s" | "second" | "secs" | "seconds" => Ok(TimeUnit::Second),
            "m" | "minute" | "mins" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            _ => Err(Error::UnitNotSupported(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_units() {
        assert_eq!("ms".parse::<TimeUnit>(), Ok(TimeUnit::Millisecond));
        assert_eq!("secs".parse::<TimeUnit>(), Ok(TimeUnit::Second));
        assert_eq!("m".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert_eq!("hours".parse::<TimeUnit>(), Ok(TimeUnit::Hour));
        assert!("d".parse::<TimeUnit>().is_err());
    }

    #[test]
    fn test_long_running_threshold_spellings() {
        let minutes = "5m".parse::<DurationUnit>().unwrap().to_duration().unwrap();
        let millis = "300000ms".parse::<DurationUnit>().unwrap().to_duration().unwrap();

        assert_eq!(minutes, Duration::from_millis(300_000));
        assert_eq!(minutes, millis);
    }

    #[test]
    fn test_reject_malformed_duration() {
        assert_eq!("five minutes".parse::<DurationUnit>(), Err(Error::Syntax("five minutes".to_owned())));
        assert!("10y".parse::<DurationUnit>().is_err());
        assert!(format!("{}h", u64::MAX).parse::<DurationUnit>().unwrap().to_duration().is_err());
    }
}
