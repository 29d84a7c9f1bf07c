pub mod url {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use ::url::Url;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Url::parse(value.as_str()).map_err(|err| D::Error::custom(format!("{}: {}", value, err)))
    }
}

pub mod optional_url {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use ::url::Url;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => Url::parse(value.as_str())
                .map(Some)
                .map_err(|err| D::Error::custom(format!("{}: {}", value, err))),
            None => Ok(None),
        }
    }
}

pub mod duration {
    use crate::time::timeunit::DurationUnit;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value
            .parse::<DurationUnit>()
            .and_then(|unit| unit.to_duration())
            .map_err(|err| D::Error::custom(err.to_string()))
    }
}
