use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer};
use serde_derive::Deserialize;

/// Outcome of a single test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
    Skip,
    Kill,
    Running,
    Pending,
    Blacklist,
    Unknown,
}

/// Order in which statuses are listed when sorting by priority.
const PRIORITY_ORDER: [TestStatus; 9] = [
    TestStatus::Running,
    TestStatus::Error,
    TestStatus::Fail,
    TestStatus::Kill,
    TestStatus::Skip,
    TestStatus::Blacklist,
    TestStatus::Pending,
    TestStatus::Unknown,
    TestStatus::Pass,
];

impl Default for TestStatus {
    fn default() -> Self {
        TestStatus::Unknown
    }
}

impl TestStatus {
    pub fn label(self) -> &'static str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Error => "ERROR",
            TestStatus::Skip => "SKIP",
            TestStatus::Kill => "KILL",
            TestStatus::Running => "RUNNING",
            TestStatus::Pending => "PENDING",
            TestStatus::Blacklist => "BLACKLIST",
            TestStatus::Unknown => "UNKNOWN",
        }
    }

    /// Maps the numeric status codes stored by the tracking database.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => TestStatus::Pass,
            1 => TestStatus::Fail,
            2 => TestStatus::Error,
            3 => TestStatus::Skip,
            4 => TestStatus::Kill,
            5 => TestStatus::Running,
            6 => TestStatus::Pending,
            7 => TestStatus::Blacklist,
            _ => TestStatus::Unknown,
        }
    }

    /// Lower values sort first.
    pub fn priority(self) -> usize {
        PRIORITY_ORDER
            .iter()
            .position(|status| *status == self)
            .unwrap_or(PRIORITY_ORDER.len())
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, TestStatus::Error | TestStatus::Fail | TestStatus::Kill)
    }

    /// Folds a newly reported status into the current one. A status only
    /// moves towards a more significant outcome, so a late PASS never hides
    /// an earlier FAIL and nothing overrides a KILL except ERROR/BLACKLIST.
    pub fn update(self, reported: TestStatus) -> TestStatus {
        use TestStatus::*;
        match (reported, self) {
            (Pending, Unknown) => Pending,
            (Running, Unknown) | (Running, Pending) => Running,
            (Blacklist, _) | (Kill, _) | (Error, _) => reported,
            (Skip, Pass) | (Skip, Unknown) | (Skip, Pending) | (Skip, Running) => Skip,
            (Pass, Unknown) | (Pass, Pending) | (Pass, Running) => Pass,
            (Fail, Pass) | (Fail, Unknown) | (Fail, Skip) | (Fail, Pending) | (Fail, Running) => {
                Fail
            }
            _ => self,
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TestStatus {
    type Err = std::convert::Infallible;

    /// Unrecognized labels map to [`TestStatus::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => TestStatus::Pass,
            "FAIL" => TestStatus::Fail,
            "ERROR" => TestStatus::Error,
            "SKIP" => TestStatus::Skip,
            "KILL" => TestStatus::Kill,
            "RUNNING" => TestStatus::Running,
            "PENDING" => TestStatus::Pending,
            "BLACKLIST" => TestStatus::Blacklist,
            code => code
                .parse::<i32>()
                .map(TestStatus::from_code)
                .unwrap_or(TestStatus::Unknown),
        };
        Ok(status)
    }
}

impl<'de> Deserialize<'de> for TestStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i32),
            Label(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Code(code) => TestStatus::from_code(code),
            Raw::Label(label) => label.parse().unwrap_or_default(),
        })
    }
}
