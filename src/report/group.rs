use std::cmp::Ordering;
use std::collections::HashMap;

use regex::Regex;
use serde::de::{Deserialize, Deserializer};
use std::str::FromStr;

use super::status::TestStatus;
use super::test::TestRecord;

/// Test executions sharing a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct TestGroup {
    name: String,
    tests: Vec<TestRecord>,
}

impl TestGroup {
    pub fn new(name: String) -> Self {
        Self {
            name,
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: TestRecord) {
        self.tests.push(test);
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn tests(&self) -> &[TestRecord] {
        &self.tests
    }

    #[inline]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Most significant status among the members of the group.
    pub fn status(&self) -> TestStatus {
        self.tests
            .iter()
            .map(|test| test.status)
            .min_by_key(|status| status.priority())
            .unwrap_or_default()
    }
}

/// Buckets records by display name. Groups appear in the order their
/// first member was seen and keep members in input order.
pub fn group_by_display_name<I>(tests: I) -> Vec<TestGroup>
where
    I: IntoIterator<Item = TestRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<TestGroup> = Vec::new();
    for test in tests {
        match index.get(&test.display_name) {
            Some(&idx) => groups[idx].add_test(test),
            None => {
                index.insert(test.display_name.clone(), groups.len());
                let mut group = TestGroup::new(test.display_name.clone());
                group.add_test(test);
                groups.push(group);
            }
        }
    }
    groups
}

/// Comparator applied to groups before display.
pub trait GroupComparator {
    fn compare(&self, group1: &TestGroup, group2: &TestGroup) -> Ordering;
}

impl<F> GroupComparator for F
where
    F: Fn(&TestGroup, &TestGroup) -> Ordering,
{
    fn compare(&self, group1: &TestGroup, group2: &TestGroup) -> Ordering {
        self(group1, group2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupOrder {
    Name,
    Priority,
}

impl FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(GroupOrder::Name),
            "priority" => Ok(GroupOrder::Priority),
            other => Err(format!("Unknown group order '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for GroupOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(<D::Error as serde::de::Error>::custom)
    }
}

impl Default for GroupOrder {
    fn default() -> Self {
        GroupOrder::Name
    }
}

impl GroupComparator for GroupOrder {
    fn compare(&self, group1: &TestGroup, group2: &TestGroup) -> Ordering {
        match self {
            GroupOrder::Name => group1.name().cmp(group2.name()),
            GroupOrder::Priority => group1
                .status()
                .priority()
                .cmp(&group2.status().priority())
                .then_with(|| group1.name().cmp(group2.name())),
        }
    }
}

/// Stable sort, groups comparing equal keep their creation order.
pub fn sort_groups(groups: &mut [TestGroup], comparator: &dyn GroupComparator) {
    groups.sort_by(|group1, group2| comparator.compare(group1, group2));
}

/// Compiles `pattern` so that it only matches whole group names.
pub fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Keeps the groups whose name matches `filter`.
pub fn filter_groups(groups: Vec<TestGroup>, filter: &Regex) -> Vec<TestGroup> {
    groups
        .into_iter()
        .filter(|group| filter.is_match(group.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test::tests::record;

    #[test]
    fn test_grouping_preserves_first_occurrence_and_member_order() {
        let groups = group_by_display_name(vec![
            record(1, "login", TestStatus::Pass, 10),
            record(2, "checkout", TestStatus::Pass, 10),
            record(3, "login", TestStatus::Fail, 10),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name(), "login");
        assert_eq!(groups[0].test_count(), 2);
        assert_eq!(groups[0].tests()[0].id, 1);
        assert_eq!(groups[0].tests()[1].id, 3);
        assert_eq!(groups[1].name(), "checkout");
        assert_eq!(groups[1].test_count(), 1);
    }

    #[test]
    fn test_group_status_is_most_significant_member() {
        let groups = group_by_display_name(vec![
            record(1, "login", TestStatus::Pass, 10),
            record(2, "login", TestStatus::Skip, 10),
            record(3, "login", TestStatus::Kill, 10),
        ]);

        assert_eq!(groups[0].status(), TestStatus::Kill);
        assert_eq!(TestGroup::new("empty".to_owned()).status(), TestStatus::Unknown);
    }

    #[test]
    fn test_sort_by_name() {
        let mut groups = group_by_display_name(vec![
            record(1, "login", TestStatus::Pass, 10),
            record(2, "checkout", TestStatus::Fail, 10),
            record(3, "admin", TestStatus::Pass, 10),
        ]);
        sort_groups(&mut groups, &GroupOrder::Name);
        let names: Vec<&str> = groups.iter().map(TestGroup::name).collect();

        assert_eq!(names, vec!["admin", "checkout", "login"]);
    }

    #[test]
    fn test_sort_by_priority() {
        let mut groups = group_by_display_name(vec![
            record(1, "admin", TestStatus::Pass, 10),
            record(2, "login", TestStatus::Skip, 10),
            record(3, "checkout", TestStatus::Error, 10),
            record(4, "billing", TestStatus::Pass, 10),
        ]);
        sort_groups(&mut groups, &GroupOrder::Priority);
        let names: Vec<&str> = groups.iter().map(TestGroup::name).collect();

        assert_eq!(names, vec!["checkout", "login", "admin", "billing"]);
    }

    #[test]
    fn test_sort_with_closure_comparator() {
        let mut groups = group_by_display_name(vec![
            record(1, "a", TestStatus::Pass, 10),
            record(2, "b", TestStatus::Pass, 10),
            record(3, "b", TestStatus::Pass, 10),
        ]);
        let by_size = |g1: &TestGroup, g2: &TestGroup| g2.test_count().cmp(&g1.test_count());
        sort_groups(&mut groups, &by_size);

        assert_eq!(groups[0].name(), "b");
    }

    #[test]
    fn test_filter_requires_full_match() {
        let groups = group_by_display_name(vec![
            record(1, "login", TestStatus::Pass, 10),
            record(2, "login_admin", TestStatus::Pass, 10),
            record(3, "checkout", TestStatus::Pass, 10),
        ]);
        let filter = full_match_regex("log.n|check").unwrap();
        let filtered = filter_groups(groups, &filter);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name(), "login");
    }
}
