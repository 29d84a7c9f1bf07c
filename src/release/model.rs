use serde_derive::Deserialize;

use super::version::VersionFormat;

#[derive(Debug, Clone, Deserialize, PartialEq, Builder)]
#[builder(setter(into))]
pub struct BuildRecord {
    pub build_version: String,
    /// Changelist the build was produced from.
    #[serde(default)]
    #[builder(default = "None")]
    pub version_control_id: Option<String>,
    #[serde(default)]
    #[builder(default = "String::new()")]
    pub release_id: String,
}

impl BuildRecord {
    pub fn builder() -> BuildRecordBuilder {
        BuildRecordBuilder::default()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStatus {
    Active,
    Retired,
}

impl Default for ReleaseStatus {
    fn default() -> Self {
        ReleaseStatus::Active
    }
}

#[derive(Debug, Clone, Deserialize, Builder)]
#[builder(setter(into))]
pub struct ReleaseSummary {
    /// Identifies the element holding the builds of the release.
    pub id: String,
    pub name: String,
    #[serde(default)]
    #[builder(default = "String::new()")]
    pub text: String,
    #[serde(default)]
    #[builder(default = "ReleaseStatus::Active")]
    pub status: ReleaseStatus,
    /// Version pattern used to search for the builds of the release.
    pub build_version: String,
    #[serde(default)]
    #[builder(default = "Vec::new()")]
    pub builds: Vec<BuildRecord>,
}

/// A run of consecutive builds produced from the same changelist.
#[derive(Debug, PartialEq)]
pub struct ChangelistGroup<'a> {
    pub changelist: Option<&'a str>,
    pub builds: Vec<&'a BuildRecord>,
}

impl<'a> ChangelistGroup<'a> {
    /// The first build represents the group.
    pub fn head(&self) -> &'a BuildRecord {
        self.builds[0]
    }
}

impl ReleaseSummary {
    pub fn builder() -> ReleaseSummaryBuilder {
        ReleaseSummaryBuilder::default()
    }

    #[inline]
    pub fn is_retired(&self) -> bool {
        self.status == ReleaseStatus::Retired
    }

    /// Determines the version string that represents every build of the
    /// release produced from `changelist`.
    pub fn version_by_changelist(&self, changelist: &str, format: &VersionFormat) -> Option<String> {
        self.builds
            .iter()
            .filter(|build| build.version_control_id.as_deref() == Some(changelist))
            .fold(None, |version: Option<String>, build| match version {
                Some(version) => Some(format.merged_version(&version, &build.build_version)),
                None => Some(format.short_version(&build.build_version).to_owned()),
            })
    }

    /// Groups adjacent builds sharing a changelist. Builds without a
    /// changelist always start a group of their own.
    pub fn changelist_groups(&self) -> Vec<ChangelistGroup<'_>> {
        let mut groups: Vec<ChangelistGroup<'_>> = Vec::new();
        for build in &self.builds {
            let changelist = build.version_control_id.as_deref();
            match groups.last_mut() {
                Some(group) if changelist.is_some() && group.changelist == changelist => {
                    group.builds.push(build)
                }
                _ => groups.push(ChangelistGroup {
                    changelist,
                    builds: vec![build],
                }),
            }
        }
        groups
    }
}
