use url::form_urlencoded::byte_serialize;

/// Default character used to separate version number strings.
pub const DEFAULT_SEPARATOR_CHAR: char = '-';

/// Splits build version strings such as `5.2-100-42` into their parts.
///
/// The trailing segment of a full version is the build suffix (usually a
/// build number or timestamp). Everything in front of it is the short
/// version, and the last segment of the short version is the version
/// number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersionFormat {
    separator: char,
}

impl Default for VersionFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR_CHAR)
    }
}

impl VersionFormat {
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    #[inline]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Trims the build suffix off the version string. A separator in the
    /// first position does not count as a segment boundary.
    pub fn short_version<'a>(&self, version: &'a str) -> &'a str {
        match version.rfind(self.separator) {
            Some(idx) if idx > 0 => &version[..idx],
            _ => version,
        }
    }

    pub fn version_number<'a>(&self, version: &'a str) -> &'a str {
        let short = self.short_version(version);
        match short.rfind(self.separator) {
            Some(idx) if idx > 0 => &short[idx + self.separator.len_utf8()..],
            _ => short,
        }
    }

    /// Joins the leading segments both versions share, position by
    /// position, stopping at the first segment that differs.
    pub fn merged_version(&self, ver1: &str, ver2: &str) -> String {
        let separator = self.separator.to_string();
        ver1.split(self.separator)
            .zip(ver2.split(self.separator))
            .take_while(|(part1, part2)| part1 == part2)
            .map(|(part, _)| part)
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

pub fn short_version(version: &str) -> &str {
    VersionFormat::default().short_version(version)
}

pub fn version_number(version: &str) -> &str {
    VersionFormat::default().version_number(version)
}

pub fn merged_version(ver1: &str, ver2: &str) -> String {
    VersionFormat::default().merged_version(ver1, ver2)
}

/// Percent-encodes a version so it can be passed as a query parameter.
pub fn encode_version_param(version: &str) -> String {
    byte_serialize(version.as_bytes()).collect()
}
