//! Revision/Version Derivation (`spec.md` §4.H, component H).

use chrono::Local;
use tracing::debug;
use vkreg::Registry;

/// `major.minor.header`, e.g. `1.3.250`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulkanVersion {
    pub major: u32,
    pub minor: u32,
    pub header: u32,
}

impl std::fmt::Display for VulkanVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.header)
    }
}

/// Derives the Vulkan version from the last feature's `number` and the
/// `VK_HEADER_VERSION` define's trailing integer.
pub fn derive_vulkan_version(registry: &Registry) -> Option<VulkanVersion> {
    let last_feature = registry.features.last()?;
    let mut parts = last_feature.number.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next()?.parse().ok()?;

    let header_text = registry.header_version.as_deref()?;
    let header: u32 = header_text
        .split_whitespace()
        .filter_map(|tok| tok.parse::<u32>().ok())
        .last()?;

    Some(VulkanVersion { major, minor, header })
}

/// Parses the previous output file's banner line
/// (`"<tool> - v<major>.<minor>.<header>.<revision> - <date>"`) and
/// returns `(version_prefix, revision)` if found.
fn parse_previous_banner(previous: &str) -> Option<(String, u32)> {
    let banner_line = previous.lines().find(|l| l.contains(" - v"))?;
    let after = banner_line.split(" - v").nth(1)?;
    let version_field = after.split_whitespace().next()?;
    let mut segments: Vec<&str> = version_field.split('.').collect();
    let revision: u32 = segments.pop()?.parse().ok()?;
    Some((segments.join("."), revision))
}

/// Computes the new revision number (`spec.md` §4.H / §8 scenario F):
/// increments if the version prefix is unchanged from the previous
/// output, resets to 0 otherwise or if there is no previous output.
pub fn derive_revision(new_version: &VulkanVersion, previous_output: Option<&str>) -> u32 {
    let Some(previous_output) = previous_output else {
        debug!("no previous output; revision reset to 0");
        return 0;
    };
    match parse_previous_banner(previous_output) {
        Some((prev_prefix, prev_revision)) if prev_prefix == new_version.to_string() => {
            debug!(prev_revision, "version unchanged; incrementing revision");
            prev_revision + 1
        }
        _ => {
            debug!("version changed or banner unparseable; revision reset to 0");
            0
        }
    }
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_resets_with_no_previous_output() {
        let v = VulkanVersion { major: 1, minor: 3, header: 250 };
        assert_eq!(derive_revision(&v, None), 0);
    }

    #[test]
    fn revision_increments_when_version_unchanged() {
        // Scenario F (spec.md §8).
        let v = VulkanVersion { major: 1, minor: 3, header: 250 };
        let previous = "vkbind - v1.3.250.7 - 2026-01-01\n";
        assert_eq!(derive_revision(&v, Some(previous)), 8);
    }

    #[test]
    fn revision_resets_when_version_changed() {
        let v = VulkanVersion { major: 1, minor: 3, header: 251 };
        let previous = "vkbind - v1.3.250.7 - 2026-01-01\n";
        assert_eq!(derive_revision(&v, Some(previous)), 0);
    }
}
