use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// An API level, e.g. `33`.
pub type ApiVersion = u32;

/// The releases an element was observed in.
///
/// Ranges only ever grow: [`VersionRange::observe`] and [`VersionRange::widen`] never move
/// `since` later, `last_present_in` earlier, or `deprecated_in` later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRange {
    since: ApiVersion,
    deprecated_in: Option<ApiVersion>,
    last_present_in: ApiVersion,
}

impl VersionRange {
    /// A range covering the single version `version`.
    pub fn new(version: ApiVersion, deprecated: bool) -> Self {
        Self {
            since: version,
            deprecated_in: deprecated.then_some(version),
            last_present_in: version,
        }
    }

    /// A range with explicit bounds; `last_present_in` is raised to `since` if it is lower.
    pub fn with_bounds(
        since: ApiVersion,
        last_present_in: ApiVersion,
        deprecated_in: Option<ApiVersion>,
    ) -> Self {
        Self {
            since,
            deprecated_in,
            last_present_in: last_present_in.max(since),
        }
    }

    pub fn since(&self) -> ApiVersion {
        self.since
    }

    pub fn deprecated_in(&self) -> Option<ApiVersion> {
        self.deprecated_in
    }

    pub fn last_present_in(&self) -> ApiVersion {
        self.last_present_in
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated_in.is_some()
    }

    pub fn observe(&mut self, version: ApiVersion, deprecated: bool) {
        self.since = self.since.min(version);
        self.last_present_in = self.last_present_in.max(version);
        if deprecated {
            self.deprecated_in = Some(min_version(self.deprecated_in, version));
        }
    }

    pub fn widen(&mut self, other: &VersionRange) {
        self.since = self.since.min(other.since);
        self.last_present_in = self.last_present_in.max(other.last_present_in);
        if let Some(deprecated) = other.deprecated_in {
            self.deprecated_in = Some(min_version(self.deprecated_in, deprecated));
        }
    }

    /// Whether this range started no later than `other`.
    pub fn introduced_not_later_than(&self, other: &VersionRange) -> bool {
        self.since <= other.since
    }

    /// Whether `other` lies entirely within this range.
    pub fn covers(&self, other: &VersionRange) -> bool {
        self.since <= other.since && self.last_present_in >= other.last_present_in
    }

    /// The overlap of both ranges, keeping this range's deprecation if it falls inside it.
    pub fn intersect(&self, other: &VersionRange) -> Option<VersionRange> {
        let since = self.since.max(other.since);
        let last_present_in = self.last_present_in.min(other.last_present_in);
        if since > last_present_in {
            return None;
        }
        let deprecated_in = self
            .deprecated_in
            .filter(|&deprecated| deprecated <= last_present_in)
            .map(|deprecated| deprecated.max(since));
        Some(VersionRange {
            since,
            deprecated_in,
            last_present_in,
        })
    }
}

fn min_version(current: Option<ApiVersion>, version: ApiVersion) -> ApiVersion {
    current.map_or(version, |current| current.min(version))
}

/// A named element (class, member, superclass or interface reference) with its version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiElement {
    name: String,
    range: VersionRange,
}

impl ApiElement {
    pub fn new(name: impl Into<String>, version: ApiVersion, deprecated: bool) -> Self {
        Self::with_range(name, VersionRange::new(version, deprecated))
    }

    pub fn with_range(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &VersionRange {
        &self.range
    }

    pub fn since(&self) -> ApiVersion {
        self.range.since
    }

    pub fn deprecated_in(&self) -> Option<ApiVersion> {
        self.range.deprecated_in
    }

    pub fn last_present_in(&self) -> ApiVersion {
        self.range.last_present_in
    }

    pub fn update(&mut self, version: ApiVersion, deprecated: bool) {
        self.range.observe(version, deprecated);
    }

    pub fn widen(&mut self, range: &VersionRange) {
        self.range.widen(range);
    }

    pub(crate) fn set_range(&mut self, range: VersionRange) {
        self.range = range;
    }

    pub fn introduced_not_later_than(&self, other: &ApiElement) -> bool {
        self.range.introduced_not_later_than(&other.range)
    }
}

impl PartialOrd for ApiElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.range.since.cmp(&other.range.since))
            .then_with(|| self.range.last_present_in.cmp(&other.range.last_present_in))
            .then_with(|| self.range.deprecated_in.cmp(&other.range.deprecated_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_is_order_independent() {
        let mut forward = VersionRange::new(5, false);
        forward.observe(9, true);

        let mut backward = VersionRange::new(9, true);
        backward.observe(5, false);

        assert_eq!(forward, backward);
        assert_eq!(forward.since(), 5);
        assert_eq!(forward.deprecated_in(), Some(9));
        assert_eq!(forward.last_present_in(), 9);
    }

    #[test]
    fn deprecation_is_sticky_and_keeps_the_earliest_version() {
        let mut range = VersionRange::new(3, false);
        range.observe(7, true);
        range.observe(8, false);
        range.observe(6, true);
        assert_eq!(range.deprecated_in(), Some(6));
        assert_eq!(range.last_present_in(), 8);
    }

    #[test]
    fn widen_never_narrows() {
        let mut range = VersionRange::with_bounds(4, 10, Some(8));
        range.widen(&VersionRange::with_bounds(6, 7, None));
        assert_eq!(range, VersionRange::with_bounds(4, 10, Some(8)));

        range.widen(&VersionRange::with_bounds(2, 12, Some(5)));
        assert_eq!(range, VersionRange::with_bounds(2, 12, Some(5)));
    }

    #[test]
    fn covers_and_intersect() {
        let outer = VersionRange::with_bounds(3, 10, None);
        let inner = VersionRange::with_bounds(4, 9, None);
        assert!(outer.covers(&inner));
        assert!(!inner.covers(&outer));

        let deprecated = VersionRange::with_bounds(1, 6, Some(2));
        assert_eq!(
            deprecated.intersect(&outer),
            Some(VersionRange::with_bounds(3, 6, Some(3)))
        );
        assert_eq!(
            VersionRange::with_bounds(1, 2, None).intersect(&outer),
            None
        );
    }

    #[test]
    fn elements_order_by_name() {
        let mut elements = vec![
            ApiElement::new("b", 1, false),
            ApiElement::new("a", 5, false),
        ];
        elements.sort();
        assert_eq!(elements[0].name(), "a");
    }
}
