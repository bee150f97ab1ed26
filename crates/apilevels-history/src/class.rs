use std::collections::BTreeMap;

use crate::descriptor::{MethodKey, MethodTypes};
use crate::element::{ApiElement, ApiVersion, VersionRange};
use crate::error::Result;

const ABSTRACT_STRING_BUILDER_RETURN: &str = ")Ljava/lang/AbstractStringBuilder;";

/// Whether a class belongs to the released surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiddenUntil {
    Visible,
    /// Hidden in early snapshots, public from this version on.
    Until(ApiVersion),
    /// Present in the scanned releases but never public, e.g. package-private.
    Always,
}

/// One class of the API with its members and supertypes, each version-ranged.
///
/// Superclasses are a list rather than a single entry because a class can change its superclass
/// between releases. Members are keyed by a signature unique within the class: the name for
/// fields, `name(descriptor)return` for methods.
#[derive(Debug, Clone)]
pub struct ApiClass {
    element: ApiElement,
    visible_since: Option<ApiVersion>,
    super_classes: BTreeMap<String, ApiElement>,
    super_observations: BTreeMap<ApiVersion, String>,
    interfaces: BTreeMap<String, ApiElement>,
    fields: BTreeMap<String, ApiElement>,
    methods: BTreeMap<String, ApiElement>,
}

impl ApiClass {
    pub(crate) fn new(name: impl Into<String>, version: ApiVersion, deprecated: bool) -> Self {
        Self::with_range(name, VersionRange::new(version, deprecated))
    }

    pub(crate) fn with_range(name: impl Into<String>, range: VersionRange) -> Self {
        Self {
            element: ApiElement::with_range(name, range),
            visible_since: None,
            super_classes: BTreeMap::new(),
            super_observations: BTreeMap::new(),
            interfaces: BTreeMap::new(),
            fields: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    pub fn element(&self) -> &ApiElement {
        &self.element
    }

    pub fn name(&self) -> &str {
        self.element.name()
    }

    pub fn range(&self) -> &VersionRange {
        self.element.range()
    }

    pub fn since(&self) -> ApiVersion {
        self.element.since()
    }

    pub fn update(&mut self, version: ApiVersion, deprecated: bool) {
        self.element.update(version, deprecated);
    }

    /// Record whether the class was part of the public surface in `version`.
    pub fn observe_visibility(&mut self, version: ApiVersion, hidden: bool) {
        if !hidden {
            self.visible_since = Some(self.visible_since.map_or(version, |v| v.min(version)));
        }
    }

    pub fn hidden_until(&self) -> HiddenUntil {
        match self.visible_since {
            None => HiddenUntil::Always,
            Some(version) if version > self.since() => HiddenUntil::Until(version),
            Some(_) => HiddenUntil::Visible,
        }
    }

    pub fn is_always_hidden(&self) -> bool {
        self.hidden_until() == HiddenUntil::Always
    }

    pub fn add_field(&mut self, name: &str, version: ApiVersion, deprecated: bool) -> &ApiElement {
        add_to(&mut self.fields, name, version, deprecated)
    }

    /// Add or update a method keyed `name(descriptor)return`.
    ///
    /// Older android.jar files declare `StringBuilder`/`StringBuffer` methods as returning their
    /// package-private base class; such keys are rewritten to return the declaring class.
    pub fn add_method(&mut self, key: &str, version: ApiVersion, deprecated: bool) -> &ApiElement {
        let key = match key.strip_suffix(ABSTRACT_STRING_BUILDER_RETURN) {
            Some(prefix) => format!("{prefix})L{};", self.name()),
            None => key.to_owned(),
        };
        add_to(&mut self.methods, &key, version, deprecated)
    }

    /// Record that the class extends `name` in `version`.
    ///
    /// A class has one superclass per release. If a different superclass was already recorded
    /// for `version`, the later report wins and the superseded entry shrinks to the versions it
    /// is still observed in.
    pub fn add_super_class(&mut self, name: &str, version: ApiVersion) -> &ApiElement {
        if let Some(previous) = self
            .super_observations
            .insert(version, name.to_owned())
            .filter(|previous| previous != name)
        {
            tracing::warn!(
                target: "apilevels.history",
                class = %self.name(),
                version,
                previous = %previous,
                current = %name,
                "conflicting superclasses reported for the same version; keeping the latest"
            );
            self.recompute_super_class(&previous);
        }
        add_to(&mut self.super_classes, name, version, false)
    }

    fn recompute_super_class(&mut self, name: &str) {
        let mut versions = self
            .super_observations
            .iter()
            .filter(|(_, observed)| observed.as_str() == name)
            .map(|(&version, _)| version);
        let Some(first) = versions.next() else {
            self.super_classes.remove(name);
            return;
        };
        let last = versions.last().unwrap_or(first);
        if let Some(entry) = self.super_classes.get_mut(name) {
            entry.set_range(VersionRange::with_bounds(first, last, None));
        }
    }

    pub fn add_interface(&mut self, name: &str, version: ApiVersion) -> &ApiElement {
        add_to(&mut self.interfaces, name, version, false)
    }

    pub fn super_classes(&self) -> impl Iterator<Item = &ApiElement> {
        self.super_classes.values()
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &ApiElement> {
        self.interfaces.values()
    }

    pub fn fields(&self) -> impl Iterator<Item = &ApiElement> {
        self.fields.values()
    }

    pub fn methods(&self) -> impl Iterator<Item = &ApiElement> {
        self.methods.values()
    }

    pub fn find_field(&self, name: &str) -> Option<&ApiElement> {
        self.fields.get(name)
    }

    pub fn find_method(&self, key: &str) -> Option<&ApiElement> {
        self.methods.get(key)
    }

    /// Parameter and return types of the method `key`, or `None` if the class has no such
    /// method.
    pub fn method_types(&self, key: &str) -> Result<Option<MethodTypes>> {
        if !self.methods.contains_key(key) {
            return Ok(None);
        }
        MethodKey::parse(key).map(|key| Some(key.types()))
    }

    pub(crate) fn mark_visible_since(&mut self, version: ApiVersion) {
        self.visible_since = Some(version);
    }

    pub(crate) fn insert_super_class(&mut self, element: ApiElement) {
        insert_widening(&mut self.super_classes, element);
    }

    pub(crate) fn insert_interface(&mut self, element: ApiElement) {
        insert_widening(&mut self.interfaces, element);
    }

    pub(crate) fn insert_field(&mut self, element: ApiElement) {
        insert_widening(&mut self.fields, element);
    }

    pub(crate) fn insert_method(&mut self, element: ApiElement) {
        insert_widening(&mut self.methods, element);
    }

    pub(crate) fn remove_interface(&mut self, name: &str) -> bool {
        self.interfaces.remove(name).is_some()
    }

    pub(crate) fn remove_method(&mut self, key: &str) -> bool {
        self.methods.remove(key).is_some()
    }

    pub(crate) fn remove_super_class(&mut self, name: &str) -> Option<ApiElement> {
        self.super_observations.retain(|_, observed| observed.as_str() != name);
        self.super_classes.remove(name)
    }

    pub(crate) fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub(crate) fn has_method(&self, key: &str) -> bool {
        self.methods.contains_key(key)
    }
}

/// Equal when names, ranges, supertypes and members match; visibility bookkeeping is ignored.
impl PartialEq for ApiClass {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.super_classes == other.super_classes
            && self.interfaces == other.interfaces
            && self.fields == other.fields
            && self.methods == other.methods
    }
}

impl Eq for ApiClass {}

pub(crate) fn is_constructor(key: &str) -> bool {
    key.starts_with("<init>(")
}

fn add_to<'a>(
    map: &'a mut BTreeMap<String, ApiElement>,
    name: &str,
    version: ApiVersion,
    deprecated: bool,
) -> &'a ApiElement {
    let element = map
        .entry(name.to_owned())
        .and_modify(|element| element.update(version, deprecated))
        .or_insert_with(|| ApiElement::new(name, version, deprecated));
    element
}

fn insert_widening(map: &mut BTreeMap<String, ApiElement>, element: ApiElement) {
    match map.get_mut(element.name()) {
        Some(existing) => existing.widen(element.range()),
        None => {
            map.insert(element.name().to_owned(), element);
        }
    }
}
