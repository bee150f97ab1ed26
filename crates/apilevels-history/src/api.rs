use std::collections::BTreeMap;

use apilevels_types::ClassLookup;

use crate::class::ApiClass;
use crate::cleanup::{self, CleanupOptions, CleanupReport};
use crate::descriptor::{binary_to_internal, MethodKey};
use crate::element::ApiVersion;
use crate::error::{ApiError, Result};
use crate::observation::{ClassObservation, VersionBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Populating,
    Cleaned,
}

/// The whole API across all merged releases.
///
/// Classes are owned here and refer to each other by internal name.
#[derive(Debug, Clone)]
pub struct Api {
    classes: BTreeMap<String, ApiClass>,
    min: ApiVersion,
    max: ApiVersion,
    last_batch: Option<ApiVersion>,
    phase: Phase,
}

impl Api {
    pub fn new(min: ApiVersion, max: ApiVersion) -> Self {
        Self {
            classes: BTreeMap::new(),
            min,
            max: max.max(min),
            last_batch: None,
            phase: Phase::Populating,
        }
    }

    pub fn min(&self) -> ApiVersion {
        self.min
    }

    pub fn max(&self) -> ApiVersion {
        self.max
    }

    /// Add or update a class that is public in `version`.
    pub fn add_class(&mut self, name: &str, version: ApiVersion, deprecated: bool) -> &mut ApiClass {
        let class = self.observe_class(name, version, deprecated);
        class.observe_visibility(version, false);
        class
    }

    /// Add or update a class that exists in `version` without being public there.
    pub fn add_hidden_class(
        &mut self,
        name: &str,
        version: ApiVersion,
        deprecated: bool,
    ) -> &mut ApiClass {
        self.observe_class(name, version, deprecated)
    }

    fn observe_class(&mut self, name: &str, version: ApiVersion, deprecated: bool) -> &mut ApiClass {
        self.min = self.min.min(version);
        self.max = self.max.max(version);
        self.classes
            .entry(name.to_owned())
            .and_modify(|class| class.update(version, deprecated))
            .or_insert_with(|| ApiClass::new(name, version, deprecated))
    }

    pub(crate) fn insert_class(&mut self, class: ApiClass) {
        self.classes.insert(class.name().to_owned(), class);
    }

    /// Lookup by internal (`java/util/Map$Entry`), binary or source
    /// (`java.util.Map.Entry`) name.
    ///
    /// Source names are ambiguous about where the package ends, so nesting separators are
    /// tried from the right: `java/util/Map/Entry`, then `java/util/Map$Entry`, and so on.
    pub fn find_class(&self, name: &str) -> Option<&ApiClass> {
        if let Some(class) = self.classes.get(name) {
            return Some(class);
        }
        let mut candidate = binary_to_internal(name);
        loop {
            if let Some(class) = self.classes.get(&candidate) {
                return Some(class);
            }
            let slash = candidate.rfind('/')?;
            candidate.replace_range(slash..=slash, "$");
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &ApiClass> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Merge one release's observations.
    ///
    /// Batches must arrive in non-decreasing version order and before any cleanup pass.
    pub fn merge_batch(&mut self, batch: &VersionBatch) -> Result<()> {
        if self.phase == Phase::Cleaned {
            return Err(ApiError::AlreadyCleaned);
        }
        if let Some(last) = self.last_batch.filter(|&last| batch.version < last) {
            return Err(ApiError::VersionOutOfOrder {
                version: batch.version,
                last,
            });
        }
        self.last_batch = Some(batch.version);

        for observation in &batch.classes {
            self.merge_class(batch.version, observation);
        }
        tracing::debug!(
            target: "apilevels.history",
            version = batch.version,
            classes = batch.classes.len(),
            "merged version batch"
        );
        Ok(())
    }

    fn merge_class(&mut self, version: ApiVersion, observation: &ClassObservation) {
        let class = if observation.hidden {
            self.add_hidden_class(&observation.name, version, observation.deprecated)
        } else {
            self.add_class(&observation.name, version, observation.deprecated)
        };

        if let Some(super_class) = &observation.super_class {
            class.add_super_class(super_class, version);
        }
        for interface in &observation.interfaces {
            class.add_interface(interface, version);
        }
        for field in &observation.fields {
            class.add_field(&field.name, version, field.deprecated);
        }
        for method in &observation.methods {
            if let Err(err) = MethodKey::parse(&method.name) {
                tracing::warn!(
                    target: "apilevels.history",
                    class = %observation.name,
                    version,
                    error = %err,
                    "recording method with a malformed key"
                );
            }
            class.add_method(&method.name, version, method.deprecated);
        }
    }

    /// Drop interfaces that a superclass already implements. Returns how many were removed.
    pub fn remove_implicit_interfaces(&mut self) -> usize {
        self.phase = Phase::Cleaned;
        cleanup::remove_implicit_interfaces(&mut self.classes)
    }

    /// Drop methods that only restate an inherited method. Returns how many were removed.
    pub fn remove_overriding_methods(&mut self) -> usize {
        self.phase = Phase::Cleaned;
        cleanup::remove_overriding_methods(&mut self.classes)
    }

    /// Copy members of never-public ancestors into their visible descendants. Returns how many
    /// members were copied.
    pub fn inline_from_hidden_super_classes(&mut self) -> usize {
        self.phase = Phase::Cleaned;
        cleanup::inline_from_hidden_super_classes(&mut self.classes)
    }

    /// Route superclass entries around never-public classes. Returns how many entries were
    /// replaced.
    pub fn prune_package_private_classes(&mut self) -> usize {
        self.phase = Phase::Cleaned;
        cleanup::prune_package_private_classes(&mut self.classes)
    }

    /// Run the enabled passes in order: implicit interfaces, overriding methods, hidden
    /// superclass inlining, package-private pruning.
    pub fn clean(&mut self, options: &CleanupOptions) -> CleanupReport {
        self.phase = Phase::Cleaned;
        let mut report = CleanupReport::default();
        if options.remove_implicit_interfaces {
            report.implicit_interfaces_removed = self.remove_implicit_interfaces();
        }
        if options.remove_overriding_methods {
            report.overriding_methods_removed = self.remove_overriding_methods();
        }
        if options.inline_hidden_super_classes {
            report.members_inlined = self.inline_from_hidden_super_classes();
        }
        if options.prune_package_private {
            report.super_classes_pruned = self.prune_package_private_classes();
        }
        tracing::debug!(
            target: "apilevels.history",
            implicit_interfaces = report.implicit_interfaces_removed,
            overriding_methods = report.overriding_methods_removed,
            inlined = report.members_inlined,
            pruned = report.super_classes_pruned,
            "cleaned api"
        );
        report
    }
}

impl PartialEq for Api {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.classes == other.classes
    }
}

impl Eq for Api {}

impl ClassLookup for Api {
    type Class = ApiClass;

    fn find_class(&self, name: &str) -> Option<&ApiClass> {
        Api::find_class(self, name)
    }
}
