//! Passes that drop what inheritance already implies and fold hidden classes into the
//! visible hierarchy.

use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::class::{is_constructor, ApiClass};
use crate::element::{ApiElement, VersionRange};

pub(crate) type Classes = BTreeMap<String, ApiClass>;

/// Which passes [`Api::clean`](crate::Api::clean) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOptions {
    pub remove_implicit_interfaces: bool,
    pub remove_overriding_methods: bool,
    pub inline_hidden_super_classes: bool,
    pub prune_package_private: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            remove_implicit_interfaces: true,
            remove_overriding_methods: true,
            inline_hidden_super_classes: true,
            prune_package_private: true,
        }
    }
}

/// What each pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub implicit_interfaces_removed: usize,
    pub overriding_methods_removed: usize,
    pub members_inlined: usize,
    pub super_classes_pruned: usize,
}

fn supertypes(class: &ApiClass) -> impl Iterator<Item = &ApiElement> {
    class.super_classes().chain(class.interfaces())
}

/// Remove interfaces a class already gets through one of its superclasses.
pub(crate) fn remove_implicit_interfaces(classes: &mut Classes) -> usize {
    let mut removals = Vec::new();
    for class in classes.values() {
        for interface in class.interfaces() {
            let implied = class.super_classes().any(|super_class| {
                super_class.introduced_not_later_than(interface)
                    && implements_interface(
                        classes,
                        super_class.name(),
                        interface,
                        &mut HashSet::new(),
                    )
            });
            if implied {
                removals.push((class.name().to_owned(), interface.name().to_owned()));
            }
        }
    }

    let mut removed = 0;
    for (class, interface) in removals {
        if let Some(class) = classes.get_mut(&class) {
            removed += usize::from(class.remove_interface(&interface));
        }
    }
    removed
}

/// Whether `name` implements `interface` by a path whose every step was introduced no later
/// than `interface` itself.
fn implements_interface<'a>(
    classes: &'a Classes,
    name: &'a str,
    interface: &ApiElement,
    visited: &mut HashSet<&'a str>,
) -> bool {
    if !visited.insert(name) {
        return false;
    }
    let Some(class) = classes.get(name) else {
        return false;
    };

    for local in class
        .interfaces()
        .filter(|local| local.introduced_not_later_than(interface))
    {
        if local.name() == interface.name()
            || implements_interface(classes, local.name(), interface, visited)
        {
            return true;
        }
    }
    class
        .super_classes()
        .filter(|super_class| super_class.introduced_not_later_than(interface))
        .any(|super_class| implements_interface(classes, super_class.name(), interface, visited))
}

/// Remove methods that only restate an inherited method with the same version metadata.
///
/// Ancestors are processed before descendants so a descendant compares against the already
/// reduced ancestor, which keeps the pass idempotent.
pub(crate) fn remove_overriding_methods(classes: &mut Classes) -> usize {
    let mut removed = 0;
    for name in ancestors_first(classes) {
        let Some(class) = classes.get(&name) else {
            continue;
        };
        let redundant: Vec<String> = class
            .methods()
            .filter(|method| !is_constructor(method.name()))
            .filter(|method| overrides_inherited(classes, class, method))
            .map(|method| method.name().to_owned())
            .collect();

        if let Some(class) = classes.get_mut(&name) {
            for key in &redundant {
                removed += usize::from(class.remove_method(key));
            }
        }
    }
    removed
}

fn ancestors_first(classes: &Classes) -> Vec<String> {
    fn visit<'a>(
        classes: &'a Classes,
        name: &'a str,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<String>,
    ) {
        if !visited.insert(name) {
            return;
        }
        let Some(class) = classes.get(name) else {
            return;
        };
        for supertype in supertypes(class) {
            visit(classes, supertype.name(), visited, order);
        }
        order.push(name.to_owned());
    }

    let mut order = Vec::with_capacity(classes.len());
    let mut visited = HashSet::new();
    for name in classes.keys() {
        visit(classes, name, &mut visited, &mut order);
    }
    order
}

fn overrides_inherited<'a>(classes: &'a Classes, class: &'a ApiClass, method: &ApiElement) -> bool {
    let mut visited = HashSet::from([class.name()]);
    supertypes(class)
        .filter(|supertype| supertype.introduced_not_later_than(method))
        .any(|supertype| inherited_matches(classes, supertype.name(), method, &mut visited))
}

/// The nearest public declaration of `method` along this path decides: it must cover the
/// method's versions and agree on deprecation. Never-public ancestors are walked through but
/// their declarations do not count.
fn inherited_matches<'a>(
    classes: &'a Classes,
    name: &'a str,
    method: &ApiElement,
    visited: &mut HashSet<&'a str>,
) -> bool {
    if !visited.insert(name) {
        return false;
    }
    let Some(class) = classes.get(name) else {
        return false;
    };
    if !class.is_always_hidden() {
        if let Some(inherited) = class.find_method(method.name()) {
            return inherited.range().covers(method.range())
                && inherited.deprecated_in() == method.deprecated_in();
        }
    }
    supertypes(class)
        .filter(|supertype| supertype.introduced_not_later_than(method))
        .any(|supertype| inherited_matches(classes, supertype.name(), method, visited))
}

fn hidden_super_classes<'a>(
    classes: &'a Classes,
    class: &'a ApiClass,
) -> impl Iterator<Item = &'a str> + 'a {
    class
        .super_classes()
        .map(ApiElement::name)
        .filter(move |name| classes.get(*name).is_some_and(ApiClass::is_always_hidden))
}

/// Copy fields and non-constructor methods of hidden ancestors into each visible class.
///
/// A copied member only covers the versions in which the receiving class existed.
pub(crate) fn inline_from_hidden_super_classes(classes: &mut Classes) -> usize {
    let mut additions = Vec::new();
    for class in classes.values().filter(|class| !class.is_always_hidden()) {
        let bounds = class.range();
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut visited = HashSet::new();
        let mut queue: VecDeque<&str> = hidden_super_classes(classes, class).collect();

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name) {
                continue;
            }
            let Some(hidden) = classes.get(name) else {
                continue;
            };
            for field in hidden.fields() {
                if class.has_field(field.name())
                    || fields.iter().any(|f: &ApiElement| f.name() == field.name())
                {
                    continue;
                }
                if let Some(range) = field.range().intersect(bounds) {
                    fields.push(ApiElement::with_range(field.name(), range));
                }
            }
            for method in hidden
                .methods()
                .filter(|method| !is_constructor(method.name()))
            {
                if class.has_method(method.name())
                    || methods.iter().any(|m: &ApiElement| m.name() == method.name())
                {
                    continue;
                }
                if let Some(range) = method.range().intersect(bounds) {
                    methods.push(ApiElement::with_range(method.name(), range));
                }
            }
            queue.extend(hidden_super_classes(classes, hidden));
        }

        if !fields.is_empty() || !methods.is_empty() {
            additions.push((class.name().to_owned(), fields, methods));
        }
    }

    let mut inlined = 0;
    for (name, fields, methods) in additions {
        let Some(class) = classes.get_mut(&name) else {
            continue;
        };
        inlined += fields.len() + methods.len();
        for field in fields {
            class.insert_field(field);
        }
        for method in methods {
            class.insert_method(method);
        }
    }
    inlined
}

/// Replace superclass entries naming always-hidden classes with those classes' own
/// superclasses, limited to the versions both relationships held.
pub(crate) fn prune_package_private_classes(classes: &mut Classes) -> usize {
    let hidden: HashSet<&str> = classes
        .values()
        .filter(|class| class.is_always_hidden())
        .map(ApiClass::name)
        .collect();
    if hidden.is_empty() {
        return 0;
    }

    let mut replacements = Vec::new();
    for class in classes.values() {
        let mut pending: Vec<ApiElement> = class
            .super_classes()
            .filter(|super_class| hidden.contains(super_class.name()))
            .cloned()
            .collect();
        if pending.is_empty() {
            continue;
        }
        let removed: Vec<String> = pending.iter().map(|e| e.name().to_owned()).collect();

        let mut added = Vec::new();
        let mut expanded: HashSet<(String, VersionRange)> = HashSet::new();
        while let Some(entry) = pending.pop() {
            if !expanded.insert((entry.name().to_owned(), *entry.range())) {
                continue;
            }
            let Some(hidden_class) = classes.get(entry.name()) else {
                continue;
            };
            for grand in hidden_class.super_classes() {
                let Some(range) = entry.range().intersect(grand.range()) else {
                    continue;
                };
                let replacement = ApiElement::with_range(grand.name(), range);
                if hidden.contains(grand.name()) {
                    pending.push(replacement);
                } else {
                    added.push(replacement);
                }
            }
        }
        replacements.push((class.name().to_owned(), removed, added));
    }

    let mut pruned = 0;
    for (name, removed, added) in replacements {
        let Some(class) = classes.get_mut(&name) else {
            continue;
        };
        for super_class in &removed {
            pruned += usize::from(class.remove_super_class(super_class).is_some());
        }
        for super_class in added {
            class.insert_super_class(super_class);
        }
    }
    pruned
}
