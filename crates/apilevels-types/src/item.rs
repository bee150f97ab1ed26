//! A [`TypeString`] bound to the model it was read from.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TypeError;
use crate::resolver::{TypeParameter, TypeParameterOwner, TypeVariableResolver};
use crate::type_string::{
    Nullability, TypeString, TypeStringOptions, JAVA_LANG_OBJECT, JAVA_LANG_PREFIX,
    JAVA_LANG_STRING,
};

/// Name-based class lookup over a model of classes.
pub trait ClassLookup {
    type Class;

    fn find_class(&self, name: &str) -> Option<&Self::Class>;
}

/// A type reference: the type's text plus a back-reference to the model that resolves it.
pub struct TypeItem<'m, L: ClassLookup + ?Sized> {
    ty: TypeString,
    model: &'m L,
}

impl<'m, L: ClassLookup + ?Sized> TypeItem<'m, L> {
    pub fn new(ty: impl Into<TypeString>, model: &'m L) -> Self {
        Self {
            ty: ty.into(),
            model,
        }
    }

    pub fn type_string(&self) -> &TypeString {
        &self.ty
    }

    pub fn model(&self) -> &'m L {
        self.model
    }

    pub fn to_type_string(
        &self,
        options: TypeStringOptions,
        context: Option<&dyn TypeParameterOwner>,
    ) -> String {
        self.ty.to_type_string(options, context)
    }

    pub fn to_erased_type_string(&self, context: Option<&dyn TypeParameterOwner>) -> String {
        self.ty.to_type_string(TypeStringOptions::ERASED, context)
    }

    pub fn array_dimensions(&self) -> usize {
        self.ty.array_dimensions()
    }

    pub fn is_primitive(&self) -> bool {
        self.ty.is_primitive()
    }

    pub fn nullability(&self) -> Nullability {
        self.ty.nullability()
    }

    /// The class this type refers to, ignoring type arguments, annotations, markers and array
    /// dimensions.
    pub fn as_class(&self) -> Option<&'m L::Class> {
        let erased = self.to_erased_type_string(None);
        let end = erased.find('[').unwrap_or(erased.len());
        let base = erased[..end].trim_end().trim_end_matches("...");
        self.model.find_class(base)
    }

    pub fn as_type_parameter<'c>(
        &self,
        context: &'c dyn TypeParameterOwner,
    ) -> Option<&'c TypeParameter> {
        let name = self.to_type_string(TypeStringOptions::default(), None);
        TypeVariableResolver::new(context).resolve(name.trim())
    }

    pub fn convert_type(&self, replacements: &HashMap<String, TypeString>) -> TypeItem<'m, L> {
        TypeItem::new(self.ty.convert_type(replacements), self.model)
    }

    pub fn is_java_lang_object(&self) -> bool {
        self.to_erased_type_string(None) == JAVA_LANG_OBJECT
    }

    pub fn is_string(&self) -> bool {
        self.to_erased_type_string(None) == JAVA_LANG_STRING
    }

    pub fn type_argument_classes(&self) -> Result<Vec<&'m L::Class>, TypeError> {
        Err(TypeError::unsupported("type_argument_classes"))
    }

    pub fn scrub_annotations(&mut self) -> Result<(), TypeError> {
        Err(TypeError::unsupported("scrub_annotations"))
    }

    pub fn mark_recent(&mut self) -> Result<(), TypeError> {
        Err(TypeError::unsupported("mark_recent"))
    }
}

/// `X` and `java.lang.X` name the same type; anything else compares textually.
fn same_type_name(a: &str, b: &str) -> bool {
    if a.len() == b.len() {
        return a == b;
    }
    let (long, short) = if a.len() > b.len() { (a, b) } else { (b, a) };
    long.len() == JAVA_LANG_PREFIX.len() + short.len()
        && long.starts_with(JAVA_LANG_PREFIX)
        && long.ends_with(short)
}

impl<L: ClassLookup + ?Sized> PartialEq for TypeItem<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        same_type_name(self.ty.as_str(), other.ty.as_str())
    }
}

impl<L: ClassLookup + ?Sized> Eq for TypeItem<'_, L> {}

impl<L: ClassLookup + ?Sized> Hash for TypeItem<'_, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut text = self.ty.as_str();
        while let Some(rest) = text.strip_prefix(JAVA_LANG_PREFIX) {
            text = rest;
        }
        text.hash(state);
    }
}

impl<L: ClassLookup + ?Sized> Clone for TypeItem<'_, L> {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            model: self.model,
        }
    }
}

impl<L: ClassLookup + ?Sized> fmt::Debug for TypeItem<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeItem").field(&self.ty.as_str()).finish()
    }
}

impl<L: ClassLookup + ?Sized> fmt::Display for TypeItem<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ty, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_lang_short_form_is_equal_only_for_exact_suffix() {
        assert!(same_type_name("String", "java.lang.String"));
        assert!(same_type_name("java.lang.String", "String"));
        assert!(!same_type_name("tring", "java.lang.String"));
        assert!(!same_type_name("String", "java.util.String"));
        assert!(!same_type_name("String", "java.lang.reflect.String"));
    }
}
