//! Type-parameter lists and type-variable lookup through enclosing declarations.

use crate::error::TypeError;
use crate::type_string::TypeString;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    name: String,
    bounds: Vec<TypeString>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>, bounds: Vec<TypeString>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared bounds in source order; empty for an unbounded parameter.
    pub fn bounds(&self) -> &[TypeString] {
        &self.bounds
    }
}

/// A declaration's type parameters, e.g. `<K extends Comparable<K>, V>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeParameterList {
    parameters: Vec<TypeParameter>,
}

impl TypeParameterList {
    pub const fn empty() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    pub fn new(parameters: Vec<TypeParameter>) -> Self {
        Self { parameters }
    }

    /// Parse the signature-file form. The surrounding angle brackets are optional and blank
    /// input yields an empty list.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let trimmed = text.trim();
        let inner = match trimmed.strip_prefix('<') {
            Some(rest) => rest
                .strip_suffix('>')
                .ok_or_else(|| TypeError::unbalanced(text, '<'))?,
            None => trimmed,
        };
        if inner.trim().is_empty() {
            return Ok(Self::empty());
        }

        let parameters = split_top_level(inner, ',', text)?
            .into_iter()
            .map(|part| parse_parameter(part, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { parameters })
    }

    pub fn find(&self, name: &str) -> Option<&TypeParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeParameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

fn parse_parameter(text: &str, input: &str) -> Result<TypeParameter, TypeError> {
    let text = text.trim();
    let (name, rest) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (text, ""),
    };

    let bounds = match rest.strip_prefix("extends") {
        Some(bounds) => split_top_level(bounds, '&', input)?
            .into_iter()
            .map(|bound| TypeString::new(bound.trim()))
            .collect(),
        None => Vec::new(),
    };
    Ok(TypeParameter::new(name, bounds))
}

/// Split on `separator` outside of `<...>` nesting.
fn split_top_level<'a>(
    text: &'a str,
    separator: char,
    input: &str,
) -> Result<Vec<&'a str>, TypeError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TypeError::unbalanced(input, '>'))?;
            }
            c if c == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TypeError::unbalanced(input, '<'));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

/// A declaration that can declare type parameters: a class or a method.
pub trait TypeParameterOwner {
    fn type_parameter_list(&self) -> &TypeParameterList;

    /// The declaration whose type parameters are also in scope, e.g. the class around a method.
    fn enclosing_owner(&self) -> Option<&dyn TypeParameterOwner> {
        None
    }
}

/// Resolves type-variable names to their declarations, innermost owner first.
#[derive(Clone, Copy)]
pub struct TypeVariableResolver<'a> {
    owner: &'a dyn TypeParameterOwner,
}

impl<'a> TypeVariableResolver<'a> {
    pub fn new(owner: &'a dyn TypeParameterOwner) -> Self {
        Self { owner }
    }

    pub fn resolve(&self, name: &str) -> Option<&'a TypeParameter> {
        let mut current = Some(self.owner);
        while let Some(owner) = current {
            if let Some(parameter) = owner.type_parameter_list().find(name) {
                return Some(parameter);
            }
            current = owner.enclosing_owner();
        }
        None
    }

    pub fn bounds(&self, name: &str) -> Option<&'a [TypeString]> {
        self.resolve(name).map(TypeParameter::bounds)
    }
}

/// A minimal [`TypeParameterOwner`] for callers that only have names and parameter lists.
#[derive(Debug, Clone)]
pub struct Declaration<'p> {
    name: String,
    type_parameters: TypeParameterList,
    enclosing: Option<&'p Declaration<'p>>,
}

impl<'p> Declaration<'p> {
    pub fn new(name: impl Into<String>, type_parameters: TypeParameterList) -> Self {
        Self {
            name: name.into(),
            type_parameters,
            enclosing: None,
        }
    }

    pub fn nested_in(mut self, enclosing: &'p Declaration<'p>) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TypeParameterOwner for Declaration<'_> {
    fn type_parameter_list(&self) -> &TypeParameterList {
        &self.type_parameters
    }

    fn enclosing_owner(&self) -> Option<&dyn TypeParameterOwner> {
        self.enclosing.map(|decl| decl as &dyn TypeParameterOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bounds_and_intersections() {
        let list =
            TypeParameterList::parse("<K extends java.lang.Comparable<K> & java.io.Serializable, V>")
                .unwrap();
        assert_eq!(list.len(), 2);
        let k = list.find("K").unwrap();
        assert_eq!(
            k.bounds(),
            &[
                TypeString::from("java.lang.Comparable<K>"),
                TypeString::from("java.io.Serializable"),
            ]
        );
        assert!(list.find("V").unwrap().bounds().is_empty());
    }

    #[test]
    fn parses_empty_and_bare_lists() {
        assert!(TypeParameterList::parse("").unwrap().is_empty());
        assert!(TypeParameterList::parse("<>").unwrap().is_empty());
        let bare = TypeParameterList::parse("T, U extends Number").unwrap();
        assert_eq!(bare.iter().map(TypeParameter::name).collect::<Vec<_>>(), ["T", "U"]);
    }

    #[test]
    fn rejects_unbalanced_lists() {
        assert!(TypeParameterList::parse("<T extends List<T>").is_err());
        assert!(TypeParameterList::parse("T extends List<T>>").is_err());
    }

    #[test]
    fn method_parameters_shadow_class_parameters() {
        let class = Declaration::new(
            "Container",
            TypeParameterList::parse("<T extends Number, E>").unwrap(),
        );
        let method =
            Declaration::new("map", TypeParameterList::parse("<T extends CharSequence>").unwrap())
                .nested_in(&class);

        let resolver = TypeVariableResolver::new(&method);
        assert_eq!(
            resolver.bounds("T"),
            Some(&[TypeString::from("CharSequence")][..])
        );
        assert_eq!(resolver.resolve("E").map(TypeParameter::name), Some("E"));
        assert!(resolver.resolve("X").is_none());
    }
}
