//! Text-level algorithms over Java type strings as they appear in API signature files.
//!
//! Everything here works on the raw string: there is no parse tree. A type such as
//! `java.util.@NonNull Map<K, @Nullable V>[]?` is erased, stripped, or substituted by scanning
//! for delimiters. All operations are pure and return new values.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::resolver::{TypeParameterOwner, TypeVariableResolver};

pub const JAVA_LANG_PREFIX: &str = "java.lang.";
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_STRING: &str = "java.lang.String";

/// When erasing, render a type variable without bounds as `java.lang.Object` instead of
/// leaving the variable name in place.
const ASSUME_TYPE_VARS_EXTEND_OBJECT: bool = false;

const PRIMITIVES: [&str; 9] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Nullability carried by a trailing marker (`String?`, `String!`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    NonNull,
    Nullable,
    /// Nullability is unknown (`!`), e.g. types coming from unannotated Java code.
    Platform,
}

impl Nullability {
    pub fn suffix(self) -> Option<char> {
        match self {
            Nullability::NonNull => None,
            Nullability::Nullable => Some('?'),
            Nullability::Platform => Some('!'),
        }
    }
}

/// Rendering switches for [`to_type_string`].
///
/// `Default` renders the unerased type with every annotation and nullability marker removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeStringOptions {
    pub erased: bool,
    pub outer_annotations: bool,
    pub inner_annotations: bool,
    pub nullability_markers: bool,
}

impl TypeStringOptions {
    /// Raw type, no annotations, no markers.
    pub const ERASED: Self = Self {
        erased: true,
        outer_annotations: false,
        inner_annotations: false,
        nullability_markers: false,
    };

    /// The type exactly as written.
    pub const VERBATIM: Self = Self {
        erased: false,
        outer_annotations: true,
        inner_annotations: true,
        nullability_markers: true,
    };
}

/// An annotation occurrence inside a type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpan {
    /// Byte range of `@Name(...)`, not including surrounding whitespace.
    pub range: Range<usize>,
    /// `true` when the annotation applies to the outermost type (it appears before the head of
    /// the type ends).
    pub outer: bool,
}

/// An immutable type string. All transformations return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeString(String);

impl TypeString {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_primitive(&self) -> bool {
        is_primitive(&self.0)
    }

    pub fn array_dimensions(&self) -> usize {
        array_dimensions(&self.0)
    }

    pub fn is_varargs(&self) -> bool {
        is_varargs(&self.0)
    }

    pub fn type_arguments_span(&self) -> Option<Range<usize>> {
        type_arguments_span(&self.0)
    }

    pub fn annotation_spans(&self) -> Result<Vec<AnnotationSpan>, TypeError> {
        annotation_spans(&self.0)
    }

    pub fn nullability(&self) -> Nullability {
        nullability(&self.0)
    }

    pub fn nullability_suffix(&self) -> Option<char> {
        self.nullability().suffix()
    }

    /// # Panics
    ///
    /// Panics on unbalanced `<`/`>`; see [`erase_type_arguments`].
    pub fn erase_type_arguments(&self) -> TypeString {
        Self::from_cow(erase_type_arguments(&self.0))
    }

    /// # Panics
    ///
    /// Panics on an unterminated annotation argument list; see [`erase_annotations`].
    pub fn erase_annotations(&self, keep_outer: bool, keep_inner: bool) -> TypeString {
        Self::from_cow(erase_annotations(&self.0, keep_outer, keep_inner))
    }

    pub fn strip_nullability_markers(&self) -> TypeString {
        Self::from_cow(strip_nullability_markers(&self.0))
    }

    pub fn substitute_type_variable(&self, owner: Option<&dyn TypeParameterOwner>) -> TypeString {
        Self::from_cow(substitute_type_variable(&self.0, owner))
    }

    pub fn to_type_string(
        &self,
        options: TypeStringOptions,
        context: Option<&dyn TypeParameterOwner>,
    ) -> String {
        to_type_string(&self.0, options, context)
    }

    pub fn is_likely_type_parameter(&self) -> bool {
        is_likely_type_parameter(&self.0)
    }

    pub fn convert_type(&self, replacements: &HashMap<String, TypeString>) -> TypeString {
        Self::from_cow(convert_type(&self.0, replacements))
    }

    fn from_cow(value: Cow<'_, str>) -> TypeString {
        TypeString(value.into_owned())
    }
}

impl fmt::Display for TypeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TypeString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub(crate) fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn char_at(s: &str, idx: usize) -> Option<char> {
    s.get(idx..).and_then(|rest| rest.chars().next())
}

fn skip_whitespace(s: &str, mut idx: usize) -> usize {
    while let Some(c) = char_at(s, idx) {
        if !c.is_whitespace() {
            break;
        }
        idx += c.len_utf8();
    }
    idx
}

/// Remove every balanced `<...>` span, e.g. `Map<K, List<V>>[]` → `Map[]`.
///
/// Fails on an unterminated `<` or a `>` without an opener instead of truncating.
pub fn try_erase_type_arguments(s: &str) -> Result<Cow<'_, str>, TypeError> {
    if !s.contains(|c: char| c == '<' || c == '>') {
        return Ok(Cow::Borrowed(s));
    }

    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                if depth == 0 {
                    return Err(TypeError::unbalanced(s, '>'));
                }
                depth -= 1;
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TypeError::unbalanced(s, '<'));
    }
    Ok(Cow::Owned(out))
}

/// Like [`try_erase_type_arguments`] for input known to be balanced.
///
/// # Panics
///
/// Panics on unbalanced input: the signature extractor guarantees balance, so anything else is
/// a bug upstream and must not be silently truncated.
pub fn erase_type_arguments(s: &str) -> Cow<'_, str> {
    match try_erase_type_arguments(s) {
        Ok(erased) => erased,
        Err(err) => panic!("{err}"),
    }
}

/// Byte range of the first top-level `<...>` span, or `None` if there is none or it never
/// closes.
pub fn type_arguments_span(s: &str) -> Option<Range<usize>> {
    let start = s.find('<')?;
    let mut depth = 0usize;
    for (offset, c) in s[start..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start..start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the offset just past the annotation that starts at `start` (an `@`).
fn annotation_end(s: &str, start: usize) -> Result<usize, TypeError> {
    let mut idx = start + 1;
    while let Some(c) = char_at(s, idx) {
        if !(is_ident_part(c) || c == '.') {
            break;
        }
        idx += c.len_utf8();
    }

    if char_at(s, idx) != Some('(') {
        return Ok(idx);
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (offset, c) in s[idx..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(idx + offset + 1);
                }
            }
            _ => {}
        }
    }
    Err(TypeError::unbalanced(s, '('))
}

/// End of the type's head: the first space or `<` after the leading type name.
///
/// Leading annotations are skipped. An annotation that follows a `.` while the head is still
/// being read (`java.util.@NonNull Map`) qualifies a segment of the head itself and does not end
/// it.
fn head_end(s: &str) -> Result<usize, TypeError> {
    let mut idx = skip_whitespace(s, 0);
    let mut seen_name = false;
    let mut prev: Option<char> = None;
    while let Some(c) = char_at(s, idx) {
        match c {
            '@' if !seen_name || prev == Some('.') => {
                idx = annotation_end(s, idx)?;
                idx = skip_whitespace(s, idx);
                prev = None;
                continue;
            }
            '@' | '<' => break,
            c if c.is_whitespace() => break,
            _ => seen_name = true,
        }
        prev = Some(c);
        idx += c.len_utf8();
    }
    Ok(idx)
}

/// Every annotation in `s`, classified as outer or inner.
pub fn annotation_spans(s: &str) -> Result<Vec<AnnotationSpan>, TypeError> {
    if !s.contains('@') {
        return Ok(Vec::new());
    }

    let head = head_end(s)?;
    let mut spans = Vec::new();
    let mut idx = 0;
    while let Some(offset) = s[idx..].find('@') {
        let start = idx + offset;
        let end = annotation_end(s, start)?;
        spans.push(AnnotationSpan {
            range: start..end,
            outer: start < head,
        });
        idx = end;
    }
    Ok(spans)
}

/// Remove annotations, keeping outer and/or inner ones as requested.
pub fn try_erase_annotations(
    s: &str,
    keep_outer: bool,
    keep_inner: bool,
) -> Result<Cow<'_, str>, TypeError> {
    if (keep_outer && keep_inner) || !s.contains('@') {
        return Ok(Cow::Borrowed(s));
    }

    let spans = annotation_spans(s)?;
    let mut out = s.to_owned();
    // Right to left so earlier ranges stay valid.
    for span in spans.iter().rev() {
        let keep = if span.outer { keep_outer } else { keep_inner };
        if !keep {
            remove_annotation(&mut out, span.range.clone());
        }
    }
    Ok(Cow::Owned(out))
}

/// Like [`try_erase_annotations`] for well-formed input.
///
/// # Panics
///
/// Panics when an annotation's argument list never closes.
pub fn erase_annotations(s: &str, keep_outer: bool, keep_inner: bool) -> Cow<'_, str> {
    match try_erase_annotations(s, keep_outer, keep_inner) {
        Ok(erased) => erased,
        Err(err) => panic!("{err}"),
    }
}

fn remove_annotation(out: &mut String, range: Range<usize>) {
    let after = &out[range.end..];
    let end = range.end + (after.len() - after.trim_start().len());

    let mut start = range.start;
    if matches!(
        out[end..].chars().next(),
        None | Some('[' | ']' | '.' | ',' | '>' | ')')
    ) {
        let before = &out[..start];
        start -= before.len() - before.trim_end().len();
    }
    out.replace_range(start..end, "");
}

fn is_marker_anchor(c: char) -> bool {
    is_ident_part(c) || matches!(c, '>' | ']' | '.')
}

/// Remove `?`/`!` nullability markers.
///
/// A `?` right after `<`, `,`, a space, or at the very start is a wildcard and is kept.
pub fn strip_nullability_markers(s: &str) -> Cow<'_, str> {
    if !s.contains(|c: char| c == '?' || c == '!') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in s.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '"' || c == '\'' {
            quote = Some(c);
        } else if (c == '?' || c == '!') && prev.is_some_and(is_marker_anchor) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    Cow::Owned(out)
}

/// Nullability of the outermost type, read from its trailing marker.
pub fn nullability(s: &str) -> Nullability {
    let trimmed = s.trim_end();
    let mut chars = trimmed.chars().rev();
    let marker = match chars.next() {
        Some('?') => Nullability::Nullable,
        Some('!') => Nullability::Platform,
        _ => return Nullability::NonNull,
    };
    if chars.next().is_some_and(is_marker_anchor) {
        marker
    } else {
        Nullability::NonNull
    }
}

pub fn nullability_suffix(s: &str) -> Option<char> {
    nullability(s).suffix()
}

/// End of the leading identifier: the first `[`, `...`, or nullability marker.
fn leading_identifier_end(s: &str) -> usize {
    let marker = s.find(['[', '?', '!']).unwrap_or(s.len());
    let varargs = s.find("...").unwrap_or(s.len());
    marker.min(varargs)
}

/// Replace a leading type variable with the erasure of its first bound, e.g. `T[]` →
/// `java.lang.Number[]` for `<T extends Number>`.
///
/// The variable is looked up through `owner` and then its enclosing owners. Anything that does
/// not look like a simple upper-case name, or does not resolve, is returned unchanged.
pub fn substitute_type_variable<'s>(
    s: &'s str,
    owner: Option<&dyn TypeParameterOwner>,
) -> Cow<'s, str> {
    let Some(owner) = owner else {
        return Cow::Borrowed(s);
    };

    let end = leading_identifier_end(s);
    let name = &s[..end];
    if !name.starts_with(char::is_uppercase) || name.contains('.') {
        return Cow::Borrowed(s);
    }

    let Some(parameter) = TypeVariableResolver::new(owner).resolve(name) else {
        return Cow::Borrowed(s);
    };

    match parameter.bounds().first() {
        Some(bound) => Cow::Owned(format!(
            "{}{}",
            bound.to_type_string(TypeStringOptions::ERASED, None),
            &s[end..]
        )),
        None if ASSUME_TYPE_VARS_EXTEND_OBJECT => {
            Cow::Owned(format!("{JAVA_LANG_OBJECT}{}", &s[end..]))
        }
        None => Cow::Borrowed(s),
    }
}

/// Render `s` according to `options`.
///
/// Order is fixed: erase type arguments and substitute type variables (when `erased`), then
/// strip annotations (unless both annotation flags are set), then strip nullability markers
/// (unless `nullability_markers`).
///
/// # Panics
///
/// Panics on unbalanced input, like [`erase_type_arguments`] and [`erase_annotations`].
pub fn to_type_string(
    s: &str,
    options: TypeStringOptions,
    context: Option<&dyn TypeParameterOwner>,
) -> String {
    let mut out = if options.erased {
        let raw = erase_type_arguments(s);
        substitute_type_variable(&raw, context).into_owned()
    } else {
        s.to_owned()
    };

    if !(options.outer_annotations && options.inner_annotations) {
        out = erase_annotations(&out, options.outer_annotations, options.inner_annotations)
            .into_owned();
    }
    if !options.nullability_markers {
        out = strip_nullability_markers(&out).into_owned();
    }
    out
}

/// Best-effort guess whether `s` names a type parameter rather than a class.
///
/// True when the first character is upper-case or `_` and no `.` shows up before the first
/// space, `[` or `<`. Simple class names such as `String` are misclassified as type
/// parameters; without the declared parameter names there is nothing to tell them apart.
pub fn is_likely_type_parameter(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if !(first.is_uppercase() || first == '_') {
        return false;
    }
    for c in s.chars() {
        match c {
            '.' => return false,
            ' ' | '[' | '<' => return true,
            _ => {}
        }
    }
    true
}

pub fn is_primitive(s: &str) -> bool {
    let rendered = to_type_string(s, TypeStringOptions::ERASED, None);
    PRIMITIVES.contains(&rendered.trim())
}

/// `[]` pairs, plus one for a trailing `...`.
pub fn array_dimensions(s: &str) -> usize {
    let rendered = to_type_string(s, TypeStringOptions::ERASED, None);
    let brackets = rendered.matches("[]").count();
    brackets + usize::from(rendered.trim_end().ends_with("..."))
}

pub fn is_varargs(s: &str) -> bool {
    strip_nullability_markers(s).trim_end().ends_with("...")
}

/// Replace whole identifier tokens (type variables) according to `replacements`.
pub fn convert_type<'s>(s: &'s str, replacements: &HashMap<String, TypeString>) -> Cow<'s, str> {
    if replacements.is_empty() {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut changed = false;
    let mut token_start: Option<usize> = None;
    let mut in_annotation = false;

    let mut flush = |out: &mut String, token: &str, in_annotation: bool| {
        match replacements.get(token) {
            Some(replacement) if !in_annotation && !token.contains('.') => {
                out.push_str(replacement.as_str());
                changed = true;
            }
            _ => out.push_str(token),
        }
    };

    for (idx, c) in s.char_indices() {
        if is_ident_part(c) || c == '.' {
            token_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = token_start.take() {
            flush(&mut out, &s[start..idx], in_annotation);
        }
        in_annotation = c == '@';
        out.push(c);
    }
    if let Some(start) = token_start {
        flush(&mut out, &s[start..], in_annotation);
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Declaration, TypeParameterList};

    #[test]
    fn erases_nested_and_repeated_type_arguments() {
        assert_eq!(erase_type_arguments("java.util.List<String>"), "java.util.List");
        assert_eq!(
            erase_type_arguments("java.util.Map<K, java.util.List<V>>[]"),
            "java.util.Map[]"
        );
        assert_eq!(erase_type_arguments("Outer<A>.Inner<B>"), "Outer.Inner");
        assert_eq!(erase_type_arguments("int"), "int");
    }

    #[test]
    fn unbalanced_type_arguments_are_reported() {
        assert_eq!(
            try_erase_type_arguments("List<String"),
            Err(TypeError::Unbalanced {
                input: "List<String".to_string(),
                delimiter: '<',
            })
        );
        assert!(try_erase_type_arguments("List>").is_err());
    }

    #[test]
    #[should_panic(expected = "unbalanced `<`")]
    fn erase_type_arguments_fails_fast_on_malformed_input() {
        let _ = erase_type_arguments("Map<K, V");
    }

    #[test]
    fn type_arguments_span_covers_first_top_level_span() {
        assert_eq!(type_arguments_span("Map<K, List<V>>.Entry"), Some(3..15));
        assert_eq!(type_arguments_span("String"), None);
        assert_eq!(type_arguments_span("List<"), None);
    }

    #[test]
    fn classifies_outer_and_inner_annotations() {
        let spans = annotation_spans("@NonNull java.util.List<@Nullable String>").unwrap();
        assert_eq!(
            spans,
            vec![
                AnnotationSpan {
                    range: 0..8,
                    outer: true
                },
                AnnotationSpan {
                    range: 24..33,
                    outer: false
                },
            ]
        );
    }

    #[test]
    fn annotation_on_qualified_segment_belongs_to_head() {
        let spans = annotation_spans("java.util.@NonNull Map<K, V>").unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].outer);
    }

    #[test]
    fn erase_annotations_respects_flags() {
        let ty = "@NonNull java.util.List<@Nullable String>";
        assert_eq!(erase_annotations(ty, false, false), "java.util.List<String>");
        assert_eq!(
            erase_annotations(ty, false, true),
            "java.util.List<@Nullable String>"
        );
        assert_eq!(erase_annotations(ty, true, false), "@NonNull java.util.List<String>");
        assert_eq!(erase_annotations(ty, true, true), ty);
    }

    #[test]
    fn erase_annotations_handles_arguments_and_positions() {
        assert_eq!(
            erase_annotations("@Size(min = 1, max = \"(\") String", false, false),
            "String"
        );
        assert_eq!(erase_annotations("java.util.@NonNull Map.Entry", false, false), "java.util.Map.Entry");
        assert_eq!(erase_annotations("String @NonNull []", false, false), "String[]");
        assert_eq!(
            erase_annotations("Map<String, @Nullable Foo>", false, false),
            "Map<String, Foo>"
        );
        assert_eq!(erase_annotations("@A @B String", false, false), "String");
    }

    #[test]
    fn unterminated_annotation_arguments_are_reported() {
        assert!(try_erase_annotations("@Size(min = 1 String", false, false).is_err());
    }

    #[test]
    fn strips_markers_but_keeps_wildcards() {
        assert_eq!(strip_nullability_markers("String?"), "String");
        assert_eq!(strip_nullability_markers("String!"), "String");
        assert_eq!(
            strip_nullability_markers("Set<? extends Number>"),
            "Set<? extends Number>"
        );
        assert_eq!(
            strip_nullability_markers("Map<String?, List<?>>?"),
            "Map<String, List<?>>"
        );
        assert_eq!(strip_nullability_markers("String[]?"), "String[]");
        assert_eq!(strip_nullability_markers("? super T"), "? super T");
    }

    #[test]
    fn keeps_markers_inside_annotation_strings() {
        assert_eq!(
            strip_nullability_markers(r#"@Foo("a\"b?") String?"#),
            r#"@Foo("a\"b?") String"#
        );
        assert_eq!(
            strip_nullability_markers("@Sep('\\'') @Tag(\"x!\") List<String!>"),
            "@Sep('\\'') @Tag(\"x!\") List<String>"
        );
    }

    #[test]
    fn reads_trailing_nullability() {
        assert_eq!(nullability("String?"), Nullability::Nullable);
        assert_eq!(nullability("List<String>!"), Nullability::Platform);
        assert_eq!(nullability("List<?>"), Nullability::NonNull);
        assert_eq!(nullability_suffix("int[]?"), Some('?'));
        assert_eq!(nullability_suffix("String"), None);
        assert_eq!(nullability("T...?"), Nullability::Nullable);
    }

    #[test]
    fn likely_type_parameters() {
        assert!(is_likely_type_parameter("T"));
        assert!(is_likely_type_parameter("T[]"));
        assert!(is_likely_type_parameter("_Key"));
        assert!(is_likely_type_parameter("E extends Enum<E>"));
        assert!(!is_likely_type_parameter("java.lang.String"));
        assert!(!is_likely_type_parameter("Map.Entry<K, V>"));
        assert!(!is_likely_type_parameter("int"));
        assert!(!is_likely_type_parameter(""));
        // Simple class names cannot be told apart from type parameters.
        assert!(is_likely_type_parameter("String"));
    }

    #[test]
    fn substitutes_bounded_type_variables() {
        let class = Declaration::new(
            "Box",
            TypeParameterList::parse("<T extends java.lang.Comparable<T>, U>").unwrap(),
        );
        assert_eq!(
            substitute_type_variable("T[]", Some(&class)),
            "java.lang.Comparable[]"
        );
        assert_eq!(substitute_type_variable("T...", Some(&class)), "java.lang.Comparable...");
        // No bounds: the variable stays.
        assert_eq!(substitute_type_variable("U", Some(&class)), "U");
        assert_eq!(substitute_type_variable("V", Some(&class)), "V");
        assert_eq!(substitute_type_variable("java.util.T", Some(&class)), "java.util.T");
        assert_eq!(substitute_type_variable("T", None), "T");
    }

    #[test]
    fn to_type_string_composes_in_order() {
        let method = Declaration::new(
            "sort",
            TypeParameterList::parse("<T extends Number>").unwrap(),
        );
        let ty = "@NonNull T[]?";
        // The leading annotation hides the variable from substitution.
        assert_eq!(
            to_type_string(ty, TypeStringOptions::ERASED, Some(&method)),
            "T[]"
        );
        assert_eq!(
            to_type_string("T[]?", TypeStringOptions::ERASED, Some(&method)),
            "Number[]"
        );
        assert_eq!(to_type_string(ty, TypeStringOptions::VERBATIM, None), ty);
        assert_eq!(
            to_type_string(
                "@A java.util.List<@B String>?",
                TypeStringOptions {
                    erased: true,
                    outer_annotations: true,
                    inner_annotations: true,
                    nullability_markers: true,
                },
                None,
            ),
            "@A java.util.List?"
        );
        assert_eq!(
            to_type_string("@A java.util.List<@B String>?", TypeStringOptions::default(), None),
            "java.util.List<String>"
        );
    }

    #[test]
    fn derived_facts() {
        assert!(is_primitive("int"));
        assert!(is_primitive("@IntRange(from = 0) int"));
        assert!(!is_primitive("int[]"));
        assert!(!is_primitive("java.lang.Integer"));
        assert_eq!(array_dimensions("String[][]"), 2);
        assert_eq!(array_dimensions("java.util.List<String[]>[]"), 1);
        assert_eq!(array_dimensions("String..."), 1);
        assert!(is_varargs("T...?"));
        assert!(!is_varargs("T[]"));
    }

    #[test]
    fn convert_type_replaces_whole_tokens_only() {
        let replacements = HashMap::from([
            ("T".to_string(), TypeString::from("java.lang.String")),
            ("K".to_string(), TypeString::from("Key")),
        ]);
        assert_eq!(
            convert_type("java.util.Map<K, java.util.List<T>>", &replacements),
            "java.util.Map<Key, java.util.List<java.lang.String>>"
        );
        assert_eq!(convert_type("TT", &replacements), "TT");
        assert_eq!(convert_type("@T K", &replacements), "@T Key");
    }
}
