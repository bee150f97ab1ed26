//! Java type strings as they appear in API signature files, and the text-level operations over
//! them: generic erasure, annotation stripping, nullability markers and type-variable
//! substitution.

#![forbid(unsafe_code)]

mod error;
mod item;
mod resolver;
mod type_string;

pub use crate::error::TypeError;
pub use crate::item::{ClassLookup, TypeItem};
pub use crate::resolver::{
    Declaration, TypeParameter, TypeParameterList, TypeParameterOwner, TypeVariableResolver,
};
pub use crate::type_string::{
    annotation_spans, array_dimensions, convert_type, erase_annotations, erase_type_arguments,
    is_likely_type_parameter, is_primitive, is_varargs, nullability, nullability_suffix,
    strip_nullability_markers, substitute_type_variable, to_type_string, try_erase_annotations,
    try_erase_type_arguments, type_arguments_span, AnnotationSpan, Nullability, TypeString,
    TypeStringOptions, JAVA_LANG_OBJECT, JAVA_LANG_PREFIX, JAVA_LANG_STRING,
};
