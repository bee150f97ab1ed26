//! Version-history resolution: merge per-release class inventories into one model where every
//! class, member and supertype carries the range of releases it was present in, then remove
//! what inheritance already implies.

#![forbid(unsafe_code)]

mod api;
mod class;
mod cleanup;
mod descriptor;
mod element;
mod error;
mod observation;
mod xml;

pub use crate::api::Api;
pub use crate::class::{ApiClass, HiddenUntil};
pub use crate::cleanup::{CleanupOptions, CleanupReport};
pub use crate::descriptor::{binary_to_internal, internal_to_source};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, MethodKey, MethodTypes, ReturnType};
pub use crate::element::{ApiElement, ApiVersion, VersionRange};
pub use crate::error::{ApiError, Result};
pub use crate::observation::{ClassObservation, MemberObservation, VersionBatch};
pub use crate::xml::ApiXml;
