//! The api-versions XML format (`<api version="2">`).
//!
//! Every element carries its attributes relative to its parent: `since` only when later than
//! the parent's, `removed` (one past the last release the element was seen in) only when
//! earlier than the parent's. `deprecated` is written whenever set.

use std::fmt;
use std::io;

use crate::api::Api;
use crate::class::ApiClass;
use crate::element::{ApiElement, ApiVersion, VersionRange};
use crate::error::{ApiError, Result};

const SCHEMA_VERSION: &str = "2";

/// Displays an [`Api`] as api-versions XML.
pub struct ApiXml<'a> {
    api: &'a Api,
}

impl Api {
    pub fn xml(&self) -> ApiXml<'_> {
        ApiXml { api: self }
    }

    pub fn to_xml_string(&self) -> String {
        self.xml().to_string()
    }

    pub fn write_xml<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.xml())
    }

    /// Read an api-versions document back. `max` is the last release the document covers;
    /// elements without `removed` are taken to be present through it.
    pub fn from_xml(text: &str, max: ApiVersion) -> Result<Api> {
        let doc = roxmltree::Document::parse(text)
            .map_err(|err| ApiError::InvalidXml(err.to_string()))?;
        let root = doc.root_element();
        if !root.has_tag_name("api") {
            return Err(ApiError::InvalidXml(format!(
                "expected <api> root element, found <{}>",
                root.tag_name().name()
            )));
        }
        match root.attribute("version") {
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(ApiError::InvalidXml(format!(
                    "unsupported schema version `{other}`"
                )))
            }
            None => return Err(ApiError::InvalidXml("missing schema version".to_owned())),
        }

        let min = version_attribute(&root, "min")?.unwrap_or(1);
        let mut api = Api::new(min, max);
        let root_range = VersionRange::with_bounds(min, api.max(), None);

        for node in root.children().filter(|n| n.is_element()) {
            if !node.has_tag_name("class") {
                return Err(unexpected_element(&node));
            }
            let range = read_range(&node, &root_range)?;
            let mut class = ApiClass::with_range(name_attribute(&node)?, range);
            class.mark_visible_since(range.since());

            for child in node.children().filter(|n| n.is_element()) {
                let element =
                    ApiElement::with_range(name_attribute(&child)?, read_range(&child, &range)?);
                match child.tag_name().name() {
                    "extends" => class.insert_super_class(element),
                    "implements" => class.insert_interface(element),
                    "method" => class.insert_method(element),
                    "field" => class.insert_field(element),
                    _ => return Err(unexpected_element(&child)),
                }
            }
            api.insert_class(class);
        }
        Ok(api)
    }
}

impl fmt::Display for ApiXml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api = self.api;
        write!(f, "<api version=\"{SCHEMA_VERSION}\"")?;
        if api.min() > 1 {
            write!(f, " min=\"{}\"", api.min())?;
        }
        writeln!(f, ">")?;

        let root = VersionRange::with_bounds(api.min(), api.max(), None);
        for class in api.classes().filter(|class| !class.is_always_hidden()) {
            write_open(f, "\t", "class", class.element(), &root)?;
            writeln!(f, ">")?;
            let parent = class.range();
            for element in class.super_classes() {
                write_leaf(f, "extends", element, parent)?;
            }
            for element in class.interfaces() {
                write_leaf(f, "implements", element, parent)?;
            }
            for element in class.methods() {
                write_leaf(f, "method", element, parent)?;
            }
            for element in class.fields() {
                write_leaf(f, "field", element, parent)?;
            }
            writeln!(f, "\t</class>")?;
        }
        writeln!(f, "</api>")
    }
}

fn write_open(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    tag: &str,
    element: &ApiElement,
    parent: &VersionRange,
) -> fmt::Result {
    write!(f, "{indent}<{tag} name=\"{}\"", Escaped(element.name()))?;
    if element.since() > parent.since() {
        write!(f, " since=\"{}\"", element.since())?;
    }
    if let Some(deprecated) = element.deprecated_in() {
        write!(f, " deprecated=\"{deprecated}\"")?;
    }
    if element.last_present_in() < parent.last_present_in() {
        write!(f, " removed=\"{}\"", element.last_present_in() + 1)?;
    }
    Ok(())
}

fn write_leaf(
    f: &mut fmt::Formatter<'_>,
    tag: &str,
    element: &ApiElement,
    parent: &VersionRange,
) -> fmt::Result {
    write_open(f, "\t\t", tag, element, parent)?;
    writeln!(f, "/>")
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&apos;")?,
                c => write!(f, "{c}")?,
            }
        }
        Ok(())
    }
}

fn unexpected_element(node: &roxmltree::Node<'_, '_>) -> ApiError {
    ApiError::InvalidXml(format!("unexpected element <{}>", node.tag_name().name()))
}

fn name_attribute<'a>(node: &roxmltree::Node<'a, '_>) -> Result<&'a str> {
    node.attribute("name").ok_or_else(|| {
        ApiError::InvalidXml(format!(
            "<{}> element without a name",
            node.tag_name().name()
        ))
    })
}

fn version_attribute(node: &roxmltree::Node<'_, '_>, name: &str) -> Result<Option<ApiVersion>> {
    node.attribute(name)
        .map(|value| {
            value.trim().parse::<ApiVersion>().map_err(|_| {
                ApiError::InvalidXml(format!("invalid `{name}` attribute `{value}`"))
            })
        })
        .transpose()
}

fn read_range(node: &roxmltree::Node<'_, '_>, parent: &VersionRange) -> Result<VersionRange> {
    let since = version_attribute(node, "since")?.unwrap_or(parent.since());
    let deprecated_in = version_attribute(node, "deprecated")?;
    let last_present_in = match version_attribute(node, "removed")? {
        Some(removed) => removed.checked_sub(1).ok_or_else(|| {
            ApiError::InvalidXml("`removed` attribute must be at least 1".to_owned())
        })?,
        None => parent.last_present_in(),
    };
    Ok(VersionRange::with_bounds(since, last_present_in, deprecated_in))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attribute_values() {
        assert_eq!(
            Escaped("<init>(Ljava/lang/String;)V").to_string(),
            "&lt;init&gt;(Ljava/lang/String;)V"
        );
    }

    #[test]
    fn empty_api_prints_min_only_above_one() {
        assert_eq!(
            Api::new(1, 3).to_xml_string(),
            "<api version=\"2\">\n</api>\n"
        );
        assert_eq!(
            Api::new(4, 9).to_xml_string(),
            "<api version=\"2\" min=\"4\">\n</api>\n"
        );
    }

    #[test]
    fn rejects_foreign_documents() {
        assert!(matches!(
            Api::from_xml("<apis version=\"2\"/>", 3),
            Err(ApiError::InvalidXml(_))
        ));
        assert!(matches!(
            Api::from_xml("<api version=\"3\"/>", 3),
            Err(ApiError::InvalidXml(_))
        ));
        assert!(matches!(
            Api::from_xml("<api version=\"2\"><class name=\"a\" since=\"x\"/></api>", 3),
            Err(ApiError::InvalidXml(_))
        ));
        assert!(matches!(Api::from_xml("<api", 3), Err(ApiError::InvalidXml(_))));
    }
}
