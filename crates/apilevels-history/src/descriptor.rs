//! JVM descriptors as they appear in member keys (`append(Ljava/lang/String;)Ljava/lang/StringBuilder;`).

use std::fmt;

use apilevels_types::TypeString;

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/util/Map$Entry`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// The Java source form: `[Ljava/util/Map$Entry;` becomes `java.util.Map.Entry[]`.
    pub fn to_type_string(&self) -> TypeString {
        TypeString::new(self.java_name())
    }

    fn java_name(&self) -> String {
        match self {
            FieldType::Base(base) => base.java_name().to_owned(),
            FieldType::Object(name) => internal_to_source(name),
            FieldType::Array(component) => format!("{}[]", component.java_name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

impl ReturnType {
    pub fn to_type_string(&self) -> TypeString {
        match self {
            ReturnType::Void => TypeString::new("void"),
            ReturnType::Type(ty) => ty.to_type_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

/// Parameter and return types of a method, rendered as Java type strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTypes {
    pub parameters: Vec<TypeString>,
    pub return_type: TypeString,
}

/// A method key split into its name and parsed descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodKey {
    name: String,
    descriptor: MethodDescriptor,
}

impl MethodKey {
    pub fn parse(key: &str) -> Result<Self> {
        let open = key
            .find('(')
            .filter(|&open| open > 0)
            .ok_or_else(|| ApiError::InvalidDescriptor(key.to_owned()))?;
        let descriptor = parse_method_descriptor(&key[open..])?;
        Ok(Self {
            name: key[..open].to_owned(),
            descriptor,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.descriptor
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn types(&self) -> MethodTypes {
        MethodTypes {
            parameters: self
                .descriptor
                .params
                .iter()
                .map(FieldType::to_type_string)
                .collect(),
            return_type: self.descriptor.return_type.to_type_string(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for param in &self.descriptor.params {
            write_descriptor(f, param)?;
        }
        f.write_str(")")?;
        match &self.descriptor.return_type {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Type(ty) => write_descriptor(f, ty),
        }
    }
}

fn write_descriptor(f: &mut fmt::Formatter<'_>, ty: &FieldType) -> fmt::Result {
    match ty {
        FieldType::Base(base) => {
            let code = match base {
                BaseType::Byte => 'B',
                BaseType::Char => 'C',
                BaseType::Double => 'D',
                BaseType::Float => 'F',
                BaseType::Int => 'I',
                BaseType::Long => 'J',
                BaseType::Short => 'S',
                BaseType::Boolean => 'Z',
            };
            write!(f, "{code}")
        }
        FieldType::Object(name) => write!(f, "L{name};"),
        FieldType::Array(component) => {
            f.write_str("[")?;
            write_descriptor(f, component)
        }
    }
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(ApiError::InvalidDescriptor(desc.to_owned()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || ApiError::InvalidDescriptor(desc.to_owned());

    let mut rest = desc.strip_prefix('(').ok_or_else(invalid)?;
    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(invalid());
        }
        let (param, after) = parse_field_type(rest).map_err(|_| invalid())?;
        params.push(param);
        rest = after;
    }

    let return_type = match rest {
        "V" => ReturnType::Void,
        "" => return Err(invalid()),
        _ => ReturnType::Type(parse_field_descriptor(rest).map_err(|_| invalid())?),
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Result<(FieldType, &str)> {
    let invalid = || ApiError::InvalidDescriptor(input.to_owned());
    let mut chars = input.chars();
    let tag = chars.next().ok_or_else(invalid)?;
    let rest = chars.as_str();
    let base = match tag {
        'B' => BaseType::Byte,
        'C' => BaseType::Char,
        'D' => BaseType::Double,
        'F' => BaseType::Float,
        'I' => BaseType::Int,
        'J' => BaseType::Long,
        'S' => BaseType::Short,
        'Z' => BaseType::Boolean,
        'L' => {
            let (name, rest) = rest.split_once(';').ok_or_else(invalid)?;
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok((FieldType::Object(name.to_owned()), rest));
        }
        '[' => {
            let (component, rest) = parse_field_type(rest)?;
            return Ok((FieldType::Array(Box::new(component)), rest));
        }
        _ => return Err(invalid()),
    };
    Ok((FieldType::Base(base), rest))
}

/// `java/util/Map$Entry` → `java.util.Map.Entry`.
pub fn internal_to_source(internal: &str) -> String {
    internal.replace(['/', '$'], ".")
}

/// `java.util.Map$Entry` → `java/util/Map$Entry`.
pub fn binary_to_internal(binary: &str) -> String {
    binary.replace('.', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_descriptor_primitives_and_arrays() {
        assert_eq!(parse_field_descriptor("I").unwrap(), FieldType::Base(BaseType::Int));
        assert_eq!(
            parse_field_descriptor("[[Ljava/lang/String;").unwrap(),
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Object(
                "java/lang/String".to_string()
            )))))
        );
        assert!(parse_field_descriptor("Ljava/lang/String").is_err());
        assert!(parse_field_descriptor("IJ").is_err());
    }

    #[test]
    fn parse_method_descriptor_basic() {
        let desc = parse_method_descriptor("(ILjava/lang/String;)[I").unwrap();
        assert_eq!(
            desc.params,
            vec![
                FieldType::Base(BaseType::Int),
                FieldType::Object("java/lang/String".to_string())
            ]
        );
        assert_eq!(
            desc.return_type,
            ReturnType::Type(FieldType::Array(Box::new(FieldType::Base(BaseType::Int))))
        );
        assert!(parse_method_descriptor("(I").is_err());
        assert!(parse_method_descriptor("()").is_err());
        assert!(parse_method_descriptor("()VV").is_err());
    }

    #[test]
    fn method_key_renders_java_types() {
        let key = MethodKey::parse("put(Ljava/lang/Object;[Ljava/util/Map$Entry;)Z").unwrap();
        assert_eq!(key.name(), "put");
        assert!(!key.is_constructor());
        assert_eq!(
            key.types(),
            MethodTypes {
                parameters: vec![
                    TypeString::from("java.lang.Object"),
                    TypeString::from("java.util.Map.Entry[]"),
                ],
                return_type: TypeString::from("boolean"),
            }
        );
        assert_eq!(
            key.to_string(),
            "put(Ljava/lang/Object;[Ljava/util/Map$Entry;)Z"
        );
    }

    #[test]
    fn method_key_requires_a_name_and_descriptor() {
        assert!(MethodKey::parse("<init>()V").unwrap().is_constructor());
        assert!(MethodKey::parse("()V").is_err());
        assert!(MethodKey::parse("field").is_err());
    }
}
