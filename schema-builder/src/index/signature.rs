use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

/// Primitive value kinds. These are never null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
}

/// The declared type of a field, method return value or parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSignature {
    pub kind: TypeKind,

    /// Names of the metadata attached to this use of the type (for instance the items of a list
    /// can carry `NonNull`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    Primitive(Primitive),
    Class(String),
    Array(Box<TypeSignature>),
    Parameterized {
        name: String,
        arguments: Vec<TypeSignature>,
    },
    Variable(String),
    Wildcard,
}

impl TypeSignature {
    fn of(kind: TypeKind) -> Self {
        Self {
            kind,
            annotations: Vec::new(),
        }
    }

    pub fn void() -> Self {
        Self::of(TypeKind::Void)
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::of(TypeKind::Primitive(primitive))
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::of(TypeKind::Class(name.into()))
    }

    pub fn array(component: TypeSignature) -> Self {
        Self::of(TypeKind::Array(Box::new(component)))
    }

    pub fn parameterized(name: impl Into<String>, arguments: Vec<TypeSignature>) -> Self {
        Self::of(TypeKind::Parameterized {
            name: name.into(),
            arguments,
        })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::of(TypeKind::Variable(name.into()))
    }

    pub fn wildcard() -> Self {
        Self::of(TypeKind::Wildcard)
    }

    /// Attaches a type-use annotation.
    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    /// The name of the declared class, if this signature names one.
    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Class(name) | TypeKind::Parameterized { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Void => f.write_str("void"),
            TypeKind::Primitive(p) => write!(f, "{p}"),
            TypeKind::Class(name) => f.write_str(name),
            TypeKind::Array(component) => write!(f, "{component}[]"),
            TypeKind::Parameterized { name, arguments } => {
                write!(f, "{name}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")
            }
            TypeKind::Variable(name) => f.write_str(name),
            TypeKind::Wildcard => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_display_as_canonical_names() {
        let page = TypeSignature::parameterized(
            "com.example.Page",
            vec![TypeSignature::class("com.example.Book")],
        );
        assert_eq!(page.to_string(), "com.example.Page<com.example.Book>");
        assert_eq!(
            TypeSignature::array(TypeSignature::primitive(Primitive::Int)).to_string(),
            "int[]"
        );
    }
}
