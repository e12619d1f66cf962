use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

use crate::index::TypeSignature;

/// The kind of schema node a [`Reference`] points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceType {
    Scalar,
    Input,
    Type,
    Interface,
    Union,
    Enum,
}

impl ReferenceType {
    /// The kinds materialized by the closure loop, in processing order.
    pub const CLOSED: [ReferenceType; 5] = [
        ReferenceType::Input,
        ReferenceType::Type,
        ReferenceType::Interface,
        ReferenceType::Union,
        ReferenceType::Enum,
    ];
}

/// A handle to a named type that may or may not be materialized yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// The declaration this reference was created from.
    pub class_name: String,

    /// The name in the schema.
    pub name: String,

    pub reference_type: ReferenceType,

    /// Arguments bound to the type parameters of `class_name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeSignature>,
}

impl Reference {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        reference_type: ReferenceType,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            reference_type,
            type_arguments: Vec::new(),
        }
    }

    pub fn scalar(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(class_name, name, ReferenceType::Scalar)
    }

    /// The unique key of the referenced declaration, including bound type arguments.
    pub fn canonical_name(&self) -> String {
        if self.type_arguments.is_empty() {
            return self.class_name.clone();
        }
        TypeSignature::parameterized(self.class_name.clone(), self.type_arguments.clone())
            .to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WrapperType {
    Collection,
    Array,
    Map,
}

/// Collection metadata around a field's value type, outermost first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapper {
    pub wrapper_type: WrapperType,

    pub not_null_item: bool,

    /// For maps, the reference to the key type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<Reference>>,

    /// The wrapper of the items, for nested collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<Box<Wrapper>>,
}

impl Wrapper {
    pub fn depth(&self) -> usize {
        1 + self.wrapper.as_ref().map_or(0, |w| w.depth())
    }

    /// Every key reference in this wrapper chain.
    pub fn keys(&self) -> impl Iterator<Item = &Reference> {
        let mut keys = Vec::new();
        let mut current = Some(self);
        while let Some(wrapper) = current {
            keys.extend(wrapper.key.as_deref());
            current = wrapper.wrapper.as_deref();
        }
        keys.into_iter()
    }

    pub(crate) fn keys_mut(&mut self) -> Vec<&mut Reference> {
        let mut keys = Vec::new();
        let mut current = Some(self);
        while let Some(wrapper) = current {
            if let Some(key) = wrapper.key.as_deref_mut() {
                keys.push(key);
            }
            current = wrapper.wrapper.as_deref_mut();
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_includes_type_arguments() {
        let mut reference = Reference::new("app.Page", "Page_Book", ReferenceType::Type);
        assert_eq!(reference.canonical_name(), "app.Page");
        reference.type_arguments = vec![TypeSignature::class("app.Book")];
        assert_eq!(reference.canonical_name(), "app.Page<app.Book>");
    }
}
