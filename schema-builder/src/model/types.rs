use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;

use crate::model::DirectiveInstance;
use crate::model::Reference;
use crate::model::Wrapper;

/// A field, argument, or directive argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The accessor this field is read or written through, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,

    pub property_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub reference: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<Wrapper>,

    pub not_null: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

impl Field {
    pub fn new(
        property_name: impl Into<String>,
        name: impl Into<String>,
        reference: Reference,
    ) -> Self {
        Self {
            method_name: None,
            property_name: property_name.into(),
            name: name.into(),
            description: None,
            reference,
            wrapper: None,
            not_null: false,
            default_value: None,
            directive_instances: Vec::new(),
        }
    }

    /// The reference to the value type and, for maps, the references to the key types.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        std::iter::once(&self.reference).chain(self.wrapper.iter().flat_map(|w| w.keys()))
    }

    pub(crate) fn references_mut(&mut self) -> Vec<&mut Reference> {
        let mut references = vec![&mut self.reference];
        if let Some(wrapper) = self.wrapper.as_mut() {
            references.extend(wrapper.keys_mut());
        }
        references
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

/// An entry point (query, mutation or subscription), or a field backed by an API method on a
/// source type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The API class declaring the method.
    pub class_name: String,

    pub operation_type: OperationType,

    #[serde(flatten)]
    pub field: Field,

    pub arguments: Vec<Field>,

    /// For source fields, the type the field is added to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_field_on: Option<Reference>,
}

impl Operation {
    pub fn name(&self) -> &str {
        &self.field.name
    }
}

/// An output object type or an interface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub class_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub fields: IndexMap<String, Field>,

    /// Fields backed by API methods taking this type as their source.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub operations: IndexMap<String, Operation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

impl Type {
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            operations: IndexMap::new(),
            interfaces: Vec::new(),
            directive_instances: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputType {
    pub class_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub fields: IndexMap<String, Field>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnionType {
    pub class_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub members: Vec<Reference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub class_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub values: Vec<EnumValue>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum CustomScalarKind {
    String,
    Int,
    Float,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomScalarType {
    pub class_name: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub kind: CustomScalarKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directive_instances: Vec<DirectiveInstance>,
}

/// Maps an exception declaration to the error code reported for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub class_name: String,
    pub error_code: String,
}

/// A named namespace that operations can be organized under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
