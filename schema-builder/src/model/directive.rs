use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;

use crate::model::Field;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectiveLocation {
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectiveType {
    /// The metadata declaration this directive was created from. Built-in directives have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub locations: BTreeSet<DirectiveLocation>,

    pub repeatable: bool,

    pub arguments: Vec<Field>,
}

impl DirectiveType {
    pub fn is_allowed_on(&self, location: DirectiveLocation) -> bool {
        self.locations.contains(&location)
    }

    pub fn argument(&self, name: &str) -> Option<&Field> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// A directive applied to one schema element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectiveInstance {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    pub values: IndexMap<String, serde_json::Value>,
}

impl DirectiveInstance {
    pub fn new(directive_type: &DirectiveType) -> Self {
        Self {
            name: directive_type.name.clone(),
            class_name: directive_type.class_name.clone(),
            values: IndexMap::new(),
        }
    }

    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }
}

impl std::fmt::Display for DirectiveInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.values.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.values.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: {value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
