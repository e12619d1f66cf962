use apollo_compiler::InvalidNameError;
use thiserror::Error;

use crate::link::LinkError;
use crate::link::spec::SpecError;

/// A fatal failure of schema generation. No partial schema is ever returned alongside one.
#[derive(Error, Debug, PartialEq)]
pub enum SchemaBuilderError {
    #[error("Could not find class {class_name} in the index (referenced as {kind} \"{name}\")")]
    UnresolvableReference {
        class_name: String,
        name: String,
        kind: crate::model::ReferenceType,
    },
    #[error("Unsupported type {signature} for {member}: {reason}")]
    UnsupportedMemberShape {
        member: String,
        signature: String,
        reason: String,
    },
    #[error("The @{directive} directive is not repeatable, but was used more than once on {element}")]
    NonRepeatableDirective { directive: String, element: String },
    #[error(
        "The @{directive} directive is not repeatable, but was used more than once in the GraphQL schema."
    )]
    NonRepeatableSchemaDirective { directive: String },
    #[error("Invalid directive {class_name}: {message}")]
    InvalidDirective { class_name: String, message: String },
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl From<InvalidNameError> for SchemaBuilderError {
    fn from(value: InvalidNameError) -> Self {
        LinkError::InvalidName(value).into()
    }
}

impl SchemaBuilderError {
    pub(crate) fn unsupported(
        member: impl Into<String>,
        signature: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SchemaBuilderError::UnsupportedMemberShape {
            member: member.into(),
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}
