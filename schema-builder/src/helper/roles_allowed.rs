use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde_json::Value;

use crate::annotations;
use crate::annotations::Annotations;
use crate::index::AnnotationValue;
use crate::model::DirectiveInstance;
use crate::model::DirectiveLocation;
use crate::model::DirectiveType;
use crate::model::Field;
use crate::model::Reference;

pub(crate) static ROLES_ALLOWED_DIRECTIVE_TYPE: LazyLock<DirectiveType> =
    LazyLock::new(|| DirectiveType {
        class_name: None,
        name: "rolesAllowed".to_string(),
        description: Some("Used to specify the role required to execute a given field or operation.".to_string()),
        locations: BTreeSet::from([DirectiveLocation::FieldDefinition]),
        repeatable: false,
        arguments: vec![Field::new(
            "value",
            "value",
            Reference::scalar("java.lang.String", "String"),
        )],
    });

/// The `@rolesAllowed` instance for a field or operation, with the roles joined by commas.
/// Metadata on the member wins over metadata on its declaring class.
pub(crate) fn roles_allowed_instance(
    member: &Annotations<'_>,
    declaring_class: &Annotations<'_>,
) -> Option<DirectiveInstance> {
    let roles = member
        .get(annotations::ROLES_ALLOWED)
        .or_else(|| declaring_class.get(annotations::ROLES_ALLOWED))?
        .value()?;
    let roles = match roles {
        AnnotationValue::Array(roles) => roles
            .iter()
            .filter_map(AnnotationValue::as_str)
            .collect::<Vec<_>>()
            .join(","),
        other => other.as_str()?.to_string(),
    };
    let mut instance = DirectiveInstance::new(&ROLES_ALLOWED_DIRECTIVE_TYPE);
    instance.values.insert("value".to_string(), Value::String(roles));
    Some(instance)
}
