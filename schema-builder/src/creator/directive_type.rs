use std::collections::BTreeSet;

use tracing::debug;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Direction;
use crate::creator::field::populate_field;
use crate::error::SchemaBuilderError;
use crate::helper::naming;
use crate::index::AnnotationShape;
use crate::index::AnnotationValue;
use crate::index::ClassInfo;
use crate::index::ClassKind;
use crate::index::TypeSignature;
use crate::model::DirectiveLocation;
use crate::model::DirectiveType;
use crate::model::Field;

/// Creates the directive type declared by the metadata declaration `class`.
///
/// Each member of the declaration becomes an argument. Members of declarations shaped as
/// [`AnnotationShape::NestedStringGroups`] are typed `[[String!]!]!` whatever they declare.
pub(crate) fn create_directive_type(
    ctx: &mut BuildContext<'_>,
    class: &ClassInfo,
) -> Result<DirectiveType, SchemaBuilderError> {
    debug!("Creating directive from {}", class.name);
    let annotations = Annotations::for_class(class);
    let locations = locations(class)?;
    let nested_string_groups = matches!(
        class.kind,
        ClassKind::Annotation(AnnotationShape::NestedStringGroups)
    );

    let mut arguments = Vec::new();
    for method in class.methods.iter().filter(|m| !m.is_static && !m.is_synthetic) {
        let signature = if nested_string_groups {
            nested_string_groups_signature()
        } else {
            method.return_type.clone()
        };
        let member_annotations = Annotations::for_method(method);
        let (reference, wrapper) = ctx.create_reference(
            Direction::In,
            &signature,
            &member_annotations,
            &Bindings::new(),
            &format!("{}.{}", class.name, method.name),
        )?;
        let mut argument = Field::new(
            &method.name,
            naming::field_name(&member_annotations, &method.name),
            reference,
        );
        argument.wrapper = wrapper;
        populate_field(
            ctx,
            &mut argument,
            &signature,
            &member_annotations,
            DirectiveLocation::ArgumentDefinition,
        )?;
        argument.not_null |= nested_string_groups;
        arguments.push(argument);
    }

    Ok(DirectiveType {
        class_name: Some(class.name.clone()),
        name: naming::directive_name(class, ctx.config),
        description: crate::helper::description(&annotations),
        locations,
        repeatable: class.has_annotation(annotations::REPEATABLE),
        arguments,
    })
}

fn locations(class: &ClassInfo) -> Result<BTreeSet<DirectiveLocation>, SchemaBuilderError> {
    let invalid = |message: String| SchemaBuilderError::InvalidDirective {
        class_name: class.name.clone(),
        message,
    };
    let on = class
        .annotation(annotations::DIRECTIVE)
        .and_then(|directive| directive.member("on"));
    let values = match on {
        Some(AnnotationValue::Array(values)) => values.as_slice(),
        Some(value) => std::slice::from_ref(value),
        None => &[],
    };
    if values.is_empty() {
        return Err(invalid("declares no locations".to_string()));
    }
    values
        .iter()
        .map(|value| {
            let location = value
                .as_str()
                .ok_or_else(|| invalid("locations must be enum constants".to_string()))?;
            location
                .parse()
                .map_err(|_| invalid(format!("unknown location {location}")))
        })
        .collect()
}

/// `String[][]` where neither the groups nor the strings can be null.
fn nested_string_groups_signature() -> TypeSignature {
    let string = TypeSignature::class("java.lang.String").annotated(annotations::NON_NULL);
    TypeSignature::array(TypeSignature::array(string).annotated(annotations::NON_NULL))
}
