use tracing::warn;

use crate::annotations::Annotations;
use crate::creator::BuildContext;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::index::local_name;
use crate::model::CustomScalarKind;
use crate::model::CustomScalarType;
use crate::model::DirectiveLocation;

/// Creates the custom scalar `name` implemented by `class`.
///
/// The kind follows from the marker interface the class implements: `CustomStringScalar`,
/// `CustomIntScalar` or `CustomFloatScalar`.
pub(crate) fn create_custom_scalar(
    ctx: &BuildContext<'_>,
    class: &ClassInfo,
    name: &str,
) -> Result<CustomScalarType, SchemaBuilderError> {
    let annotations = Annotations::for_class(class);
    let kind = ctx
        .index
        .superclass_chain(class)
        .into_iter()
        .flat_map(|c| c.interfaces.iter())
        .find_map(|interface| match local_name(interface) {
            "CustomStringScalar" => Some(CustomScalarKind::String),
            "CustomIntScalar" => Some(CustomScalarKind::Int),
            "CustomFloatScalar" => Some(CustomScalarKind::Float),
            _ => None,
        });
    let kind = kind.unwrap_or_else(|| {
        warn!(
            "Custom scalar {name} ({}) implements none of the custom scalar interfaces, treating it as a String scalar",
            class.name
        );
        CustomScalarKind::String
    });

    Ok(CustomScalarType {
        class_name: class.name.clone(),
        name: name.to_string(),
        description: helper::description(&annotations),
        kind,
        directive_instances: ctx
            .directives
            .resolve(&annotations, DirectiveLocation::Scalar, name)?,
    })
}
