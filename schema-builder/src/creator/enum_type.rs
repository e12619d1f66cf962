use tracing::debug;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::BuildContext;
use crate::creator::Creator;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::model::DirectiveLocation;
use crate::model::EnumType;
use crate::model::EnumValue;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;

pub(crate) struct EnumCreator;

impl Creator for EnumCreator {
    fn reference_type(&self) -> ReferenceType {
        ReferenceType::Enum
    }

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError> {
        debug!("Creating enum {} from {}", reference.name, class.name);
        let annotations = Annotations::for_class(class);
        let mut values = Vec::new();
        for value in &class.enum_values {
            let value_annotations = Annotations::for_enum_value(value);
            if value_annotations.contains(annotations::IGNORE) {
                continue;
            }
            values.push(EnumValue {
                value: value.name.clone(),
                description: helper::description(&value_annotations),
                directive_instances: ctx.directives.resolve(
                    &value_annotations,
                    DirectiveLocation::EnumValue,
                    &value.name,
                )?,
            });
        }

        Ok(SchemaNode::Enum(EnumType {
            class_name: class.name.clone(),
            name: reference.name.clone(),
            description: helper::description(&annotations),
            values,
            directive_instances: ctx.directives.resolve(
                &annotations,
                DirectiveLocation::Enum,
                &reference.name,
            )?,
        }))
    }
}
