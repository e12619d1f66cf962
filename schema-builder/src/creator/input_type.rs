use tracing::debug;

use crate::annotations::Annotations;
use crate::creator::BuildContext;
use crate::creator::Creator;
use crate::creator::Direction;
use crate::creator::bindings;
use crate::creator::field;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::model::DirectiveLocation;
use crate::model::InputType;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;

/// Creates input types from classes used as arguments, through their fields and setters.
pub(crate) struct InputTypeCreator;

impl Creator for InputTypeCreator {
    fn reference_type(&self) -> ReferenceType {
        ReferenceType::Input
    }

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError> {
        debug!("Creating input {} from {}", reference.name, reference.canonical_name());
        let index = ctx.index;
        let annotations = Annotations::for_class(class);
        let bindings = bindings(class, reference);

        let mut fields = indexmap::IndexMap::new();
        for property in field::input_properties(index, class) {
            let field = field::create_field(
                ctx,
                Direction::In,
                class,
                &property,
                &bindings,
                DirectiveLocation::InputFieldDefinition,
            )?;
            fields.insert(field.name.clone(), field);
        }

        Ok(SchemaNode::Input(InputType {
            class_name: class.name.clone(),
            name: reference.name.clone(),
            description: helper::description(&annotations),
            fields,
            directive_instances: ctx.directives.resolve(
                &annotations,
                DirectiveLocation::InputObject,
                &reference.name,
            )?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SymbolIndex;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations;
    use crate::config::Config;
    use crate::index::AnnotationInstance;
    use crate::index::FieldInfo;
    use crate::index::Index;
    use crate::index::TypeSignature;

    #[test]
    fn input_fields_carry_defaults_and_constraints() {
        let index = Index::new([ClassInfo::new("com.example.Page")
            .type_parameter("T")
            .field(FieldInfo::new("item", TypeSignature::variable("T")))
            .field(
                FieldInfo::new("title", TypeSignature::class("java.lang.String"))
                    .annotated(AnnotationInstance::new(annotations::NOT_BLANK))
                    .annotated(AnnotationInstance::new(annotations::DEFAULT_VALUE).with_value("Untitled")),
            )]);
        let config = Config::default();
        let mut ctx = BuildContext::new(&index, &config);
        let class = index.class_by_name("com.example.Page").unwrap();
        let mut reference = Reference::new(&class.name, "Page_BookInput", ReferenceType::Input);
        reference.type_arguments = vec![TypeSignature::class("com.example.Book")];

        let SchemaNode::Input(node) = InputTypeCreator.create(&mut ctx, class, &reference).unwrap()
        else {
            panic!("expected an input type");
        };
        assert_eq!(node.fields["item"].reference.name, "BookInput");
        let title = &node.fields["title"];
        assert_eq!(title.default_value.as_deref(), Some("Untitled"));
        assert_snapshot!(title.directive_instances[0].to_string(), @"@constraint(minLength: 1)");
    }
}
