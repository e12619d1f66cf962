use tracing::debug;

use crate::annotations::Annotations;
use crate::creator::BuildContext;
use crate::creator::Creator;
use crate::creator::Direction;
use crate::creator::bindings;
use crate::creator::field;
use crate::creator::interface::interface_references;
use crate::creator::operation::source_operations;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::model::DirectiveLocation;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;
use crate::model::Type;

/// Creates output object types from classes.
pub(crate) struct TypeCreator;

impl Creator for TypeCreator {
    fn reference_type(&self) -> ReferenceType {
        ReferenceType::Type
    }

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError> {
        debug!("Creating type {} from {}", reference.name, reference.canonical_name());
        let index = ctx.index;
        let annotations = Annotations::for_class(class);
        let bindings = bindings(class, reference);

        let mut node = Type::new(&class.name, &reference.name);
        node.description = helper::description(&annotations);
        for property in field::output_properties(index, class, true) {
            let field = field::create_field(
                ctx,
                Direction::Out,
                class,
                &property,
                &bindings,
                DirectiveLocation::FieldDefinition,
            )?;
            node.fields.insert(field.name.clone(), field);
        }
        node.operations = source_operations(ctx, class, reference)?;
        node.interfaces = interface_references(ctx, class)?;
        node.directive_instances =
            ctx.directives
                .resolve(&annotations, DirectiveLocation::Object, &reference.name)?;
        Ok(SchemaNode::Type(node))
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SymbolIndex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations;
    use crate::config::Config;
    use crate::index::AnnotationInstance;
    use crate::index::ClassKind;
    use crate::index::FieldInfo;
    use crate::index::Index;
    use crate::index::MethodInfo;
    use crate::index::TypeSignature;

    #[test]
    fn types_collect_fields_and_interfaces() {
        let index = Index::new([
            ClassInfo::new("com.example.Node")
                .of_kind(ClassKind::Interface)
                .method(MethodInfo::new("getId", TypeSignature::class("java.lang.String"))),
            ClassInfo::new("com.example.Tagged")
                .of_kind(ClassKind::Interface)
                .annotated(AnnotationInstance::new(annotations::UNION)),
            ClassInfo::new("com.example.Book")
                .implements("com.example.Node")
                .implements("com.example.Tagged")
                .implements("java.io.Serializable")
                .annotated(AnnotationInstance::new(annotations::DESCRIPTION).with_value("A book"))
                .field(FieldInfo::new("id", TypeSignature::class("java.lang.String")))
                .field(
                    FieldInfo::new("author", TypeSignature::class("com.example.Author"))
                        .annotated(AnnotationInstance::new(annotations::NON_NULL)),
                ),
        ]);
        let config = Config::default();
        let mut ctx = BuildContext::new(&index, &config);
        let book = index.class_by_name("com.example.Book").unwrap();
        let reference = Reference::new("com.example.Book", "Book", ReferenceType::Type);

        let SchemaNode::Type(node) = TypeCreator.create(&mut ctx, book, &reference).unwrap() else {
            panic!("expected an object type");
        };
        assert_eq!(node.description.as_deref(), Some("A book"));
        let fields: Vec<_> = node
            .fields
            .values()
            .map(|f| (f.name.as_str(), f.reference.name.as_str(), f.not_null))
            .collect();
        assert_eq!(fields, [("id", "String", false), ("author", "Author", true)]);
        let interfaces: Vec<_> = node.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(interfaces, ["Node"]);
        assert!(ctx.registry.has_pending());
    }
}
