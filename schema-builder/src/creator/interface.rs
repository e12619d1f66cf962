use indexmap::IndexSet;
use tracing::debug;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Creator;
use crate::creator::Direction;
use crate::creator::bindings;
use crate::creator::field;
use crate::creator::operation::source_operations;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::index::ClassKind;
use crate::index::TypeSignature;
use crate::model::DirectiveLocation;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;
use crate::model::Type;

/// Creates interfaces from interface declarations, and reserves every known implementor so
/// that the schema can resolve them.
pub(crate) struct InterfaceCreator;

impl Creator for InterfaceCreator {
    fn reference_type(&self) -> ReferenceType {
        ReferenceType::Interface
    }

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError> {
        debug!("Creating interface {} from {}", reference.name, class.name);
        let index = ctx.index;
        let annotations = Annotations::for_class(class);
        let bindings = bindings(class, reference);

        let mut node = Type::new(&class.name, &reference.name);
        node.description = helper::description(&annotations);
        for property in field::output_properties(index, class, false) {
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
                .resolve(&annotations, DirectiveLocation::Interface, &reference.name)?;

        for implementor in index.known_implementors(&class.name) {
            if !implementor.type_parameters.is_empty()
                || implementor.has_annotation(annotations::IGNORE)
            {
                continue;
            }
            let member = format!("implementor of {}", class.name);
            ctx.create_reference(
                Direction::Out,
                &TypeSignature::class(&implementor.name),
                &Annotations::default(),
                &Bindings::new(),
                &member,
            )?;
        }
        Ok(SchemaNode::Interface(node))
    }
}

/// References to the interfaces `class` implements, directly or through its superclasses.
///
/// Only indexed interface declarations count: unions and ignored interfaces are skipped.
pub(crate) fn interface_references(
    ctx: &mut BuildContext<'_>,
    class: &ClassInfo,
) -> Result<Vec<Reference>, SchemaBuilderError> {
    let index = ctx.index;
    let names: IndexSet<&str> = index
        .superclass_chain(class)
        .into_iter()
        .flat_map(|c| c.interfaces.iter().map(String::as_str))
        .collect();

    let mut references = Vec::new();
    for name in names {
        let Some(interface) = index.class_by_name(name) else {
            continue;
        };
        if interface.kind != ClassKind::Interface
            || interface.has_annotation(annotations::UNION)
            || interface.has_annotation(annotations::IGNORE)
        {
            continue;
        }
        let member = format!("{} implements {name}", class.name);
        let (reference, _) = ctx.create_reference(
            Direction::Out,
            &TypeSignature::class(name),
            &Annotations::default(),
            &Bindings::new(),
            &member,
        )?;
        references.push(reference);
    }
    Ok(references)
}
