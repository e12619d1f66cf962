//! Operations: root queries, mutations and subscriptions, and source fields added to the type
//! of their source parameter.
use indexmap::IndexMap;
use tracing::debug;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Direction;
use crate::creator::argument::create_argument;
use crate::creator::field::populate_field;
use crate::creator::reference::is_collection;
use crate::error::SchemaBuilderError;
use crate::helper::naming;
use crate::helper::roles_allowed;
use crate::index::AnnotationTarget;
use crate::index::ClassInfo;
use crate::index::MethodInfo;
use crate::index::TypeKind;
use crate::index::TypeSignature;
use crate::model::DirectiveLocation;
use crate::model::Field;
use crate::model::Operation;
use crate::model::OperationType;
use crate::model::Reference;

/// The source parameter of a source operation and the type the operation is added to.
pub(crate) struct Source {
    pub(crate) position: usize,
    pub(crate) on: Reference,
}

/// Creates the operation for `method` of the API class `class`.
///
/// For a source operation, the source parameter is not an argument. When the source parameter is
/// a collection the method resolves a batch, and its return type loses one list level.
pub(crate) fn create_operation(
    ctx: &mut BuildContext<'_>,
    class: &ClassInfo,
    method: &MethodInfo,
    operation_type: OperationType,
    source: Option<Source>,
) -> Result<Operation, SchemaBuilderError> {
    let member = format!("{}.{}", class.name, method.name);
    let annotations = Annotations::for_method(method);
    let (reference, mut wrapper) = ctx.create_reference(
        Direction::Out,
        &method.return_type,
        &annotations,
        &Bindings::new(),
        &member,
    )?;

    let batch = source
        .as_ref()
        .and_then(|source| method.parameters.get(source.position))
        .is_some_and(|parameter| is_collection(&parameter.signature));
    if batch {
        wrapper = wrapper.and_then(|wrapper| wrapper.wrapper.map(|inner| *inner));
    }

    let mut field = Field::new(
        &method.name,
        naming::operation_name(method, &annotations, operation_type),
        reference,
    );
    field.method_name = Some(method.name.clone());
    field.wrapper = wrapper;
    populate_field(
        ctx,
        &mut field,
        &method.return_type,
        &annotations,
        DirectiveLocation::FieldDefinition,
    )?;
    field.directive_instances.extend(roles_allowed::roles_allowed_instance(
        &annotations,
        &Annotations::for_class(class),
    ));

    let source_position = source.as_ref().map(|source| source.position);
    let mut arguments = Vec::new();
    for (position, parameter) in method.parameters.iter().enumerate() {
        if Some(position) != source_position {
            arguments.push(create_argument(ctx, class, method, parameter)?);
        }
    }

    Ok(Operation {
        class_name: class.name.clone(),
        operation_type,
        field,
        arguments,
        source_field_on: source.map(|source| source.on),
    })
}

/// The source operations adding fields to the type `reference` of `class`.
pub(crate) fn source_operations(
    ctx: &mut BuildContext<'_>,
    class: &ClassInfo,
    reference: &Reference,
) -> Result<IndexMap<String, Operation>, SchemaBuilderError> {
    let index = ctx.index;
    let mut operations = IndexMap::new();
    for annotated in index.annotations(annotations::SOURCE) {
        let AnnotationTarget::Parameter(api, method, position) = annotated.target else {
            continue;
        };
        let Some(parameter) = method.parameters.get(position) else {
            continue;
        };
        if source_class_name(&parameter.signature) != Some(class.name.as_str()) {
            continue;
        }
        let source = Source {
            position,
            on: reference.clone(),
        };
        let operation = create_operation(ctx, api, method, OperationType::Query, Some(source))?;
        debug!(
            "Adding source field {} to {}",
            operation.name(),
            reference.name
        );
        operations.insert(operation.name().to_string(), operation);
    }
    Ok(operations)
}

/// The class of a source parameter, looking through arrays and collections.
fn source_class_name(signature: &TypeSignature) -> Option<&str> {
    match &signature.kind {
        TypeKind::Array(item) => source_class_name(item),
        TypeKind::Parameterized { arguments, .. } if is_collection(signature) => {
            arguments.first().and_then(source_class_name)
        }
        TypeKind::Class(name) | TypeKind::Parameterized { name, .. } => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SymbolIndex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::index::AnnotationInstance;
    use crate::index::ClassKind;
    use crate::index::Index;
    use crate::index::ParameterInfo;
    use crate::index::Primitive;
    use crate::model::ReferenceType;

    fn list_of(class: &str) -> TypeSignature {
        TypeSignature::parameterized("java.util.List", vec![TypeSignature::class(class)])
    }

    fn index() -> Index {
        Index::new([
            ClassInfo::new("com.example.Book"),
            ClassInfo::new("com.example.Genre").of_kind(ClassKind::Enum),
            ClassInfo::new("com.example.BookApi")
                .annotated(AnnotationInstance::new(annotations::GRAPHQL_API))
                .annotated(
                    AnnotationInstance::new(annotations::ROLES_ALLOWED).with_value(vec!["reader"]),
                )
                .method(
                    MethodInfo::new("getBooks", list_of("com.example.Book"))
                        .annotated(AnnotationInstance::new(annotations::QUERY))
                        .parameter(
                            ParameterInfo::new("genre", TypeSignature::class("com.example.Genre"))
                                .annotated(AnnotationInstance::new(annotations::NAME).with_value("kind")),
                        )
                        .parameter(ParameterInfo::new("limit", TypeSignature::primitive(Primitive::Int))),
                )
                .method(
                    MethodInfo::new("rating", TypeSignature::primitive(Primitive::Int)).parameter(
                        ParameterInfo::new("book", TypeSignature::class("com.example.Book"))
                            .annotated(AnnotationInstance::new(annotations::SOURCE)),
                    ),
                )
                .method(
                    MethodInfo::new(
                        "ratings",
                        list_of("java.lang.Integer"),
                    )
                    .parameter(
                        ParameterInfo::new("books", list_of("com.example.Book"))
                            .annotated(AnnotationInstance::new(annotations::SOURCE)),
                    ),
                ),
        ])
    }

    #[test]
    fn operations_have_arguments_and_inherit_roles() {
        let index = index();
        let config = Config::default();
        let mut ctx = BuildContext::new(&index, &config);
        let api = index.class_by_name("com.example.BookApi").unwrap();
        let operation =
            create_operation(&mut ctx, api, &api.methods[0], OperationType::Query, None).unwrap();

        assert_eq!(operation.name(), "books");
        assert_eq!(operation.field.reference.name, "Book");
        assert!(operation.field.wrapper.is_some());
        let arguments: Vec<_> = operation
            .arguments
            .iter()
            .map(|a| (a.name.as_str(), a.reference.name.as_str(), a.not_null))
            .collect();
        assert_eq!(arguments, [("kind", "Genre", false), ("limit", "Int", true)]);
        assert_eq!(
            operation.field.directive_instances[0].to_string(),
            r#"@rolesAllowed(value: "reader")"#
        );
        assert!(ctx.registry.get(ReferenceType::Enum, "com.example.Genre").is_some());
    }

    #[test]
    fn source_operations_drop_the_source_parameter() {
        let index = index();
        let config = Config::default();
        let mut ctx = BuildContext::new(&index, &config);
        let book = index.class_by_name("com.example.Book").unwrap();
        let reference = Reference::new("com.example.Book", "Book", ReferenceType::Type);
        let operations = source_operations(&mut ctx, book, &reference).unwrap();

        let names: Vec<_> = operations.keys().map(String::as_str).collect();
        assert_eq!(names, ["rating", "ratings"]);
        let rating = &operations["rating"];
        assert!(rating.arguments.is_empty());
        assert_eq!(rating.source_field_on.as_ref(), Some(&reference));

        // Batched: List<Integer> for List<Book> becomes Integer per book.
        let ratings = &operations["ratings"];
        assert_eq!(ratings.field.reference.name, "Int");
        assert_eq!(ratings.field.wrapper, None);
    }
}
