//! Fields of object, interface and input types, and the population shared by every field-like
//! element.
use indexmap::IndexMap;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Direction;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::helper::bean_validation;
use crate::helper::naming;
use crate::helper::roles_allowed;
use crate::index::ClassInfo;
use crate::index::FieldInfo;
use crate::index::MethodInfo;
use crate::index::SymbolIndex;
use crate::index::TypeKind;
use crate::index::TypeSignature;
use crate::model::DirectiveLocation;
use crate::model::Field;

/// A property of a class, backed by an instance field, an accessor method, or both.
#[derive(Debug)]
pub(crate) struct Property<'a> {
    pub(crate) name: String,
    pub(crate) field: Option<&'a FieldInfo>,
    pub(crate) accessor: Option<&'a MethodInfo>,
}

impl<'a> Property<'a> {
    /// Accessor metadata wins over field metadata.
    pub(crate) fn annotations(&self) -> Annotations<'a> {
        let accessor = self.accessor.map(|method| {
            let annotations = Annotations::for_method(method);
            match method.parameters.first() {
                Some(parameter) => annotations.merge(Annotations::for_parameter(parameter)),
                None => annotations,
            }
        });
        let field = self.field.map(Annotations::for_field);
        match (accessor, field) {
            (Some(accessor), Some(field)) => accessor.merge(field),
            (Some(annotations), None) | (None, Some(annotations)) => annotations,
            (None, None) => Annotations::default(),
        }
    }

    /// The declared type: a getter's return type, a setter's parameter type, else the field's.
    pub(crate) fn signature(&self) -> Option<&'a TypeSignature> {
        match self.accessor {
            Some(method) => match method.parameters.first() {
                Some(parameter) => Some(&parameter.signature),
                None => Some(&method.return_type),
            },
            None => self.field.map(|field| &field.signature),
        }
    }

    fn is_ignored(&self) -> bool {
        self.annotations().contains(annotations::IGNORE)
    }
}

/// The readable properties of `class`: instance fields (when `with_fields`) and getters, merged
/// by property name.
pub(crate) fn output_properties<'a>(
    index: &'a dyn SymbolIndex,
    class: &'a ClassInfo,
    with_fields: bool,
) -> Vec<Property<'a>> {
    let getters = index.all_methods(class).into_iter().filter_map(|method| {
        let is_getter = !method.is_static
            && method.parameters.is_empty()
            && method.return_type.kind != TypeKind::Void;
        is_getter
            .then(|| naming::accessor_property(method, &["get", "is"]))
            .flatten()
            .map(|property| (property, method))
    });
    properties(index, class, with_fields, getters)
}

/// The writable properties of `class`: instance fields and setters, merged by property name.
pub(crate) fn input_properties<'a>(
    index: &'a dyn SymbolIndex,
    class: &'a ClassInfo,
) -> Vec<Property<'a>> {
    let setters = index.all_methods(class).into_iter().filter_map(|method| {
        let is_setter = !method.is_static && method.parameters.len() == 1;
        is_setter
            .then(|| naming::accessor_property(method, &["set"]))
            .flatten()
            .map(|property| (property, method))
    });
    properties(index, class, true, setters)
}

fn properties<'a>(
    index: &'a dyn SymbolIndex,
    class: &'a ClassInfo,
    with_fields: bool,
    accessors: impl Iterator<Item = (String, &'a MethodInfo)>,
) -> Vec<Property<'a>> {
    let mut properties: IndexMap<String, Property<'a>> = IndexMap::new();
    if with_fields {
        let fields = index
            .all_fields(class)
            .into_iter()
            .filter(|field| !field.is_static && !field.is_transient);
        for field in fields {
            properties
                .entry(field.name.clone())
                .or_insert_with(|| Property {
                    name: field.name.clone(),
                    field: None,
                    accessor: None,
                })
                .field
                .get_or_insert(field);
        }
    }
    for (name, method) in accessors {
        properties
            .entry(name.clone())
            .or_insert_with(|| Property {
                name,
                field: None,
                accessor: None,
            })
            .accessor
            .get_or_insert(method);
    }
    properties
        .into_values()
        .filter(|property| !property.is_ignored())
        .collect()
}

/// Creates the field for `property` of `class`.
pub(crate) fn create_field(
    ctx: &mut BuildContext<'_>,
    direction: Direction,
    class: &ClassInfo,
    property: &Property<'_>,
    bindings: &Bindings,
    location: DirectiveLocation,
) -> Result<Field, SchemaBuilderError> {
    let member = format!("{}.{}", class.name, property.name);
    let Some(signature) = property.signature() else {
        return Err(SchemaBuilderError::unsupported(member, "?", "property has no type"));
    };
    let annotations = property.annotations();
    let (reference, wrapper) =
        ctx.create_reference(direction, signature, &annotations, bindings, &member)?;

    let mut field = Field::new(
        &property.name,
        naming::field_name(&annotations, &property.name),
        reference,
    );
    field.method_name = property.accessor.map(|method| method.name.clone());
    field.wrapper = wrapper;
    populate_field(ctx, &mut field, signature, &annotations, location)?;
    if location == DirectiveLocation::FieldDefinition {
        field.directive_instances.extend(roles_allowed::roles_allowed_instance(
            &annotations,
            &Annotations::for_class(class),
        ));
    }
    Ok(field)
}

/// Fills in nullability, default value, description and directives of a field-like element
/// whose reference and wrapper are already set.
pub(crate) fn populate_field(
    ctx: &BuildContext<'_>,
    field: &mut Field,
    signature: &TypeSignature,
    annotations: &Annotations<'_>,
    location: DirectiveLocation,
) -> Result<(), SchemaBuilderError> {
    field.description = helper::description(annotations);
    field.default_value = helper::default_value(annotations);
    field.not_null = signature.is_primitive()
        || (annotations.contains(annotations::NON_NULL)
            && signature.class_name() != Some("java.util.Optional"));
    field.directive_instances = ctx.directives.resolve(annotations, location, &field.name)?;
    if matches!(
        location,
        DirectiveLocation::ArgumentDefinition | DirectiveLocation::InputFieldDefinition
    ) {
        field.directive_instances.extend(bean_validation::constraint_instance(
            annotations,
            field.wrapper.is_some(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::index::AnnotationInstance;
    use crate::index::Index;
    use crate::index::ParameterInfo;
    use crate::index::Primitive;

    fn string() -> TypeSignature {
        TypeSignature::class("java.lang.String")
    }

    #[test]
    fn fields_and_getters_merge_into_properties() {
        let index = Index::new([
            ClassInfo::new("com.example.Named")
                .field(FieldInfo::new("name", string()))
                .method(MethodInfo::new("getName", string())),
            ClassInfo::new("com.example.Book")
                .extends("com.example.Named")
                .field(FieldInfo::new("title", string()))
                .field(FieldInfo::new("secret", string()).annotated(AnnotationInstance::new(annotations::IGNORE)))
                .method(
                    MethodInfo::new("isAvailable", TypeSignature::primitive(Primitive::Boolean)),
                )
                .method(MethodInfo::new("getTitle", string()))
                .method(MethodInfo::new("setTitle", TypeSignature::void()).parameter(ParameterInfo::new("title", string())))
                .method(MethodInfo::new("summarize", string())),
        ]);
        let book = index.class_by_name("com.example.Book").unwrap();

        let output: Vec<_> = output_properties(&index, book, true)
            .into_iter()
            .map(|p| (p.name, p.field.is_some(), p.accessor.map(|m| m.name.as_str())))
            .collect();
        assert_eq!(
            output,
            [
                ("title".to_string(), true, Some("getTitle")),
                ("name".to_string(), true, Some("getName")),
                ("available".to_string(), false, Some("isAvailable")),
            ]
        );

        let input: Vec<_> = input_properties(&index, book)
            .into_iter()
            .map(|p| (p.name, p.accessor.map(|m| m.name.as_str())))
            .collect();
        assert_eq!(
            input,
            [("title".to_string(), Some("setTitle")), ("name".to_string(), None)]
        );
    }

    #[test]
    fn ignore_on_the_getter_drops_the_field_too() {
        let index = Index::new([ClassInfo::new("com.example.Book")
            .field(FieldInfo::new("isbn", string()))
            .method(MethodInfo::new("getIsbn", string()).annotated(AnnotationInstance::new(annotations::IGNORE)))]);
        let book = index.class_by_name("com.example.Book").unwrap();
        assert!(output_properties(&index, book, true).is_empty());
    }
}
