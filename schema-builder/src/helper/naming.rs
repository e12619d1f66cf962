//! Names of types, fields, operations and directives in the schema.
use itertools::Itertools;

use crate::annotations;
use crate::annotations::Annotations;
use crate::config::Config;
use crate::config::TypeAutoNameStrategy;
use crate::index::ClassInfo;
use crate::index::MethodInfo;
use crate::index::TypeKind;
use crate::index::TypeSignature;
use crate::index::local_name;
use crate::model::OperationType;
use crate::model::ReferenceType;

/// The schema name of a class used as `reference_type`.
///
/// An explicit name on the kind-specific metadata wins, then `Name`, then the automatic name.
/// Input types not named through `Input` get the configured suffix.
pub(crate) fn type_name(
    class_name: &str,
    class: Option<&ClassInfo>,
    reference_type: ReferenceType,
    config: &Config,
) -> String {
    let annotations = class.map(Annotations::for_class).unwrap_or_default();
    let (kind_annotation, suffix) = match reference_type {
        ReferenceType::Input => (annotations::INPUT, config.input_suffix.as_str()),
        ReferenceType::Type => (annotations::TYPE, ""),
        ReferenceType::Interface => (annotations::INTERFACE, ""),
        ReferenceType::Union => (annotations::UNION, ""),
        ReferenceType::Enum => (annotations::ENUM, ""),
        ReferenceType::Scalar => ("", ""),
    };
    if let Some(name) = annotations.string_value(kind_annotation) {
        return name.to_string();
    }
    if let Some(name) = annotations.string_value(annotations::NAME) {
        return format!("{name}{suffix}");
    }
    format!("{}{suffix}", auto_name(class_name, config.auto_name_strategy))
}

/// The name of a parameterized class, with the names of its type arguments appended.
pub(crate) fn parameterized_type_name(
    base_name: &str,
    arguments: &[TypeSignature],
    config: &Config,
) -> String {
    let arguments = arguments
        .iter()
        .map(|argument| argument_name(argument, config))
        .join("_");
    format!("{base_name}_{arguments}")
}

fn argument_name(signature: &TypeSignature, config: &Config) -> String {
    match &signature.kind {
        TypeKind::Class(name) => auto_name(name, config.auto_name_strategy),
        TypeKind::Parameterized { name, arguments } => parameterized_type_name(
            &auto_name(name, config.auto_name_strategy),
            arguments,
            config,
        ),
        TypeKind::Array(component) => format!("{}Array", argument_name(component, config)),
        TypeKind::Primitive(primitive) => capitalize(&primitive.to_string()),
        TypeKind::Variable(name) => name.clone(),
        TypeKind::Void | TypeKind::Wildcard => "Object".to_string(),
    }
}

pub(crate) fn auto_name(class_name: &str, strategy: TypeAutoNameStrategy) -> String {
    match strategy {
        TypeAutoNameStrategy::Default => {
            let local = local_name(class_name);
            local.rsplit('$').next().unwrap_or(local).to_string()
        }
        TypeAutoNameStrategy::MergeInnerClass => local_name(class_name).replace('$', ""),
        TypeAutoNameStrategy::Full => class_name.replace(['.', '$'], "_"),
    }
}

/// Directive names are type names starting with a lower case letter.
pub(crate) fn directive_name(class: &ClassInfo, config: &Config) -> String {
    let annotations = Annotations::for_class(class);
    let name = annotations
        .string_value(annotations::NAME)
        .map(str::to_string)
        .unwrap_or_else(|| auto_name(&class.name, config.auto_name_strategy));
    decapitalize(&name)
}

/// The property a getter or setter accesses, if `method` is one.
pub(crate) fn accessor_property(method: &MethodInfo, prefixes: &[&str]) -> Option<String> {
    prefixes.iter().find_map(|prefix| {
        let rest = method.name.strip_prefix(prefix)?;
        rest.starts_with(|c: char| c.is_ascii_uppercase())
            .then(|| decapitalize(rest))
    })
}

/// The field name of a member: its `Name` metadata, else its property name.
pub(crate) fn field_name(annotations: &Annotations<'_>, property: &str) -> String {
    annotations
        .string_value(annotations::NAME)
        .unwrap_or(property)
        .to_string()
}

/// The name of an operation: the value of its operation metadata, then `Name`, then the method
/// name. Query names drop a leading `get` or `is`.
pub(crate) fn operation_name(
    method: &MethodInfo,
    annotations: &Annotations<'_>,
    operation_type: OperationType,
) -> String {
    let kind_annotation = match operation_type {
        OperationType::Query => annotations::QUERY,
        OperationType::Mutation => annotations::MUTATION,
        OperationType::Subscription => annotations::SUBSCRIPTION,
    };
    if let Some(name) = annotations
        .string_value(kind_annotation)
        .or_else(|| annotations.string_value(annotations::NAME))
    {
        return name.to_string();
    }
    if operation_type == OperationType::Query {
        if let Some(property) = accessor_property(method, &["get", "is"]) {
            return property;
        }
    }
    method.name.clone()
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::index::AnnotationInstance;

    #[rstest]
    #[case(TypeAutoNameStrategy::Default, "Inner")]
    #[case(TypeAutoNameStrategy::MergeInnerClass, "OuterInner")]
    #[case(TypeAutoNameStrategy::Full, "com_example_Outer_Inner")]
    fn auto_names_follow_the_strategy(#[case] strategy: TypeAutoNameStrategy, #[case] expected: &str) {
        assert_eq!(auto_name("com.example.Outer$Inner", strategy), expected);
    }

    #[test]
    fn explicit_names_win_over_automatic_ones() {
        let config = Config::default();
        let book = ClassInfo::new("com.example.Book");
        assert_eq!(type_name(&book.name, Some(&book), ReferenceType::Type, &config), "Book");
        assert_eq!(type_name(&book.name, Some(&book), ReferenceType::Input, &config), "BookInput");

        let named = ClassInfo::new("com.example.Book")
            .annotated(AnnotationInstance::new(annotations::NAME).with_value("Volume"));
        assert_eq!(type_name(&named.name, Some(&named), ReferenceType::Input, &config), "VolumeInput");

        let input = named.annotated(AnnotationInstance::new(annotations::INPUT).with_value("NewBook"));
        assert_eq!(type_name(&input.name, Some(&input), ReferenceType::Input, &config), "NewBook");
        assert_eq!(type_name(&input.name, Some(&input), ReferenceType::Type, &config), "Volume");
    }

    #[test]
    fn generic_names_append_their_arguments() {
        let name = parameterized_type_name(
            "Page",
            &[
                TypeSignature::class("com.example.Book"),
                TypeSignature::parameterized(
                    "com.example.Pair",
                    vec![TypeSignature::class("com.example.Author"), TypeSignature::class("java.lang.String")],
                ),
            ],
            &Config::default(),
        );
        assert_eq!(name, "Page_Book_Pair_Author_String");
    }

    #[test]
    fn query_names_drop_accessor_prefixes() {
        let annotations = Annotations::default();
        let string = TypeSignature::class("java.lang.String");
        let getter = MethodInfo::new("getBooks", string.clone());
        let predicate = MethodInfo::new("isReady", string.clone());
        let plain = MethodInfo::new("getaway", string);
        assert_eq!(operation_name(&getter, &annotations, OperationType::Query), "books");
        assert_eq!(operation_name(&predicate, &annotations, OperationType::Query), "ready");
        assert_eq!(operation_name(&plain, &annotations, OperationType::Query), "getaway");
        assert_eq!(operation_name(&getter, &annotations, OperationType::Mutation), "getBooks");
    }

    #[test]
    fn directive_names_start_in_lower_case() {
        let key = ClassInfo::new("graphql.federation.Key");
        assert_eq!(directive_name(&key, &Config::default()), "key");
        let compose = ClassInfo::new("graphql.federation.ComposeDirective");
        assert_eq!(directive_name(&compose, &Config::default()), "composeDirective");
    }
}
