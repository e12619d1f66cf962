//! Well-known metadata kinds and the merged view of the metadata attached to one element.
use crate::index::AnnotationInstance;
use crate::index::ClassInfo;
use crate::index::EnumValueInfo;
use crate::index::FieldInfo;
use crate::index::MethodInfo;
use crate::index::ParameterInfo;

pub const GRAPHQL_API: &str = "GraphQLApi";
pub const QUERY: &str = "Query";
pub const MUTATION: &str = "Mutation";
pub const SUBSCRIPTION: &str = "Subscription";
pub const SOURCE: &str = "Source";

pub const TYPE: &str = "Type";
pub const INPUT: &str = "Input";
pub const INTERFACE: &str = "Interface";
pub const UNION: &str = "Union";
pub const ENUM: &str = "Enum";

pub const NAME: &str = "Name";
pub const DESCRIPTION: &str = "Description";
pub const NON_NULL: &str = "NonNull";
pub const ID: &str = "Id";
pub const DEFAULT_VALUE: &str = "DefaultValue";
pub const IGNORE: &str = "Ignore";

pub const DIRECTIVE: &str = "Directive";
pub const REPEATABLE: &str = "Repeatable";
pub const CUSTOM_SCALAR: &str = "CustomScalar";
pub const ERROR_CODE: &str = "ErrorCode";
pub const DATA_FETCHER: &str = "DataFetcher";
pub const ROLES_ALLOWED: &str = "RolesAllowed";

pub const SIZE: &str = "Size";
pub const MIN: &str = "Min";
pub const MAX: &str = "Max";
pub const DECIMAL_MIN: &str = "DecimalMin";
pub const DECIMAL_MAX: &str = "DecimalMax";
pub const PATTERN: &str = "Pattern";
pub const EMAIL: &str = "Email";
pub const NOT_BLANK: &str = "NotBlank";
pub const NOT_EMPTY: &str = "NotEmpty";
pub const POSITIVE: &str = "Positive";
pub const POSITIVE_OR_ZERO: &str = "PositiveOrZero";
pub const NEGATIVE: &str = "Negative";
pub const NEGATIVE_OR_ZERO: &str = "NegativeOrZero";

/// Every piece of metadata attached to one schema element, possibly gathered from several
/// declarations (a field and its getter, a setter and its parameter). Earlier sources win
/// lookups by name.
#[derive(Clone, Debug, Default)]
pub struct Annotations<'a> {
    instances: Vec<&'a AnnotationInstance>,
    type_use: Vec<&'a str>,
}

impl<'a> Annotations<'a> {
    pub fn for_class(class: &'a ClassInfo) -> Self {
        Self {
            instances: class.annotations.iter().collect(),
            type_use: Vec::new(),
        }
    }

    pub fn for_field(field: &'a FieldInfo) -> Self {
        Self {
            instances: field.annotations.iter().collect(),
            type_use: field.signature.annotations.iter().map(String::as_str).collect(),
        }
    }

    pub fn for_method(method: &'a MethodInfo) -> Self {
        Self {
            instances: method.annotations.iter().collect(),
            type_use: method
                .return_type
                .annotations
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }

    pub fn for_parameter(parameter: &'a ParameterInfo) -> Self {
        Self {
            instances: parameter.annotations.iter().collect(),
            type_use: parameter
                .signature
                .annotations
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }

    pub fn for_enum_value(value: &'a EnumValueInfo) -> Self {
        Self {
            instances: value.annotations.iter().collect(),
            type_use: Vec::new(),
        }
    }

    /// Appends the metadata of `other`, which loses lookups against what is already here.
    pub fn merge(mut self, other: Annotations<'a>) -> Self {
        self.instances.extend(other.instances);
        self.type_use.extend(other.type_use);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.instances.iter().any(|a| a.name == name) || self.type_use.contains(&name)
    }

    pub fn contains_one_of(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.contains(name))
    }

    pub fn get(&self, name: &str) -> Option<&'a AnnotationInstance> {
        self.instances.iter().copied().find(|a| a.name == name)
    }

    /// Every instance of `name`, in source order.
    pub fn all<'b>(&'b self, name: &'b str) -> impl Iterator<Item = &'a AnnotationInstance> + 'b {
        self.instances.iter().copied().filter(move |a| a.name == name)
    }

    /// The non-blank `value` member of the first `name` instance.
    pub fn string_value(&self, name: &str) -> Option<&'a str> {
        self.get(name)
            .and_then(AnnotationInstance::string_value)
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TypeSignature;

    #[test]
    fn earlier_sources_win_lookups() {
        let getter = MethodInfo::new("getTitle", TypeSignature::class("java.lang.String"))
            .annotated(AnnotationInstance::new(NAME).with_value("headline"));
        let field = FieldInfo::new("title", TypeSignature::class("java.lang.String").annotated(NON_NULL))
            .annotated(AnnotationInstance::new(NAME).with_value("ignored"))
            .annotated(AnnotationInstance::new(DESCRIPTION).with_value("The title"));

        let annotations = Annotations::for_method(&getter).merge(Annotations::for_field(&field));
        assert_eq!(annotations.string_value(NAME), Some("headline"));
        assert_eq!(annotations.string_value(DESCRIPTION), Some("The title"));
        assert_eq!(annotations.all(NAME).count(), 2);
        assert!(annotations.contains(NON_NULL));
        assert!(!annotations.contains_one_of(&[IGNORE, ID]));
    }

    #[test]
    fn blank_values_are_absent() {
        let field = FieldInfo::new("title", TypeSignature::class("java.lang.String"))
            .annotated(AnnotationInstance::new(NAME).with_value("  "));
        assert_eq!(Annotations::for_field(&field).string_value(NAME), None);
    }
}
