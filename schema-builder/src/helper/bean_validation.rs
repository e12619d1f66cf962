//! The built-in `@constraint` directive, derived from bean validation metadata on arguments and
//! input fields.
use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde_json::Value;

use crate::annotations;
use crate::annotations::Annotations;
use crate::index::AnnotationValue;
use crate::model::DirectiveInstance;
use crate::model::DirectiveLocation;
use crate::model::DirectiveType;
use crate::model::Field;
use crate::model::Reference;

pub(crate) static CONSTRAINT_DIRECTIVE_TYPE: LazyLock<DirectiveType> = LazyLock::new(|| {
    let argument = |name: &str, class_name: &str, scalar: &str| {
        Field::new(name, name, Reference::scalar(class_name, scalar))
    };
    DirectiveType {
        class_name: None,
        name: "constraint".to_string(),
        description: None,
        locations: BTreeSet::from([
            DirectiveLocation::ArgumentDefinition,
            DirectiveLocation::InputFieldDefinition,
        ]),
        repeatable: false,
        arguments: vec![
            argument("minLength", "java.lang.Integer", "Int"),
            argument("maxLength", "java.lang.Integer", "Int"),
            argument("format", "java.lang.String", "String"),
            argument("min", "java.math.BigInteger", "BigInteger"),
            argument("max", "java.math.BigInteger", "BigInteger"),
            argument("minFloat", "java.math.BigDecimal", "BigDecimal"),
            argument("maxFloat", "java.math.BigDecimal", "BigDecimal"),
            argument("pattern", "java.lang.String", "String"),
            argument("minItems", "java.lang.Integer", "Int"),
            argument("maxItems", "java.lang.Integer", "Int"),
        ],
    }
});

/// The `@constraint` instance for an argument or input field, if any constraint applies.
/// `is_collection` selects item counts over string lengths for `Size` and `NotEmpty`.
pub(crate) fn constraint_instance(
    annotations: &Annotations<'_>,
    is_collection: bool,
) -> Option<DirectiveInstance> {
    let mut instance = DirectiveInstance::new(&CONSTRAINT_DIRECTIVE_TYPE);
    let (min_size, max_size) = if is_collection {
        ("minItems", "maxItems")
    } else {
        ("minLength", "maxLength")
    };
    let mut set = |name: &str, value: Value| {
        instance.values.insert(name.to_string(), value);
    };

    if let Some(size) = annotations.get(annotations::SIZE) {
        if let Some(min) = size.member("min").and_then(AnnotationValue::as_i64) {
            set(min_size, min.into());
        }
        if let Some(max) = size.member("max").and_then(AnnotationValue::as_i64) {
            set(max_size, max.into());
        }
    }
    if annotations.contains(annotations::NOT_EMPTY) {
        set(min_size, 1.into());
    }
    if annotations.contains(annotations::NOT_BLANK) {
        set("minLength", 1.into());
    }
    if annotations.contains(annotations::EMAIL) {
        set("format", "email".into());
    }
    if let Some(pattern) = annotations
        .get(annotations::PATTERN)
        .and_then(|a| a.member("regexp"))
        .and_then(AnnotationValue::as_str)
    {
        set("pattern", pattern.into());
    }
    if let Some(min) = integer_value(annotations, annotations::MIN) {
        set("min", min.into());
    }
    if let Some(max) = integer_value(annotations, annotations::MAX) {
        set("max", max.into());
    }
    if let Some(min) = decimal_value(annotations, annotations::DECIMAL_MIN) {
        set("minFloat", min);
    }
    if let Some(max) = decimal_value(annotations, annotations::DECIMAL_MAX) {
        set("maxFloat", max);
    }
    if annotations.contains(annotations::POSITIVE) {
        set("min", 1.into());
    }
    if annotations.contains(annotations::POSITIVE_OR_ZERO) {
        set("min", 0.into());
    }
    if annotations.contains(annotations::NEGATIVE) {
        set("max", (-1).into());
    }
    if annotations.contains(annotations::NEGATIVE_OR_ZERO) {
        set("max", 0.into());
    }

    (!instance.values.is_empty()).then_some(instance)
}

fn integer_value(annotations: &Annotations<'_>, name: &str) -> Option<i64> {
    annotations.get(name)?.value()?.as_i64()
}

/// Decimal bounds are declared as strings.
fn decimal_value(annotations: &Annotations<'_>, name: &str) -> Option<Value> {
    let value = annotations.get(name)?.value()?;
    match value {
        AnnotationValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        AnnotationValue::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
        AnnotationValue::Integer(i) => Some((*i).into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::index::AnnotationInstance;
    use crate::index::ParameterInfo;
    use crate::index::TypeSignature;

    fn parameter(annotations: Vec<AnnotationInstance>) -> ParameterInfo {
        annotations.into_iter().fold(
            ParameterInfo::new("title", TypeSignature::class("java.lang.String")),
            ParameterInfo::annotated,
        )
    }

    #[test]
    fn size_maps_to_lengths_or_item_counts() {
        let parameter = parameter(vec![AnnotationInstance::new(annotations::SIZE)
            .with("min", 1_i64)
            .with("max", 120_i64)]);
        let annotations = Annotations::for_parameter(&parameter);

        let instance = constraint_instance(&annotations, false).unwrap();
        assert_eq!(instance.name, "constraint");
        assert_eq!(json!(instance.values), json!({ "minLength": 1, "maxLength": 120 }));

        let instance = constraint_instance(&annotations, true).unwrap();
        assert_eq!(json!(instance.values), json!({ "minItems": 1, "maxItems": 120 }));
    }

    #[test]
    fn numeric_and_format_constraints() {
        let parameter = parameter(vec![
            AnnotationInstance::new(annotations::EMAIL),
            AnnotationInstance::new(annotations::PATTERN).with("regexp", "^.+@example.com$"),
            AnnotationInstance::new(annotations::DECIMAL_MAX).with_value("99.5"),
            AnnotationInstance::new(annotations::POSITIVE),
        ]);
        let instance = constraint_instance(&Annotations::for_parameter(&parameter), false).unwrap();
        assert_eq!(
            json!(instance.values),
            json!({ "format": "email", "pattern": "^.+@example.com$", "maxFloat": 99.5, "min": 1 })
        );
    }

    #[test]
    fn unconstrained_members_get_no_directive() {
        let parameter = parameter(vec![]);
        assert!(constraint_instance(&Annotations::for_parameter(&parameter), false).is_none());
    }
}
