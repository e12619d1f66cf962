//! Turns metadata instances into directive instances for the declared directive types.
use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;
use tracing::warn;

use crate::annotations::Annotations;
use crate::error::SchemaBuilderError;
use crate::index::AnnotationInstance;
use crate::index::AnnotationShape;
use crate::index::AnnotationValue;
use crate::model::DirectiveInstance;
use crate::model::DirectiveLocation;
use crate::model::DirectiveType;

/// The directive types created from metadata declarations, keyed by declaration name, along with
/// the kind tag each declaration was indexed with.
#[derive(Debug, Default)]
pub(crate) struct Directives {
    directive_types: IndexMap<String, (DirectiveType, AnnotationShape)>,
}

impl Directives {
    /// Directive types without a declaration (the built-in ones) never produce instances here.
    pub(crate) fn new<'a>(
        directive_types: impl IntoIterator<Item = (&'a DirectiveType, AnnotationShape)>,
    ) -> Self {
        let directive_types = directive_types
            .into_iter()
            .filter_map(|(directive_type, shape)| {
                let class_name = directive_type.class_name.clone()?;
                Some((class_name, (directive_type.clone(), shape)))
            })
            .collect();
        Self { directive_types }
    }

    /// The directives applied through `annotations` on the element `element_name` at `location`.
    ///
    /// A directive not allowed at `location` is dropped with a warning. A non-repeatable
    /// directive applied more than once is an error.
    pub(crate) fn resolve(
        &self,
        annotations: &Annotations<'_>,
        location: DirectiveLocation,
        element_name: &str,
    ) -> Result<Vec<DirectiveInstance>, SchemaBuilderError> {
        let mut instances = Vec::new();
        for (class_name, (directive_type, shape)) in &self.directive_types {
            for annotation in annotations.all(class_name) {
                if !directive_type.is_allowed_on(location) {
                    warn!(
                        directive = %class_name,
                        element = element_name,
                        "Directive instance: '{class_name}' assigned to '{element_name}' cannot be applied. \
                         The directive is allowed on locations '{}' but on '{location}'",
                        directive_type.locations.iter().join(", "),
                    );
                    continue;
                }
                instances.push(to_instance(directive_type, *shape, annotation));
            }
        }

        let counts = instances.iter().counts_by(|instance| instance.name.clone());
        let repeated = self
            .directive_types
            .values()
            .map(|(directive_type, _)| directive_type)
            .find(|d| !d.repeatable && counts.get(&d.name).is_some_and(|count| *count > 1));
        if let Some(directive_type) = repeated {
            return Err(SchemaBuilderError::NonRepeatableDirective {
                directive: directive_type.name.clone(),
                element: element_name.to_string(),
            });
        }
        Ok(instances)
    }
}

fn to_instance(
    directive_type: &DirectiveType,
    shape: AnnotationShape,
    annotation: &AnnotationInstance,
) -> DirectiveInstance {
    let mut instance = DirectiveInstance::new(directive_type);
    let argument_names: HashMap<&str, &str> = directive_type
        .arguments
        .iter()
        .map(|argument| (argument.property_name.as_str(), argument.name.as_str()))
        .collect();
    for (member, value) in &annotation.values {
        let name = argument_names.get(member.as_str()).copied().unwrap_or(member);
        let value = match shape {
            AnnotationShape::NestedStringGroups => nested_string_groups(value),
            AnnotationShape::Plain => value.to_json(),
        };
        instance.values.insert(name.to_string(), value);
    }
    instance
}

/// Reads `[{ value: ["a", "b"] }, ...]` (or plain nested arrays) as `[["a", "b"], ...]`.
fn nested_string_groups(value: &AnnotationValue) -> Value {
    let groups = value.as_array().unwrap_or_default().iter().map(|group| {
        let strings = match group {
            AnnotationValue::Nested(nested) => nested
                .values
                .values()
                .next()
                .and_then(AnnotationValue::as_array)
                .unwrap_or_default(),
            AnnotationValue::Array(strings) => strings.as_slice(),
            _ => &[],
        };
        Value::Array(
            strings
                .iter()
                .filter_map(AnnotationValue::as_str)
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )
    });
    Value::Array(groups.collect())
}
