//! Small, stateless pieces shared by the creators: naming, descriptions, default values,
//! built-in scalars and directives, and the directive resolver.
pub(crate) mod bean_validation;
pub(crate) mod directives;
pub(crate) mod naming;
pub(crate) mod roles_allowed;
pub(crate) mod scalars;

use crate::annotations;
use crate::annotations::Annotations;
use crate::index::ClassInfo;
use crate::model::Group;

pub(crate) fn description(annotations: &Annotations<'_>) -> Option<String> {
    annotations
        .string_value(annotations::DESCRIPTION)
        .map(str::to_string)
}

pub(crate) fn default_value(annotations: &Annotations<'_>) -> Option<String> {
    annotations
        .get(annotations::DEFAULT_VALUE)
        .and_then(|a| a.value())
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// The group of an API class, named by its `Name` metadata.
pub(crate) fn group(api_class: &ClassInfo) -> Option<Group> {
    let annotations = Annotations::for_class(api_class);
    annotations.string_value(annotations::NAME).map(|name| Group {
        name: name.to_string(),
        description: description(&annotations),
    })
}
