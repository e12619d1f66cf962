//! `@link` handling: parsing link applications, the federation vocabulary, and the resolver that
//! decides the final name of every linked element.
use std::fmt;
use std::str;

use apollo_compiler::InvalidNameError;
use apollo_compiler::Name;
use apollo_compiler::name;
use serde_json::Value;
use thiserror::Error;

use crate::link::spec::Url;
use crate::link::spec::Version;
use crate::model::DirectiveInstance;

pub mod federation;
pub mod resolver;
pub mod spec;

pub use resolver::LinkResolver;
pub use resolver::LinkState;

pub const DEFAULT_LINK_NAME: Name = name!("link");

/// The separator between a namespace and an element name, as in `federation__key`.
pub const NAMESPACE_SEPARATOR: &str = "__";

#[derive(Error, Debug, PartialEq)]
pub enum LinkError {
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
    #[error("Invalid use of @link in schema: {0}")]
    BootstrapError(String),
    #[error("Multiple \"link\" directives found on schema: {0}")]
    MultipleSpecLinks(String),
    #[error("Federation version of \"{0}\" is not supported")]
    UnsupportedFederationVersion(String),
    #[error("Argument as {alias} for Federation spec {url} {violation}")]
    InvalidNamespace {
        alias: String,
        url: String,
        violation: NamespaceViolation,
    },
    #[error("Directive import {name} for Federation spec {url} {problem}")]
    ImportAliasMismatch {
        name: String,
        alias: String,
        url: String,
        problem: AliasMismatch,
    },
    #[error("Federation import {import} requires version {required} or later, but {url} was linked")]
    UnsupportedLinkImport {
        import: String,
        required: Version,
        url: String,
    },
    #[error("Import {import} is not defined by {url}")]
    UnknownImport { import: String, url: String },
    #[error("Directive @{directive} from {url} is used in the schema but is not imported")]
    UsedButNotImported { directive: String, url: String },
    #[error("Directive {directive} is defined in the Federation spec {url}, but not found in the schema")]
    MissingDefinition { directive: String, url: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespaceViolation {
    StartsWithSigil,
    ContainsSeparator,
    EndsWithUnderscore,
}

impl fmt::Display for NamespaceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceViolation::StartsWithSigil => f.write_str("must not start with '@'"),
            NamespaceViolation::ContainsSeparator => {
                f.write_str("must not contain the namespace separator '__'")
            }
            NamespaceViolation::EndsWithUnderscore => f.write_str("must not end with an underscore"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AliasMismatch {
    /// A directive is imported under a name without the `@` sigil.
    MissingSigil,
    /// A type is imported under a name with the `@` sigil.
    UnexpectedSigil,
}

impl fmt::Display for AliasMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasMismatch::MissingSigil => f.write_str("starts with '@' so its alias must also start with '@'"),
            AliasMismatch::UnexpectedSigil => f.write_str(
                "does not start with '@' so its alias must not start with '@' either",
            ),
        }
    }
}

/// Checks an explicit namespace for a linked specification.
pub fn validate_namespace(alias: &str, url: &str) -> Result<(), LinkError> {
    let violation = if alias.starts_with('@') {
        Some(NamespaceViolation::StartsWithSigil)
    } else if alias.contains(NAMESPACE_SEPARATOR) {
        Some(NamespaceViolation::ContainsSeparator)
    } else if alias.ends_with('_') {
        Some(NamespaceViolation::EndsWithUnderscore)
    } else {
        None
    };
    match violation {
        Some(violation) => Err(LinkError::InvalidNamespace {
            alias: alias.to_string(),
            url: url.to_string(),
            violation,
        }),
        None => Ok(()),
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Purpose {
    SECURITY,
    EXECUTION,
}

impl Purpose {
    pub fn from_value(value: &Value) -> Result<Purpose, LinkError> {
        if let Value::String(value) = value {
            value.parse::<Purpose>()
        } else {
            Err(LinkError::BootstrapError(
                "invalid `purpose` value, should be an enum".to_string(),
            ))
        }
    }
}

impl str::FromStr for Purpose {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SECURITY" => Ok(Purpose::SECURITY),
            "EXECUTION" => Ok(Purpose::EXECUTION),
            _ => Err(LinkError::BootstrapError(format!(
                "invalid/unrecognized `purpose` value '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Purpose::SECURITY => f.write_str("SECURITY"),
            Purpose::EXECUTION => f.write_str("EXECUTION"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Import {
    /// The name of the element that is being imported.
    ///
    /// Note that this will never start with '@': whether or not this is the name of a directive is
    /// entirely reflected by the value of `is_directive`.
    pub element: Name,

    /// Whether the imported element is a directive (if it is not, then it is an imported type).
    pub is_directive: bool,

    /// The optional alias under which the element is imported.
    pub alias: Option<Name>,
}

impl Import {
    /// Parses one entry of `@link(import:)`: either `"@key"` / `"FieldSet"`, or
    /// `{ name: "@key", as: "@primaryKey" }`.
    pub fn from_value(value: &Value, url: &str) -> Result<Import, LinkError> {
        match value {
            Value::String(element) => Ok(Import::parse(element, None, url)?),
            Value::Object(fields) => {
                let mut name: Option<&str> = None;
                let mut alias: Option<&str> = None;
                for (k, v) in fields {
                    match k.as_str() {
                        "name" => {
                            name = Some(v.as_str().ok_or_else(|| {
                                LinkError::BootstrapError("invalid value for `name` field in @link(import:) argument: must be a string".to_string())
                            })?)
                        }
                        "as" => {
                            alias = Some(v.as_str().ok_or_else(|| {
                                LinkError::BootstrapError("invalid value for `as` field in @link(import:) argument: must be a string".to_string())
                            })?)
                        }
                        _ => Err(LinkError::BootstrapError(format!(
                            "unknown field `{k}` in @link(import:) argument"
                        )))?,
                    }
                }
                let Some(element) = name else {
                    return Err(LinkError::BootstrapError(
                        "invalid entry in @link(import:) argument, missing mandatory `name` field"
                            .to_string(),
                    ));
                };
                Import::parse(element, alias.filter(|a| !a.is_empty()), url)
            }
            _ => Err(LinkError::BootstrapError("invalid sub-value for @link(import:) argument: values should be either strings or objects of the form { name: \"<importedElement>\", as: \"<alias>\" }.".to_string())),
        }
    }

    fn parse(element: &str, alias: Option<&str>, url: &str) -> Result<Import, LinkError> {
        let mismatch = |problem| LinkError::ImportAliasMismatch {
            name: element.to_string(),
            alias: alias.unwrap_or_default().to_string(),
            url: url.to_string(),
            problem,
        };
        if let Some(directive_name) = element.strip_prefix('@') {
            let alias = match alias {
                Some(alias) => Some(
                    alias
                        .strip_prefix('@')
                        .ok_or_else(|| mismatch(AliasMismatch::MissingSigil))?,
                ),
                None => None,
            };
            Ok(Import {
                element: Name::new(directive_name)?,
                is_directive: true,
                alias: alias.map(Name::new).transpose()?,
            })
        } else {
            if alias.is_some_and(|alias| alias.starts_with('@')) {
                return Err(mismatch(AliasMismatch::UnexpectedSigil));
            }
            Ok(Import {
                element: Name::new(element)?,
                is_directive: false,
                alias: alias.map(Name::new).transpose()?,
            })
        }
    }

    pub fn element_display_name(&self) -> impl fmt::Display + '_ {
        DisplayName {
            name: &self.element,
            is_directive: self.is_directive,
        }
    }

    pub fn imported_name(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.element)
    }

    pub fn imported_display_name(&self) -> impl fmt::Display + '_ {
        DisplayName {
            name: self.imported_name(),
            is_directive: self.is_directive,
        }
    }
}

/// A [`fmt::Display`]able wrapper for name strings that adds an `@` in front for directive names.
struct DisplayName<'s> {
    name: &'s str,
    is_directive: bool,
}

impl fmt::Display for DisplayName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_directive {
            f.write_str("@")?;
        }
        f.write_str(self.name)
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.is_some() {
            write!(
                f,
                r#"{{ name: "{}", as: "{}" }}"#,
                self.element_display_name(),
                self.imported_display_name()
            )
        } else {
            write!(f, r#""{}""#, self.imported_display_name())
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Link {
    pub url: Url,
    pub spec_alias: Option<Name>,
    pub imports: Vec<Import>,
    pub purpose: Option<Purpose>,
}

impl Link {
    pub fn import(&self, element: &str, is_directive: bool) -> Option<&Import> {
        self.imports
            .iter()
            .find(|i| i.is_directive == is_directive && i.element == element)
    }

    /// Parses a `@link` application whose url has already been read as `url`.
    pub fn from_directive_instance(
        directive: &DirectiveInstance,
        url: Url,
    ) -> Result<Link, LinkError> {
        let raw_url = url.to_string();
        let spec_alias = directive
            .value("as")
            .and_then(Value::as_str)
            .filter(|alias| !alias.is_empty())
            .map(Name::new)
            .transpose()?;
        let purpose = match directive.value("for") {
            Some(Value::Null) | None => None,
            Some(value) => Some(Purpose::from_value(value)?),
        };
        let imports = parse_imports(directive, &raw_url)?;
        Ok(Link {
            url,
            spec_alias,
            imports,
            purpose,
        })
    }
}

/// The `import` argument of a `@link` application to `url`.
pub fn parse_imports(directive: &DirectiveInstance, url: &str) -> Result<Vec<Import>, LinkError> {
    match directive.value("import") {
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| Import::from_value(value, url))
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(LinkError::BootstrapError(
            "the `import` argument for @link must be a list".to_string(),
        )),
    }
}

/// The `url` argument of a `@link` application.
pub fn link_url(directive: &DirectiveInstance) -> Result<&str, LinkError> {
    directive
        .value("url")
        .ok_or_else(|| {
            LinkError::BootstrapError("the `url` argument for @link is mandatory".to_string())
        })?
        .as_str()
        .ok_or_else(|| {
            LinkError::BootstrapError("the `url` argument for @link must be a String".to_string())
        })
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let imported_types: Vec<String> = self
            .imports
            .iter()
            .map(|import| import.to_string())
            .collect::<Vec<String>>();
        let imports = if imported_types.is_empty() {
            "".to_string()
        } else {
            format!(r#", import: [{}]"#, imported_types.join(", "))
        };
        let alias = self
            .spec_alias
            .as_ref()
            .map(|a| format!(r#", as: "{}""#, a))
            .unwrap_or_default();
        let purpose = self
            .purpose
            .as_ref()
            .map(|p| format!(r#", for: {}"#, p))
            .unwrap_or_default();
        write!(f, r#"@link(url: "{}"{alias}{imports}{purpose})"#, self.url)
    }
}
