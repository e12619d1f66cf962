//! The symbol index: a queryable, read-only view over declarations and their metadata.
//!
//! Schema generation never looks at source code. It is handed a [`SymbolIndex`] and asks it for
//! declarations by name and for every use of a given metadata kind. [`Index`] is the in-memory
//! implementation, which can be assembled in code or deserialized from JSON.
use std::collections::HashMap;
use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

mod annotation;
mod signature;

pub use annotation::AnnotationInstance;
pub use annotation::AnnotationValue;
pub use signature::Primitive;
pub use signature::TypeKind;
pub use signature::TypeSignature;

/// The kind tag captured for a declaration when it was indexed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation(AnnotationShape),
}

/// How the members of a metadata declaration are shaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationShape {
    #[default]
    Plain,
    /// Every member is a list of nested groups of strings (access-control style metadata such as
    /// scopes or policies).
    NestedStringGroups,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassInfo {
    pub name: String,
    pub kind: ClassKind,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<String>,
    pub annotations: Vec<AnnotationInstance>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub enum_values: Vec<EnumValueInfo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub signature: TypeSignature,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_transient: bool,
    #[serde(default)]
    pub is_synthetic: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub return_type: TypeSignature,
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_synthetic: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub signature: TypeSignature,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnumValueInfo {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationInstance>,
}

/// Where a piece of metadata was found.
#[derive(Clone, Copy, Debug)]
pub enum AnnotationTarget<'a> {
    Class(&'a ClassInfo),
    Field(&'a ClassInfo, &'a FieldInfo),
    Method(&'a ClassInfo, &'a MethodInfo),
    Parameter(&'a ClassInfo, &'a MethodInfo, usize),
    EnumValue(&'a ClassInfo, &'a EnumValueInfo),
}

impl AnnotationTarget<'_> {
    pub fn class(&self) -> &ClassInfo {
        match self {
            AnnotationTarget::Class(class)
            | AnnotationTarget::Field(class, _)
            | AnnotationTarget::Method(class, _)
            | AnnotationTarget::Parameter(class, _, _)
            | AnnotationTarget::EnumValue(class, _) => class,
        }
    }
}

impl std::fmt::Display for AnnotationTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnnotationTarget::Class(class) => write!(f, "class {}", class.name),
            AnnotationTarget::Field(class, field) => write!(f, "field {}.{}", class.name, field.name),
            AnnotationTarget::Method(class, method) => {
                write!(f, "method {}.{}", class.name, method.name)
            }
            AnnotationTarget::Parameter(class, method, position) => write!(
                f,
                "parameter #{position} of {}.{}",
                class.name, method.name
            ),
            AnnotationTarget::EnumValue(class, value) => {
                write!(f, "enum value {}.{}", class.name, value.name)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Annotated<'a> {
    pub annotation: &'a AnnotationInstance,
    pub target: AnnotationTarget<'a>,
}

pub trait SymbolIndex {
    /// Every use of the metadata kind `name` across the indexed universe.
    fn annotations(&self, name: &str) -> Vec<Annotated<'_>>;

    fn class_by_name(&self, name: &str) -> Option<&ClassInfo>;

    /// Classes declaring (directly or through their superclasses or superinterfaces) that they
    /// implement `interface`.
    fn known_implementors(&self, interface: &str) -> Vec<&ClassInfo>;

    /// The non-synthetic methods of `class` followed by those of its superclass chain.
    fn all_methods<'a>(&'a self, class: &'a ClassInfo) -> Vec<&'a MethodInfo> {
        self.superclass_chain(class)
            .into_iter()
            .flat_map(|c| c.methods.iter())
            .filter(|m| !m.is_synthetic)
            .collect()
    }

    /// The non-synthetic fields of `class` followed by those of its superclass chain.
    fn all_fields<'a>(&'a self, class: &'a ClassInfo) -> Vec<&'a FieldInfo> {
        self.superclass_chain(class)
            .into_iter()
            .flat_map(|c| c.fields.iter())
            .filter(|f| !f.is_synthetic)
            .collect()
    }

    /// `class` and then each indexed superclass, stopping at the first one that is not indexed.
    fn superclass_chain<'a>(&'a self, class: &'a ClassInfo) -> Vec<&'a ClassInfo> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(class);
        while let Some(c) = current {
            if !seen.insert(c.name.as_str()) {
                break;
            }
            chain.push(c);
            current = c
                .superclass
                .as_deref()
                .and_then(|name| self.class_by_name(name));
        }
        chain
    }
}

/// In-memory [`SymbolIndex`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ClassInfo>", into = "Vec<ClassInfo>")]
pub struct Index {
    classes: Vec<ClassInfo>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl Index {
    pub fn new(classes: impl IntoIterator<Item = ClassInfo>) -> Self {
        let mut index = Index::default();
        for class in classes {
            index.add(class);
        }
        index
    }

    /// Adds a declaration, replacing any previous one with the same name.
    pub fn add(&mut self, class: ClassInfo) {
        if let Some(position) = self.by_name.get(&class.name) {
            self.classes[*position] = class;
        } else {
            self.by_name.insert(class.name.clone(), self.classes.len());
            self.classes.push(class);
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter()
    }

    fn implements(&self, class: &ClassInfo, interface: &str, seen: &mut HashSet<String>) -> bool {
        if !seen.insert(class.name.clone()) {
            return false;
        }
        class.interfaces.iter().any(|name| {
            name == interface
                || self
                    .class_by_name(name)
                    .is_some_and(|parent| self.implements(parent, interface, seen))
        }) || class
            .superclass
            .as_deref()
            .and_then(|name| self.class_by_name(name))
            .is_some_and(|parent| self.implements(parent, interface, seen))
    }
}

impl From<Vec<ClassInfo>> for Index {
    fn from(classes: Vec<ClassInfo>) -> Self {
        Index::new(classes)
    }
}

impl From<Index> for Vec<ClassInfo> {
    fn from(index: Index) -> Self {
        index.classes
    }
}

impl SymbolIndex for Index {
    fn annotations(&self, name: &str) -> Vec<Annotated<'_>> {
        let mut found = Vec::new();
        for class in &self.classes {
            collect(&mut found, name, &class.annotations, AnnotationTarget::Class(class));
            for field in &class.fields {
                collect(&mut found, name, &field.annotations, AnnotationTarget::Field(class, field));
            }
            for method in &class.methods {
                collect(&mut found, name, &method.annotations, AnnotationTarget::Method(class, method));
                for (position, parameter) in method.parameters.iter().enumerate() {
                    collect(
                        &mut found,
                        name,
                        &parameter.annotations,
                        AnnotationTarget::Parameter(class, method, position),
                    );
                }
            }
            for value in &class.enum_values {
                collect(&mut found, name, &value.annotations, AnnotationTarget::EnumValue(class, value));
            }
        }
        found
    }

    fn class_by_name(&self, name: &str) -> Option<&ClassInfo> {
        self.by_name.get(name).map(|position| &self.classes[*position])
    }

    fn known_implementors(&self, interface: &str) -> Vec<&ClassInfo> {
        self.classes
            .iter()
            .filter(|class| class.name != interface)
            .filter(|class| self.implements(class, interface, &mut HashSet::new()))
            .collect()
    }
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn of_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn enum_value(mut self, value: EnumValueInfo) -> Self {
        self.enum_values.push(value);
        self
    }

    /// The name after the last package separator, including any outer class (`Outer$Inner`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&AnnotationInstance> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

fn collect<'a>(
    found: &mut Vec<Annotated<'a>>,
    name: &str,
    annotations: &'a [AnnotationInstance],
    target: AnnotationTarget<'a>,
) {
    for annotation in annotations.iter().filter(|a| a.name == name) {
        found.push(Annotated { annotation, target });
    }
}

pub(crate) fn local_name(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, local)| local)
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, signature: TypeSignature) -> Self {
        Self {
            name: name.into(),
            signature,
            annotations: Vec::new(),
            is_static: false,
            is_transient: false,
            is_synthetic: false,
        }
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, return_type: TypeSignature) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            annotations: Vec::new(),
            is_static: false,
            is_synthetic: false,
        }
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.is_synthetic = true;
        self
    }
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>, signature: TypeSignature) -> Self {
        Self {
            name: name.into(),
            signature,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl EnumValueInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: AnnotationInstance) -> Self {
        self.annotations.push(annotation);
        self
    }
}
