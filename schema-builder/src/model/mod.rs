//! The schema model: the closed graph of operations, types and directives handed to the
//! execution engine.
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

mod directive;
mod reference;
mod types;

pub use directive::DirectiveInstance;
pub use directive::DirectiveLocation;
pub use directive::DirectiveType;
pub use reference::Reference;
pub use reference::ReferenceType;
pub use reference::Wrapper;
pub use reference::WrapperType;
pub use types::CustomScalarKind;
pub use types::CustomScalarType;
pub use types::EnumType;
pub use types::EnumValue;
pub use types::ErrorInfo;
pub use types::Field;
pub use types::Group;
pub use types::InputType;
pub use types::Operation;
pub use types::OperationType;
pub use types::Type;
pub use types::UnionType;

use crate::helper::scalars;

/// A node produced by one of the type creators of the closure loop.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaNode {
    Input(InputType),
    Type(Type),
    Interface(Type),
    Union(UnionType),
    Enum(EnumType),
}

impl SchemaNode {
    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Input(node) => &node.name,
            SchemaNode::Type(node) | SchemaNode::Interface(node) => &node.name,
            SchemaNode::Union(node) => &node.name,
            SchemaNode::Enum(node) => &node.name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Operations {
    pub queries: Vec<Operation>,
    pub mutations: Vec<Operation>,
    pub subscriptions: Vec<Operation>,
}

impl Operations {
    pub fn get(&self, operation_type: OperationType) -> &[Operation] {
        match operation_type {
            OperationType::Query => &self.queries,
            OperationType::Mutation => &self.mutations,
            OperationType::Subscription => &self.subscriptions,
        }
    }

    fn push(&mut self, operation: Operation) {
        match operation.operation_type {
            OperationType::Query => self.queries.push(operation),
            OperationType::Mutation => self.mutations.push(operation),
            OperationType::Subscription => self.subscriptions.push(operation),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.queries
            .iter()
            .chain(&self.mutations)
            .chain(&self.subscriptions)
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        self.queries
            .iter_mut()
            .chain(&mut self.mutations)
            .chain(&mut self.subscriptions)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupedOperations {
    pub group: Group,
    pub operations: Operations,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub operations: Operations,

    pub groups: IndexMap<String, GroupedOperations>,

    pub inputs: IndexMap<String, InputType>,

    pub types: IndexMap<String, Type>,

    pub interfaces: IndexMap<String, Type>,

    pub unions: IndexMap<String, UnionType>,

    pub enums: IndexMap<String, EnumType>,

    pub custom_scalar_types: IndexMap<String, CustomScalarType>,

    pub directive_types: IndexMap<String, DirectiveType>,

    /// Directives applied to the schema itself.
    pub directive_instances: Vec<DirectiveInstance>,

    /// Keyed by exception class name.
    pub errors: IndexMap<String, ErrorInfo>,

    /// Data fetchers wrapping the default one, keyed by the class they apply to.
    pub wrapped_data_fetchers: IndexMap<String, String>,

    /// Data fetchers replacing the default one, keyed by the class they apply to.
    pub field_data_fetchers: IndexMap<String, String>,
}

impl Schema {
    pub fn contains(&self, reference_type: ReferenceType, name: &str) -> bool {
        match reference_type {
            ReferenceType::Scalar => {
                scalars::is_known_scalar(name) || self.custom_scalar_types.contains_key(name)
            }
            ReferenceType::Input => self.inputs.contains_key(name),
            ReferenceType::Type => self.types.contains_key(name),
            ReferenceType::Interface => self.interfaces.contains_key(name),
            ReferenceType::Union => self.unions.contains_key(name),
            ReferenceType::Enum => self.enums.contains_key(name),
        }
    }

    /// The class a named type of the schema was created from.
    pub fn type_class_name(&self, reference_type: ReferenceType, name: &str) -> Option<&str> {
        let class_name = match reference_type {
            ReferenceType::Scalar => self.custom_scalar_types.get(name).map(|s| &s.class_name),
            ReferenceType::Input => self.inputs.get(name).map(|i| &i.class_name),
            ReferenceType::Type => self.types.get(name).map(|t| &t.class_name),
            ReferenceType::Interface => self.interfaces.get(name).map(|t| &t.class_name),
            ReferenceType::Union => self.unions.get(name).map(|u| &u.class_name),
            ReferenceType::Enum => self.enums.get(name).map(|e| &e.class_name),
        };
        class_name.map(String::as_str)
    }

    pub fn add(&mut self, node: SchemaNode) {
        match node {
            SchemaNode::Input(node) => {
                self.inputs.insert(node.name.clone(), node);
            }
            SchemaNode::Type(node) => {
                self.types.insert(node.name.clone(), node);
            }
            SchemaNode::Interface(node) => {
                self.interfaces.insert(node.name.clone(), node);
            }
            SchemaNode::Union(node) => {
                self.unions.insert(node.name.clone(), node);
            }
            SchemaNode::Enum(node) => {
                self.enums.insert(node.name.clone(), node);
            }
        }
    }

    pub fn contains_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn contains_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn contains_union(&self, name: &str) -> bool {
        self.unions.contains_key(name)
    }

    pub fn contains_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn add_custom_scalar_type(&mut self, scalar: CustomScalarType) {
        self.custom_scalar_types.insert(scalar.name.clone(), scalar);
    }

    pub fn add_directive_type(&mut self, directive_type: DirectiveType) {
        self.directive_types
            .insert(directive_type.name.clone(), directive_type);
    }

    pub fn add_operation(&mut self, group: Option<&Group>, operation: Operation) {
        match group {
            Some(group) => self
                .groups
                .entry(group.name.clone())
                .or_insert_with(|| GroupedOperations {
                    group: group.clone(),
                    operations: Operations::default(),
                })
                .operations
                .push(operation),
            None => self.operations.push(operation),
        }
    }

    /// The operations of one kind, either ungrouped (`None`) or under the named group.
    pub fn operations(&self, operation_type: OperationType, group: Option<&str>) -> &[Operation] {
        match group {
            None => self.operations.get(operation_type),
            Some(name) => self
                .groups
                .get(name)
                .map(|g| g.operations.get(operation_type))
                .unwrap_or_default(),
        }
    }

    pub fn has_operations(&self) -> bool {
        self.all_operations().next().is_some()
    }

    /// Every entry point, ungrouped ones first.
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .chain(self.groups.values().flat_map(|g| g.operations.iter()))
    }

    pub fn add_error(&mut self, error: ErrorInfo) {
        self.errors.insert(error.class_name.clone(), error);
    }

    pub fn add_wrapped_data_fetcher(&mut self, for_class: String, data_fetcher: String) {
        self.wrapped_data_fetchers.insert(for_class, data_fetcher);
    }

    pub fn add_field_data_fetcher(&mut self, for_class: String, data_fetcher: String) {
        self.field_data_fetchers.insert(for_class, data_fetcher);
    }

    /// Every field-like element: operations and their arguments, object, interface and input
    /// fields, source fields, and directive arguments.
    pub fn fields(&self) -> Vec<&Field> {
        let mut fields = Vec::new();
        let operations = self.all_operations().chain(
            self.types
                .values()
                .chain(self.interfaces.values())
                .flat_map(|t| t.operations.values()),
        );
        for operation in operations {
            fields.push(&operation.field);
            fields.extend(&operation.arguments);
        }
        for node in self.types.values().chain(self.interfaces.values()) {
            fields.extend(node.fields.values());
        }
        for input in self.inputs.values() {
            fields.extend(input.fields.values());
        }
        for directive_type in self.directive_types.values() {
            fields.extend(&directive_type.arguments);
        }
        fields
    }

    fn for_each_field_mut(&mut self, f: &mut dyn FnMut(&mut Field)) {
        fn visit_operation(operation: &mut Operation, f: &mut dyn FnMut(&mut Field)) {
            f(&mut operation.field);
            operation.arguments.iter_mut().for_each(&mut *f);
        }
        for operation in self.operations.iter_mut() {
            visit_operation(operation, f);
        }
        for group in self.groups.values_mut() {
            for operation in group.operations.iter_mut() {
                visit_operation(operation, f);
            }
        }
        for node in self.types.values_mut().chain(self.interfaces.values_mut()) {
            node.fields.values_mut().for_each(&mut *f);
            for operation in node.operations.values_mut() {
                visit_operation(operation, f);
            }
        }
        for input in self.inputs.values_mut() {
            input.fields.values_mut().for_each(&mut *f);
        }
        for directive_type in self.directive_types.values_mut() {
            directive_type.arguments.iter_mut().for_each(&mut *f);
        }
    }

    /// Every reference mentioned anywhere in the model.
    pub fn references(&self) -> Vec<&Reference> {
        let mut references: Vec<&Reference> =
            self.fields().into_iter().flat_map(Field::references).collect();
        for node in self.types.values().chain(self.interfaces.values()) {
            references.extend(&node.interfaces);
            references.extend(node.operations.values().filter_map(|o| o.source_field_on.as_ref()));
        }
        for union in self.unions.values() {
            references.extend(&union.members);
        }
        references.extend(
            self.all_operations()
                .filter_map(|o| o.source_field_on.as_ref()),
        );
        references
    }

    /// References without a corresponding node. Empty for every schema returned by the builder.
    pub fn dangling_references(&self) -> Vec<&Reference> {
        self.references()
            .into_iter()
            .filter(|r| !self.contains(r.reference_type, &r.name))
            .collect()
    }

    /// Every directive applied anywhere in the model, with the name of the element it is on.
    pub fn all_directive_instances(&self) -> Vec<(&str, &DirectiveInstance)> {
        let mut instances = Vec::new();
        applied(&mut instances, "schema", &self.directive_instances);
        for field in self.fields() {
            applied(&mut instances, &field.name, &field.directive_instances);
        }
        for node in self.types.values().chain(self.interfaces.values()) {
            applied(&mut instances, &node.name, &node.directive_instances);
        }
        for node in self.inputs.values() {
            applied(&mut instances, &node.name, &node.directive_instances);
        }
        for node in self.unions.values() {
            applied(&mut instances, &node.name, &node.directive_instances);
        }
        for node in self.enums.values() {
            applied(&mut instances, &node.name, &node.directive_instances);
            for value in &node.values {
                applied(&mut instances, &value.value, &value.directive_instances);
            }
        }
        for node in self.custom_scalar_types.values() {
            applied(&mut instances, &node.name, &node.directive_instances);
        }
        instances
    }

    fn for_each_directive_instance_mut(&mut self, f: &mut dyn FnMut(&mut DirectiveInstance)) {
        self.directive_instances.iter_mut().for_each(&mut *f);
        self.for_each_field_mut(&mut |field| field.directive_instances.iter_mut().for_each(&mut *f));
        for node in self.types.values_mut().chain(self.interfaces.values_mut()) {
            node.directive_instances.iter_mut().for_each(&mut *f);
        }
        for node in self.inputs.values_mut() {
            node.directive_instances.iter_mut().for_each(&mut *f);
        }
        for node in self.unions.values_mut() {
            node.directive_instances.iter_mut().for_each(&mut *f);
        }
        for node in self.enums.values_mut() {
            node.directive_instances.iter_mut().for_each(&mut *f);
            for value in &mut node.values {
                value.directive_instances.iter_mut().for_each(&mut *f);
            }
        }
        for node in self.custom_scalar_types.values_mut() {
            node.directive_instances.iter_mut().for_each(&mut *f);
        }
    }

    /// Renames a directive definition along with every application of it.
    pub(crate) fn rename_directive(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        rename_entry(&mut self.directive_types, old, new, |d| &mut d.name);
        self.for_each_directive_instance_mut(&mut |instance| {
            if instance.name == old {
                instance.name = new.to_string();
            }
        });
    }

    /// Renames a named type along with every reference to it.
    pub(crate) fn rename_type(&mut self, reference_type: ReferenceType, old: &str, new: &str) {
        if old == new {
            return;
        }
        match reference_type {
            ReferenceType::Scalar => rename_entry(&mut self.custom_scalar_types, old, new, |s| &mut s.name),
            ReferenceType::Input => rename_entry(&mut self.inputs, old, new, |s| &mut s.name),
            ReferenceType::Type => rename_entry(&mut self.types, old, new, |s| &mut s.name),
            ReferenceType::Interface => rename_entry(&mut self.interfaces, old, new, |s| &mut s.name),
            ReferenceType::Union => rename_entry(&mut self.unions, old, new, |s| &mut s.name),
            ReferenceType::Enum => rename_entry(&mut self.enums, old, new, |s| &mut s.name),
        }
        let mut rename = |reference: &mut Reference| {
            if reference.reference_type == reference_type && reference.name == old {
                reference.name = new.to_string();
            }
        };
        self.for_each_field_mut(&mut |field| field.references_mut().into_iter().for_each(&mut rename));
        for node in self.types.values_mut().chain(self.interfaces.values_mut()) {
            node.interfaces.iter_mut().for_each(&mut rename);
            for operation in node.operations.values_mut() {
                operation.source_field_on.iter_mut().for_each(&mut rename);
            }
        }
        for union in self.unions.values_mut() {
            union.members.iter_mut().for_each(&mut rename);
        }
    }
}

fn applied<'a>(
    instances: &mut Vec<(&'a str, &'a DirectiveInstance)>,
    element: &'a str,
    directives: &'a [DirectiveInstance],
) {
    instances.extend(directives.iter().map(|d| (element, d)));
}

fn rename_entry<T>(
    map: &mut IndexMap<String, T>,
    old: &str,
    new: &str,
    name: impl Fn(&mut T) -> &mut String,
) {
    if let Some((index, _, mut node)) = map.shift_remove_full(old) {
        *name(&mut node) = new.to_string();
        map.shift_insert(index, new.to_string(), node);
    }
}
