//! The type creators: given a declaration and its reference, each one produces the schema node
//! of its kind, reserving the references it discovers along the way.
use std::collections::HashMap;

use crate::config::Config;
use crate::error::SchemaBuilderError;
use crate::helper::directives::Directives;
use crate::index::ClassInfo;
use crate::index::SymbolIndex;
use crate::index::TypeSignature;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;

mod argument;
mod custom_scalar;
mod directive_type;
mod enum_type;
mod field;
mod input_type;
mod interface;
mod object_type;
mod operation;
mod reference;
mod registry;
mod union;

pub(crate) use custom_scalar::create_custom_scalar;
pub(crate) use directive_type::create_directive_type;
pub(crate) use operation::create_operation;
pub use registry::ReferenceRegistry;

/// Whether a type is read from (`Out`) or written to (`In`) by clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    In,
    Out,
}

/// Type variables of a parameterized declaration, bound to the arguments of one reference.
pub(crate) type Bindings = HashMap<String, TypeSignature>;

/// State shared by every creator during one build.
pub(crate) struct BuildContext<'a> {
    pub(crate) index: &'a dyn SymbolIndex,
    pub(crate) config: &'a Config,
    pub(crate) registry: ReferenceRegistry,
    pub(crate) directives: Directives,
    /// Custom scalar names, keyed by the class implementing them.
    pub(crate) custom_scalars: HashMap<String, String>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(index: &'a dyn SymbolIndex, config: &'a Config) -> Self {
        Self {
            index,
            config,
            registry: ReferenceRegistry::new(),
            directives: Directives::default(),
            custom_scalars: HashMap::new(),
        }
    }
}

/// Creates the node of one closed reference kind.
pub(crate) trait Creator {
    fn reference_type(&self) -> ReferenceType;

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError>;
}

/// The creator materializing references of `reference_type`. Scalars have none.
pub(crate) fn creator_for(reference_type: ReferenceType) -> Option<&'static dyn Creator> {
    match reference_type {
        ReferenceType::Input => Some(&input_type::InputTypeCreator),
        ReferenceType::Type => Some(&object_type::TypeCreator),
        ReferenceType::Interface => Some(&interface::InterfaceCreator),
        ReferenceType::Union => Some(&union::UnionCreator),
        ReferenceType::Enum => Some(&enum_type::EnumCreator),
        ReferenceType::Scalar => None,
    }
}

/// The bindings of the type variables of `class` for `reference`.
pub(crate) fn bindings(class: &ClassInfo, reference: &Reference) -> Bindings {
    class
        .type_parameters
        .iter()
        .cloned()
        .zip(reference.type_arguments.iter().cloned())
        .collect()
}
