//! Maps declared member types to references, reserving every non-scalar one.
use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Direction;
use crate::error::SchemaBuilderError;
use crate::helper::naming;
use crate::helper::scalars;
use crate::index::ClassKind;
use crate::index::TypeKind;
use crate::index::TypeSignature;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::Wrapper;
use crate::model::WrapperType;

const COLLECTIONS: [&str; 13] = [
    "java.lang.Iterable",
    "java.util.Collection",
    "java.util.List",
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.Set",
    "java.util.HashSet",
    "java.util.LinkedHashSet",
    "java.util.SortedSet",
    "java.util.TreeSet",
    "java.util.Queue",
    "java.util.Deque",
    "io.smallrye.mutiny.Multi",
];

const MAPS: [&str; 5] = [
    "java.util.Map",
    "java.util.HashMap",
    "java.util.LinkedHashMap",
    "java.util.SortedMap",
    "java.util.TreeMap",
];

/// Containers that only affect how a value is produced, not its schema type.
const TRANSPARENT: [&str; 5] = [
    "java.util.Optional",
    "java.util.concurrent.CompletionStage",
    "java.util.concurrent.CompletableFuture",
    "io.smallrye.mutiny.Uni",
    "org.reactivestreams.Publisher",
];

impl BuildContext<'_> {
    /// The reference to the value type of a member declared as `signature`, with the wrappers
    /// (lists, arrays, maps) around it.
    pub(crate) fn create_reference(
        &mut self,
        direction: Direction,
        signature: &TypeSignature,
        annotations: &Annotations<'_>,
        bindings: &Bindings,
        member: &str,
    ) -> Result<(Reference, Option<Wrapper>), SchemaBuilderError> {
        let force_id = annotations.contains(annotations::ID);
        self.wrapped_reference(direction, signature, force_id, bindings, member)
    }

    fn wrapped_reference(
        &mut self,
        direction: Direction,
        signature: &TypeSignature,
        force_id: bool,
        bindings: &Bindings,
        member: &str,
    ) -> Result<(Reference, Option<Wrapper>), SchemaBuilderError> {
        let signature = resolve_variable(signature, bindings, member)?;
        match &signature.kind {
            TypeKind::Array(item) => {
                self.wrap(WrapperType::Array, None, direction, item, force_id, bindings, member)
            }
            TypeKind::Parameterized { name, arguments } if COLLECTIONS.contains(&name.as_str()) => {
                let [item] = arguments.as_slice() else {
                    return Err(SchemaBuilderError::unsupported(
                        member,
                        &signature,
                        "collections take exactly one type argument",
                    ));
                };
                self.wrap(WrapperType::Collection, None, direction, item, force_id, bindings, member)
            }
            TypeKind::Parameterized { name, arguments } if MAPS.contains(&name.as_str()) => {
                let [key, value] = arguments.as_slice() else {
                    return Err(SchemaBuilderError::unsupported(
                        member,
                        &signature,
                        "maps take exactly two type arguments",
                    ));
                };
                let key = resolve_variable(key, bindings, member)?;
                let key = self.leaf_reference(direction, &key, false, bindings, member)?;
                self.wrap(WrapperType::Map, Some(key), direction, value, force_id, bindings, member)
            }
            TypeKind::Parameterized { name, arguments } if TRANSPARENT.contains(&name.as_str()) => {
                let [inner] = arguments.as_slice() else {
                    return Err(SchemaBuilderError::unsupported(
                        member,
                        &signature,
                        "expected exactly one type argument",
                    ));
                };
                self.wrapped_reference(direction, inner, force_id, bindings, member)
            }
            TypeKind::Class(name) if COLLECTIONS.contains(&name.as_str()) || MAPS.contains(&name.as_str()) => {
                Err(SchemaBuilderError::unsupported(
                    member,
                    &signature,
                    "raw collections have no item type",
                ))
            }
            _ => {
                let reference = self.leaf_reference(direction, &signature, force_id, bindings, member)?;
                Ok((reference, None))
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn wrap(
        &mut self,
        wrapper_type: WrapperType,
        key: Option<Reference>,
        direction: Direction,
        item: &TypeSignature,
        force_id: bool,
        bindings: &Bindings,
        member: &str,
    ) -> Result<(Reference, Option<Wrapper>), SchemaBuilderError> {
        let (reference, inner) = self.wrapped_reference(direction, item, force_id, bindings, member)?;
        let wrapper = Wrapper {
            wrapper_type,
            not_null_item: item.is_primitive() || item.has_annotation(annotations::NON_NULL),
            key: key.map(Box::new),
            wrapper: inner.map(Box::new),
        };
        Ok((reference, Some(wrapper)))
    }

    fn leaf_reference(
        &mut self,
        direction: Direction,
        signature: &TypeSignature,
        force_id: bool,
        bindings: &Bindings,
        member: &str,
    ) -> Result<Reference, SchemaBuilderError> {
        let class_name = match &signature.kind {
            TypeKind::Primitive(primitive) => {
                let scalar = if force_id { scalars::ID } else { scalars::for_primitive(*primitive) };
                return Ok(Reference::scalar(primitive.to_string(), scalar));
            }
            TypeKind::Class(name) | TypeKind::Parameterized { name, .. } => name.as_str(),
            _ => {
                return Err(SchemaBuilderError::unsupported(
                    member,
                    signature,
                    "not a class type",
                ));
            }
        };
        if force_id {
            return Ok(Reference::scalar(class_name, scalars::ID));
        }
        if let Some(scalar) = scalars::for_class(class_name) {
            return Ok(Reference::scalar(class_name, scalar));
        }
        if let Some(scalar) = self.custom_scalars.get(class_name) {
            return Ok(Reference::scalar(class_name, scalar.clone()));
        }

        let class = self.index.class_by_name(class_name);
        let reference_type = match class.map(|c| c.kind) {
            Some(ClassKind::Enum) => ReferenceType::Enum,
            Some(ClassKind::Interface) if direction == Direction::In => {
                return Err(SchemaBuilderError::unsupported(
                    member,
                    signature,
                    "interfaces and unions cannot be used as input",
                ));
            }
            Some(ClassKind::Interface)
                if class.is_some_and(|c| c.has_annotation(annotations::UNION)) =>
            {
                ReferenceType::Union
            }
            Some(ClassKind::Interface) => ReferenceType::Interface,
            Some(ClassKind::Annotation(_)) => {
                return Err(SchemaBuilderError::unsupported(
                    member,
                    signature,
                    "metadata declarations cannot be used as types",
                ));
            }
            Some(ClassKind::Class) | None => match direction {
                Direction::In => ReferenceType::Input,
                Direction::Out => ReferenceType::Type,
            },
        };

        let mut reference = Reference::new(
            class_name,
            naming::type_name(class_name, class, reference_type, self.config),
            reference_type,
        );
        if let TypeKind::Parameterized { arguments, .. } = &signature.kind {
            let arguments = arguments
                .iter()
                .map(|argument| substitute(argument, bindings, member))
                .collect::<Result<Vec<_>, _>>()?;
            let suffix = match reference_type {
                ReferenceType::Input => self.config.input_suffix.as_str(),
                _ => "",
            };
            let base = reference.name.strip_suffix(suffix).unwrap_or(&reference.name);
            reference.name = format!(
                "{}{suffix}",
                naming::parameterized_type_name(base, &arguments, self.config)
            );
            reference.type_arguments = arguments;
        }
        Ok(self.registry.reserve(reference))
    }
}

/// Whether `signature` is an array or a collection, the shapes a batched source parameter has.
pub(crate) fn is_collection(signature: &TypeSignature) -> bool {
    match &signature.kind {
        TypeKind::Array(_) => true,
        TypeKind::Parameterized { name, .. } => COLLECTIONS.contains(&name.as_str()),
        _ => false,
    }
}

/// Replaces a type variable by its binding.
fn resolve_variable(
    signature: &TypeSignature,
    bindings: &Bindings,
    member: &str,
) -> Result<TypeSignature, SchemaBuilderError> {
    match &signature.kind {
        TypeKind::Variable(name) => bindings.get(name).cloned().ok_or_else(|| {
            SchemaBuilderError::unsupported(member, signature, format!("type variable {name} is not bound"))
        }),
        TypeKind::Wildcard => Err(SchemaBuilderError::unsupported(
            member,
            signature,
            "wildcard types are not supported",
        )),
        TypeKind::Void => Err(SchemaBuilderError::unsupported(
            member,
            signature,
            "members must have a value type",
        )),
        _ => Ok(signature.clone()),
    }
}

/// Replaces every type variable in `signature` by its binding.
fn substitute(
    signature: &TypeSignature,
    bindings: &Bindings,
    member: &str,
) -> Result<TypeSignature, SchemaBuilderError> {
    let kind = match &signature.kind {
        TypeKind::Variable(_) | TypeKind::Wildcard | TypeKind::Void => {
            return resolve_variable(signature, bindings, member);
        }
        TypeKind::Array(item) => TypeKind::Array(Box::new(substitute(item, bindings, member)?)),
        TypeKind::Parameterized { name, arguments } => TypeKind::Parameterized {
            name: name.clone(),
            arguments: arguments
                .iter()
                .map(|argument| substitute(argument, bindings, member))
                .collect::<Result<_, _>>()?,
        },
        kind => kind.clone(),
    };
    Ok(TypeSignature {
        kind,
        annotations: signature.annotations.clone(),
    })
}
