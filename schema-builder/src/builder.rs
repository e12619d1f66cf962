//! Schema generation: from the entry points of an index to a closed schema model.
use std::collections::HashSet;

use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::annotations;
use crate::annotations::Annotations;
use crate::config::Config;
use crate::creator::BuildContext;
use crate::creator::create_custom_scalar;
use crate::creator::create_directive_type;
use crate::creator::create_operation;
use crate::creator::creator_for;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::helper::bean_validation::CONSTRAINT_DIRECTIVE_TYPE;
use crate::helper::directives::Directives;
use crate::helper::roles_allowed::ROLES_ALLOWED_DIRECTIVE_TYPE;
use crate::index::AnnotationShape;
use crate::index::AnnotationTarget;
use crate::index::AnnotationValue;
use crate::index::ClassInfo;
use crate::index::ClassKind;
use crate::index::SymbolIndex;
use crate::index::local_name;
use crate::link::LinkResolver;
use crate::link::LinkState;
use crate::link::federation;
use crate::model::DirectiveLocation;
use crate::model::ErrorInfo;
use crate::model::OperationType;
use crate::model::ReferenceType;
use crate::model::Schema;

/// Builds the schema model for every `GraphQLApi` class of `index`.
///
/// The returned schema is closed: every reference in it resolves to a node of the schema or to
/// a scalar. Any failure aborts the build.
pub fn build(index: &dyn SymbolIndex, config: &Config) -> Result<Schema, SchemaBuilderError> {
    SchemaBuilder::new(index, config).build()
}

struct SchemaBuilder<'a> {
    ctx: BuildContext<'a>,
    schema: Schema,
}

impl<'a> SchemaBuilder<'a> {
    fn new(index: &'a dyn SymbolIndex, config: &'a Config) -> Self {
        Self {
            ctx: BuildContext::new(index, config),
            schema: Schema::default(),
        }
    }

    fn build(mut self) -> Result<Schema, SchemaBuilderError> {
        let index = self.ctx.index;
        let api_classes: Vec<&ClassInfo> = index
            .annotations(annotations::GRAPHQL_API)
            .into_iter()
            .filter_map(|annotated| match annotated.target {
                AnnotationTarget::Class(class) => Some(class),
                _ => None,
            })
            .collect();

        self.register_custom_scalars();
        self.add_directive_types()?;
        self.add_schema_directives_and_description(&api_classes)?;
        self.add_custom_scalar_types()?;

        for api_class in &api_classes {
            self.add_operations(api_class)?;
        }

        // The operations reference types, which reference more types, until nothing is left.
        while self.add_outstanding_types()? {}

        self.add_errors();
        self.add_data_fetchers();
        self.add_link_imported_names()?;

        self.ctx.registry.clear();
        Ok(self.schema)
    }

    /// Declarations of the federation package only take part in federated schemas.
    fn is_excluded(&self, class: &ClassInfo) -> bool {
        federation::is_federation_class(&class.name) && !self.ctx.config.federation.enabled
    }

    /// Custom scalar names must be known before any member type is mapped, directive
    /// arguments included.
    fn register_custom_scalars(&mut self) {
        let index = self.ctx.index;
        for annotated in index.annotations(annotations::CUSTOM_SCALAR) {
            let (AnnotationTarget::Class(class), Some(name)) =
                (annotated.target, annotated.annotation.string_value())
            else {
                continue;
            };
            if self.is_excluded(class) {
                continue;
            }
            self.ctx
                .custom_scalars
                .insert(class.name.clone(), name.to_string());
        }
    }

    fn add_directive_types(&mut self) -> Result<(), SchemaBuilderError> {
        let index = self.ctx.index;
        for annotated in index.annotations(annotations::DIRECTIVE) {
            let AnnotationTarget::Class(class) = annotated.target else {
                continue;
            };
            if self.is_excluded(class) {
                continue;
            }
            let directive_type = create_directive_type(&mut self.ctx, class)?;
            self.schema.add_directive_type(directive_type);
        }
        self.schema
            .add_directive_type(CONSTRAINT_DIRECTIVE_TYPE.clone());
        self.schema
            .add_directive_type(ROLES_ALLOWED_DIRECTIVE_TYPE.clone());

        self.ctx.directives = Directives::new(self.schema.directive_types.values().map(
            |directive_type| {
                let shape = directive_type
                    .class_name
                    .as_deref()
                    .and_then(|name| index.class_by_name(name))
                    .map(|class| match class.kind {
                        ClassKind::Annotation(shape) => shape,
                        _ => AnnotationShape::Plain,
                    })
                    .unwrap_or_default();
                (directive_type, shape)
            },
        ));
        Ok(())
    }

    fn add_schema_directives_and_description(
        &mut self,
        api_classes: &[&ClassInfo],
    ) -> Result<(), SchemaBuilderError> {
        let mut non_repeatable = HashSet::new();
        for api_class in api_classes {
            let annotations = Annotations::for_class(api_class);
            let instances =
                self.ctx
                    .directives
                    .resolve(&annotations, DirectiveLocation::Schema, "schema")?;
            for instance in instances {
                let repeatable = self
                    .schema
                    .directive_types
                    .get(&instance.name)
                    .is_some_and(|d| d.repeatable);
                if !repeatable && !non_repeatable.insert(instance.name.clone()) {
                    return Err(SchemaBuilderError::NonRepeatableSchemaDirective {
                        directive: instance.name,
                    });
                }
                self.schema.directive_instances.push(instance);
            }

            if let Some(description) = helper::description(&annotations) {
                if self.schema.description.is_some() {
                    warn!(
                        "Duplicate @description annotation for @GraphQLApi class {}, ignoring it",
                        api_class.name
                    );
                } else {
                    self.schema.description = Some(description);
                }
            }
        }
        Ok(())
    }

    fn add_custom_scalar_types(&mut self) -> Result<(), SchemaBuilderError> {
        let index = self.ctx.index;
        for annotated in index.annotations(annotations::CUSTOM_SCALAR) {
            let (AnnotationTarget::Class(class), Some(name)) =
                (annotated.target, annotated.annotation.string_value())
            else {
                continue;
            };
            if self.is_excluded(class) {
                continue;
            }
            let scalar = create_custom_scalar(&self.ctx, class, name)?;
            self.schema.add_custom_scalar_type(scalar);
        }
        Ok(())
    }

    fn add_operations(&mut self, api_class: &ClassInfo) -> Result<(), SchemaBuilderError> {
        let index = self.ctx.index;
        let group = helper::group(api_class);
        for method in index.all_methods(api_class) {
            let annotations = Annotations::for_method(method);
            let operation_type = if annotations.contains(annotations::QUERY) {
                OperationType::Query
            } else if annotations.contains(annotations::MUTATION) {
                OperationType::Mutation
            } else if annotations.contains(annotations::SUBSCRIPTION) {
                OperationType::Subscription
            } else {
                continue;
            };
            let operation = create_operation(&mut self.ctx, api_class, method, operation_type, None)?;
            debug!(
                "Adding {operation_type} {} from {}.{}",
                operation.name(),
                api_class.name,
                method.name
            );
            self.schema.add_operation(group.as_ref(), operation);
        }
        Ok(())
    }

    /// Creates every pending reference not yet in the schema, kind by kind. Returns whether
    /// anything was created, in which case new references may be pending.
    fn add_outstanding_types(&mut self) -> Result<bool, SchemaBuilderError> {
        let index = self.ctx.index;
        let mut created = 0;
        for reference_type in ReferenceType::CLOSED {
            let Some(creator) = creator_for(reference_type) else {
                continue;
            };
            for reference in self.ctx.registry.drain(creator.reference_type()) {
                if self.schema.contains(reference_type, &reference.name) {
                    continue;
                }
                let class = index.class_by_name(&reference.class_name).ok_or_else(|| {
                    SchemaBuilderError::UnresolvableReference {
                        class_name: reference.class_name.clone(),
                        name: reference.name.clone(),
                        kind: reference_type,
                    }
                })?;
                let node = creator.create(&mut self.ctx, class, &reference)?;
                self.schema.add(node);
                created += 1;
            }
        }
        trace!("Created {created} types, pending: {}", self.ctx.registry.has_pending());
        Ok(created > 0)
    }

    fn add_errors(&mut self) {
        let index = self.ctx.index;
        for annotated in index.annotations(annotations::ERROR_CODE) {
            let AnnotationTarget::Class(class) = annotated.target else {
                warn!(
                    "Ignoring @ErrorCode on {} - Wrong target, only apply to CLASS",
                    annotated.target
                );
                continue;
            };
            match annotated.annotation.string_value() {
                Some(error_code) => self.schema.add_error(ErrorInfo {
                    class_name: class.name.clone(),
                    error_code: error_code.to_string(),
                }),
                None => warn!(
                    "Ignoring @ErrorCode on {} - Annotation value is not set",
                    annotated.target
                ),
            }
        }
    }

    fn add_data_fetchers(&mut self) {
        let index = self.ctx.index;
        for annotated in index.annotations(annotations::DATA_FETCHER) {
            let AnnotationTarget::Class(class) = annotated.target else {
                continue;
            };
            let Some(for_class) = annotated
                .annotation
                .member("forClass")
                .and_then(AnnotationValue::as_str)
            else {
                warn!("Ignoring @DataFetcher on {} - forClass is not set", class.name);
                continue;
            };
            let data_fetcher = local_name(&class.name).to_string();
            info!("Adding custom datafetcher for {for_class} [{data_fetcher}]");
            let wrapped = annotated
                .annotation
                .member("isWrapped")
                .and_then(AnnotationValue::as_bool)
                .unwrap_or(false);
            if wrapped {
                self.schema
                    .add_wrapped_data_fetcher(for_class.to_string(), data_fetcher);
            } else {
                self.schema
                    .add_field_data_fetcher(for_class.to_string(), data_fetcher);
            }
        }
    }

    /// Links the schema against the federation specification and gives every element it
    /// defines its name in the schema. Elements imported by links to other specifications are
    /// renamed after their import.
    fn add_link_imported_names(&mut self) -> Result<(), SchemaBuilderError> {
        let mut resolver = LinkResolver::new(self.ctx.config.federation.enabled);
        resolver.link(&self.schema.directive_instances)?;
        resolver.validate()?;
        resolver.check_usage(
            self.schema
                .all_directive_instances()
                .into_iter()
                .map(|(_, instance)| instance),
        )?;
        if resolver.state() != LinkState::Ready {
            return Ok(());
        }

        let directives: Vec<String> = self
            .schema
            .directive_types
            .values()
            .filter(|d| d.class_name.as_deref().is_some_and(federation::is_federation_class))
            .map(|d| d.name.clone())
            .collect();
        resolver.check_definitions(directives.iter().map(String::as_str))?;
        for name in directives {
            self.schema
                .rename_directive(&name, &resolver.resolve(&name, true));
        }

        let scalars: Vec<String> = self
            .schema
            .custom_scalar_types
            .values()
            .filter(|s| federation::is_federation_class(&s.class_name))
            .map(|s| s.name.clone())
            .collect();
        for name in scalars {
            self.schema.rename_type(
                ReferenceType::Scalar,
                &name,
                &resolver.resolve(&name, false),
            );
        }

        let enums: Vec<String> = self
            .schema
            .enums
            .values()
            .filter(|e| federation::is_federation_class(&e.class_name))
            .map(|e| e.name.clone())
            .collect();
        for name in enums {
            self.schema
                .rename_type(ReferenceType::Enum, &name, &resolver.resolve(&name, false));
        }

        for import in resolver.other_imports() {
            let name = import.element.as_str();
            let imported = import.imported_name().as_str();
            if import.is_directive {
                let from_federation = self
                    .schema
                    .directive_types
                    .get(name)
                    .and_then(|d| d.class_name.as_deref())
                    .is_some_and(federation::is_federation_class);
                if !from_federation {
                    self.schema.rename_directive(name, imported);
                }
                continue;
            }
            for reference_type in ReferenceType::CLOSED.into_iter().chain([ReferenceType::Scalar]) {
                let own_type = self
                    .schema
                    .type_class_name(reference_type, name)
                    .is_some_and(|class_name| !federation::is_federation_class(class_name));
                if own_type {
                    debug!(name, imported, "renaming linked type");
                    self.schema.rename_type(reference_type, name, imported);
                }
            }
        }
        Ok(())
    }
}
