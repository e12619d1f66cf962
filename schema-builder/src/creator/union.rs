use tracing::debug;

use crate::annotations;
use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Creator;
use crate::creator::Direction;
use crate::error::SchemaBuilderError;
use crate::helper;
use crate::index::ClassInfo;
use crate::index::ClassKind;
use crate::index::TypeSignature;
use crate::model::DirectiveLocation;
use crate::model::Reference;
use crate::model::ReferenceType;
use crate::model::SchemaNode;
use crate::model::UnionType;

/// Creates unions from interface declarations carrying `Union`. The members are the classes
/// known to implement the interface.
pub(crate) struct UnionCreator;

impl Creator for UnionCreator {
    fn reference_type(&self) -> ReferenceType {
        ReferenceType::Union
    }

    fn create(
        &self,
        ctx: &mut BuildContext<'_>,
        class: &ClassInfo,
        reference: &Reference,
    ) -> Result<SchemaNode, SchemaBuilderError> {
        debug!("Creating union {} from {}", reference.name, class.name);
        let index = ctx.index;
        let annotations = Annotations::for_class(class);

        let mut members = Vec::new();
        for member in index.known_implementors(&class.name) {
            if member.kind != ClassKind::Class
                || !member.type_parameters.is_empty()
                || member.has_annotation(annotations::IGNORE)
            {
                continue;
            }
            let (member, _) = ctx.create_reference(
                Direction::Out,
                &TypeSignature::class(&member.name),
                &Annotations::default(),
                &Bindings::new(),
                &format!("member of union {}", class.name),
            )?;
            members.push(member);
        }

        Ok(SchemaNode::Union(UnionType {
            class_name: class.name.clone(),
            name: reference.name.clone(),
            description: helper::description(&annotations),
            members,
            directive_instances: ctx.directives.resolve(
                &annotations,
                DirectiveLocation::Union,
                &reference.name,
            )?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SymbolIndex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::index::AnnotationInstance;
    use crate::index::Index;

    #[test]
    fn union_members_are_the_implementing_classes() {
        let index = Index::new([
            ClassInfo::new("com.example.SearchResult")
                .of_kind(ClassKind::Interface)
                .annotated(AnnotationInstance::new(annotations::UNION)),
            ClassInfo::new("com.example.Book").implements("com.example.SearchResult"),
            ClassInfo::new("com.example.Author").implements("com.example.SearchResult"),
            ClassInfo::new("com.example.Hidden")
                .implements("com.example.SearchResult")
                .annotated(AnnotationInstance::new(annotations::IGNORE)),
        ]);
        let config = Config::default();
        let mut ctx = BuildContext::new(&index, &config);
        let class = index.class_by_name("com.example.SearchResult").unwrap();
        let reference = Reference::new(&class.name, "SearchResult", ReferenceType::Union);

        let SchemaNode::Union(union) = UnionCreator.create(&mut ctx, class, &reference).unwrap()
        else {
            panic!("expected a union");
        };
        let members: Vec<_> = union.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(members, ["Book", "Author"]);
    }
}
