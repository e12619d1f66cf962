use std::collections::HashMap;
use std::collections::VecDeque;

use indexmap::IndexMap;

use crate::model::Reference;
use crate::model::ReferenceType;

/// Every reference discovered during one build, partitioned by kind and keyed by canonical name,
/// along with the references whose node has not been created yet.
///
/// One registry belongs to exactly one build.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    references: HashMap<ReferenceType, IndexMap<String, Reference>>,
    pending: HashMap<ReferenceType, VecDeque<Reference>>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reference already known for the canonical name and kind of `reference`, or
    /// records `reference` and queues it for creation.
    pub fn reserve(&mut self, reference: Reference) -> Reference {
        let known = self.references.entry(reference.reference_type).or_default();
        let canonical_name = reference.canonical_name();
        if let Some(existing) = known.get(&canonical_name) {
            return existing.clone();
        }
        known.insert(canonical_name, reference.clone());
        self.pending
            .entry(reference.reference_type)
            .or_default()
            .push_back(reference.clone());
        reference
    }

    /// Takes the references of `reference_type` queued since the last drain. References reserved
    /// afterwards go to a fresh queue.
    pub fn drain(&mut self, reference_type: ReferenceType) -> VecDeque<Reference> {
        self.pending.remove(&reference_type).unwrap_or_default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.values().any(|queue| !queue.is_empty())
    }

    pub fn get(&self, reference_type: ReferenceType, canonical_name: &str) -> Option<&Reference> {
        self.references.get(&reference_type)?.get(canonical_name)
    }

    /// All references of `reference_type`, in reservation order.
    pub fn references(&self, reference_type: ReferenceType) -> impl Iterator<Item = &Reference> {
        self.references
            .get(&reference_type)
            .into_iter()
            .flat_map(|known| known.values())
    }

    pub fn clear(&mut self) {
        self.references.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::index::TypeSignature;

    #[test]
    fn reserving_twice_returns_the_first_reference() {
        let mut registry = ReferenceRegistry::new();
        let first = registry.reserve(Reference::new("com.example.Book", "Book", ReferenceType::Type));
        let second =
            registry.reserve(Reference::new("com.example.Book", "Renamed", ReferenceType::Type));
        assert_eq!(first, second);
        assert_eq!(second.name, "Book");
        assert_eq!(registry.drain(ReferenceType::Type).len(), 1);
    }

    #[test]
    fn kinds_are_partitioned() {
        let mut registry = ReferenceRegistry::new();
        registry.reserve(Reference::new("com.example.Book", "Book", ReferenceType::Type));
        registry.reserve(Reference::new("com.example.Book", "BookInput", ReferenceType::Input));
        assert_eq!(registry.drain(ReferenceType::Type).len(), 1);
        assert_eq!(registry.drain(ReferenceType::Input).len(), 1);
        assert!(registry.drain(ReferenceType::Enum).is_empty());
    }

    #[test]
    fn type_arguments_are_part_of_the_canonical_name() {
        let mut registry = ReferenceRegistry::new();
        let mut books = Reference::new("com.example.Page", "Page_Book", ReferenceType::Type);
        books.type_arguments = vec![TypeSignature::class("com.example.Book")];
        let mut authors = Reference::new("com.example.Page", "Page_Author", ReferenceType::Type);
        authors.type_arguments = vec![TypeSignature::class("com.example.Author")];
        registry.reserve(books);
        registry.reserve(authors);
        assert_eq!(registry.references(ReferenceType::Type).count(), 2);
        assert!(
            registry
                .get(ReferenceType::Type, "com.example.Page<com.example.Author>")
                .is_some()
        );
    }

    #[test]
    fn drained_queues_start_over() {
        let mut registry = ReferenceRegistry::new();
        registry.reserve(Reference::new("com.example.Book", "Book", ReferenceType::Type));
        let drained = registry.drain(ReferenceType::Type);
        assert_eq!(drained.len(), 1);
        assert!(!registry.has_pending());

        registry.reserve(Reference::new("com.example.Author", "Author", ReferenceType::Type));
        registry.reserve(Reference::new("com.example.Book", "Book", ReferenceType::Type));
        let drained: Vec<_> = registry
            .drain(ReferenceType::Type)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(drained, ["Author"]);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = ReferenceRegistry::new();
        registry.reserve(Reference::new("com.example.Book", "Book", ReferenceType::Type));
        registry.clear();
        assert!(!registry.has_pending());
        assert!(registry.get(ReferenceType::Type, "com.example.Book").is_none());
    }
}
