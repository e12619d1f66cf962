//! The federation vocabulary: what each version of the specification exports.
use crate::link::spec::Version;

/// Metadata declarations in this package define the federation directives and their types.
pub const FEDERATION_ANNOTATIONS_PACKAGE: &str = "graphql.federation.";

/// The prefix of every federation specification url.
pub const FEDERATION_URL_PREFIX: &str = "https://specs.apollo.dev/federation/";

/// The version every federation 2 link supports.
pub const BASE_VERSION: Version = Version::new(2, 0);

/// Types the link specification itself defines. They are namespaced with `link` rather than
/// with the federation namespace.
pub const LINK_SUPPORT_TYPES: [&str; 2] = ["Import", "Purpose"];

/// The default namespace of the link specification's own types.
pub const LINK_NAMESPACE: &str = "link";

/// The namespace of federation elements that are not explicitly imported.
pub const FEDERATION_NAMESPACE: &str = "federation";

/// An element defined by the federation specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Export {
    pub name: &'static str,
    pub is_directive: bool,
    /// The first version defining this element.
    pub since: Version,
}

impl Export {
    /// Whether this element only exists in versions after [`BASE_VERSION`].
    pub fn is_gated(&self) -> bool {
        self.since > BASE_VERSION
    }
}

const fn directive(name: &'static str, major: u32, minor: u32) -> Export {
    Export {
        name,
        is_directive: true,
        since: Version::new(major, minor),
    }
}

const fn scalar(name: &'static str, major: u32, minor: u32) -> Export {
    Export {
        name,
        is_directive: false,
        since: Version::new(major, minor),
    }
}

pub const FEDERATION_EXPORTS: [Export; 22] = [
    directive("key", 2, 0),
    directive("requires", 2, 0),
    directive("provides", 2, 0),
    directive("external", 2, 0),
    directive("tag", 2, 0),
    directive("extends", 2, 0),
    directive("shareable", 2, 0),
    directive("inaccessible", 2, 0),
    directive("override", 2, 0),
    scalar("FieldSet", 2, 0),
    directive("composeDirective", 2, 1),
    directive("interfaceObject", 2, 4),
    directive("authenticated", 2, 5),
    directive("requiresScopes", 2, 5),
    scalar("Scope", 2, 5),
    directive("policy", 2, 6),
    scalar("Policy", 2, 6),
    directive("context", 2, 8),
    directive("fromContext", 2, 8),
    scalar("ContextFieldValue", 2, 8),
    directive("cost", 2, 9),
    directive("listSize", 2, 9),
];

/// The federation element called `name`, if the specification defines one.
pub fn export(name: &str, is_directive: bool) -> Option<&'static Export> {
    FEDERATION_EXPORTS
        .iter()
        .find(|e| e.is_directive == is_directive && e.name == name)
}

/// Whether `class_name` is a metadata declaration of the federation package.
pub fn is_federation_class(class_name: &str) -> bool {
    class_name.starts_with(FEDERATION_ANNOTATIONS_PACKAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gated_exports_are_the_ones_added_after_the_base_version() {
        assert!(!export("key", true).unwrap().is_gated());
        assert!(!export("FieldSet", false).unwrap().is_gated());
        assert_eq!(export("policy", true).unwrap().since, Version::new(2, 6));
        assert!(export("requiresScopes", true).unwrap().is_gated());
        assert!(export("key", false).is_none());
        assert!(export("Widget", false).is_none());
    }
}
