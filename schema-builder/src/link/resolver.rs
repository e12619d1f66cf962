//! Resolves the `@link` applications of a schema and decides the name of every linked element.
use itertools::Itertools;
use tracing::info;

use crate::helper::scalars;
use crate::link::Import;
use crate::link::Link;
use crate::link::LinkError;
use crate::link::NAMESPACE_SEPARATOR;
use crate::link::federation;
use crate::link::link_url;
use crate::link::parse_imports;
use crate::link::spec::Url;
use crate::link::validate_namespace;
use crate::model::DirectiveInstance;

/// Where the resolver is in handling a schema's links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// No federation link was found (or federation is disabled). Names pass through unchanged.
    Unconfigured,
    /// Exactly one federation link was found and its version accepted.
    SpecLinked,
    /// The federation imports were validated against the linked version.
    Ready,
}

/// Decides the final name of federation elements.
///
/// Built with the federation flag of the configuration. When disabled, the resolver stays
/// [`LinkState::Unconfigured`] and [`LinkResolver::resolve`] returns names unchanged.
#[derive(Clone, Debug)]
pub struct LinkResolver {
    enabled: bool,
    state: LinkState,
    federation: Option<Link>,
    /// Imports of the links to other specifications. They are not version gated.
    other_imports: Vec<Import>,
}

impl LinkResolver {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: LinkState::Unconfigured,
            federation: None,
            other_imports: Vec::new(),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn federation_link(&self) -> Option<&Link> {
        self.federation.as_ref()
    }

    pub fn other_imports(&self) -> &[Import] {
        &self.other_imports
    }

    /// Reads the `@link` applications among the schema directives.
    ///
    /// At most one of them may link the federation specification, at major version 2. Links to
    /// other specifications only contribute their imports.
    pub fn link(&mut self, schema_directives: &[DirectiveInstance]) -> Result<(), LinkError> {
        if !self.enabled || self.state != LinkState::Unconfigured {
            return Ok(());
        }
        let links: Vec<(&DirectiveInstance, &str)> = schema_directives
            .iter()
            .filter(|d| d.name == super::DEFAULT_LINK_NAME.as_str())
            .map(|d| link_url(d).map(|url| (d, url)))
            .collect::<Result<_, LinkError>>()?;
        let (federation_links, other_links): (Vec<_>, Vec<_>) = links
            .into_iter()
            .partition(|(_, url)| url.starts_with(federation::FEDERATION_URL_PREFIX));

        if federation_links.len() > 1 {
            return Err(LinkError::MultipleSpecLinks(
                federation_links.iter().map(|(d, _)| d).join(", "),
            ));
        }

        for (directive, url) in other_links {
            self.other_imports.extend(parse_imports(directive, url)?);
        }

        let Some((directive, raw_url)) = federation_links.into_iter().next() else {
            return Ok(());
        };
        let url = raw_url
            .parse::<Url>()
            .map_err(|_| LinkError::UnsupportedFederationVersion(raw_url.to_string()))?;
        if url.version.major != federation::BASE_VERSION.major {
            return Err(LinkError::UnsupportedFederationVersion(raw_url.to_string()));
        }
        if let Some(alias) = directive.value("as").and_then(|v| v.as_str()) {
            validate_namespace(alias, raw_url)?;
        }
        let link = Link::from_directive_instance(directive, url)?;
        info!(url = %link.url, version = %link.url.version, "linked federation specification");
        self.federation = Some(link);
        self.state = LinkState::SpecLinked;
        Ok(())
    }

    /// Checks every federation import against the linked version.
    pub fn validate(&mut self) -> Result<(), LinkError> {
        if self.state != LinkState::SpecLinked {
            return Ok(());
        }
        let Some(link) = &self.federation else {
            return Ok(());
        };
        for import in &link.imports {
            if !import.is_directive && scalars::is_built_in_scalar(&import.element) {
                continue;
            }
            let Some(export) = federation::export(&import.element, import.is_directive) else {
                return Err(LinkError::UnknownImport {
                    import: import.element_display_name().to_string(),
                    url: link.url.to_string(),
                });
            };
            if !link.url.version.satisfies(&export.since) {
                return Err(LinkError::UnsupportedLinkImport {
                    import: import.element_display_name().to_string(),
                    required: export.since.clone(),
                    url: link.url.to_string(),
                });
            }
        }
        self.state = LinkState::Ready;
        Ok(())
    }

    /// The name under which `name` appears in the schema.
    ///
    /// Explicit imports use their alias (or their own name), the link support types get the
    /// `link` namespace, other federation elements get the `federation` namespace whatever the
    /// `as` argument of the link, and anything else keeps its name. Built-in scalars are never
    /// renamed.
    pub fn resolve(&self, name: &str, is_directive: bool) -> String {
        let Some(link) = self.federation.as_ref().filter(|_| self.enabled) else {
            return name.to_string();
        };
        if !is_directive && scalars::is_built_in_scalar(name) {
            return name.to_string();
        }
        let other_import = || {
            self.other_imports
                .iter()
                .find(|i| i.is_directive == is_directive && i.element == name)
        };
        if let Some(import) = link.import(name, is_directive).or_else(other_import) {
            return import.imported_name().to_string();
        }
        if !is_directive && federation::LINK_SUPPORT_TYPES.contains(&name) {
            return format!("{}{NAMESPACE_SEPARATOR}{name}", federation::LINK_NAMESPACE);
        }
        if federation::export(name, is_directive).is_some() {
            return format!("{}{NAMESPACE_SEPARATOR}{name}", federation::FEDERATION_NAMESPACE);
        }
        name.to_string()
    }

    /// Fails on the first directive the linked version exports that `defined`, the names of
    /// the federation directive types of the schema, does not contain.
    pub fn check_definitions<'a>(
        &self,
        defined: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), LinkError> {
        if self.state != LinkState::Ready {
            return Ok(());
        }
        let Some(link) = &self.federation else {
            return Ok(());
        };
        let defined: Vec<&str> = defined.into_iter().collect();
        let missing = federation::FEDERATION_EXPORTS.iter().find(|export| {
            export.is_directive
                && link.url.version.satisfies(&export.since)
                && !defined.contains(&export.name)
        });
        match missing {
            Some(export) => Err(LinkError::MissingDefinition {
                directive: export.name.to_string(),
                url: link.url.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Fails on the first applied directive that only exists in later versions of the
    /// specification but was not imported.
    pub fn check_usage<'a>(
        &self,
        applied: impl IntoIterator<Item = &'a DirectiveInstance>,
    ) -> Result<(), LinkError> {
        let Some(link) = &self.federation else {
            return Ok(());
        };
        for directive in applied {
            let from_federation = directive
                .class_name
                .as_deref()
                .is_some_and(federation::is_federation_class);
            if !from_federation {
                continue;
            }
            let gated = federation::export(&directive.name, true).is_some_and(|e| e.is_gated());
            if gated && link.import(&directive.name, true).is_none() {
                return Err(LinkError::UsedButNotImported {
                    directive: directive.name.clone(),
                    url: link.url.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use serde_json::json;

    use super::*;

    fn link(values: Value) -> DirectiveInstance {
        DirectiveInstance {
            name: "link".to_string(),
            class_name: Some("graphql.federation.link.Link".to_string()),
            values: serde_json::from_value(values).unwrap(),
        }
    }

    fn resolver(values: Value) -> Result<LinkResolver, LinkError> {
        let mut resolver = LinkResolver::new(true);
        resolver.link(&[link(values)])?;
        resolver.validate()?;
        Ok(resolver)
    }

    #[test]
    fn walks_through_the_states() {
        let mut resolver = LinkResolver::new(true);
        assert_eq!(resolver.state(), LinkState::Unconfigured);
        resolver
            .link(&[link(json!({ "url": "https://specs.apollo.dev/federation/v2.0", "import": ["@key"] }))])
            .unwrap();
        assert_eq!(resolver.state(), LinkState::SpecLinked);
        assert_eq!(
            resolver.federation_link().map(|link| link.url.to_string()).as_deref(),
            Some("https://specs.apollo.dev/federation/v2.0")
        );
        resolver.validate().unwrap();
        assert_eq!(resolver.state(), LinkState::Ready);
    }

    #[test]
    fn unlinked_and_disabled_resolvers_pass_names_through() {
        let unlinked = LinkResolver::new(true);
        assert_eq!(unlinked.resolve("key", true), "key");

        let mut disabled = LinkResolver::new(false);
        disabled
            .link(&[link(json!({ "url": "https://specs.apollo.dev/federation/v2.5" }))])
            .unwrap();
        assert_eq!(disabled.state(), LinkState::Unconfigured);
        assert_eq!(disabled.resolve("key", true), "key");
    }

    #[test]
    fn unimported_elements_get_the_default_namespaces() {
        let resolver = resolver(json!({
            "url": "https://specs.apollo.dev/federation/v2.1",
            "import": [{ "name": "@composeDirective", "as": "@compose" }, "FieldSet"],
        }))
        .unwrap();
        assert_eq!(resolver.resolve("composeDirective", true), "compose");
        assert_eq!(resolver.resolve("key", true), "federation__key");
        assert_eq!(resolver.resolve("FieldSet", false), "FieldSet");
        assert_eq!(resolver.resolve("Import", false), "link__Import");
        assert_eq!(resolver.resolve("Purpose", false), "link__Purpose");
        assert_eq!(resolver.resolve("Widget", false), "Widget");
        assert_eq!(resolver.resolve("String", false), "String");
    }

    #[test]
    fn explicit_namespaces_keep_the_federation_prefix() {
        let resolver = resolver(json!({
            "url": "https://specs.apollo.dev/federation/v2.0",
            "as": "fed",
            "import": [{ "name": "@shareable", "as": "@share" }],
        }))
        .unwrap();
        assert_eq!(resolver.resolve("key", true), "federation__key");
        assert_eq!(resolver.resolve("FieldSet", false), "federation__FieldSet");
        assert_eq!(resolver.resolve("shareable", true), "share");
        assert_eq!(resolver.resolve("Import", false), "link__Import");
    }

    #[test]
    fn built_in_scalars_are_never_renamed_even_when_imported() {
        let resolver = resolver(json!({
            "url": "https://specs.apollo.dev/federation/v2.0",
            "import": [{ "name": "String", "as": "Text" }],
        }))
        .unwrap();
        assert_eq!(resolver.resolve("String", false), "String");
    }

    #[test]
    fn other_links_contribute_imports() {
        let mut resolver = LinkResolver::new(true);
        resolver
            .link(&[
                link(json!({ "url": "https://specs.apollo.dev/federation/v2.0" })),
                link(json!({
                    "url": "https://specs.example.com/caching/v1.0",
                    "import": [{ "name": "@cached", "as": "@cache" }],
                })),
            ])
            .unwrap();
        resolver.validate().unwrap();
        assert_eq!(resolver.resolve("cached", true), "cache");
        assert_eq!(resolver.resolve("Duration", false), "Duration");
    }

    #[test]
    fn other_links_need_no_version() {
        let mut resolver = LinkResolver::new(true);
        resolver
            .link(&[
                link(json!({ "url": "https://specs.apollo.dev/federation/v2.0" })),
                link(json!({
                    "url": "https://example.com/caching",
                    "import": ["@cached", { "name": "Duration", "as": "Ttl" }],
                })),
                link(json!({ "url": "https://example.com/other" })),
            ])
            .unwrap();
        resolver.validate().unwrap();
        assert_eq!(resolver.other_imports().len(), 2);
        assert_eq!(resolver.resolve("cached", true), "cached");
        assert_eq!(resolver.resolve("Duration", false), "Ttl");
    }

    #[test]
    fn rejects_a_second_federation_link() {
        let mut resolver = LinkResolver::new(true);
        let error = resolver
            .link(&[
                link(json!({ "url": "https://specs.apollo.dev/federation/v2.0" })),
                link(json!({ "url": "https://specs.apollo.dev/federation/v2.3" })),
            ])
            .unwrap_err();
        assert_snapshot!(error.to_string(), @r#"Multiple "link" directives found on schema: @link(url: "https://specs.apollo.dev/federation/v2.0"), @link(url: "https://specs.apollo.dev/federation/v2.3")"#);
    }

    #[test]
    fn rejects_unsupported_versions() {
        for url in [
            "https://specs.apollo.dev/federation/latest",
            "https://specs.apollo.dev/federation/v1.0",
            "https://specs.apollo.dev/federation/v3.0",
        ] {
            assert_eq!(
                resolver(json!({ "url": url })).unwrap_err(),
                LinkError::UnsupportedFederationVersion(url.to_string())
            );
        }
    }

    #[test]
    fn rejects_imports_the_specification_does_not_define() {
        let error = resolver(json!({
            "url": "https://specs.apollo.dev/federation/v2.0",
            "import": ["@cached"],
        }))
        .unwrap_err();
        assert_snapshot!(error.to_string(), @"Import @cached is not defined by https://specs.apollo.dev/federation/v2.0");
    }

    #[test]
    fn linked_directives_must_be_defined() {
        let all = federation::FEDERATION_EXPORTS
            .iter()
            .filter(|e| e.is_directive)
            .map(|e| e.name);
        let until_2_5 = all
            .clone()
            .filter(|name| !matches!(*name, "policy" | "context" | "fromContext" | "cost" | "listSize"));

        let v2_5 = resolver(json!({ "url": "https://specs.apollo.dev/federation/v2.5" })).unwrap();
        v2_5.check_definitions(until_2_5.clone()).unwrap();
        v2_5.check_definitions(all.clone()).unwrap();

        let v2_6 = resolver(json!({ "url": "https://specs.apollo.dev/federation/v2.6" })).unwrap();
        let error = v2_6.check_definitions(until_2_5).unwrap_err();
        assert_snapshot!(error.to_string(), @"Directive policy is defined in the Federation spec https://specs.apollo.dev/federation/v2.6, but not found in the schema");

        LinkResolver::new(true).check_definitions([]).unwrap();
    }

    #[test]
    fn gated_directives_must_be_imported_to_be_used() {
        let resolver = resolver(json!({ "url": "https://specs.apollo.dev/federation/v2.5" })).unwrap();
        let authenticated = DirectiveInstance {
            name: "authenticated".to_string(),
            class_name: Some("graphql.federation.Authenticated".to_string()),
            values: Default::default(),
        };
        let key = DirectiveInstance {
            name: "key".to_string(),
            class_name: Some("graphql.federation.Key".to_string()),
            values: Default::default(),
        };
        resolver.check_usage([&key]).unwrap();
        let error = resolver.check_usage([&key, &authenticated]).unwrap_err();
        assert_snapshot!(error.to_string(), @"Directive @authenticated from https://specs.apollo.dev/federation/v2.5 is used in the schema but is not imported");
    }
}
