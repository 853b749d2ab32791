//! Token parsing and on-disk placement of entities.
//!
//! A token is the fully-qualified key of a function, resource or type:
//!
//! ```text
//! namespace:module[/submodule]:Name
//! ```
//!
//! The entity is written to `module/<kind>/Name.<ext>`, or to
//! `module/submodule/<kind>/Name.<ext>` when the submodule differs from the
//! local name. The comparison is case-insensitive but accent-sensitive, so
//! `pkg:storage/bucket:Bucket` collapses to `storage/resources/Bucket`.
//!
//! # Path-to-token asymmetry
//!
//! The placement is one-way. The namespace is dropped and the collapse loses
//! whether a submodule was present, so a path cannot be decoded back into a
//! token. Implode never tries: it discovers entity files with the fixed glob
//! shape `**/<kind>/*.<ext>` and takes the token from the `$token` field
//! stored inside each file. Changing the layout rules therefore never breaks
//! reading an existing tree.

use std::fmt;

use unicase::UniCase;

use crate::error::{SplitError, SplitResult};

/// The three token-addressed maps of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Functions,
    Resources,
    Types,
}

impl EntityKind {
    /// All kinds, in the order explode and implode visit them.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Functions,
        EntityKind::Resources,
        EntityKind::Types,
    ];

    /// Top-level document key holding this kind's map.
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Functions => "functions",
            EntityKind::Resources => "resources",
            EntityKind::Types => "types",
        }
    }

    /// Directory name entity files of this kind are placed in.
    ///
    /// Identical to [`key`](Self::key); kept separate because the two are
    /// different contracts (document shape vs. file layout).
    pub fn dir_name(&self) -> &'static str {
        self.key()
    }

    /// Find the kind stored under a top-level document key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    fn singular(&self) -> &'static str {
        match self {
            EntityKind::Functions => "function",
            EntityKind::Resources => "resource",
            EntityKind::Types => "type",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A parsed `namespace:module[/submodule]:name` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    namespace: &'a str,
    module: &'a str,
    submodule: Option<&'a str>,
    name: &'a str,
}

impl<'a> Token<'a> {
    /// Parse a token string.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::MalformedToken`] if the token does not split
    /// into exactly three `:`-separated parts, if the module or name is
    /// empty, or if any part would escape its directory (`.`, `..`, `\`).
    pub fn parse(token: &'a str) -> SplitResult<Self> {
        let parts: Vec<&str> = token.split(':').collect();
        let [namespace, module_path, name] = parts[..] else {
            return Err(SplitError::malformed_token(
                token,
                format!("expected 3 ':'-separated parts, got {}", parts.len()),
            ));
        };

        if name.is_empty() {
            return Err(SplitError::malformed_token(token, "empty name"));
        }
        if !is_safe_segment(name) {
            return Err(SplitError::malformed_token(
                token,
                format!("name '{}' is not a valid file name", name),
            ));
        }

        let (module, submodule) = match module_path.split_once('/') {
            Some((module, submodule)) => (module, Some(submodule)),
            None => (module_path, None),
        };
        if module.is_empty() {
            return Err(SplitError::malformed_token(token, "empty module"));
        }
        if !module_path.split('/').all(is_safe_segment) {
            return Err(SplitError::malformed_token(
                token,
                format!("module path '{}' is not a valid directory", module_path),
            ));
        }

        Ok(Self {
            namespace,
            module,
            submodule,
            name,
        })
    }

    /// The package namespace. Not part of the on-disk path.
    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    pub fn module(&self) -> &'a str {
        self.module
    }

    pub fn submodule(&self) -> Option<&'a str> {
        self.submodule
    }

    /// The local name, which is also the file stem.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the submodule folds into the module directory.
    ///
    /// True when there is no submodule, or when it equals the local name
    /// ignoring case (`storage/bucket:Bucket`).
    pub fn collapses(&self) -> bool {
        match self.submodule {
            None => true,
            Some(submodule) => UniCase::new(submodule) == UniCase::new(self.name),
        }
    }

    /// Directory holding this token's entity file, without a trailing slash.
    pub fn directory(&self, kind: EntityKind) -> String {
        match self.submodule {
            Some(submodule) if !self.collapses() => {
                format!("{}/{}/{}", self.module, submodule, kind.dir_name())
            }
            _ => format!("{}/{}", self.module, kind.dir_name()),
        }
    }

    /// Relative path of the entity file for this token.
    pub fn entity_path(&self, kind: EntityKind, extension: &str) -> String {
        format!("{}/{}.{}", self.directory(kind), self.name, extension)
    }
}

/// A path segment is safe when it names exactly one directory entry.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_module_only() {
        let token = Token::parse("aws:s3:Bucket").unwrap();
        assert_eq!(token.namespace(), "aws");
        assert_eq!(token.module(), "s3");
        assert_eq!(token.submodule(), None);
        assert_eq!(token.name(), "Bucket");
        assert!(token.collapses());
    }

    #[test]
    fn test_parse_with_submodule() {
        let token = Token::parse("gcp:storage/acl:BucketAcl").unwrap();
        assert_eq!(token.module(), "storage");
        assert_eq!(token.submodule(), Some("acl"));
        assert!(!token.collapses());
    }

    #[test]
    fn test_submodule_matching_name_collapses() {
        let token = Token::parse("pkg:storage/bucket:Bucket").unwrap();
        assert_eq!(
            token.entity_path(EntityKind::Resources, "yaml"),
            "storage/resources/Bucket.yaml"
        );
    }

    #[test]
    fn test_submodule_differing_from_name_nests() {
        let token = Token::parse("pkg:storage/acl:BucketAcl").unwrap();
        assert_eq!(
            token.entity_path(EntityKind::Resources, "yaml"),
            "storage/acl/resources/BucketAcl.yaml"
        );
    }

    #[test]
    fn test_module_only_path_per_kind() {
        let token = Token::parse("pkg:index:getThing").unwrap();
        assert_eq!(token.directory(EntityKind::Functions), "index/functions");
        assert_eq!(token.directory(EntityKind::Resources), "index/resources");
        assert_eq!(token.directory(EntityKind::Types), "index/types");
    }

    #[test]
    fn test_collapse_is_accent_sensitive() {
        let folded = Token::parse("pkg:mod/ÉTÉ:été").unwrap();
        assert!(folded.collapses());

        let accented = Token::parse("pkg:mod/ete:été").unwrap();
        assert!(!accented.collapses());
        assert_eq!(accented.directory(EntityKind::Types), "mod/ete/types");
    }

    #[test]
    fn test_namespace_not_in_path() {
        let a = Token::parse("one:index:Thing").unwrap();
        let b = Token::parse("two:index:Thing").unwrap();
        assert_eq!(
            a.entity_path(EntityKind::Types, "json"),
            b.entity_path(EntityKind::Types, "json")
        );
    }

    #[test]
    fn test_nested_submodule_kept_whole() {
        let token = Token::parse("pkg:a/b/c:Name").unwrap();
        assert_eq!(token.submodule(), Some("b/c"));
        assert_eq!(token.directory(EntityKind::Functions), "a/b/c/functions");
    }

    #[test]
    fn test_malformed_tokens() {
        for bad in [
            "",
            "Bucket",
            "pkg:Bucket",
            "pkg:a:b:c",
            "pkg::Bucket",
            "pkg:storage:",
            "pkg:/acl:Bucket",
            "pkg:storage/:Bucket",
            "pkg:..:Bucket",
            "pkg:storage/..:Bucket",
            "pkg:storage:..",
            "pkg:storage:a\\b",
        ] {
            let err = Token::parse(bad).unwrap_err();
            assert!(
                matches!(err, SplitError::MalformedToken { .. }),
                "expected MalformedToken for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_entity_kind_keys() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(EntityKind::from_key("provider"), None);
        assert_eq!(EntityKind::Types.to_string(), "type");
    }

    proptest! {
        #[test]
        fn prop_case_variant_submodule_collapses(name in "[A-Za-z][A-Za-z0-9]{0,12}") {
            let raw = format!("pkg:mod/{}:{}", name.to_lowercase(), name);
            let token = Token::parse(&raw).unwrap();
            prop_assert!(token.collapses());
            prop_assert_eq!(
                token.entity_path(EntityKind::Resources, "json"),
                format!("mod/resources/{}.json", name)
            );
        }

        #[test]
        fn prop_stem_is_local_name(
            module in "[a-z][a-z0-9]{0,8}",
            name in "[A-Za-z][A-Za-z0-9]{0,12}",
        ) {
            let raw = format!("ns:{}:{}", module, name);
            let token = Token::parse(&raw).unwrap();
            let path = token.entity_path(EntityKind::Functions, "yaml");
            let prefix = format!("{}/functions/", module);
            let suffix = format!("/{}.yaml", name);
            prop_assert!(path.starts_with(&prefix));
            prop_assert!(path.ends_with(&suffix));
        }
    }
}
