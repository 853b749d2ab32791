//! Implode: rebuild a document from an exploded tree.
//!
//! Discovery only ever uses fixed glob shapes (`base.*`, `language.*.*`,
//! `**/<kind>/*.<ext>`). Entity identity comes from the `$token` field inside
//! each file, never from the directory it was found in.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::description::{DescriptionSplitter, DESCRIPTION_KEY, SIDECAR_EXTENSION};
use crate::document::{
    language_name, sidecar_path, type_name, BASE_STEM, CONFIG_KEY, LANGUAGE_KEY, PROVIDER_KEY,
    TOKEN_KEY,
};
use crate::encoding::Encoding;
use crate::error::{SplitError, SplitResult};
use crate::store::FileStore;
use crate::token::{EntityKind, Token};

/// Rebuilds documents from file trees written by [`Exploder`](crate::Exploder).
///
/// Both encodings are read regardless of which one wrote the tree; each
/// file's encoding comes from its extension.
#[derive(Debug, Clone, Default)]
pub struct Imploder {
    splitter: DescriptionSplitter,
}

impl Imploder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassemble the document stored in `store`.
    ///
    /// # Errors
    ///
    /// - [`SplitError::MissingBaseFile`] when there is no `base.*`
    /// - [`SplitError::AmbiguousEncoding`] when two files claim one slot
    /// - [`SplitError::UnknownEncoding`] for an unsupported extension
    /// - [`SplitError::MissingToken`] / [`SplitError::DuplicateToken`] for
    ///   entity files without, or sharing, a `$token`
    pub fn implode<S: FileStore + ?Sized>(&self, store: &S) -> SplitResult<Value> {
        let base_path = locate_slot(store, BASE_STEM)?.ok_or(SplitError::MissingBaseFile)?;
        let mut document = read_object(store, &base_path)?;

        for key in [CONFIG_KEY, PROVIDER_KEY] {
            if let Some(path) = locate_slot(store, key)? {
                document.insert(key.to_string(), read_value(store, &path)?);
            }
        }

        if let Some(overlays) = read_languages(store)? {
            document.insert(LANGUAGE_KEY.to_string(), Value::Object(overlays));
        }

        for kind in EntityKind::ALL {
            if let Some(entities) = self.read_entities(store, kind)? {
                debug!(kind = %kind, count = entities.len(), "Collected entities");
                document.insert(kind.key().to_string(), Value::Object(entities));
            }
        }

        info!(keys = document.len(), "Imploded document");
        Ok(Value::Object(document))
    }

    fn read_entities<S: FileStore + ?Sized>(
        &self,
        store: &S,
        kind: EntityKind,
    ) -> SplitResult<Option<Map<String, Value>>> {
        let dir = kind.dir_name();
        let mut paths = Vec::new();
        for encoding in Encoding::ALL {
            for extension in encoding.extensions() {
                paths.extend(store.find(&format!("**/{}/*.{}", dir, extension))?);
            }
        }
        if paths.is_empty() {
            return Ok(None);
        }
        paths.sort();

        let sidecars: HashSet<String> = store
            .find(&format!("**/{}/*.{}", dir, SIDECAR_EXTENSION))?
            .into_iter()
            .collect();

        let mut entities = Map::new();
        let mut sources: HashMap<String, String> = HashMap::with_capacity(paths.len());

        for path in paths {
            let mut fields = read_object(store, &path)?;
            let token = match fields.shift_remove(TOKEN_KEY) {
                Some(Value::String(token)) => token,
                _ => return Err(SplitError::MissingToken { path }),
            };
            check_placement(kind, &token, &path)?;

            let sidecar_file = sidecar_path(&path);
            let sidecar = if sidecars.contains(&sidecar_file) {
                if fields.contains_key(DESCRIPTION_KEY) {
                    warn!(path = %sidecar_file, "Ignoring sidecar, entity has an inline description");
                    None
                } else {
                    Some(store.read(&sidecar_file)?)
                }
            } else {
                None
            };
            let fields = self.splitter.merge(fields, sidecar);

            if let Some(first) = sources.insert(token.clone(), path.clone()) {
                return Err(SplitError::DuplicateToken {
                    kind,
                    token,
                    first,
                    second: path,
                });
            }
            entities.insert(token, Value::Object(fields));
        }

        Ok(Some(entities))
    }
}

/// Find the single file for a fixed slot such as `base` or `config`.
fn locate_slot<S: FileStore + ?Sized>(store: &S, stem: &str) -> SplitResult<Option<String>> {
    let mut candidates = store.find(&format!("{}.*", stem))?;
    for path in &candidates {
        Encoding::from_path(path)?;
    }

    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => Err(SplitError::AmbiguousEncoding {
            slot: format!("{} file", stem),
            paths: candidates,
        }),
    }
}

fn read_languages<S: FileStore + ?Sized>(store: &S) -> SplitResult<Option<Map<String, Value>>> {
    let mut overlays = Map::new();
    let mut sources: HashMap<String, String> = HashMap::new();

    for path in store.find("language.*.*")? {
        let name = language_name(&path)
            .ok_or_else(|| {
                SplitError::InvalidDocument(format!("cannot read a language name from {}", path))
            })?
            .to_string();
        if let Some(first) = sources.insert(name.clone(), path.clone()) {
            return Err(SplitError::AmbiguousEncoding {
                slot: format!("language '{}'", name),
                paths: vec![first, path],
            });
        }
        let overlay = read_value(store, &path)?;
        overlays.insert(name, overlay);
    }

    Ok((!overlays.is_empty()).then_some(overlays))
}

/// The token must parse; a file outside its usual directory is only noted.
fn check_placement(kind: EntityKind, raw_token: &str, path: &str) -> SplitResult<()> {
    let token = Token::parse(raw_token)?;
    let extension = path.rsplit_once('.').map_or("", |(_, extension)| extension);
    let expected = token.entity_path(kind, extension);
    if expected != path {
        debug!(token = %raw_token, path = %path, expected = %expected, "Entity file moved from its usual location");
    }
    Ok(())
}

fn read_value<S: FileStore + ?Sized>(store: &S, path: &str) -> SplitResult<Value> {
    let encoding = Encoding::from_path(path)?;
    let text = store.read(path)?;
    encoding.decode_file(path, &text)
}

fn read_object<S: FileStore + ?Sized>(store: &S, path: &str) -> SplitResult<Map<String, Value>> {
    match read_value(store, path)? {
        Value::Object(map) => Ok(map),
        other => Err(SplitError::InvalidDocument(format!(
            "{} must hold an object, found {}",
            path,
            type_name(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn store_with(files: &[(&str, &str)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for (path, contents) in files {
            store.write(path, contents).unwrap();
        }
        store
    }

    #[test]
    fn test_missing_base_file() {
        let store = store_with(&[("config.json", "{}")]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::MissingBaseFile)
        ));
    }

    #[test]
    fn test_base_only() {
        let store = store_with(&[("base.yaml", "name: pkg\nresources: {}\n")]);
        let document = Imploder::new().implode(&store).unwrap();
        assert_eq!(document, json!({"name": "pkg", "resources": {}}));
    }

    #[test]
    fn test_ambiguous_base() {
        let store = store_with(&[("base.json", "{}"), ("base.yaml", "{}")]);
        let err = Imploder::new().implode(&store).unwrap_err();
        assert!(matches!(
            err,
            SplitError::AmbiguousEncoding { ref paths, .. } if paths.len() == 2
        ));
    }

    #[test]
    fn test_unknown_base_encoding() {
        let store = store_with(&[("base.toml", "name = 'pkg'")]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_mixed_encodings_are_read() {
        let store = store_with(&[
            ("base.json", r#"{"name": "pkg"}"#),
            ("provider.yml", "type: object\n"),
            ("language.go.json", r#"{"importBasePath": "x"}"#),
            ("language.nodejs.yaml", "packageName: '@pkg/pkg'\n"),
            (
                "index/types/Tag.yaml",
                "$token: 'pkg:index:Tag'\ntype: object\n",
            ),
        ]);

        let document = Imploder::new().implode(&store).unwrap();
        assert_eq!(
            document,
            json!({
                "name": "pkg",
                "provider": {"type": "object"},
                "language": {
                    "go": {"importBasePath": "x"},
                    "nodejs": {"packageName": "@pkg/pkg"},
                },
                "types": {"pkg:index:Tag": {"type": "object"}},
            })
        );
    }

    #[test]
    fn test_ambiguous_language() {
        let store = store_with(&[
            ("base.json", "{}"),
            ("language.go.json", "{}"),
            ("language.go.yaml", "{}"),
        ]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::AmbiguousEncoding { .. })
        ));
    }

    #[test]
    fn test_sidecar_restored_first() {
        let store = store_with(&[
            ("base.json", "{}"),
            (
                "storage/resources/Bucket.json",
                r#"{"$token": "pkg:storage/bucket:Bucket", "properties": {}, "type": "x"}"#,
            ),
            ("storage/resources/Bucket.md", "A long description"),
        ]);

        let document = Imploder::new().implode(&store).unwrap();
        let bucket = document["resources"]["pkg:storage/bucket:Bucket"]
            .as_object()
            .unwrap();
        let keys: Vec<&String> = bucket.keys().collect();
        assert_eq!(keys, ["description", "properties", "type"]);
        assert_eq!(bucket["description"], json!("A long description"));
    }

    #[test]
    fn test_inline_description_wins_over_sidecar() {
        let store = store_with(&[
            ("base.json", "{}"),
            (
                "index/functions/f.json",
                r#"{"$token": "pkg:index:f", "description": "inline"}"#,
            ),
            ("index/functions/f.md", "sidecar"),
        ]);

        let document = Imploder::new().implode(&store).unwrap();
        assert_eq!(
            document["functions"]["pkg:index:f"]["description"],
            json!("inline")
        );
    }

    #[test]
    fn test_token_comes_from_file_not_path() {
        let store = store_with(&[
            ("base.json", "{}"),
            (
                "elsewhere/resources/Renamed.json",
                r#"{"$token": "pkg:storage/acl:BucketAcl"}"#,
            ),
        ]);

        let document = Imploder::new().implode(&store).unwrap();
        assert_eq!(
            document,
            json!({"resources": {"pkg:storage/acl:BucketAcl": {}}})
        );
    }

    #[test]
    fn test_missing_token() {
        let store = store_with(&[
            ("base.json", "{}"),
            ("index/types/T.json", r#"{"type": "object"}"#),
        ]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::MissingToken { ref path }) if path == "index/types/T.json"
        ));
    }

    #[test]
    fn test_duplicate_token() {
        let store = store_with(&[
            ("base.json", "{}"),
            ("index/types/T.json", r#"{"$token": "pkg:index:T"}"#),
            ("index/types/T.yaml", "$token: 'pkg:index:T'\n"),
        ]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::DuplicateToken { kind: EntityKind::Types, .. })
        ));
    }

    #[test]
    fn test_malformed_token_in_file() {
        let store = store_with(&[
            ("base.json", "{}"),
            ("index/types/T.json", r#"{"$token": "not-a-token"}"#),
        ]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::MalformedToken { .. })
        ));
    }

    #[test]
    fn test_files_override_base_entity_map() {
        let store = store_with(&[
            ("base.json", r#"{"types": {}}"#),
            ("index/types/T.json", r#"{"$token": "pkg:index:T"}"#),
        ]);
        let document = Imploder::new().implode(&store).unwrap();
        assert_eq!(document, json!({"types": {"pkg:index:T": {}}}));
    }

    #[test]
    fn test_non_object_base() {
        let store = store_with(&[("base.json", "[1, 2]")]);
        assert!(matches!(
            Imploder::new().implode(&store),
            Err(SplitError::InvalidDocument(_))
        ));
    }
}
