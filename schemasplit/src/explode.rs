//! Explode: write a document out as a tree of files.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::description::SplitEntity;
use crate::document::{
    is_valid_language_name, language_file, sidecar_path, slot_file, type_name, Section,
    TopLevelKey, BASE_STEM, TOKEN_KEY,
};
use crate::encoding::Encoding;
use crate::error::{SplitError, SplitResult};
use crate::store::FileStore;
use crate::token::{EntityKind, Token};

/// What an explode wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplodeSummary {
    /// Total files written, including sidecars and the base file.
    pub files_written: usize,
    /// Entity files written per kind.
    pub entities: BTreeMap<EntityKind, usize>,
    /// Description sidecars written.
    pub sidecars: usize,
    /// Language overlay files written.
    pub languages: usize,
}

impl ExplodeSummary {
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        self.entities.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for ExplodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrote {} files: {} functions, {} resources, {} types, {} description sidecars, {} language overlays",
            self.files_written,
            self.entity_count(EntityKind::Functions),
            self.entity_count(EntityKind::Resources),
            self.entity_count(EntityKind::Types),
            self.sidecars,
            self.languages
        )
    }
}

/// Writes a document out as a file tree.
///
/// Every top-level key becomes a [`Section`]: written to its own files and
/// omitted from `base.<ext>`, or kept in the base file as-is. The caller's
/// document is never modified.
#[derive(Debug, Clone, Default)]
pub struct Exploder {
    config: SplitConfig,
}

impl Exploder {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Explode `document` into `store`.
    ///
    /// # Errors
    ///
    /// Fails fast on the first malformed token, non-object entity, reserved
    /// `$token` field, unusable language name or path collision. Files
    /// written before the failure are left in place.
    pub fn explode<S: FileStore + ?Sized>(
        &self,
        document: &Value,
        store: &mut S,
    ) -> SplitResult<ExplodeSummary> {
        let root = document.as_object().ok_or_else(|| {
            SplitError::InvalidDocument(format!(
                "document root must be an object, found {}",
                type_name(document)
            ))
        })?;

        let mut writer = TreeWriter::new(store, self.config.encoding);
        let mut base = Map::new();

        for (key, value) in root {
            let section = match TopLevelKey::classify(key) {
                TopLevelKey::Config | TopLevelKey::Provider => {
                    self.explode_whole(key, value, &mut writer)?
                }
                TopLevelKey::Language => self.explode_languages(value, &mut writer)?,
                TopLevelKey::Entities(kind) => self.explode_entities(kind, value, &mut writer)?,
                TopLevelKey::Other => Section::Keep(value.clone()),
            };
            section.apply(key, &mut base);
        }

        let base_path = slot_file(BASE_STEM, self.config.encoding);
        writer.write_value(&base_path, &Value::Object(base))?;

        let summary = writer.finish();
        info!(
            files = summary.files_written,
            sidecars = summary.sidecars,
            encoding = %self.config.encoding,
            "Exploded document"
        );
        Ok(summary)
    }

    /// `config` and `provider` go to one file each, unless `null`.
    fn explode_whole<S: FileStore + ?Sized>(
        &self,
        key: &str,
        value: &Value,
        writer: &mut TreeWriter<'_, S>,
    ) -> SplitResult<Section> {
        if value.is_null() {
            return Ok(Section::Keep(Value::Null));
        }
        writer.write_value(&slot_file(key, self.config.encoding), value)?;
        Ok(Section::Omit)
    }

    /// One file per overlay. Empty maps, non-objects and maps holding a
    /// `null` overlay stay in the base file so they come back unchanged.
    fn explode_languages<S: FileStore + ?Sized>(
        &self,
        value: &Value,
        writer: &mut TreeWriter<'_, S>,
    ) -> SplitResult<Section> {
        let Some(overlays) = value.as_object().filter(|overlays| !overlays.is_empty()) else {
            return Ok(Section::Keep(value.clone()));
        };
        if overlays.values().any(Value::is_null) {
            debug!("Language map holds a null overlay, keeping it in the base file");
            return Ok(Section::Keep(value.clone()));
        }

        for (name, overlay) in overlays {
            if !is_valid_language_name(name) {
                return Err(SplitError::InvalidDocument(format!(
                    "language name '{}' cannot be used in a file name",
                    name
                )));
            }
            writer.write_value(&language_file(name, self.config.encoding), overlay)?;
            writer.summary.languages += 1;
        }
        Ok(Section::Omit)
    }

    /// One file per entity, plus a sidecar for long descriptions.
    fn explode_entities<S: FileStore + ?Sized>(
        &self,
        kind: EntityKind,
        value: &Value,
        writer: &mut TreeWriter<'_, S>,
    ) -> SplitResult<Section> {
        let Some(entities) = value.as_object().filter(|entities| !entities.is_empty()) else {
            return Ok(Section::Keep(value.clone()));
        };

        let splitter = self.config.splitter();
        let extension = self.config.encoding.extension();
        let mut claimed: HashMap<String, &str> = HashMap::with_capacity(entities.len());

        for (raw_token, entity) in entities {
            let token = Token::parse(raw_token)?;
            let fields = entity
                .as_object()
                .ok_or_else(|| SplitError::InvalidEntity {
                    kind,
                    token: raw_token.clone(),
                    reason: format!("expected an object, found {}", type_name(entity)),
                })?;
            if fields.contains_key(TOKEN_KEY) {
                return Err(SplitError::InvalidEntity {
                    kind,
                    token: raw_token.clone(),
                    reason: format!("the {} field is reserved", TOKEN_KEY),
                });
            }

            let path = token.entity_path(kind, extension);
            if let Some(first) = claimed.insert(path.clone(), raw_token.as_str()) {
                return Err(SplitError::PathCollision {
                    path,
                    first: first.to_string(),
                    second: raw_token.clone(),
                });
            }

            let split = match splitter {
                Some(splitter) => splitter.split(fields.clone()),
                None => SplitEntity {
                    entity: fields.clone(),
                    sidecar: None,
                },
            };

            let mut file = Map::with_capacity(split.entity.len() + 1);
            file.insert(TOKEN_KEY.to_string(), Value::String(raw_token.clone()));
            file.extend(split.entity);
            writer.write_value(&path, &Value::Object(file))?;

            if let Some(description) = split.sidecar {
                writer.write_text(&sidecar_path(&path), &description)?;
                writer.summary.sidecars += 1;
            }
            *writer.summary.entities.entry(kind).or_default() += 1;
        }

        Ok(Section::Omit)
    }
}

/// Encodes values and writes them to a store, counting what it wrote.
struct TreeWriter<'a, S: ?Sized> {
    store: &'a mut S,
    encoding: Encoding,
    summary: ExplodeSummary,
}

impl<'a, S: FileStore + ?Sized> TreeWriter<'a, S> {
    fn new(store: &'a mut S, encoding: Encoding) -> Self {
        Self {
            store,
            encoding,
            summary: ExplodeSummary::default(),
        }
    }

    fn write_value(&mut self, path: &str, value: &Value) -> SplitResult<()> {
        let text = self.encoding.encode_file(path, value)?;
        self.write_text(path, &text)
    }

    fn write_text(&mut self, path: &str, text: &str) -> SplitResult<()> {
        self.store.write(path, text)?;
        self.summary.files_written += 1;
        debug!(path = %path, bytes = text.len(), "Wrote file");
        Ok(())
    }

    fn finish(self) -> ExplodeSummary {
        self.summary
    }
}
