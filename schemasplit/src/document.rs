//! Document shape and the file names of an exploded tree.
//!
//! ```text
//! base.<ext>                                  remainder of the document
//! config.<ext>                                optional
//! provider.<ext>                              optional
//! language.<name>.<ext>                       zero or more
//! <module>[/<submodule>]/<kind>/<Name>.<ext>  one per entity
//! <module>[/<submodule>]/<kind>/<Name>.md     long description, optional
//! ```

use serde_json::{Map, Value};

use crate::description::SIDECAR_EXTENSION;
use crate::encoding::Encoding;
use crate::token::EntityKind;

pub const CONFIG_KEY: &str = "config";
pub const PROVIDER_KEY: &str = "provider";
pub const LANGUAGE_KEY: &str = "language";

/// Synthetic first field of every entity file, holding its token.
pub const TOKEN_KEY: &str = "$token";

pub const BASE_STEM: &str = "base";
pub const LANGUAGE_PREFIX: &str = "language.";

/// What a top-level key of a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelKey {
    Config,
    Provider,
    Language,
    Entities(EntityKind),
    /// Anything else; always stays in the base file.
    Other,
}

impl TopLevelKey {
    pub fn classify(key: &str) -> Self {
        match key {
            CONFIG_KEY => TopLevelKey::Config,
            PROVIDER_KEY => TopLevelKey::Provider,
            LANGUAGE_KEY => TopLevelKey::Language,
            _ => EntityKind::from_key(key)
                .map(TopLevelKey::Entities)
                .unwrap_or(TopLevelKey::Other),
        }
    }
}

/// Whether a top-level value stays in the base file.
///
/// Sections written to their own files are [`Omit`](Section::Omit)ted from
/// the base file; their presence is implied by those files. Sections that
/// must round-trip exactly as they are (an empty entity map, a `null`
/// provider) are [`Keep`](Section::Keep)t.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Keep(Value),
    Omit,
}

impl Section {
    /// Add a kept value to the base object under `key`.
    pub fn apply(self, key: &str, base: &mut Map<String, Value>) {
        if let Section::Keep(value) = self {
            base.insert(key.to_string(), value);
        }
    }

    pub fn is_omit(&self) -> bool {
        matches!(self, Section::Omit)
    }
}

/// Short description of a value's JSON type, for messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// File name of a fixed slot such as `base` or `config`.
pub fn slot_file(stem: &str, encoding: Encoding) -> String {
    format!("{}.{}", stem, encoding.extension())
}

/// File name of a language overlay.
pub fn language_file(name: &str, encoding: Encoding) -> String {
    format!("{}{}.{}", LANGUAGE_PREFIX, name, encoding.extension())
}

/// Recover the language name from an overlay file name.
///
/// `language.nodejs.yaml` yields `nodejs`. Returns `None` when the name
/// does not have the `language.<name>.<ext>` shape.
pub fn language_name(file_name: &str) -> Option<&str> {
    let rest = file_name.strip_prefix(LANGUAGE_PREFIX)?;
    let (name, _extension) = rest.rsplit_once('.')?;
    (!name.is_empty()).then_some(name)
}

/// Whether `name` can be embedded in an overlay file name.
pub fn is_valid_language_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\'])
}

/// Path of the description sidecar for an entity file.
pub fn sidecar_path(entity_path: &str) -> String {
    let stem = entity_path
        .rsplit_once('.')
        .map_or(entity_path, |(stem, _)| stem);
    format!("{}.{}", stem, SIDECAR_EXTENSION)
}
