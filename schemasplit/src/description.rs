//! Moving long entity descriptions into Markdown sidecar files.

use serde_json::{Map, Value};

/// Key holding an entity's free-text description.
pub const DESCRIPTION_KEY: &str = "description";

/// Extension of description sidecar files.
pub const SIDECAR_EXTENSION: &str = "md";

/// Descriptions longer than this many characters go to a sidecar.
pub const DEFAULT_DESCRIPTION_THRESHOLD: usize = 400;

/// An entity after the explode-side split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitEntity {
    /// The entity to serialize. Has no `description` key when `sidecar` is set.
    pub entity: Map<String, Value>,
    /// Full description text to write next to the entity file.
    pub sidecar: Option<String>,
}

/// Decides whether a description stays inline or moves to a sidecar.
///
/// Length is counted in Unicode scalar values and compared strictly: a
/// description of exactly `threshold` characters stays inline. Only string
/// descriptions are ever moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionSplitter {
    threshold: usize,
}

impl Default for DescriptionSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_DESCRIPTION_THRESHOLD)
    }
}

impl DescriptionSplitter {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Whether `text` is long enough to be moved out.
    pub fn exceeds(&self, text: &str) -> bool {
        text.chars().count() > self.threshold
    }

    /// Strip an over-long description from `entity`.
    pub fn split(&self, mut entity: Map<String, Value>) -> SplitEntity {
        let long = matches!(
            entity.get(DESCRIPTION_KEY),
            Some(Value::String(text)) if self.exceeds(text)
        );
        if !long {
            return SplitEntity {
                entity,
                sidecar: None,
            };
        }

        let sidecar = match entity.shift_remove(DESCRIPTION_KEY) {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        SplitEntity { entity, sidecar }
    }

    /// Put a sidecar description back into a parsed entity.
    ///
    /// The sidecar only applies when the entity has no `description` of its
    /// own. The restored description becomes the first key, ahead of the
    /// remaining keys in their original order.
    pub fn merge(&self, entity: Map<String, Value>, sidecar: Option<String>) -> Map<String, Value> {
        let Some(text) = sidecar else {
            return entity;
        };
        if entity.contains_key(DESCRIPTION_KEY) {
            return entity;
        }

        let mut merged = Map::with_capacity(entity.len() + 1);
        merged.insert(DESCRIPTION_KEY.to_string(), Value::String(text));
        merged.extend(entity);
        merged
    }
}
