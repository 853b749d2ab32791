//! Structural diff of two JSON trees.
//!
//! Objects are compared by key, ignoring order. Arrays are compared by
//! index. Paths are rendered as `$.resources["pkg:index:Bucket"].description`.

use std::fmt;

use serde_json::Value;

/// How a value differs between the two trees.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// Present only in the right-hand tree.
    Added(Value),
    /// Present only in the left-hand tree.
    Removed(Value),
    /// Present in both with different values.
    Modified { from: Value, to: Value },
}

/// One difference at one path.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub path: String,
    pub kind: ChangeKind,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ChangeKind::Added(value) => write!(f, "+ {}: {}", self.path, preview(value)),
            ChangeKind::Removed(value) => write!(f, "- {}: {}", self.path, preview(value)),
            ChangeKind::Modified { from, to } => {
                write!(f, "~ {}: {} -> {}", self.path, preview(from), preview(to))
            }
        }
    }
}

const PREVIEW_LIMIT: usize = 80;

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_LIMIT {
        return text;
    }
    let cut: String = text.chars().take(PREVIEW_LIMIT).collect();
    format!("{}...", cut)
}

/// Root path used by [`diff`] and by validation messages.
pub const ROOT_PATH: &str = "$";

/// Append an object key to a rendered path.
pub fn child_path(parent: &str, key: &str) -> String {
    let simple = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        format!("{}.{}", parent, key)
    } else {
        format!("{}[{}]", parent, Value::String(key.to_string()))
    }
}

/// Append an array index to a rendered path.
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// List every difference between `left` and `right`.
///
/// Reports the deepest differing node rather than every ancestor. An empty
/// result means the trees are equal.
pub fn diff(left: &Value, right: &Value) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_at(ROOT_PATH.to_string(), left, right, &mut changes);
    changes
}

fn diff_at(path: String, left: &Value, right: &Value, changes: &mut Vec<Change>) {
    match (left, right) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, left_value) in a {
                let child = child_path(&path, key);
                match b.get(key) {
                    Some(right_value) => diff_at(child, left_value, right_value, changes),
                    None => changes.push(Change {
                        path: child,
                        kind: ChangeKind::Removed(left_value.clone()),
                    }),
                }
            }
            for (key, right_value) in b {
                if !a.contains_key(key) {
                    changes.push(Change {
                        path: child_path(&path, key),
                        kind: ChangeKind::Added(right_value.clone()),
                    });
                }
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for (index, (left_item, right_item)) in a.iter().zip(b).enumerate() {
                diff_at(index_path(&path, index), left_item, right_item, changes);
            }
            for (index, item) in a.iter().enumerate().skip(b.len()) {
                changes.push(Change {
                    path: index_path(&path, index),
                    kind: ChangeKind::Removed(item.clone()),
                });
            }
            for (index, item) in b.iter().enumerate().skip(a.len()) {
                changes.push(Change {
                    path: index_path(&path, index),
                    kind: ChangeKind::Added(item.clone()),
                });
            }
        }
        _ if left == right => {}
        _ => changes.push(Change {
            path,
            kind: ChangeKind::Modified {
                from: left.clone(),
                to: right.clone(),
            },
        }),
    }
}
