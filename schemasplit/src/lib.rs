//! schemasplit - explode package schemas into file trees and back
//!
//! A package schema is one large document describing a package's resources,
//! functions and types, plus provider, configuration and per-language
//! metadata. This crate splits it into one file per entity so it can be
//! reviewed and edited piecemeal, and reassembles an equal document from
//! those files.
//!
//! # Example
//!
//! ```
//! use schemasplit::{Encoding, Exploder, Imploder, MemoryStore, SplitConfig};
//! use serde_json::json;
//!
//! let document = json!({
//!     "name": "pkg",
//!     "resources": {"pkg:storage/acl:BucketAcl": {"properties": {}}},
//! });
//!
//! let mut store = MemoryStore::new();
//! Exploder::new(SplitConfig::new(Encoding::Json)).explode(&document, &mut store)?;
//! assert!(store.get("storage/acl/resources/BucketAcl.json").is_some());
//!
//! let rebuilt = Imploder::new().implode(&store)?;
//! assert_eq!(rebuilt, document);
//! # Ok::<(), schemasplit::SplitError>(())
//! ```

pub mod config;
pub mod description;
pub mod diff;
pub mod document;
pub mod encoding;
pub mod error;
pub mod explode;
pub mod implode;
pub mod logging;
pub mod store;
pub mod token;
pub mod validate;
pub mod verify;

pub use config::{ConfigError, SplitConfig};
pub use description::DescriptionSplitter;
pub use diff::{diff, Change, ChangeKind};
pub use encoding::Encoding;
pub use error::{SplitError, SplitResult};
pub use explode::{ExplodeSummary, Exploder};
pub use implode::Imploder;
pub use store::{FileStore, FsStore, MemoryStore};
pub use token::{EntityKind, Token};
pub use validate::{SchemaValidator, Validator, Violation, ViolationKind};
pub use verify::{verify_round_trip, RoundTripReport};

/// Crate version, shown by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
