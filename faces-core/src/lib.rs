//! Infinite Faces Core - Deterministic SVG Faces
//!
//! # Guarantees
//! 1. Same seed, same catalog: byte-identical SVG
//! 2. Every seed renders; there is no error path after startup
//! 3. Seed text never reaches the document unescaped
//! 4. Catalog order is part of the contract

pub mod catalog;
pub mod escape;
pub mod generator;
pub mod hashing;
pub mod render;
pub mod server;
pub mod validation;

pub use catalog::{CatalogError, TraitCatalog, TraitCategory, TraitTable, STANDARD_FINGERPRINT};
pub use generator::{Face, FaceGenerator, GeneratorError, TraitSelection, DEFAULT_SEED, SVG_CONTENT_TYPE};
pub use hashing::{canonical_json, sha256_hex, SeedDigest};
pub use validation::{validate_catalog, ValidationResult, ValidationViolation, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
