//! Apicurio Schema Resolver
//!
//! A client-side adapter that resolves a logical schema reference (name,
//! group, optional version or branch) against an Apicurio-compatible schema
//! registry and returns the stored schema text together with a
//! fully-populated, immutable schema identifier.
//!
//! ## Features
//!
//! - **Partial Queries**: identifiers are built from any subset of fields;
//!   the resolver decides what lookup they mean
//! - **Version/Branch Fallback**: an explicit numeric version wins, a branch
//!   is tried next, otherwise the latest version is fetched
//! - **Typed Errors**: missing artifacts, missing versions, bad
//!   configuration, and transport failures are distinct error variants
//! - **Managed Lifecycle**: one shared registry client handle, created on
//!   `open`, torn down on `close`, recreated on the next resolve
//!
//! ## Resolution flow
//!
//! ```text
//! SchemaIdentifier (query)
//!   ├── name + group present?        -> precondition errors otherwise
//!   ├── version? -> numeric selector -+
//!   ├── branch?  -> label selector   -+-> GET artifact metadata
//!   └── neither  -> latest           -+   GET version metadata + content
//!                                         |
//!                                         v
//!                        ResolvedSchema { text, type, identifier }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod identifier;
pub mod resolver;

pub use client::{
    ArtifactMetadata, ArtifactType, HttpRegistryClient, RegistryClient, VersionMetadata,
};
pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use identifier::{SchemaIdentifier, SchemaIdentifierBuilder};
pub use resolver::{ResolvedSchema, SchemaResolver};
