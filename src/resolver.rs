//! Schema resolution against a remote registry
//!
//! [`SchemaResolver`] turns a partially-specified [`SchemaIdentifier`] into
//! the stored schema text plus a fully-populated identifier. A query names
//! the artifact (name + group) and optionally pins a version number or a
//! branch; the resolver decides which registry lookup that means, performs
//! it, and classifies failures.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::client::{
    ArtifactMetadata, ArtifactType, HttpRegistryClient, RegistryClient, VersionMetadata,
};
use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::identifier::SchemaIdentifier;

/// A schema fetched from the registry.
///
/// `text` is the stored payload verbatim; parsing it is the caller's
/// concern. `identifier` describes what was actually resolved, which may be
/// more specific than the query (latest version pinned, ids filled in).
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// Raw schema text exactly as stored in the registry
    pub text: String,
    /// Artifact type the registry reports for the fetched version
    pub artifact_type: ArtifactType,
    /// Complete identifier of the resolved schema version
    pub identifier: SchemaIdentifier,
}

/// How the resolver obtains a client when it needs one
enum Connector {
    /// Build HTTP clients from connection settings
    Http(RegistryConfig),
    /// Reattach a caller-supplied client
    Supplied(Arc<dyn RegistryClient>),
}

/// Resolves schema queries against one registry.
///
/// The resolver owns a single client handle shared by all resolve calls.
/// [`close`](Self::close) tears the handle down; the next resolve call
/// recreates it. Closing while a resolve is in flight is the caller's
/// responsibility to avoid, though the in-flight call keeps its handle
/// alive and completes normally.
pub struct SchemaResolver {
    connector: Connector,
    client: Mutex<Option<Arc<dyn RegistryClient>>>,
}

impl SchemaResolver {
    /// Open a resolver against the registry named by `config`.
    ///
    /// Validates the configuration and creates the HTTP client up front, so
    /// a bad URL fails here rather than on the first resolve.
    pub fn open(config: &RegistryConfig) -> Result<Self> {
        let client: Arc<dyn RegistryClient> = Arc::new(HttpRegistryClient::new(config)?);
        debug!("opened schema resolver for registry at {}", config.url);
        Ok(Self {
            connector: Connector::Http(config.clone()),
            client: Mutex::new(Some(client)),
        })
    }

    /// Build a resolver around an externally-supplied client.
    pub fn with_client(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            connector: Connector::Supplied(Arc::clone(&client)),
            client: Mutex::new(Some(client)),
        }
    }

    /// Resolve a schema query.
    ///
    /// The query must carry a schema name and a group id. An explicit
    /// version takes precedence over a branch; the version must be numeric
    /// while a branch is used as-is. With neither, the latest version is
    /// resolved.
    pub fn resolve(&self, query: &SchemaIdentifier) -> Result<ResolvedSchema> {
        let name = query
            .name()
            .ok_or(SchemaError::MissingField("Schema Name"))?;
        let group = query
            .group_id()
            .ok_or(SchemaError::MissingField("Group ID"))?;

        // A version, when present, must be numeric and wins over the branch.
        let selector = match query.version_as_i32()? {
            Some(version) => Some(version.to_string()),
            None => query.branch().map(str::to_string),
        };

        let client = self.ensure_client()?;
        debug!(
            "resolving schema {} in group {} (selector: {})",
            name,
            group,
            selector.as_deref().unwrap_or("latest")
        );

        match Self::lookup(client.as_ref(), group, name, selector.as_deref()) {
            Ok(resolved) => {
                debug!("resolved schema {}", resolved.identifier);
                Ok(resolved)
            }
            Err(err) => {
                if !err.is_not_found() {
                    warn!(
                        "registry lookup for group {} artifact {} failed: {}",
                        group, name, err
                    );
                }
                Err(err)
            }
        }
    }

    /// Tear down the client handle.
    ///
    /// Idempotent; the next resolve call recreates the handle.
    pub fn close(&self) {
        if let Some(client) = self.lock_client().take() {
            debug!("closing registry client");
            client.close();
        }
    }

    /// Get the shared client, creating it when the slot is empty.
    fn ensure_client(&self) -> Result<Arc<dyn RegistryClient>> {
        let mut slot = self.lock_client();
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }
        let client: Arc<dyn RegistryClient> = match &self.connector {
            Connector::Http(config) => Arc::new(HttpRegistryClient::new(config)?),
            Connector::Supplied(client) => Arc::clone(client),
        };
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    fn lock_client(&self) -> MutexGuard<'_, Option<Arc<dyn RegistryClient>>> {
        match self.client.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                debug!("registry client lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn lookup(
        client: &dyn RegistryClient,
        group: &str,
        name: &str,
        selector: Option<&str>,
    ) -> Result<ResolvedSchema> {
        let metadata = client.artifact_metadata(group, name)?;
        let (version_metadata, text) = match selector {
            Some(version) => (
                client.version_metadata(group, name, version)?,
                client.version_content(group, name, version)?,
            ),
            // Without a selector the artifact metadata names the latest version.
            None => (
                client.version_metadata(group, name, &metadata.version)?,
                client.latest_content(group, name)?,
            ),
        };

        let identifier = Self::build_identifier(&metadata, &version_metadata, group);
        Ok(ResolvedSchema {
            text,
            artifact_type: version_metadata.artifact_type,
            identifier,
        })
    }

    /// Assemble the result identifier from registry metadata.
    ///
    /// The artifact metadata's version label always lands in `branch`; it
    /// becomes `version` as well only when it is numeric.
    fn build_identifier(
        metadata: &ArtifactMetadata,
        version_metadata: &VersionMetadata,
        group: &str,
    ) -> SchemaIdentifier {
        let mut builder = SchemaIdentifier::builder()
            .group_id(group)
            .identifier(metadata.id.as_str())
            .branch(metadata.version.as_str())
            .schema_version_id(version_metadata.global_id);
        if let Some(name) = metadata.name.as_deref() {
            builder = builder.name(name);
        }
        if let Ok(version) = metadata.version.parse::<i32>() {
            builder = builder.version_number(version);
        }
        builder.build()
    }
}
