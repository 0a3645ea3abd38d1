//! Registry client abstraction and its HTTP implementation
//!
//! [`RegistryClient`] is the narrow interface the resolver needs from a
//! registry: artifact metadata, version metadata, and schema content.
//! [`HttpRegistryClient`] implements it against the Apicurio Registry v2
//! REST API. Tests substitute their own implementations.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};

/// Artifact type reported by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ArtifactType {
    Avro,
    Protobuf,
    Json,
    Openapi,
    Asyncapi,
    Graphql,
    Kconnect,
    Wsdl,
    Xsd,
    Xml,
    /// Any type this crate does not know about
    #[default]
    Unknown,
}

impl From<String> for ArtifactType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "AVRO" => ArtifactType::Avro,
            "PROTOBUF" => ArtifactType::Protobuf,
            "JSON" => ArtifactType::Json,
            "OPENAPI" => ArtifactType::Openapi,
            "ASYNCAPI" => ArtifactType::Asyncapi,
            "GRAPHQL" => ArtifactType::Graphql,
            "KCONNECT" => ArtifactType::Kconnect,
            "WSDL" => ArtifactType::Wsdl,
            "XSD" => ArtifactType::Xsd,
            "XML" => ArtifactType::Xml,
            _ => ArtifactType::Unknown,
        }
    }
}

impl ArtifactType {
    /// The registry's name for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Avro => "AVRO",
            ArtifactType::Protobuf => "PROTOBUF",
            ArtifactType::Json => "JSON",
            ArtifactType::Openapi => "OPENAPI",
            ArtifactType::Asyncapi => "ASYNCAPI",
            ArtifactType::Graphql => "GRAPHQL",
            ArtifactType::Kconnect => "KCONNECT",
            ArtifactType::Wsdl => "WSDL",
            ArtifactType::Xsd => "XSD",
            ArtifactType::Xml => "XML",
            ArtifactType::Unknown => "UNKNOWN",
        }
    }
}

/// Artifact-level metadata. The registry reports the latest version's
/// labels here; unknown response fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    /// Artifact id inside its group
    pub id: String,

    /// Display name; registries may leave it unset
    #[serde(default)]
    pub name: Option<String>,

    /// Version label of the latest version
    pub version: String,

    /// Declared artifact type
    #[serde(rename = "type", default)]
    pub artifact_type: ArtifactType,

    /// Group the artifact belongs to
    #[serde(default)]
    pub group_id: Option<String>,

    /// Global id of the latest version
    #[serde(default)]
    pub global_id: Option<i64>,

    /// Content id of the latest version
    #[serde(default)]
    pub content_id: Option<i64>,
}

/// Metadata of one concrete artifact version
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Registry-global unique id of this version
    pub global_id: i64,

    /// Version label
    pub version: String,

    /// Declared artifact type
    #[serde(rename = "type", default)]
    pub artifact_type: ArtifactType,

    /// Content id shared by identical payloads
    #[serde(default)]
    pub content_id: Option<i64>,
}

/// Error body returned by the registry alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct RegistryErrorBody {
    /// Exception name, e.g. `ArtifactNotFoundException`
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

/// The registry operations schema resolution needs.
///
/// Every method is a synchronous round-trip. Implementations map missing
/// artifacts and versions to [`SchemaError::ArtifactNotFound`] and
/// [`SchemaError::VersionNotFound`] so callers can tell the two apart.
pub trait RegistryClient: Send + Sync {
    /// Fetch artifact-level metadata.
    fn artifact_metadata(&self, group: &str, artifact: &str) -> Result<ArtifactMetadata>;

    /// Fetch metadata of one version.
    fn version_metadata(&self, group: &str, artifact: &str, version: &str)
        -> Result<VersionMetadata>;

    /// Fetch the schema text of one version.
    fn version_content(&self, group: &str, artifact: &str, version: &str) -> Result<String>;

    /// Fetch the schema text of the latest version.
    fn latest_content(&self, group: &str, artifact: &str) -> Result<String>;

    /// Release any held resources. The default does nothing.
    fn close(&self) {}
}

/// [`RegistryClient`] over the Apicurio Registry v2 REST API
pub struct HttpRegistryClient {
    http: Client,
    base_url: Url,
}

impl HttpRegistryClient {
    /// Build a client from validated connection settings
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("apicurio-resolver/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SchemaError::ClientInit)?;
        Ok(Self { http, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        // http/https URLs always have a segmented path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn get(
        &self,
        url: Url,
        group: &str,
        artifact: &str,
        version: Option<&str>,
    ) -> Result<Response> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|source| SchemaError::Transport {
                group: group.to_string(),
                artifact: artifact.to_string(),
                source,
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().unwrap_or_default();
        let body: RegistryErrorBody = serde_json::from_str(&body).unwrap_or_default();
        Err(classify_registry_error(status, &body, group, artifact, version))
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        group: &str,
        artifact: &str,
    ) -> Result<T> {
        response.json().map_err(|source| SchemaError::Transport {
            group: group.to_string(),
            artifact: artifact.to_string(),
            source,
        })
    }

    fn text(response: Response, group: &str, artifact: &str) -> Result<String> {
        response.text().map_err(|source| SchemaError::Transport {
            group: group.to_string(),
            artifact: artifact.to_string(),
            source,
        })
    }
}

impl RegistryClient for HttpRegistryClient {
    fn artifact_metadata(&self, group: &str, artifact: &str) -> Result<ArtifactMetadata> {
        let url = self.endpoint(["groups", group, "artifacts", artifact, "meta"]);
        let response = self.get(url, group, artifact, None)?;
        Self::decode(response, group, artifact)
    }

    fn version_metadata(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Result<VersionMetadata> {
        let url =
            self.endpoint(["groups", group, "artifacts", artifact, "versions", version, "meta"]);
        let response = self.get(url, group, artifact, Some(version))?;
        Self::decode(response, group, artifact)
    }

    fn version_content(&self, group: &str, artifact: &str, version: &str) -> Result<String> {
        let url = self.endpoint(["groups", group, "artifacts", artifact, "versions", version]);
        let response = self.get(url, group, artifact, Some(version))?;
        Self::text(response, group, artifact)
    }

    fn latest_content(&self, group: &str, artifact: &str) -> Result<String> {
        let url = self.endpoint(["groups", group, "artifacts", artifact]);
        let response = self.get(url, group, artifact, None)?;
        Self::text(response, group, artifact)
    }
}

/// Map a non-success response to an error.
///
/// The registry names the failure in the body (`name` field); the HTTP
/// status is the fallback when the body is missing or unrecognized.
fn classify_registry_error(
    status: StatusCode,
    body: &RegistryErrorBody,
    group: &str,
    artifact: &str,
    version: Option<&str>,
) -> SchemaError {
    let artifact_not_found = || SchemaError::ArtifactNotFound {
        group: group.to_string(),
        artifact: artifact.to_string(),
    };
    let version_not_found = |version: &str| SchemaError::VersionNotFound {
        group: group.to_string(),
        artifact: artifact.to_string(),
        version: version.to_string(),
    };

    match body.name.as_deref() {
        Some("ArtifactNotFoundException") => artifact_not_found(),
        Some("VersionNotFoundException") => match version {
            Some(v) => version_not_found(v),
            None => artifact_not_found(),
        },
        _ if status == StatusCode::NOT_FOUND => match version {
            Some(v) => version_not_found(v),
            None => artifact_not_found(),
        },
        _ => SchemaError::Registry {
            group: group.to_string(),
            artifact: artifact.to_string(),
            message: body
                .message
                .clone()
                .unwrap_or_else(|| status.to_string()),
        },
    }
}
