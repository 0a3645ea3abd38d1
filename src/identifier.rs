//! Schema identifier value object
//!
//! A `SchemaIdentifier` names a schema inside a registry. Every field is
//! optional: a caller-side query may carry only a name and a group, while a
//! fully resolved identifier also carries the registry-assigned ids and
//! version information. Construction goes through [`SchemaIdentifierBuilder`]
//! and the built value is immutable.

use std::fmt;

use crate::error::{Result, SchemaError};

/// An immutable reference to a schema in a registry.
///
/// Two identifiers are equal only when all six fields match, absent fields
/// included. `identifier` and `version` are stored as text and can be read
/// as numbers on demand with [`identifier_as_i64`](Self::identifier_as_i64)
/// and [`version_as_i32`](Self::version_as_i32).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaIdentifier {
    name: Option<String>,
    identifier: Option<String>,
    version: Option<String>,
    schema_version_id: Option<i64>,
    branch: Option<String>,
    group_id: Option<String>,
}

impl SchemaIdentifier {
    /// Start building an identifier.
    pub fn builder() -> SchemaIdentifierBuilder {
        SchemaIdentifierBuilder::default()
    }

    /// Human-readable schema name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Registry-assigned artifact id, as text.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Artifact id coerced to an integer.
    ///
    /// Returns `Ok(None)` when the id is absent and an error when it is
    /// present but not numeric.
    pub fn identifier_as_i64(&self) -> Result<Option<i64>> {
        parse_numeric(self.identifier.as_deref(), "identifier")
    }

    /// Version label, as text.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version label coerced to an integer.
    ///
    /// Returns `Ok(None)` when the version is absent and an error when it is
    /// present but not numeric.
    pub fn version_as_i32(&self) -> Result<Option<i32>> {
        parse_numeric(self.version.as_deref(), "version")
    }

    /// Registry-global unique id of this exact schema version.
    pub fn schema_version_id(&self) -> Option<i64> {
        self.schema_version_id
    }

    /// Branch or stream name. Resolved identifiers also use this field to
    /// carry a version label that is not numeric.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Registry namespace the artifact lives in.
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }
}

fn parse_numeric<T>(value: Option<&str>, field: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    match value {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|source| SchemaError::NotNumeric {
                field,
                value: text.to_string(),
                source,
            }),
    }
}

impl fmt::Display for SchemaIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema_version_id = self
            .schema_version_id
            .map_or_else(|| "none".to_string(), |id| id.to_string());
        write!(
            f,
            "[ name = {}, identifier = {}, version = {}, schema_version_id = {}, branch = {}, group_id = {} ]",
            self.name.as_deref().unwrap_or("none"),
            self.identifier.as_deref().unwrap_or("none"),
            self.version.as_deref().unwrap_or("none"),
            schema_version_id,
            self.branch.as_deref().unwrap_or("none"),
            self.group_id.as_deref().unwrap_or("none"),
        )
    }
}

/// Builder for [`SchemaIdentifier`].
///
/// Setters are independent and may run in any order; setting a field twice
/// keeps the later value. `build` never fails, absence is a valid state for
/// every field.
#[derive(Debug, Clone, Default)]
pub struct SchemaIdentifierBuilder {
    name: Option<String>,
    identifier: Option<String>,
    version: Option<String>,
    schema_version_id: Option<i64>,
    branch: Option<String>,
    group_id: Option<String>,
}

impl SchemaIdentifierBuilder {
    /// Set the schema name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the artifact id from text.
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the artifact id from a number.
    pub fn numeric_identifier(mut self, identifier: i64) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    /// Set the version label from text.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the version label from a number.
    pub fn version_number(mut self, version: i32) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set the registry-global version id.
    pub fn schema_version_id(mut self, schema_version_id: i64) -> Self {
        self.schema_version_id = Some(schema_version_id);
        self
    }

    /// Set the branch name.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the group id.
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Produce the immutable identifier.
    pub fn build(self) -> SchemaIdentifier {
        SchemaIdentifier {
            name: self.name,
            identifier: self.identifier,
            version: self.version,
            schema_version_id: self.schema_version_id,
            branch: self.branch,
            group_id: self.group_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(id: &SchemaIdentifier) -> u64 {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_builder_subset_leaves_others_absent() {
        let id = SchemaIdentifier::builder()
            .name("hello")
            .group_id("default")
            .build();

        assert_eq!(id.name(), Some("hello"));
        assert_eq!(id.group_id(), Some("default"));
        assert_eq!(id.identifier(), None);
        assert_eq!(id.version(), None);
        assert_eq!(id.schema_version_id(), None);
        assert_eq!(id.branch(), None);
    }

    #[test]
    fn test_equality_over_all_fields() {
        let a = SchemaIdentifier::builder()
            .name("hello")
            .identifier("1")
            .version_number(2)
            .schema_version_id(3)
            .branch("main")
            .group_id("default")
            .build();
        let b = SchemaIdentifier::builder()
            .name("hello")
            .identifier("1")
            .version_number(2)
            .schema_version_id(3)
            .branch("main")
            .group_id("default")
            .build();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_schema_version_id_distinguishes() {
        let a = SchemaIdentifier::builder()
            .name("hello")
            .schema_version_id(1)
            .build();
        let b = SchemaIdentifier::builder()
            .name("hello")
            .schema_version_id(2)
            .build();

        assert_ne!(a, b);
    }

    #[test]
    fn test_absent_and_present_differ() {
        let absent = SchemaIdentifier::builder().name("hello").build();
        let present = SchemaIdentifier::builder()
            .name("hello")
            .branch("main")
            .build();

        assert_ne!(absent, present);
    }

    #[test]
    fn test_version_as_i32() {
        let numeric = SchemaIdentifier::builder().version("12").build();
        assert_eq!(numeric.version_as_i32().unwrap(), Some(12));

        let absent = SchemaIdentifier::builder().build();
        assert_eq!(absent.version_as_i32().unwrap(), None);

        let textual = SchemaIdentifier::builder().version("abc").build();
        let err = textual.version_as_i32().unwrap_err();
        assert!(matches!(err, SchemaError::NotNumeric { field: "version", .. }));
    }

    #[test]
    fn test_identifier_as_i64() {
        let id = SchemaIdentifier::builder().numeric_identifier(41).build();
        assert_eq!(id.identifier(), Some("41"));
        assert_eq!(id.identifier_as_i64().unwrap(), Some(41));

        let textual = SchemaIdentifier::builder().identifier("not-a-number").build();
        assert!(textual.identifier_as_i64().is_err());
    }

    #[test]
    fn test_setter_overwrites() {
        let id = SchemaIdentifier::builder()
            .version("1")
            .version_number(7)
            .build();
        assert_eq!(id.version(), Some("7"));
    }

    #[test]
    fn test_display_lists_every_field() {
        let id = SchemaIdentifier::builder()
            .name("hello")
            .version_number(3)
            .build();
        let rendered = id.to_string();

        assert_eq!(
            rendered,
            "[ name = hello, identifier = none, version = 3, \
             schema_version_id = none, branch = none, group_id = none ]"
        );
    }
}
