//! Configuration Management
//!
//! Label definitions, the desired-state document and run settings

use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sync::ApplyPolicy;

/// JSON Schema every desired-state document must satisfy before it is
/// deserialized into [`LabelsDocument`]
pub const LABELS_SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "required": ["labels"],
    "properties": {
        "labels": {
            "type": "array",
            "items": {
                "type": "object",
                "required": ["name", "color"],
                "additionalProperties": false,
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "description": { "type": ["string", "null"] },
                    "color": { "type": "string" }
                }
            }
        }
    }
}"#;

/// Label Configuration
///
/// A label as declared in the configuration document or held by the
/// repository. Identity is the name; color is an opaque string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelConfig {
    /// Label name
    pub name: String,

    /// Label color, passed through as-is
    pub color: String,

    /// Label description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelConfig {
    /// Create a new label without description
    pub fn new<N: Into<String>, C: Into<String>>(name: N, color: C) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Treat an empty description as absent
    ///
    /// GitHub reports a label without description as either `null` or `""`;
    /// both must compare equal to a configuration entry that omits it.
    pub fn normalized(mut self) -> Self {
        if self.description.as_deref() == Some("") {
            self.description = None;
        }
        self
    }
}

/// Desired-state document
///
/// Top-level shape of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelsDocument {
    pub labels: Vec<LabelConfig>,
}

/// Where the configuration document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Owner of the repository holding the document
    pub owner: String,

    /// Name of the repository holding the document
    pub repo: String,

    /// Repository-relative path of the document
    pub path: String,

    /// Git ref to read the document at (default branch if None)
    pub reference: Option<String>,
}

impl ConfigLocation {
    /// Resolve the configuration location
    ///
    /// The document is read from `configuration_repository` (`owner/repo`)
    /// when given, otherwise from the target repository itself.
    ///
    /// # Errors
    /// Returns an error if `configuration_repository` is not in `owner/repo` format
    pub fn resolve(
        configuration_repository: Option<&str>,
        target_owner: &str,
        target_repo: &str,
        path: &str,
        reference: Option<String>,
    ) -> Result<Self> {
        let (owner, repo) = match configuration_repository {
            Some(repository) => parse_repository(repository)?,
            None => (target_owner.to_string(), target_repo.to_string()),
        };

        Ok(Self {
            owner,
            repo,
            path: path.to_string(),
            reference,
        })
    }

    /// Repository in `owner/repo` format
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Source of raw configuration content
///
/// Implementations fetch the text of a file and undo any transport encoding.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the decoded text of the file at `location`
    ///
    /// # Errors
    /// Returns a fetch error if the file is missing or cannot be retrieved
    async fn fetch_content(&self, location: &ConfigLocation) -> Result<String>;
}

/// Sync Configuration
///
/// Resolved invocation inputs of a gh-label-sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// GitHub access token
    pub access_token: String,

    /// Target repository owner
    pub owner: String,

    /// Target repository name
    pub repo: String,

    /// Location of the desired-state document
    pub configuration: ConfigLocation,

    /// GitHub API base URL (api.github.com if None)
    pub api_url: Option<String>,

    /// Dry-run mode (don't make actual changes)
    pub dry_run: bool,

    /// What to do when a single mutation fails
    pub policy: ApplyPolicy,
}

impl SyncConfig {
    /// Validate configuration
    ///
    /// # Errors
    /// - If the access token is empty
    /// - If owner, repo or configuration path is empty
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::missing_input("token"));
        }

        if self.owner.trim().is_empty() {
            return Err(Error::missing_input("owner"));
        }

        if self.repo.trim().is_empty() {
            return Err(Error::missing_input("repo"));
        }

        if self.configuration.path.trim().is_empty() {
            return Err(Error::missing_input("configuration-path"));
        }

        Ok(())
    }

    /// Target repository in `owner/repo` format
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Parse repository string into owner and name
///
/// # Arguments
/// - `repo`: Repository string in "owner/repo" format
///
/// # Errors
/// Returns an error if the format is invalid
pub fn parse_repository(repo: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = repo.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::InvalidRepositoryFormat(repo.to_string()));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Parse the desired-state document
///
/// The content is read as YAML (which also accepts JSON), checked against
/// [`LABELS_SCHEMA`] and then deserialized. Label order is preserved.
///
/// # Errors
/// If the content is not valid YAML, violates the schema or declares
/// the same label name twice
pub fn parse_labels_document(content: &str) -> Result<Vec<LabelConfig>> {
    let instance: serde_json::Value = serde_yaml::from_str(content)?;
    validate_against_schema(&instance)?;

    let document: LabelsDocument = serde_json::from_value(instance)?;
    let labels: Vec<LabelConfig> = document
        .labels
        .into_iter()
        .map(LabelConfig::normalized)
        .collect();

    ensure_unique_names(&labels)?;
    Ok(labels)
}

/// Load the desired label set from a content source
///
/// # Errors
/// Fetch errors from the source, parse errors from [`parse_labels_document`]
pub async fn load_labels<S>(source: &S, location: &ConfigLocation) -> Result<Vec<LabelConfig>>
where
    S: ContentSource + ?Sized,
{
    debug!(
        repository = %location.repository(),
        path = %location.path,
        reference = ?location.reference,
        "Fetching label configuration"
    );

    let content = source.fetch_content(location).await?;
    let labels = parse_labels_document(&content)?;

    debug!(count = labels.len(), "Parsed label configuration");
    Ok(labels)
}

fn validate_against_schema(instance: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(LABELS_SCHEMA)?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|e| Error::config_validation(format!("Invalid labels schema: {}", e)))?;

    let result = compiled.validate(instance);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| {
                let pointer = e.instance_path.to_string();
                if pointer.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", pointer, e)
                }
            })
            .collect();
        return Err(Error::config_validation(messages.join("; ")));
    }

    Ok(())
}

fn ensure_unique_names(labels: &[LabelConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.name.as_str()) {
            return Err(Error::config_validation(format!(
                "Duplicate label name: {}",
                label.name
            )));
        }
    }
    Ok(())
}
