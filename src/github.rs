//! GitHub API Client
//!
//! Module for managing interactions with the GitHub API

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{ConfigLocation, ContentSource, LabelConfig};
use crate::error::{Error, Result};

/// Page size used when listing labels (the API maximum)
pub const LABELS_PER_PAGE: u8 = 100;

/// Encode a string for use in URL path segments (RFC 3986 with UTF-8 support)
///
/// This function properly encodes UTF-8 characters including Japanese text.
/// Only unreserved characters (A-Z, a-z, 0-9, -, ., _, ~) are left unencoded.
///
/// # Arguments
/// - `input`: The string to encode
///
/// # Returns
/// URL-encoded string safe for use in path segments
fn encode_path_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            // RFC 3986 unreserved characters
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c.to_string(),
            // Everything else gets percent-encoded as UTF-8 bytes
            _ => c
                .to_string()
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>(),
        })
        .collect()
}

/// Check if an octocrab error is a 404 Not Found
fn is_not_found_error(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

/// Decode the base64 payload of a contents API response
///
/// GitHub wraps the encoded text at 60 columns, so whitespace is stripped
/// before decoding.
fn decode_content(path: &str, encoding: Option<&str>, content: Option<&str>) -> Result<String> {
    match encoding {
        Some("base64") | None => {}
        Some(other) => {
            return Err(Error::ContentDecode(format!(
                "{} has unsupported encoding '{}'",
                path, other
            )))
        }
    }

    let content =
        content.ok_or_else(|| Error::ContentDecode(format!("{} has no content", path)))?;
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(cleaned)
        .map_err(|e| Error::ContentDecode(format!("{} is not valid base64: {}", path, e)))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::ContentDecode(format!("{} is not valid UTF-8: {}", path, e)))
}

/// Label store
///
/// Lists and mutates the labels of a repository. Every call is awaited by
/// the caller before the next one is issued.
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// List every label of `owner/repo`, following pagination to the end
    async fn list_all(&self, owner: &str, repo: &str) -> Result<Vec<LabelConfig>>;

    /// Create a label
    async fn create(&self, owner: &str, repo: &str, label: &LabelConfig) -> Result<()>;

    /// Update color and description of the label named `label.name`
    async fn update(&self, owner: &str, repo: &str, label: &LabelConfig) -> Result<()>;

    /// Delete the label named `name`
    async fn delete(&self, owner: &str, repo: &str, name: &str) -> Result<()>;
}

/// GitHub Label Information
///
/// Represents label information retrieved from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubLabel {
    /// Label ID
    pub id: u64,

    /// Label name
    pub name: String,

    /// Label color (6-digit hexadecimal, without #)
    pub color: String,

    /// Label description
    pub description: Option<String>,

    /// Whether this is a default label
    pub default: bool,

    /// Label URL
    pub url: String,
}

impl From<octocrab::models::Label> for GitHubLabel {
    fn from(label: octocrab::models::Label) -> Self {
        GitHubLabel {
            id: label.id.0,
            name: label.name,
            color: label.color,
            description: label.description,
            default: label.default,
            url: label.url.to_string(),
        }
    }
}

impl From<GitHubLabel> for LabelConfig {
    fn from(github_label: GitHubLabel) -> Self {
        LabelConfig {
            name: github_label.name,
            color: github_label.color,
            description: github_label.description,
        }
        .normalized()
    }
}

/// Body of `PATCH /repos/{owner}/{repo}/labels/{name}`
#[derive(Debug, Serialize)]
struct UpdateLabelRequest<'a> {
    color: &'a str,
    description: &'a str,
}

/// GitHub API Client
///
/// Client responsible for interactions with the GitHub API
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Create a new GitHub client for api.github.com
    ///
    /// # Arguments
    /// - `access_token`: GitHub access token
    ///
    /// # Errors
    /// Returns an error if client initialization fails
    pub fn new(access_token: &str) -> Result<Self> {
        Self::build(access_token, None)
    }

    /// Create a new GitHub client for another API endpoint (GitHub Enterprise)
    ///
    /// # Errors
    /// Returns an error if `base_uri` is not a valid URI
    pub fn with_base_uri(access_token: &str, base_uri: &str) -> Result<Self> {
        Self::build(access_token, Some(base_uri))
    }

    fn build(access_token: &str, base_uri: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(uri) = base_uri {
            builder = builder.base_uri(uri)?;
        }

        let octocrab = builder.personal_token(access_token.to_string()).build()?;
        Ok(Self { octocrab })
    }

    /// Get all labels from the repository
    ///
    /// Pages are requested until one comes back with fewer than
    /// [`LABELS_PER_PAGE`] items.
    ///
    /// # Errors
    /// Returns an error if GitHub API fails or repository is not found
    #[instrument(skip(self))]
    pub async fn get_all_labels(&self, owner: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
        let per_page = usize::from(LABELS_PER_PAGE);
        let mut labels: Vec<GitHubLabel> = Vec::new();

        loop {
            let page_number = (labels.len() / per_page + 1) as u32;
            let response = self
                .octocrab
                .issues(owner, repo)
                .list_labels_for_repo()
                .per_page(LABELS_PER_PAGE)
                .page(page_number)
                .send()
                .await
                .map_err(|e| {
                    if is_not_found_error(&e) {
                        Error::RepositoryNotFound(format!("{}/{}", owner, repo))
                    } else {
                        Error::GitHubApi(e)
                    }
                })?;

            let count = response.items.len();
            debug!(page = page_number, count, "Fetched label page");
            labels.extend(response.items.into_iter().map(GitHubLabel::from));

            if count < per_page {
                break;
            }
        }

        Ok(labels)
    }
}

#[async_trait]
impl LabelStore for GitHubClient {
    async fn list_all(&self, owner: &str, repo: &str) -> Result<Vec<LabelConfig>> {
        let labels = self.get_all_labels(owner, repo).await?;
        Ok(labels.into_iter().map(LabelConfig::from).collect())
    }

    #[instrument(skip(self, label), fields(name = %label.name))]
    async fn create(&self, owner: &str, repo: &str, label: &LabelConfig) -> Result<()> {
        self.octocrab
            .issues(owner, repo)
            .create_label(
                &label.name,
                &label.color,
                label.description.as_deref().unwrap_or(""),
            )
            .await?;

        Ok(())
    }

    #[instrument(skip(self, label), fields(name = %label.name))]
    async fn update(&self, owner: &str, repo: &str, label: &LabelConfig) -> Result<()> {
        let route = format!(
            "/repos/{}/{}/labels/{}",
            owner,
            repo,
            encode_path_segment(&label.name)
        );
        let body = UpdateLabelRequest {
            color: &label.color,
            description: label.description.as_deref().unwrap_or(""),
        };

        let _updated: octocrab::models::Label = self.octocrab.patch(route, Some(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        // URL encode the label name to handle spaces, special characters, and non-ASCII text
        let route = format!(
            "/repos/{}/{}/labels/{}",
            owner,
            repo,
            encode_path_segment(name)
        );

        // `_delete` hands back the raw response, status included
        let response = self.octocrab._delete(route, None::<&()>).await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentSource for GitHubClient {
    #[instrument(skip(self, location), fields(repository = %location.repository(), path = %location.path))]
    async fn fetch_content(&self, location: &ConfigLocation) -> Result<String> {
        let handler = self.octocrab.repos(&location.owner, &location.repo);
        let mut request = handler.get_content().path(&location.path);
        if let Some(reference) = &location.reference {
            request = request.r#ref(reference);
        }

        let content_items = request.send().await.map_err(|e| {
            if is_not_found_error(&e) {
                Error::ConfigurationNotFound {
                    repository: location.repository(),
                    path: location.path.clone(),
                }
            } else {
                Error::GitHubApi(e)
            }
        })?;

        if content_items.items.len() != 1 {
            return Err(Error::ContentDecode(format!(
                "{} is not a file",
                location.path
            )));
        }

        let item = &content_items.items[0];
        decode_content(
            &location.path,
            item.encoding.as_deref(),
            item.content.as_deref(),
        )
    }
}
