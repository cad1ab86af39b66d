//! # gh-label-sync
//!
//! Reconcile the labels of a GitHub repository against a declarative
//! configuration file checked into a repository
//!
//! ## Features
//! - Create, update and delete labels so the repository matches the file
//! - Schema-validated configuration
//! - Dry-run mode
//! - Best-effort or fail-fast handling of failed mutations

pub mod config;
pub mod error;
pub mod github;
pub mod sync;

pub use config::{ConfigLocation, ContentSource, LabelConfig, SyncConfig};
pub use error::{Error, ErrorKind, Result};
pub use github::{GitHubClient, LabelStore};
pub use sync::{reconcile, ApplyPolicy, LabelDiff, LabelSyncer, SyncOperation, SyncResult};

/// Build a GitHub client, for `api_url` when given and api.github.com otherwise
///
/// # Errors
/// Returns an error if the client cannot be initialized
pub fn connect(access_token: &str, api_url: Option<&str>) -> Result<GitHubClient> {
    match api_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => GitHubClient::with_base_uri(access_token, url),
        None => GitHubClient::new(access_token),
    }
}

/// Run one synchronization pass
///
/// Loads the desired labels, lists the current ones and applies the
/// difference. Nothing is mutated if either read fails.
///
/// # Examples
///
/// ```rust,no_run
/// use gh_label_sync::{ApplyPolicy, ConfigLocation, SyncConfig};
///
/// #[tokio::main]
/// async fn main() -> gh_label_sync::Result<()> {
///     let config = SyncConfig {
///         access_token: "your_github_token".to_string(),
///         owner: "owner".to_string(),
///         repo: "repo".to_string(),
///         configuration: ConfigLocation::resolve(None, "owner", "repo", ".github/labels.yml", None)?,
///         api_url: None,
///         dry_run: false,
///         policy: ApplyPolicy::BestEffort,
///     };
///
///     let result = gh_label_sync::sync_repository_labels(&config).await?;
///     println!("Sync completed: {:?}", result);
///     Ok(())
/// }
/// ```
pub async fn sync_repository_labels(config: &SyncConfig) -> Result<SyncResult> {
    config.validate()?;

    let client = connect(&config.access_token, config.api_url.as_deref())?;
    let desired = crate::config::load_labels(&client, &config.configuration).await?;

    let syncer = LabelSyncer::new(client, &config.owner, &config.repo)
        .with_dry_run(config.dry_run)
        .with_policy(config.policy);
    syncer.sync_labels(&desired).await
}
