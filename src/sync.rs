//! Label Synchronization Functionality
//!
//! Diffing the current label set against the desired one and applying the
//! result through a [`LabelStore`]

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::LabelConfig;
use crate::error::Result;
use crate::github::LabelStore;

/// Types of label synchronization operations
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOperation {
    /// Create a label
    Create { label: LabelConfig },

    /// Update description and/or color of a label with the same name
    Update {
        label: LabelConfig,
        changes: Vec<String>,
    },

    /// Delete a label
    Delete { name: String },

    /// No change
    NoChange { name: String },
}

impl SyncOperation {
    /// Name of the label this operation targets
    pub fn name(&self) -> &str {
        match self {
            SyncOperation::Create { label } | SyncOperation::Update { label, .. } => &label.name,
            SyncOperation::Delete { name } | SyncOperation::NoChange { name } => name,
        }
    }

    /// Whether this operation mutates the repository
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SyncOperation::NoChange { .. })
    }
}

/// Result of comparing current and desired labels
///
/// Operations are ordered for application: every deletion (in current
/// order) comes first, then creations, updates and no-ops in desired order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelDiff {
    operations: Vec<SyncOperation>,
}

impl LabelDiff {
    /// All operations in application order
    pub fn operations(&self) -> &[SyncOperation] {
        &self.operations
    }

    /// Names of labels to delete
    pub fn deletions(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                SyncOperation::Delete { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Labels to create
    pub fn creations(&self) -> Vec<&LabelConfig> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                SyncOperation::Create { label } => Some(label),
                _ => None,
            })
            .collect()
    }

    /// Labels to update
    pub fn updates(&self) -> Vec<&LabelConfig> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                SyncOperation::Update { label, .. } => Some(label),
                _ => None,
            })
            .collect()
    }

    /// Names of labels already in the desired state
    pub fn unchanged(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                SyncOperation::NoChange { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether applying the diff would change anything
    pub fn is_empty(&self) -> bool {
        !self.operations.iter().any(SyncOperation::is_mutation)
    }

    pub fn into_operations(self) -> Vec<SyncOperation> {
        self.operations
    }
}

/// Compute the operations turning `current` into `desired`
///
/// Labels are matched by exact, case-sensitive name. A label present on
/// both sides is updated when its description or color differs.
pub fn reconcile(current: &[LabelConfig], desired: &[LabelConfig]) -> LabelDiff {
    let current_by_name: HashMap<&str, &LabelConfig> = current
        .iter()
        .map(|label| (label.name.as_str(), label))
        .collect();
    let desired_by_name: HashMap<&str, &LabelConfig> = desired
        .iter()
        .map(|label| (label.name.as_str(), label))
        .collect();

    let mut operations = Vec::with_capacity(current.len() + desired.len());

    for label in current {
        if !desired_by_name.contains_key(label.name.as_str()) {
            operations.push(SyncOperation::Delete {
                name: label.name.clone(),
            });
        }
    }

    for target in desired {
        let operation = match current_by_name.get(target.name.as_str()) {
            Some(existing) => check_label_changes(existing, target),
            None => SyncOperation::Create {
                label: target.clone(),
            },
        };
        operations.push(operation);
    }

    LabelDiff { operations }
}

/// Check label changes
///
/// # Arguments
/// - `current`: Current label
/// - `target`: Target label with the same name
///
/// # Returns
/// `Update` listing the differing fields, or `NoChange`
fn check_label_changes(current: &LabelConfig, target: &LabelConfig) -> SyncOperation {
    let mut changes = Vec::new();

    if current.color != target.color {
        changes.push(format!("color: {} -> {}", current.color, target.color));
    }

    if current.description != target.description {
        let old_desc = current.description.as_deref().unwrap_or("(none)");
        let new_desc = target.description.as_deref().unwrap_or("(none)");
        changes.push(format!("description: {} -> {}", old_desc, new_desc));
    }

    if changes.is_empty() {
        SyncOperation::NoChange {
            name: current.name.clone(),
        }
    } else {
        SyncOperation::Update {
            label: target.clone(),
            changes,
        }
    }
}

/// What to do when a single mutation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Record the failure and keep applying the remaining operations
    #[default]
    BestEffort,

    /// Stop at the first failed operation
    FailFast,
}

impl fmt::Display for ApplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyPolicy::BestEffort => write!(f, "best-effort"),
            ApplyPolicy::FailFast => write!(f, "fail-fast"),
        }
    }
}

impl FromStr for ApplyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" => Ok(ApplyPolicy::BestEffort),
            "fail-fast" => Ok(ApplyPolicy::FailFast),
            other => Err(format!(
                "unknown policy '{}' (expected 'best-effort' or 'fail-fast')",
                other
            )),
        }
    }
}

/// A mutation that was attempted and failed
#[derive(Debug, Clone, PartialEq)]
pub struct SyncFailure {
    pub operation: SyncOperation,
    pub error: String,
}

/// Synchronization result
#[derive(Debug, Clone)]
pub struct SyncResult {
    /// Operations that succeeded (or were planned, in dry-run mode)
    pub operations: Vec<SyncOperation>,

    /// Number of labels created
    pub created: u32,

    /// Number of labels updated
    pub updated: u32,

    /// Number of labels deleted
    pub deleted: u32,

    /// Number of labels unchanged
    pub unchanged: u32,

    /// Whether this is a dry run
    pub dry_run: bool,

    /// Operations that failed
    pub failures: Vec<SyncFailure>,

    /// Operations never attempted because an earlier one failed
    pub skipped: Vec<SyncOperation>,
}

impl SyncResult {
    /// Create a new empty synchronization result
    pub fn new(dry_run: bool) -> Self {
        Self {
            operations: Vec::new(),
            created: 0,
            updated: 0,
            deleted: 0,
            unchanged: 0,
            dry_run,
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Add an operation and update statistics
    pub fn add_operation(&mut self, operation: SyncOperation) {
        match &operation {
            SyncOperation::Create { .. } => self.created += 1,
            SyncOperation::Update { .. } => self.updated += 1,
            SyncOperation::Delete { .. } => self.deleted += 1,
            SyncOperation::NoChange { .. } => self.unchanged += 1,
        }
        self.operations.push(operation);
    }

    /// Add a failed operation
    pub fn add_failure(&mut self, operation: SyncOperation, error: String) {
        self.failures.push(SyncFailure { operation, error });
    }

    /// Whether changes were (or would be) made
    pub fn has_changes(&self) -> bool {
        self.created > 0 || self.updated > 0 || self.deleted > 0
    }

    /// Whether every attempted mutation succeeded and none was skipped
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    /// Get total number of successful operations
    pub fn total_operations(&self) -> u32 {
        self.created + self.updated + self.deleted + self.unchanged
    }
}

/// Label Synchronization Engine
///
/// Makes the labels of one repository match a desired set through a
/// [`LabelStore`]. Mutations are issued one at a time, deletions first.
pub struct LabelSyncer<S> {
    store: S,
    owner: String,
    repo: String,
    dry_run: bool,
    policy: ApplyPolicy,
}

impl<S: LabelStore> LabelSyncer<S> {
    /// Create a new label synchronization engine for `owner/repo`
    pub fn new(store: S, owner: &str, repo: &str) -> Self {
        Self {
            store,
            owner: owner.to_string(),
            repo: repo.to_string(),
            dry_run: false,
            policy: ApplyPolicy::default(),
        }
    }

    /// Plan operations without issuing any mutation
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: ApplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying label store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the current labels and compute the diff against `desired`
    ///
    /// # Errors
    /// Returns an error if the current labels cannot be listed
    pub async fn plan(&self, desired: &[LabelConfig]) -> Result<LabelDiff> {
        debug!(owner = %self.owner, repo = %self.repo, "Fetching current labels");
        let current = self.store.list_all(&self.owner, &self.repo).await?;
        debug!(count = current.len(), "Retrieved current labels");

        Ok(reconcile(&current, desired))
    }

    /// Synchronize labels
    ///
    /// # Returns
    /// Synchronization result with per-operation outcomes
    ///
    /// # Errors
    /// Returns an error if the current labels cannot be listed; nothing is
    /// applied in that case. Failed mutations are recorded in the result.
    pub async fn sync_labels(&self, desired: &[LabelConfig]) -> Result<SyncResult> {
        let diff = self.plan(desired).await?;
        let mut result = SyncResult::new(self.dry_run);

        info!(
            repository = %format!("{}/{}", self.owner, self.repo),
            deletions = diff.deletions().len(),
            creations = diff.creations().len(),
            updates = diff.updates().len(),
            dry_run = self.dry_run,
            "Applying label changes"
        );

        let mut operations = diff.into_operations().into_iter();
        while let Some(operation) = operations.next() {
            match self.execute_operation(&operation).await {
                Ok(()) => {
                    self.trace_operation(&operation);
                    result.add_operation(operation);
                }
                Err(e) => {
                    warn!(
                        label = operation.name(),
                        error = %e,
                        "Label operation failed"
                    );
                    result.add_failure(operation, e.to_string());

                    if self.policy == ApplyPolicy::FailFast {
                        result.skipped = operations
                            .by_ref()
                            .filter(SyncOperation::is_mutation)
                            .collect();
                        break;
                    }
                }
            }
        }

        Ok(result)
    }

    /// Execute an operation
    ///
    /// # Errors
    /// Returns an error if the store rejects the mutation
    async fn execute_operation(&self, operation: &SyncOperation) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }

        match operation {
            SyncOperation::Create { label } => {
                self.store.create(&self.owner, &self.repo, label).await?;
            }
            SyncOperation::Update { label, .. } => {
                self.store.update(&self.owner, &self.repo, label).await?;
            }
            SyncOperation::Delete { name } => {
                self.store.delete(&self.owner, &self.repo, name).await?;
            }
            SyncOperation::NoChange { .. } => {}
        }

        Ok(())
    }

    fn trace_operation(&self, operation: &SyncOperation) {
        let repository = format!("{}/{}", self.owner, self.repo);
        let message = describe_operation(operation, &repository, self.dry_run);
        match operation {
            SyncOperation::Update { changes, .. } => {
                debug!(changes = %changes.join(", "), "{}", message)
            }
            _ => debug!("{}", message),
        }
    }
}

/// One-line description of an applied (or, in dry-run mode, planned) operation
fn describe_operation(operation: &SyncOperation, repository: &str, dry_run: bool) -> String {
    let tense = if dry_run { "would be" } else { "has been" };
    match operation {
        SyncOperation::Create { label } => {
            format!("Label: {} {} created on {}", label.name, tense, repository)
        }
        SyncOperation::Update { label, .. } => {
            format!("Label: {} {} updated on {}", label.name, tense, repository)
        }
        SyncOperation::Delete { name } => {
            format!("Label: {} {} deleted on {}", name, tense, repository)
        }
        SyncOperation::NoChange { name } => {
            format!("Label: {} has not been changed on {}", name, repository)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory label store recording every call
    #[derive(Default)]
    struct RecordingStore {
        labels: Mutex<Vec<LabelConfig>>,
        calls: Mutex<Vec<String>>,
        failing: HashSet<String>,
        list_fails: bool,
    }

    impl RecordingStore {
        fn with_labels(labels: Vec<LabelConfig>) -> Self {
            Self {
                labels: Mutex::new(labels),
                ..Default::default()
            }
        }

        fn failing_on(mut self, name: &str) -> Self {
            self.failing.insert(name.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn labels(&self) -> Vec<LabelConfig> {
            self.labels.lock().unwrap().clone()
        }

        fn record(&self, call: String, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.failing.contains(name) {
                return Err(Error::RepositoryNotFound(format!("cannot touch {}", name)));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LabelStore for RecordingStore {
        async fn list_all(&self, owner: &str, repo: &str) -> Result<Vec<LabelConfig>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("list {}/{}", owner, repo));
            if self.list_fails {
                return Err(Error::RepositoryNotFound(format!("{}/{}", owner, repo)));
            }
            Ok(self.labels())
        }

        async fn create(&self, _owner: &str, _repo: &str, label: &LabelConfig) -> Result<()> {
            self.record(format!("create {}", label.name), &label.name)?;
            self.labels.lock().unwrap().push(label.clone());
            Ok(())
        }

        async fn update(&self, _owner: &str, _repo: &str, label: &LabelConfig) -> Result<()> {
            self.record(format!("update {}", label.name), &label.name)?;
            let mut labels = self.labels.lock().unwrap();
            if let Some(existing) = labels.iter_mut().find(|l| l.name == label.name) {
                *existing = label.clone();
            }
            Ok(())
        }

        async fn delete(&self, _owner: &str, _repo: &str, name: &str) -> Result<()> {
            self.record(format!("delete {}", name), name)?;
            self.labels.lock().unwrap().retain(|l| l.name != name);
            Ok(())
        }
    }

    fn label(name: &str, color: &str) -> LabelConfig {
        LabelConfig::new(name, color)
    }

    #[test]
    fn test_disjoint_sets() {
        let current = vec![label("a", "111"), label("b", "222")];
        let desired = vec![label("c", "333"), label("d", "444")];

        let diff = reconcile(&current, &desired);
        assert_eq!(diff.deletions(), vec!["a", "b"]);
        assert_eq!(diff.creations(), vec![&desired[0], &desired[1]]);
        assert!(diff.updates().is_empty());
        assert!(diff.unchanged().is_empty());
    }

    #[test]
    fn test_equal_sets() {
        let labels = vec![
            label("bug", "f00").with_description("Something isn't working"),
            label("feature", "0f0"),
        ];

        let diff = reconcile(&labels, &labels);
        assert!(diff.deletions().is_empty());
        assert!(diff.creations().is_empty());
        assert!(diff.updates().is_empty());
        assert_eq!(diff.unchanged(), vec!["bug", "feature"]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_color_change_is_single_update() {
        let current = vec![label("bug", "f00")];
        let desired = vec![label("bug", "00f")];

        let diff = reconcile(&current, &desired);
        assert!(diff.deletions().is_empty());
        assert!(diff.creations().is_empty());
        assert_eq!(diff.updates(), vec![&desired[0]]);
        assert_eq!(
            diff.operations(),
            &[SyncOperation::Update {
                label: desired[0].clone(),
                changes: vec!["color: f00 -> 00f".to_string()],
            }]
        );
    }

    #[test]
    fn test_added_label_scenario() {
        let current = vec![label("bug", "f00")];
        let desired = vec![label("bug", "f00"), label("feature", "0f0")];

        let diff = reconcile(&current, &desired);
        assert_eq!(diff.creations(), vec![&desired[1]]);
        assert!(diff.deletions().is_empty());
        assert!(diff.updates().is_empty());
    }

    #[test]
    fn test_description_change_scenario() {
        let current = vec![label("bug", "f00").with_description("old")];
        let desired = vec![label("bug", "f00").with_description("new")];

        let diff = reconcile(&current, &desired);
        assert_eq!(diff.updates(), vec![&desired[0]]);
        assert!(diff.creations().is_empty());
        assert!(diff.deletions().is_empty());
    }

    #[test]
    fn test_description_removed_is_update() {
        let current = vec![label("bug", "f00").with_description("old")];
        let desired = vec![label("bug", "f00")];

        let diff = reconcile(&current, &desired);
        assert_eq!(diff.updates().len(), 1);
    }

    #[test]
    fn test_removed_label_scenario() {
        let current = vec![label("wontfix", "000")];

        let diff = reconcile(&current, &[]);
        assert_eq!(diff.deletions(), vec!["wontfix"]);
        assert!(diff.creations().is_empty());
        assert!(diff.updates().is_empty());
    }

    #[test]
    fn test_name_matching_is_case_sensitive() {
        let current = vec![label("Bug", "f00")];
        let desired = vec![label("bug", "f00")];

        let diff = reconcile(&current, &desired);
        assert_eq!(diff.deletions(), vec!["Bug"]);
        assert_eq!(diff.creations(), vec![&desired[0]]);
    }

    #[test]
    fn test_rename_is_delete_then_create() {
        let current = vec![label("defect", "f00")];
        let desired = vec![label("bug", "f00")];

        let diff = reconcile(&current, &desired);
        assert_eq!(
            diff.operations(),
            &[
                SyncOperation::Delete {
                    name: "defect".to_string()
                },
                SyncOperation::Create {
                    label: desired[0].clone()
                },
            ]
        );
    }

    #[test]
    fn test_operation_order() {
        let current = vec![
            label("keep", "111"),
            label("old-1", "222"),
            label("stale", "333"),
            label("old-2", "444"),
        ];
        let desired = vec![
            label("new-1", "555"),
            label("stale", "999"),
            label("keep", "111"),
            label("new-2", "666"),
        ];

        let diff = reconcile(&current, &desired);
        let names: Vec<&str> = diff
            .operations()
            .iter()
            .map(SyncOperation::name)
            .collect();
        assert_eq!(
            names,
            vec!["old-1", "old-2", "new-1", "stale", "keep", "new-2"]
        );
    }

    #[test]
    fn test_describe_operation() {
        let create = SyncOperation::Create {
            label: label("bug", "f00"),
        };
        assert_eq!(
            describe_operation(&create, "owner/repo", false),
            "Label: bug has been created on owner/repo"
        );
        assert_eq!(
            describe_operation(&create, "owner/repo", true),
            "Label: bug would be created on owner/repo"
        );

        let delete = SyncOperation::Delete {
            name: "wontfix".to_string(),
        };
        assert_eq!(
            describe_operation(&delete, "owner/repo", true),
            "Label: wontfix would be deleted on owner/repo"
        );

        let unchanged = SyncOperation::NoChange {
            name: "keep".to_string(),
        };
        assert_eq!(
            describe_operation(&unchanged, "owner/repo", true),
            "Label: keep has not been changed on owner/repo"
        );
    }

    #[test]
    fn test_apply_policy_parsing() {
        assert_eq!(
            "best-effort".parse::<ApplyPolicy>().unwrap(),
            ApplyPolicy::BestEffort
        );
        assert_eq!(
            "Fail-Fast".parse::<ApplyPolicy>().unwrap(),
            ApplyPolicy::FailFast
        );
        assert!("sometimes".parse::<ApplyPolicy>().is_err());
        assert_eq!(ApplyPolicy::default().to_string(), "best-effort");
    }

    #[test]
    fn test_sync_result_operations() {
        let mut result = SyncResult::new(false);

        result.add_operation(SyncOperation::Create {
            label: label("test", "ff0000"),
        });
        result.add_operation(SyncOperation::NoChange {
            name: "same".to_string(),
        });

        assert_eq!(result.created, 1);
        assert_eq!(result.unchanged, 1);
        assert_eq!(result.total_operations(), 2);
        assert!(result.has_changes());
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_sync_applies_deletions_before_creations() {
        let store = RecordingStore::with_labels(vec![
            label("bug", "f00"),
            label("defect", "f00"),
            label("question", "ccc").with_description("old"),
        ]);
        let desired = vec![
            label("enhancement", "0f0"),
            label("question", "ccc").with_description("new"),
            label("bug", "f00"),
        ];

        let syncer = LabelSyncer::new(store, "owner", "repo");
        let result = syncer.sync_labels(&desired).await.unwrap();

        assert_eq!(
            syncer.store().calls(),
            vec![
                "list owner/repo",
                "delete defect",
                "create enhancement",
                "update question",
            ]
        );
        assert_eq!(result.deleted, 1);
        assert_eq!(result.created, 1);
        assert_eq!(result.updated, 1);
        assert_eq!(result.unchanged, 1);
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let store = RecordingStore::with_labels(vec![
            label("wontfix", "000"),
            label("bug", "f00").with_description("old"),
        ]);
        let desired = vec![
            label("bug", "f00").with_description("new"),
            label("feature", "0f0"),
        ];

        let syncer = LabelSyncer::new(store, "owner", "repo");
        syncer.sync_labels(&desired).await.unwrap();

        let after = syncer.store().labels();
        let diff = reconcile(&after, &desired);
        assert!(diff.is_empty());
        assert!(reconcile(&desired, &desired).is_empty());

        let second = syncer.sync_labels(&desired).await.unwrap();
        assert!(!second.has_changes());
        assert_eq!(second.unchanged, 2);
    }

    #[tokio::test]
    async fn test_sync_dry_run_issues_no_mutation() {
        let store = RecordingStore::with_labels(vec![label("wontfix", "000")]);
        let desired = vec![label("bug", "f00")];

        let syncer = LabelSyncer::new(store, "owner", "repo").with_dry_run(true);
        let result = syncer.sync_labels(&desired).await.unwrap();

        assert_eq!(syncer.store().calls(), vec!["list owner/repo"]);
        assert!(result.dry_run);
        assert_eq!(result.created, 1);
        assert_eq!(result.deleted, 1);
        assert_eq!(syncer.store().labels(), vec![label("wontfix", "000")]);
    }

    #[tokio::test]
    async fn test_sync_list_failure_applies_nothing() {
        let store = RecordingStore {
            list_fails: true,
            ..RecordingStore::with_labels(vec![label("wontfix", "000")])
        };

        let syncer = LabelSyncer::new(store, "owner", "repo");
        let result = syncer.sync_labels(&[label("bug", "f00")]).await;

        assert!(result.is_err());
        assert_eq!(syncer.store().calls(), vec!["list owner/repo"]);
    }

    #[tokio::test]
    async fn test_sync_best_effort_continues_after_failure() {
        let store = RecordingStore::with_labels(vec![label("a", "111"), label("b", "222")])
            .failing_on("a");

        let syncer = LabelSyncer::new(store, "owner", "repo");
        let result = syncer.sync_labels(&[label("c", "333")]).await.unwrap();

        assert_eq!(
            syncer.store().calls(),
            vec!["list owner/repo", "delete a", "delete b", "create c"]
        );
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].operation.name(), "a");
        assert_eq!(result.deleted, 1);
        assert_eq!(result.created, 1);
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_sync_fail_fast_stops_at_first_failure() {
        let store = RecordingStore::with_labels(vec![label("a", "111"), label("b", "222")])
            .failing_on("a");

        let syncer = LabelSyncer::new(store, "owner", "repo").with_policy(ApplyPolicy::FailFast);
        let result = syncer
            .sync_labels(&[label("c", "333"), label("d", "444")])
            .await
            .unwrap();

        assert_eq!(syncer.store().calls(), vec!["list owner/repo", "delete a"]);
        assert_eq!(result.failures.len(), 1);
        let skipped: Vec<&str> = result.skipped.iter().map(SyncOperation::name).collect();
        assert_eq!(skipped, vec!["b", "c", "d"]);
        assert!(!result.is_success());
    }
}
