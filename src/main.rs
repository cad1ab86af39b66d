//! gh-label-sync CLI
//!
//! Command line tool and GitHub Actions entry point for reconciling
//! repository labels

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gh_label_sync::{
    sync::{SyncOperation, SyncResult},
    ApplyPolicy, ConfigLocation, Error, Result, SyncConfig,
};

/// gh-label-sync CLI
///
/// Make the labels of a repository match a configuration file
#[derive(Parser)]
#[command(
    name = "gh-label-sync",
    version,
    about = "Reconcile GitHub repository labels against a configuration file",
    long_about = "Reads the desired labels from a YAML document stored in a repository, \
    compares them with the labels the repository currently has and creates, updates or \
    deletes labels until both match. Inputs can be given as flags or as GitHub Actions \
    INPUT_* environment variables."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GitHub access token (falls back to GITHUB_TOKEN)
    #[arg(
        short = 't',
        long,
        global = true,
        env = "INPUT_REPO-TOKEN",
        hide_env_values = true
    )]
    token: Option<String>,

    /// Repository-relative path of the label configuration
    #[arg(short = 'c', long, global = true, env = "INPUT_CONFIGURATION-PATH")]
    configuration_path: Option<String>,

    /// Owner of the repository whose labels are synchronized
    #[arg(long, global = true, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// Name of the repository whose labels are synchronized
    #[arg(long, global = true, env = "INPUT_REPO")]
    repo: Option<String>,

    /// Repository holding the configuration (owner/repo, defaults to the target)
    #[arg(long, global = true, env = "GITHUB_REPOSITORY")]
    configuration_repository: Option<String>,

    /// Git ref to read the configuration at
    #[arg(long = "ref", global = true, env = "GITHUB_SHA")]
    reference: Option<String>,

    /// GitHub API base URL
    #[arg(long, global = true, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Dry run mode (don't make actual changes)
    #[arg(
        long,
        global = true,
        env = "INPUT_DRY-RUN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    dry_run: bool,

    /// Failure policy for individual label operations (best-effort or fail-fast)
    #[arg(long, global = true, env = "INPUT_POLICY")]
    policy: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize labels (default)
    Sync,

    /// Show what a synchronization would change
    Preview,

    /// Display current labels
    List {
        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json", "yaml"])]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        report_failure(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::List { format }) => run_list(&cli, format).await,
        Some(Commands::Preview) => {
            let mut config = build_sync_config(&cli)?;
            config.dry_run = true;
            run_sync(config, cli.verbose).await
        }
        Some(Commands::Sync) | None => {
            let config = build_sync_config(&cli)?;
            run_sync(config, cli.verbose).await
        }
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` wins; otherwise `--verbose` or an Actions debug run
/// (`RUNNER_DEBUG=1`) turns on debug output for this crate.
fn init_tracing(verbose: bool) {
    let debug = verbose || std::env::var("RUNNER_DEBUG").map_or(false, |v| v == "1");
    let level = if debug { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,gh_label_sync={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute synchronization
async fn run_sync(config: SyncConfig, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        println!(
            "{} Synchronizing labels of {} from {}:{}",
            "•".blue(),
            config.repository().cyan(),
            config.configuration.repository().cyan(),
            config.configuration.path.cyan()
        );

        if config.dry_run {
            println!(
                "{} Running in dry-run mode (no changes will be made)",
                "!".yellow()
            );
        }
    }

    let result = gh_label_sync::sync_repository_labels(&config)
        .await
        .with_context(|| format!("Label synchronization failed for {}", config.repository()))?;

    display_sync_result(&result, verbose);

    if !result.is_success() {
        eprintln!("\n{} Errors occurred:", "✗".red());
        for failure in &result.failures {
            eprintln!("  {}: {}", failure.operation.name().red(), failure.error);
        }
        for skipped in &result.skipped {
            eprintln!("  {}: not attempted", skipped.name().yellow());
        }
        anyhow::bail!(
            "{} label operation(s) failed on {}",
            result.failures.len(),
            config.repository()
        );
    }

    Ok(())
}

/// Execute list command
async fn run_list(cli: &Cli, format: &str) -> anyhow::Result<()> {
    let token = get_access_token(cli.token.clone())?;
    let owner = require_input(cli.owner.clone(), "owner")?;
    let repo = require_input(cli.repo.clone(), "repo")?;

    let client = gh_label_sync::connect(&token, cli.api_url.as_deref())?;
    let labels = client
        .get_all_labels(&owner, &repo)
        .await
        .with_context(|| format!("Failed to list labels of {}/{}", owner, repo))?;

    match format {
        "table" => {
            println!(
                "{:<30} {:<8} {:<50}",
                "Name".cyan(),
                "Color".cyan(),
                "Description".cyan()
            );
            println!("{}", "─".repeat(90));

            for label in labels {
                let description = label.description.as_deref().unwrap_or("(none)");
                println!(
                    "{:<30} {:<8} {:<50}",
                    label.name,
                    format!("#{}", label.color),
                    description
                );
            }
        }
        "json" => {
            let json = serde_json::to_string_pretty(&labels).map_err(Error::from)?;
            println!("{}", json);
        }
        "yaml" => {
            let yaml = serde_yaml::to_string(&labels).map_err(Error::from)?;
            println!("{}", yaml);
        }
        _ => return Err(Error::InvalidInput(format!("Unsupported format: {}", format)).into()),
    }

    Ok(())
}

/// Display synchronization results
fn display_sync_result(result: &SyncResult, verbose: bool) {
    if result.dry_run && result.has_changes() {
        println!("\n{} Sync preview (dry-run mode):", "📋".blue());
    } else if result.has_changes() {
        println!("\n{} Sync completed:", "✓".green());
    } else {
        println!("\n{} No changes required", "✓".green());
    }

    // Display statistics
    println!("  📝 Created: {}", result.created.to_string().green());
    println!("  🔄 Updated: {}", result.updated.to_string().yellow());
    println!("  🗑️ Deleted: {}", result.deleted.to_string().red());
    println!("  ➖ Unchanged: {}", result.unchanged.to_string().white());

    if verbose {
        println!("\n{} Detailed operations:", "📋".blue());
        for (i, operation) in result.operations.iter().enumerate() {
            let prefix = format!("  {}.", i + 1);
            match operation {
                SyncOperation::Create { label } => {
                    println!(
                        "{} {} Create label: {} (#{})",
                        prefix,
                        "📝".green(),
                        label.name.cyan(),
                        label.color
                    );
                }
                SyncOperation::Update { label, changes } => {
                    println!(
                        "{} {} Update label: {}",
                        prefix,
                        "🔄".yellow(),
                        label.name.cyan()
                    );
                    for change in changes {
                        println!("      {}", change.dimmed());
                    }
                }
                SyncOperation::Delete { name } => {
                    println!("{} {} Delete label: {}", prefix, "🗑️".red(), name.red());
                }
                SyncOperation::NoChange { name } => {
                    println!("{} {} No change: {}", prefix, "➖".white(), name.white());
                }
            }
        }
    }
}

/// Report a failed run
///
/// Inside GitHub Actions the message is also emitted as an `::error::`
/// workflow command so it becomes the step's failure reason.
fn report_failure(error: &anyhow::Error) {
    let message = format!("{:#}", error);

    if std::env::var("GITHUB_ACTIONS").map_or(false, |v| v == "true") {
        println!("::error::{}", escape_workflow_data(&message));
    }
    eprintln!("{} {}", "Error:".red(), message);
}

/// Escape data for a workflow command (`%`, CR and LF)
fn escape_workflow_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Resolve invocation inputs into a sync configuration
fn build_sync_config(cli: &Cli) -> Result<SyncConfig> {
    let access_token = get_access_token(cli.token.clone())?;
    let owner = require_input(cli.owner.clone(), "owner")?;
    let repo = require_input(cli.repo.clone(), "repo")?;
    let path = require_input(cli.configuration_path.clone(), "configuration-path")?;
    let policy = parse_policy(cli.policy.as_deref())?;

    let configuration = ConfigLocation::resolve(
        non_empty(cli.configuration_repository.clone()).as_deref(),
        &owner,
        &repo,
        &path,
        non_empty(cli.reference.clone()),
    )?;

    Ok(SyncConfig {
        access_token,
        owner,
        repo,
        configuration,
        api_url: non_empty(cli.api_url.clone()),
        dry_run: cli.dry_run,
        policy,
    })
}

/// Actions passes unset inputs as empty strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Require an input to be present and non-empty
fn require_input(value: Option<String>, name: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| Error::missing_input(name))
}

/// Parse the failure policy, defaulting to best-effort
fn parse_policy(value: Option<&str>) -> Result<ApplyPolicy> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(policy) => policy.parse().map_err(Error::InvalidInput),
        None => Ok(ApplyPolicy::default()),
    }
}

/// Get access token
fn get_access_token(arg_token: Option<String>) -> Result<String> {
    non_empty(arg_token)
        .or_else(|| non_empty(std::env::var("GITHUB_TOKEN").ok()))
        .ok_or_else(|| Error::missing_input("token"))
}
