//! Main workflow orchestration logic
//!
//! This module contains the tag workflow behind the binary. It provides a
//! clean separation between CLI argument parsing and business logic: inputs
//! are resolved once into a [ResolveRequest], then handed to the resolver
//! together with a repository backend.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::boundary::BoundaryWarning;
use crate::bump::{BumpRequest, PrereleaseSetting};
use crate::config::{Backend, Config};
use crate::domain::{BumpKind, TagFormat};
use crate::error::TaggerError;
use crate::git::{Git2Repository, GitHubRepository, TagRepository};
use crate::output::ActionOutputs;
use crate::resolver::{ResolveRequest, TagResolver};
use crate::ui;

/// Arguments for the tag workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap. `None` means "use the config file value".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagWorkflowArgs {
    /// Credential for the GitHub backend
    pub github_token: Option<String>,

    /// Explicit tag that replaces the computed one
    pub user_tag: Option<String>,

    pub default_bump: Option<BumpKind>,

    pub tag_prefix: Option<String>,

    pub tag_suffix: Option<String>,

    /// Raw `prereleaseIdentifier` input: `true`, `false` or an identifier
    pub prerelease_identifier: Option<String>,

    pub fetch_all_tags: Option<bool>,

    /// Preview mode - compute the tag without creating it
    pub dry_run: bool,

    /// `OWNER/REPO` for the GitHub backend
    pub repository: Option<String>,

    /// Commit to tag
    pub sha: Option<String>,

    /// File the outputs are appended to
    pub output_file: Option<PathBuf>,

    pub backend: Option<Backend>,

    /// Working tree for the local backend
    pub repo_path: Option<PathBuf>,
}

/// Result of a successful tag workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The tag that was created (or would have been)
    pub tag: String,

    /// The tag without its configured prefix
    pub version: String,

    /// Highest existing tag the new one was derived from
    pub previous_tag: Option<String>,

    /// Whether this was a dry run
    pub simulated: bool,

    pub warnings: Vec<BoundaryWarning>,
}

/// Treat blank inputs as absent; action inputs arrive as empty strings.
fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve CLI/action inputs and config into a resolution request.
///
/// Everything that can be rejected without touching a repository is rejected
/// here.
pub fn build_request(args: &TagWorkflowArgs, config: &Config) -> Result<ResolveRequest> {
    let format = TagFormat::new(
        non_empty(args.tag_prefix.as_ref()).unwrap_or_else(|| config.tag.prefix.clone()),
        non_empty(args.tag_suffix.as_ref()).unwrap_or_else(|| config.tag.suffix.clone()),
        config.tag.leading_v,
    );

    let prerelease = match non_empty(args.prerelease_identifier.as_ref()) {
        Some(raw) => {
            PrereleaseSetting::from_action_input(&raw, &config.bump.prerelease_identifier)?
        }
        None => PrereleaseSetting::new(
            config.bump.prerelease,
            config.bump.prerelease_identifier.clone(),
        )?,
    };

    let mut bump = BumpRequest::new(
        args.default_bump.unwrap_or(config.bump.default),
        prerelease,
        format,
    );
    if let Some(tag) = non_empty(args.user_tag.as_ref()) {
        bump = bump.with_explicit_tag(tag);
    }

    let backend = args.backend.unwrap_or(config.remote.backend);
    let target = match (non_empty(args.sha.as_ref()), backend) {
        (Some(sha), _) => sha,
        (None, Backend::Local) => "HEAD".to_string(),
        // Only needed for creation; a dry run never sends it
        (None, Backend::Github) if args.dry_run => String::new(),
        (None, Backend::Github) => {
            return Err(TaggerError::config(
                "commit SHA not provided (set GITHUB_SHA or --sha)",
            )
            .into())
        }
    };

    let fetch_all = args.fetch_all_tags.unwrap_or(config.remote.fetch_all_tags);

    Ok(ResolveRequest {
        bump,
        dry_run: args.dry_run,
        target,
        window: if fetch_all {
            None
        } else {
            Some(config.remote.recent_window)
        },
    })
}

/// Open the configured repository backend.
///
/// The GitHub backend checks its credential here, before any tag is
/// computed.
pub fn open_repository(args: &TagWorkflowArgs, config: &Config) -> Result<Box<dyn TagRepository>> {
    match args.backend.unwrap_or(config.remote.backend) {
        Backend::Github => {
            let token = non_empty(args.github_token.as_ref()).unwrap_or_default();
            let slug = non_empty(args.repository.as_ref()).ok_or_else(|| {
                TaggerError::config("repository not provided (set GITHUB_REPOSITORY or --repository)")
            })?;
            let repo = GitHubRepository::with_api_url(&config.remote.api_url, &slug, &token)?;
            Ok(Box::new(repo))
        }
        Backend::Local => {
            let path = args.repo_path.clone().unwrap_or_else(|| PathBuf::from("."));
            let repo = Git2Repository::open(&path)
                .with_context(|| format!("Not in a git repository: {}", path.display()))?;
            Ok(Box::new(repo))
        }
    }
}

/// Resolve the next tag against `repo` and compute the outputs.
///
/// Does not print or write anything; see [run_tag_workflow].
pub fn execute<R: TagRepository + ?Sized>(
    request: &ResolveRequest,
    config: &Config,
    repo: &R,
) -> Result<WorkflowResult> {
    let resolution = TagResolver::new(repo).resolve(request)?;
    let outputs = ActionOutputs::from_resolution(&resolution, config.output.strip_leading_v);

    Ok(WorkflowResult {
        tag: outputs.tag,
        version: outputs.version,
        previous_tag: outputs.previous_tag,
        simulated: resolution.simulated,
        warnings: resolution.warnings,
    })
}

/// Main tag workflow
///
/// Orchestrates the entire tagging process:
/// 1. Resolve inputs into a request (fail fast on bad input)
/// 2. Open the repository backend (fail fast on missing credentials)
/// 3. Resolve, and create the tag unless this is a dry run
/// 4. Report warnings and the outcome
/// 5. Write the `tag` / `version` / `previous_tag` outputs
pub fn run_tag_workflow(args: TagWorkflowArgs, config: Config) -> Result<WorkflowResult> {
    let request = build_request(&args, &config)?;
    let repo = open_repository(&args, &config)?;

    ui::display_status(&format!(
        "Resolving next {} tag{}",
        request.bump.kind,
        if request.dry_run { " (dry run)" } else { "" }
    ));
    let result = execute(&request, &config, repo.as_ref())?;

    for warning in &result.warnings {
        if !warning.is_noise() {
            ui::display_boundary_warning(warning);
        }
    }
    ui::display_proposed_tag(result.previous_tag.as_deref(), &result.tag);
    ui::display_outcome(&result.tag, result.simulated);

    let outputs = ActionOutputs {
        tag: result.tag.clone(),
        version: result.version.clone(),
        previous_tag: result.previous_tag.clone(),
    };
    outputs
        .write(args.output_file.as_deref())
        .context("Failed to write action outputs")?;

    Ok(result)
}
