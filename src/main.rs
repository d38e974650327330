use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use release_tagger::cli::{run_tag_workflow, TagWorkflowArgs};
use release_tagger::config::{self, parse_bool_input, Backend};
use release_tagger::domain::BumpKind;
use release_tagger::ui;

/// Every input can also come from the environment variable a GitHub Action
/// step receives it through.
#[derive(clap::Parser)]
#[command(
    name = "release-tagger",
    version,
    about = "Compute the next semantic version tag and create it"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        env = "INPUT_GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token used to list and create tags"
    )]
    github_token: Option<String>,

    #[arg(long, env = "INPUT_USER_TAG", help = "Use this tag instead of computing one")]
    user_tag: Option<String>,

    #[arg(
        long,
        env = "INPUT_DEFAULT_BUMP",
        help = "Bump kind: major, minor, patch or prerelease"
    )]
    default_bump: Option<String>,

    #[arg(long, env = "INPUT_TAG_PREFIX", help = "Literal text before the version")]
    tag_prefix: Option<String>,

    #[arg(long, env = "INPUT_TAG_SUFFIX", help = "Literal text after the version")]
    tag_suffix: Option<String>,

    #[arg(
        long,
        env = "INPUT_PRERELEASEIDENTIFIER",
        help = "true/false to toggle prerelease numbering, or the identifier to use"
    )]
    prerelease_identifier: Option<String>,

    #[arg(
        long,
        env = "INPUT_FETCH_ALL_TAGS",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Scan every page of tags instead of the most recent ones"
    )]
    fetch_all_tags: Option<String>,

    #[arg(
        long,
        env = "INPUT_IS_DRY_RUN",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Compute the tag without creating it"
    )]
    dry_run: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as OWNER/REPO")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_SHA", help = "Commit to tag")]
    sha: Option<String>,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File to append outputs to")]
    output_file: Option<PathBuf>,

    #[arg(long, help = "Tag store: github or local")]
    backend: Option<String>,

    #[arg(long, help = "Repository path for the local backend")]
    repo_path: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, help = "More logging (-v debug, -vv trace)")]
    verbose: u8,
}

fn blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(value: &Option<String>, name: &str) -> Result<Option<bool>> {
    blank(value)
        .map(|raw| parse_bool_input(raw).map_err(|e| anyhow::anyhow!("--{}: {}", name, e)))
        .transpose()
}

impl Args {
    fn into_workflow_args(self) -> Result<TagWorkflowArgs> {
        let default_bump = blank(&self.default_bump)
            .map(str::parse::<BumpKind>)
            .transpose()?;
        let backend = blank(&self.backend).map(str::parse::<Backend>).transpose()?;
        let fetch_all_tags = parse_flag(&self.fetch_all_tags, "fetch-all-tags")?;
        let dry_run = parse_flag(&self.dry_run, "dry-run")?.unwrap_or(false);

        Ok(TagWorkflowArgs {
            github_token: self.github_token,
            user_tag: self.user_tag,
            default_bump,
            tag_prefix: self.tag_prefix,
            tag_suffix: self.tag_suffix,
            prerelease_identifier: self.prerelease_identifier,
            fetch_all_tags,
            dry_run,
            repository: self.repository,
            sha: self.sha,
            output_file: self.output_file.filter(|p| !p.as_os_str().is_empty()),
            backend,
            repo_path: self.repo_path,
        })
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    let workflow_args = args.into_workflow_args()?;
    run_tag_workflow(workflow_args, config)?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    ui::init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::report_failure(&format!("{:#}", e));
        std::process::exit(1);
    }
}
