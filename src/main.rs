use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use git_bump::config::{self, StoreKind};
use git_bump::domain::BumpKind;
use git_bump::git::{self, SystemGit};
use git_bump::release::{Outcome, Release, ReleaseConfig};
use git_bump::ui::{self, TerminalPrompter};

#[derive(clap::Parser)]
#[command(
    name = "git-bump",
    version,
    about = "Bump the project version, then commit, tag and push the release",
    after_help = "Examples:\n  git-bump --patch            v1.2.3 -> v1.2.4\n  git-bump --minor            v1.2.3 -> v1.3.0\n  git-bump --major            v1.2.3 -> v2.0.0\n  git-bump --patch --dry-run  preview without changes"
)]
#[command(group(
    ArgGroup::new("bump")
        .required(true)
        .args(["major", "minor", "patch"])
))]
struct Args {
    #[arg(long, help = "Increment the major version")]
    major: bool,

    #[arg(long, help = "Increment the minor version")]
    minor: bool,

    #[arg(long, help = "Increment the patch version")]
    patch: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Do not run the test suite before releasing")]
    skip_tests: bool,

    #[arg(short = 'y', long, help = "Skip confirmation prompts")]
    yes: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, value_parser = parse_store_kind, help = "Version store: auto, pyproject or marker")]
    store: Option<StoreKind>,

    #[arg(short = 'C', long = "dir", help = "Run as if started in this directory")]
    dir: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

impl Args {
    fn bump_kind(&self) -> BumpKind {
        if self.major {
            BumpKind::Major
        } else if self.minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }

    fn release_config(&self) -> ReleaseConfig {
        ReleaseConfig {
            bump_kind: self.bump_kind(),
            dry_run: self.dry_run,
            skip_tests: self.skip_tests,
            auto_confirm: self.yes,
        }
    }
}

fn parse_store_kind(s: &str) -> std::result::Result<StoreKind, String> {
    s.parse().map_err(|e: git_bump::GitBumpError| e.to_string())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<Outcome> {
    let start = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let work_tree = git::discover_work_tree(&start).context("not in a git repository")?;

    let mut settings = config::load_settings(args.config.as_deref(), &work_tree)
        .context("failed to load configuration")?;
    if let Some(kind) = args.store {
        settings.store.kind = kind;
    }

    let git = SystemGit::new(&work_tree).with_push_timeout(settings.timeouts.push());
    let prompter = TerminalPrompter;

    let release = Release {
        config: args.release_config(),
        settings: &settings,
        git: &git,
        prompter: &prompter,
        work_tree: &work_tree,
    };
    Ok(release.run()?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(Outcome::Released { previous, version }) => {
            println!(
                "\n\x1b[32m✓\x1b[0m Successfully released {} (was {})\n",
                version.tag_name(),
                previous.tag_name()
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::DryRun { .. }) | Ok(Outcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
