use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};

use release_gate::cli::{self, BumpOutcome, BumpWorkflowArgs, DeployOutcome, DeployWorkflowArgs};
use release_gate::config;
use release_gate::domain::{BumpKind, BumpRequest};
use release_gate::git::DiscoveredRepository;
use release_gate::logging;
use release_gate::process::SystemRunner;
use release_gate::ui::{self, AutoConfirm, Confirmer, TerminalConfirmer};
use release_gate::upload::UploadState;

#[derive(Parser)]
#[command(
    name = "release-gate",
    version,
    about = "Bump, tag and publish Python packages with safety gates"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Project root (defaults to the current directory)"
    )]
    project: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump the manifest version, then commit, tag and push
    Bump(BumpArgs),
    /// Build, check and upload the package
    Deploy(DeployArgs),
}

#[derive(ClapArgs)]
struct BumpArgs {
    #[arg(
        value_enum,
        conflicts_with = "version",
        required_unless_present_any = ["version", "current"],
        help = "Type of version bump"
    )]
    kind: Option<BumpKind>,

    #[arg(long, help = "Set a specific version (e.g. 1.2.3)")]
    version: Option<String>,

    #[arg(long, help = "Show what would be done without making changes")]
    dry_run: bool,

    #[arg(long, help = "Don't push commit and tag to the remote")]
    no_push: bool,

    #[arg(long, help = "Show the current version and exit")]
    current: bool,
}

#[derive(ClapArgs)]
struct DeployArgs {
    #[arg(long, conflicts_with = "skip_test", help = "Only upload to TestPyPI")]
    test_only: bool,

    #[arg(long, help = "Skip TestPyPI and upload directly to PyPI")]
    skip_test: bool,

    #[arg(long, help = "Skip building and use existing artifacts")]
    skip_build: bool,

    #[arg(long, help = "Skip safety checks (git status, confirmations)")]
    force: bool,

    #[arg(short, long, help = "Answer yes to every prompt")]
    yes: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let project_root = match args.project {
        Some(path) => path,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let config = config::load_config(args.config.as_deref(), &project_root)?;

    match args.command {
        Command::Bump(bump) => {
            if bump.current {
                let version = cli::read_current_version(&config, &project_root)?;
                println!("Current version: {}", version);
                return Ok(());
            }

            let workflow_args = BumpWorkflowArgs {
                request: BumpRequest::from_parts(bump.kind, bump.version.as_deref())?,
                dry_run: bump.dry_run,
                push: !bump.no_push,
            };
            let repo = DiscoveredRepository::new(&project_root);

            let outcome = cli::run_bump_workflow(
                &workflow_args,
                &config,
                &project_root,
                &repo,
                &SystemRunner,
            )?;

            if let BumpOutcome::Released { new, .. } = outcome {
                println!("\nSuccessfully bumped to version {}", new);
                println!("Next steps:");
                println!("  1. Wait for CI/CD to pass");
                println!("  2. Run: release-gate deploy");
            }
        }
        Command::Deploy(deploy) => {
            let workflow_args = DeployWorkflowArgs {
                test_only: deploy.test_only,
                skip_test: deploy.skip_test,
                skip_build: deploy.skip_build,
                force: deploy.force,
            };
            let confirmer: Box<dyn Confirmer> = if deploy.yes {
                Box::new(AutoConfirm(true))
            } else {
                Box::new(TerminalConfirmer)
            };
            let repo = DiscoveredRepository::new(&project_root);

            let outcome = cli::run_deploy_workflow(
                &workflow_args,
                &config,
                &project_root,
                &repo,
                &SystemRunner,
                confirmer.as_ref(),
            )?;

            match outcome {
                DeployOutcome::Completed(UploadState::ProductionUploaded) => {
                    ui::display_success("Production deployment complete!");
                }
                DeployOutcome::Completed(UploadState::StagingUploaded) => {
                    ui::display_success("TestPyPI upload complete!");
                }
                DeployOutcome::Completed(UploadState::Stopped) => {
                    ui::display_status("Deployment stopped at TestPyPI");
                }
                DeployOutcome::Completed(UploadState::NotStarted) => {}
                DeployOutcome::Cancelled => {
                    println!("Deployment cancelled by user.");
                }
            }
        }
    }

    Ok(())
}
