use anyhow::Context;
use clap::{Parser, ValueEnum};
use git_recap::config::{Config, Overrides};
use git_recap::git::source::configured_user_name;
use git_recap::git::{AuthorFilter, GitCli};
use git_recap::output::{writer_for, CommitOrder, OutputFormat, ShellOptions};
use git_recap::scan::{discover_repositories, scan_all, ScanOptions};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "git-recap")]
#[command(about = "Show your recent commits across all repositories in a directory", long_about = None)]
struct Cli {
    /// Directory containing the repositories (defaults to the current directory)
    path: Option<PathBuf>,

    /// How many days back to look
    #[arg(long)]
    since: Option<u32>,

    /// Authors separated by a comma (defaults to git's user.name)
    #[arg(long)]
    authors: Option<String>,

    /// Output format: shell, json or yaml
    #[arg(long, short)]
    output: Option<String>,

    /// Group commits by branch instead of sorting them by date
    #[arg(long)]
    group_by_branch: bool,

    /// Configuration file (defaults to .git-recap.toml in PATH)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Repositories scanned in parallel
    #[arg(long, short)]
    jobs: Option<usize>,

    /// Seconds before a git invocation is abandoned
    #[arg(long)]
    timeout: Option<u64>,

    /// Banner width (detected from the terminal by default)
    #[arg(long)]
    width: Option<usize>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }

    let root = match cli.path.clone() {
        Some(path) => path,
        None => {
            let cwd = env::current_dir().context("Failed to read current directory")?;
            info!("path not set - using current directory {}", cwd.display());
            cwd
        }
    };

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::discover(&root).context("Failed to load config")?,
    };
    config.apply(Overrides {
        authors: cli.authors.clone(),
        since_days: cli.since,
        format: cli.output.clone(),
        group_by_branch: cli.group_by_branch,
        concurrency: cli.jobs,
        git_timeout_secs: cli.timeout,
        width: cli.width,
    });
    config.validate()?;

    // Resolve the writer before scanning so a bad format fails fast
    let format: OutputFormat = config.output.format.parse()?;
    let writer = writer_for(
        format,
        ShellOptions {
            order: CommitOrder::from_group_by_branch(config.output.group_by_branch),
            width: config.output.width,
        },
    );

    let filter = resolve_authors(&config)?;
    info!("Matching authors: {}", filter.patterns().join(", "));

    let candidates =
        discover_repositories(&root, config.scan.since_days, config.scan.require_git_dir)?;

    let progress = if format == OutputFormat::Shell {
        spinner(candidates.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let git = GitCli::new(config.scan.git_timeout_secs);
    let report = scan_all(
        &git,
        &candidates,
        &filter,
        ScanOptions {
            since_days: config.scan.since_days,
            concurrency: config.scan.concurrency,
        },
        &progress,
    )
    .await;
    progress.finish_and_clear();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writer.write(&report, &mut out)?;

    Ok(())
}

/// Configured authors, or git's `user.name` when none are set
fn resolve_authors(config: &Config) -> anyhow::Result<AuthorFilter> {
    let filter = config.author_filter();
    if !filter.is_empty() {
        return Ok(filter);
    }

    let user = configured_user_name()
        .context("No authors given and no git user.name to fall back to")?;
    info!("authors not set, using the git user name '{}'", user);
    Ok(AuthorFilter::new([user]))
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Progress spinner on stderr; hidden when stderr is not a terminal
fn spinner(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} [{pos}/{len}] {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
