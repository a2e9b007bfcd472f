//! Rule-driven bulk source rewriting.
//!
//! Applies the ordered rule catalog from `srcfix.toml` (or the built-in one)
//! to every matching file under the configured roots, writing back only files
//! whose content changed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use srcfix::batch::{BatchOptions, run_candidates, select_rule_sets};
use srcfix::core::rule_set::RuleSet;
use srcfix::core::types::Summary;
use srcfix::exit_codes;
use srcfix::io::config::load_config;
use srcfix::io::report::ConsoleReporter;
use srcfix::io::walk::collect_files;
use srcfix::io::writer::{DryRunWriter, FsWriter};
use srcfix::logging;

#[derive(Parser)]
#[command(
    name = "srcfix",
    version,
    about = "Rule-driven bulk source rewriting"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite matching files in place.
    Run(BatchArgs),
    /// Report files that would change and verify rule sets are idempotent.
    Check(BatchArgs),
    /// List configured rule sets in execution order.
    Rules {
        /// Config file (defaults to `./srcfix.toml`, then the built-in catalog).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct BatchArgs {
    /// Directories or files to process (defaults to `files.roots`).
    roots: Vec<PathBuf>,
    /// Config file (defaults to `./srcfix.toml`, then the built-in catalog).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Extensions to include, replacing `files.extensions`.
    #[arg(long = "ext", value_delimiter = ',')]
    extensions: Vec<String>,
    /// Run only these rule sets; configured order is kept.
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,
    /// Process files on a worker pool.
    #[arg(long)]
    parallel: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Run(args) => cmd_batch(&args, false),
        Command::Check(args) => cmd_batch(&args, true),
        Command::Rules { config } => cmd_rules(config),
    }
}

fn cmd_batch(args: &BatchArgs, dry_run: bool) -> Result<i32> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let mut cfg = load_config(args.config.as_deref(), &cwd)?;
    if !args.roots.is_empty() {
        cfg.files.roots = args.roots.clone();
    }
    if !args.extensions.is_empty() {
        cfg.files.extensions = args.extensions.clone();
    }
    cfg.validate()?;

    let rule_sets = cfg.compile().context("compile rule catalog")?;
    let rule_sets = select_rule_sets(rule_sets, &args.only)?;
    let candidates = collect_files(
        &cfg.files.roots,
        &cfg.files.extensions,
        &cfg.files.exclude_dirs,
    )?;

    let options = BatchOptions {
        parallel: args.parallel,
        verify_idempotence: dry_run,
    };
    let mut reporter = ConsoleReporter::stdout(dry_run);
    let summary = if dry_run {
        run_candidates(candidates, &rule_sets, &DryRunWriter, &mut reporter, options)
    } else {
        run_candidates(candidates, &rule_sets, &FsWriter, &mut reporter, options)
    };
    Ok(exit_code(&summary, dry_run))
}

fn cmd_rules(config: Option<PathBuf>) -> Result<i32> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let cfg = load_config(config.as_deref(), &cwd)?;
    let rule_sets = cfg.compile().context("compile rule catalog")?;
    for (idx, rule_set) in rule_sets.iter().enumerate() {
        println!("{}", describe(idx + 1, rule_set));
    }
    Ok(exit_codes::OK)
}

fn describe(position: usize, rule_set: &RuleSet) -> String {
    let mut line = format!(
        "{position}. {} rules={}",
        rule_set.name(),
        rule_set.rules().len()
    );
    if let Some(extensions) = rule_set.extensions() {
        let joined: Vec<&str> = extensions.iter().map(String::as_str).collect();
        line.push_str(&format!(" extensions={}", joined.join(",")));
    }
    if let Some(guard) = rule_set.guard() {
        line.push_str(&format!(" guard=[{}]", guard.describe()));
    }
    line
}

/// Any failed file wins over pending changes.
fn exit_code(summary: &Summary, dry_run: bool) -> i32 {
    if summary.failed > 0 {
        exit_codes::INVALID
    } else if dry_run && summary.changed > 0 {
        exit_codes::PENDING
    } else {
        exit_codes::OK
    }
}
