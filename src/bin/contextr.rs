//! Contextr CLI - Package repository content into context for LLMs.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use contextr::config::{CliOverrides, Config};
use contextr::errors::{exit_code, ContextError};
use contextr::report::{self, NO_FILES_MESSAGE};
use contextr::Contextr;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "contextr")]
#[command(about = "Analyze repositories and package their content for sharing with LLMs")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all diagnostics
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package files, structure and statistics into one document
    Package {
        /// Files or directories to analyze
        paths: Vec<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only include files whose name matches this glob (e.g. '*.py')
        #[arg(long)]
        include: Option<String>,

        /// Only include files changed in recent commits
        #[arg(long)]
        recent: bool,

        /// Annotate the structure with token counts
        #[arg(long)]
        tokens: bool,

        /// Hide files below this many tokens in the token structure
        #[arg(long)]
        threshold: Option<usize>,

        /// Config file (default: .contextr.toml in the working directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show how estimated tokens are distributed over the tree
    Tokens {
        /// Files or directories to analyze
        paths: Vec<String>,

        /// Only include files whose name matches this glob
        #[arg(long)]
        include: Option<String>,

        /// Hide files below this many tokens
        #[arg(long, default_value_t = 0)]
        threshold: usize,

        /// Print only the total
        #[arg(long)]
        summary: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the directory tree of discovered files
    Tree {
        /// Files or directories to analyze
        paths: Vec<String>,

        /// Only include files whose name matches this glob
        #[arg(long)]
        include: Option<String>,
    },

    /// Show summary statistics
    Stats {
        /// Files or directories to analyze
        paths: Vec<String>,

        /// Only include files whose name matches this glob
        #[arg(long)]
        include: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(quiet: bool, verbosity: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_module_path(false).format_timestamp(None);

    if quiet {
        builder.filter_level(log::LevelFilter::Off);
    } else if verbosity > 0 {
        let level = match verbosity {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        builder.filter_level(level);
    }

    let _ = builder.try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let json_output = json_flag(&cli.command);
    let quiet = cli.quiet;

    let result = match cli.command {
        Commands::Package {
            paths,
            output,
            include,
            recent,
            tokens,
            threshold,
            config,
        } => run_package(
            CliOverrides {
                paths,
                include,
                output,
                recent,
                tokens,
                threshold,
            },
            config,
            quiet,
        ),
        Commands::Tokens {
            paths,
            include,
            threshold,
            summary,
            json,
        } => run_tokens(builder(paths, include).threshold(threshold), summary, json),
        Commands::Tree { paths, include } => run_tree(builder(paths, include)),
        Commands::Stats {
            paths,
            include,
            json,
        } => run_stats(builder(paths, include), json),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "contextr", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn json_flag(cmd: &Commands) -> bool {
    match cmd {
        Commands::Tokens { json, .. } => *json,
        Commands::Stats { json, .. } => *json,
        Commands::Package { .. } | Commands::Tree { .. } | Commands::Completions { .. } => false,
    }
}

fn builder(paths: Vec<String>, include: Option<String>) -> Contextr {
    let builder = Contextr::new(paths);
    match include {
        Some(pattern) => builder.include(pattern),
        None => builder,
    }
}

// --- Package command ---

fn run_package(
    overrides: CliOverrides,
    config_path: Option<PathBuf>,
    quiet: bool,
) -> Result<(), ContextError> {
    let config = Config::load(config_path.as_deref())?.merge_with_cli(overrides);
    log::debug!("Effective config: {:?}", config);

    let result = Contextr::from_config(&config).package()?;

    match &config.output {
        Some(path) => match std::fs::write(path, &result) {
            Ok(()) => {
                if !quiet {
                    eprintln!("Context packaged and saved to: {}", path.display());
                }
            }
            Err(source) => {
                let err = ContextError::Output {
                    path: path.clone(),
                    source,
                };
                log::warn!("{}; writing to stdout instead", err);
                println!("{}", result);
            }
        },
        None => println!("{}", result),
    }

    Ok(())
}

// --- Tokens command ---

fn run_tokens(builder: Contextr, summary: bool, json: bool) -> Result<(), ContextError> {
    if !json {
        println!("{}", builder.token_report(summary)?);
        return Ok(());
    }

    let discovery = builder.discover()?;
    if discovery.is_empty() {
        log::warn!("{}", NO_FILES_MESSAGE);
    }
    let tree = builder.token_tree(&discovery);
    println!("{}", report::token_report_json(&tree, &discovery.root)?);
    Ok(())
}

// --- Tree command ---

fn run_tree(builder: Contextr) -> Result<(), ContextError> {
    let tree = builder.tree()?;
    if !tree.is_empty() {
        println!("{}", tree);
    }
    Ok(())
}

// --- Stats command ---

fn run_stats(builder: Contextr, json: bool) -> Result<(), ContextError> {
    let (discovery, summary) = builder.summary()?;
    if json {
        println!("{}", report::summary_json(&summary, &discovery.root)?);
    } else {
        println!("{}", report::format_summary(&summary, &discovery.root));
    }
    Ok(())
}
