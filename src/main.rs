use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use formpick::archive::fetch_documents;
use formpick::catalog::{collect_matching, summarize, PicklistCatalog};
use formpick::config::{find_config_file, load_config, Config};
use formpick::models::FormSummary;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Formpick - list and download prior-year IRS tax forms and publications
#[derive(Parser, Debug)]
#[command(name = "formpick")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "List and download prior-year IRS tax forms and publications", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List aggregate metadata for one or more form numbers
    #[command(alias = "l")]
    List {
        /// Form numbers to list
        #[arg(long, num_args = 1.., required = true)]
        numbers: Vec<String>,
    },

    /// Fetch documents for a form number within a year range
    #[command(alias = "f")]
    Fetch {
        /// Form number to fetch
        #[arg(long)]
        number: String,

        /// Earliest publication year to fetch (default: current year)
        #[arg(long = "min_year")]
        min_year: Option<i32>,

        /// Latest publication year to fetch (default: current year)
        #[arg(long = "max_year")]
        max_year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("formpick={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Single top-level failure handler: every hard error from the
    // pipeline lands here, gets logged, and terminates the run.
    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration from the given path or the default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::List { numbers } => {
            // The catalog owns the HTTP session for this operation; the
            // connection pool is released when it drops, on any path.
            let catalog = PicklistCatalog::new(&config)?;

            let mut summaries = Vec::new();
            for number in &numbers {
                let rows = collect_matching(&catalog, number).await?;
                if !cli.quiet {
                    eprintln!("Found {} rows for {}", rows.len(), number);
                }
                if let Some(summary) = summarize(&rows) {
                    summaries.push(summary);
                }
            }

            output_summaries(&summaries, cli.output);
        }

        Commands::Fetch {
            number,
            min_year,
            max_year,
        } => {
            let current_year = chrono::Local::now().year();
            let min_year = min_year.unwrap_or(current_year);
            let max_year = max_year.unwrap_or(current_year);

            let catalog = PicklistCatalog::new(&config)?;
            let outcome = fetch_documents(
                &catalog,
                &number,
                min_year,
                max_year,
                &config.downloads.data_root,
            )
            .await?;

            if outcome.files_written > 0 {
                println!(
                    "{} files were fetched into \"{}\"",
                    outcome.files_written,
                    outcome.target_dir.display()
                );
            } else {
                println!("nothing was fetched");
            }
        }
    }

    Ok(())
}

fn output_summaries(summaries: &[FormSummary], format: OutputFormat) {
    let actual_format = if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summaries).unwrap());
        }
        OutputFormat::Plain => {
            for summary in summaries {
                println!("{} - {}", summary.form_number, summary.form_title);
                match (summary.min_year, summary.max_year) {
                    (Some(min), Some(max)) => println!("  Years: {}-{}", min, max),
                    _ => println!("  Years: unknown"),
                }
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["Form Number", "Title", "Min Year", "Max Year"]);

            for summary in summaries {
                let title = if summary.form_title.len() > 60 {
                    format!("{}...", &summary.form_title[..57])
                } else {
                    summary.form_title.clone()
                };

                table.add_row(vec![
                    Cell::new(&summary.form_number).add_attribute(Attribute::Bold),
                    Cell::new(title),
                    Cell::new(
                        summary
                            .min_year
                            .map(|y| y.to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::new(
                        summary
                            .max_year
                            .map(|y| y.to_string())
                            .unwrap_or_default(),
                    ),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Auto => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_list_flags() {
        let cli = Cli::parse_from(["formpick", "list", "--numbers", "1040", "1040-SR", "W-2"]);
        match cli.command {
            Commands::List { numbers } => {
                assert_eq!(numbers, vec!["1040", "1040-SR", "W-2"]);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_cli_list_requires_numbers() {
        assert!(Cli::try_parse_from(["formpick", "list"]).is_err());
    }

    #[test]
    fn test_cli_fetch_flags() {
        let cli = Cli::parse_from([
            "formpick", "fetch", "--number", "1099", "--min_year", "2018", "--max_year", "2020",
        ]);
        match cli.command {
            Commands::Fetch {
                number,
                min_year,
                max_year,
            } => {
                assert_eq!(number, "1099");
                assert_eq!(min_year, Some(2018));
                assert_eq!(max_year, Some(2020));
            }
            _ => panic!("expected fetch command"),
        }
    }

    #[test]
    fn test_cli_fetch_years_default_to_none() {
        let cli = Cli::parse_from(["formpick", "fetch", "--number", "1099"]);
        match cli.command {
            Commands::Fetch {
                min_year, max_year, ..
            } => {
                assert_eq!(min_year, None);
                assert_eq!(max_year, None);
            }
            _ => panic!("expected fetch command"),
        }
    }

    #[test]
    fn test_cli_fetch_requires_number() {
        assert!(Cli::try_parse_from(["formpick", "fetch"]).is_err());
    }

    #[test]
    fn test_cli_verbose_and_quiet_flags() {
        let cli = Cli::parse_from(["formpick", "-vv", "list", "--numbers", "1040"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["formpick", "-q", "list", "--numbers", "1040"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["formpick", "list", "--numbers", "1040", "-o", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);

        let cli = Cli::parse_from(["formpick", "list", "--numbers", "1040"]);
        assert_eq!(cli.output, OutputFormat::Auto);
    }
}
