use clap::{Parser, Subcommand};
use comic_press::{config, output, pipeline};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "comic-press")]
#[command(version, about = "Static site generator for webcomics")]
#[command(long_about = "\
Static site generator for webcomics

Reads the YAML documents in the site directory and writes one HTML file per
page, an index page, an RSS feed and an archive, then refreshes the header
navigation of every HTML file in the output directory.

Site structure:

  site/
  ├── config.toml          # Build settings (optional, see gen-config)
  ├── site_info.yaml       # title, author, domain
  ├── front_matter.yaml    # \"001\": {Chapter, page, title, desc, note, date}
  ├── header.yaml          # - {name, link}
  ├── custom_html.yaml     # \"001\": {html}  (optional)
  └── assets/              # 001.png, 002-a.png, 003.mp4, ...

Running without a command builds the site in the current directory.")]
struct Cli {
    /// Site directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate pages, index, feed and archive, then patch navigation
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let report = pipeline::build(&cli.root)?;
            output::print_build_report(&report);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Check => {
            let report = pipeline::check(&cli.root)?;
            output::print_check_report(&report);
            if !report.problems.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
