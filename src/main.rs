//! TrackFinder - catalog search and compatibility chart from the command line
//!
//! This binary gives scriptable access to the storefront catalog: fuzzy
//! machine search, track size grouping and conversion, product listings,
//! brand aliases, redirects and integrity checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackfinder::cli::{
    BrandArgs, CatalogSource, CheckArgs, CliResult, ConfigArgs, ConvertArgs, FitsArgs,
    MachinesArgs, ProductsArgs, RedirectArgs, SizesArgs,
};
use trackfinder::constants::APP_BINARY_NAME;

/// TrackFinder - rubber track catalog tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = APP_BINARY_NAME)]
struct Cli {
    /// Catalog data directory (overrides catalog.data_dir from the config)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search machines by make and model
    Machines(MachinesArgs),
    /// List products with filters and sorting
    Products(ProductsArgs),
    /// Show track sizes grouped by width
    Sizes(SizesArgs),
    /// Convert a track size code between mm and inches
    Convert(ConvertArgs),
    /// List machines compatible with a track size
    Fits(FitsArgs),
    /// Brand alias lookups
    Brand(BrandArgs),
    /// Check the catalog for broken references
    Check(CheckArgs),
    /// Resolve a path against the redirect table
    Redirect(RedirectArgs),
    /// Show or change the configuration
    Config(ConfigArgs),
}

impl Command {
    fn execute(&self, source: &CatalogSource) -> CliResult<()> {
        match self {
            Self::Machines(args) => args.execute(source),
            Self::Products(args) => args.execute(source),
            Self::Sizes(args) => args.execute(source),
            Self::Convert(args) => args.execute(),
            Self::Fits(args) => args.execute(source),
            Self::Brand(args) => args.execute(),
            Self::Check(args) => args.execute(source),
            Self::Redirect(args) => args.execute(source),
            Self::Config(args) => args.execute(source),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let source = CatalogSource::new(cli.data_dir.clone());
    if let Err(err) = cli.command.execute(&source) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code().code());
    }
}
