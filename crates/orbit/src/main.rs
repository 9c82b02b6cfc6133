use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use orbit::display::{summary_lines, view_lines};
use orbit::loader::{self, DataSource};
use orbit::{Aggregator, Dimension, OrbitConfig, RecordFilter, Session};

#[derive(Parser)]
#[command(name = "orbit")]
#[command(about = "Orbit - AI Tool Adoption Analytics\nAggregated adoption views by country, industry, tool, year and demographics")]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to .orbit.json or the user config dir)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Year and country selection shared by the query commands
#[derive(Args)]
struct FilterArgs {
  /// Only include records from this year
  #[arg(short, long)]
  year: Option<i32>,
  /// Only include records from this country
  #[arg(short, long)]
  country: Option<String>,
}

impl From<&FilterArgs> for RecordFilter {
  fn from(args: &FilterArgs) -> Self {
    RecordFilter::new(args.year, args.country.clone())
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Show top-line dashboard totals
  Summary {
    /// Dataset (.csv or precomputed .json)
    data: PathBuf,
    #[command(flatten)]
    filter: FilterArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
  },
  /// Show one aggregated view
  View {
    /// country, industry, tool, year, age-group or company-size
    dimension: Dimension,
    /// Dataset (.csv or precomputed .json)
    data: PathBuf,
    #[command(flatten)]
    filter: FilterArgs,
    /// Only show the first N rows
    #[arg(short, long)]
    top: Option<usize>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
  },
  /// List the years present in the dataset
  Years {
    /// Dataset (.csv or precomputed .json)
    data: PathBuf,
  },
  /// Aggregate a CSV dataset into a precomputed JSON document
  Precompute {
    /// Source CSV dataset
    csv: PathBuf,
    /// Output document path
    #[arg(short, long, default_value = "precomputed_data.json")]
    output: PathBuf,
  },
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orbit=info,warn"))
  };

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = match &cli.config {
    Some(path) => OrbitConfig::load_from_file(path)
      .with_context(|| format!("Failed to load config {}", path.display()))?,
    None => OrbitConfig::load()?,
  };
  let session = Session::new(Aggregator::new(config));

  match cli.command {
    Commands::Summary { data, filter, json } => {
      let dataset = session.load(&DataSource::from_path(data)).await?;
      let stats = dataset.summary(&RecordFilter::from(&filter));

      if json {
        println!("{}", serde_json::to_string_pretty(&*stats)?);
      } else {
        println!("{}", "🌐 Orbit - AI Adoption Summary".blue().bold());
        println!();
        for line in summary_lines(&stats) {
          println!("{line}");
        }
      }
    }
    Commands::View { dimension, data, filter, top, json } => {
      let dataset = session.load(&DataSource::from_path(data)).await?;
      let view = dataset.view(dimension, &RecordFilter::from(&filter));

      if json {
        println!("{}", serde_json::to_string_pretty(&view.to_json()?)?);
      } else {
        for line in view_lines(&view, top) {
          println!("{line}");
        }
      }
    }
    Commands::Years { data } => {
      let dataset = session.load(&DataSource::from_path(data)).await?;
      for year in dataset.available_years() {
        println!("{year}");
      }
    }
    Commands::Precompute { csv, output } => {
      let dataset = session.load(&DataSource::Csv(csv)).await?;
      let document = loader::write_document(&dataset, &output).await?;
      let aggregations = &document.aggregations;

      println!("{} {}", "✓ Generated precomputed data:".green().bold(), output.display());
      println!("  - {} countries", aggregations.by_country.len());
      println!("  - {} industries", aggregations.by_industry.len());
      println!("  - {} tools", aggregations.by_tool.len());
      println!("  - {} years", aggregations.by_year.len());
      println!("  - {} age groups", aggregations.by_age_group.len());
      println!("  - {} company sizes", aggregations.by_company_size.len());
      println!("  - {} raw data records", document.raw_data.len());
    }
  }

  Ok(())
}
