use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use leafsense::embedding::DaemonEmbedder;
use leafsense::store::FileStore;
use leafsense::{analyze, growth, record, report};

#[derive(Parser)]
#[command(name = "leafsense")]
#[command(
  about = "Leafsense - Plant Condition Diagnostics\nSemantic retrieval and sensor comparison over stored plant observations"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Diagnose a plant from a symptom description
  Analyze {
    /// Plant species to compare within
    plant: String,
    /// Current growth level label (DIE, Low, Medium, High)
    growth_level: String,
    /// Free-text symptom description (space-separated)
    #[arg(required = true)]
    description: Vec<String>,
    /// Reference observations to retrieve per stage
    #[arg(short = 'k', long, default_value = "10")]
    top_k: usize,
    /// Also print the scored condition report
    #[arg(short, long)]
    report: bool,
  },
  /// List stored observation records
  Records {
    /// Optional plant to filter by
    plant: Option<String>,
  },
  /// Show the resolved rank for a growth-level label
  Rank {
    /// Growth-level label to resolve
    label: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Analyze { plant, growth_level, description, top_k, report: with_report } => {
      let store = FileStore::open()?;
      let embedder = DaemonEmbedder::new();
      let query_text = description.join(" ");

      let analysis =
        analyze::run_analysis(&embedder, &store, &query_text, &plant, &growth_level, top_k)?;

      if with_report {
        let report =
          report::generate_report(&plant, &growth_level, &analysis.similar, &analysis.groups);
        report::display_report(&report);
      }
    }
    Commands::Records { plant } => {
      let records = record::get_records(plant.as_deref())?;
      if records.is_empty() {
        println!("No records found");
      } else {
        for (plant_name, image_name) in &records {
          println!("{}/{}", plant_name.blue(), image_name);
        }
      }
    }
    Commands::Rank { label } => {
      println!("{} -> {}", label, growth::rank(&label));
    }
  }

  Ok(())
}
