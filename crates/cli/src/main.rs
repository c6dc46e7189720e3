mod cmd;
mod output;
mod session;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use qranchor_lib::config::Config;
use qranchor_lib::geometry::Vec3;
use qranchor_lib::platform::paths;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;
use crate::session::Context;

/// qranchor - QR-code to spatial-anchor placement manager
#[derive(Parser)]
#[command(name = "qranchor")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Data directory for prefs and the local anchor store
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Config file (default: $QRANCHOR_CONFIG or ~/.config/qranchor/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List persisted QR-text to anchor mappings
  Mappings,

  /// Run the startup loader and show which objects were restored
  Reconcile {
    /// Make the bulk anchor load fail
    #[arg(long)]
    fail_load: bool,

    /// Anchor uuids that should fail localization
    #[arg(long, value_name = "UUID")]
    unlocalizable: Vec<String>,
  },

  /// Restore saved anchors, then run one detection pass for a QR code
  Detect {
    /// QR payload text
    text: String,

    /// World point the center ray hits
    #[arg(long, value_parser = cmd::parse_vec3, default_value = "0,0,1")]
    hit: Vec3,

    /// Surface normal at the hit point
    #[arg(long, value_parser = cmd::parse_vec3, default_value = "0,0,-1")]
    normal: Vec3,

    /// Number of corner points the detection reports
    #[arg(long, default_value_t = 4)]
    corners: usize,

    /// Make the raycast miss
    #[arg(long)]
    miss: bool,

    /// Make the anchor save fail
    #[arg(long)]
    fail_save: bool,
  },

  /// Restore saved anchors, then despawn the object for a QR code
  Despawn {
    /// QR payload text
    text: String,
  },

  /// Show resolved paths and configuration
  Info,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Initialize logging
  let default_filter = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let config_path = cli.config.clone().unwrap_or_else(paths::config_path);
  let config = Config::load(&config_path).context("Failed to load config")?;
  let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.resolved_data_dir());
  let ctx = Context {
    config_path,
    config,
    data_dir,
    format: cli.output,
  };

  match cli.command {
    Commands::Mappings => cmd::cmd_mappings(&ctx),
    Commands::Reconcile {
      fail_load,
      unlocalizable,
    } => cmd::cmd_reconcile(&ctx, fail_load, &unlocalizable),
    Commands::Detect {
      text,
      hit,
      normal,
      corners,
      miss,
      fail_save,
    } => cmd::cmd_detect(
      &ctx,
      cmd::DetectArgs {
        text,
        hit,
        normal,
        corners,
        miss,
        fail_save,
      },
    ),
    Commands::Despawn { text } => cmd::cmd_despawn(&ctx, &text),
    Commands::Info => cmd::cmd_info(&ctx),
  }
}
