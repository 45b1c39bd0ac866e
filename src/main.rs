use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use prodscope::{common, generate_commands, tracker, tracker_execution};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a tracker plan against the stored item record
    Run {
        #[clap(short, long)]
        plan: String,
        /// Keep running and regenerate when the stored record changes
        #[clap(short, long)]
        watch: bool,
    },
    /// Write a default tracker plan
    Init {
        #[clap(short, long)]
        plan: String,
    },
    Generate {
        #[clap(subcommand)]
        command: GenerateCommands,
    },
}

#[derive(Subcommand, Debug)]
enum GenerateCommands {
    /// Print the default prompt instruction template
    Template,
    /// Emit the embedded sample project
    Sample { dir: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Run { plan, watch } => {
            info!("Running tracker plan: {}", plan);
            tracker_execution::execute_tracker(plan, watch).await?;
        }
        Commands::Init { plan } => {
            info!("Initializing tracker plan: {}", plan);
            let plan_file_path = plan;
            let plan = tracker::TrackerPlan::default();
            let serialized_plan = serde_yaml::to_string(&plan)?;
            common::write_string_to_file(&plan_file_path, &serialized_plan)?;
        }
        Commands::Generate { command } => match command {
            GenerateCommands::Template => {
                generate_commands::generate_template();
            }
            GenerateCommands::Sample { dir } => {
                info!("Generating sample in {}", dir);
                generate_commands::generate_sample(dir);
            }
        },
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
