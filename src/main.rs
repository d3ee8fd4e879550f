use anyhow::Context;
use clap::{Parser, Subcommand};
use profile_planner::{DeploymentStep, ProfileInput, plan_node};
use tracing::info;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "profile-planner")]
#[command(about = "Plan staged deployment profile configuration for one node", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan every profile in the input document for its node.
    Plan {
        #[arg(long)]
        input: String,

        /// Override the node's deployment step.
        #[arg(long)]
        step: Option<u32>,

        /// Override the node's own identity.
        #[arg(long)]
        hostname: Option<String>,

        /// Write the plan here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.cmd {
        Commands::Plan {
            input,
            step,
            hostname,
            out,
        } => {
            // 1) Load the parameter bag; CLI flags win over the file.
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read input file {}", input))?;
            let mut doc: ProfileInput = serde_json::from_str(&text)
                .with_context(|| format!("parse input file {}", input))?;
            if let Some(step) = step {
                doc.node.step = DeploymentStep(step);
            }
            if let Some(hostname) = hostname {
                doc.node.self_identity = hostname;
            }

            // 2) Plan.
            let plan = plan_node(&doc)
                .with_context(|| format!("plan node {} at {}", doc.node.self_identity, doc.node.step))?;

            // 3) Emit.
            let json = serde_json::to_string_pretty(&plan)?;
            match out {
                Some(out) => {
                    std::fs::write(&out, json).with_context(|| format!("write {}", out))?;
                    info!(path = %out, "wrote plan");
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
