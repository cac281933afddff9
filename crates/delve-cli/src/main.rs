mod serve;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use delve_core::llm::Provider;
use delve_core::safety::blocked_report;
use delve_core::{Config, Planner, PromptInjectionGuard, ResearchPipeline};

use serve::ResearchResponse;

#[derive(Parser)]
#[command(name = "delve")]
#[command(about = "Research a topic on the web and get a cited Markdown report", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan, search, extract and summarize a topic
    Run {
        /// What to research
        #[arg(required = true)]
        prompt: Vec<String>,
        /// Print the full result as JSON instead of the Markdown report
        #[arg(long)]
        json: bool,
        /// Write the output to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the research plan without running it
    Plan {
        #[arg(required = true)]
        prompt: Vec<String>,
        /// Print the plan as YAML
        #[arg(long)]
        yaml: bool,
    },
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { prompt, json, output } => {
            let config = load_config(config_path)?;
            run(&config, &prompt.join(" "), json, output).await
        }
        Commands::Plan { prompt, yaml } => {
            let config = load_config(config_path)?;
            plan(&config, &prompt.join(" "), yaml).await
        }
        Commands::Serve { host, port } => {
            let mut config = load_config(config_path)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let pipeline = ResearchPipeline::from_config(&config)?;
            serve::start_server(&config.server, pipeline)
                .await
                .wrap_err("server stopped")
        }
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

/// Logs go to stderr so reports can be piped.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("delve_core=info,delve=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load configuration from {}", path.display())),
        None => Config::load().wrap_err("failed to load configuration"),
    }
}

async fn run(config: &Config, prompt: &str, json: bool, output: Option<PathBuf>) -> Result<()> {
    let pipeline = ResearchPipeline::from_config(config)?;

    let spinner = spinner("Researching...");
    let result = pipeline.run(prompt).await;
    spinner.finish_and_clear();
    let state = result?;

    if state.is_blocked() {
        eprintln!("Request blocked by safety checks.");
    } else if !state.failures.is_empty() {
        eprintln!(
            "{} of {} tasks failed; the report uses the remaining evidence.",
            state.failures.len(),
            state.tasks.len()
        );
    }

    let rendered = if json {
        serde_json::to_string_pretty(&ResearchResponse::from(state))?
    } else {
        state.final_report
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn plan(config: &Config, prompt: &str, yaml: bool) -> Result<()> {
    let guard = PromptInjectionGuard::new();

    let verdict = guard.validate_prompt(prompt);
    if verdict.blocked {
        println!("{}", blocked_report(&verdict));
        return Ok(());
    }

    let planner = Planner::new(Provider::build_from_config(&config.llm)?);
    let spinner = spinner("Planning...");
    let result = planner.plan(prompt).await;
    spinner.finish_and_clear();
    let plan = result?;

    if yaml {
        print!("{}", plan.to_yaml()?);
    } else {
        println!("Plan:");
        for (i, step) in plan.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
        println!("\nTasks:");
        for task in &plan.tasks {
            match &task.tag {
                Some(tag) => println!("  - [{}] {}", tag, task.objective),
                None => println!("  - [untagged] {}", task.objective),
            }
        }
    }

    let verdict = guard.validate_plan(&plan);
    if verdict.blocked {
        eprintln!("\nThis plan would be blocked: {}", verdict.reason);
    }

    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
