//! Fibonacci Bench - compare native and WebAssembly Fibonacci implementations

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fibonacci_bench::monitor::{render_summary, render_table};
use fibonacci_bench::{
    load_module, native_suite, run_detached, verify_agreement, BenchConfig, BenchResult,
    ModuleSource, Suite,
};

#[derive(Parser)]
#[command(name = "fibonacci-bench")]
#[command(about = "Compare native and WebAssembly Fibonacci implementations", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark all suites
    Run {
        /// Fibonacci index to compute
        #[arg(short, long)]
        input: Option<u32>,

        /// Number of timed runs
        #[arg(short, long)]
        runs: Option<usize>,

        /// WebAssembly module (path or URL) to compare against native code
        #[arg(short, long)]
        module: Option<String>,

        /// Skip the result agreement check
        #[arg(long)]
        no_verify: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that all suites compute the same values
    Verify {
        #[arg(short, long)]
        input: Option<u32>,

        #[arg(short, long)]
        module: Option<String>,
    },

    /// Show configuration
    Config,

    /// Load a module and print the title it reports
    Title {
        #[arg(short, long)]
        module: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = BenchConfig::load_or_default(cli.config.as_deref())?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            input,
            runs,
            module,
            no_verify,
            json,
        } => {
            config.input = input.unwrap_or(config.input);
            config.runs = runs.unwrap_or(config.runs);
            config.module = module.or(config.module);
            config.verify = config.verify && !no_verify;
            config.validate()?;

            let suites = load_suites(config.module.as_deref()).await?;
            if config.verify {
                let value = verify_agreement(config.input, &suites)?;
                info!("Verified fib({}) = {}", config.input, value);
            }

            if !json {
                println!(
                    "Running {} run(s) of fib({}) across {} suite(s)...",
                    config.runs,
                    config.input,
                    suites.len()
                );
            }
            let report = run_detached(config.input, config.runs, suites).await?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                println!();
                print!("{}", render_table(&report));
                print!("{}", render_summary(&report));
            }
        }

        Commands::Verify { input, module } => {
            config.input = input.unwrap_or(config.input);
            config.module = module.or(config.module);
            config.validate()?;

            let suites = load_suites(config.module.as_deref()).await?;
            let value = verify_agreement(config.input, &suites)?;
            println!(
                "All {} suite(s) agree: fib({}) = {}",
                suites.len(),
                config.input,
                value
            );
        }

        Commands::Config => {
            println!("Current Configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
            if let Some(path) = BenchConfig::default_path() {
                println!("# default location: {}", path.display());
            }
        }

        Commands::Title { module } => {
            let loaded = load_module(&ModuleSource::parse(&module)).await?;
            match loaded.title {
                Some(title) => println!("{}", title),
                None => println!("(module did not report a title)"),
            }
        }
    }

    Ok(())
}

/// Native suite, plus the module suite when a source is configured
async fn load_suites(module: Option<&str>) -> BenchResult<Vec<Suite>> {
    let mut suites = vec![native_suite()];

    if let Some(module) = module {
        let loaded = load_module(&ModuleSource::parse(module)).await?;
        if let Some(title) = &loaded.title {
            info!("Loaded module: {}", title);
        }
        suites.push(loaded.suite);
    }

    Ok(suites)
}
