//! Runs the SPX example programs against a live server.
//!
//! Exit status: 0 when every example passed or the session was skipped
//! because the server is not healthy, 1 when any example failed or no
//! examples were found, 2 when the examples directory cannot be read.
//!
//! The server is checked first, so an unhealthy server skips the session
//! before discovery runs.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use spx_client::{API_URL_VAR, DEFAULT_API_URL};
use spx_plot::BACKEND_VAR;
use spx_smoke::{EXAMPLES_ONLY_VAR, Launcher, Runner, discover, session};

#[derive(Parser, Debug)]
#[command(name = "spx-smoke")]
#[command(about = "Run SPX example programs as smoke tests", long_about = None)]
struct Cli {
    /// Directory containing the example programs
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../spx-examples/examples"))]
    examples_dir: PathBuf,

    /// Cargo package that owns the examples
    #[arg(long, default_value = "spx-examples")]
    package: String,

    /// Run each example as `<PROGRAM> <path>` instead of through cargo
    #[arg(long)]
    program: Option<PathBuf>,

    /// Server base URL, probed before running and passed to examples
    #[arg(long, env = API_URL_VAR, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Comma-separated example paths relative to the examples directory
    #[arg(long, env = EXAMPLES_ONLY_VAR)]
    only: Option<String>,

    /// Per-example timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Health probe timeout in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let health = session::probe(&cli.api_url, Duration::from_secs(cli.probe_timeout_secs)).await;
    if !health.is_healthy() {
        println!("SKIP SPX server not healthy at {}: {health}", cli.api_url);
        return ExitCode::SUCCESS;
    }
    log::info!("{} is {health}", cli.api_url);

    let examples = match discover(&cli.examples_dir, cli.only.as_deref()) {
        Ok(examples) => examples,
        Err(err) => {
            eprintln!("cannot read {}: {err}", cli.examples_dir.display());
            return ExitCode::from(2);
        }
    };

    if examples.is_empty() {
        println!(
            "FAIL discovery_found_examples: no example programs found under {}",
            cli.examples_dir.display()
        );
        return ExitCode::FAILURE;
    }
    println!("ok   discovery_found_examples ({} found)", examples.len());

    let launcher = match cli.program {
        Some(program) => Launcher::Program(program),
        None => Launcher::Cargo {
            package: cli.package,
        },
    };
    let runner = Runner::new(launcher)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .env_default(API_URL_VAR, cli.api_url.as_str())
        .env_default(BACKEND_VAR, "headless");

    let mut failed = 0;
    for example in &examples {
        match runner.run(example).await {
            Ok(output) if output.success() => println!("ok   {}", example.name),
            Ok(output) => {
                failed += 1;
                println!("FAIL {} ({})", example.name, output.status);
                println!("{output}");
            }
            Err(err) => {
                failed += 1;
                println!("FAIL {}: {err}", example.name);
            }
        }
    }

    println!("{} passed, {failed} failed", examples.len() - failed);
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
