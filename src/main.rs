use cptbench::{run, Config};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure paths ──────────────────────────────────────────
    let cfg = Config::default();
    info!(
        input = %cfg.input_path.display(),
        output = %cfg.output_path.display(),
        "startup"
    );

    // ─── 3) convert ──────────────────────────────────────────────────
    match run(&cfg) {
        Ok(path) => {
            println!("Successfully generated {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "conversion failed");
            eprintln!("Error processing data: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
