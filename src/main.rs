use ai_speedup::{cli::Cli, report, ModelSpec, RegressionRunner};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let estimate = RegressionRunner::new(ModelSpec::default())
        .run(&args.input_data)
        .with_context(|| format!("regression on {} failed", args.input_data.display()))?;

    print!("{}", report::render(&estimate));
    Ok(())
}
