use clap::Parser;
use restree_cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = restree_cli::run(Cli::parse())?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
