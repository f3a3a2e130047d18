use clap::Parser;
use tls_check::cli::Cli;
use tls_check::engine::prober::TcpProber;
use tls_check::engine::Engine;
use tls_check::output::OutputSink;
use tls_check::registry::Registry;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = cli.into_config()?;

    let prober = TcpProber::new(&cfg);
    let mut sink = OutputSink::stdout(cfg.output.clone());
    let engine = Engine::new(cfg, Registry::builtin(), prober);
    engine.run(&mut sink).await?;

    Ok(())
}
