use clap::Parser;
use envrun::Envrun;

fn main() {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Envrun::parse();
    if let Err(err) = cli.command.execute() {
        eprintln!("❌ {err:#}");
        let code = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<envrun_core::Error>())
            .map(envrun_core::Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
