//! Binary entry point for the hola-cli tool.

use hola_cli::cmd::App;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    if let Err(e) = App::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
