//! Binary entry point for the hola server.

use anyhow::Context;
use axum::{Router, routing::get};
use clap::Parser;
use hola::{Authenticator, AuthenticatorConfig};
use hola_axum::auth::{AuthLayer, Scopes};
use hola_yaml::YamlStore;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Serves `/api/auth`, answering with the scopes a bearer token was
/// authorized for.
#[derive(Parser, Debug)]
#[command(name = "hola", version, about)]
struct Cli {
    /// Location of the identities YAML file.
    #[arg(long, default_value = "secrets.yml")]
    secrets: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:4040")]
    listen: SocketAddr,

    /// Required `aud` claim.
    #[arg(long)]
    audience: Option<String>,

    /// Required `sub` claim.
    #[arg(long)]
    subject: Option<String>,

    /// Seconds an expired token is still accepted for.
    #[arg(long, default_value_t = 1)]
    expiration_leeway: u64,

    /// Seconds a token is accepted before its `nbf`.
    #[arg(long, default_value_t = 1)]
    not_before_leeway: u64,
}

/// `scopes ["a" "b"]` when scopes are attached, empty otherwise.
async fn scopes(scopes: Option<Scopes>) -> String {
    let Some(scopes) = scopes else {
        return String::new();
    };
    let quoted: Vec<String> = scopes.iter().map(|scope| format!("{scope:?}")).collect();
    format!("scopes [{}]", quoted.join(" "))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let store = YamlStore::from_path(&cli.secrets)
        .with_context(|| format!("loading identities from {}", cli.secrets.display()))?;
    tracing::info!(identities = store.len(), "identity store loaded");

    let config = AuthenticatorConfig {
        expiration_leeway: Duration::from_secs(cli.expiration_leeway),
        not_before_leeway: Duration::from_secs(cli.not_before_leeway),
        subject: cli.subject,
        audience: cli.audience,
        ..Default::default()
    };
    let authenticator = Authenticator::new(store, config);

    let app = Router::new()
        .route("/api/auth", get(scopes))
        .layer(AuthLayer::new(authenticator));

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;
    tracing::info!(addr = %cli.listen, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
