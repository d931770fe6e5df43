//! Command-line interface for signing tokens and calling a hola server.

use crate::error::Error;
use clap::Parser;
use hola::Algorithm;
use reqwest::header::AUTHORIZATION;
pub mod sign;

/// Sign a token requesting scopes and send it to a hola server.
#[derive(Parser, Debug)]
#[command(name = "hola-cli", version, about)]
pub struct App {
    /// Identity key, used as the `iss` claim.
    pub key: String,

    /// Secret shared with the server for that identity.
    pub secret: String,

    /// Scopes to request.
    pub scopes: Vec<String>,

    /// Endpoint the token is sent to.
    #[arg(long, default_value = "http://localhost:4040/api/auth")]
    pub url: String,

    /// Signing method, e.g. HS256 or HS512.
    #[arg(long, default_value = "HS256", value_parser = parse_algorithm)]
    pub algorithm: Algorithm,

    /// Token lifetime in seconds.
    #[arg(long, default_value_t = 300)]
    pub ttl: u64,

    /// Print the token instead of sending it.
    #[arg(long)]
    pub print: bool,
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse()
        .map_err(|_| format!("unsupported signing method {s:?}"))
}

impl App {
    /// Parse CLI arguments and execute the command.
    pub async fn run() -> Result<(), Error> {
        let app = App::parse();
        let token = sign::token(&app)?;

        if app.print {
            println!("{token}");
            return Ok(());
        }

        tracing::debug!(url = %app.url, "sending token");
        let response = reqwest::Client::new()
            .get(&app.url)
            .header(AUTHORIZATION, format!("BEARER {token}"))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        println!("status {status} body {body}");
        Ok(())
    }
}
