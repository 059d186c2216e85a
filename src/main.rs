//! docgate - bearer-protected HTTP API with OpenAPI documentation
//!
//! Serves the API (default) or mints development tokens.

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docgate_api::{config, ApiServer, ApiServerConfig, AuthSettings};
use docgate_auth::{JwtClaims, JwtValidator};

/// docgate - bearer-protected HTTP API with OpenAPI documentation
#[derive(Parser, Debug)]
#[command(name = "docgate")]
#[command(about = "Serve a bearer-protected HTTP API with OpenAPI documentation", long_about = None)]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    server_args: ServerArgs,
}

/// Upper bound for `generate-token --hours` (ten years)
const MAX_TOKEN_HOURS: i64 = 24 * 365 * 10;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a JWT bearer token for local testing
    GenerateToken {
        /// JWT secret (must match the server's --jwt-secret)
        #[arg(long, env = "DOCGATE_JWT_SECRET")]
        secret: String,

        /// Token subject
        #[arg(long, default_value = "client")]
        subject: String,

        /// Token validity in hours
        #[arg(
            long,
            default_value = "24",
            value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_HOURS)
        )]
        hours: i64,

        /// Issuer claim
        #[arg(long)]
        issuer: Option<String>,

        /// Audience claim
        #[arg(long)]
        audience: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ServerArgs {
    /// API server bind address
    #[arg(long, env = "DOCGATE_BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind_addr: SocketAddr,

    /// Shared secret for HS256 bearer tokens
    #[arg(long, env = "DOCGATE_JWT_SECRET")]
    jwt_secret: Option<String>,

    /// RSA public key (PEM file) for RS256 bearer tokens
    #[arg(long, env = "DOCGATE_JWT_PUBLIC_KEY", conflicts_with = "jwt_secret")]
    jwt_public_key: Option<PathBuf>,

    /// Require this `iss` claim
    #[arg(long, env = "DOCGATE_JWT_ISSUER")]
    jwt_issuer: Option<String>,

    /// Require this `aud` claim
    #[arg(long, env = "DOCGATE_JWT_AUDIENCE")]
    jwt_audience: Option<String>,

    /// Path serving the OpenAPI JSON document
    #[arg(long, default_value = config::DEFAULT_OPENAPI_PATH)]
    openapi_path: String,

    /// Path serving the Swagger UI
    #[arg(long, default_value = config::DEFAULT_SWAGGER_UI_PATH)]
    swagger_ui_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl ServerArgs {
    fn into_config(self) -> Result<ApiServerConfig> {
        let jwt_public_key_pem = match &self.jwt_public_key {
            Some(path) => Some(
                std::fs::read(path)
                    .with_context(|| format!("Failed to read public key: {}", path.display()))?,
            ),
            None => None,
        };

        Ok(ApiServerConfig {
            bind_addr: self.bind_addr,
            openapi_path: self.openapi_path,
            swagger_ui_path: self.swagger_ui_path,
            auth: AuthSettings {
                jwt_secret: self.jwt_secret,
                jwt_public_key_pem,
                issuer: self.jwt_issuer,
                audience: self.jwt_audience,
            },
        })
    }
}

fn generate_token(
    secret: &str,
    subject: &str,
    hours: i64,
    issuer: Option<String>,
    audience: Option<String>,
) -> Result<()> {
    let validity = Duration::try_hours(hours)
        .with_context(|| format!("Token validity of {} hours is out of range", hours))?;
    let mut claims = JwtClaims::new(subject.to_string(), validity);
    if let Some(issuer) = issuer {
        claims = claims.with_issuer(issuer);
    }
    if let Some(audience) = audience {
        claims = claims.with_audience(audience);
    }

    let token = JwtValidator::encode(secret.as_bytes(), &claims)
        .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))?;

    println!("\nJWT Token generated successfully!\n");
    println!("Subject:       {}", subject);
    println!("Valid for:     {} hours", hours);
    println!("Expires:       {}", claims.exp_formatted());
    println!("\n{}", "=".repeat(70));
    println!("TOKEN:");
    println!("{}", token);
    println!("{}", "=".repeat(70));
    println!("\nUse it as:  Authorization: Bearer <token>\n");

    Ok(())
}

fn init_logging(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        return match command {
            Commands::GenerateToken {
                secret,
                subject,
                hours,
                issuer,
                audience,
            } => generate_token(&secret, &subject, hours, issuer, audience),
        };
    }

    let args = cli.server_args;
    init_logging(&args.log_level)?;

    info!("Starting docgate {}", env!("GIT_TAG"));

    let config = args.into_config()?;
    let server = ApiServer::new(config).context("Failed to configure API server")?;
    server.start().await.context("API server failed")?;

    Ok(())
}
