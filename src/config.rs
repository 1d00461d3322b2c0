use crate::auth::AuthTokens;
use anyhow::{Context, Result};
use clap::Parser;
use std::env;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub storage_endpoint: String,
    pub storage_bucket: String,
    pub auth_tokens: Option<AuthTokens>,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Upload-record CRUD API")]
pub struct Args {
    /// Host to bind to (overrides UPLOAD_API_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides UPLOAD_API_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides UPLOAD_API_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Object-storage endpoint (overrides UPLOAD_API_STORAGE_ENDPOINT)
    #[arg(long)]
    pub storage_endpoint: Option<String>,

    /// Object-storage bucket (overrides UPLOAD_API_STORAGE_BUCKET)
    #[arg(long)]
    pub storage_bucket: Option<String>,

    /// Bearer tokens as `token=principal[,token=principal...]`
    /// (overrides UPLOAD_API_AUTH_TOKENS; empty disables authentication)
    #[arg(long)]
    pub auth_tokens: Option<String>,

    /// Maximum uploaded file size in bytes (overrides UPLOAD_API_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("UPLOAD_API_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("UPLOAD_API_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing UPLOAD_API_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading UPLOAD_API_PORT"),
        };
        let env_db = env::var("UPLOAD_API_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/uploads.db".into());
        let env_endpoint = env::var("UPLOAD_API_STORAGE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:9000".into());
        let env_bucket = env::var("UPLOAD_API_STORAGE_BUCKET").unwrap_or_else(|_| "uploads".into());
        let env_tokens = env::var("UPLOAD_API_AUTH_TOKENS").unwrap_or_default();
        let env_max = match env::var("UPLOAD_API_MAX_UPLOAD_BYTES") {
            Ok(value) => value
                .parse::<usize>()
                .with_context(|| format!("parsing UPLOAD_API_MAX_UPLOAD_BYTES value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_MAX_UPLOAD_BYTES,
            Err(err) => return Err(err).context("reading UPLOAD_API_MAX_UPLOAD_BYTES"),
        };

        // --- Merge ---
        let raw_tokens = args.auth_tokens.unwrap_or(env_tokens);
        let auth_tokens = if raw_tokens.trim().is_empty() {
            None
        } else {
            Some(AuthTokens::parse(&raw_tokens).context("parsing auth tokens")?)
        };

        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            storage_endpoint: args.storage_endpoint.unwrap_or(env_endpoint),
            storage_bucket: args.storage_bucket.unwrap_or(env_bucket),
            auth_tokens,
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
