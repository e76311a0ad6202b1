use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the library content REST API")]
pub struct Args {
    /// Backend base URL (overrides CONTENT_DESK_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Auth token (overrides CONTENT_DESK_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// HTTP timeout in seconds (overrides CONTENT_DESK_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List content matching the given filters
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        reviewed: Option<bool>,
        /// Metadata ids the content must carry
        #[arg(long, value_delimiter = ',')]
        metadata: Vec<u64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Upload a new content item
    Add {
        #[arg(long)]
        title: String,
        /// Path of the file to upload
        #[arg(long)]
        file: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        published_year: Option<String>,
        /// Metadata as TYPE:ID pairs
        #[arg(long, value_parser = parse_metadata_ref)]
        metadata: Vec<(u64, u64)>,
    },
    /// Edit an existing content item
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        /// Metadata as TYPE:ID pairs, replacing the current set
        #[arg(long, value_parser = parse_metadata_ref)]
        #[arg(required_unless_present = "clear_metadata")]
        metadata: Vec<(u64, u64)>,
        /// Remove every metadata reference from the item
        #[arg(long, conflicts_with = "metadata")]
        clear_metadata: bool,
    },
    /// Delete one or more content items
    Delete {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Show the metadata type catalog
    MetadataTypes,
    /// Show the signed-in user
    Profile,
    /// End the current session
    Logout,
    /// Check whether the signed-in user holds capabilities on a slice
    Can {
        slice: String,
        #[arg(required = true)]
        capabilities: Vec<String>,
        /// Pass when any capability is granted instead of all
        #[arg(long)]
        any: bool,
    },
}

fn parse_metadata_ref(raw: &str) -> Result<(u64, u64), String> {
    let (type_id, id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:ID, got `{}`", raw))?;
    let type_id = type_id
        .trim()
        .parse()
        .map_err(|_| format!("invalid metadata type id `{}`", type_id))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid metadata id `{}`", id))?;
    Ok((type_id, id))
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the command to run.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        // Parse CLI once
        let args = Args::parse();
        let cfg = Self::merge(&args, |key| env::var(key))?;
        Ok((cfg, args.command))
    }

    /// CLI values win over environment values, which win over defaults.
    pub fn merge(args: &Args, var: impl Fn(&str) -> Result<String, env::VarError>) -> Result<Self> {
        // --- Environment fallback ---
        let env_url =
            var("CONTENT_DESK_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".into());
        let env_token = var("CONTENT_DESK_TOKEN").ok().filter(|t| !t.is_empty());
        let env_timeout = match var("CONTENT_DESK_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .with_context(|| format!("parsing CONTENT_DESK_TIMEOUT_SECS value `{}`", value))?,
            Err(env::VarError::NotPresent) => 30,
            Err(err) => return Err(err).context("reading CONTENT_DESK_TIMEOUT_SECS"),
        };

        // --- Merge ---
        Ok(Self {
            api_url: args.api_url.clone().unwrap_or(env_url),
            token: args.token.clone().or(env_token),
            timeout_secs: args.timeout_secs.unwrap_or(env_timeout),
        })
    }
}
