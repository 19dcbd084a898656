use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::layers::filter::FilterCriteria;

/// Path of the resource routes on every backend host.
pub const RESOURCES_PATH: &str = "/api/resources";

#[derive(Parser, Debug)]
#[command(version, about = "Browse, filter, download and upload college resources")]
pub struct Cli {
    /// Deployment profile used to pick the backend host
    #[arg(long = "env", env = "RESOURCE_HUB_ENV", value_enum, default_value_t = Profile::Local)]
    pub profile: Profile,

    /// Backend host, overrides the profile (e.g. http://localhost:8080)
    #[arg(long, env = "RESOURCE_HUB_URL")]
    pub base_url: Option<String>,

    /// Where downloaded files are written
    #[arg(long, env = "DOWNLOAD_DIR", default_value = "downloads")]
    pub download_dir: PathBuf,

    /// Delay before reloading after a download, in milliseconds
    #[arg(long, env = "RESOURCE_HUB_REFRESH_MS", default_value_t = 1000)]
    pub refresh_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List resources matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Also write the view as a standalone HTML page
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },
    /// Show totals over the whole collection
    Stats,
    /// Show the distinct subjects
    Subjects,
    /// Show every field of one resource
    Details {
        id: i64,
        /// Ask the backend for this record instead of loading the whole list
        #[arg(long)]
        remote: bool,
    },
    /// Download a resource's file
    Download { id: i64 },
    /// Upload a PDF, JPG or PNG
    Upload(UploadArgs),
    /// Interactive browser
    Browse,
    /// Check that the backend answers
    Ping,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title and subject
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub semester: Option<String>,
    /// notes, papers, books or other
    #[arg(long = "type")]
    pub kind: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            search: args.search,
            subject: args.subject,
            semester: args.semester,
            kind: args.kind,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub semester: i32,
    #[arg(long = "type", default_value = "notes")]
    pub kind: String,
    #[arg(long)]
    pub uploader: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Local,
    Network,
    Tunnel,
    Production,
}

impl Profile {
    fn host_var(self) -> &'static str {
        match self {
            Profile::Local => "RESOURCE_HUB_LOCAL_HOST",
            Profile::Network => "RESOURCE_HUB_NETWORK_HOST",
            Profile::Tunnel => "RESOURCE_HUB_TUNNEL_HOST",
            Profile::Production => "RESOURCE_HUB_PRODUCTION_HOST",
        }
    }

    fn default_host(self) -> Option<&'static str> {
        match self {
            Profile::Local => Some("http://localhost:8080"),
            Profile::Network => Some("http://192.168.0.108:8080"),
            Profile::Tunnel | Profile::Production => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub download_dir: PathBuf,
    pub refresh_delay: Duration,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    fn resolve_with(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = match &cli.base_url {
            Some(url) => url.clone(),
            None => lookup(cli.profile.host_var())
                .or_else(|| cli.profile.default_host().map(str::to_string))
                .ok_or_else(|| {
                    anyhow!(
                        "no backend host for profile {:?}; set {} or --base-url",
                        cli.profile,
                        cli.profile.host_var()
                    )
                })?,
        };

        Ok(Self {
            endpoint: endpoint_for(&host)?,
            download_dir: cli.download_dir.clone(),
            refresh_delay: Duration::from_millis(cli.refresh_ms),
        })
    }
}

/// Validates the host and appends the resource routes path.
pub fn endpoint_for(host: &str) -> Result<String> {
    let parsed = Url::parse(host.trim()).map_err(|e| anyhow!("invalid backend URL {host:?}: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("backend URL must be http or https, got {}", parsed.scheme());
    }
    let base = parsed.as_str().trim_end_matches('/');
    if base.ends_with(RESOURCES_PATH) {
        Ok(base.to_string())
    } else {
        Ok(format!("{}{}", base, RESOURCES_PATH))
    }
}
