use clap::{Parser, Subcommand};
use client::http::DEFAULT_NEIGHBOR_K;
use client::{AppConfig, Language};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "meet-kant", version, about = "Ask the Meet-Kant knowledge system about Kant")]
pub struct Cli {
    /// Base URL of the answer service, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (defaults to ./meet-kant.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive question session (the default)
    Chat {
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Ask a single question and print the result
    Ask {
        question: String,
        #[arg(long)]
        lang: Option<Language>,
        /// Print the whole form state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the answer service is up
    Health,
    /// List graph neighbors of an entity
    Neighbors {
        entity_id: String,
        #[arg(short, long, default_value_t = DEFAULT_NEIGHBOR_K)]
        k: usize,
    },
}

impl Cli {
    /// Flags override whatever the config file and environment set.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.api.request_timeout_secs = Some(secs);
        }
        let lang = match &self.command {
            Some(Command::Chat { lang }) | Some(Command::Ask { lang, .. }) => *lang,
            _ => None,
        };
        if let Some(lang) = lang {
            config.form.default_language = lang;
        }
    }
}
