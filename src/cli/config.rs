use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::LocatorConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "dom-locator",
    version,
    about = "Record and re-find elements in a changing document tree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: dom-locator.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSONL trace of each operation to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a stable structural path for an element
    Xpath {
        /// Snapshot JSON file or http(s) URL
        #[arg(long)]
        snapshot: String,

        /// Path expression selecting the element to describe
        #[arg(long)]
        at: String,
    },

    /// Resolve a structural path against a snapshot
    Find {
        /// Snapshot JSON file or http(s) URL
        #[arg(long)]
        snapshot: String,

        /// Path expression to resolve
        #[arg(long)]
        xpath: String,
    },

    /// Record a locator for an element
    Record {
        /// Snapshot JSON file or http(s) URL
        #[arg(long)]
        snapshot: String,

        /// Path expression selecting the element to record
        #[arg(long)]
        at: String,

        /// Write the record here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Find the single best match for a recorded locator
    Locate {
        /// Snapshot JSON file or http(s) URL
        #[arg(long)]
        snapshot: String,

        /// Locator record JSON file
        #[arg(long)]
        record: String,
    },

    /// List ranked candidates for a recorded locator
    Rank {
        /// Snapshot JSON file or http(s) URL
        #[arg(long)]
        snapshot: String,

        /// Locator record JSON file
        #[arg(long)]
        record: String,

        /// Maximum candidates to list (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `dom-locator.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub rank: RankConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TraceConfig {
    pub path: Option<String>,
}

fn default_limit() -> usize { 5 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("dom-locator.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

pub fn parse_config(content: &str) -> AppConfig {
    serde_yaml::from_str(content).unwrap_or_else(|e| {
        eprintln!("Warning: ignoring malformed config: {}", e);
        AppConfig::default()
    })
}
