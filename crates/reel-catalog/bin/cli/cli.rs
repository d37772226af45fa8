use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};

pub const STORE_BACKEND_ENV: &str = "REEL_STORE_BACKEND";
pub const REDIS_URL_ENV: &str = "REEL_REDIS_URL";
pub const KEY_PREFIX_ENV: &str = "REEL_REDIS_KEY_PREFIX";
pub const NODE_ID_ENV: &str = "REEL_NODE_ID";

pub const DEFAULT_KEY_PREFIX: &str = "reel:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "reel", about = "Query and extend the movie catalog")]
pub struct CLI {
    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::InMemory
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("store", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = KEY_PREFIX_ENV, default_value = DEFAULT_KEY_PREFIX)]
    pub key_prefix: String,

    /// Node id embedded in generated keys; must differ between writers.
    #[arg(long, env = NODE_ID_ENV, default_value_t = 0)]
    pub node_id: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every movie with its id.
    List,
    /// Print a single movie.
    Get { id: String },
    /// Add a movie and print its generated id.
    Add {
        #[arg(long)]
        genre: String,
        /// Extra descriptive fields; values are parsed as JSON when possible.
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Print the distinct genres.
    Genres,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
