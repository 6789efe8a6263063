use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Node a client talks to when `--node` is not given.
pub const DEFAULT_NODE: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(
    name = "cipherlot",
    about = "Cipherlot: content-addressed publishing node and client",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a node serving blobs, manifests, and feeds over HTTP
    Serve(ServeArgs),
    /// Publish a file to an author's feed
    Publish(PublishArgs),
    /// Follow an author's feed and download new publications
    Subscribe(SubscribeArgs),
    /// Print the content identifier of a file
    Cid(CidArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address [default: 0.0.0.0:8080]
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Storage directory [default: $DATA_ROOT, $DATA_DIR, or ./data]
    #[arg(long)]
    pub data_root: Option<PathBuf>,
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct PublishArgs {
    #[arg(long)]
    pub author: String,
    #[arg(long, default_value = DEFAULT_NODE)]
    pub node: String,
    /// Feed timestamp, unix seconds [default: now]
    #[arg(long, allow_negative_numbers = true)]
    pub ts: Option<i64>,
    pub file: PathBuf,
}

#[derive(Args)]
pub struct SubscribeArgs {
    #[arg(long)]
    pub author: String,
    #[arg(long, default_value = DEFAULT_NODE)]
    pub node: String,
    /// Directory downloads are written to
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Only entries newer than this unix time; 0 means from the beginning
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub since: i64,
    /// Seconds between polls
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
    /// Poll once and exit
    #[arg(long)]
    pub once: bool,
}

#[derive(Args)]
pub struct CidArgs {
    pub file: PathBuf,
}
