use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shardgate")]
#[command(about = "Hotlink-protecting edge router for sharded video origins", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $SHARDGATE_CONFIG or config/shardgate.toml)
    #[arg(long, global = true, env = "SHARDGATE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the edge HTTP server
    Serve(ServeArgs),
    /// Show how a URL would be routed, without cache or network access
    Route(RouteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overriding server.bind_addr
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct RouteArgs {
    /// Public request URL, e.g. https://x001.vicdn.cc/abc123.m3u8
    pub url: String,

    /// Referer header to send along
    #[arg(long)]
    pub referer: Option<String>,
}
