mod cli;

use std::sync::Arc;

use axum::http::header;
use clap::Parser;
use cli::{Cli, Commands, RouteArgs};
use shardgate::api::{self, state::build_pipeline};
use shardgate::cache::NoopCache;
use shardgate::config::Config;
use shardgate::edge::{IncomingRequest, Route};
use shardgate::observability;
use shardgate::origin::{HttpConfig, HttpOriginFetcher};
use url::Url;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .map_err(|e| format!("Failed to load config: {}", e))?;

    observability::init_tracing(&config.telemetry);

    match cli.command {
        Commands::Serve(args) => api::run(config, args.address).await?,
        Commands::Route(args) => route(&config, args)?,
    }

    Ok(())
}

fn route(config: &Config, args: RouteArgs) -> Result<(), AnyError> {
    let pipeline = build_pipeline(
        config,
        Arc::new(NoopCache),
        Arc::new(HttpOriginFetcher::new(HttpConfig::from(&config.origin))?),
    )?;

    let url = Url::parse(&args.url).map_err(|e| format!("Invalid URL '{}': {}", args.url, e))?;
    let mut request = IncomingRequest::get(url);
    if let Some(referer) = &args.referer {
        request = request.with_header(header::REFERER, referer);
    }

    match pipeline.route(&request) {
        Ok(Route::Origin(origin)) => {
            println!("origin   {}", origin.url);
            println!("shard    {}", origin.shard);
            println!("video_id {}", origin.video_id);
        }
        Ok(Route::Redirect(location)) => {
            println!("redirect 302 {}", location);
        }
        Err(e) => {
            println!("reject   {} ({})", e.status_code().as_u16(), e);
        }
    }

    Ok(())
}
