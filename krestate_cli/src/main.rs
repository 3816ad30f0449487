mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use krestate_lib::cache::ApiCache;
use krestate_lib::{CachedClient, Config, OpenDataTools};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "krestate")]
#[command(about = "Query Korean real-estate open data: trades, rents, subscriptions, auctions")]
struct Cli {
    /// Output format: table, json, or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a region name to a 5-digit legal district code
    Region(commands::region::RegionArgs),
    /// Sale records and price summary for a region and month
    Trades(commands::trades::TradesArgs),
    /// Lease records and deposit summary for a region and month
    Rent(commands::rent::RentArgs),
    /// Apartment subscription notices and statistics
    Subscription(commands::subscription::SubscriptionArgs),
    /// Onbid public-auction listings, bid results, and code lookups
    Auction(commands::auction::AuctionArgs),
    /// Bulk-collect monthly records into JSON files
    Collect(commands::collect::CollectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("krestate_api=info".parse().unwrap())
                .add_directive("krestate_lib=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(&cli.output);

    let client = CachedClient::new(ApiCache::default())?;
    let tools = OpenDataTools::new(client, Config::from_env());

    match &cli.command {
        Commands::Region(args) => commands::region::run(args, &format),
        Commands::Trades(args) => commands::trades::run(args, &tools, &format).await,
        Commands::Rent(args) => commands::rent::run(args, &tools, &format).await,
        Commands::Subscription(args) => commands::subscription::run(args, &tools).await,
        Commands::Auction(args) => commands::auction::run(args, &tools).await,
        Commands::Collect(args) => commands::collect::run(args, &tools).await,
    }
}
