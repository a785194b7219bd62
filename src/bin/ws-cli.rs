use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use commerce_ws::codec::{AvailabilityFilterDecoder, DefaultSearchQueryCodec, SearchQuery, SearchQueryCodec};
use commerce_ws::config::{load_config, ServiceConfig};
use commerce_ws::http::controllers;
use commerce_ws::mapping::HandlerMapping;

#[derive(Parser)]
#[command(name = "ws-cli")]
#[command(about = "Offline tools for commerce-ws filters and routes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a product availability filter (product:unit,unit;...)
    DecodeFilters {
        filters: String,
        #[arg(long, default_value_t = commerce_ws::codec::MAX_SUPPORTED_PRODUCTS)]
        max_products: usize,
    },
    /// Decode a search query (freeText:sort:key:value...)
    DecodeQuery { query: String },
    /// Encode a search query given as JSON
    EncodeQuery { json: String },
    /// Print the route table resolved for a configuration file
    Routes {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DecodeFilters { filters, max_products } => {
            let context = AvailabilityFilterDecoder::new(max_products).decode(Some(&filters))?;
            println!("{}", serde_json::to_string_pretty(&context)?);
        }
        Commands::DecodeQuery { query } => {
            let decoded = DefaultSearchQueryCodec.decode_query(Some(&query))?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Commands::EncodeQuery { json } => {
            let query: SearchQuery = serde_json::from_str(&json)?;
            println!("{}", DefaultSearchQueryCodec.encode_query(Some(&query)).unwrap_or_default());
        }
        Commands::Routes { config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => ServiceConfig::default(),
            };
            print_routes(&config)?;
        }
    }

    Ok(())
}

fn print_routes(config: &ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let catalogue = controllers::catalogue();
    let mapping = HandlerMapping::new(config.mapping.api_version.clone(), config.mapping.priority_settings())
        .with_context(Arc::new(controllers::context(&catalogue)));
    let table = mapping.build_route_table(&config.properties)?;

    println!("Overrides ({}):", table.overrides().len());
    for (route, priority) in table.overrides().iter() {
        println!("  {} max priority {}", route, priority);
    }
    println!("Active ({}):", table.active().len());
    for r in table.active() {
        println!("  {} -> {} (priority {:?})", r.route, r.candidate.qualified_name(), r.priority);
    }
    println!("Suppressed ({}):", table.suppressed().len());
    for r in table.suppressed() {
        println!("  {} -> {} (priority {:?})", r.route, r.candidate.qualified_name(), r.priority);
    }
    Ok(())
}
