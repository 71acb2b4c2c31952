//! Shopwise MCP server: entry point.

use std::sync::Arc;
use tokio::sync::Mutex;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use shopwise::{clamp_top_n, Catalog, Recommender, DEFAULT_TOP_N};
use shopwise_mcp::config::{resolve_catalog_path, resolve_db_path, resolve_trending_path};
use shopwise_mcp::protocol::ProtocolHandler;
use shopwise_mcp::session::ShopSession;
use shopwise_mcp::tools::product_recommend::recommendations_json;
use shopwise_mcp::tools::ToolRegistry;
use shopwise_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "shopwise-mcp",
    about = "MCP server for Shopwise: content-based product recommendations",
    version
)]
struct Cli {
    /// Path to the training catalog CSV.
    #[arg(short, long)]
    catalog: Option<String>,

    /// Path to the trending products CSV.
    #[arg(long)]
    trending: Option<String>,

    /// Path to the user database.
    #[arg(long)]
    db: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start the HTTP storefront and MCP endpoint.
    #[cfg(feature = "http")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = shopwise_mcp::config::DEFAULT_HTTP_ADDR)]
        addr: String,

        /// Bearer token for the /mcp route.
        /// Also reads from SHOPWISE_TOKEN env var.
        #[arg(long)]
        token: Option<String>,
    },

    /// Print recommendations for a product as JSON.
    Recommend {
        /// Exact catalog product name.
        product_name: String,

        /// Maximum number of recommendations.
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N as i64, allow_negative_numbers = true)]
        top_n: i64,
    },

    /// Validate the training catalog.
    Validate,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   shopwise-mcp completions bash > ~/.local/share/bash-completion/completions/shopwise-mcp
    ///   shopwise-mcp completions zsh > ~/.zfunc/_shopwise-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn open_session(cli: &Cli) -> anyhow::Result<ShopSession> {
    let catalog_path = resolve_catalog_path(cli.catalog.as_deref());
    let trending_path = resolve_trending_path(cli.trending.as_deref());
    let db_path = resolve_db_path(cli.db.as_deref());
    tracing::info!("Catalog: {catalog_path}");
    Ok(ShopSession::open(&catalog_path, &trending_path, &db_path)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.as_ref().unwrap_or(&Commands::Serve) {
        Commands::Serve => {
            let session = Arc::new(Mutex::new(open_session(&cli)?));
            let handler = ProtocolHandler::new(session);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "http")]
        Commands::ServeHttp { addr, token } => {
            use shopwise_mcp::config::resolve_token;
            use shopwise_mcp::transport::HttpTransport;

            let effective_token = resolve_token(token.clone());
            let session = Arc::new(Mutex::new(open_session(&cli)?));
            let handler = ProtocolHandler::new(session);

            tracing::info!("Shopwise HTTP server");
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required on /mcp");
            }

            let transport = HttpTransport::new(handler, effective_token);
            transport.run(addr).await?;
        }

        Commands::Recommend {
            product_name,
            top_n,
        } => {
            let catalog_path = resolve_catalog_path(cli.catalog.as_deref());
            let recommender = Recommender::new(Arc::new(Catalog::from_path(&catalog_path)?));
            let items = recommender.recommend(product_name, clamp_top_n(*top_n));
            let body =
                recommendations_json(product_name, recommender.outcome(product_name), &items);
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Validate => {
            let catalog_path = resolve_catalog_path(cli.catalog.as_deref());
            match Catalog::from_path(&catalog_path) {
                Ok(catalog) => {
                    let space = shopwise::build_model(&catalog);
                    let untagged = catalog.iter().filter(|i| i.tags.trim().is_empty()).count();
                    println!("Valid catalog: {catalog_path}");
                    println!("  Products: {}", catalog.len());
                    println!("  Vocabulary: {}", space.n_terms());
                    println!("  Untagged products: {untagged}");
                }
                Err(e) => {
                    eprintln!("Invalid catalog: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let capabilities = shopwise_mcp::types::InitializeResult::current();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "shopwise-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            shopwise_mcp::repl::run()?;
        }
    }

    Ok(())
}
