//! Pin Save CLI
//!
//! Command-line interface for the Pin Save decentralized content aggregation
//! backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pinsave_aggregate::{AggregationConfig, AggregationService};
use pinsave_api::{ApiConfig, ApiServer};
use pinsave_core::traits::{StorageBackend, WalletSigner};
use pinsave_core::types::{PostDraft, StorageScheme};
use pinsave_funding::{format_units, CreditProvider, CreditProviderConfig, FundingManager};
use pinsave_publish::PublishCoordinator;
use pinsave_storage::{IpfsBackend, IpfsBackendConfig, SkynetBackend, SkynetBackendConfig};

/// Pin Save - decentralized content aggregation and image sharing
#[derive(Parser)]
#[command(name = "pinsave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the read API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },

    /// Show the chains the Pin Save contract is deployed to
    Chains,

    /// List every published post on a chain, newest first
    List {
        /// Chain id to scan
        chain_id: u64,
        /// Gateway domain for metadata fetches
        #[arg(long, env = "PINSAVE_GATEWAY_DOMAIN")]
        gateway: Option<String>,
    },

    /// Publish a post: upload to storage and print the mint hand-off
    Publish {
        /// Post title
        #[arg(short, long)]
        title: String,
        /// Post description
        #[arg(short, long)]
        description: String,
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,
        /// Owner wallet address
        #[arg(short, long, env = "PINSAVE_OWNER")]
        owner: String,
        /// Storage backend: ipfs or skynet
        #[arg(short, long, default_value = "ipfs")]
        backend: String,
        /// Pinning service JWT (ipfs backend)
        #[arg(long, env = "PINATA_JWT")]
        jwt: Option<String>,
        /// Skynet portal URL (skynet backend)
        #[arg(long, env = "SKYNET_PORTAL_URL")]
        portal: Option<String>,
        /// Funding node URL (skynet backend)
        #[arg(long, env = "PINSAVE_FUNDING_NODE")]
        funding_node: Option<String>,
    },

    /// Show the funded storage balance for an account
    Balance {
        /// Wallet address
        #[arg(short, long, env = "PINSAVE_OWNER")]
        owner: String,
        /// Funding node URL
        #[arg(long, env = "PINSAVE_FUNDING_NODE")]
        funding_node: String,
    },

    /// Top up the funded storage balance
    Fund {
        /// Wallet address
        #[arg(short, long, env = "PINSAVE_OWNER")]
        owner: String,
        /// Funding node URL
        #[arg(long, env = "PINSAVE_FUNDING_NODE")]
        funding_node: String,
        /// Amount in base units (provider default when omitted)
        #[arg(short, long)]
        amount: Option<u128>,
    },
}

/// CLI-side wallet binding. Transaction signing stays with the external
/// mint collaborator; the coordinator only needs the bound address.
struct CliSigner {
    address: String,
}

impl WalletSigner for CliSigner {
    fn address(&self) -> &str {
        &self.address
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "pinsave=debug,info"
    } else {
        "pinsave=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port } => cmd_serve(port).await,
        Commands::Chains => cmd_chains(),
        Commands::List { chain_id, gateway } => cmd_list(chain_id, gateway).await,
        Commands::Publish {
            title,
            description,
            image,
            owner,
            backend,
            jwt,
            portal,
            funding_node,
        } => {
            cmd_publish(
                title,
                description,
                image,
                owner,
                &backend,
                jwt,
                portal,
                funding_node,
            )
            .await
        }
        Commands::Balance { owner, funding_node } => cmd_balance(&owner, &funding_node).await,
        Commands::Fund {
            owner,
            funding_node,
            amount,
        } => cmd_fund(&owner, &funding_node, amount).await,
    }
}

async fn cmd_serve(port: u16) -> Result<()> {
    println!("{}", "📌 Starting Pin Save API server...".cyan().bold());

    let server = ApiServer::new(ApiConfig::from_env());
    server
        .run(([0, 0, 0, 0], port))
        .await
        .context("API server failed")?;

    Ok(())
}

fn cmd_chains() -> Result<()> {
    println!("{}", "⛓️  Supported chains:".cyan().bold());
    for chain in pinsave_chain::supported_chains() {
        println!(
            "  {} {} ({})",
            format!("{:>7}", chain.chain_id).yellow().bold(),
            chain.name.bold(),
            chain.contract_address.dimmed()
        );
    }
    Ok(())
}

async fn cmd_list(chain_id: u64, gateway: Option<String>) -> Result<()> {
    println!(
        "{} chain {}",
        "🔍 Scanning".cyan().bold(),
        chain_id.to_string().yellow()
    );

    let mut config = AggregationConfig::default();
    if let Some(domain) = gateway {
        config.gateway_domain = domain;
    }

    let service = AggregationService::with_config(config);
    let posts = service
        .list_posts(chain_id)
        .await
        .context("Failed to list posts")?;

    if posts.is_empty() {
        println!("{}", "No posts published yet.".dimmed());
        return Ok(());
    }

    println!("\n{} {} post(s):\n", "✅ Found".green().bold(), posts.len());
    for post in posts {
        println!(
            "  {} {}",
            format!("#{}", post.token_id).yellow().bold(),
            post.name.bold()
        );
        println!("     {}", post.description.dimmed());
        println!("     {}", post.image);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn cmd_publish(
    title: String,
    description: String,
    image: PathBuf,
    owner: String,
    backend_name: &str,
    jwt: Option<String>,
    portal: Option<String>,
    funding_node: Option<String>,
) -> Result<()> {
    let scheme: StorageScheme = backend_name.parse()?;
    let image_bytes = std::fs::read(&image)
        .with_context(|| format!("Failed to read image file {}", image.display()))?;

    let draft = PostDraft::new(title, description, image_bytes, owner.clone());
    let signer = CliSigner {
        address: owner.clone(),
    };

    let backend: Box<dyn StorageBackend> = match scheme {
        StorageScheme::Ipfs => {
            let jwt = jwt.context("ipfs backend requires --jwt (or PINATA_JWT)")?;
            Box::new(IpfsBackend::with_config(IpfsBackendConfig::new(jwt)))
        }
        StorageScheme::Skynet => {
            let node =
                funding_node.context("skynet backend requires --funding-node")?;
            let provider = Arc::new(CreditProvider::new(
                CreditProviderConfig::new(node, "matic"),
                owner.clone(),
            ));
            let session = FundingManager::new().initialize(provider)?;

            let mut config = SkynetBackendConfig::default();
            if let Some(url) = portal {
                config = config.with_portal(url);
            }
            Box::new(SkynetBackend::new(config, session))
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Uploading post via {scheme}..."));
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let coordinator = PublishCoordinator::new();
    let outcome = coordinator
        .submit(&draft, Some(&signer), backend.as_ref())
        .await;

    spinner.finish_and_clear();

    let outcome = outcome.context("Publish failed")?;

    println!("{}", "✅ Post uploaded".green().bold());
    println!("   {} {}", "Scheme:".dimmed(), outcome.reference.scheme);
    println!("   {} {}", "Locator:".dimmed(), outcome.reference.locator);
    println!("   {} {}", "Token URI:".dimmed(), outcome.token_uri());
    println!(
        "\n{}",
        "Hand the token URI to the mint transaction to register it on chain.".dimmed()
    );

    Ok(())
}

async fn cmd_balance(owner: &str, funding_node: &str) -> Result<()> {
    let provider = Arc::new(CreditProvider::new(
        CreditProviderConfig::new(funding_node, "matic"),
        owner,
    ));
    let session = FundingManager::new().initialize(provider)?;
    let balance = session.balance().await.context("Balance query failed")?;

    println!(
        "{} {} ({} base units)",
        "💰 Balance:".cyan().bold(),
        format_units(balance).yellow(),
        balance
    );

    Ok(())
}

async fn cmd_fund(owner: &str, funding_node: &str, amount: Option<u128>) -> Result<()> {
    let provider = Arc::new(CreditProvider::new(
        CreditProviderConfig::new(funding_node, "matic"),
        owner,
    ));
    let session = FundingManager::new().initialize(provider)?;

    session.fund(amount).await.context("Funding failed")?;

    let balance = session.balance().await.context("Balance query failed")?;
    println!(
        "{} new balance {}",
        "✅ Funded;".green().bold(),
        format_units(balance).yellow()
    );

    Ok(())
}
