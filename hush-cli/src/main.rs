//! hush CLI
//!
//! Command-line interface for the hush single-key Taproot + silent-payment
//! wallet.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bitcoin::Network;

use hush_chain::{CoreRpcClient, EsploraClient, EsploraConfig, RpcConfig};
use hush_core::constants::{DEFAULT_HRP_MAINNET, DEFAULT_HRP_TESTNET, TAPROOT_ACTIVATION_HEIGHT};
use hush_core::error::HushError;
use hush_core::traits::{AddressIndex, ChainSource};
use hush_core::types::WalletRecord;
use hush_scanner::{ChainScanner, ProgressCallback, ScannerConfig};
use hush_stealth::AddressCodec;
use hush_wallet::{FileStore, KeyMaterial, PersistentSink, WalletLedger, WalletStore};

/// hush - single-key Bitcoin wallet with silent-payment receiving
#[derive(Parser)]
#[command(name = "hush")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wallet file path
    #[arg(short, long, global = true, default_value = "hush-wallet.json", env = "HUSH_WALLET")]
    wallet: PathBuf,

    /// Bitcoin network (bitcoin, testnet, signet, regtest)
    #[arg(short, long, global = true, default_value = "bitcoin", env = "HUSH_NETWORK")]
    network: Network,

    /// Silent-payment address prefix (defaults to sp on mainnet, tsp elsewhere)
    #[arg(long, global = true, env = "HUSH_HRP")]
    hrp: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new wallet (fresh key or seed-phrase restore)
    Create,

    /// Refresh plain UTXOs and scan new blocks for silent payments
    Scan {
        /// Bitcoin Core JSON-RPC URL
        #[arg(long, env = "HUSH_RPC_URL", default_value = "http://127.0.0.1:8332/")]
        rpc_url: String,
        /// RPC username
        #[arg(long, env = "HUSH_RPC_USER")]
        rpc_user: String,
        /// RPC password
        #[arg(long, env = "HUSH_RPC_PASS")]
        rpc_pass: String,
        /// Esplora API base URL for the plain-address refresh
        #[arg(long, env = "HUSH_ESPLORA_URL")]
        esplora_url: Option<String>,
        /// Stop at this height instead of the chain tip
        #[arg(long)]
        to: Option<u64>,
        /// Blocks per cursor checkpoint
        #[arg(long, default_value = "1")]
        checkpoint_interval: u64,
    },

    /// Show wallet balances
    Balance,

    /// List unspent outputs
    Unspent,

    /// Show the wallet's receiving addresses
    Addresses,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "hush=debug,info"
    } else {
        "hush=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = FileStore::new(&cli.wallet);
    let codec = codec_for(&cli)?;

    let result = match cli.command {
        Commands::Create => cmd_create(&store, cli.network, &codec).await,
        Commands::Scan {
            ref rpc_url,
            ref rpc_user,
            ref rpc_pass,
            ref esplora_url,
            to,
            checkpoint_interval,
        } => {
            cmd_scan(
                &store,
                cli.network,
                RpcConfig::new(rpc_url, rpc_user, rpc_pass),
                esplora_url.as_deref(),
                to,
                checkpoint_interval,
            )
            .await
        }
        Commands::Balance => cmd_balance(&store).await,
        Commands::Unspent => cmd_unspent(&store).await,
        Commands::Addresses => cmd_addresses(&store, cli.network, &codec).await,
    };

    if let Err(err) = result {
        if let Some(HushError::MalformedWallet(detail)) = err.downcast_ref::<HushError>() {
            eprintln!("{} {}", "✗ Wallet file is unusable:".red().bold(), detail);
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn codec_for(cli: &Cli) -> Result<AddressCodec> {
    let prefix = match &cli.hrp {
        Some(hrp) => hrp.as_str(),
        None if cli.network == Network::Bitcoin => DEFAULT_HRP_MAINNET,
        None => DEFAULT_HRP_TESTNET,
    };
    AddressCodec::from_prefix(prefix).context("invalid address prefix")
}

/// Create a new wallet
async fn cmd_create(store: &FileStore, network: Network, codec: &AddressCodec) -> Result<()> {
    if store.exists().await {
        bail!(
            "a wallet already exists at {} (move it aside to create a new one)",
            store.path().display()
        );
    }

    println!("{}", "🔑 Creating a hush wallet...".cyan().bold());

    let theme = ColorfulTheme::default();
    let source = Select::with_theme(&theme)
        .with_prompt("Key source")
        .items(&["Generate a fresh seed phrase", "Restore an existing one"])
        .default(0)
        .interact()?;

    let (mnemonic, fresh) = if source == 0 {
        (KeyMaterial::generate_mnemonic()?, true)
    } else {
        let phrase: String = Input::with_theme(&theme)
            .with_prompt("Seed phrase (12 words)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                KeyMaterial::from_mnemonic(input, network)
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;
        (phrase, false)
    };

    let birthday: u64 = Input::with_theme(&theme)
        .with_prompt("Wallet birthday height (no funds predate it)")
        .default(TAPROOT_ACTIVATION_HEIGHT)
        .validate_with(|height: &u64| -> std::result::Result<(), String> {
            if *height < TAPROOT_ACTIVATION_HEIGHT {
                Err(format!(
                    "Taproot activated at height {TAPROOT_ACTIVATION_HEIGHT}; nothing to find before it"
                ))
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let keys = KeyMaterial::from_mnemonic(&mnemonic, network)?;
    let record = WalletRecord::new(mnemonic.clone(), birthday);
    store.save(&record).await?;

    println!(
        "\n{} {}",
        "✅ Wallet saved to:".green(),
        store.path().display()
    );
    if fresh {
        println!("\n{}", "Seed phrase:".yellow().bold());
        println!("   {mnemonic}");
        println!(
            "\n{}",
            "⚠️  IMPORTANT: Write these 12 words down. They are the wallet."
                .red()
                .bold()
        );
    }

    println!("\n{}", "Receiving addresses:".yellow().bold());
    println!("   {} {}", "Taproot:".dimmed(), keys.p2tr_address(network)?);
    println!("   {} {}", "Silent: ".dimmed(), codec.encode(&keys.public_key())?);

    Ok(())
}

/// Refresh plain UTXOs and scan for silent payments
async fn cmd_scan(
    store: &FileStore,
    network: Network,
    rpc: RpcConfig,
    esplora_url: Option<&str>,
    to: Option<u64>,
    checkpoint_interval: u64,
) -> Result<()> {
    let record = store.load().await?;
    let keys = KeyMaterial::from_mnemonic(&record.mnemonic, network)?;
    let mut ledger = WalletLedger::new(record);

    let chain = CoreRpcClient::new(rpc);
    let tip = chain
        .tip_height()
        .await
        .context("failed to reach the Bitcoin Core node")?;
    let target = to.map(|t| t.min(tip)).unwrap_or(tip);

    // Plain-address refresh first; the address index is authoritative.
    if let Some(url) = esplora_url {
        let address = keys.p2tr_address(network)?.to_string();
        let index = EsploraClient::new(EsploraConfig::new(url));
        let utxos = index
            .utxos(&address)
            .await
            .context("failed to refresh plain UTXOs")?;
        println!(
            "{} {} plain UTXO(s) at {}",
            "🔄".cyan(),
            utxos.len(),
            address
        );
        ledger.refresh_plain_utxos(utxos);
        store.save(ledger.record()).await?;
    }

    // The cursor block itself has already been scanned, except right after
    // creation when it still sits on the birthday.
    let cursor = ledger.cursor();
    let from = if cursor == ledger.record().blockheight_birthday {
        cursor
    } else {
        cursor + 1
    };

    if from > target {
        println!(
            "{} cursor at {}, chain at {}",
            "✅ Already up to date:".green(),
            cursor,
            target
        );
        return Ok(());
    }

    let total = target - from + 1;
    println!(
        "{} blocks {}..={} ({} block(s))",
        "🔎 Scanning".cyan().bold(),
        from,
        target,
        total
    );

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    let pb_updater = pb.clone();
    let callback: ProgressCallback = Box::new(move |p| {
        pb_updater.set_position(p.blocks_scanned);
    });

    let scanner = ChainScanner::new(keys.secret_key())
        .with_config(ScannerConfig::new().checkpoint_interval(checkpoint_interval));

    let outcome = {
        let mut sink = PersistentSink::new(&mut ledger, store);
        scanner
            .scan(&chain, from, target, &mut sink, Some(&callback))
            .await
            .context("scan aborted; progress up to the last checkpoint is saved")?
    };
    pb.finish_and_clear();

    if outcome.matches.is_empty() {
        println!("{}", "No new silent payments found.".yellow());
    } else {
        println!(
            "{} {} silent payment(s) found:",
            "✅".green(),
            outcome.matches.len()
        );
        for utxo in &outcome.matches {
            println!("   {utxo}");
        }
    }
    println!(
        "   {} cursor {} · {} tx · {:.1} blocks/sec",
        "Done:".dimmed(),
        outcome.cursor,
        outcome.stats.transactions_seen,
        outcome.stats.rate()
    );
    if outcome.stats.anomalies_skipped > 0 {
        println!(
            "   {} {} candidate(s) skipped for degenerate keys",
            "⚠️".yellow(),
            outcome.stats.anomalies_skipped
        );
    }

    Ok(())
}

/// Show wallet balances
async fn cmd_balance(store: &FileStore) -> Result<()> {
    let ledger = WalletLedger::new(store.load().await?);
    let balances = ledger.balances();

    println!("{}", "💰 Balances".cyan().bold());
    println!("   {} {}", "Silent: ".dimmed(), balances.silent);
    println!("   {} {}", "Taproot:".dimmed(), balances.plain);
    println!("   {} {}", "Total:  ".yellow(), balances.total());
    Ok(())
}

/// List unspent outputs
async fn cmd_unspent(store: &FileStore) -> Result<()> {
    let ledger = WalletLedger::new(store.load().await?);

    if ledger.silent_utxos().is_empty() && ledger.p2tr_utxos().is_empty() {
        println!("{}", "No unspent outputs.".yellow());
        return Ok(());
    }

    if !ledger.silent_utxos().is_empty() {
        println!("{}", "Silent-payment UTXOs:".yellow().bold());
        for utxo in ledger.silent_utxos() {
            println!("   {utxo}");
        }
    }
    if !ledger.p2tr_utxos().is_empty() {
        println!("{}", "Plain Taproot UTXOs:".yellow().bold());
        for utxo in ledger.p2tr_utxos() {
            println!("   {utxo}");
        }
    }
    Ok(())
}

/// Show receiving addresses
async fn cmd_addresses(store: &FileStore, network: Network, codec: &AddressCodec) -> Result<()> {
    let record = store.load().await?;
    let keys = KeyMaterial::from_mnemonic(&record.mnemonic, network)?;

    println!("{}", "📫 Receiving addresses".cyan().bold());
    println!("   {} {}", "Taproot:".dimmed(), keys.p2tr_address(network)?);
    println!("   {} {}", "Silent: ".dimmed(), codec.encode(&keys.public_key())?);
    Ok(())
}
