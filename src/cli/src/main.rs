//! Command line client for the token ledger.

use anyhow::Result;
use cli::commands::{account, address, balance, create_account, init_mint, keygen, mint, supply, transfer};
use cli::{CliConfig, Context};
use colored::Colorize;
use ledger::{metrics, Pubkey};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the ledger client.
#[derive(Debug, StructOpt)]
#[structopt(name = "token-ledger", about = "Token ledger with atomic mint and transfer")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Path to the keypair file used for signing
    #[structopt(short, long, parse(from_os_str))]
    keypair: Option<PathBuf>,

    /// Directory holding the ledger database
    #[structopt(short, long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// Print operation metrics after the command
    #[structopt(long)]
    print_metrics: bool,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the ledger client.
#[derive(Debug, StructOpt)]
enum Command {
    /// Generate a new keypair file
    #[structopt(name = "keygen")]
    Keygen {
        /// Overwrite an existing keypair file
        #[structopt(long)]
        force: bool,
    },

    /// Show the signer identity and, optionally, its account address for a token
    #[structopt(name = "address")]
    Address {
        /// Token to derive the account address for
        #[structopt(long)]
        mint: Option<Pubkey>,
    },

    /// Register a new token with the signer as mint authority
    #[structopt(name = "init-mint")]
    InitMint {
        /// Keypair file of the token identity (random if omitted)
        #[structopt(long, parse(from_os_str))]
        mint_keypair: Option<PathBuf>,

        /// Display decimals
        #[structopt(long, default_value = "0")]
        decimals: u8,

        /// Freeze authority to record
        #[structopt(long)]
        freeze_authority: Option<Pubkey>,
    },

    /// Create the account of an owner for a token
    #[structopt(name = "create-account")]
    CreateAccount {
        /// Token identity
        #[structopt(long)]
        mint: Pubkey,

        /// Owner of the account (signer if omitted)
        #[structopt(long)]
        owner: Option<Pubkey>,
    },

    /// Mint new tokens (mint authority only)
    #[structopt(name = "mint")]
    Mint {
        /// Token identity
        #[structopt(long)]
        mint: Pubkey,

        /// Recipient owner (signer if omitted)
        #[structopt(long)]
        to: Option<Pubkey>,

        /// Amount to mint
        #[structopt(long)]
        amount: u128,
    },

    /// Transfer tokens from the signer to another owner
    #[structopt(name = "transfer")]
    Transfer {
        /// Token identity
        #[structopt(long)]
        mint: Pubkey,

        /// Recipient owner
        #[structopt(long)]
        to: Pubkey,

        /// Amount to transfer
        #[structopt(long)]
        amount: u128,
    },

    /// Get the balance of an owner
    #[structopt(name = "balance")]
    Balance {
        /// Token identity
        #[structopt(long)]
        mint: Pubkey,

        /// Owner to query (signer if omitted)
        #[structopt(long)]
        owner: Option<Pubkey>,
    },

    /// Show the parsed view of an account
    #[structopt(name = "account")]
    Account {
        /// Account address
        #[structopt(long)]
        address: Pubkey,
    },

    /// Compare a token's supply with the sum of its balances
    #[structopt(name = "supply")]
    Supply {
        /// Token identity
        #[structopt(long)]
        mint: Pubkey,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    config.apply_env();

    if let Some(path) = opt.keypair {
        config.keypair = path;
    }
    if let Some(dir) = opt.data_dir {
        config.data_dir = dir;
    }
    debug!("Using configuration {:?}", config);

    // Run the appropriate command
    match opt.cmd {
        Command::Keygen { force } => {
            let identity = keygen::run(&config.keypair, force)?;
            println!("{} {}", "Identity:".green(), identity);
            println!("{} {}", "Keypair written to".green(), config.keypair.display());
            println!("{}", "WARNING: Keep this file safe and private!".red());
        }
        Command::Address { mint } => {
            let (identity, account) = address::run(&config, mint.as_ref())?;
            println!("{} {}", "Identity:".green(), identity);
            if let Some(account) = account {
                println!("{} {}", "Account:".green(), account);
            }
        }
        Command::InitMint {
            mint_keypair,
            decimals,
            freeze_authority,
        } => {
            let ctx = Context::open(&config)?;
            let (token, record) =
                init_mint::run(&ctx, mint_keypair.as_deref(), decimals, freeze_authority)?;
            println!("{} {}", "Token initialized:".green(), token);
            println!("{} {}", "Mint:".green(), record);
        }
        Command::CreateAccount { mint, owner } => {
            let ctx = Context::open(&config)?;
            let (address, record) = create_account::run(&ctx, &mint, owner)?;
            println!("{} {}", "Account ready:".green(), address);
            println!("{} {}", "Record:".green(), record);
        }
        Command::Mint { mint: token, to, amount } => {
            let ctx = Context::open(&config)?;
            let receipt = mint::run(&ctx, &token, to, amount)?;
            println!("{} {}", "Tokens minted to:".green(), receipt.account);
            println!("{} {}", "Balance:".green(), receipt.balance);
            println!("{} {}", "Supply:".green(), receipt.supply);
        }
        Command::Transfer { mint, to, amount } => {
            let ctx = Context::open(&config)?;
            let receipt = transfer::run(&ctx, &mint, &to, amount)?;
            println!(
                "{} {} -> {}",
                "Transferred:".green(),
                receipt.source,
                receipt.destination
            );
            println!("{} {}", "Source balance:".green(), receipt.source_balance);
            println!("{} {}", "Destination balance:".green(), receipt.destination_balance);
        }
        Command::Balance { mint, owner } => {
            let ctx = Context::open(&config)?;
            let balance = balance::run(&ctx, &mint, owner)?;
            println!("{} {}", "Balance:".green(), balance);
        }
        Command::Account { address } => {
            let ctx = Context::open(&config)?;
            let parsed = account::run(&ctx, &address)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Supply { mint } => {
            let ctx = Context::open(&config)?;
            let audit = supply::run(&ctx, &mint)?;
            println!("{} {}", "Supply:".green(), audit.supply);
            println!("{} {}", "Balances:".green(), audit.balances);
            println!("{} {}", "Accounts:".green(), audit.accounts);
            if audit.is_balanced() {
                println!("{}", "Supply matches balances".green());
            } else {
                println!("{}", "Supply does NOT match balances".red());
            }
        }
    }

    if opt.print_metrics {
        print!("{}", metrics::gather_text()?);
    }

    Ok(())
}
