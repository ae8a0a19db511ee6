//! Populate the ledger database with demo customers, accounts, logins and history.
//!
//! Reads DATABASE_URL (and the other LEDGER_* variables) from the environment or `.env`.

use bank_ledger::seed::{clear_data, populate, SeedOptions};
use bank_ledger::store::{ADMIN_PASSWORD, ADMIN_USERNAME};
use bank_ledger::{LedgerConfig, Store};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Fill the ledger with demo data
#[derive(Parser, Debug)]
#[command(name = "ledger-seed")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of customers to create
    #[arg(long, default_value_t = 50)]
    customers: usize,

    /// RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Keep existing data instead of clearing it first
    #[arg(long)]
    keep: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bank_ledger=info".parse()?))
        .init();

    let options = SeedOptions {
        customers: cli.customers,
        rng_seed: cli.seed,
        ..SeedOptions::default()
    };
    let config = LedgerConfig::from_env()?;
    let store = Store::open(&config).await?;

    if !cli.keep {
        clear_data(&store).await?;
    }
    let report = populate(&store, &options).await?;
    store.close().await;

    println!(
        "Seeded {} customers, {} accounts, {} transactions ({} overdrawing withdrawals skipped).",
        report.customers, report.accounts, report.transactions, report.skipped_withdrawals
    );
    println!();
    println!("Admin login: {} / {}", ADMIN_USERNAME, ADMIN_PASSWORD);
    println!("Sample customer logins:");
    for login in &report.sample_logins {
        println!(
            "  {:<24} {:<14} {} (customer {})",
            login.username, login.password, login.name, login.customer_id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags_and_defaults() {
        let cli = Cli::try_parse_from(["ledger-seed"]).unwrap();
        assert_eq!(cli.customers, 50);
        assert_eq!(cli.seed, None);
        assert!(!cli.keep);

        let cli = Cli::try_parse_from(["ledger-seed", "--customers", "7", "--seed", "42", "--keep"]).unwrap();
        assert_eq!(cli.customers, 7);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.keep);

        assert!(Cli::try_parse_from(["ledger-seed", "--customers", "many"]).is_err());
        let help = Cli::try_parse_from(["ledger-seed", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
