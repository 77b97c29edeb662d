use anyhow::Result;
use clap::{Parser, Subcommand};
use opensci_bot::menu::{Menu, MenuAction};
use opensci_bot::{AccountBatchJob, BotConfig, DailyScheduler, RunOptions};
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opensci-bot")]
#[command(about = "Faucet claim and project voting bot for Base Sepolia")]
struct Cli {
    /// TOML config file (defaults to configs/bot.toml when present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Private key file, one key per line
    #[arg(long, global = true)]
    keys: Option<String>,

    /// Proxy file, one proxy per line
    #[arg(long, global = true)]
    proxies: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Claim faucet tokens for every account
    Claim,
    /// Vote on the fixed projects for every account
    Vote,
    /// Claim, then vote, for every account
    ClaimAndVote,
    /// Log native and token balances for every account
    Balances,
    /// Run the selected operations now and then every interval
    Schedule {
        #[arg(long)]
        claim: bool,
        #[arg(long)]
        vote: bool,
        #[arg(long)]
        check_balances: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = BotConfig::load_or_default(cli.config.as_deref())?;
    if let Some(keys) = cli.keys {
        config.files.private_keys = keys;
    }
    if let Some(proxies) = cli.proxies {
        config.files.proxies = proxies;
    }

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_menu(config).await,
        Commands::Claim => run_once(config, RunOptions::claim_only()).await,
        Commands::Vote => run_once(config, RunOptions::vote_only()).await,
        Commands::ClaimAndVote => run_once(config, RunOptions::claim_and_vote()).await,
        Commands::Balances => run_once(config, RunOptions::balances_only()).await,
        Commands::Schedule {
            claim,
            vote,
            check_balances,
        } => {
            let options = RunOptions {
                claim,
                vote,
                check_balances,
            };
            if options.is_empty() {
                return Err(anyhow::anyhow!(
                    "Select at least one of --claim, --vote, --check-balances"
                ));
            }
            run_scheduled(config, options).await;
            Ok(())
        }
    }
}

async fn run_once(config: BotConfig, options: RunOptions) -> Result<()> {
    AccountBatchJob::new(config, options).execute().await?;
    Ok(())
}

async fn run_menu(config: BotConfig) -> Result<()> {
    let mut menu = Menu::new(BufReader::new(tokio::io::stdin()));

    loop {
        match menu.next_action().await? {
            MenuAction::RunOnce(options) => {
                // A failed batch is reported and the menu comes back
                if let Err(e) = AccountBatchJob::new(config.clone(), options).execute().await {
                    error!("❌ Batch run failed: {:#}", e);
                }
            }
            MenuAction::Schedule(options) => {
                run_scheduled(config, options).await;
                return Ok(());
            }
            MenuAction::Exit => {
                println!("Exiting application.");
                return Ok(());
            }
        }
    }
}

async fn run_scheduled(config: BotConfig, options: RunOptions) {
    info!("🗓️ Scheduled operations: {:?}", options);

    let scheduler = DailyScheduler::new(config.schedule_interval());
    let token = scheduler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Ctrl-C received, stopping scheduler");
            token.cancel();
        }
    });

    scheduler
        .run(|| {
            let job = AccountBatchJob::new(config.clone(), options);
            async move { job.execute().await }
        })
        .await;
}
