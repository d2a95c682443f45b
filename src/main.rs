use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use sarraf::cli::exchange::ExchangeRequest;
use sarraf::core::exchange::ExchangeType;
use sarraf::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExchangeTypeArg {
    UsdToIqd,
    IqdToUsd,
}

impl From<ExchangeTypeArg> for ExchangeType {
    fn from(arg: ExchangeTypeArg) -> ExchangeType {
        match arg {
            ExchangeTypeArg::UsdToIqd => ExchangeType::UsdToIqd,
            ExchangeTypeArg::IqdToUsd => ExchangeType::IqdToUsd,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display partner balances summed by safe type
    Balances {
        /// Also list every partner safe
        #[arg(long)]
        partners: bool,
    },
    /// Convert between USD and IQD amounts at a rate
    Exchange {
        /// IQD per 1 USD; defaults to the configured rate
        #[arg(long)]
        rate: Option<String>,
        /// USD amount as typed
        #[arg(long, conflicts_with = "iqd", required_unless_present = "iqd")]
        usd: Option<String>,
        /// IQD amount as typed
        #[arg(long)]
        iqd: Option<String>,
        /// Exchange direction label
        #[arg(long = "type", value_enum)]
        exchange_type: Option<ExchangeTypeArg>,
        /// Do not derive the other amount
        #[arg(long)]
        no_auto: bool,
    },
    /// Display commission totals and balances
    Dashboard {
        /// Reference day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl From<Commands> for sarraf::AppCommand {
    fn from(cmd: Commands) -> sarraf::AppCommand {
        match cmd {
            Commands::Balances { partners } => sarraf::AppCommand::Balances {
                show_partners: partners,
            },
            Commands::Exchange {
                rate,
                usd,
                iqd,
                exchange_type,
                no_auto,
            } => sarraf::AppCommand::Exchange(ExchangeRequest {
                exchange_type: exchange_type.map(ExchangeType::from),
                rate,
                usd_amount: usd,
                iqd_amount: iqd,
                disable_auto_calculate: no_auto,
            }),
            Commands::Dashboard { date } => sarraf::AppCommand::Dashboard { date },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => sarraf::cli::setup::setup(),
        Some(cmd) => sarraf::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
