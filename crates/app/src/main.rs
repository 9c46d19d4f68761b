//! Flowline operations CLI.
//!
//! `assign-drivers` is the daily cron entry point; `price-cart` prices a
//! customer's active cart for inspection; `db migrate` applies the schema.

use std::process;

use clap::{Args, Parser, Subcommand};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rusty_money::{Money, iso};
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use flowline::money::Minor;
use flowline_app::{context::AppContext, database, domain::pricing::PricingRequest};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

#[derive(Debug, Parser)]
#[command(name = "flowline-app", about = "Flowline operations CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Assign the day's unassigned orders to drivers.
    AssignDrivers(AssignDriversArgs),

    /// Price a customer's active cart.
    PriceCart(PriceCartArgs),

    /// Database administration.
    Db(DbCommand),
}

#[derive(Debug, Args)]
struct AssignDriversArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Business time zone orders are scheduled in
    #[arg(long, env = "FLOWLINE_TIME_ZONE", default_value = "America/New_York")]
    time_zone: String,

    /// Date to dispatch; defaults to today in the business time zone
    #[arg(long)]
    date: Option<Date>,
}

#[derive(Debug, Args)]
struct PriceCartArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Customer whose active cart to price
    #[arg(long)]
    customer: Uuid,

    /// Charge each vendor's flat leakage fee
    #[arg(long)]
    check_leakage: bool,
}

#[derive(Debug, Args)]
struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending migrations.
    Migrate {
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[derive(Debug, Tabled)]
struct RunSummaryRow {
    date: String,
    considered: usize,
    assigned: usize,
    unassigned: usize,
    failed_writes: usize,
}

#[derive(Debug, Tabled)]
struct PricedLineRow {
    line: String,
    sub_total: String,
    delivery_fee: String,
    sales_tax: String,
    promo: String,
    grand_total: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::AssignDrivers(args) => assign_drivers(args).await,
        Commands::PriceCart(args) => price_cart(args).await,
        Commands::Db(DbCommand {
            command: DbSubcommand::Migrate { database_url },
        }) => migrate(&database_url).await,
    }
}

async fn assign_drivers(args: AssignDriversArgs) -> Result<(), String> {
    let tz = TimeZone::get(&args.time_zone)
        .map_err(|error| format!("unknown time zone {}: {error}", args.time_zone))?;

    let context = AppContext::from_database_url(&args.database_url, tz.clone())
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let date = args
        .date
        .unwrap_or_else(|| Timestamp::now().to_zoned(tz).date());

    let report = context.assignment.run(date).await;

    let summary = RunSummaryRow {
        date: report.date.to_string(),
        considered: report.considered,
        assigned: report.assigned,
        unassigned: report.unassigned,
        failed_writes: report.failed_writes,
    };

    println!("{}", Table::new([summary]));

    Ok(())
}

async fn price_cart(args: PriceCartArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, TimeZone::UTC)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    let priced = context
        .pricing
        .price_active_cart(
            args.customer,
            PricingRequest {
                check_leakage: args.check_leakage,
            },
        )
        .await
        .map_err(|error| format!("failed to price cart: {error}"))?;

    let rows: Vec<PricedLineRow> = priced
        .lines
        .iter()
        .map(|line| PricedLineRow {
            line: line.line.to_string(),
            sub_total: usd(line.sub_total),
            delivery_fee: usd(line.vendor_delivery_fee),
            sales_tax: usd(line.sales_tax),
            promo: usd(line.promo_discount),
            grand_total: usd(line.grand_total),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("grand total: {}", usd(priced.totals.grand_total));

    Ok(())
}

async fn migrate(database_url: &str) -> Result<(), String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}

fn usd(minor: Minor) -> String {
    Money::from_minor(minor, iso::USD).to_string()
}
