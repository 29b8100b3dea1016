//! Farber CLI
//!
//! Command-line interface for Farber Panel - budgets, clients, orders,
//! products and history for a furniture shop. With no command it opens the
//! terminal panel.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use farber_core::{
    BudgetDraft, BudgetStatus, ClientFields, Config, FileNamespace, KeyValueStore, OrderDraft,
    OrderStatus, ProductFields,
};

mod commands;
mod output;
mod prompt;
mod tui;

use commands::client::ClientChanges;
use commands::product::ProductChanges;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "farber")]
#[command(about = "Farber Panel - budgets, orders and clients for a furniture shop")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Manage quick budgets
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Manage workshop orders
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Manage the product catalog
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Created budgets and orders
    History {
        #[command(subcommand)]
        command: Option<HistoryCommands>,
    },
    /// Show or change business settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show record counts
    Status,
}

#[derive(Subcommand)]
enum BudgetCommands {
    /// Create a budget (numbered automatically, starts as draft)
    #[command(alias = "create")]
    Add {
        /// Client name
        #[arg(short, long)]
        client: String,
        /// Number of items
        #[arg(short, long, default_value_t = 0)]
        items: u32,
        /// Total amount
        #[arg(short, long, default_value_t = 0.0)]
        total: f64,
    },
    /// List budgets
    #[command(alias = "ls")]
    List {
        /// Filter by client name
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (draft, sent, approved, rejected, ordered)
        #[arg(long)]
        status: Option<BudgetStatus>,
    },
    /// Change a budget's status
    Status {
        /// Budget ID (full UUID or prefix)
        id: String,
        /// New status (draft, sent, approved, rejected, ordered)
        status: BudgetStatus,
    },
    /// Delete a budget
    #[command(alias = "rm")]
    Delete {
        /// Budget ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// Add a client
    #[command(alias = "create")]
    Add {
        /// Client name
        name: String,
        #[arg(short, long, default_value = "")]
        phone: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        address: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// Update a client; omitted fields keep their value
    #[command(alias = "edit")]
    Update {
        /// Client ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        address: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List clients
    #[command(alias = "ls")]
    List {
        /// Filter by name, phone or email
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Delete a client
    #[command(alias = "rm")]
    Delete {
        /// Client ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderCommands {
    /// Create an order
    #[command(alias = "create")]
    Add {
        /// Client name
        #[arg(short, long)]
        client: String,
        /// Order number (defaults to the next one)
        #[arg(long)]
        number: Option<u64>,
        /// Creation date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        created: Option<NaiveDate>,
        /// Expected delivery date, YYYY-MM-DD
        #[arg(long)]
        expected: Option<NaiveDate>,
        /// Number of items
        #[arg(short, long, default_value_t = 0)]
        items: u32,
        /// Total amount
        #[arg(short, long, default_value_t = 0.0)]
        total: f64,
        /// Initial status (pending, arrived, delivered, canceled)
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    /// List orders
    #[command(alias = "ls")]
    List {
        /// Filter by client name
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (pending, arrived, delivered, canceled)
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status
    Status {
        /// Order ID (full UUID or prefix)
        id: String,
        /// New status (pending, arrived, delivered, canceled)
        status: OrderStatus,
    },
    /// Delete an order
    #[command(alias = "rm")]
    Delete {
        /// Order ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Add a product
    #[command(alias = "create")]
    Add {
        /// Product name
        name: String,
        #[arg(short, long, default_value_t = 0.0)]
        price: f64,
        /// Category (defaults to General)
        #[arg(short, long, default_value = "")]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Update a product; omitted fields keep their value
    #[command(alias = "edit")]
    Update {
        /// Product ID (full UUID or prefix)
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<f64>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List products
    #[command(alias = "ls")]
    List {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete a product
    #[command(alias = "rm")]
    Delete {
        /// Product ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List history entries
    #[command(alias = "ls")]
    List {
        /// Only this client (exact name)
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by status (draft, ordered, ...)
        #[arg(long)]
        status: Option<BudgetStatus>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show business settings
    Show,
    /// Set a business setting
    Set {
        /// Setting key (company_name, branch_name, currency_symbol,
        /// currency_code, default_vat, show_cents, auto_numbering)
        key: String,
        /// Setting value
        value: String,
    },
    /// Restore the default settings
    Reset,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, default_section, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let config = Config::load_with_cli_override(config_path)
                .context("Failed to load configuration")?;
            tui::run(config).await
        }
        Commands::Config { command } => handle_config_command(command, config_path, &output),
        Commands::Budget { command } => {
            let namespace = open_namespace(config_path)?;
            handle_budget_command(command, namespace, &mut output)
        }
        Commands::Client { command } => {
            let namespace = open_namespace(config_path)?;
            handle_client_command(command, namespace, &mut output)
        }
        Commands::Order { command } => {
            let namespace = open_namespace(config_path)?;
            handle_order_command(command, namespace, &mut output)
        }
        Commands::Product { command } => {
            let namespace = open_namespace(config_path)?;
            handle_product_command(command, namespace, &mut output)
        }
        Commands::History { command } => {
            let namespace = open_namespace(config_path)?;
            match command {
                Some(HistoryCommands::List { client, status }) => {
                    commands::history::list(namespace, client, status, &output)
                }
                None => commands::history::list(namespace, None, None, &output),
            }
        }
        Commands::Settings { command } => {
            let namespace = open_namespace(config_path)?;
            handle_settings_command(command, namespace, &mut output)
        }
        Commands::Status => {
            let namespace = open_namespace(config_path)?;
            commands::status::show(namespace, &output)
        }
    }
}

/// Load the config and open the data directory as a namespace
fn open_namespace(config_path: Option<&PathBuf>) -> Result<Rc<dyn KeyValueStore>> {
    init_cli_logging();
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    tracing::debug!(data_dir = ?config.data_dir, "Opening namespace");
    Ok(Rc::new(FileNamespace::new(&config.data_dir)))
}

/// Log to stderr, only if FARBER_LOG is set
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("FARBER_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "farber_core={},farber_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_budget_command(
    command: BudgetCommands,
    namespace: Rc<dyn KeyValueStore>,
    output: &mut Output,
) -> Result<()> {
    match command {
        BudgetCommands::Add {
            client,
            items,
            total,
        } => {
            let draft = BudgetDraft {
                client_name: client,
                items_count: items,
                total,
            };
            commands::budget::add(namespace, draft, output)
        }
        BudgetCommands::List { search, status } => {
            commands::budget::list(namespace, search, status, output)
        }
        BudgetCommands::Status { id, status } => {
            commands::budget::set_status(namespace, id, status, output)
        }
        BudgetCommands::Delete { id } => commands::budget::delete(namespace, id, output),
    }
}

fn handle_client_command(
    command: ClientCommands,
    namespace: Rc<dyn KeyValueStore>,
    output: &mut Output,
) -> Result<()> {
    match command {
        ClientCommands::Add {
            name,
            phone,
            email,
            address,
            notes,
        } => {
            let fields = ClientFields {
                name,
                phone,
                email,
                address,
                notes,
            };
            commands::client::add(namespace, fields, output)
        }
        ClientCommands::Update {
            id,
            name,
            phone,
            email,
            address,
            notes,
        } => {
            let changes = ClientChanges {
                name,
                phone,
                email,
                address,
                notes,
            };
            commands::client::update(namespace, id, changes, output)
        }
        ClientCommands::List { search } => commands::client::list(namespace, search, output),
        ClientCommands::Delete { id } => commands::client::delete(namespace, id, output),
    }
}

fn handle_order_command(
    command: OrderCommands,
    namespace: Rc<dyn KeyValueStore>,
    output: &mut Output,
) -> Result<()> {
    match command {
        OrderCommands::Add {
            client,
            number,
            created,
            expected,
            items,
            total,
            status,
            notes,
        } => {
            let draft = OrderDraft {
                number,
                client_name: client,
                created,
                expected,
                total,
                items_count: items,
                status,
                notes,
            };
            commands::order::add(namespace, draft, output)
        }
        OrderCommands::List { search, status } => {
            commands::order::list(namespace, search, status, output)
        }
        OrderCommands::Status { id, status } => {
            commands::order::set_status(namespace, id, status, output)
        }
        OrderCommands::Delete { id } => commands::order::delete(namespace, id, output),
    }
}

fn handle_product_command(
    command: ProductCommands,
    namespace: Rc<dyn KeyValueStore>,
    output: &mut Output,
) -> Result<()> {
    match command {
        ProductCommands::Add {
            name,
            price,
            category,
            description,
        } => {
            let fields = ProductFields {
                name,
                price,
                category,
                description,
            };
            commands::product::add(namespace, fields, output)
        }
        ProductCommands::Update {
            id,
            name,
            price,
            category,
            description,
        } => {
            let changes = ProductChanges {
                name,
                price,
                category,
                description,
            };
            commands::product::update(namespace, id, changes, output)
        }
        ProductCommands::List { search, category } => {
            commands::product::list(namespace, search, category, output)
        }
        ProductCommands::Delete { id } => commands::product::delete(namespace, id, output),
    }
}

fn handle_settings_command(
    command: Option<SettingsCommands>,
    namespace: Rc<dyn KeyValueStore>,
    output: &mut Output,
) -> Result<()> {
    match command {
        Some(SettingsCommands::Show) | None => commands::settings::show(namespace, output),
        Some(SettingsCommands::Set { key, value }) => {
            commands::settings::set(namespace, key, value, output)
        }
        Some(SettingsCommands::Reset) => commands::settings::reset(namespace, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
