//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)
//!
//! `Output` is also the notifier handed to panel modules. Notices are held
//! until [`Output::finish`] so a failed write never prints as a success.

use anyhow::{bail, Result};
use serde::Serialize;

use farber_core::modules::dashboard::Summary;
use farber_core::{
    format_date, Budget, Client, HistoryEntry, MoneyFormat, Notifier, Order, Product, Settings,
    ToastKind,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
    notices: Vec<(String, ToastKind)>,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            notices: Vec::new(),
        }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Flush held notices
    ///
    /// Fails with the error messages if any module reported an error;
    /// otherwise prints the success and info messages.
    pub fn finish(&mut self) -> Result<()> {
        let notices = std::mem::take(&mut self.notices);
        let errors: Vec<&str> = notices
            .iter()
            .filter(|(_, kind)| *kind == ToastKind::Error)
            .map(|(message, _)| message.as_str())
            .collect();
        if !errors.is_empty() {
            bail!("{}", errors.join("; "));
        }

        for (message, kind) in &notices {
            match kind {
                ToastKind::Success => self.success(message),
                _ => self.message(message),
            }
        }
        Ok(())
    }

    pub fn print_budget(&self, budget: &Budget, money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", budget.id);
                println!("Number:  {}", budget.number);
                println!("Client:  {}", budget.client_name);
                println!("Date:    {}", format_date(Some(budget.date)));
                println!("Items:   {}", budget.items_count);
                println!("Total:   {}", money.format(budget.total));
                println!("Status:  {}", budget.status.label());
            }
            OutputFormat::Json => print_json(budget),
            OutputFormat::Quiet => println!("{}", budget.id),
        }
    }

    pub fn print_budgets(&self, budgets: &[&Budget], money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                if budgets.is_empty() {
                    println!("No budgets found.");
                    return;
                }
                for budget in budgets {
                    println!(
                        "{} | #{:<4} | {:<25} | {} | {:>14} | {}",
                        short_id(&budget.id),
                        budget.number,
                        truncate(&budget.client_name, 25),
                        format_date(Some(budget.date)),
                        money.format(budget.total),
                        budget.status.label()
                    );
                }
                println!("\n{} budget(s)", budgets.len());
            }
            OutputFormat::Json => print_json(budgets),
            OutputFormat::Quiet => {
                for budget in budgets {
                    println!("{}", budget.id);
                }
            }
        }
    }

    pub fn print_client(&self, client: &Client) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", client.id);
                println!("Name:     {}", client.name);
                if !client.phone.is_empty() {
                    println!("Phone:    {}", client.phone);
                }
                if !client.email.is_empty() {
                    println!("Email:    {}", client.email);
                }
                if !client.address.is_empty() {
                    println!("Address:  {}", client.address);
                }
                if !client.notes.is_empty() {
                    println!("Notes:    {}", truncate_line(&client.notes, 60));
                }
                println!("Created:  {}", format_date(Some(client.created)));
            }
            OutputFormat::Json => print_json(client),
            OutputFormat::Quiet => println!("{}", client.id),
        }
    }

    pub fn print_clients(&self, clients: &[&Client]) {
        match self.format {
            OutputFormat::Human => {
                if clients.is_empty() {
                    println!("No clients found.");
                    return;
                }
                for client in clients {
                    println!(
                        "{} | {:<25} | {:<15} | {}",
                        short_id(&client.id),
                        truncate(&client.name, 25),
                        truncate(&client.phone, 15),
                        truncate(&client.email, 30)
                    );
                }
                println!("\n{} client(s)", clients.len());
            }
            OutputFormat::Json => print_json(clients),
            OutputFormat::Quiet => {
                for client in clients {
                    println!("{}", client.id);
                }
            }
        }
    }

    pub fn print_order(&self, order: &Order, money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", order.id);
                println!("Number:    {}", order.number);
                println!("Client:    {}", order.client_name);
                println!("Created:   {}", format_date(Some(order.created)));
                println!("Expected:  {}", format_date(order.expected));
                println!("Items:     {}", order.items_count);
                println!("Total:     {}", money.format(order.total));
                println!("Status:    {}", order.status.label());
                if !order.notes.is_empty() {
                    println!("Notes:     {}", truncate_line(&order.notes, 60));
                }
            }
            OutputFormat::Json => print_json(order),
            OutputFormat::Quiet => println!("{}", order.id),
        }
    }

    pub fn print_orders(&self, orders: &[&Order], money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                if orders.is_empty() {
                    println!("No orders found.");
                    return;
                }
                for order in orders {
                    println!(
                        "{} | #{:<4} | {:<25} | {} | {} | {:>14} | {}",
                        short_id(&order.id),
                        order.number,
                        truncate(&order.client_name, 25),
                        format_date(Some(order.created)),
                        format_date(order.expected),
                        money.format(order.total),
                        order.status.label()
                    );
                }
                println!("\n{} order(s)", orders.len());
            }
            OutputFormat::Json => print_json(orders),
            OutputFormat::Quiet => {
                for order in orders {
                    println!("{}", order.id);
                }
            }
        }
    }

    pub fn print_product(&self, product: &Product, money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", product.id);
                println!("Name:      {}", product.name);
                println!("Price:     {}", money.format(product.price));
                println!("Category:  {}", product.category);
                if !product.description.is_empty() {
                    println!("About:     {}", truncate_line(&product.description, 60));
                }
            }
            OutputFormat::Json => print_json(product),
            OutputFormat::Quiet => println!("{}", product.id),
        }
    }

    pub fn print_products(&self, products: &[&Product], money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                if products.is_empty() {
                    println!("No products found.");
                    return;
                }
                for product in products {
                    println!(
                        "{} | {:<30} | {:<15} | {:>14}",
                        short_id(&product.id),
                        truncate(&product.name, 30),
                        truncate(&product.category, 15),
                        money.format(product.price)
                    );
                }
                println!("\n{} product(s)", products.len());
            }
            OutputFormat::Json => print_json(products),
            OutputFormat::Quiet => {
                for product in products {
                    println!("{}", product.id);
                }
            }
        }
    }

    pub fn print_history(&self, entries: &[&HistoryEntry], money: &MoneyFormat) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No history yet.");
                    return;
                }
                for entry in entries {
                    println!(
                        "#{:<4} | {:<25} | {} | {:>14} | {}",
                        entry.number,
                        truncate(&entry.client_name, 25),
                        format_date(Some(entry.date)),
                        money.format(entry.total),
                        entry.status.label()
                    );
                }
                println!("\n{} entr(ies)", entries.len());
            }
            OutputFormat::Json => print_json(entries),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    pub fn print_settings(&self, settings: &Settings) {
        match self.format {
            OutputFormat::Human => {
                println!("Business settings:");
                println!("  company_name:   {}", settings.company_name);
                println!("  branch_name:    {}", settings.branch_name);
                println!("  currency_symbol: {}", settings.currency_symbol);
                println!("  currency_code:  {}", settings.currency_code);
                println!("  default_vat:    {}", settings.default_vat);
                println!("  show_cents:     {}", settings.show_cents);
                println!("  auto_numbering: {}", settings.auto_numbering);
            }
            OutputFormat::Json => print_json(settings),
            OutputFormat::Quiet => println!("{}", settings.company_name),
        }
    }

    pub fn print_summary(&self, company: &str, summary: &Summary) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", company);
                println!();
                println!(
                    "  Budgets:   {} ({} open)",
                    summary.budgets, summary.open_budgets
                );
                println!(
                    "  Orders:    {} ({} in progress)",
                    summary.orders, summary.pending_orders
                );
                println!("  Clients:   {}", summary.clients);
                println!("  Products:  {}", summary.products);
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "company": company,
                        "budgets": summary.budgets,
                        "open_budgets": summary.open_budgets,
                        "orders": summary.orders,
                        "pending_orders": summary.pending_orders,
                        "clients": summary.clients,
                        "products": summary.products
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

impl Notifier for Output {
    fn notify(&mut self, message: &str, kind: ToastKind) {
        self.notices.push((message.to_string(), kind));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn short_id(id: &uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
