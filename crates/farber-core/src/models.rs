//! Data models for the panel
//!
//! One record kind per domain plus the settings singleton. Field names on
//! disk are camelCase (`clientName`, `dateISO`, ...) and statuses are
//! lowercase strings, so stored documents read the same as the panel's
//! form field names.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::Record;

/// Storage key of each domain collection
pub const BUDGETS_KEY: &str = "farber_budgets";
pub const CLIENTS_KEY: &str = "farber_clients";
pub const ORDERS_KEY: &str = "farber_orders";
pub const PRODUCTS_KEY: &str = "farber_products";
pub const HISTORY_KEY: &str = "farber_history";
pub const SETTINGS_KEY: &str = "farber_config";

/// Client name used when a budget is created without one
pub const NO_CLIENT: &str = "Sin cliente";
/// Client name used when an order is created without one
pub const NO_NAME: &str = "Sin nombre";
/// Category used when a product is created without one
pub const DEFAULT_CATEGORY: &str = "General";

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A status string that matches no known variant
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown status: '{0}'")]
pub struct UnknownStatus(pub String);

/// Lifecycle of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
    Ordered,
}

impl BudgetStatus {
    pub const ALL: [BudgetStatus; 5] = [
        BudgetStatus::Draft,
        BudgetStatus::Sent,
        BudgetStatus::Approved,
        BudgetStatus::Ordered,
        BudgetStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetStatus::Draft => "draft",
            BudgetStatus::Sent => "sent",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Rejected => "rejected",
            BudgetStatus::Ordered => "ordered",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::Draft => "Draft",
            BudgetStatus::Sent => "Sent",
            BudgetStatus::Approved => "Approved",
            BudgetStatus::Rejected => "Rejected",
            BudgetStatus::Ordered => "Converted to order",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BudgetStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Arrived,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Arrived,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Arrived => "arrived",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Arrived => "Arrived at workshop",
            OrderStatus::Delivered => "Delivered to client",
            OrderStatus::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A quick budget for a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    #[serde(default)]
    pub number: u64,
    pub client_name: String,
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default)]
    pub items_count: u32,
    #[serde(default)]
    pub total: f64,
    pub status: BudgetStatus,
}

impl Record for Budget {
    fn id(&self) -> Uuid {
        self.id
    }

    fn number(&self) -> Option<u64> {
        Some(self.number)
    }
}

/// Input for a new budget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetDraft {
    pub client_name: String,
    pub items_count: u32,
    pub total: f64,
}

impl Budget {
    /// Build a draft-status budget dated `date`
    pub fn from_draft(draft: BudgetDraft, number: u64, date: NaiveDate) -> Self {
        let client_name = draft.client_name.trim();
        Self {
            id: Uuid::new_v4(),
            number,
            client_name: if client_name.is_empty() {
                NO_CLIENT.to_string()
            } else {
                client_name.to_string()
            },
            date,
            items_count: draft.items_count,
            total: finite_or_zero(draft.total),
            status: BudgetStatus::Draft,
        }
    }
}

/// A customer of the shop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "createdISO")]
    pub created: NaiveDate,
}

impl Record for Client {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Editable client fields (create and update)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
}

impl Client {
    pub fn new(fields: ClientFields, created: NaiveDate) -> Self {
        let mut client = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            notes: String::new(),
            created,
        };
        client.apply(fields);
        client
    }

    /// Overwrite every editable field
    pub fn apply(&mut self, fields: ClientFields) {
        self.name = fields.name;
        self.phone = fields.phone;
        self.email = fields.email;
        self.address = fields.address;
        self.notes = fields.notes;
    }
}

/// A furniture order placed with the workshop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[serde(default)]
    pub number: u64,
    pub client_name: String,
    #[serde(rename = "createdISO")]
    pub created: NaiveDate,
    #[serde(rename = "expectedISO", default)]
    pub expected: Option<NaiveDate>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items_count: u32,
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: String,
}

impl Record for Order {
    fn id(&self) -> Uuid {
        self.id
    }

    fn number(&self) -> Option<u64> {
        Some(self.number)
    }
}

/// Input for a new order
///
/// `number`, `created` and `status` default to the next number, today and
/// pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub number: Option<u64>,
    pub client_name: String,
    pub created: Option<NaiveDate>,
    pub expected: Option<NaiveDate>,
    pub total: f64,
    pub items_count: u32,
    pub status: Option<OrderStatus>,
    pub notes: String,
}

impl Order {
    pub fn from_draft(draft: OrderDraft, next_number: u64, today: NaiveDate) -> Self {
        let client_name = draft.client_name.trim();
        Self {
            id: Uuid::new_v4(),
            number: draft.number.filter(|n| *n > 0).unwrap_or(next_number),
            client_name: if client_name.is_empty() {
                NO_NAME.to_string()
            } else {
                client_name.to_string()
            },
            created: draft.created.unwrap_or(today),
            expected: draft.expected,
            total: finite_or_zero(draft.total),
            items_count: draft.items_count,
            status: draft.status.unwrap_or(OrderStatus::Pending),
            notes: draft.notes,
        }
    }
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Record for Product {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Editable product fields (create and update)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
}

impl Product {
    pub fn new(fields: ProductFields) -> Self {
        let mut product = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            price: 0.0,
            category: String::new(),
            description: String::new(),
        };
        product.apply(fields);
        product
    }

    pub fn apply(&mut self, fields: ProductFields) {
        let category = fields.category.trim();
        self.name = fields.name;
        self.price = finite_or_zero(fields.price);
        self.category = if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.to_string()
        };
        self.description = fields.description;
    }
}

/// Append-only summary of a created budget or order
///
/// The id is the source record's id. Entries are never touched again, so a
/// later status change on the source is not reflected here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    #[serde(default)]
    pub number: u64,
    pub client_name: String,
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    #[serde(default)]
    pub total: f64,
    pub status: BudgetStatus,
}

impl Record for HistoryEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl From<&Budget> for HistoryEntry {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            number: budget.number,
            client_name: budget.client_name.clone(),
            date: budget.date,
            total: budget.total,
            status: BudgetStatus::Draft,
        }
    }
}

impl From<&Order> for HistoryEntry {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            number: order.number,
            client_name: order.client_name.clone(),
            date: order.created,
            total: order.total,
            status: BudgetStatus::Ordered,
        }
    }
}

/// Business settings edited from the panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "empresaNombre")]
    pub company_name: String,
    #[serde(rename = "sucursalNombre")]
    pub branch_name: String,
    #[serde(rename = "monedaSimbolo")]
    pub currency_symbol: String,
    #[serde(rename = "monedaCodigo")]
    pub currency_code: String,
    #[serde(rename = "ivaPorDefecto")]
    pub default_vat: f64,
    #[serde(rename = "mostrarCentavos")]
    pub show_cents: bool,
    #[serde(rename = "numeracionAutomatica")]
    pub auto_numbering: bool,
}

/// VAT percentage used when none (or garbage) is given
pub const DEFAULT_VAT: f64 = 21.0;

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_name: "Farber Muebles".to_string(),
            branch_name: "Casa Central".to_string(),
            currency_symbol: "$".to_string(),
            currency_code: "ARS".to_string(),
            default_vat: DEFAULT_VAT,
            show_cents: true,
            auto_numbering: true,
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_budget_defaults() {
        let budget = Budget::from_draft(BudgetDraft::default(), 1, date("2024-03-01"));
        assert_eq!(budget.client_name, NO_CLIENT);
        assert_eq!(budget.status, BudgetStatus::Draft);
        assert_eq!(budget.items_count, 0);
        assert_eq!(budget.total, 0.0);
    }

    #[test]
    fn test_budget_json_layout() {
        let budget = Budget::from_draft(
            BudgetDraft {
                client_name: "Acme".to_string(),
                items_count: 3,
                total: 1500.0,
            },
            1,
            date("2024-03-01"),
        );

        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(json["clientName"], "Acme");
        assert_eq!(json["dateISO"], "2024-03-01");
        assert_eq!(json["itemsCount"], 3);
        assert_eq!(json["status"], "draft");
    }

    #[test]
    fn test_order_explicit_number_wins() {
        let draft = OrderDraft {
            number: Some(42),
            ..Default::default()
        };
        let order = Order::from_draft(draft, 6, date("2024-03-01"));
        assert_eq!(order.number, 42);
        assert_eq!(order.client_name, NO_NAME);
        assert_eq!(order.status, OrderStatus::Pending);

        let order = Order::from_draft(OrderDraft::default(), 6, date("2024-03-01"));
        assert_eq!(order.number, 6);
        assert_eq!(order.created, date("2024-03-01"));
    }

    #[test]
    fn test_order_expected_is_optional_on_disk() {
        let raw = r#"{
            "id": "7d6f0f6e-8a53-4b53-9f0e-3c1d2f1b5a10",
            "number": 2,
            "clientName": "Ana",
            "createdISO": "2024-01-10",
            "status": "arrived"
        }"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert!(order.expected.is_none());
        assert_eq!(order.status, OrderStatus::Arrived);
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn test_history_from_sources() {
        let budget = Budget::from_draft(BudgetDraft::default(), 4, date("2024-03-01"));
        let entry = HistoryEntry::from(&budget);
        assert_eq!(entry.id, budget.id);
        assert_eq!(entry.status, BudgetStatus::Draft);

        let order = Order::from_draft(OrderDraft::default(), 9, date("2024-03-02"));
        let entry = HistoryEntry::from(&order);
        assert_eq!(entry.number, 9);
        assert_eq!(entry.date, date("2024-03-02"));
        assert_eq!(entry.status, BudgetStatus::Ordered);
    }

    #[test]
    fn test_product_default_category() {
        let product = Product::new(ProductFields {
            name: "Mesa".to_string(),
            price: f64::NAN,
            category: "  ".to_string(),
            description: String::new(),
        });
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("sent".parse::<BudgetStatus>(), Ok(BudgetStatus::Sent));
        assert_eq!("canceled".parse::<OrderStatus>(), Ok(OrderStatus::Canceled));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_settings_partial_document() {
        let settings: Settings = serde_json::from_str(r#"{"empresaNombre": "Otra"}"#).unwrap();
        assert_eq!(settings.company_name, "Otra");
        assert_eq!(settings.currency_code, "ARS");
        assert_eq!(settings.default_vat, DEFAULT_VAT);
        assert!(settings.show_cents);
    }
}
