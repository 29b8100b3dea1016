//! Farber Core Library
//!
//! This crate provides the core of Farber Panel, a single-panel
//! business-management tool for a furniture retailer: quick budgets,
//! clients, orders, a product catalog, a history of created budgets and
//! orders, and the business settings.
//!
//! # Architecture
//!
//! - **Namespace**: a durable key-value store holding one JSON document per key
//! - **RecordStore**: one per domain, the in-memory collection mirrored to a key
//! - **Module**: renders its store into a [`Container`] and handles interactions
//! - **Router**: owns the modules, the current section and the container
//!
//! All work is synchronous and single-threaded. Every mutation is persisted
//! before the table is re-rendered.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let namespace: Rc<dyn KeyValueStore> = Rc::new(FileNamespace::new(&config.data_dir));
//!
//! let mut router = build_router(namespace, &config.default_section);
//! router.start()?;
//! router.navigate_to("budgets")?;
//!
//! let effect = router.dispatch(Interaction::Search("acme".into()), &mut toasts);
//! ```
//!
//! # Modules
//!
//! - `storage`: namespaces and record stores
//! - `models`: budgets, clients, orders, products, history entries, settings
//! - `modules`: one panel section per domain
//! - `router`: section registry and navigation
//! - `view`: the presentation-neutral container modules render into
//! - `notify`: toast notifications
//! - `config`: application configuration

pub mod config;
pub mod filter;
pub mod format;
pub mod models;
pub mod module;
pub mod modules;
pub mod notify;
pub mod panel;
pub mod router;
pub mod storage;
pub mod view;

pub use config::Config;
pub use format::{format_date, MoneyFormat};
pub use models::{
    Budget, BudgetDraft, BudgetStatus, Client, ClientFields, HistoryEntry, Order, OrderDraft,
    OrderStatus, Product, ProductFields, Settings,
};
pub use module::{Effect, HistorySink, Interaction, Module, ValidationError};
pub use notify::{Notifier, Toast, ToastKind, ToastPhase, Toasts};
pub use panel::build_router;
pub use router::{NavigationError, Router, SidebarEntry};
pub use storage::{FileNamespace, KeyValueStore, MemoryNamespace, StorageError};
pub use view::Container;
