//! Collaborators around the stage core.
//!
//! This module contains:
//! - JsonStore: document storage with snapshot subscriptions
//! - Identity: current user and administrator check
//! - Notifier: creation and status-change notices
//! - export: spreadsheet, report and KPI exports

pub mod export;
mod identity;
mod notify;
mod store;

pub use export::{export_to, ExportFormat};
pub use identity::Identity;
pub use notify::{LogNotifier, Notification, NotificationKind, Notifier, OutboxNotifier};
pub use store::{Document, DocumentStore, JsonStore};
