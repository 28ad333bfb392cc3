//! planboard: stage-based project tracking dashboard
//!
//! The stage registry, progress calculator and transition rule in
//! [`domain`] are the single source of truth for stage names, colors,
//! order and percentages. The kanban, table, timeline, Gantt, KPI and
//! export read models in [`views`] and [`services::export`] derive
//! everything from them.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod ui;
pub mod views;

pub use app::App;
pub use config::PlanboardConfig;
pub use error::{AppError, Result};
