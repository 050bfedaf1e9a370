//! finplan - management-plan budgeting
//!
//! A plan splits available income (total income minus desired savings minus
//! extraordinary expenses) across spending categories by percentage. Users
//! edit amounts; the reconciler in [`reconcile`] turns them into a
//! percentage allocation that sums to exactly 100.00%.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: reconciler and crate-wide error types
//! - `models`: plans, money, percentages, category maps
//! - `reconcile`: amount-to-percentage reconciliation and live feedback
//! - `storage`: JSON plan store and the persistence trait
//! - `services`: plan workflows on top of storage
//! - `audit`: append-only audit log
//! - `export`: JSON, YAML and CSV export
//! - `display`, `cli`: terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use finplan::config::{paths::FinplanPaths, settings::Settings};
//! use finplan::services::PlanService;
//! use finplan::storage::Storage;
//!
//! let paths = FinplanPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let plans = PlanService::new(&storage, &settings).list()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reconcile;
pub mod services;
pub mod storage;

pub use error::{FinplanError, FinplanResult, ReconcileError};
