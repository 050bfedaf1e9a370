//! Plan export
//!
//! - JSON: the full plan snapshot plus derived amounts and analysis
//! - YAML: the same document with a comment header
//! - CSV: one row per category (category, percent, amount)

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_allocation_csv;
pub use json::{export_plan_json, PlanExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_plan_yaml;
