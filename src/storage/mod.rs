//! Storage layer for finplan
//!
//! JSON file storage with atomic writes, plus the audit log every mutation
//! is recorded in.

pub mod file_io;
pub mod plans;
pub mod traits;

pub use file_io::{read_json, write_json_atomic};
pub use plans::PlanRepository;
pub use traits::PlanStore;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinplanPaths;
use crate::error::FinplanResult;

/// Main storage coordinator
pub struct Storage {
    paths: FinplanPaths,
    pub plans: PlanRepository,
    audit: AuditLogger,
}

impl Storage {
    pub fn new(paths: FinplanPaths) -> FinplanResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            plans: PlanRepository::new(paths.plans_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &FinplanPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> FinplanResult<()> {
        self.plans.load()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinplanResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> FinplanResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> FinplanResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
