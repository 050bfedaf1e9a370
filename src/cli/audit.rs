//! Audit log CLI command

use crate::error::FinplanResult;
use crate::services::PlanService;
use crate::storage::Storage;

/// Print recent audit entries, optionally for one plan
pub fn handle_audit_command(
    storage: &Storage,
    service: &PlanService<'_>,
    limit: usize,
    plan: Option<String>,
) -> FinplanResult<()> {
    let entries = match plan {
        Some(reference) => {
            // Deleted plans can't be resolved, so fall back to the raw reference
            let id = match service.resolve(&reference) {
                Ok(found) => found.id.to_string(),
                Err(e) if e.is_not_found() => reference,
                Err(e) => return Err(e),
            };
            let mut entries = storage.audit().read_for_entity(&id)?;
            let start = entries.len().saturating_sub(limit);
            entries.split_off(start)
        }
        None => storage.audit().read_recent(limit)?,
    };

    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
