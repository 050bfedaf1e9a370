//! YAML export of a single plan

use std::io::Write;

use crate::error::{FinplanError, FinplanResult};
use crate::export::json::PlanExport;
use crate::models::ManagementPlan;

/// Write a plan as YAML with a comment header
pub fn export_plan_yaml<W: Write>(plan: &ManagementPlan, writer: &mut W) -> FinplanResult<()> {
    let export = PlanExport::new(plan);
    let err = |e: std::io::Error| FinplanError::Export(e.to_string());

    writeln!(writer, "# finplan plan export: {}", export.plan.name).map_err(err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(err)?;
    writeln!(writer).map_err(err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinplanError::Export(e.to_string()))?;

    Ok(())
}

/// Read a plan back from a YAML export
pub fn import_plan_yaml(yaml_str: &str) -> FinplanResult<PlanExport> {
    let export: PlanExport =
        serde_yaml::from_str(yaml_str).map_err(|e| FinplanError::Export(e.to_string()))?;

    export.validate().map_err(FinplanError::Validation)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Percent};

    #[test]
    fn test_yaml_export_reads_back() {
        let mut plan = ManagementPlan::new(
            "Vacaciones",
            Money::from_units(5000, 0),
            Money::from_units(1000, 0),
            6,
        );
        plan.set_allocation(
            [
                ("Viajes", Percent::from_hundredths(6000)),
                ("Otros", Percent::from_hundredths(4000)),
            ]
            .into_iter()
            .collect(),
        );

        let mut buffer = Vec::new();
        export_plan_yaml(&plan, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("# finplan plan export: Vacaciones"));

        let imported = import_plan_yaml(&text).unwrap();
        assert_eq!(imported.plan.id, plan.id);
        assert_eq!(imported.plan.category_allocation, plan.category_allocation);
        assert_eq!(
            imported.category_amounts.get("Otros"),
            Some(&Money::from_units(1600, 0))
        );
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(import_plan_yaml("plan: [not, a, plan]").is_err());
    }
}
