//! JSON export of a single plan with schema versioning

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinplanError, FinplanResult};
use crate::models::{CategoryAmounts, ManagementPlan, Money, PlanAnalysis};
use crate::services::analyze;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Exported plan document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Version of finplan that wrote the export
    pub app_version: String,

    pub plan: ManagementPlan,

    /// Income the percentages are relative to
    pub available_income: Money,

    /// Stored percentages applied to `available_income`
    pub category_amounts: CategoryAmounts,

    pub analysis: PlanAnalysis,
}

impl PlanExport {
    pub fn new(plan: &ManagementPlan) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            available_income: plan.available_income(),
            category_amounts: plan.category_amounts(),
            analysis: analyze(plan),
            plan: plan.clone(),
        }
    }

    /// Check an export document before trusting it
    pub fn validate(&self) -> Result<(), String> {
        let major = self.schema_version.split('.').next().unwrap_or("");
        let supported = EXPORT_SCHEMA_VERSION.split('.').next().unwrap_or("");
        if major != supported {
            return Err(format!(
                "Unsupported schema version {} (expected {}.x)",
                self.schema_version, supported
            ));
        }
        self.plan.validate().map_err(|e| e.to_string())
    }
}

/// Write a plan as JSON
pub fn export_plan_json<W: Write>(
    plan: &ManagementPlan,
    writer: &mut W,
    pretty: bool,
) -> FinplanResult<()> {
    let export = PlanExport::new(plan);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    result.map_err(|e| FinplanError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| FinplanError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Percent;

    fn sample_plan() -> ManagementPlan {
        let mut plan = ManagementPlan::new(
            "Monthly",
            Money::from_units(10000, 0),
            Money::from_units(2000, 0),
            12,
        );
        plan.set_allocation(
            [
                ("Housing", Percent::from_hundredths(7500)),
                ("Other", Percent::from_hundredths(2500)),
            ]
            .into_iter()
            .collect(),
        );
        plan
    }

    #[test]
    fn test_export_document() {
        let mut buffer = Vec::new();
        export_plan_json(&sample_plan(), &mut buffer, true).unwrap();

        let parsed: PlanExport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.available_income, Money::from_units(8000, 0));
        assert_eq!(
            parsed.category_amounts.get("Housing"),
            Some(&Money::from_units(6000, 0))
        );
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_allocation_keeps_category_order() {
        let mut buffer = Vec::new();
        export_plan_json(&sample_plan(), &mut buffer, false).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let housing = text.find("\"Housing\":75.0").unwrap();
        let other = text.find("\"Other\":25.0").unwrap();
        assert!(housing < other);
    }

    #[test]
    fn test_future_schema_rejected() {
        let mut export = PlanExport::new(&sample_plan());
        export.schema_version = "2.0.0".into();
        assert!(export.validate().is_err());
    }
}
