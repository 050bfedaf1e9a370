//! CSV export of a plan's allocation

use std::io::Write;

use crate::error::{FinplanError, FinplanResult};
use crate::models::ManagementPlan;

/// Write one row per category: category, percent, amount
///
/// Amounts are the stored percentages applied to current available income.
pub fn export_allocation_csv<W: Write>(plan: &ManagementPlan, writer: W) -> FinplanResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    let err = |e: ::csv::Error| FinplanError::Export(e.to_string());

    csv_writer
        .write_record(["category", "percent", "amount"])
        .map_err(err)?;

    let available = plan.available_income();
    for (category, percent) in plan.category_allocation.iter() {
        let percent_text = format!("{:.2}", percent.as_f64());
        let amount_text = percent.apply(available).to_decimal_string();
        csv_writer
            .write_record([category, percent_text.as_str(), amount_text.as_str()])
            .map_err(err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| FinplanError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Percent};

    #[test]
    fn test_rows_follow_allocation_order() {
        let mut plan = ManagementPlan::new(
            "Monthly",
            Money::from_units(1000, 0),
            Money::zero(),
            1,
        );
        plan.set_allocation(
            [
                ("Rent, utilities", Percent::from_hundredths(6667)),
                ("Food", Percent::from_hundredths(3333)),
            ]
            .into_iter()
            .collect(),
        );

        let mut buffer = Vec::new();
        export_allocation_csv(&plan, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "category,percent,amount");
        assert_eq!(lines[1], "\"Rent, utilities\",66.67,666.70");
        assert_eq!(lines[2], "Food,33.33,333.30");
    }

    #[test]
    fn test_empty_allocation_has_header_only() {
        let plan = ManagementPlan::new("Empty", Money::from_units(100, 0), Money::zero(), 1);

        let mut buffer = Vec::new();
        export_allocation_csv(&plan, &mut buffer).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "category,percent,amount\n");
    }
}
