//! Dimensional-modeling compliance rules
//!
//! One rule function per model role. Staging and other models have no rules.

use dimlint_core::schema::MEASURE_COLUMNS;
use dimlint_core::{Column, Compliance, ComplianceWarning, Model, ModelRole, WarningCode};

/// Role-dispatched rule set
pub struct ComplianceRules;

impl ComplianceRules {
    /// Evaluate the rules for a model's role against its extracted columns
    pub fn check(model: &Model) -> Compliance {
        let columns = model.columns_or_empty();

        let warnings = match model.role {
            ModelRole::Dimension => Self::dimension(columns),
            ModelRole::Fact => Self::fact(&model.name, columns),
            ModelRole::Staging | ModelRole::Other => Vec::new(),
        };

        Compliance::from_warnings(warnings)
    }

    /// Dimension tables need a surrogate key, a natural key and audit timestamps
    pub fn dimension(columns: &[Column]) -> Vec<ComplianceWarning> {
        let mut warnings = Vec::new();

        if !columns.iter().any(|c| c.name.ends_with("_key")) {
            warnings.push(ComplianceWarning::new(WarningCode::DimMissingSurrogateKey));
        }
        if !columns.iter().any(|c| c.name.ends_with("_id")) {
            warnings.push(ComplianceWarning::new(WarningCode::DimMissingNaturalKey));
        }
        if !columns.iter().any(|c| c.name == "created_at" || c.name == "updated_at") {
            warnings.push(ComplianceWarning::new(WarningCode::DimMissingAuditTimestamps));
        }

        warnings
    }

    /// Fact tables need measures and foreign keys to dimensions
    ///
    /// A foreign key is any `_key` column other than `<model_name>_key`. A fact
    /// table whose own surrogate key is named differently will have that key
    /// counted as a foreign key.
    pub fn fact(model_name: &str, columns: &[Column]) -> Vec<ComplianceWarning> {
        let mut warnings = Vec::new();
        let own_key = format!("{}_key", model_name);

        if !columns.iter().any(|c| MEASURE_COLUMNS.contains(&c.name.as_str())) {
            warnings.push(ComplianceWarning::new(WarningCode::FactNoMeasures));
        }
        if !columns.iter().any(|c| c.name.ends_with("_key") && c.name != own_key) {
            warnings.push(ComplianceWarning::new(WarningCode::FactNoForeignKeys));
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimlint_core::Verdict;

    fn model(name: &str, columns: &[&str]) -> Model {
        let mut model = Model::new(name, format!("models/{}.sql", name), None);
        model.columns = Some(columns.iter().map(|c| Column::new(*c)).collect());
        model
    }

    fn codes(compliance: &Compliance) -> Vec<WarningCode> {
        compliance.warnings.iter().map(|w| w.code).collect()
    }

    #[test]
    fn complete_dimension_is_compliant() {
        let compliance = ComplianceRules::check(&model("dim_customers", &["customer_key", "customer_id", "created_at"]));
        assert_eq!(compliance.status, Verdict::Compliant);
        assert!(compliance.warnings.is_empty());
    }

    #[test]
    fn dimension_with_only_natural_key() {
        let compliance = ComplianceRules::check(&model("dim_customers", &["customer_id"]));
        assert_eq!(compliance.status, Verdict::Warnings);
        assert_eq!(
            codes(&compliance),
            vec![WarningCode::DimMissingSurrogateKey, WarningCode::DimMissingAuditTimestamps]
        );
    }

    #[test]
    fn dimension_without_natural_key() {
        let compliance = ComplianceRules::check(&model("dim_dates", &["date_key", "updated_at"]));
        assert_eq!(codes(&compliance), vec![WarningCode::DimMissingNaturalKey]);
        assert_eq!(compliance.warnings[0].message, "Consider adding natural key");
    }

    #[test]
    fn fact_with_foreign_key_and_measure() {
        let compliance = ComplianceRules::check(&model("fct_sales", &["fct_sales_key", "customer_key", "amount"]));
        assert!(!compliance.has_warning(WarningCode::FactNoForeignKeys));
        assert!(!compliance.has_warning(WarningCode::FactNoMeasures));
        assert!(compliance.is_compliant());
    }

    #[test]
    fn fact_without_key_columns() {
        let compliance = ComplianceRules::check(&model("fct_orders", &["order_id", "quantity"]));
        assert_eq!(codes(&compliance), vec![WarningCode::FactNoForeignKeys]);
    }

    #[test]
    fn fact_own_key_is_not_foreign() {
        let compliance = ComplianceRules::check(&model("fct_sales", &["fct_sales_key", "price"]));
        assert_eq!(codes(&compliance), vec![WarningCode::FactNoForeignKeys]);
    }

    #[test]
    fn fact_differently_named_own_key_counts_as_foreign() {
        let compliance = ComplianceRules::check(&model("fct_sales", &["sales_key", "amount"]));
        assert!(compliance.is_compliant());
    }

    #[test]
    fn fact_without_measures() {
        let compliance = ComplianceRules::check(&model("fct_sales", &["customer_key", "total_amount"]));
        assert_eq!(codes(&compliance), vec![WarningCode::FactNoMeasures]);
    }

    #[test]
    fn staging_and_other_are_always_compliant() {
        assert!(ComplianceRules::check(&model("stg_sales", &[])).is_compliant());
        assert!(ComplianceRules::check(&model("orders_snapshot", &["x"])).is_compliant());
    }

    #[test]
    fn unextracted_model_is_checked_as_empty() {
        let unextracted = Model::new("fct_sales", "models/fct_sales.sql", None);
        assert_eq!(
            codes(&ComplianceRules::check(&unextracted)),
            vec![WarningCode::FactNoMeasures, WarningCode::FactNoForeignKeys]
        );
    }
}
