//! Wire shapes of the return analysis.
//!
//! Line items travel as the parallel `miscIncomes`/`miscIncomeVals` and
//! `cashMisc`/`cashMiscVals` arrays that clients already understand; the
//! server keeps them as label/value pairs internally.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scenario as it is sent to and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPayload {
    pub scenario_name: String,

    pub rental_income: Decimal,
    pub laundry: Decimal,
    pub storage: Decimal,
    pub parking: Decimal,
    /// Labels of the miscellaneous income lines
    pub misc_incomes: Vec<String>,
    /// Monthly amounts of the miscellaneous income lines, same order as `miscIncomes`
    pub misc_income_vals: Vec<Decimal>,

    /// Percent of total income set aside for vacancy
    pub vacancy: Decimal,
    /// Percent of total income set aside for repairs
    pub repairs: Decimal,
    /// Percent of total income set aside for capital expenditures
    pub capex: Decimal,
    /// Percent of total income paid for property management
    pub prop_management: Decimal,

    pub taxes: Decimal,
    pub insurance: Decimal,
    pub water: Decimal,
    pub garbage: Decimal,
    pub electric: Decimal,
    pub gas: Decimal,
    pub hoa: Decimal,
    pub lawn: Decimal,
    pub mortgage: Decimal,

    pub down_payment: Decimal,
    pub closing_costs: Decimal,
    pub rehab: Decimal,
    /// Labels of the miscellaneous cash investments
    pub cash_misc: Vec<String>,
    /// Amounts of the miscellaneous cash investments, same order as `cashMisc`
    pub cash_misc_vals: Vec<Decimal>,
}

/// Derived figures of one return analysis. Monthly unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetrics {
    pub total_income: Decimal,
    pub vacancy_amt: Decimal,
    pub repairs_amt: Decimal,
    pub capex_amt: Decimal,
    pub prop_mgmt_amt: Decimal,
    pub total_expenses: Decimal,
    pub cash_flow: Decimal,
    /// `cashFlow * 12`
    pub annual_cash_flow: Decimal,
    pub total_investment: Decimal,
    /// Annual cash flow divided by total investment, as a ratio (0.119 = 11.9%)
    pub cash_on_cash: Decimal,
}

/// The stored analysis of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecordDto {
    pub id: i32,
    pub property_id: i32,
    #[serde(flatten)]
    pub scenario: ScenarioPayload,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Where the scenario of an [`AnalysisReport`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioSource {
    /// The property has a saved analysis
    Saved,
    /// Nothing saved yet; defaults seeded from the property's rent
    Defaults,
    /// Sent with the request and not stored
    Submitted,
}

/// A scenario together with the metrics computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub property_id: Option<i32>,
    pub source: ScenarioSource,
    pub scenario: ScenarioPayload,
    pub metrics: AnalysisMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn metrics_serialize_with_camel_case_keys() {
        let metrics = AnalysisMetrics {
            cash_flow: Decimal::from(228),
            annual_cash_flow: Decimal::from(2736),
            ..Default::default()
        };

        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["cashFlow"], "228");
        assert_eq!(json["annualCashFlow"], "2736");
        assert_eq!(json["cashOnCash"], "0");
        assert!(json.get("cash_flow").is_none());
    }

    #[test]
    fn record_flattens_scenario_fields() {
        let created = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let record = AnalysisRecordDto {
            id: 1,
            property_id: 7,
            scenario: ScenarioPayload {
                scenario_name: "Base".to_string(),
                rental_income: Decimal::from_str("1850.50").unwrap(),
                laundry: Decimal::ZERO,
                storage: Decimal::ZERO,
                parking: Decimal::ZERO,
                misc_incomes: vec!["Vending".to_string()],
                misc_income_vals: vec![Decimal::from(40)],
                vacancy: Decimal::from(5),
                repairs: Decimal::from(10),
                capex: Decimal::from(10),
                prop_management: Decimal::from_str("8.6").unwrap(),
                taxes: Decimal::ZERO,
                insurance: Decimal::ZERO,
                water: Decimal::ZERO,
                garbage: Decimal::ZERO,
                electric: Decimal::ZERO,
                gas: Decimal::ZERO,
                hoa: Decimal::ZERO,
                lawn: Decimal::ZERO,
                mortgage: Decimal::ZERO,
                down_payment: Decimal::ZERO,
                closing_costs: Decimal::ZERO,
                rehab: Decimal::ZERO,
                cash_misc: vec![],
                cash_misc_vals: vec![],
            },
            created_at: created,
            updated_at: created,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["propertyId"], 7);
        assert_eq!(json["scenarioName"], "Base");
        assert_eq!(json["rentalIncome"], "1850.50");
        assert_eq!(json["miscIncomes"][0], "Vending");
        assert_eq!(json["propManagement"], "8.6");

        let back: AnalysisRecordDto = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn scenario_source_is_lowercase() {
        assert_eq!(
            serde_json::to_value(ScenarioSource::Defaults).unwrap(),
            "defaults"
        );
    }
}
