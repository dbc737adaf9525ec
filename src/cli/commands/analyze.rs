use anyhow::{Context, Result};
use common::{AnalysisReport, ScenarioSource};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, trace};

/// Reads a scenario from a JSON or YAML file and runs the analysis on it.
///
/// Files ending in `.yaml` or `.yml` are read as YAML, anything else as JSON.
pub fn analyze_file(path: &Path) -> Result<AnalysisReport> {
    trace!("Entering analyze_file function");
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let raw: Value = if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    };
    debug!("Parsed scenario file {}", path.display());

    let (scenario, metrics) = compute::analyze(&raw);
    info!(
        "Analyzed '{}': cash flow {}, cash on cash {}",
        scenario.scenario_name, metrics.cash_flow, metrics.cash_on_cash
    );

    Ok(AnalysisReport {
        property_id: None,
        source: ScenarioSource::Submitted,
        scenario: scenario.to_payload(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rentwise-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_analyze_yaml_file() {
        let path = write_temp(
            "scenario.yaml",
            "scenarioName: Duplex\nrentalIncome: 2000\nvacancy: 5\nrepairs: 10\ncapex: 10\n\
             propManagement: 8.6\ntaxes: 200\ninsurance: 100\nmortgage: 800\n\
             downPayment: 20000\nclosingCosts: 3000\n",
        );

        let report = analyze_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.source, ScenarioSource::Submitted);
        assert_eq!(report.scenario.scenario_name, "Duplex");
        assert_eq!(report.metrics.cash_flow, Decimal::from(228));
        assert_eq!(report.metrics.annual_cash_flow, Decimal::from(2736));
        assert_eq!(report.metrics.total_investment, Decimal::from(23000));
    }

    #[test]
    fn test_analyze_json_file_with_strings() {
        let path = write_temp(
            "scenario.json",
            r#"{"rentalIncome": "1500", "laundry": "abc", "miscIncomes": ["Vending"], "miscIncomeVals": ["50"]}"#,
        );

        let report = analyze_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.metrics.total_income, Decimal::from(1550));
        assert_eq!(report.scenario.misc_incomes, vec!["Vending".to_string()]);
    }

    #[test]
    fn test_missing_or_malformed_file_fails() {
        assert!(analyze_file(Path::new("/nonexistent/rentwise-scenario.json")).is_err());

        let path = write_temp("broken.json", "{ not json");
        let result = analyze_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
