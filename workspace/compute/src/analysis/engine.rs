use common::AnalysisMetrics;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

use super::normalize::normalize;
use super::scenario::{LineItem, Scenario};

/// Computes the cash flow and cash-on-cash return of a scenario.
///
/// All reserve rates are percentages of the total monthly income, including
/// the miscellaneous income lines. The computation is total: sums saturate at
/// the bounds of [`Decimal`] and a zero total investment yields a zero
/// cash-on-cash return.
pub fn compute_metrics(scenario: &Scenario) -> AnalysisMetrics {
    let total_income = sum([
        scenario.rental_income,
        scenario.laundry,
        scenario.storage,
        scenario.parking,
        sum_items(&scenario.misc_incomes),
    ]);

    let vacancy_amt = percent_of(total_income, scenario.vacancy);
    let repairs_amt = percent_of(total_income, scenario.repairs);
    let capex_amt = percent_of(total_income, scenario.capex);
    let prop_mgmt_amt = percent_of(total_income, scenario.prop_management);

    let total_expenses = sum([
        scenario.taxes,
        scenario.insurance,
        scenario.water,
        scenario.garbage,
        scenario.electric,
        scenario.gas,
        scenario.hoa,
        scenario.lawn,
        vacancy_amt,
        repairs_amt,
        capex_amt,
        prop_mgmt_amt,
        scenario.mortgage,
    ]);

    let cash_flow = total_income.saturating_sub(total_expenses);
    let annual_cash_flow = cash_flow.saturating_mul(Decimal::from(12));

    let total_investment = sum([
        scenario.down_payment,
        scenario.closing_costs,
        scenario.rehab,
        sum_items(&scenario.cash_misc),
    ]);

    let cash_on_cash = if total_investment.is_zero() {
        Decimal::ZERO
    } else {
        annual_cash_flow
            .checked_div(total_investment)
            .unwrap_or_else(|| saturate(annual_cash_flow, total_investment))
    };

    AnalysisMetrics {
        total_income,
        vacancy_amt,
        repairs_amt,
        capex_amt,
        prop_mgmt_amt,
        total_expenses,
        cash_flow,
        annual_cash_flow,
        total_investment,
        cash_on_cash,
    }
}

/// Normalizes a raw JSON body and computes its metrics.
#[instrument(skip(raw))]
pub fn analyze(raw: &Value) -> (Scenario, AnalysisMetrics) {
    let scenario = normalize(raw);
    let metrics = compute_metrics(&scenario);
    debug!(
        scenario_name = %scenario.scenario_name,
        cash_flow = %metrics.cash_flow,
        cash_on_cash = %metrics.cash_on_cash,
        "Computed analysis metrics"
    );
    (scenario, metrics)
}

fn sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}

fn sum_items(items: &[LineItem]) -> Decimal {
    sum(items.iter().map(|item| item.value))
}

/// `base * rate / 100`, saturating instead of overflowing.
fn percent_of(base: Decimal, rate: Decimal) -> Decimal {
    match base.checked_mul(rate) {
        Some(product) => product
            .checked_div(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO),
        // The product overflows; scale first so the result may still fit.
        None => base
            .checked_div(Decimal::ONE_HUNDRED)
            .map(|scaled| scaled.saturating_mul(rate))
            .unwrap_or(Decimal::ZERO),
    }
}

/// Bound of the range in the direction of `numerator / denominator`.
fn saturate(numerator: Decimal, denominator: Decimal) -> Decimal {
    if numerator.is_sign_negative() == denominator.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn concrete_scenario() -> Scenario {
        Scenario {
            rental_income: dec("2000"),
            vacancy: dec("5"),
            repairs: dec("10"),
            capex: dec("10"),
            prop_management: dec("8.6"),
            taxes: dec("200"),
            insurance: dec("100"),
            mortgage: dec("800"),
            down_payment: dec("20000"),
            closing_costs: dec("3000"),
            ..Default::default()
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let metrics = compute_metrics(&concrete_scenario());

        assert_eq!(metrics.total_income, dec("2000"));
        assert_eq!(metrics.vacancy_amt, dec("100"));
        assert_eq!(metrics.repairs_amt, dec("200"));
        assert_eq!(metrics.capex_amt, dec("200"));
        assert_eq!(metrics.prop_mgmt_amt, dec("172"));
        assert_eq!(metrics.total_expenses, dec("1772"));
        assert_eq!(metrics.cash_flow, dec("228"));
        assert_eq!(metrics.annual_cash_flow, dec("2736"));
        assert_eq!(metrics.total_investment, dec("23000"));
        assert_eq!(metrics.cash_on_cash, dec("2736") / dec("23000"));
        assert_eq!(metrics.cash_on_cash.round_dp(4), dec("0.1190"));
    }

    #[test]
    fn test_all_zero_scenario() {
        assert_eq!(compute_metrics(&Scenario::default()), AnalysisMetrics::default());
    }

    #[test]
    fn test_misc_items_count_as_income_and_investment() {
        let scenario = Scenario {
            rental_income: dec("1000"),
            vacancy: dec("10"),
            misc_incomes: vec![
                LineItem::new("Vending", dec("60")),
                LineItem::new("Signage", dec("40")),
            ],
            down_payment: dec("1000"),
            cash_misc: vec![LineItem::new("Inspection", dec("200"))],
            ..Default::default()
        };

        let metrics = compute_metrics(&scenario);
        assert_eq!(metrics.total_income, dec("1100"));
        // Vacancy applies to the misc income too.
        assert_eq!(metrics.vacancy_amt, dec("110"));
        assert_eq!(metrics.total_investment, dec("1200"));
    }

    #[test]
    fn test_rates_are_not_clamped() {
        let scenario = Scenario {
            rental_income: dec("1000"),
            vacancy: dec("150"),
            repairs: dec("-10"),
            ..Default::default()
        };

        let metrics = compute_metrics(&scenario);
        assert_eq!(metrics.vacancy_amt, dec("1500"));
        assert_eq!(metrics.repairs_amt, dec("-100"));
        assert_eq!(metrics.cash_flow, dec("-400"));
    }

    #[test]
    fn test_negative_cash_flow() {
        let scenario = Scenario {
            rental_income: dec("1000"),
            mortgage: dec("1500"),
            down_payment: dec("10000"),
            ..Default::default()
        };

        let metrics = compute_metrics(&scenario);
        assert_eq!(metrics.cash_flow, dec("-500"));
        assert_eq!(metrics.annual_cash_flow, dec("-6000"));
        assert_eq!(metrics.cash_on_cash, dec("-0.6"));
    }

    #[test]
    fn test_zero_investment_guard() {
        let scenario = Scenario {
            rental_income: dec("2000"),
            down_payment: dec("500"),
            rehab: dec("-500"),
            ..Default::default()
        };

        let metrics = compute_metrics(&scenario);
        assert_eq!(metrics.total_investment, Decimal::ZERO);
        assert_eq!(metrics.cash_on_cash, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let scenario = Scenario {
            rental_income: Decimal::MAX,
            laundry: Decimal::MAX,
            vacancy: Decimal::MAX,
            mortgage: Decimal::MIN,
            down_payment: Decimal::new(1, 28),
            ..Default::default()
        };

        let metrics = compute_metrics(&scenario);
        assert_eq!(metrics.total_income, Decimal::MAX);
        assert_eq!(metrics.vacancy_amt, Decimal::MAX);
        assert_eq!(metrics.cash_on_cash, Decimal::MAX);
    }

    #[test]
    fn test_analyze_unreadable_rent() {
        let (scenario, metrics) = analyze(&json!({
            "rentalIncome": "abc",
            "laundry": 50,
        }));

        assert_eq!(scenario.rental_income, Decimal::ZERO);
        assert_eq!(metrics.total_income, dec("50"));
    }

    #[test]
    fn test_analyze_matches_compute() {
        let body = json!({
            "rentalIncome": 2000,
            "vacancy": "5",
            "repairs": 10,
            "capex": 10,
            "propManagement": 8.6,
            "taxes": 200,
            "insurance": 100,
            "mortgage": 800,
            "downPayment": 20000,
            "closingCosts": "3000",
        });

        let (scenario, metrics) = analyze(&body);
        assert_eq!(scenario, concrete_scenario());
        assert_eq!(metrics, compute_metrics(&concrete_scenario()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Map, Number};

    const FIELDS: [&str; 26] = [
        "scenarioName",
        "rentalIncome",
        "laundry",
        "storage",
        "parking",
        "miscIncomes",
        "miscIncomeVals",
        "miscIncomeItems",
        "vacancy",
        "repairs",
        "capex",
        "propManagement",
        "taxes",
        "insurance",
        "water",
        "garbage",
        "electric",
        "gas",
        "hoa",
        "lawn",
        "mortgage",
        "downPayment",
        "closingCosts",
        "rehab",
        "cashMisc",
        "cashMiscVals",
    ];

    /// Amounts with at most two decimals, small enough that no sum rounds.
    fn money() -> impl Strategy<Value = Decimal> {
        (-1_000_000_000i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// Any representable decimal.
    fn any_decimal() -> impl Strategy<Value = Decimal> {
        (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
            .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale))
    }

    fn scenario_with(values: Vec<Decimal>) -> Scenario {
        let at = |i: usize| values.get(i).copied().unwrap_or_default();
        Scenario {
            rental_income: at(0),
            laundry: at(1),
            storage: at(2),
            parking: at(3),
            vacancy: at(4),
            repairs: at(5),
            capex: at(6),
            prop_management: at(7),
            taxes: at(8),
            insurance: at(9),
            water: at(10),
            garbage: at(11),
            electric: at(12),
            gas: at(13),
            hoa: at(14),
            lawn: at(15),
            mortgage: at(16),
            down_payment: at(17),
            closing_costs: at(18),
            rehab: at(19),
            misc_incomes: vec![LineItem::new("a", at(20)), LineItem::new("b", at(21))],
            cash_misc: vec![LineItem::new("c", at(22))],
            ..Default::default()
        }
    }

    fn json_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            any::<f64>().prop_map(|f| Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)),
            ".{0,12}".prop_map(Value::String),
            "[-+]?[0-9]{0,40}(\\.[0-9]{0,40})?(e[-+]?[0-9]{1,4})?".prop_map(Value::String),
        ]
    }

    fn json_value() -> impl Strategy<Value = Value> {
        json_leaf().prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|items| Value::String(Value::Array(items).to_string())),
            ]
        })
    }

    fn scenario_body() -> impl Strategy<Value = Value> {
        prop::collection::vec(json_value(), FIELDS.len()).prop_map(|values| {
            let fields: Map<String, Value> = FIELDS
                .iter()
                .zip(values)
                .map(|(key, value)| (key.to_string(), value))
                .collect();
            Value::Object(fields)
        })
    }

    proptest! {
        #[test]
        fn prop_total_income_ignores_misc_order(
            (values, shuffled) in prop::collection::vec(money(), 0..8)
                .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
        ) {
            let items = |vals: &[Decimal]| -> Vec<LineItem> {
                vals.iter().map(|v| LineItem::new("", *v)).collect()
            };
            let base = Scenario { rental_income: Decimal::from(1200), ..Default::default() };
            let a = Scenario { misc_incomes: items(&values), ..base.clone() };
            let b = Scenario { misc_incomes: items(&shuffled), ..base };

            prop_assert_eq!(compute_metrics(&a).total_income, compute_metrics(&b).total_income);
        }

        #[test]
        fn prop_compute_is_idempotent(values in prop::collection::vec(any_decimal(), 23)) {
            let scenario = scenario_with(values);
            prop_assert_eq!(compute_metrics(&scenario), compute_metrics(&scenario));
        }

        #[test]
        fn prop_zero_investment_means_zero_return(values in prop::collection::vec(money(), 17)) {
            let scenario = Scenario {
                down_payment: Decimal::ZERO,
                closing_costs: Decimal::ZERO,
                rehab: Decimal::ZERO,
                cash_misc: LineItem::placeholders(),
                ..scenario_with(values)
            };

            let metrics = compute_metrics(&scenario);
            prop_assert!(metrics.total_investment.is_zero());
            prop_assert!(metrics.cash_on_cash.is_zero());
        }

        #[test]
        fn prop_cash_flow_identities(values in prop::collection::vec(money(), 23)) {
            let metrics = compute_metrics(&scenario_with(values));
            prop_assert_eq!(metrics.cash_flow, metrics.total_income - metrics.total_expenses);
            prop_assert_eq!(metrics.annual_cash_flow, metrics.cash_flow * Decimal::from(12));
        }

        #[test]
        fn prop_garbage_input_never_panics(body in scenario_body()) {
            let (scenario, _) = analyze(&body);
            prop_assert!(!scenario.scenario_name.trim().is_empty());
        }

        #[test]
        fn prop_non_object_input_gives_zero_metrics(body in json_value()) {
            prop_assume!(!body.is_object());
            prop_assert_eq!(analyze(&body).1, AnalysisMetrics::default());
        }
    }
}
