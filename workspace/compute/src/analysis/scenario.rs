use common::ScenarioPayload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name given to a scenario that arrives without one.
pub const DEFAULT_SCENARIO_NAME: &str = "Scenario 1";

/// Number of empty line items a fresh scenario starts with.
pub const PLACEHOLDER_SLOTS: usize = 3;

/// A labelled amount: a miscellaneous income line or a miscellaneous cash investment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub value: Decimal,
}

impl LineItem {
    pub fn new(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// The empty line items a scenario starts with.
    pub fn placeholders() -> Vec<LineItem> {
        vec![LineItem::default(); PLACEHOLDER_SLOTS]
    }
}

/// Income, expense and investment inputs of one return analysis.
///
/// Monetary fields are monthly amounts. `vacancy`, `repairs`, `capex` and
/// `prop_management` are percentages of the total monthly income and are
/// taken as they are, even outside 0..=100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub scenario_name: String,

    // Income
    pub rental_income: Decimal,
    pub laundry: Decimal,
    pub storage: Decimal,
    pub parking: Decimal,
    pub misc_incomes: Vec<LineItem>,

    // Rates
    pub vacancy: Decimal,
    pub repairs: Decimal,
    pub capex: Decimal,
    pub prop_management: Decimal,

    // Fixed expenses
    pub taxes: Decimal,
    pub insurance: Decimal,
    pub water: Decimal,
    pub garbage: Decimal,
    pub electric: Decimal,
    pub gas: Decimal,
    pub hoa: Decimal,
    pub lawn: Decimal,
    pub mortgage: Decimal,

    // Cash invested
    pub down_payment: Decimal,
    pub closing_costs: Decimal,
    pub rehab: Decimal,
    pub cash_misc: Vec<LineItem>,
}

impl Default for Scenario {
    /// Everything zero, default name and placeholder line items.
    fn default() -> Self {
        Self {
            scenario_name: DEFAULT_SCENARIO_NAME.to_string(),
            rental_income: Decimal::ZERO,
            laundry: Decimal::ZERO,
            storage: Decimal::ZERO,
            parking: Decimal::ZERO,
            misc_incomes: LineItem::placeholders(),
            vacancy: Decimal::ZERO,
            repairs: Decimal::ZERO,
            capex: Decimal::ZERO,
            prop_management: Decimal::ZERO,
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
            cash_misc: LineItem::placeholders(),
        }
    }
}

impl Scenario {
    /// The starting point offered for a property that has no saved analysis:
    /// its asking rent as rental income and the usual reserve rates
    /// (5% vacancy, 10% repairs, 10% capex, 8.6% management).
    pub fn seeded(rent: Decimal) -> Self {
        Self {
            rental_income: rent,
            vacancy: Decimal::new(5, 0),
            repairs: Decimal::new(10, 0),
            capex: Decimal::new(10, 0),
            prop_management: Decimal::new(86, 1),
            ..Default::default()
        }
    }

    /// Wire form with the line items split into label and value arrays.
    pub fn to_payload(&self) -> ScenarioPayload {
        let (misc_incomes, misc_income_vals) = split_items(&self.misc_incomes);
        let (cash_misc, cash_misc_vals) = split_items(&self.cash_misc);

        ScenarioPayload {
            scenario_name: self.scenario_name.clone(),
            rental_income: self.rental_income,
            laundry: self.laundry,
            storage: self.storage,
            parking: self.parking,
            misc_incomes,
            misc_income_vals,
            vacancy: self.vacancy,
            repairs: self.repairs,
            capex: self.capex,
            prop_management: self.prop_management,
            taxes: self.taxes,
            insurance: self.insurance,
            water: self.water,
            garbage: self.garbage,
            electric: self.electric,
            gas: self.gas,
            hoa: self.hoa,
            lawn: self.lawn,
            mortgage: self.mortgage,
            down_payment: self.down_payment,
            closing_costs: self.closing_costs,
            rehab: self.rehab,
            cash_misc,
            cash_misc_vals,
        }
    }
}

fn split_items(items: &[LineItem]) -> (Vec<String>, Vec<Decimal>) {
    items
        .iter()
        .map(|item| (item.label.clone(), item.value))
        .unzip()
}

/// Pairs labels with values, padding the shorter side with `""` or zero.
pub fn zip_items(labels: Vec<String>, values: Vec<Decimal>) -> Vec<LineItem> {
    let len = labels.len().max(values.len());
    let mut labels = labels.into_iter();
    let mut values = values.into_iter();

    (0..len)
        .map(|_| LineItem {
            label: labels.next().unwrap_or_default(),
            value: values.next().unwrap_or_default(),
        })
        .collect()
}
