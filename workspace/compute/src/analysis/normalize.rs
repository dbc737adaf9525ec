//! Coercion of loosely typed client input into a [`Scenario`].
//!
//! Clients send numbers, numeric strings, empty strings and stringified
//! arrays more or less interchangeably. Nothing here fails: whatever can not
//! be read as a number counts as zero and whatever can not be read as a list
//! of line items becomes the placeholder list.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::trace;

use super::scenario::{DEFAULT_SCENARIO_NAME, LineItem, PLACEHOLDER_SLOTS, Scenario, zip_items};

/// Builds a scenario out of a JSON body using camelCase field names.
///
/// A body that is not an object yields [`Scenario::default`].
pub fn normalize(raw: &Value) -> Scenario {
    let Some(fields) = raw.as_object() else {
        trace!("Scenario body is not an object, using defaults");
        return Scenario::default();
    };

    let number = |key: &str| fields.get(key).map(coerce_decimal).unwrap_or_default();

    Scenario {
        scenario_name: scenario_name(fields),
        rental_income: number("rentalIncome"),
        laundry: number("laundry"),
        storage: number("storage"),
        parking: number("parking"),
        misc_incomes: line_items(fields, "miscIncomeItems", "miscIncomes", "miscIncomeVals"),
        vacancy: number("vacancy"),
        repairs: number("repairs"),
        capex: number("capex"),
        prop_management: number("propManagement"),
        taxes: number("taxes"),
        insurance: number("insurance"),
        water: number("water"),
        garbage: number("garbage"),
        electric: number("electric"),
        gas: number("gas"),
        hoa: number("hoa"),
        lawn: number("lawn"),
        mortgage: number("mortgage"),
        down_payment: number("downPayment"),
        closing_costs: number("closingCosts"),
        rehab: number("rehab"),
        cash_misc: line_items(fields, "cashMiscItems", "cashMisc", "cashMiscVals"),
    }
}

fn scenario_name(fields: &Map<String, Value>) -> String {
    match fields.get("scenarioName") {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => DEFAULT_SCENARIO_NAME.to_string(),
    }
}

/// Reads a monetary or rate value; anything unreadable is zero.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }

    if let Ok(value) = Decimal::from_str(text) {
        return value;
    }
    if let Ok(value) = Decimal::from_scientific(text) {
        return value;
    }

    // Too large or too precise for a Decimal, or not a number at all.
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => Decimal::from_f64(float).unwrap_or(if float < 0.0 {
            Decimal::MIN
        } else {
            Decimal::MAX
        }),
        _ => Decimal::ZERO,
    }
}

fn coerce_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

/// A JSON array, or a string holding one.
fn as_list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.clone()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Line items from either the `{label, value}` pair form or the parallel
/// label/value arrays. The pair form wins when both are present.
fn line_items(
    fields: &Map<String, Value>,
    pairs_key: &str,
    labels_key: &str,
    values_key: &str,
) -> Vec<LineItem> {
    if let Some(pairs) = fields.get(pairs_key).and_then(as_list) {
        return pairs
            .iter()
            .map(|pair| LineItem {
                label: pair.get("label").map(coerce_label).unwrap_or_default(),
                value: pair.get("value").map(coerce_decimal).unwrap_or_default(),
            })
            .collect();
    }

    let labels = fields
        .get(labels_key)
        .and_then(as_list)
        .map(|items| items.iter().map(coerce_label).collect())
        .unwrap_or_else(|| vec![String::new(); PLACEHOLDER_SLOTS]);
    let values = fields
        .get(values_key)
        .and_then(as_list)
        .map(|items| items.iter().map(coerce_decimal).collect())
        .unwrap_or_else(|| vec![Decimal::ZERO; PLACEHOLDER_SLOTS]);

    zip_items(labels, values)
}
