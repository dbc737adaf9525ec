use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use common::AnalysisRecordDto;
use model::entities::property_analysis;
use sea_orm::sea_query::OnConflict;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::str::FromStr;
use tracing::{debug, instrument, trace, warn};

use super::scenario::{LineItem, Scenario};
use crate::error::{ComputeError, Result};

/// The saved scenario of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRecord {
    pub id: i32,
    pub property_id: i32,
    pub scenario: Scenario,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScenarioRecord {
    pub fn to_dto(&self) -> AnalysisRecordDto {
        AnalysisRecordDto {
            id: self.id,
            property_id: self.property_id,
            scenario: self.scenario.to_payload(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<property_analysis::Model> for ScenarioRecord {
    fn from(model: property_analysis::Model) -> Self {
        let property_id = model.property_id;
        let misc_incomes = decode_items(property_id, "misc_incomes", &model.misc_incomes);
        let cash_misc = decode_items(property_id, "cash_misc", &model.cash_misc);
        let amount = |column: &str, raw: &str| decode_amount(property_id, column, raw);

        Self {
            id: model.id,
            property_id: model.property_id,
            scenario: Scenario {
                scenario_name: model.scenario_name,
                rental_income: amount("rental_income", &model.rental_income),
                laundry: amount("laundry", &model.laundry),
                storage: amount("storage", &model.storage),
                parking: amount("parking", &model.parking),
                misc_incomes,
                vacancy: amount("vacancy", &model.vacancy),
                repairs: amount("repairs", &model.repairs),
                capex: amount("capex", &model.capex),
                prop_management: amount("prop_management", &model.prop_management),
                taxes: amount("taxes", &model.taxes),
                insurance: amount("insurance", &model.insurance),
                water: amount("water", &model.water),
                garbage: amount("garbage", &model.garbage),
                electric: amount("electric", &model.electric),
                gas: amount("gas", &model.gas),
                hoa: amount("hoa", &model.hoa),
                lawn: amount("lawn", &model.lawn),
                mortgage: amount("mortgage", &model.mortgage),
                down_payment: amount("down_payment", &model.down_payment),
                closing_costs: amount("closing_costs", &model.closing_costs),
                rehab: amount("rehab", &model.rehab),
                cash_misc,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A stored line item column that can not be read falls back to the placeholders.
fn decode_items(property_id: i32, column: &str, raw: &str) -> Vec<LineItem> {
    match serde_json::from_str::<Vec<LineItem>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(
                property_id,
                column,
                error = %e,
                "Stored line items could not be decoded, using placeholders"
            );
            LineItem::placeholders()
        }
    }
}

/// A stored amount that is not decimal text reads as zero.
fn decode_amount(property_id: i32, column: &str, raw: &str) -> Decimal {
    match Decimal::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                property_id,
                column,
                error = %e,
                "Stored amount could not be decoded, using zero"
            );
            Decimal::ZERO
        }
    }
}

/// Keeps at most one scenario per property.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Returns the saved scenario of a property, if any.
    async fn load(&self, property_id: i32) -> Result<Option<ScenarioRecord>>;

    /// Creates or overwrites the scenario of a property.
    async fn save(&self, property_id: i32, scenario: &Scenario) -> Result<ScenarioRecord>;

    /// Removes the scenario of a property, returning the number of deleted records.
    async fn delete(&self, property_id: i32) -> Result<u64>;
}

/// [`ScenarioStore`] backed by the `property_analyses` table.
#[derive(Clone, Debug)]
pub struct DbScenarioStore {
    db: DatabaseConnection,
}

impl DbScenarioStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Removes the scenario of a property on any connection, so callers can
    /// delete it inside their own transaction.
    pub async fn delete_with<C: ConnectionTrait>(conn: &C, property_id: i32) -> Result<u64> {
        let result = property_analysis::Entity::delete_many()
            .filter(property_analysis::Column::PropertyId.eq(property_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find(&self, property_id: i32) -> Result<Option<property_analysis::Model>> {
        Ok(property_analysis::Entity::find()
            .filter(property_analysis::Column::PropertyId.eq(property_id))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl ScenarioStore for DbScenarioStore {
    #[instrument(skip(self))]
    async fn load(&self, property_id: i32) -> Result<Option<ScenarioRecord>> {
        trace!("Loading scenario");
        let record = self.find(property_id).await?.map(ScenarioRecord::from);
        debug!(found = record.is_some(), "Scenario lookup finished");
        Ok(record)
    }

    #[instrument(skip(self, scenario), fields(scenario_name = %scenario.scenario_name))]
    async fn save(&self, property_id: i32, scenario: &Scenario) -> Result<ScenarioRecord> {
        trace!("Saving scenario");
        let now = Utc::now().naive_utc();

        let model = property_analysis::ActiveModel {
            property_id: Set(property_id),
            scenario_name: Set(scenario.scenario_name.clone()),
            rental_income: Set(scenario.rental_income.to_string()),
            laundry: Set(scenario.laundry.to_string()),
            storage: Set(scenario.storage.to_string()),
            parking: Set(scenario.parking.to_string()),
            misc_incomes: Set(serde_json::to_string(&scenario.misc_incomes)?),
            vacancy: Set(scenario.vacancy.to_string()),
            repairs: Set(scenario.repairs.to_string()),
            capex: Set(scenario.capex.to_string()),
            prop_management: Set(scenario.prop_management.to_string()),
            taxes: Set(scenario.taxes.to_string()),
            insurance: Set(scenario.insurance.to_string()),
            water: Set(scenario.water.to_string()),
            garbage: Set(scenario.garbage.to_string()),
            electric: Set(scenario.electric.to_string()),
            gas: Set(scenario.gas.to_string()),
            hoa: Set(scenario.hoa.to_string()),
            lawn: Set(scenario.lawn.to_string()),
            mortgage: Set(scenario.mortgage.to_string()),
            down_payment: Set(scenario.down_payment.to_string()),
            closing_costs: Set(scenario.closing_costs.to_string()),
            rehab: Set(scenario.rehab.to_string()),
            cash_misc: Set(serde_json::to_string(&scenario.cash_misc)?),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        use property_analysis::Column;
        // Everything but the key and the creation time is overwritten.
        let on_conflict = OnConflict::column(Column::PropertyId)
            .update_columns([
                Column::ScenarioName,
                Column::RentalIncome,
                Column::Laundry,
                Column::Storage,
                Column::Parking,
                Column::MiscIncomes,
                Column::Vacancy,
                Column::Repairs,
                Column::Capex,
                Column::PropManagement,
                Column::Taxes,
                Column::Insurance,
                Column::Water,
                Column::Garbage,
                Column::Electric,
                Column::Gas,
                Column::Hoa,
                Column::Lawn,
                Column::Mortgage,
                Column::DownPayment,
                Column::ClosingCosts,
                Column::Rehab,
                Column::CashMisc,
                Column::UpdatedAt,
            ])
            .to_owned();

        property_analysis::Entity::insert(model)
            .on_conflict(on_conflict)
            .exec(&self.db)
            .await?;

        let saved = self.find(property_id).await?.ok_or_else(|| {
            ComputeError::NotFound(format!("analysis of property {} after save", property_id))
        })?;

        debug!(analysis_id = saved.id, "Scenario saved");
        Ok(saved.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, property_id: i32) -> Result<u64> {
        trace!("Deleting scenario");
        let rows_affected = Self::delete_with(&self.db, property_id).await?;
        debug!(rows_affected, "Scenario delete finished");
        Ok(rows_affected)
    }
}
