use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

use super::property;

/// The saved return analysis scenario of a property.
///
/// There is at most one row per property (`property_id` is unique); saving
/// again overwrites it in place. Amounts are kept as decimal text so every
/// value the normalizer accepts reads back unchanged on any backend.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "property_analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub property_id: i32,
    pub scenario_name: String,

    #[sea_orm(column_type = "Text")]
    pub rental_income: String,
    #[sea_orm(column_type = "Text")]
    pub laundry: String,
    #[sea_orm(column_type = "Text")]
    pub storage: String,
    #[sea_orm(column_type = "Text")]
    pub parking: String,
    /// JSON array of `{"label": .., "value": ..}` objects.
    #[sea_orm(column_type = "Text")]
    pub misc_incomes: String,

    #[sea_orm(column_type = "Text")]
    pub vacancy: String,
    #[sea_orm(column_type = "Text")]
    pub repairs: String,
    #[sea_orm(column_type = "Text")]
    pub capex: String,
    #[sea_orm(column_type = "Text")]
    pub prop_management: String,

    #[sea_orm(column_type = "Text")]
    pub taxes: String,
    #[sea_orm(column_type = "Text")]
    pub insurance: String,
    #[sea_orm(column_type = "Text")]
    pub water: String,
    #[sea_orm(column_type = "Text")]
    pub garbage: String,
    #[sea_orm(column_type = "Text")]
    pub electric: String,
    #[sea_orm(column_type = "Text")]
    pub gas: String,
    #[sea_orm(column_type = "Text")]
    pub hoa: String,
    #[sea_orm(column_type = "Text")]
    pub lawn: String,
    #[sea_orm(column_type = "Text")]
    pub mortgage: String,

    #[sea_orm(column_type = "Text")]
    pub down_payment: String,
    #[sea_orm(column_type = "Text")]
    pub closing_costs: String,
    #[sea_orm(column_type = "Text")]
    pub rehab: String,
    /// JSON array of `{"label": .., "value": ..}` objects.
    #[sea_orm(column_type = "Text")]
    pub cash_misc: String,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "property::Entity",
        from = "Column::PropertyId",
        to = "property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
