use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{lease, property_analysis, user};

/// A rental property owned by a single user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user who owns this property. Only this user may see or change it.
    pub owner_id: i32,
    pub address: String,
    pub unit: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    /// Asking monthly rent. Seeds the rental income of a new analysis.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub rent: Decimal,
    pub image_url: Option<String>,

    // Home facts
    pub sqft: Option<i32>,
    pub bedrooms: Option<i32>,
    pub full_baths: Option<i32>,
    pub three_quarter_baths: Option<i32>,
    pub half_baths: Option<i32>,
    pub quarter_baths: Option<i32>,
    pub year_built: Option<i32>,
    pub property_type: Option<String>,
    /// JSON encoded list of strings, e.g. `["Pool","Basement"]`.
    #[sea_orm(column_type = "Text", nullable)]
    pub features: Option<String>,
    /// JSON encoded list of strings, e.g. `["2021 - HVAC"]`.
    #[sea_orm(column_type = "Text", nullable)]
    pub renovations: Option<String>,

    // Home value
    #[sea_orm(column_type = "Decimal(Some((16, 4)))", nullable)]
    pub home_value: Option<Decimal>,
    #[sea_orm(default_value = "false")]
    pub use_zestimate: bool,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::OwnerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "lease::Entity")]
    Lease,
    /// At most one saved analysis per property.
    #[sea_orm(has_one = "property_analysis::Entity")]
    PropertyAnalysis,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lease.def()
    }
}

impl Related<property_analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyAnalysis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
