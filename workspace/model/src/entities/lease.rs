use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{property, tenant};

/// A rental agreement between a tenant and a property.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub property_id: i32,
    pub tenant_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub monthly_rent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub security_deposit: Decimal,
    pub created_at: NaiveDateTime,
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
    #[sea_orm(
        belongs_to = "tenant::Entity",
        from = "Column::TenantId",
        to = "tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
