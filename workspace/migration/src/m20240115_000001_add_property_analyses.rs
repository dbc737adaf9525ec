use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000001_create_table::Properties;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One saved scenario per property, removed together with the property.
        manager
            .create_table(
                Table::create()
                    .table(PropertyAnalyses::Table)
                    .if_not_exists()
                    .col(pk_auto(PropertyAnalyses::Id))
                    .col(integer(PropertyAnalyses::PropertyId).unique_key())
                    .col(string(PropertyAnalyses::ScenarioName).default("Scenario 1"))
                    .col(money(PropertyAnalyses::RentalIncome))
                    .col(money(PropertyAnalyses::Laundry))
                    .col(money(PropertyAnalyses::Storage))
                    .col(money(PropertyAnalyses::Parking))
                    .col(text(PropertyAnalyses::MiscIncomes))
                    .col(money(PropertyAnalyses::Vacancy))
                    .col(money(PropertyAnalyses::Repairs))
                    .col(money(PropertyAnalyses::Capex))
                    .col(money(PropertyAnalyses::PropManagement))
                    .col(money(PropertyAnalyses::Taxes))
                    .col(money(PropertyAnalyses::Insurance))
                    .col(money(PropertyAnalyses::Water))
                    .col(money(PropertyAnalyses::Garbage))
                    .col(money(PropertyAnalyses::Electric))
                    .col(money(PropertyAnalyses::Gas))
                    .col(money(PropertyAnalyses::Hoa))
                    .col(money(PropertyAnalyses::Lawn))
                    .col(money(PropertyAnalyses::Mortgage))
                    .col(money(PropertyAnalyses::DownPayment))
                    .col(money(PropertyAnalyses::ClosingCosts))
                    .col(money(PropertyAnalyses::Rehab))
                    .col(text(PropertyAnalyses::CashMisc))
                    .col(date_time(PropertyAnalyses::CreatedAt).default(Expr::current_timestamp()))
                    .col(date_time(PropertyAnalyses::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_analysis_property")
                            .from(PropertyAnalyses::Table, PropertyAnalyses::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyAnalyses::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// Amount stored as decimal text, so no precision is lost on SQLite or Postgres.
fn money<T: IntoIden>(col: T) -> ColumnDef {
    text(col).default("0").to_owned()
}

#[derive(DeriveIden)]
enum PropertyAnalyses {
    Table,
    Id,
    PropertyId,
    ScenarioName,
    RentalIncome,
    Laundry,
    Storage,
    Parking,
    MiscIncomes,
    Vacancy,
    Repairs,
    Capex,
    PropManagement,
    Taxes,
    Insurance,
    Water,
    Garbage,
    Electric,
    Gas,
    Hoa,
    Lawn,
    Mortgage,
    DownPayment,
    ClosingCosts,
    Rehab,
    CashMisc,
    CreatedAt,
    UpdatedAt,
}
