use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string_null(Users::Name))
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20).default("owner"))
                    .col(date_time(Users::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(pk_auto(Properties::Id))
                    .col(integer(Properties::OwnerId))
                    .col(string(Properties::Address))
                    .col(string_null(Properties::Unit))
                    .col(string(Properties::City))
                    .col(string(Properties::State))
                    .col(string(Properties::Zip))
                    .col(decimal(Properties::Rent).decimal_len(16, 4))
                    .col(string_null(Properties::ImageUrl))
                    .col(integer_null(Properties::Sqft))
                    .col(integer_null(Properties::Bedrooms))
                    .col(integer_null(Properties::FullBaths))
                    .col(integer_null(Properties::ThreeQuarterBaths))
                    .col(integer_null(Properties::HalfBaths))
                    .col(integer_null(Properties::QuarterBaths))
                    .col(integer_null(Properties::YearBuilt))
                    .col(string_null(Properties::PropertyType))
                    .col(text_null(Properties::Features))
                    .col(text_null(Properties::Renovations))
                    .col(decimal_null(Properties::HomeValue).decimal_len(16, 4))
                    .col(boolean(Properties::UseZestimate).default(false))
                    .col(date_time(Properties::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_owner")
                            .from(Properties::Table, Properties::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_owner_id")
                    .table(Properties::Table)
                    .col(Properties::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Create tenants table
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(pk_auto(Tenants::Id))
                    .col(string(Tenants::Name))
                    .col(string_null(Tenants::Email))
                    .col(string_null(Tenants::Phone))
                    .col(date_time(Tenants::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create leases table
        manager
            .create_table(
                Table::create()
                    .table(Leases::Table)
                    .if_not_exists()
                    .col(pk_auto(Leases::Id))
                    .col(integer(Leases::PropertyId))
                    .col(integer(Leases::TenantId))
                    .col(date(Leases::StartDate))
                    .col(date(Leases::EndDate))
                    .col(decimal(Leases::MonthlyRent).decimal_len(16, 4))
                    .col(decimal(Leases::SecurityDeposit).decimal_len(16, 4))
                    .col(date_time(Leases::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lease_property")
                            .from(Leases::Table, Leases::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lease_tenant")
                            .from(Leases::Table, Leases::TenantId)
                            .to(Tenants::Table, Tenants::Id)
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
            .drop_table(Table::drop().table(Leases::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Properties {
    Table,
    Id,
    OwnerId,
    Address,
    Unit,
    City,
    State,
    Zip,
    Rent,
    ImageUrl,
    Sqft,
    Bedrooms,
    FullBaths,
    ThreeQuarterBaths,
    HalfBaths,
    QuarterBaths,
    YearBuilt,
    PropertyType,
    Features,
    Renovations,
    HomeValue,
    UseZestimate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Email,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Leases {
    Table,
    Id,
    PropertyId,
    TenantId,
    StartDate,
    EndDate,
    MonthlyRent,
    SecurityDeposit,
    CreatedAt,
}
