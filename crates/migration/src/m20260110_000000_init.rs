//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `trips`: budgeted travel periods owned by users
//! - `expenses`: spend entries attached to a trip
//! - `reports`: immutable spending snapshots per trip

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    UserId,
    Name,
    TotalBudgetMinor,
    RemainingBudgetMinor,
    DailyAverageMinor,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    TripId,
    Category,
    AmountMinor,
    Date,
    Note,
    CreatedAt,
}

#[derive(Iden)]
enum Reports {
    Table,
    Id,
    TripId,
    TotalSpentMinor,
    Breakdown,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::UserId).string().not_null())
                    .col(ColumnDef::new(Trips::Name).string().not_null())
                    .col(
                        ColumnDef::new(Trips::TotalBudgetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::RemainingBudgetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::DailyAverageMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::EndDate).date().not_null())
                    .col(ColumnDef::new(Trips::Status).string().not_null())
                    .col(ColumnDef::new(Trips::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-user_id")
                            .from(Trips::Table, Trips::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-user_id")
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .to_owned(),
            )
            .await?;

        // The overlap check filters on owner + date range.
        manager
            .create_index(
                Index::create()
                    .name("idx-trips-user_id-start_date")
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .col(Trips::StartDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::TripId).string().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-trip_id")
                            .from(Expenses::Table, Expenses::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-trip_id")
                    .table(Expenses::Table)
                    .col(Expenses::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-trip_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::TripId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Reports
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::TripId).string().not_null())
                    .col(
                        ColumnDef::new(Reports::TotalSpentMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reports::Breakdown).string().not_null())
                    .col(ColumnDef::new(Reports::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reports-trip_id")
                            .from(Reports::Table, Reports::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reports-trip_id")
                    .table(Reports::Table)
                    .col(Reports::TripId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
