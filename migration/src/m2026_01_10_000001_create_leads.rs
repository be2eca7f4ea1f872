//! Migration to create the leads table.
//!
//! This migration creates the leads table which stores scraped business
//! listings through their scraped -> enriched -> pitch_ready lifecycle,
//! including enrichment attributes, generated pitch text and call tracking.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Source).text().not_null())
                    .col(ColumnDef::new(Leads::CompanyName).text().not_null())
                    .col(ColumnDef::new(Leads::Address).text().not_null())
                    .col(ColumnDef::new(Leads::City).text().not_null())
                    .col(ColumnDef::new(Leads::PostalCode).text().not_null())
                    .col(ColumnDef::new(Leads::Phone).text().null())
                    .col(ColumnDef::new(Leads::Website).text().null())
                    .col(ColumnDef::new(Leads::GoogleRating).double().null())
                    .col(ColumnDef::new(Leads::ReviewCount).integer().null())
                    .col(ColumnDef::new(Leads::OwnerName).text().null())
                    .col(ColumnDef::new(Leads::ContactPerson).text().null())
                    .col(ColumnDef::new(Leads::Description).text().null())
                    .col(ColumnDef::new(Leads::Services).json_binary().not_null())
                    .col(
                        ColumnDef::new(Leads::Specializations)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::RecentProjects)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Leads::EmployeeEstimate).integer().null())
                    .col(ColumnDef::new(Leads::Pitch).text().null())
                    .col(
                        ColumnDef::new(Leads::PitchGeneratedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Leads::CallStatus).text().not_null())
                    .col(ColumnDef::new(Leads::CallNotes).text().null())
                    .col(
                        ColumnDef::new(Leads::CalledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Leads::ScrapedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::EnrichedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Leads::Status).text().not_null())
                    .col(ColumnDef::new(Leads::DedupeKey).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Dedup lookups during ingestion hit dedupe_key and phone.
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_dedupe_key")
                    .table(Leads::Table)
                    .col(Leads::DedupeKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_phone")
                    .table(Leads::Table)
                    .col(Leads::Phone)
                    .to_owned(),
            )
            .await?;

        // Lifecycle and call-review filters query on status columns.
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_status")
                    .table(Leads::Table)
                    .col(Leads::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_call_status")
                    .table(Leads::Table)
                    .col(Leads::CallStatus)
                    .to_owned(),
            )
            .await?;

        // Insertion-order listing uses scraped_at ascending with id as tiebreaker.
        manager
            .get_connection()
            .execute(Statement::from_string(
                manager.get_database_backend(),
                "CREATE INDEX IF NOT EXISTS idx_leads_scraped_at ON leads (scraped_at, id)"
                    .to_string(),
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leads_dedupe_key")
                    .table(Leads::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leads_phone")
                    .table(Leads::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leads_status")
                    .table(Leads::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leads_call_status")
                    .table(Leads::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    Source,
    CompanyName,
    Address,
    City,
    PostalCode,
    Phone,
    Website,
    GoogleRating,
    ReviewCount,
    OwnerName,
    ContactPerson,
    Description,
    Services,
    Specializations,
    RecentProjects,
    EmployeeEstimate,
    Pitch,
    PitchGeneratedAt,
    CallStatus,
    CallNotes,
    CalledAt,
    ScrapedAt,
    EnrichedAt,
    Status,
    DedupeKey,
}
