//! Schema for the `team` and `member` tables.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTeamTable), Box::new(CreateMemberTable)]
    }
}

pub struct CreateTeamTable;

impl MigrationName for CreateTeamTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_team_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTeamTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Team::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Team::Name).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await
    }
}

pub struct CreateMemberTable;

impl MigrationName for CreateMemberTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_member_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateMemberTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Username).string().null())
                    .col(ColumnDef::new(Member::Age).integer().not_null())
                    .col(ColumnDef::new(Member::TeamId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_team")
                            .from(Member::Table, Member::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_team_id")
                    .table(Member::Table)
                    .col(Member::TeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Member {
    Table,
    Id,
    Username,
    Age,
    TeamId,
}
