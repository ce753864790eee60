use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Releases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Releases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Releases::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReleaseServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReleaseServices::ReleaseId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReleaseServices::ServiceId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReleaseServices::ReleaseId)
                            .col(ReleaseServices::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_release_services_release_id")
                            .from(ReleaseServices::Table, ReleaseServices::ReleaseId)
                            .to(Releases::Table, Releases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_release_services_service_id")
                            .from(ReleaseServices::Table, ReleaseServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReleaseServices::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Releases::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Releases {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum ReleaseServices {
    Table,
    ReleaseId,
    ServiceId,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}
