use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hosts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hosts::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Hosts::Label).string_len(100).null())
                    .col(ColumnDef::new(Hosts::ClusterId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hosts_cluster_id")
                            .from(Hosts::Table, Hosts::ClusterId)
                            .to(Clusters::Table, Clusters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hosts_name_unique")
                    .table(Hosts::Table)
                    .col(Hosts::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hosts_cluster_id")
                    .table(Hosts::Table)
                    .col(Hosts::ClusterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Hosts {
    Table,
    Id,
    Name,
    Label,
    ClusterId,
}

#[derive(DeriveIden)]
enum Clusters {
    Table,
    Id,
}
