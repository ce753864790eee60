use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerDeployments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerDeployments::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerDeployments::DeploymentId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CustomerDeployments::CustomerId)
                            .col(CustomerDeployments::DeploymentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_deployments_customer_id")
                            .from(CustomerDeployments::Table, CustomerDeployments::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_deployments_deployment_id")
                            .from(
                                CustomerDeployments::Table,
                                CustomerDeployments::DeploymentId,
                            )
                            .to(Deployments::Table, Deployments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerDeployments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum CustomerDeployments {
    Table,
    CustomerId,
    DeploymentId,
}

#[derive(DeriveIden)]
enum Deployments {
    Table,
    Id,
}
