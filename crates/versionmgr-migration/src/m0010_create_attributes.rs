use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (owner table, attribute table, owner column)
const OWNERS: &[(&str, &str, &str)] = &[
    ("clusters", "cluster_attributes", "cluster_id"),
    ("hosts", "host_attributes", "host_id"),
    ("applications", "application_attributes", "application_id"),
    ("customers", "customer_attributes", "customer_id"),
    ("releases", "release_attributes", "release_id"),
];

fn attribute_table(owner_table: &str, table: &str, owner_column: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Attributes::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Alias::new(owner_column)).integer().not_null())
        .col(ColumnDef::new(Attributes::Name).string_len(100).not_null())
        .col(ColumnDef::new(Attributes::Value).text().not_null())
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_{owner_column}"))
                .from(Alias::new(table), Alias::new(owner_column))
                .to(Alias::new(owner_table), Attributes::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (owner_table, table, owner_column) in OWNERS {
            manager
                .create_table(attribute_table(owner_table, table, owner_column))
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_{table}_{owner_column}"))
                        .table(Alias::new(*table))
                        .col(Alias::new(*owner_column))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (_, table, _) in OWNERS.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attributes {
    Id,
    Name,
    Value,
}
