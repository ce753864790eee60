use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "deployments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub label: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::services::Entity")]
    Services,
    #[sea_orm(has_many = "super::customer_deployments::Entity")]
    CustomerDeployments,
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_deployments::Relation::Customers.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_deployments::Relation::Deployments.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
