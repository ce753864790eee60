use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_deployments::Entity")]
    CustomerDeployments,
    #[sea_orm(has_many = "super::customer_attributes::Entity")]
    Attributes,
}

impl Related<super::deployments::Entity> for Entity {
    fn to() -> RelationDef {
        super::customer_deployments::Relation::Deployments.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::customer_deployments::Relation::Customers.def().rev())
    }
}

impl Related<super::customer_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
