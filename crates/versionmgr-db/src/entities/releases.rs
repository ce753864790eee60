use sea_orm::entity::prelude::*;

/// A named bundle of services.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "releases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::release_services::Entity")]
    ReleaseServices,
    #[sea_orm(has_many = "super::release_attributes::Entity")]
    Attributes,
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        super::release_services::Relation::Services.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::release_services::Relation::Releases.def().rev())
    }
}

impl Related<super::release_attributes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
