use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use versionmgr_db::entities::{
    application_attributes, cluster_attributes, customer_attributes, host_attributes,
    release_attributes,
};

/// The entity an attribute hangs off. Each kind has its own table with a
/// cascading foreign key, so attributes disappear with their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOwner {
    Cluster(i32),
    Host(i32),
    Application(i32),
    Customer(i32),
    Release(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: i32,
    pub name: String,
    pub value: String,
}

macro_rules! load_attributes {
    ($conn:expr, $table:ident, $owner_col:ident, $owner_id:expr) => {
        $table::Entity::find()
            .filter($table::Column::$owner_col.eq($owner_id))
            .order_by_asc($table::Column::Name)
            .order_by_asc($table::Column::Id)
            .all($conn)
            .await?
            .into_iter()
            .map(|m| Attribute {
                id: m.id,
                name: m.name,
                value: m.value,
            })
            .collect()
    };
}

macro_rules! insert_attribute {
    ($conn:expr, $table:ident, $owner_field:ident, $owner_id:expr, $name:expr, $value:expr) => {{
        let m = $table::ActiveModel {
            $owner_field: Set($owner_id),
            name: Set($name),
            value: Set($value),
            ..Default::default()
        }
        .insert($conn)
        .await?;
        Attribute {
            id: m.id,
            name: m.name,
            value: m.value,
        }
    }};
}

/// Attributes of `owner`, ordered by name.
pub async fn attributes_of<C>(conn: &C, owner: AttributeOwner) -> Result<Vec<Attribute>, DbErr>
where
    C: ConnectionTrait,
{
    let attributes = match owner {
        AttributeOwner::Cluster(id) => load_attributes!(conn, cluster_attributes, ClusterId, id),
        AttributeOwner::Host(id) => load_attributes!(conn, host_attributes, HostId, id),
        AttributeOwner::Application(id) => {
            load_attributes!(conn, application_attributes, ApplicationId, id)
        }
        AttributeOwner::Customer(id) => load_attributes!(conn, customer_attributes, CustomerId, id),
        AttributeOwner::Release(id) => load_attributes!(conn, release_attributes, ReleaseId, id),
    };
    Ok(attributes)
}

pub async fn add_attribute<C>(
    conn: &C,
    owner: AttributeOwner,
    name: &str,
    value: &str,
) -> Result<Attribute, DbErr>
where
    C: ConnectionTrait,
{
    let name = name.to_string();
    let value = value.to_string();
    let attribute = match owner {
        AttributeOwner::Cluster(id) => {
            insert_attribute!(conn, cluster_attributes, cluster_id, id, name, value)
        }
        AttributeOwner::Host(id) => {
            insert_attribute!(conn, host_attributes, host_id, id, name, value)
        }
        AttributeOwner::Application(id) => {
            insert_attribute!(conn, application_attributes, application_id, id, name, value)
        }
        AttributeOwner::Customer(id) => {
            insert_attribute!(conn, customer_attributes, customer_id, id, name, value)
        }
        AttributeOwner::Release(id) => {
            insert_attribute!(conn, release_attributes, release_id, id, name, value)
        }
    };
    Ok(attribute)
}
