use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    Select, SqlErr, TransactionTrait,
};

use crate::error::ApiError;

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns the row matched by `select`, inserting `model` when there is none.
///
/// The flag is `true` when this call created the row.
pub async fn get_or_create<E, A, C>(
    conn: &C,
    kind: &'static str,
    select: Select<E>,
    model: A,
) -> Result<(E::Model, bool), ApiError>
where
    C: ConnectionTrait + TransactionTrait,
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    E::Model: IntoActiveModel<A>,
{
    if let Some(found) = select.clone().one(conn).await? {
        return Ok((found, false));
    }

    insert_or_refetch(conn, kind, select, model).await
}

/// Inserts `model`; if a concurrent writer won the unique constraint, reads
/// their row back through `select` instead.
///
/// The insert runs in a savepoint so a violation doesn't poison the caller's
/// transaction. A violation followed by an empty re-read is a [`ApiError::Conflict`].
pub async fn insert_or_refetch<E, A, C>(
    conn: &C,
    kind: &'static str,
    select: Select<E>,
    model: A,
) -> Result<(E::Model, bool), ApiError>
where
    C: ConnectionTrait + TransactionTrait,
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    E::Model: IntoActiveModel<A>,
{
    let savepoint = conn.begin().await?;
    match model.insert(&savepoint).await {
        Ok(created) => {
            savepoint.commit().await?;
            tracing::debug!(kind, "created");
            Ok((created, true))
        }
        Err(err) if is_unique_violation(&err) => {
            savepoint.rollback().await?;
            tracing::debug!(kind, %err, "lost insert race, re-reading");
            select
                .one(conn)
                .await?
                .map(|found| (found, false))
                .ok_or(ApiError::Conflict(kind))
        }
        Err(err) => {
            savepoint.rollback().await?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter, Set};
    use versionmgr_db::entities::versions;

    use super::*;
    use crate::test_support::test_db;

    fn version_named(name: &str) -> versions::ActiveModel {
        versions::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
    }

    fn select_version(name: &str) -> Select<versions::Entity> {
        versions::Entity::find().filter(versions::Column::Name.eq(name))
    }

    #[tokio::test]
    async fn creates_once_then_finds() {
        let db = test_db().await;

        let (first, created) = get_or_create(&db, "version", select_version("1.0"), version_named("1.0"))
            .await
            .unwrap();
        assert!(created);

        let (second, created) = get_or_create(&db, "version", select_version("1.0"), version_named("1.0"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(versions::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn losing_the_insert_race_returns_the_winner() {
        let db = test_db().await;
        let (winner, _) = get_or_create(&db, "version", select_version("2.0"), version_named("2.0"))
            .await
            .unwrap();

        // Skip the lookup, as a racing request would have.
        let (found, created) =
            insert_or_refetch(&db, "version", select_version("2.0"), version_named("2.0"))
                .await
                .unwrap();
        assert!(!created);
        assert_eq!(found.id, winner.id);
        assert_eq!(versions::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn violation_without_a_row_to_reread_is_a_conflict() {
        let db = test_db().await;
        get_or_create(&db, "version", select_version("3.0"), version_named("3.0"))
            .await
            .unwrap();

        let err = insert_or_refetch(&db, "version", select_version("no-such"), version_named("3.0"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict("version")));
    }

    #[tokio::test]
    async fn race_recovery_keeps_outer_transaction_usable() {
        let db = test_db().await;
        get_or_create(&db, "version", select_version("4.0"), version_named("4.0"))
            .await
            .unwrap();

        let txn = db.begin().await.unwrap();
        insert_or_refetch(&txn, "version", select_version("4.0"), version_named("4.0"))
            .await
            .unwrap();
        get_or_create(&txn, "version", select_version("4.1"), version_named("4.1"))
            .await
            .unwrap();
        txn.commit().await.unwrap();

        assert_eq!(versions::Entity::find().count(&db).await.unwrap(), 2);
    }
}
