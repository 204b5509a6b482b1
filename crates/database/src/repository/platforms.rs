use super::DbRepository;
use crate::store::PlatformStore;
use crate::DbError;
use async_trait::async_trait;
use core_types::{Platform, PlatformInput, RecordId};
use sqlx::{FromRow, PgConnection};

#[derive(Debug, FromRow)]
struct UpsertedPlatform {
    id: RecordId,
    link: String,
    inserted: bool,
}

/// Insert-or-return on the unique link. The no-op `DO UPDATE` makes
/// `RETURNING` yield the existing row; `xmax = 0` only holds for a fresh insert.
pub(super) async fn upsert_platform(
    conn: &mut PgConnection,
    link: &str,
) -> Result<Platform, DbError> {
    let row = sqlx::query_as::<_, UpsertedPlatform>(
        r#"
        INSERT INTO platforms (link) VALUES ($1)
        ON CONFLICT (link) DO UPDATE SET link = EXCLUDED.link
        RETURNING id, link, (xmax = 0) AS inserted
        "#,
    )
    .bind(link)
    .fetch_one(conn)
    .await?;

    if row.inserted {
        tracing::info!(platform_id = row.id, link = %row.link, "Created platform on first reference.");
    }
    Ok(Platform { id: row.id, link: row.link })
}

#[async_trait]
impl PlatformStore for DbRepository {
    async fn get_all_platforms(&self) -> Result<Vec<Platform>, DbError> {
        let rows = sqlx::query_as::<_, (RecordId, String)>("SELECT id, link FROM platforms ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id, link)| Platform { id, link }).collect())
    }

    async fn get_platform_by_id(&self, id: RecordId) -> Result<Option<Platform>, DbError> {
        let row = sqlx::query_as::<_, (RecordId, String)>("SELECT id, link FROM platforms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, link)| Platform { id, link }))
    }

    async fn create_platform(&self, input: PlatformInput) -> Result<Platform, DbError> {
        let input = input.validated()?;
        let (id, link) = sqlx::query_as::<_, (RecordId, String)>(
            "INSERT INTO platforms (link) VALUES ($1) RETURNING id, link",
        )
        .bind(&input.link)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(platform_id = id, "Platform created.");
        Ok(Platform { id, link })
    }

    async fn update_platform(&self, id: RecordId, input: PlatformInput) -> Result<Platform, DbError> {
        let input = input.validated()?;
        let row = sqlx::query_as::<_, (RecordId, String)>(
            "UPDATE platforms SET link = $1 WHERE id = $2 RETURNING id, link",
        )
        .bind(&input.link)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let (id, link) = row.ok_or(DbError::NotFound)?;
        tracing::info!(platform_id = id, "Platform updated.");
        Ok(Platform { id, link })
    }

    async fn delete_platform(&self, id: RecordId) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM platforms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        tracing::info!(platform_id = id, "Platform deleted.");
        Ok(())
    }

    async fn find_platform_by_link(&self, link: &str) -> Result<Option<Platform>, DbError> {
        let row = sqlx::query_as::<_, (RecordId, String)>("SELECT id, link FROM platforms WHERE link = $1")
            .bind(link)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, link)| Platform { id, link }))
    }

    async fn get_or_create_platform(&self, link: &str) -> Result<Platform, DbError> {
        let input = PlatformInput::new(link).validated()?;
        let mut conn = self.pool.acquire().await?;
        upsert_platform(&mut *conn, &input.link).await
    }
}
