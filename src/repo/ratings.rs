//! `ratings` access

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::ratings::{NewRating, Rating, RatingAuthor};
use crate::domain::users::Role;

#[derive(Debug, sqlx::FromRow)]
struct RatingRow {
    id: Uuid,
    author_id: Uuid,
    target_id: Uuid,
    stars: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    author_name: Option<String>,
    author_role: Option<String>,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        let author = row.author_role.map(|role| RatingAuthor {
            name: row.author_name,
            role: Role::from(role),
        });

        Self {
            id: row.id,
            author_id: row.author_id,
            target_id: row.target_id,
            stars: row.stars,
            comment: row.comment,
            created_at: row.created_at,
            author,
        }
    }
}

/// Ratings received by `target_id`, newest first
pub async fn list_for_target(pool: &PgPool, target_id: Uuid) -> Result<Vec<Rating>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RatingRow>(
        r#"
        SELECT r.id, r.author_id, r.target_id, r.stars::int4 AS stars, r.comment, r.created_at,
               a.name AS author_name, a.role::text AS author_role
        FROM ratings r
        LEFT JOIN users_public a ON a.id = r.author_id
        WHERE r.target_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(target_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn insert(
    pool: &PgPool,
    author_id: Uuid,
    target_id: Uuid,
    rating: &NewRating,
) -> Result<Rating, sqlx::Error> {
    let row = sqlx::query_as::<_, RatingRow>(
        r#"
        WITH inserted AS (
            INSERT INTO ratings (author_id, target_id, stars, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author_id, target_id, stars, comment, created_at
        )
        SELECT i.id, i.author_id, i.target_id, i.stars::int4 AS stars, i.comment, i.created_at,
               a.name AS author_name, a.role::text AS author_role
        FROM inserted i
        LEFT JOIN users_public a ON a.id = i.author_id
        "#,
    )
    .bind(author_id)
    .bind(target_id)
    .bind(rating.stars)
    .bind(&rating.comment)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}
