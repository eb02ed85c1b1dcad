//! `users_public` access

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::users::{NewProfile, ProfileChanges, Role, UserProfile};

const USER_COLUMNS: &str = r#"
    id, name, role::text AS role, base_location, phone, avatar_url,
    COALESCE(reputation_avg, 0)::float8 AS reputation_avg,
    COALESCE(reputation_count, 0)::int4 AS reputation_count,
    created_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: Option<String>,
    role: String,
    base_location: Option<String>,
    phone: Option<String>,
    avatar_url: Option<String>,
    reputation_avg: f64,
    reputation_count: i32,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            role: Role::from(row.role),
            base_location: row.base_location,
            phone: row.phone,
            avatar_url: row.avatar_url,
            reputation_avg: row.reputation_avg,
            reputation_count: row.reputation_count,
            created_at: row.created_at,
        }
    }
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users_public WHERE id = $1", USER_COLUMNS);

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

/// Returns `None` when a profile already exists for `id`.
pub async fn insert(
    pool: &PgPool,
    id: Uuid,
    profile: &NewProfile,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO users_public (id, name, role, base_location, phone)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(&profile.name)
        .bind(profile.role.as_str())
        .bind(&profile.base_location)
        .bind(&profile.phone)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

/// Role is never part of an update.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: &ProfileChanges,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE users_public SET
            name = COALESCE($2, name),
            base_location = COALESCE($3, base_location),
            phone = COALESCE($4, phone)
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.base_location)
        .bind(&changes.phone)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}
