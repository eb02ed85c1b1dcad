//! `lots` access

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::lots::{Lot, NewLot};

#[derive(Debug, sqlx::FromRow)]
struct LotRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    location: String,
    surface_total_ha: Option<Decimal>,
    created_at: DateTime<Utc>,
}

impl From<LotRow> for Lot {
    fn from(row: LotRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            location: row.location,
            surface_total_ha: row.surface_total_ha,
            created_at: row.created_at,
        }
    }
}

pub async fn list_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Lot>, sqlx::Error> {
    let rows = sqlx::query_as::<_, LotRow>(
        r#"
        SELECT id, owner_id, name, location, surface_total_ha, created_at
        FROM lots
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn is_owned_by(pool: &PgPool, lot_id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM lots WHERE id = $1 AND owner_id = $2)",
    )
    .bind(lot_id)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn insert(pool: &PgPool, owner_id: Uuid, lot: &NewLot) -> Result<Lot, sqlx::Error> {
    let row = sqlx::query_as::<_, LotRow>(
        r#"
        INSERT INTO lots (owner_id, name, location, surface_total_ha)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, name, location, surface_total_ha, created_at
        "#,
    )
    .bind(owner_id)
    .bind(&lot.name)
    .bind(&lot.location)
    .bind(lot.surface_total_ha)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}
