//! Reference price stored procedures

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::prices::{PriceLookup, ReferencePrice};

#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    service_type: String,
    region: String,
    price_avg: Decimal,
    source: String,
    created_at: DateTime<Utc>,
}

impl From<PriceRow> for ReferencePrice {
    fn from(row: PriceRow) -> Self {
        Self {
            service_type: row.service_type,
            region: row.region,
            price_avg: row.price_avg,
            source: row.source,
            created_at: row.created_at,
        }
    }
}

/// Calls `get_reference_prices(p_service_type, p_region)`
pub async fn get_reference_prices(
    pool: &PgPool,
    lookup: &PriceLookup,
) -> Result<Vec<ReferencePrice>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PriceRow>(
        r#"
        SELECT service_type::text AS service_type,
               region::text AS region,
               price_avg::numeric AS price_avg,
               source::text AS source,
               created_at
        FROM get_reference_prices(p_service_type => $1, p_region => $2)
        "#,
    )
    .bind(&lookup.service_type)
    .bind(&lookup.region)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Calls `update_reference_prices()`
pub async fn update_reference_prices(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT update_reference_prices()")
        .execute(pool)
        .await?;
    Ok(())
}
