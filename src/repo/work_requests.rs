//! `requests` access, joined with the producer and the optional lot

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::lots::LotSummary;
use crate::domain::policy::FeedScope;
use crate::domain::service_type::ServiceType;
use crate::domain::users::{Role, UserSummary};
use crate::domain::work_requests::{NewWorkRequest, RequestListing, RequestStatus};

const SELECT_REQUESTS: &str = r#"
    SELECT r.id, r.producer_id, r.service_type::text AS service_type, r.hectares, r.date_target,
           r.free_location, r.lot_id, r.status::text AS status, r.created_at,
           u.id AS producer_user_id,
           u.name AS producer_name,
           u.role::text AS producer_role,
           u.base_location AS producer_base_location,
           u.phone AS producer_phone,
           COALESCE(u.reputation_avg, 0)::float8 AS producer_reputation_avg,
           l.name AS lot_name,
           l.location AS lot_location
    FROM requests r
    LEFT JOIN users_public u ON u.id = r.producer_id
    LEFT JOIN lots l ON l.id = r.lot_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    producer_id: Uuid,
    service_type: String,
    hectares: Decimal,
    date_target: NaiveDate,
    free_location: Option<String>,
    lot_id: Option<Uuid>,
    status: String,
    created_at: DateTime<Utc>,
    producer_user_id: Option<Uuid>,
    producer_name: Option<String>,
    producer_role: Option<String>,
    producer_base_location: Option<String>,
    producer_phone: Option<String>,
    producer_reputation_avg: Option<f64>,
    lot_name: Option<String>,
    lot_location: Option<String>,
}

impl From<RequestRow> for RequestListing {
    fn from(row: RequestRow) -> Self {
        let producer = row.producer_user_id.map(|id| UserSummary {
            id,
            name: row.producer_name,
            role: row.producer_role.map(Role::from).unwrap_or(Role::Unrecognized),
            base_location: row.producer_base_location,
            phone: row.producer_phone,
            reputation_avg: row.producer_reputation_avg.unwrap_or_default(),
        });

        let lot = match (row.lot_id, row.lot_name, row.lot_location) {
            (Some(id), Some(name), Some(location)) => Some(LotSummary { id, name, location }),
            _ => None,
        };

        Self {
            id: row.id,
            producer_id: row.producer_id,
            service_type: ServiceType::from(row.service_type),
            hectares: row.hectares,
            date_target: row.date_target,
            free_location: row.free_location,
            lot_id: row.lot_id,
            status: RequestStatus::from(row.status),
            created_at: row.created_at,
            producer,
            lot,
        }
    }
}

/// Newest first
pub async fn list(pool: &PgPool, scope: FeedScope) -> Result<Vec<RequestListing>, sqlx::Error> {
    let rows = match scope {
        FeedScope::Empty => return Ok(Vec::new()),
        FeedScope::Own(owner_id) => {
            let sql = format!(
                "{} WHERE r.producer_id = $1 ORDER BY r.created_at DESC",
                SELECT_REQUESTS
            );
            sqlx::query_as::<_, RequestRow>(&sql)
                .bind(owner_id)
                .fetch_all(pool)
                .await?
        }
        FeedScope::AllOpen => {
            let sql = format!(
                "{} WHERE r.status = 'pending' ORDER BY r.created_at DESC",
                SELECT_REQUESTS
            );
            sqlx::query_as::<_, RequestRow>(&sql).fetch_all(pool).await?
        }
    };

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<RequestListing>, sqlx::Error> {
    let sql = format!("{} WHERE r.id = $1", SELECT_REQUESTS);

    let row = sqlx::query_as::<_, RequestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

/// New requests start out pending
pub async fn insert(
    pool: &PgPool,
    producer_id: Uuid,
    request: &NewWorkRequest,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO requests (producer_id, service_type, hectares, date_target,
                              free_location, lot_id, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending')
        RETURNING id
        "#,
    )
    .bind(producer_id)
    .bind(request.service_type.as_str())
    .bind(request.hectares)
    .bind(request.date_target)
    .bind(&request.free_location)
    .bind(request.lot_id)
    .fetch_one(pool)
    .await
}

/// Returns false when the request does not exist or is not owned by `owner_id`.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    status: RequestStatus,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE requests SET status = $3 WHERE id = $1 AND producer_id = $2")
            .bind(id)
            .bind(owner_id)
            .bind(status.as_str())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
