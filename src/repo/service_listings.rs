//! `services` access, joined with the owning contractor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::policy::FeedScope;
use crate::domain::service_listings::{NewService, ServiceListing, ServiceStatus};
use crate::domain::service_type::ServiceType;
use crate::domain::users::{Role, UserSummary};

const SELECT_SERVICES: &str = r#"
    SELECT s.id, s.contractor_id, s.title, s.description, s.service_type::text AS service_type,
           s.coverage_area, s.reference_price,
           COALESCE(s.images, ARRAY[]::text[]) AS images,
           s.video_url, s.status::text AS status, s.created_at,
           u.id AS contractor_user_id,
           u.name AS contractor_name,
           u.role::text AS contractor_role,
           u.base_location AS contractor_base_location,
           u.phone AS contractor_phone,
           COALESCE(u.reputation_avg, 0)::float8 AS contractor_reputation_avg
    FROM services s
    LEFT JOIN users_public u ON u.id = s.contractor_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    contractor_id: Uuid,
    title: String,
    description: Option<String>,
    service_type: String,
    coverage_area: Option<String>,
    reference_price: Option<Decimal>,
    images: Vec<String>,
    video_url: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    contractor_user_id: Option<Uuid>,
    contractor_name: Option<String>,
    contractor_role: Option<String>,
    contractor_base_location: Option<String>,
    contractor_phone: Option<String>,
    contractor_reputation_avg: Option<f64>,
}

impl From<ServiceRow> for ServiceListing {
    fn from(row: ServiceRow) -> Self {
        let contractor = row.contractor_user_id.map(|id| UserSummary {
            id,
            name: row.contractor_name,
            role: row.contractor_role.map(Role::from).unwrap_or(Role::Unrecognized),
            base_location: row.contractor_base_location,
            phone: row.contractor_phone,
            reputation_avg: row.contractor_reputation_avg.unwrap_or_default(),
        });

        Self {
            id: row.id,
            contractor_id: row.contractor_id,
            title: row.title,
            description: row.description,
            service_type: ServiceType::from(row.service_type),
            coverage_area: row.coverage_area,
            reference_price: row.reference_price,
            images: row.images,
            video_url: row.video_url,
            status: ServiceStatus::from(row.status),
            created_at: row.created_at,
            contractor,
        }
    }
}

/// Newest first
pub async fn list(pool: &PgPool, scope: FeedScope) -> Result<Vec<ServiceListing>, sqlx::Error> {
    let rows = match scope {
        FeedScope::Empty => return Ok(Vec::new()),
        FeedScope::Own(owner_id) => {
            let sql = format!(
                "{} WHERE s.contractor_id = $1 ORDER BY s.created_at DESC",
                SELECT_SERVICES
            );
            sqlx::query_as::<_, ServiceRow>(&sql)
                .bind(owner_id)
                .fetch_all(pool)
                .await?
        }
        FeedScope::AllOpen => {
            let sql = format!(
                "{} WHERE s.status = 'active' ORDER BY s.created_at DESC",
                SELECT_SERVICES
            );
            sqlx::query_as::<_, ServiceRow>(&sql).fetch_all(pool).await?
        }
    };

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<ServiceListing>, sqlx::Error> {
    let sql = format!("{} WHERE s.id = $1", SELECT_SERVICES);

    let row = sqlx::query_as::<_, ServiceRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

/// New services start out active
pub async fn insert(
    pool: &PgPool,
    contractor_id: Uuid,
    service: &NewService,
    images: &[String],
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO services (contractor_id, service_type, title, description,
                              coverage_area, reference_price, images, video_url, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active')
        RETURNING id
        "#,
    )
    .bind(contractor_id)
    .bind(service.service_type.as_str())
    .bind(&service.title)
    .bind(&service.description)
    .bind(&service.coverage_area)
    .bind(service.reference_price)
    .bind(images)
    .bind(&service.video_url)
    .fetch_one(pool)
    .await
}

/// Returns false when the service does not exist or is not owned by `owner_id`.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    owner_id: Uuid,
    status: ServiceStatus,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE services SET status = $3 WHERE id = $1 AND contractor_id = $2")
            .bind(id)
            .bind(owner_id)
            .bind(status.as_str())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
