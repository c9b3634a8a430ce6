use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::entities::{JobListing, NewListing};

/// Persistence seam for job listings. `exists` is the dedup gate the
/// pipeline consults before spending an extraction call; `upsert` is
/// insert-if-absent returning the existing row's id on conflict.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn exists(&self, video_id: &str) -> Result<bool>;

    async fn upsert(&self, listing: &NewListing) -> Result<i64>;
}

#[derive(Clone)]
pub struct ListingRepository {
    pool: Pool<Postgres>,
}

impl ListingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find_by_video_id(&self, video_id: &str) -> Result<Option<JobListing>> {
        let listing = sqlx::query_as::<_, JobListing>(
            r#"
            SELECT id, video_id, title, description, company_name, role, location,
                   apply_url, package_range, requirements, created_at
            FROM job_listings
            WHERE video_id = $1
            "#,
        )
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }
}

#[async_trait]
impl ListingStore for ListingRepository {
    async fn exists(&self, video_id: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i32>("SELECT 1 FROM job_listings WHERE video_id = $1")
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn upsert(&self, listing: &NewListing) -> Result<i64> {
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO job_listings (
                video_id, title, description, company_name,
                role, location, apply_url, package_range, requirements
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (video_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&listing.video_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.company_name)
        .bind(&listing.role)
        .bind(&listing.location)
        .bind(&listing.apply_url)
        .bind(&listing.package_range)
        .bind(&listing.requirements)
        .fetch_optional(&self.pool)
        .await?;

        // Conflict means a concurrent writer got there first; hand back the
        // committed row's id instead of erroring.
        match inserted {
            Some(id) => Ok(id),
            None => {
                let id =
                    sqlx::query_scalar::<_, i64>("SELECT id FROM job_listings WHERE video_id = $1")
                        .bind(&listing.video_id)
                        .fetch_one(&self.pool)
                        .await?;
                Ok(id)
            }
        }
    }
}
