//! Repository for the `campaign_members` table.
//!
//! The write methods take `&mut PgConnection` because the membership upsert
//! and the member-removal cascade are multi-statement operations that the
//! handlers run inside one transaction.

use sqlx::{PgConnection, PgPool};
use ttrpg_core::roles::CampaignRole;
use ttrpg_core::types::DbId;

use crate::models::member::{CampaignMember, MemberWithUser};

const COLUMNS: &str = "campaign_id, user_id, role, joined_at";

const WITH_USER_COLUMNS: &str = "m.user_id, u.username, u.email, m.role, m.joined_at";

/// Provides operations on the campaign membership relation.
pub struct MemberRepo;

impl MemberRepo {
    /// Find a membership row.
    pub async fn find(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<Option<CampaignMember>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM campaign_members WHERE campaign_id = $1 AND user_id = $2");
        sqlx::query_as::<_, CampaignMember>(&query)
            .bind(campaign_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a membership row with a row lock, serializing concurrent
    /// upserts on the same pair. Transaction-scoped.
    pub async fn find_locked(
        conn: &mut PgConnection,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<Option<CampaignMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_members
             WHERE campaign_id = $1 AND user_id = $2
             FOR UPDATE"
        );
        sqlx::query_as::<_, CampaignMember>(&query)
            .bind(campaign_id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Atomic insert-if-absent via the store's upsert primitive. Returns
    /// `true` when this call inserted the row; a concurrent writer winning
    /// the race yields `false` instead of a constraint error.
    pub async fn insert_if_absent(
        conn: &mut PgConnection,
        campaign_id: DbId,
        user_id: DbId,
        role: CampaignRole,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO campaign_members (campaign_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (campaign_id, user_id) DO NOTHING",
        )
        .bind(campaign_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the role of an existing membership row.
    ///
    /// Returns `None` if the pair has no row.
    pub async fn update_role(
        conn: &mut PgConnection,
        campaign_id: DbId,
        user_id: DbId,
        role: CampaignRole,
    ) -> Result<Option<CampaignMember>, sqlx::Error> {
        let query = format!(
            "UPDATE campaign_members SET role = $3
             WHERE campaign_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignMember>(&query)
            .bind(campaign_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_optional(conn)
            .await
    }

    /// Remove a membership row. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM campaign_members WHERE campaign_id = $1 AND user_id = $2")
                .bind(campaign_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a campaign's members with their public user fields, GM first,
    /// then by join time.
    pub async fn list_with_users(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<MemberWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM campaign_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.campaign_id = $1
             ORDER BY m.role ASC, m.joined_at ASC"
        );
        sqlx::query_as::<_, MemberWithUser>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// A single member joined with their public user fields.
    pub async fn get_with_user(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<Option<MemberWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_USER_COLUMNS} FROM campaign_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.campaign_id = $1 AND m.user_id = $2"
        );
        sqlx::query_as::<_, MemberWithUser>(&query)
            .bind(campaign_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the user participates in the campaign (any role).
    pub async fn exists(
        pool: &PgPool,
        campaign_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM campaign_members WHERE campaign_id = $1 AND user_id = $2)",
        )
        .bind(campaign_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
