//! Write side of the user domain: role, quota, service and site links.

use crate::db::Database;
use crate::models::{QuotaUpdate, RoleQuota, UserRole};
use crate::Result;
use chrono::{Duration, NaiveDateTime, Utc};
use rusqlite::named_params;
use tracing::{debug, info, warn};

/// Format of the `user_services` timestamps.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct UserEdit<'a> {
    db: &'a Database,
}

impl<'a> UserEdit<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the user's role with `role_id`.
    pub fn set_role(&self, user_id: i64, role_id: i64) -> Result<bool> {
        self.del_role(user_id)?;
        let inserted = self.db.execute(
            "INSERT INTO user_roles (user_id, role_id) VALUES (:user_id, :role_id)",
            named_params! { ":user_id": user_id, ":role_id": role_id },
        )?;
        if inserted {
            info!(user_id, role_id, "role assigned");
        }
        Ok(inserted)
    }

    pub fn del_role(&self, user_id: i64) -> Result<bool> {
        debug!(user_id, "removing roles");
        self.db.execute(
            "DELETE FROM user_roles WHERE user_id = :user_id",
            named_params! { ":user_id": user_id },
        )
    }

    pub fn get_role_quota(&self, role_id: i64) -> Result<Option<RoleQuota>> {
        self.db.query_first(
            "SELECT brand_quota, ec_quota, ezec_quota FROM roles WHERE id = :role_id",
            named_params! { ":role_id": role_id },
            |row| {
                Ok(RoleQuota {
                    brand_quota: row.get("brand_quota")?,
                    ec_quota: row.get("ec_quota")?,
                    ezec_quota: row.get("ezec_quota")?,
                })
            },
        )
    }

    /// The user's first role assignment.
    pub fn get_user_role(&self, user_id: i64) -> Result<Option<UserRole>> {
        self.db.query_first(
            "SELECT * FROM user_roles WHERE user_id = :user_id ORDER BY id LIMIT 1",
            named_params! { ":user_id": user_id },
            UserRole::from_row,
        )
    }

    /// Replace the user's site quota grant.
    ///
    /// Unset available counters are taken from the user's role quota, or 0
    /// when the user has no role; the other unset counters are 0.
    pub fn set_quota(&self, user_id: i64, permissions_id: i64, quota: &QuotaUpdate) -> Result<bool> {
        let role_quota = match self.get_user_role(user_id)? {
            Some(user_role) => self.get_role_quota(user_role.role_id)?.unwrap_or_default(),
            None => RoleQuota::default(),
        };
        let quota = quota.resolve(role_quota);

        self.del_quota(user_id)?;
        let inserted = self.db.execute(
            r#"
            INSERT INTO user_permissions (
                user_id, permissions_id,
                original_brand_quota, original_ec_quota, original_ezec_quota,
                available_brand_quota, available_ec_quota, available_ezec_quota,
                used_brand_quota, used_ec_quota, used_ezec_quota
            ) VALUES (
                :user_id, :permissions_id,
                :original_brand_quota, :original_ec_quota, :original_ezec_quota,
                :available_brand_quota, :available_ec_quota, :available_ezec_quota,
                :used_brand_quota, :used_ec_quota, :used_ezec_quota
            )
            "#,
            named_params! {
                ":user_id": user_id,
                ":permissions_id": permissions_id,
                ":original_brand_quota": quota.original_brand_quota,
                ":original_ec_quota": quota.original_ec_quota,
                ":original_ezec_quota": quota.original_ezec_quota,
                ":available_brand_quota": quota.available_brand_quota,
                ":available_ec_quota": quota.available_ec_quota,
                ":available_ezec_quota": quota.available_ezec_quota,
                ":used_brand_quota": quota.used_brand_quota,
                ":used_ec_quota": quota.used_ec_quota,
                ":used_ezec_quota": quota.used_ezec_quota,
            },
        )?;
        if inserted {
            info!(user_id, permissions_id, "site quota set");
        }
        Ok(inserted)
    }

    /// Delete the user's site quota grant.
    pub fn del_quota(&self, user_id: i64) -> Result<bool> {
        self.db.execute(
            "DELETE FROM user_permissions WHERE user_id = :user_id AND permissions_id = :permissions_id",
            named_params! {
                ":user_id": user_id,
                ":permissions_id": self.db.config().site_quota_permission_id,
            },
        )
    }

    pub fn set_services(
        &self,
        user_id: i64,
        service_id: i64,
        activated_at: Option<&str>,
        expire_at: Option<&str>,
    ) -> Result<bool> {
        let inserted = self.db.execute(
            r#"
            INSERT INTO user_services (user_id, service_id, activated_at, expire_at)
            VALUES (:user_id, :service_id, :activated_at, :expire_at)
            "#,
            named_params! {
                ":user_id": user_id,
                ":service_id": service_id,
                ":activated_at": activated_at,
                ":expire_at": expire_at,
            },
        )?;
        if inserted {
            info!(user_id, service_id, ?expire_at, "service granted");
        }
        Ok(inserted)
    }

    /// Move the expiry of the `user_services` row `id`.
    pub fn update_services(&self, id: i64, expire_at: Option<&str>) -> Result<bool> {
        self.db.execute(
            "UPDATE user_services SET expire_at = :expire_at WHERE id = :id",
            named_params! { ":id": id, ":expire_at": expire_at },
        )
    }

    /// Start the freeshop trial now.
    pub fn set_user_for_freeshop(&self, user_id: i64, quota: &QuotaUpdate) -> Result<bool> {
        self.set_user_for_freeshop_at(user_id, quota, Utc::now().naive_utc())
    }

    /// Grant the freeshop service and its site quota as one transaction.
    ///
    /// Returns false, with nothing written, when either insert affects no
    /// rows. Errors also roll back before propagating.
    pub fn set_user_for_freeshop_at(
        &self,
        user_id: i64,
        quota: &QuotaUpdate,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let config = self.db.config();
        let activated_at = now.format(DATETIME_FORMAT).to_string();
        let expire_at = (now + Duration::days(config.freeshop_trial_days))
            .format(DATETIME_FORMAT)
            .to_string();

        let tx = self.db.connection().unchecked_transaction()?;
        if !self.set_services(
            user_id,
            config.freeshop_service_id,
            Some(&activated_at),
            Some(&expire_at),
        )? {
            warn!(user_id, "freeshop service insert affected no rows, rolling back");
            tx.rollback()?;
            return Ok(false);
        }
        if !self.set_quota(user_id, config.site_quota_permission_id, quota)? {
            warn!(user_id, "freeshop quota insert affected no rows, rolling back");
            tx.rollback()?;
            return Ok(false);
        }
        tx.commit()?;

        info!(user_id, %expire_at, "freeshop trial started");
        Ok(true)
    }

    pub fn del_user_site_from_user_id(&self, user_id: i64) -> Result<bool> {
        self.db.execute(
            "DELETE FROM user_sites WHERE user_id = :user_id",
            named_params! { ":user_id": user_id },
        )
    }

    pub fn del_user_site_from_site_id(&self, site_id: i64) -> Result<bool> {
        self.db.execute(
            "DELETE FROM user_sites WHERE site_id = :site_id",
            named_params! { ":site_id": site_id },
        )
    }

    /// Flag every `service_id` row of the user as over its allowance (or
    /// clear the flag). The column holds 1 or 0.
    pub fn set_service_expired(&self, user_id: i64, service_id: i64, has_exceed: bool) -> Result<bool> {
        self.db.execute(
            r#"
            UPDATE user_services SET has_exceed = :has_exceed
            WHERE user_id = :user_id AND service_id = :service_id
            "#,
            named_params! {
                ":user_id": user_id,
                ":service_id": service_id,
                ":has_exceed": has_exceed,
            },
        )
    }
}
