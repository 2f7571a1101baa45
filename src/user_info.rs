//! Read side of the user domain: profile, roles, services and permissions.

use crate::db::Database;
use crate::models::{
    ExtraCrm, HelperPermission, Permission, Role, RolePermission, RoleQuota, Service,
    ServicePermission, ServiceSummary, SiteQuota, UserLimits, UserPermission, UserProfile,
    UserRecord, UserRole, UserService,
};
use crate::permissions::{
    dedup_in_order, get_user_builder_permission, user_account_type, ProviderType,
};
use crate::Result;
use rusqlite::named_params;
use tracing::{debug, warn};

/// Permission whose `user_permissions` row carries the site quota.
pub const SITE_QUOTA_PERMISSION: &str = "site_quota";

pub struct UserInfo<'a> {
    db: &'a Database,
}

impl<'a> UserInfo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Assemble the full profile of a user, or `None` if the user does not
    /// exist.
    pub fn get_user_info(&self, user_id: i64) -> Result<Option<UserProfile>> {
        debug!(user_id, "loading user profile");
        let Some(user) = self.db.query_first(
            "SELECT * FROM users WHERE id = :user_id",
            named_params! { ":user_id": user_id },
            UserRecord::from_row,
        )?
        else {
            return Ok(None);
        };

        let provider = ProviderType::from_code(user.provider_type);
        let roles = self.get_user_roles(user_id)?;
        let permissions = self.get_user_permissions(user_id)?;

        Ok(Some(UserProfile {
            id: user.id,
            uuid: user.uuid,
            user_id: user.id,
            user_acc: format!("{}#{}", user.email, provider.as_str()),
            user_email: user.email,
            user_provider_type: provider,
            user_avatar: user.avatar,
            user_nickname: user.name,
            user_locale: user.locale,
            user_account_type: user_account_type(&roles),
            user_roles: roles,
            user_role_quota: self.get_user_permissions_quota(user_id)?,
            user_services: self.get_user_services(user_id)?,
            user_limits: UserLimits::default(),
            user_crm: self.get_extra_crm_data(user_id)?,
            permissions: get_user_builder_permission(&permissions),
            user_permissions: permissions,
        }))
    }

    /// Every `user_services` row of the user, active or not.
    pub fn get_services_from_user(&self, user_id: i64) -> Result<Vec<UserService>> {
        self.db.query_all(
            "SELECT * FROM user_services WHERE user_id = :user_id ORDER BY id",
            named_params! { ":user_id": user_id },
            UserService::from_row,
        )
    }

    /// Active services with their localized titles.
    pub fn get_user_services(&self, user_id: i64) -> Result<Vec<ServiceSummary>> {
        let active = self.db.query_all(
            "SELECT * FROM user_services WHERE user_id = :user_id AND deactivate = 0 ORDER BY id",
            named_params! { ":user_id": user_id },
            UserService::from_row,
        )?;

        let locale = &self.db.config().service_title_locale;
        let mut services = Vec::new();
        for user_service in active {
            for service in self.get_services(user_service.service_id)? {
                let text = match service.title(locale) {
                    Ok(title) => title.unwrap_or_default(),
                    Err(err) => {
                        warn!(service_id = service.id, %err, "unreadable service text");
                        String::new()
                    }
                };
                services.push(ServiceSummary {
                    service_id: user_service.service_id,
                    text,
                });
            }
        }
        Ok(services)
    }

    /// Distinct role names of the user, in assignment order.
    pub fn get_user_roles(&self, user_id: i64) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for user_role in self.get_role_from_user(user_id)? {
            names.extend(
                self.get_role(user_role.role_id)?
                    .into_iter()
                    .map(|r| r.unique_name),
            );
        }
        Ok(dedup_in_order(names))
    }

    pub fn get_role_from_user(&self, user_id: i64) -> Result<Vec<UserRole>> {
        self.db.query_all(
            "SELECT * FROM user_roles WHERE user_id = :user_id ORDER BY id",
            named_params! { ":user_id": user_id },
            UserRole::from_row,
        )
    }

    pub fn get_permissions_from_role(&self, role_id: i64) -> Result<Vec<RolePermission>> {
        self.db.query_all(
            "SELECT * FROM role_permissions WHERE role_id = :role_id ORDER BY id",
            named_params! { ":role_id": role_id },
            RolePermission::from_row,
        )
    }

    pub fn get_role(&self, role_id: i64) -> Result<Vec<Role>> {
        self.db.query_all(
            "SELECT * FROM roles WHERE id = :role_id",
            named_params! { ":role_id": role_id },
            Role::from_row,
        )
    }

    /// Permission ids granted to the user through services, roles, direct
    /// grants and helper accounts, deduplicated in that order.
    pub fn get_user_permission_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let mut ids = Vec::new();

        for service in self.get_services_from_user(user_id)? {
            ids.extend(
                self.get_service_permissions(service.service_id)?
                    .iter()
                    .map(|p| p.permissions_id),
            );
        }

        for user_role in self.get_role_from_user(user_id)? {
            ids.extend(
                self.get_permissions_from_role(user_role.role_id)?
                    .iter()
                    .map(|p| p.permissions_id),
            );
        }

        // freeshop users hold their grants directly
        ids.extend(self.direct_permission_ids(user_id)?);

        ids.extend(
            self.get_helper_permissions(user_id)?
                .iter()
                .map(|p| p.permissions_id),
        );

        Ok(dedup_in_order(ids))
    }

    pub fn get_user_permissions(&self, user_id: i64) -> Result<Vec<String>> {
        let ids = self.get_user_permission_ids(user_id)?;
        let names = self.permission_names(&ids)?;
        debug!(user_id, count = names.len(), "resolved user permissions");
        Ok(names)
    }

    /// Names for `ids`; ids without a `permissions` row are skipped.
    pub fn permission_names(&self, ids: &[i64]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(ids.len());
        for id in ids {
            names.extend(
                self.get_permissions(*id)?
                    .into_iter()
                    .map(|p| p.unique_name),
            );
        }
        Ok(names)
    }

    pub fn get_service_permissions(&self, service_id: i64) -> Result<Vec<ServicePermission>> {
        self.db.query_all(
            "SELECT * FROM service_permissions WHERE service_id = :service_id ORDER BY id",
            named_params! { ":service_id": service_id },
            ServicePermission::from_row,
        )
    }

    pub fn get_permissions(&self, permission_id: i64) -> Result<Vec<Permission>> {
        self.db.query_all(
            "SELECT * FROM permissions WHERE id = :permission_id",
            named_params! { ":permission_id": permission_id },
            Permission::from_row,
        )
    }

    pub fn get_services(&self, service_id: i64) -> Result<Vec<Service>> {
        self.db.query_all(
            "SELECT * FROM services WHERE id = :service_id",
            named_params! { ":service_id": service_id },
            Service::from_row,
        )
    }

    pub fn get_extra_crm_data(&self, user_id: i64) -> Result<Option<ExtraCrm>> {
        self.db.query_first(
            "SELECT report_status FROM user_extra_crm WHERE user_id = :user_id",
            named_params! { ":user_id": user_id },
            |row| {
                Ok(ExtraCrm {
                    report_status: row.get("report_status")?,
                })
            },
        )
    }

    pub fn get_permissions_from_user(&self, user_id: i64) -> Result<Vec<UserPermission>> {
        self.db.query_all(
            "SELECT * FROM user_permissions WHERE user_id = :user_id ORDER BY id",
            named_params! { ":user_id": user_id },
            UserPermission::from_row,
        )
    }

    fn direct_permission_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.db.query_all(
            "SELECT permissions_id FROM user_permissions WHERE user_id = :user_id ORDER BY id",
            named_params! { ":user_id": user_id },
            |row| row.get(0),
        )
    }

    /// Grants held by the user's live helper accounts.
    pub fn get_helper_permissions(&self, user_id: i64) -> Result<Vec<HelperPermission>> {
        self.db.query_all(
            r#"
            SELECT hp.id, hp.helper_id, hp.permissions_id
            FROM helper_permissions hp
            INNER JOIN crm_helpers h ON h.id = hp.helper_id
            WHERE h.user_id = :user_id AND h.deleted_at IS NULL
            ORDER BY hp.id
            "#,
            named_params! { ":user_id": user_id },
            HelperPermission::from_row,
        )
    }

    /// Distinct quota triples of the user's roles.
    pub fn get_user_role_quota(&self, user_id: i64) -> Result<Vec<RoleQuota>> {
        let mut quotas = Vec::new();
        for user_role in self.get_role_from_user(user_id)? {
            quotas.extend(self.get_role(user_role.role_id)?.iter().map(Role::quota));
        }
        Ok(dedup_in_order(quotas))
    }

    /// The user's site quota; empty when no quota has been granted.
    pub fn get_user_permissions_quota(&self, user_id: i64) -> Result<Vec<SiteQuota>> {
        let Some(permissions_id) = self.get_permissions_id(SITE_QUOTA_PERMISSION)? else {
            return Ok(Vec::new());
        };
        let quota = self.db.query_first(
            r#"
            SELECT * FROM user_permissions
            WHERE user_id = :user_id AND permissions_id = :permissions_id
            ORDER BY id
            "#,
            named_params! { ":user_id": user_id, ":permissions_id": permissions_id },
            SiteQuota::from_row,
        )?;
        Ok(quota.into_iter().collect())
    }

    pub fn get_permissions_id(&self, unique_name: &str) -> Result<Option<i64>> {
        self.db.query_first(
            "SELECT id FROM permissions WHERE unique_name = :unique_name",
            named_params! { ":unique_name": unique_name },
            |row| row.get(0),
        )
    }
}
