//! Row types for the user-domain tables.

use crate::permissions::{AccountType, BuilderPermission, ProviderType};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A row of `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub uuid: String,
    pub email: String,
    pub provider_type: i64,
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub locale: Option<String>,
}

impl UserRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            email: row.get("email")?,
            provider_type: row.get("provider_type")?,
            avatar: row.get("avatar")?,
            name: row.get("name")?,
            locale: row.get("locale")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub unique_name: String,
    pub brand_quota: i64,
    pub ec_quota: i64,
    pub ezec_quota: i64,
}

impl Role {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            unique_name: row.get("unique_name")?,
            brand_quota: row.get("brand_quota")?,
            ec_quota: row.get("ec_quota")?,
            ezec_quota: row.get("ezec_quota")?,
        })
    }

    pub fn quota(&self) -> RoleQuota {
        RoleQuota {
            brand_quota: self.brand_quota,
            ec_quota: self.ec_quota,
            ezec_quota: self.ezec_quota,
        }
    }
}

/// A row of `user_roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
}

impl UserRole {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            role_id: row.get("role_id")?,
        })
    }
}

/// A row of `role_permissions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: i64,
    pub role_id: i64,
    pub permissions_id: i64,
}

impl RolePermission {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            role_id: row.get("role_id")?,
            permissions_id: row.get("permissions_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub unique_name: String,
}

impl Permission {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            unique_name: row.get("unique_name")?,
        })
    }
}

/// A row of `services`. `text` holds localized JSON, e.g.
/// `{"zh_TW": {"title": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub unique_name: Option<String>,
    pub text: String,
}

impl Service {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            unique_name: row.get("unique_name")?,
            text: row.get("text")?,
        })
    }

    /// The title stored under `locale`, if the JSON has one.
    pub fn title(&self, locale: &str) -> crate::Result<Option<String>> {
        let text: serde_json::Value = serde_json::from_str(&self.text)?;
        Ok(text
            .get(locale)
            .and_then(|l| l.get("title"))
            .and_then(|t| t.as_str())
            .map(str::to_string))
    }
}

/// A row of `service_permissions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePermission {
    pub id: i64,
    pub service_id: i64,
    pub permissions_id: i64,
}

impl ServicePermission {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            service_id: row.get("service_id")?,
            permissions_id: row.get("permissions_id")?,
        })
    }
}

/// A row of `user_services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserService {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub activated_at: Option<String>,
    pub expire_at: Option<String>,
    pub deactivate: bool,
    pub has_exceed: bool,
}

impl UserService {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            service_id: row.get("service_id")?,
            activated_at: row.get("activated_at")?,
            expire_at: row.get("expire_at")?,
            deactivate: row.get("deactivate")?,
            has_exceed: row.get("has_exceed")?,
        })
    }
}

/// A row of `user_permissions`: a direct grant, optionally carrying the
/// site quota when it is the site-quota permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermission {
    pub id: i64,
    pub user_id: i64,
    pub permissions_id: i64,
    #[serde(flatten)]
    pub quota: SiteQuota,
}

impl UserPermission {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            permissions_id: row.get("permissions_id")?,
            quota: SiteQuota::from_row(row)?,
        })
    }
}

/// A row of `helper_permissions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperPermission {
    pub id: i64,
    pub helper_id: i64,
    pub permissions_id: i64,
}

impl HelperPermission {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            helper_id: row.get("helper_id")?,
            permissions_id: row.get("permissions_id")?,
        })
    }
}

/// Site allowances attached to a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleQuota {
    pub brand_quota: i64,
    pub ec_quota: i64,
    pub ezec_quota: i64,
}

/// The original/available/used triple per site category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteQuota {
    pub original_brand_quota: i64,
    pub original_ec_quota: i64,
    pub original_ezec_quota: i64,
    pub available_brand_quota: i64,
    pub available_ec_quota: i64,
    pub available_ezec_quota: i64,
    pub used_brand_quota: i64,
    pub used_ec_quota: i64,
    pub used_ezec_quota: i64,
}

impl SiteQuota {
    /// Unset quota columns read as 0; plain grants leave them NULL.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let quota = |name: &str| -> rusqlite::Result<i64> {
            Ok(row.get::<_, Option<i64>>(name)?.unwrap_or(0))
        };
        Ok(Self {
            original_brand_quota: quota("original_brand_quota")?,
            original_ec_quota: quota("original_ec_quota")?,
            original_ezec_quota: quota("original_ezec_quota")?,
            available_brand_quota: quota("available_brand_quota")?,
            available_ec_quota: quota("available_ec_quota")?,
            available_ezec_quota: quota("available_ezec_quota")?,
            used_brand_quota: quota("used_brand_quota")?,
            used_ec_quota: quota("used_ec_quota")?,
            used_ezec_quota: quota("used_ezec_quota")?,
        })
    }
}

/// Partial quota passed to `set_quota`; unset fields fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaUpdate {
    pub original_brand_quota: Option<i64>,
    pub original_ec_quota: Option<i64>,
    pub original_ezec_quota: Option<i64>,
    pub available_brand_quota: Option<i64>,
    pub available_ec_quota: Option<i64>,
    pub available_ezec_quota: Option<i64>,
    pub used_brand_quota: Option<i64>,
    pub used_ec_quota: Option<i64>,
    pub used_ezec_quota: Option<i64>,
}

impl QuotaUpdate {
    /// Original and used counters default to zero, available counters to
    /// the role's allowance.
    pub fn resolve(&self, role: RoleQuota) -> SiteQuota {
        SiteQuota {
            original_brand_quota: self.original_brand_quota.unwrap_or(0),
            original_ec_quota: self.original_ec_quota.unwrap_or(0),
            original_ezec_quota: self.original_ezec_quota.unwrap_or(0),
            available_brand_quota: self.available_brand_quota.unwrap_or(role.brand_quota),
            available_ec_quota: self.available_ec_quota.unwrap_or(role.ec_quota),
            available_ezec_quota: self.available_ezec_quota.unwrap_or(role.ezec_quota),
            used_brand_quota: self.used_brand_quota.unwrap_or(0),
            used_ec_quota: self.used_ec_quota.unwrap_or(0),
            used_ezec_quota: self.used_ezec_quota.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCrm {
    pub report_status: Option<i64>,
}

/// A service id with its display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLimits {
    pub site: i64,
    pub section: i64,
}

impl Default for UserLimits {
    fn default() -> Self {
        Self {
            site: crate::permissions::DEFAULT_SITE_LIMIT,
            section: crate::permissions::DEFAULT_SECTION_LIMIT,
        }
    }
}

/// Everything the platform needs about a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub uuid: String,
    pub user_id: i64,
    pub user_email: String,
    pub user_provider_type: ProviderType,
    /// `email#provider`
    pub user_acc: String,
    pub user_avatar: Option<String>,
    pub user_nickname: Option<String>,
    pub user_locale: Option<String>,
    pub user_account_type: AccountType,
    pub user_roles: Vec<String>,
    pub user_role_quota: Vec<SiteQuota>,
    pub user_permissions: Vec<String>,
    pub user_services: Vec<ServiceSummary>,
    pub user_limits: UserLimits,
    pub user_crm: Option<ExtraCrm>,
    pub permissions: BuilderPermission,
}

/// An order due for recurring billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalOrder {
    pub id: i64,
    pub user_id: i64,
    /// Billing interval in seconds.
    pub frequency: i64,
    pub service_unique_name: Option<String>,
    /// Unix timestamp.
    pub created_at: i64,
}

impl RenewalOrder {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            frequency: row.get("frequency")?,
            service_unique_name: row.get("service_unique_name")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// The latest billing period recorded for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub order_id: i64,
    /// 1 while the period is live, 0 once soft-deleted.
    pub status: i64,
    pub created_at: i64,
}

impl TransactionRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            order_id: row.get("order_id")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A row of `user_order_items`. `frequency` is in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub service_unique_name: Option<String>,
    pub frequency: i64,
    pub price: i64,
}

impl OrderItem {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            order_id: row.get("order_id")?,
            service_unique_name: row.get("service_unique_name")?,
            frequency: row.get("frequency")?,
            price: row.get("price")?,
        })
    }
}
