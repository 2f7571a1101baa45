use crate::schema::Schema;
use serde::Deserialize;

/// Database location plus the business constants the repositories rely on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
    pub foreign_keys: bool,
    pub busy_timeout_ms: u64,
    /// Service granted by the freeshop trial.
    pub freeshop_service_id: i64,
    /// Permission row whose `user_permissions` entry carries the site quota.
    pub site_quota_permission_id: i64,
    pub freeshop_trial_days: i64,
    /// Minimum age of an unpaid order before it is reported.
    pub unpaid_order_grace_secs: i64,
    pub renewal_platform: String,
    /// Key of the localized title inside `services.text`.
    pub service_title_locale: String,
    /// Tables created when the database is opened.
    #[serde(skip)]
    pub schema: Option<Schema>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: IN_MEMORY.to_string(),
            foreign_keys: true,
            busy_timeout_ms: 5_000,
            freeshop_service_id: 63,
            site_quota_permission_id: 28,
            freeshop_trial_days: 30,
            unpaid_order_grace_secs: 3_600,
            renewal_platform: "TAPPAY".to_string(),
            service_title_locale: "zh_TW".to_string(),
            schema: None,
        }
    }
}

pub(crate) const IN_MEMORY: &str = ":memory:";

impl StoreConfig {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_freeshop_service(mut self, service_id: i64, trial_days: i64) -> Self {
        self.freeshop_service_id = service_id;
        self.freeshop_trial_days = trial_days;
        self
    }

    pub fn with_site_quota_permission(mut self, permission_id: i64) -> Self {
        self.site_quota_permission_id = permission_id;
        self
    }

    pub fn with_renewal_platform(mut self, platform: impl Into<String>) -> Self {
        self.renewal_platform = platform.into();
        self
    }

    pub fn with_service_title_locale(mut self, locale: impl Into<String>) -> Self {
        self.service_title_locale = locale.into();
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path == IN_MEMORY
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.db_path.trim().is_empty() {
            return Err(crate::Error::Config("db_path must not be empty".into()));
        }
        if self.freeshop_trial_days < 0 {
            return Err(crate::Error::Config(format!(
                "freeshop_trial_days must not be negative, got {}",
                self.freeshop_trial_days
            )));
        }
        if self.unpaid_order_grace_secs < 0 {
            return Err(crate::Error::Config(format!(
                "unpaid_order_grace_secs must not be negative, got {}",
                self.unpaid_order_grace_secs
            )));
        }
        Ok(())
    }
}
