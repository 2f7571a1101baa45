//! Site lookups and site-level permissions.

use crate::db::Database;
use crate::permissions::{dedup_in_order, get_user_builder_permission, BuilderPermission};
use crate::user_info::UserInfo;
use crate::value::{row_to_map, Row};
use crate::Result;
use rusqlite::named_params;
use tracing::{debug, info};

pub struct UserSite<'a> {
    db: &'a Database,
}

impl<'a> UserSite<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// A site that has not been soft-deleted.
    pub fn get_site(&self, site_id: i64) -> Result<Option<Row>> {
        self.db.query_first(
            "SELECT * FROM sites WHERE id = :site_id AND deleted_at IS NULL",
            named_params! { ":site_id": site_id },
            row_to_map,
        )
    }

    /// Detach the custom domain and clear the subdomain flag.
    pub fn del_custom_domain(&self, site_id: i64) -> Result<bool> {
        let updated = self.db.execute(
            "UPDATE sites SET custom_domain = NULL, is_subdomain = 0 WHERE id = :site_id",
            named_params! { ":site_id": site_id },
        )?;
        if updated {
            info!(site_id, "custom domain removed");
        }
        Ok(updated)
    }

    /// Users linked to the site.
    pub fn get_site_owners(&self, site_id: i64) -> Result<Vec<i64>> {
        self.db.query_all(
            "SELECT user_id FROM user_sites WHERE site_id = :site_id ORDER BY id",
            named_params! { ":site_id": site_id },
            |row| row.get(0),
        )
    }

    /// Pro services currently active on the site.
    pub fn get_site_pro_services(&self, site_id: i64) -> Result<Vec<i64>> {
        self.db.query_all(
            r#"
            SELECT pro_service_id FROM site_pro_services
            WHERE site_id = :site_id AND deactivate = 0
            ORDER BY id
            "#,
            named_params! { ":site_id": site_id },
            |row| row.get(0),
        )
    }

    fn pro_service_permission_ids(&self, pro_service_id: i64) -> Result<Vec<i64>> {
        self.db.query_all(
            r#"
            SELECT permissions_id FROM pro_service_permissions
            WHERE pro_service_id = :pro_service_id
            ORDER BY id
            "#,
            named_params! { ":pro_service_id": pro_service_id },
            |row| row.get(0),
        )
    }

    /// Permission names in effect on a site: everything its owners hold,
    /// followed by what its active pro services add.
    pub fn get_site_permissions(&self, site_id: i64) -> Result<Vec<String>> {
        let info = UserInfo::new(self.db);
        let mut ids = Vec::new();
        for user_id in self.get_site_owners(site_id)? {
            ids.extend(info.get_user_permission_ids(user_id)?);
        }
        for pro_service_id in self.get_site_pro_services(site_id)? {
            ids.extend(self.pro_service_permission_ids(pro_service_id)?);
        }

        let names = info.permission_names(&dedup_in_order(ids))?;
        debug!(site_id, count = names.len(), "resolved site permissions");
        Ok(names)
    }

    pub fn get_site_builder_permission(&self, site_id: i64) -> Result<BuilderPermission> {
        Ok(get_user_builder_permission(&self.get_site_permissions(site_id)?))
    }
}
