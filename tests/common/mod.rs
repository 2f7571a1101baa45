#![allow(dead_code)]

use hk_user::{user_domain_schema, Database, StoreConfig};
use tempfile::NamedTempFile;

// Helper function to create an in-memory database with the user-domain tables
pub fn create_test_db() -> hk_user::Result<Database> {
    Database::open(StoreConfig::in_memory().with_schema(user_domain_schema()))
}

// Helper function to create a temporary file-based database
pub fn create_temp_db() -> anyhow::Result<(Database, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let path = temp_file
        .path()
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("temp path is not utf-8"))?
        .to_string();
    let db = Database::open(StoreConfig::new(path).with_schema(user_domain_schema()))?;
    Ok((db, temp_file))
}

pub fn create_seeded_db() -> anyhow::Result<Database> {
    let db = create_test_db()?;
    seed(&db)?;
    Ok(db)
}

pub fn seed(db: &Database) -> rusqlite::Result<()> {
    db.connection().execute_batch(SEED)
}

/// 2024-01-01 00:00:00 UTC
pub const JAN_1_2024: i64 = 1_704_067_200;

// alice (1): vip role, platinum service, site quota grant
// bob (2): no role, one live and one deleted helper account, owns site 10
// carol (3): admin role
const SEED: &str = r#"
INSERT INTO permissions (id, unique_name) VALUES
    (1, 'admin'),
    (2, 'unlimited_sites'),
    (3, 'shop_site'),
    (4, 'custom_url'),
    (5, 'tracking_code'),
    (6, 'premium_sections'),
    (7, 'pageviews_report'),
    (28, 'site_quota');

INSERT INTO roles (id, unique_name, brand_quota, ec_quota, ezec_quota) VALUES
    (1, 'admin', 0, 0, 0),
    (2, 'vip', 3, 2, 1),
    (3, 'freeshop', 1, 1, 0);

INSERT INTO role_permissions (role_id, permissions_id) VALUES
    (1, 1),
    (2, 2),
    (2, 6);

INSERT INTO services (id, unique_name, text) VALUES
    (1, 'platinum_monthly', '{"zh_TW": {"title": "白金月繳"}, "en": {"title": "Platinum monthly"}}'),
    (4, 'tracking_setup', '{"zh_TW": {"title": "追蹤碼安裝"}}'),
    (9, 'legacy', 'not json'),
    (63, 'freeshop', '{"zh_TW": {"title": "免費開店"}}');

INSERT INTO service_permissions (service_id, permissions_id) VALUES
    (1, 2),
    (1, 4),
    (4, 5),
    (63, 3);

INSERT INTO users (id, uuid, email, provider_type, avatar, name, locale) VALUES
    (1, 'u-alice', 'alice@example.com', 2, 'https://cdn.example.com/a.png', 'Alice', 'zh_TW'),
    (2, 'u-bob', 'bob@example.com', 0, NULL, 'Bob', 'en'),
    (3, 'u-carol', 'carol@example.com', 3, NULL, NULL, NULL);

INSERT INTO user_roles (id, user_id, role_id) VALUES
    (1, 1, 2),
    (2, 3, 1);

INSERT INTO user_services (id, user_id, service_id, activated_at, expire_at, deactivate) VALUES
    (1, 1, 1, '2024-01-01 00:00:00', '2024-02-01 00:00:00', 0),
    (2, 1, 4, '2023-01-01 00:00:00', '2023-02-01 00:00:00', 1);

INSERT INTO user_permissions (
    id, user_id, permissions_id,
    original_brand_quota, original_ec_quota, original_ezec_quota,
    available_brand_quota, available_ec_quota, available_ezec_quota,
    used_brand_quota, used_ec_quota, used_ezec_quota
) VALUES (1, 1, 28, 3, 2, 1, 2, 2, 1, 1, 0, 0);

INSERT INTO user_extra_crm (user_id, report_status) VALUES (1, 1);

INSERT INTO crm_helpers (id, user_id, owner_id, deleted_at) VALUES
    (1, 2, 3, NULL),
    (2, 2, 3, '2024-01-05 00:00:00');

INSERT INTO helper_permissions (helper_id, permissions_id) VALUES
    (1, 3),
    (2, 1);

INSERT INTO sites (id, name, custom_domain, is_subdomain, deleted_at) VALUES
    (10, 'Bob Shop', 'shop.example.com', 1, NULL),
    (11, 'Old Site', NULL, 0, '2024-01-10 00:00:00');

INSERT INTO user_sites (user_id, site_id) VALUES
    (2, 10),
    (2, 11);

INSERT INTO site_pro_services (site_id, pro_service_id, deactivate) VALUES
    (10, 100, 0),
    (10, 101, 1);

INSERT INTO pro_service_permissions (pro_service_id, permissions_id) VALUES
    (100, 7),
    (101, 1);

INSERT INTO user_orders (id, user_id, platform, card_key, card_token, status, pay_status, created_at, deleted_at) VALUES
    (1, 1, 'TAPPAY', 'key-1', 'token-1', 1, 1, '2024-01-01 00:00:00', NULL),
    (2, 1, 'TAPPAY', '', 'token-2', 1, 1, '2024-01-01 00:00:00', NULL),
    (3, 2, 'ECPAY', 'key-3', 'token-3', 1, 1, '2024-01-01 00:00:00', NULL),
    (4, 2, 'TAPPAY', 'key-4', 'token-4', 1, 1, '2024-01-01 00:00:00', '2024-01-02 00:00:00'),
    (5, 3, 'TAPPAY', NULL, NULL, 0, 0, '2024-01-01 00:00:00', NULL),
    (6, 3, 'TAPPAY', NULL, NULL, 0, 0, '2024-01-01 00:59:00', NULL),
    (7, 3, 'TAPPAY', NULL, NULL, 0, 0, '2023-12-01 00:00:00', '2023-12-02 00:00:00');

INSERT INTO user_order_items (order_id, service_unique_name, frequency, price) VALUES
    (1, 'platinum_monthly', 30, 299),
    (1, 'tracking_yearly', 365, 990),
    (1, 'addon_monthly', 30, 99),
    (1, 'setup_fee', 0, 500),
    (2, 'platinum_monthly', 30, 299),
    (3, 'platinum_monthly', 30, 299),
    (4, 'platinum_monthly', 30, 299);

INSERT INTO user_order_periods (id, order_id, created_at, deleted_at) VALUES
    (1, 1, '2024-01-01 00:00:00', NULL),
    (2, 1, '2024-02-01 00:00:00', '2024-02-03 00:00:00');

INSERT INTO user_order_callbacks (id, order_id, payload) VALUES
    (1, 1, 'first'),
    (2, 1, 'second');

INSERT INTO user_order_feedback (id, order_id, rating, content) VALUES
    (1, 1, 5, 'great'),
    (2, 1, 4, 'fine');
"#;
