mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{create_seeded_db, create_temp_db, seed};
use hk_user::models::{QuotaUpdate, RoleQuota};
use hk_user::{Database, StoreConfig};

fn count(db: &Database, sql: &str) -> rusqlite::Result<i64> {
    db.connection().query_row(sql, [], |row| row.get(0))
}

#[test]
fn test_set_role_replaces_existing_roles() -> Result<()> {
    let db = create_seeded_db()?;
    let edit = db.user_edit();

    assert!(edit.set_role(1, 3)?);
    let roles = db.user_info().get_role_from_user(1)?;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].role_id, 3);
    assert_eq!(edit.get_user_role(1)?.map(|r| r.role_id), Some(3));
    Ok(())
}

#[test]
fn test_del_role_reports_whether_anything_changed() -> Result<()> {
    let db = create_seeded_db()?;
    let edit = db.user_edit();

    assert!(!edit.del_role(2)?);
    assert!(edit.del_role(1)?);
    assert!(edit.get_user_role(1)?.is_none());
    Ok(())
}

#[test]
fn test_get_role_quota() -> Result<()> {
    let db = create_seeded_db()?;
    let edit = db.user_edit();

    assert_eq!(
        edit.get_role_quota(2)?,
        Some(RoleQuota {
            brand_quota: 3,
            ec_quota: 2,
            ezec_quota: 1
        })
    );
    assert_eq!(edit.get_role_quota(99)?, None);
    Ok(())
}

#[test]
fn test_set_quota_defaults_available_to_role_quota() -> Result<()> {
    let db = create_seeded_db()?;
    let update = QuotaUpdate {
        used_brand_quota: Some(1),
        ..QuotaUpdate::default()
    };

    assert!(db.user_edit().set_quota(1, 28, &update)?);

    let grants = count(
        &db,
        "SELECT COUNT(*) FROM user_permissions WHERE user_id = 1 AND permissions_id = 28",
    )?;
    assert_eq!(grants, 1);

    let quota = db.user_info().get_user_permissions_quota(1)?;
    assert_eq!(quota.len(), 1);
    assert_eq!(quota[0].original_brand_quota, 0);
    assert_eq!(quota[0].available_brand_quota, 3);
    assert_eq!(quota[0].available_ec_quota, 2);
    assert_eq!(quota[0].available_ezec_quota, 1);
    assert_eq!(quota[0].used_brand_quota, 1);
    assert_eq!(quota[0].used_ec_quota, 0);
    Ok(())
}

#[test]
fn test_set_quota_without_role_uses_zero() -> Result<()> {
    let db = create_seeded_db()?;
    assert!(db.user_edit().set_quota(2, 28, &QuotaUpdate::default())?);

    let quota = db.user_info().get_user_permissions_quota(2)?;
    assert_eq!(quota[0].available_brand_quota, 0);
    assert_eq!(quota[0].available_ec_quota, 0);
    Ok(())
}

#[test]
fn test_del_quota_only_removes_site_quota_grant() -> Result<()> {
    let db = create_seeded_db()?;
    db.connection().execute(
        "INSERT INTO user_permissions (user_id, permissions_id) VALUES (1, 3)",
        [],
    )?;

    assert!(db.user_edit().del_quota(1)?);
    assert!(!db.user_edit().del_quota(1)?);
    let remaining: Vec<i64> = db
        .user_info()
        .get_permissions_from_user(1)?
        .iter()
        .map(|p| p.permissions_id)
        .collect();
    assert_eq!(remaining, vec![3]);
    Ok(())
}

#[test]
fn test_service_lifecycle() -> Result<()> {
    let db = create_seeded_db()?;
    let edit = db.user_edit();

    assert!(edit.set_services(3, 4, Some("2024-01-01 00:00:00"), None)?);
    let services = db.user_info().get_services_from_user(3)?;
    assert_eq!(services.len(), 1);
    assert!(services[0].expire_at.is_none());

    assert!(edit.update_services(services[0].id, Some("2025-01-01 00:00:00"))?);
    assert!(!edit.update_services(9_999, Some("2025-01-01 00:00:00"))?);

    assert!(edit.set_service_expired(3, 4, true)?);
    let service = &db.user_info().get_services_from_user(3)?[0];
    assert_eq!(service.expire_at.as_deref(), Some("2025-01-01 00:00:00"));
    assert!(service.has_exceed);
    assert_eq!(
        count(&db, "SELECT has_exceed FROM user_services WHERE user_id = 3")?,
        1
    );

    assert!(edit.set_service_expired(3, 4, false)?);
    assert!(!db.user_info().get_services_from_user(3)?[0].has_exceed);
    assert!(!edit.set_service_expired(3, 77, true)?);
    Ok(())
}

#[test]
fn test_set_user_for_freeshop_grants_trial() -> Result<()> {
    let db = create_seeded_db()?;
    let now = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date");
    let update = QuotaUpdate {
        available_brand_quota: Some(1),
        available_ec_quota: Some(1),
        ..QuotaUpdate::default()
    };

    assert!(db.user_edit().set_user_for_freeshop_at(2, &update, now)?);

    let services = db.user_info().get_services_from_user(2)?;
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_id, 63);
    assert_eq!(services[0].activated_at.as_deref(), Some("2024-03-01 12:00:00"));
    assert_eq!(services[0].expire_at.as_deref(), Some("2024-03-31 12:00:00"));

    let quota = db.user_info().get_user_permissions_quota(2)?;
    assert_eq!(quota[0].available_brand_quota, 1);
    assert_eq!(quota[0].available_ezec_quota, 0);

    let permissions = db.user_info().get_user_permissions(2)?;
    assert_eq!(permissions, vec!["shop_site", "site_quota"]);
    Ok(())
}

#[test]
fn test_set_user_for_freeshop_uses_configured_service() -> Result<()> {
    let db = Database::open(
        StoreConfig::in_memory()
            .with_schema(hk_user::user_domain_schema())
            .with_freeshop_service(4, 7),
    )?;
    seed(&db)?;

    assert!(db.user_edit().set_user_for_freeshop(2, &QuotaUpdate::default())?);
    let services = db.user_info().get_services_from_user(2)?;
    assert_eq!(services[0].service_id, 4);
    assert!(services[0].expire_at.is_some());
    Ok(())
}

#[test]
fn test_set_user_for_freeshop_rolls_back_when_quota_is_not_written() -> Result<()> {
    let db = create_seeded_db()?;
    db.connection().execute_batch(
        r#"
        CREATE TRIGGER skip_quota BEFORE INSERT ON user_permissions
        BEGIN SELECT RAISE(IGNORE); END;
        "#,
    )?;

    assert!(!db.user_edit().set_user_for_freeshop(2, &QuotaUpdate::default())?);
    assert!(db.user_info().get_services_from_user(2)?.is_empty());
    Ok(())
}

#[test]
fn test_set_user_for_freeshop_rolls_back_on_error() -> Result<()> {
    let db = create_seeded_db()?;
    db.connection().execute_batch(
        r#"
        CREATE TRIGGER lock_quota BEFORE INSERT ON user_permissions
        BEGIN SELECT RAISE(ABORT, 'quota locked'); END;
        "#,
    )?;

    let err = db
        .user_edit()
        .set_user_for_freeshop(2, &QuotaUpdate::default())
        .unwrap_err();
    assert!(err.to_string().contains("quota locked"));
    assert!(db.user_info().get_services_from_user(2)?.is_empty());
    assert!(db.connection().is_autocommit());
    Ok(())
}

#[test]
fn test_delete_user_sites() -> Result<()> {
    let db = create_seeded_db()?;
    let edit = db.user_edit();

    assert!(edit.del_user_site_from_site_id(11)?);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM user_sites")?, 1);
    assert!(edit.del_user_site_from_user_id(2)?);
    assert!(!edit.del_user_site_from_user_id(2)?);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM user_sites")?, 0);
    Ok(())
}

#[test]
fn test_writes_survive_reopen() -> Result<()> {
    let (db, temp_file) = create_temp_db()?;
    seed(&db)?;
    assert!(db.user_edit().set_role(2, 2)?);
    drop(db);

    let path = temp_file.path().to_string_lossy().into_owned();
    let db = Database::open(StoreConfig::new(path))?;
    assert_eq!(db.user_info().get_user_roles(2)?, vec!["vip"]);
    Ok(())
}
