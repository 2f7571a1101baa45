//! Derived views over permission and role names.
//!
//! Permission names collected from the database are projected onto the
//! site builder's fixed capability set by [`get_user_builder_permission`].
//! Each recognised name applies one grant from a static rule table; names
//! without a rule are ignored.

use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::hash::Hash;

pub const DEFAULT_SITE_LIMIT: i64 = 12;
pub const DEFAULT_SECTION_LIMIT: i64 = 5;

/// Sign-in provider stored as an integer in `users.provider_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Default,
    Facebook,
    Google,
    Line,
    Unknown,
}

impl ProviderType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ProviderType::Default,
            1 => ProviderType::Facebook,
            2 => ProviderType::Google,
            3 => ProviderType::Line,
            _ => ProviderType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Default => "default",
            ProviderType::Facebook => "facebook",
            ProviderType::Google => "google",
            ProviderType::Line => "line",
            ProviderType::Unknown => "",
        }
    }
}

impl Serialize for ProviderType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Provider name for a `users.provider_type` code; empty when unknown.
pub fn user_provider_type(code: i64) -> &'static str {
    ProviderType::from_code(code).as_str()
}

/// Account tier, serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccountType {
    Admin = 1,
    Paid = 2,
    Free = 3,
}

impl AccountType {
    pub fn from_role(role: &str) -> Self {
        match role {
            "admin" => AccountType::Admin,
            "vip" | "premium" | "testing" => AccountType::Paid,
            _ => AccountType::Free,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl Serialize for AccountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Highest tier among `roles`; `Free` when there are none. A user holding
/// several roles is classified by the highest of them, so `admin` plus `vip`
/// yields `Admin`.
pub fn user_account_type<S: AsRef<str>>(roles: &[S]) -> AccountType {
    roles
        .iter()
        .map(|r| AccountType::from_role(r.as_ref()))
        .min()
        .unwrap_or(AccountType::Free)
}

/// Capabilities the site builder reads. Limits of 0 mean unlimited; the
/// integer flags are 1 (on) or 0 (off).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuilderPermission {
    pub admin: bool,
    pub sitelimit: i64,
    pub pagelimit: i64,
    pub sectionlimit: i64,
    /// Platform footer shown.
    pub footer: i64,
    /// User may pick the site code.
    pub sitecode: i64,
    pub gareport: i64,
    pub trackingcode: i64,
    pub shopsite: i64,
    pub productlimit: i64,
    /// No longer read by the builder but still expected in the payload.
    pub moduleusegroup: String,
    pub premium: i64,
}

impl Default for BuilderPermission {
    fn default() -> Self {
        Self {
            admin: false,
            sitelimit: DEFAULT_SITE_LIMIT,
            pagelimit: 0,
            sectionlimit: DEFAULT_SECTION_LIMIT,
            footer: 1,
            sitecode: 0,
            gareport: 0,
            trackingcode: 0,
            shopsite: 0,
            productlimit: 0,
            moduleusegroup: "all".to_string(),
            premium: 0,
        }
    }
}

type Grant = fn(&mut BuilderPermission);

fn grant_admin(p: &mut BuilderPermission) {
    p.admin = true;
    p.sitelimit = 0;
    p.sectionlimit = 0;
    p.footer = 0;
    p.sitecode = 1;
    p.gareport = 1;
    p.trackingcode = 1;
    p.shopsite = 1;
    p.premium = 1;
}

fn grant_unlimited_sites(p: &mut BuilderPermission) {
    p.sitelimit = 0;
}

fn grant_unlimited_sections(p: &mut BuilderPermission) {
    p.sectionlimit = 0;
}

fn grant_remove_logo(p: &mut BuilderPermission) {
    p.footer = 0;
}

fn grant_custom_url(p: &mut BuilderPermission) {
    p.sitecode = 1;
}

fn grant_pageviews_report(p: &mut BuilderPermission) {
    p.gareport = 1;
}

fn grant_tracking_code(p: &mut BuilderPermission) {
    p.trackingcode = 1;
}

fn grant_shop_site(p: &mut BuilderPermission) {
    p.shopsite = 1;
}

fn grant_premium_sections(p: &mut BuilderPermission) {
    p.premium = 1;
}

/// Applied in order; every grant only widens access so order does not
/// change the result.
static RULES: &[(&str, Grant)] = &[
    ("admin", grant_admin),
    ("unlimited_sites", grant_unlimited_sites),
    ("unlimited_sections", grant_unlimited_sections),
    ("remove_official_logo", grant_remove_logo),
    ("custom_url", grant_custom_url),
    ("pageviews_report", grant_pageviews_report),
    ("tracking_code", grant_tracking_code),
    ("shop_site", grant_shop_site),
    ("premium_sections", grant_premium_sections),
];

/// Project permission names onto the builder capability set.
pub fn get_user_builder_permission<S: AsRef<str>>(permissions: &[S]) -> BuilderPermission {
    let mut result = BuilderPermission::default();
    for (name, grant) in RULES {
        if permissions.iter().any(|p| p.as_ref() == *name) {
            grant(&mut result);
        }
    }
    result
}

/// Drop repeated items, keeping the first occurrence.
pub(crate) fn dedup_in_order<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
