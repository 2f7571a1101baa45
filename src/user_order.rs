//! Order lookups used by the billing jobs.

use crate::db::Database;
use crate::models::{OrderItem, RenewalOrder, TransactionRecord};
use crate::value::{row_to_map, Row};
use crate::Result;
use chrono::Utc;
use rusqlite::named_params;
use tracing::debug;

const SECONDS_PER_DAY: i64 = 86_400;

pub struct UserOrder<'a> {
    db: &'a Database,
}

impl<'a> UserOrder<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Paid, live orders on the renewal platform that have a stored card
    /// and at least one recurring item. One row per billing interval and
    /// order; `frequency` is in seconds. When several items share an
    /// interval the row carries the lowest item name.
    pub fn get_renewal_orders(&self) -> Result<Vec<RenewalOrder>> {
        let platform = &self.db.config().renewal_platform;
        debug!(%platform, "loading renewal orders");
        self.db.query_all(
            r#"
            SELECT id, user_id, frequency, MIN(service_unique_name) AS service_unique_name, created_at FROM (
                SELECT o.id,
                    o.user_id,
                    (oi.frequency * :seconds_per_day) AS frequency,
                    oi.service_unique_name,
                    CAST(strftime('%s', o.created_at) AS INTEGER) AS created_at
                FROM user_orders o
                INNER JOIN user_order_items oi ON oi.order_id = o.id
                WHERE o.platform = :platform
                AND o.card_key IS NOT NULL AND o.card_key <> ''
                AND o.card_token IS NOT NULL AND o.card_token <> ''
                AND o.status = 1
                AND o.deleted_at IS NULL
                AND oi.frequency > 0
            ) t
            GROUP BY frequency, id
            ORDER BY id, frequency
            "#,
            named_params! { ":platform": platform, ":seconds_per_day": SECONDS_PER_DAY },
            RenewalOrder::from_row,
        )
    }

    /// The newest billing period of an order.
    pub fn get_last_transaction_record(&self, order_id: i64) -> Result<Option<TransactionRecord>> {
        self.db.query_first(
            r#"
            SELECT id, order_id,
                CASE WHEN deleted_at IS NULL THEN 1 ELSE 0 END AS status,
                CAST(strftime('%s', created_at) AS INTEGER) AS created_at
            FROM user_order_periods
            WHERE order_id = :order_id
            ORDER BY id DESC
            LIMIT 1
            "#,
            named_params! { ":order_id": order_id },
            TransactionRecord::from_row,
        )
    }

    /// Ids of unpaid orders older than the configured grace period.
    pub fn get_unpaid_orders(&self) -> Result<Vec<i64>> {
        self.get_unpaid_orders_at(Utc::now().timestamp())
    }

    /// Same as [`get_unpaid_orders`](Self::get_unpaid_orders) with `now` as
    /// a unix timestamp.
    pub fn get_unpaid_orders_at(&self, now: i64) -> Result<Vec<i64>> {
        let from = now - self.db.config().unpaid_order_grace_secs;
        self.db.query_all(
            r#"
            SELECT o.id
            FROM user_orders o
            WHERE o.status = 0
            AND o.pay_status = 0 AND o.deleted_at IS NULL
            AND CAST(strftime('%s', o.created_at) AS INTEGER) <= :from
            ORDER BY o.id
            "#,
            named_params! { ":from": from },
            |row| row.get(0),
        )
    }

    /// The newest payment-gateway callback stored for an order.
    pub fn get_order_callbacks(&self, order_id: i64) -> Result<Option<Row>> {
        self.db.query_first(
            r#"
            SELECT * FROM user_order_callbacks
            WHERE order_id = :order_id
            ORDER BY id DESC
            LIMIT 1
            "#,
            named_params! { ":order_id": order_id },
            row_to_map,
        )
    }

    pub fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        self.db.query_all(
            "SELECT * FROM user_order_items WHERE order_id = :order_id ORDER BY id",
            named_params! { ":order_id": order_id },
            OrderItem::from_row,
        )
    }

    /// Customer feedback left on an order, newest first.
    pub fn get_order_feedback(&self, order_id: i64) -> Result<Vec<Row>> {
        self.db.query_all(
            "SELECT * FROM user_order_feedback WHERE order_id = :order_id ORDER BY id DESC",
            named_params! { ":order_id": order_id },
            row_to_map,
        )
    }
}
