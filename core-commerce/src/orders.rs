//! Purchase history.

use crate::error::{expect_json, Result};
use crate::types::{OrderDetail, OrderSummary};
use core_auth::ApiGateway;
use std::sync::Arc;
use tracing::instrument;

const MY_ORDERS_ENDPOINT: &str = "orders/my-orders/";

#[derive(Clone)]
pub struct OrdersClient {
    gateway: Arc<ApiGateway>,
}

impl OrdersClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// The signed-in user's orders, newest first as returned by the server.
    pub async fn my_orders(&self) -> Result<Vec<OrderSummary>> {
        let response = self.gateway.get(MY_ORDERS_ENDPOINT).await?;
        expect_json(response)
    }

    /// One order with its shipping snapshot and line items.
    #[instrument(skip(self))]
    pub async fn order_detail(&self, order_id: &str) -> Result<OrderDetail> {
        let response = self.gateway.get(&format!("orders/{}/", order_id)).await?;
        expect_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{gateway, ScriptedHttpClient, BASE};

    #[tokio::test]
    async fn my_orders_parses_nested_line_items() {
        let http = Arc::new(ScriptedHttpClient::default());
        let url = format!("{}orders/my-orders/", BASE);
        http.script(
            &url,
            200,
            r#"[{"order_id": "ORD-2025-0001", "created_at": "2025-03-05T12:00:00Z",
                 "items": [{"id": 9, "thumbnail_url": "https://cdn.test/black.jpg",
                            "brand_slug": "flexit", "brand_name": "Flexit",
                            "product_title": "Oversized Tee"}]}]"#,
        )
        .await;

        let orders = OrdersClient::new(gateway(http).await)
            .my_orders()
            .await
            .unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "ORD-2025-0001");
        assert_eq!(orders[0].items[0].brand_slug, "flexit");
    }

    #[tokio::test]
    async fn order_detail_includes_shipping_snapshot() {
        let http = Arc::new(ScriptedHttpClient::default());
        let url = format!("{}orders/ORD-2025-0001/", BASE);
        http.script(
            &url,
            200,
            r#"{"order_id": "ORD-2025-0001", "created_at": "2025-03-05T12:00:00Z",
                "address": {"full_name": "Sam Doe", "address_line": "1 Main St",
                            "city": "Pune", "state": "MH", "postal_code": "411001",
                            "phone": "9999999999"},
                "items": [{"id": 9, "thumbnail_url": "https://cdn.test/black.jpg",
                           "brand_name": "Flexit", "product_title": "Oversized Tee",
                           "color": "Black", "size": "M", "quantity": 2}],
                "total_amount": 2398.0}"#,
        )
        .await;

        let detail = OrdersClient::new(gateway(http).await)
            .order_detail("ORD-2025-0001")
            .await
            .unwrap();

        assert_eq!(detail.address.city, "Pune");
        assert_eq!(detail.items[0].quantity, 2);
        assert_eq!(detail.total_amount, 2398.0);
    }
}
