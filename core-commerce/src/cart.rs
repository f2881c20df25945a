//! Cart reads and mutations.

use crate::error::{expect_json, expect_success, Result};
use crate::types::{Cart, CartSelection};
use core_auth::ApiGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

const CART_ENDPOINT: &str = "users/cart/";
const CART_ADD_ENDPOINT: &str = "users/cart/add/";
const CART_REMOVE_ENDPOINT: &str = "users/cart/remove/";

#[derive(Serialize)]
struct AddToCartBody<'a> {
    #[serde(flatten)]
    selection: &'a CartSelection,
    quantity: i64,
    /// When set, the server overwrites the line's quantity instead of adding.
    #[serde(skip_serializing_if = "Option::is_none")]
    replace: Option<bool>,
}

/// Client for the signed-in user's cart.
#[derive(Clone)]
pub struct CartClient {
    gateway: Arc<ApiGateway>,
}

impl CartClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_cart(&self) -> Result<Cart> {
        let response = self.gateway.get(CART_ENDPOINT).await?;
        expect_json(response)
    }

    /// Adds `quantity` of a variant to the cart, summing with any existing
    /// line for the same selection.
    #[instrument(skip(self, selection), fields(product = selection.product))]
    pub async fn add_item(&self, selection: &CartSelection, quantity: i64) -> Result<()> {
        self.submit_add(selection, quantity, None).await
    }

    /// Sets a line's quantity outright, replacing whatever the server has.
    #[instrument(skip(self, selection), fields(product = selection.product))]
    pub async fn set_quantity(&self, selection: &CartSelection, quantity: i64) -> Result<()> {
        self.submit_add(selection, quantity, Some(true)).await
    }

    async fn submit_add(
        &self,
        selection: &CartSelection,
        quantity: i64,
        replace: Option<bool>,
    ) -> Result<()> {
        let body = AddToCartBody {
            selection,
            quantity,
            replace,
        };
        let response = self.gateway.post_json(CART_ADD_ENDPOINT, &body).await?;
        expect_success(response)?;
        info!(product = selection.product, quantity, "Cart updated");
        Ok(())
    }

    /// Removes one line from the cart. The selection travels in the DELETE
    /// body, which is what the backend expects for this route.
    #[instrument(skip(self, selection), fields(product = selection.product))]
    pub async fn remove_item(&self, selection: &CartSelection) -> Result<()> {
        let response = self
            .gateway
            .delete_json(CART_REMOVE_ENDPOINT, selection)
            .await?;
        expect_success(response)
    }
}
