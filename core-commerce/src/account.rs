//! Account data beyond authentication: shipping addresses and saved products.

use crate::error::{expect_json, expect_success, Result};
use crate::types::{Address, AddressInput, Product};
use bridge_traits::http::{HttpMethod, HttpRequest};
use core_auth::ApiGateway;
use std::sync::Arc;
use tracing::{info, instrument};

const ADDRESSES_ENDPOINT: &str = "users/addresses/";
const SAVED_PRODUCTS_ENDPOINT: &str = "users/saved-products/";

#[derive(Clone)]
pub struct AccountClient {
    gateway: Arc<ApiGateway>,
}

impl AccountClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn addresses(&self) -> Result<Vec<Address>> {
        let response = self.gateway.get(ADDRESSES_ENDPOINT).await?;
        expect_json(response)
    }

    /// Creates an address and returns the server's copy with its new id.
    #[instrument(skip(self, address))]
    pub async fn add_address(&self, address: &AddressInput) -> Result<Address> {
        let response = self.gateway.post_json(ADDRESSES_ENDPOINT, address).await?;
        let created: Address = expect_json(response)?;
        info!(address_id = created.id, "Address created");
        Ok(created)
    }

    #[instrument(skip(self, address))]
    pub async fn update_address(&self, address_id: i64, address: &AddressInput) -> Result<Address> {
        let response = self
            .gateway
            .put_json(&format!("users/addresses/{}/", address_id), address)
            .await?;
        expect_json(response)
    }

    #[instrument(skip(self))]
    pub async fn delete_address(&self, address_id: i64) -> Result<()> {
        let response = self
            .gateway
            .delete(&format!("users/addresses/{}/", address_id))
            .await?;
        expect_success(response)
    }

    /// Products the user has saved for later.
    pub async fn saved_products(&self) -> Result<Vec<Product>> {
        let response = self.gateway.get(SAVED_PRODUCTS_ENDPOINT).await?;
        expect_json(response)
    }

    /// Bodyless POST; the product id in the path is the whole payload.
    #[instrument(skip(self))]
    pub async fn save_product(&self, product_id: i64) -> Result<()> {
        let url = self.gateway.url(&format!("users/saved-products/{}/", product_id));
        let request = HttpRequest::new(HttpMethod::Post, url);
        let response = self.gateway.execute(request).await?;
        expect_success(response)
    }

    #[instrument(skip(self))]
    pub async fn unsave_product(&self, product_id: i64) -> Result<()> {
        let response = self
            .gateway
            .delete(&format!("users/saved-products/{}/", product_id))
            .await?;
        expect_success(response)
    }
}
