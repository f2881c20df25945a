//! Product discovery: listings, detail pages, search and filtering.

use crate::error::{expect_json, Result};
use crate::types::{Category, FilterOptions, Product, ProductDetail};
use core_auth::ApiGateway;
use std::sync::Arc;
use tracing::{debug, instrument};

const ALL_PRODUCTS_ENDPOINT: &str = "products/all/?in_stock=True";
const CATEGORIES_ENDPOINT: &str = "products/categories/";
const FILTERS_ENDPOINT: &str = "products/filters/";

/// Read-side client for the product catalog.
///
/// Every call goes through the gateway, so results reflect the signed-in
/// user where relevant (for example [`ProductDetail::is_saved`]).
#[derive(Clone)]
pub struct CatalogClient {
    gateway: Arc<ApiGateway>,
}

impl CatalogClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// All in-stock products for the home feed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let response = self.gateway.get(ALL_PRODUCTS_ENDPOINT).await?;
        let products: Vec<Product> = expect_json(response)?;
        debug!(count = products.len(), "Fetched product listing");
        Ok(products)
    }

    /// Full detail payload for one product.
    #[instrument(skip(self))]
    pub async fn product_detail(&self, product_id: i64) -> Result<ProductDetail> {
        let response = self
            .gateway
            .get(&format!("products/{}/", product_id))
            .await?;
        expect_json(response)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let response = self.gateway.get(CATEGORIES_ENDPOINT).await?;
        expect_json(response)
    }

    /// Free-text product search. The query is URL-encoded before sending.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let path = format!("products/search/?q={}", urlencoding::encode(query));
        let response = self.gateway.get(&path).await?;
        expect_json(response)
    }

    /// Keyword completions for a partial search query.
    pub async fn suggest_keywords(&self, query: &str) -> Result<Vec<String>> {
        let path = format!(
            "products/suggest-keywords/?q={}",
            urlencoding::encode(query)
        );
        let response = self.gateway.get(&path).await?;
        expect_json(response)
    }

    /// Facet values available for [`filtered_products`](Self::filtered_products).
    pub async fn filters(&self) -> Result<FilterOptions> {
        let response = self.gateway.get(FILTERS_ENDPOINT).await?;
        expect_json(response)
    }

    /// Products matching a pre-built facet query string.
    ///
    /// `query_string` is the caller's serialized selection, including the
    /// leading `?` (for example `?brands=flexit&sizes=M`).
    #[instrument(skip(self))]
    pub async fn filtered_products(&self, query_string: &str) -> Result<Vec<Product>> {
        let path = format!("products/filtered/{}", query_string);
        let response = self.gateway.get(&path).await?;
        expect_json(response)
    }
}
