//! Wire models for the storefront catalog, cart, checkout and account APIs.
//!
//! Field names mirror the backend's JSON exactly; monetary values come back
//! as either display strings (`price`, `discount`) or computed numbers
//! (`final_price`), matching what the server sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product as it appears in listings and search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub slug: String,
    /// Display price, formatted server side.
    pub price: String,
    /// Price after discount, as a number for client-side totals.
    pub final_price: f64,
    pub thumbnail_url: String,
    pub discount: String,
    pub category: String,
    pub brand: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub name: String,
    pub slug: String,
}

/// Everything the product page needs in one payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: String,
    pub discount: String,
    pub brand: ProductBrand,
    pub category: String,
    pub target_audience: String,
    pub created_at: DateTime<Utc>,
    pub final_price: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub details: ProductSpecs,
    pub color_variants: Vec<ColorVariant>,
    #[serde(default)]
    pub sizes: Vec<String>,
    pub total_stock: i64,
    pub initial_color: String,
    pub thumbnail_url: String,
    /// Whether the requesting user has saved this product.
    #[serde(default)]
    pub is_saved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductBrand {
    pub name: String,
    pub logo: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user: Reviewer,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reviewer {
    pub username: String,
    pub email: String,
}

/// Fabric and care details shown on the product page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub fabric: String,
    pub composition: String,
    pub neck_type: String,
    pub wash_care: String,
    pub model_reference: String,
    pub fit_type: String,
    pub seller: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorVariant {
    pub id: i64,
    pub color: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub images: Vec<VariantImage>,
    #[serde(default)]
    pub available_sizes: Vec<SizeStock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantImage {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeStock {
    pub id: i64,
    pub size: String,
    pub stock_count: i64,
}

/// Facets available for narrowing product listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub brands: Vec<Brand>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub target_audience: Vec<String>,
}

/// The user's cart with resolved product display data per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub user: i64,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub product: i64,
    pub product_title: String,
    pub color: String,
    pub color_variant: i64,
    pub size: String,
    pub size_variant: i64,
    pub quantity: i64,
    pub original_price: f64,
    pub final_price: f64,
    pub thumbnail_url: String,
    pub brand: String,
    #[serde(default)]
    pub has_discount: Option<String>,
}

/// Identifies one cart line by product and chosen variants.
#[derive(Debug, Clone, Serialize)]
pub struct CartSelection {
    pub product: i64,
    pub color_variant: i64,
    pub size_variant: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub user: i64,
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_default: bool,
}

/// Address fields the user supplies; `id` and `user` are server-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_default: bool,
}

/// An order as listed in purchase history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLineSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineSummary {
    pub id: i64,
    pub thumbnail_url: String,
    pub brand_slug: String,
    pub brand_name: String,
    pub product_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub created_at: DateTime<Utc>,
    pub address: ShippingAddress,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
}

/// Address snapshot attached to an order at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i64,
    pub thumbnail_url: String,
    pub brand_name: String,
    pub product_title: String,
    pub color: String,
    pub size: String,
    pub quantity: i64,
}

/// Server-created payment intent for the native payment sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSheet {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}
