//! # Commerce API Clients
//!
//! Typed clients for the storefront backend's commerce surfaces: catalog
//! browsing, cart, checkout, orders and account data. Every client wraps a
//! shared [`ApiGateway`](core_auth::ApiGateway), which stamps bearer tokens
//! and transparently refreshes expired sessions, so callers only deal with
//! domain types and [`CommerceError`].
//!
//! ## Usage
//!
//! ```no_run
//! use core_commerce::{CartClient, CatalogClient, CartSelection};
//! use std::sync::Arc;
//! # async fn example(gateway: Arc<core_auth::ApiGateway>) -> core_commerce::Result<()> {
//! let catalog = CatalogClient::new(gateway.clone());
//! let products = catalog.list_products().await?;
//!
//! let cart = CartClient::new(gateway);
//! let selection = CartSelection { product: products[0].id, color_variant: 11, size_variant: 101 };
//! cart.add_item(&selection, 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod orders;
pub mod types;

#[cfg(test)]
mod testutil;

pub use account::AccountClient;
pub use cart::CartClient;
pub use catalog::CatalogClient;
pub use checkout::CheckoutClient;
pub use error::{CommerceError, Result};
pub use orders::OrdersClient;
pub use types::{
    Address, AddressInput, Brand, Cart, CartItem, CartSelection, Category, ColorVariant,
    FilterOptions, OrderDetail, OrderLine, OrderLineSummary, OrderSummary, PaymentSheet, Product,
    ProductDetail, Review, ShippingAddress, SizeStock,
};
