//! # Storefront Core
//!
//! Facade crate for the storefront client stack. Host applications depend on
//! `storefront-core` and pick features instead of wiring each workspace crate
//! individually:
//!
//! - `desktop-shims` (default): native [`bridge_desktop`] implementations of
//!   the HTTP and secure-storage traits.
//! - `commerce` (default): the [`core_commerce`] catalog, cart, checkout,
//!   orders and account clients.
//!
//! The authenticated gateway and session flows in [`core_auth`] and the
//! configuration and logging layer in [`core_runtime`] are always available.

pub use bridge_traits;
pub use core_auth;
pub use core_runtime;

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

#[cfg(feature = "commerce")]
pub use core_commerce;

#[cfg(all(test, feature = "desktop-shims"))]
mod tests {
    use core_runtime::StorefrontConfig;

    #[test]
    fn default_features_provide_desktop_bridges() {
        // Building with no explicit bridges must succeed through the facade:
        // the desktop-shims feature has to reach core-runtime so the keyring
        // store and reqwest client are injected.
        let config = StorefrontConfig::builder()
            .api_base_url("https://shop.example.com/api/")
            .build()
            .unwrap();

        assert!(config.http_client.is_some());
    }
}
