//! Payment sheet creation for checkout.

use crate::error::{expect_json, Result};
use crate::types::PaymentSheet;
use core_auth::ApiGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

const CREATE_SHEET_INTENT_ENDPOINT: &str = "payment/create-sheet-intent/";

#[derive(Serialize)]
struct CreateSheetIntentBody<'a> {
    /// Rounded total in the currency's major unit, as the backend expects.
    amount: i64,
    selected_item_ids: &'a [i64],
    address_id: i64,
}

#[derive(Clone)]
pub struct CheckoutClient {
    gateway: Arc<ApiGateway>,
}

impl CheckoutClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Creates a payment intent for the selected cart lines and returns the
    /// client secret the native payment sheet needs.
    #[instrument(skip(self, selected_item_ids), fields(items = selected_item_ids.len()))]
    pub async fn create_payment_sheet(
        &self,
        amount: i64,
        selected_item_ids: &[i64],
        address_id: i64,
    ) -> Result<PaymentSheet> {
        let body = CreateSheetIntentBody {
            amount,
            selected_item_ids,
            address_id,
        };
        let response = self
            .gateway
            .post_json(CREATE_SHEET_INTENT_ENDPOINT, &body)
            .await?;
        let sheet: PaymentSheet = expect_json(response)?;
        info!(amount, address_id, "Payment sheet created");
        Ok(sheet)
    }
}
