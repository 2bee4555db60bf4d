use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use valora_auth_types::identity::AdminUser;
use valora_core::envelope::ApiResponse;

use crate::error::StoreError;
use crate::state::AppState;
use crate::usecase::shipping::{GetShippingChargeUseCase, SetShippingChargeUseCase};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCharge {
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_charge: Decimal,
}

// ── GET /api/shipping ────────────────────────────────────────────────────────

pub async fn get_shipping(
    State(state): State<AppState>,
) -> Result<ApiResponse<ShippingCharge>, StoreError> {
    let uc = GetShippingChargeUseCase {
        settings: state.settings_repo(),
    };
    let shipping_charge = uc.execute().await?;
    Ok(ApiResponse::ok(ShippingCharge { shipping_charge }))
}

// ── PUT /api/shipping ────────────────────────────────────────────────────────

pub async fn set_shipping(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<ShippingCharge>,
) -> Result<ApiResponse<ShippingCharge>, StoreError> {
    let uc = SetShippingChargeUseCase {
        settings: state.settings_repo(),
    };
    let shipping_charge = uc.execute(body.shipping_charge).await?;
    Ok(ApiResponse::with_message(
        ShippingCharge { shipping_charge },
        "shipping charge updated",
    ))
}
