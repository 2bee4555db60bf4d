use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::ApiResponse;

use crate::domain::types::{Address, ShippingAddress};
use crate::error::StoreError;
use crate::state::AppState;
use crate::usecase::address::{
    AddAddressUseCase, DeleteAddressUseCase, ListAddressesUseCase, SetDefaultAddressUseCase,
    UpdateAddressUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub details: ShippingAddress,
    pub is_default: bool,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            details: address.details,
            is_default: address.is_default,
            created_at: address.created_at,
        }
    }
}

fn to_responses(addresses: Vec<Address>) -> Vec<AddressResponse> {
    addresses.into_iter().map(AddressResponse::from).collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[serde(flatten)]
    pub details: ShippingAddress,
    #[serde(default)]
    pub is_default: bool,
}

// ── GET /api/auth/addresses ──────────────────────────────────────────────────

pub async fn list_addresses(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<AddressResponse>>, StoreError> {
    let uc = ListAddressesUseCase {
        repo: state.address_repo(),
    };
    Ok(ApiResponse::ok(to_responses(uc.execute(auth.user_id).await?)))
}

// ── POST /api/auth/addresses ─────────────────────────────────────────────────

pub async fn add_address(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<AddressRequest>,
) -> Result<(StatusCode, ApiResponse<AddressResponse>), StoreError> {
    let uc = AddAddressUseCase {
        repo: state.address_repo(),
    };
    let address = uc
        .execute(auth.user_id, body.details, body.is_default)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(address.into(), "address added"),
    ))
}

// ── PUT /api/auth/addresses/{id} ─────────────────────────────────────────────

pub async fn update_address(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddressRequest>,
) -> Result<ApiResponse<AddressResponse>, StoreError> {
    let uc = UpdateAddressUseCase {
        repo: state.address_repo(),
    };
    let address = uc
        .execute(auth.user_id, id, body.details, body.is_default)
        .await?;
    Ok(ApiResponse::with_message(address.into(), "address updated"))
}

// ── DELETE /api/auth/addresses/{id} ──────────────────────────────────────────

pub async fn delete_address(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = DeleteAddressUseCase {
        repo: state.address_repo(),
    };
    uc.execute(auth.user_id, id).await?;
    Ok(ApiResponse::message("address deleted"))
}

// ── PUT /api/auth/addresses/{id}/default ─────────────────────────────────────

pub async fn set_default_address(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Vec<AddressResponse>>, StoreError> {
    let uc = SetDefaultAddressUseCase {
        repo: state.address_repo(),
    };
    let addresses = uc.execute(auth.user_id, id).await?;
    Ok(ApiResponse::with_message(
        to_responses(addresses),
        "default address updated",
    ))
}
