use rust_decimal::Decimal;

use crate::domain::repository::SettingsRepository;
use crate::error::StoreError;

pub struct GetShippingChargeUseCase<S: SettingsRepository> {
    pub settings: S,
}

impl<S: SettingsRepository> GetShippingChargeUseCase<S> {
    pub async fn execute(&self) -> Result<Decimal, StoreError> {
        self.settings.shipping_charge().await
    }
}

pub struct SetShippingChargeUseCase<S: SettingsRepository> {
    pub settings: S,
}

impl<S: SettingsRepository> SetShippingChargeUseCase<S> {
    /// Stored rounded to paise.
    pub async fn execute(&self, charge: Decimal) -> Result<Decimal, StoreError> {
        if charge.is_sign_negative() {
            return Err(StoreError::validation("shipping charge cannot be negative"));
        }
        let charge = charge.round_dp(2);
        self.settings.set_shipping_charge(charge).await?;
        tracing::info!(%charge, "shipping charge updated");
        Ok(charge)
    }
}
