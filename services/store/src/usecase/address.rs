use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::AddressRepository;
use crate::domain::types::{Address, ShippingAddress};
use crate::error::StoreError;

pub struct ListAddressesUseCase<R: AddressRepository> {
    pub repo: R,
}

impl<R: AddressRepository> ListAddressesUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Address>, StoreError> {
        self.repo.list(user_id).await
    }
}

pub struct AddAddressUseCase<R: AddressRepository> {
    pub repo: R,
}

impl<R: AddressRepository> AddAddressUseCase<R> {
    /// The first address a user saves becomes their default.
    pub async fn execute(
        &self,
        user_id: Uuid,
        details: ShippingAddress,
        is_default: bool,
    ) -> Result<Address, StoreError> {
        let details = details.normalized().map_err(StoreError::Validation)?;
        let first = self.repo.list(user_id).await?.is_empty();
        let address = Address {
            id: Uuid::now_v7(),
            user_id,
            details,
            is_default: is_default || first,
            created_at: Utc::now(),
        };
        self.repo.create(&address).await?;
        Ok(address)
    }
}

pub struct UpdateAddressUseCase<R: AddressRepository> {
    pub repo: R,
}

impl<R: AddressRepository> UpdateAddressUseCase<R> {
    /// A default address stays default; use another address's "set default" to move the flag.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        details: ShippingAddress,
        is_default: bool,
    ) -> Result<Address, StoreError> {
        let details = details.normalized().map_err(StoreError::Validation)?;
        let mut address = self
            .repo
            .find(user_id, id)
            .await?
            .ok_or(StoreError::AddressNotFound)?;
        address.details = details;
        address.is_default = address.is_default || is_default;
        self.repo.update(&address).await?;
        Ok(address)
    }
}

pub struct DeleteAddressUseCase<R: AddressRepository> {
    pub repo: R,
}

impl<R: AddressRepository> DeleteAddressUseCase<R> {
    /// Deleting the default promotes the newest remaining address.
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let address = self
            .repo
            .find(user_id, id)
            .await?
            .ok_or(StoreError::AddressNotFound)?;
        if !self.repo.delete(user_id, id).await? {
            return Err(StoreError::AddressNotFound);
        }
        if address.is_default {
            let remaining = self.repo.list(user_id).await?;
            if let Some(next) = remaining.iter().max_by_key(|a| a.created_at) {
                self.repo.set_default(user_id, next.id).await?;
            }
        }
        Ok(())
    }
}

pub struct SetDefaultAddressUseCase<R: AddressRepository> {
    pub repo: R,
}

impl<R: AddressRepository> SetDefaultAddressUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<Vec<Address>, StoreError> {
        if !self.repo.set_default(user_id, id).await? {
            return Err(StoreError::AddressNotFound);
        }
        self.repo.list(user_id).await
    }
}
