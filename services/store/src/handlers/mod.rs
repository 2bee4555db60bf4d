use serde::{Deserialize, Deserializer};

use valora_domain::pagination::PageRequest;

use crate::error::StoreError;

pub mod address;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod notification;
pub mod order;
pub mod product;
pub mod review;
pub mod shipping;
pub mod upload;
pub mod wishlist;

/// `?page=&limit=` shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page, self.limit)
    }
}

/// Parse an optional query-string value, treating blank as absent.
pub(crate) fn parse_query<T: std::str::FromStr>(
    value: Option<&str>,
    field: &str,
) -> Result<Option<T>, StoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| StoreError::validation(format!("invalid {field}: {v}"))),
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
