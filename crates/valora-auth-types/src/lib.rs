//! Auth types shared across Valora crates.
//!
//! Provides JWT issuing/validation and the `AuthUser` / `AdminUser` extractors.

pub mod identity;
pub mod token;
