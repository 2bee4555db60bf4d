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
