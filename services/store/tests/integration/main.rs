mod admin_test;
mod auth_test;
mod helpers;
mod order_test;
mod product_test;
