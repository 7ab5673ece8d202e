pub mod admin;
pub mod products;
pub mod upload;
