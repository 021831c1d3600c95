pub mod auth;
pub mod businesses;
pub mod dashboard;
pub mod open;
pub mod products;
pub mod profile;
pub mod sales;
pub mod theme;
