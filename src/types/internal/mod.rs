// Internal types - domain values passed between services and stores
pub mod account;
pub mod audit;
pub mod auth;
