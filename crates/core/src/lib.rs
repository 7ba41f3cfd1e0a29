pub mod config;
pub mod domain;
pub mod tier;

pub use domain::customer::{Customer, CustomerDraft, CustomerId, CustomerProfile};
pub use tier::Tier;
