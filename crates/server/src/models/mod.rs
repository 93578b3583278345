//! Domain models shared between repositories and route handlers.

pub mod category;
pub mod customer;
pub mod product;
pub mod sale;
pub mod session;
pub mod settings;
pub mod stock_log;
pub mod user;
