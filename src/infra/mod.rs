pub mod factory;
pub mod feeds;
pub mod payment;
pub mod repositories;
