//! Request/Response data transfer objects

pub mod audit;
pub mod members;
pub mod payments;
