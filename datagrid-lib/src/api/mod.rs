//! Backend query contract

pub mod query;
