//! Postgres queries, one module per table. Every function takes an executor so
//! it can run against the pool or inside an open transaction.

pub mod audit;
pub mod notification;
pub mod shift;
pub mod template;
