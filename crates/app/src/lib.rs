//! Flowline application layer: PostgreSQL-backed services over the
//! `flowline` engine, plus the daily driver-assignment job.

pub mod context;
pub mod database;
pub mod domain;
