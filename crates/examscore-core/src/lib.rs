//! Exam net, placement and multi-period scoring engine.
//!
//! This crate defines the exam record model, the aggregation and
//! standardization formulas, the period statistics catalog, and the storage
//! contract that the examscore CLI builds on.

pub mod aggregate;
pub mod archive;
pub mod config;
pub mod error;
pub mod model;
pub mod net;
pub mod repository;
pub mod scorer;
pub mod sheet;
pub mod statistics;
pub mod study;
pub mod validation;
