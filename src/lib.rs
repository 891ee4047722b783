//! Pickup Scheduler - recurring pickup agreements for a reuse and
//! recycling operation.
//!
//! An agreement between an organization and a pickup location owns
//! schedules; each schedule's recurrence rule is expanded into dated
//! occurrences, persisted atomically together with one report projection
//! per occurrence.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
