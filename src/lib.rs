//! Tutor Chat - real-time messaging for a tutoring platform
//!
//! Private student/teacher rooms, per-language group rooms and a support
//! room, with per-user unread counters and a multi-room inbox summary.
//!
//! Layout follows a ports-and-adapters split:
//! - [`domain`] - room classification, messages, counters, events
//! - [`ports`] - storage and broadcast interfaces
//! - [`application`] - message routing, counter engine, queries
//! - [`adapters`] - PostgreSQL, in-memory, WebSocket and HTTP
//! - [`config`] - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
