//! # EduSys Rust Backend
//!
//! Role-based school-administration backend.
//!
//! This crate provides the server side of the EduSys system: government and
//! school administrators, teachers, and students manage schools, student and
//! teacher records, attendance, complaints, scholarships, and credential
//! verification through a REST API backed by a keyed document store.
//!
//! ## Features
//!
//! - **Records**: CRUD for schools, students, teachers, attendance, complaints
//! - **Scholarship engine**: threshold evaluation with per-district overrides
//! - **Analytics**: district rollups, shortage reports, dashboard counters
//! - **Reports**: CSV/JSON export of the main collections
//! - **HTTP API**: RESTful endpoints for the web frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: typed API surface shared by handlers and clients
//! - [`db`]: repository pattern and persistence layer
//! - [`models`]: domain entities and insert payloads
//! - [`routes`]: response shapes for each endpoint family
//! - [`services`]: business logic (evaluation, aggregation, export)
//! - [`http`]: axum-based HTTP server and request handlers

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
