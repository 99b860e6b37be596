//! items-api - A minimal HTTP service for CRUD over item records
//!
//! Layers, bottom up:
//! - `model`: item record types
//! - `storage`: embedded append-only item log
//! - `repository`: the `ItemRepository` abstraction and its backends
//! - `http_server`: axum routes and server
//! - `config`, `observability`, `boot`: environment, logging and startup

pub mod boot;
pub mod config;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod repository;
pub mod storage;
