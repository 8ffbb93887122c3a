#![warn(missing_docs)]

//! <div class="warning">
//!
//! Note: API is unstable, and may change in `0.x` versions.
//!
//! </div>
//!
//! A typed client for the [Gelbooru](https://gelbooru.com) API.
//!
//! Usually, you prefer to use [`api::Gelbooru`] (or [`api::blocking::Gelbooru`])
//! to search posts and tags, read comments, and download files.
//! The client turns raw API payloads into the records of [`data`] through [`mapper`].
//!
//! See [`api::Gelbooru#example`] for example.
//!
//! # Features
//!
//! - `toml`: parse a [`config::Config`] from TOML, see [`config::DEFAULT_CONFIG_STR`].
//! - `default-tls`, `rustls-tls`, ...: the TLS backend of [`reqwest`].

pub mod api;
pub mod config;
pub mod data;
pub mod download;
pub mod error;
pub mod mapper;
pub mod tool;

pub use error::{Error, Result};
