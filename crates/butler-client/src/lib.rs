//! # butler-client
//!
//! HTTP client for the couch-butler storefront API.
//!
//! This crate provides:
//! - `StorefrontClient`, a `reqwest` implementation of `butler_core::Storefront`
//! - Account login/registration with bearer-token handling
//! - `ClientConfig` loaded from the environment
//! - The `butler` CLI
//!
//! ## Endpoints consumed
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/products` | List products (`?search=`) |
//! | GET | `/products/{id}` | Get product |
//! | POST | `/orders` | Submit order |
//! | GET | `/orders` | List orders |
//! | GET | `/orders/{id}` | Get order |
//! | POST | `/auth/register` | Register |
//! | POST | `/auth/login` | Log in |
//! | GET | `/auth/me` | Current user |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use butler_client::StorefrontClient;
//! use butler_core::Storefront;
//!
//! let client = StorefrontClient::from_env()?;
//! let products = client.products(None).await?;
//! let receipt = client.create_order(&order).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod wire;

// Re-exports
pub use client::StorefrontClient;
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use wire::{AuthResponse, Credentials, Registration, User};
