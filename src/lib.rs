//! # Rutificador Proxy
//!
//! HTTP proxy that resolves a Chilean RUT against an external lookup page
//! sitting behind a simple anti-bot wall.
//!
//! ## Pipeline
//!
//! 1. `rut`: lenient canonicalization of the identifier (no check-digit
//!    validation)
//! 2. `fetch`: two-tier escalating fetch, a spoofed-header POST first and a
//!    per-request headless Chromium render when that comes back blocked
//! 3. `extract`: first `<tr>` row extraction plus positional field mapping
//! 4. `api`: axum shell exposing `/rut/{rut}`, `/rut/{rut}/raw` and `/health`

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logger;
pub mod rut;
pub mod util;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use extract::{extract_first_row, has_data_row, map_row, Record};
pub use fetch::{FetchOutcome, FetchTier, PageRenderer, Resolver};
pub use rut::{normalize, CanonicalRut};
