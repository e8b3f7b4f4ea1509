//! # Kura Common Library
//!
//! Shared code for the Kura registration services including:
//! - Location catalog (county → constituency → ward) and triple validation
//! - Cascading location selection state
//! - Registrant record models and database schema
//! - Bootstrap configuration loading
//! - Admin token verification

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod location;

pub use error::{Error, Result};
pub use location::{LocationCatalog, LocationError, LocationSelection};
