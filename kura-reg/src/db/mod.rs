//! Database access layer for kura-reg
//!
//! Schema creation lives in kura-common; this module holds the registrant
//! operations the HTTP handlers call.

pub mod registrants;

pub use kura_common::db::init_database;
pub use registrants::{
    create_unique, delete_by_id, find_by_id, find_by_national_id, list_all, update_by_id,
};
