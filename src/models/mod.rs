//! Wire models exchanged with the accounting backend, plus server-side models.

pub mod assignment;
pub mod document;
pub mod feedback;
pub mod mutation;
pub mod work_log;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
