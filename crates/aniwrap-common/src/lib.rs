//! # Aniwrap Common
//!
//! Shared foundations for the aniwrap workspace.
//!
//! This crate provides the workspace error type, structured logging setup,
//! the typed AniList domain model, and the GraphQL client the statistics
//! pipeline pulls its data through.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anilist;
pub mod error;
pub mod logging;
pub mod models;

pub use anilist::{AnilistClient, AnilistConfig};
pub use error::{AniwrapError, Result};
