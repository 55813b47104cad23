//! Core types and trait definitions for the on-call ("reperibile") rotation.
//!
//! This crate is free of database dependencies. Storage backends implement
//! [`store::PersonStore`] and [`store::AssignmentStore`]; the binary drives
//! everything through [`service::RotationService`].

pub mod assignment;
pub mod day;
pub mod error;
pub mod person;
pub mod phone;
pub mod service;
pub mod store;

pub use error::{Error, Result};
