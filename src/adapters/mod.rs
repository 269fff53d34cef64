//! External integrations
//!
//! - [`comunica`] - PJe Comunica REST API

pub mod comunica;
