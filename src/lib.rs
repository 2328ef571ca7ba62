#![doc = "The `todo-api` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, token-based authentication,"]
#![doc = "routing configuration, and error handling for the todo-list backend."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
