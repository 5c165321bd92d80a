//! Core of the Tomodachi bookstore CMS: domain types, datastore access,
//! entity workflows and the support utilities shared by the server.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod datastore;
pub mod domain;
pub mod ops;
pub mod upload;
pub mod util;

pub use config::Config;
