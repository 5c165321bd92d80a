pub mod datetime;
pub mod urls;
