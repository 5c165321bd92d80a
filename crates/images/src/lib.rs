#![warn(
	clippy::all,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc)]

mod consts;
mod error;
mod optimizer;

pub use consts::{ALLOWED_FORMATS, JPEG_QUALITY, MAXIMUM_DIMENSION, MAXIMUM_FILE_SIZE};
pub use error::{Error, Result};
pub use optimizer::{optimize, Optimized};
