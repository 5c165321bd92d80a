//! Bridges the three representations of a stored event timestamp: the
//! datetime-input form (`2023-05-20T15:30`), the stored ISO form with an
//! explicit `+09:00` offset, and the long Japanese display form.
//!
//! Inputs without an offset are interpreted as Japan wall-clock time via an
//! explicit fixed offset, never through the process-local timezone. Inputs
//! that carry their own offset are converted to JST first.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use thiserror::Error;

static JST: Lazy<FixedOffset> =
	Lazy::new(|| FixedOffset::east_opt(9 * 3600).expect("+09:00 is a valid offset"));

/// Shown in place of a date the admin never set.
pub const UNSET_PLACEHOLDER: &str = "日時未設定";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
	#[error("unparseable datetime: {0}")]
	Unparseable(String),
}

fn parse_as_jst(input: &str) -> Result<DateTime<FixedOffset>, DateError> {
	if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
		return Ok(parsed.with_timezone(&*JST));
	}
	for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
		if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
			return naive
				.and_local_timezone(*JST)
				.single()
				.ok_or_else(|| DateError::Unparseable(input.to_string()));
		}
	}
	Err(DateError::Unparseable(input.to_string()))
}

/// Stored form: `YYYY-MM-DDTHH:MM:SS+09:00`. Empty input stays empty.
pub fn to_iso_with_jst(input: &str) -> Result<String, DateError> {
	if input.is_empty() {
		return Ok(String::new());
	}
	Ok(parse_as_jst(input)
		.map(|date| date.format("%Y-%m-%dT%H:%M:%S%:z").to_string())?)
}

/// Datetime-input form: `YYYY-MM-DDTHH:MM` in JST. Empty input stays empty.
pub fn for_datetime_input(input: &str) -> Result<String, DateError> {
	if input.is_empty() {
		return Ok(String::new());
	}
	Ok(parse_as_jst(input)
		.map(|date| date.format("%Y-%m-%dT%H:%M").to_string())?)
}

/// Long Japanese display form, e.g. `2023年5月20日 15:30`. Empty input
/// renders the unset placeholder.
pub fn format_jp(input: &str) -> Result<String, DateError> {
	if input.is_empty() {
		return Ok(UNSET_PLACEHOLDER.to_string());
	}
	let date = parse_as_jst(input)?;
	Ok(format!(
		"{}年{}月{}日 {:02}:{:02}",
		date.year(),
		date.month(),
		date.day(),
		date.hour(),
		date.minute()
	))
}
