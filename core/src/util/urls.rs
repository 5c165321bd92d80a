//! Normalization for thumbnail URLs coming back from the catalog, which are
//! best-effort: occasionally plain HTTP, protocol-relative, or wrapped in
//! stray whitespace or quoting.

/// Upgrades a URL to HTTPS and trims stray whitespace and quotes. Empty
/// input stays empty.
pub fn to_https(url: &str) -> String {
	let url = url.trim().trim_matches(|c| c == '"' || c == '\'');
	if url.is_empty() {
		return String::new();
	}
	if url.starts_with("https://") {
		return url.to_string();
	}
	if let Some(rest) = url.strip_prefix("http://") {
		return format!("https://{rest}");
	}
	if url.starts_with("//") {
		return format!("https:{url}");
	}
	url.to_string()
}
