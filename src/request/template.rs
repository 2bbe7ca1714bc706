//! Resource template resolution: `{name}` substitution, base URL joining, and query encoding.

// self
use crate::{_prelude::*, error::ConfigError};

/// Builds the absolute request URL.
///
/// The base URL path is kept and each `/`-separated piece of `resource` is appended as one
/// percent-encoded path segment after its `{name}` placeholders are filled. Empty pieces
/// (leading, trailing, or doubled slashes) are skipped. Query pairs are form-encoded and
/// appended after any query already present on the base URL.
pub fn resolve_url(
	base: &Url,
	resource: &str,
	segments: &BTreeMap<String, String>,
	query: &[(String, String)],
) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.set_fragment(None);

	{
		let mut path = url
			.path_segments_mut()
			.map_err(|_| ConfigError::BaseUrlCannotBeABase { url: base.to_string() })?;

		path.pop_if_empty();

		for piece in resource.split('/').filter(|piece| !piece.is_empty()) {
			path.push(&fill_placeholders(resource, piece, segments)?);
		}
	}

	if !query.is_empty() {
		url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
	}

	Ok(url)
}

/// Replaces every `{name}` in `piece` with the matching segment value.
fn fill_placeholders(
	resource: &str,
	piece: &str,
	segments: &BTreeMap<String, String>,
) -> Result<String, ConfigError> {
	let mut filled = String::with_capacity(piece.len());
	let mut rest = piece;

	while let Some(open) = rest.find('{') {
		filled.push_str(&rest[..open]);

		let after = &rest[open + 1..];
		let close = after
			.find('}')
			.ok_or_else(|| ConfigError::MalformedResource { resource: resource.to_owned() })?;
		let name = &after[..close];
		let value = segments.get(name).ok_or_else(|| ConfigError::MissingUrlSegment {
			resource: resource.to_owned(),
			segment: name.to_owned(),
		})?;

		filled.push_str(value);

		rest = &after[close + 1..];
	}

	filled.push_str(rest);

	Ok(filled)
}
