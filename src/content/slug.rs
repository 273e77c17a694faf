//! Slugs derived from post file names

use chrono::format::{parse, Parsed, StrftimeItems};

use crate::config::{SlugConfig, SlugStyle};
use crate::error::{Error, Result};

/// URL path segments for a post id
///
/// With [`SlugStyle::DatePrefix`] the id must look like `YYYY-MM-DD-title`
/// (for the default prefix settings): a prefix matching `prefix_format`, a
/// `-`, and a non-empty remainder. Anything else is rejected rather than cut
/// at a fixed offset.
pub fn slug_for(id: &str, config: &SlugConfig) -> Result<Vec<String>> {
    match config.style {
        SlugStyle::Id => Ok(vec![id.to_string()]),
        SlugStyle::DatePrefix => split_date_prefix(id, config.prefix_len, &config.prefix_format),
    }
}

fn split_date_prefix(id: &str, prefix_len: usize, prefix_format: &str) -> Result<Vec<String>> {
    let invalid = |reason: &str| {
        Error::parse(
            format!("slug for {:?}", id),
            format!("expected `{}-title`: {}", prefix_format, reason),
        )
    };

    let prefix = id
        .get(..prefix_len)
        .ok_or_else(|| invalid("name is shorter than the date prefix"))?;
    let rest = id[prefix_len..]
        .strip_prefix('-')
        .ok_or_else(|| invalid("no `-` after the date prefix"))?;

    if rest.is_empty() {
        return Err(invalid("missing title after the date"));
    }
    parse(&mut Parsed::new(), prefix, StrftimeItems::new(prefix_format))
        .map_err(|_| invalid("prefix is not a date"))?;

    Ok(vec![prefix.to_string(), rest.to_string()])
}
