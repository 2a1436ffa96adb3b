//! Parsed date formats, cached by their format-description string.
//!
//! Formats are resolved per field and reused across every coercion and
//! formatting call, so each distinct string is parsed exactly once.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};
use time::{
    error::InvalidFormatDescription,
    format_description::{self, OwnedFormatItem},
};

static FORMATS: LazyLock<RwLock<HashMap<String, Arc<OwnedFormatItem>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Parse a format-description string, returning the cached parse when the
/// same string was seen before.
pub(crate) fn cached_format(
    format: &str,
) -> Result<Arc<OwnedFormatItem>, InvalidFormatDescription> {
    if let Some(found) = FORMATS
        .read()
        .expect("format cache lock poisoned")
        .get(format)
    {
        return Ok(found.clone());
    }

    let parsed = Arc::new(format_description::parse_owned::<2>(format)?);
    let mut cache = FORMATS.write().expect("format cache lock poisoned");

    // a concurrent writer may have landed first; keep whichever did
    Ok(cache.entry(format.to_string()).or_insert(parsed).clone())
}
