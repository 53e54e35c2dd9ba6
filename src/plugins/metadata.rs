use crate::error::{PublishError, Result};

use super::dto::Metadata;

/// Pulls `id`, `title` and `description` out of `key: value` lines anywhere in
/// the source. The first non-empty occurrence of each key wins.
pub fn extract(text: &str) -> Result<Metadata> {
    let mut id: Option<&str> = None;
    let mut title: Option<&str> = None;
    let mut description: Option<&str> = None;

    for line in text.lines() {
        let Some((key, value)) = header_field(line) else {
            continue;
        };
        let slot = match key {
            "id" => &mut id,
            "title" => &mut title,
            "description" => &mut description,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    let id = id.ok_or(PublishError::MissingIdentifier)?.to_string();
    let title = title.map(str::to_string).unwrap_or_else(|| id.clone());
    let description = description.unwrap_or_default().to_string();

    tracing::debug!(id = %id, title = %title, "Extracted plugin metadata");

    Ok(Metadata {
        id,
        title,
        description,
    })
}

// Leading indentation is allowed; the key must be followed directly by the colon.
fn header_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim_start().split_once(':')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((key, value))
}
