//! YAML frontmatter codec.
//!
//! ```text
//! ---
//! title: Plan
//! tags: [work]
//! ---
//!
//! Body text
//! ```

use serde_json::Value;

use super::types::Metadata;
use crate::error::Result;

const FENCE: &str = "---";

/// Split a note file into frontmatter metadata and body.
///
/// Text without a frontmatter block, or whose block is not a YAML mapping,
/// yields empty metadata and the whole text as body.
pub fn parse_frontmatter(text: &str) -> (Metadata, String) {
    let Some((yaml, body)) = split_block(text) else {
        return (Metadata::new(), text.to_string());
    };

    if yaml.trim().is_empty() {
        return (Metadata::new(), body.trim().to_string());
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(metadata)) => (metadata, body.trim().to_string()),
        Ok(Value::Null) => (Metadata::new(), body.trim().to_string()),
        Ok(_) | Err(_) => {
            tracing::debug!("frontmatter is not a YAML mapping, treating file as plain body");
            (Metadata::new(), text.to_string())
        }
    }
}

fn split_block(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Render metadata and body as a note file.
pub fn render_frontmatter(metadata: &Metadata, body: &str) -> Result<String> {
    let yaml = if metadata.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(metadata)?
    };
    let body = body.trim_end();
    Ok(format!("{FENCE}\n{yaml}{FENCE}\n\n{body}\n"))
}

/// Merge `user` over `defaults`.
///
/// User values win. Nested mappings are merged key by key; lists and
/// scalars are replaced whole.
pub fn merge_metadata(defaults: &Metadata, user: &Metadata) -> Metadata {
    let mut merged = defaults.clone();
    for (key, value) in user {
        let combined = match (merged.get(key), value) {
            (Some(Value::Object(base)), Value::Object(overlay)) => {
                Value::Object(merge_metadata(base, overlay))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Metadata {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_basic() {
        let text = "---\ntitle: Plan\ntags:\n- work\n---\n\nBody line\n";
        let (metadata, body) = parse_frontmatter(text);
        assert_eq!(metadata.get("title"), Some(&json!("Plan")));
        assert_eq!(metadata.get("tags"), Some(&json!(["work"])));
        assert_eq!(body, "Body line");
    }

    #[test]
    fn test_no_frontmatter() {
        let (metadata, body) = parse_frontmatter("# Just markdown\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn test_unterminated_block() {
        let text = "---\ntitle: Plan\nno closing fence";
        let (metadata, body) = parse_frontmatter(text);
        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_invalid_yaml_keeps_whole_text() {
        let text = "---\ntitle: [unclosed\n---\nbody";
        let (metadata, body) = parse_frontmatter(text);
        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn test_horizontal_rule_in_body_is_kept() {
        let text = "---\ntitle: T\n---\n\nabove\n\n---\n\nbelow\n";
        let (_, body) = parse_frontmatter(text);
        assert_eq!(body, "above\n\n---\n\nbelow");
    }

    #[test]
    fn test_render_then_parse() {
        let metadata = obj(json!({"title": "Plan", "tags": ["a", "b"], "is_encrypted": true}));
        let text = render_frontmatter(&metadata, "Body\n\n").unwrap();

        assert!(text.starts_with("---\ntitle: Plan\n"));
        assert!(text.ends_with("---\n\nBody\n"));

        let (parsed, body) = parse_frontmatter(&text);
        assert_eq!(parsed, metadata);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_merge_user_wins() {
        let defaults = obj(json!({"author": "default", "tags": ["x", "y"], "draft": true}));
        let user = obj(json!({"author": "alice", "tags": ["z"]}));

        let merged = merge_metadata(&defaults, &user);
        assert_eq!(merged.get("author"), Some(&json!("alice")));
        assert_eq!(merged.get("tags"), Some(&json!(["z"])));
        assert_eq!(merged.get("draft"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_nested_maps() {
        let defaults = obj(json!({"ui": {"theme": "dark", "width": 80}}));
        let user = obj(json!({"ui": {"width": 100}}));

        let merged = merge_metadata(&defaults, &user);
        assert_eq!(merged.get("ui"), Some(&json!({"theme": "dark", "width": 100})));
    }
}
