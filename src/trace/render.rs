//! Rendering of arguments, results and request data for log lines.

use serde::Serialize;

use crate::config::{SerializeFailure, TraceConfig};

const TRUNCATED: &str = "…(truncated)";

/// Turns serializable values into bounded JSON strings.
#[derive(Debug, Clone, Copy)]
pub struct PayloadRenderer {
    on_error: SerializeFailure,
    max_bytes: usize,
}

impl PayloadRenderer {
    pub fn new(on_error: SerializeFailure, max_bytes: usize) -> Self {
        Self {
            on_error,
            max_bytes,
        }
    }

    pub fn from_config(config: &TraceConfig) -> Self {
        Self::new(config.on_serialize_error, config.max_payload_bytes)
    }

    /// Render `value` as JSON.
    ///
    /// # Panics
    ///
    /// Panics when serialization fails and the policy is
    /// [`SerializeFailure::Panic`].
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> String {
        match serde_json::to_string(value) {
            Ok(json) => self.truncate(json),
            Err(err) => match self.on_error {
                SerializeFailure::Placeholder => format!("<unserializable: {err}>"),
                SerializeFailure::Panic => panic!("trace payload is not serializable: {err}"),
            },
        }
    }

    /// Render an argument tuple as a JSON array.
    ///
    /// The empty tuple serializes as `null`; it is logged as `[]`.
    pub fn render_args<A: Serialize>(&self, args: &A) -> String {
        match self.render(args) {
            json if json == "null" => "[]".to_string(),
            json => json,
        }
    }

    /// Bound an already rendered string.
    pub fn truncate(&self, mut text: String) -> String {
        if text.len() <= self.max_bytes {
            return text;
        }
        let mut cut = self.max_bytes;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str(TRUNCATED);
        text
    }
}

impl Default for PayloadRenderer {
    fn default() -> Self {
        Self::from_config(&TraceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize, PartialEq, Eq, Hash)]
    struct Key(u8, u8);

    fn unserializable() -> HashMap<Key, u8> {
        // JSON object keys must be strings.
        HashMap::from([(Key(1, 2), 3)])
    }

    #[test]
    fn test_renders_argument_tuple_as_array() {
        let renderer = PayloadRenderer::default();
        assert_eq!(renderer.render(&(1, "two", [3.5])), r#"[1,"two",[3.5]]"#);
        assert_eq!(renderer.render(&()), "null");
        assert_eq!(renderer.render_args(&()), "[]");
        assert_eq!(renderer.render_args(&(None::<u8>,)), "[null]");
    }

    #[test]
    fn test_placeholder_on_failure() {
        let renderer = PayloadRenderer::new(SerializeFailure::Placeholder, 1024);
        let rendered = renderer.render(&unserializable());
        assert!(rendered.starts_with("<unserializable: "), "{rendered}");
    }

    #[test]
    #[should_panic(expected = "trace payload is not serializable")]
    fn test_panic_policy() {
        let renderer = PayloadRenderer::new(SerializeFailure::Panic, 1024);
        renderer.render(&unserializable());
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        let renderer = PayloadRenderer::new(SerializeFailure::Placeholder, 4);
        assert_eq!(renderer.truncate("abc".into()), "abc");
        assert_eq!(renderer.truncate("abcdef".into()), format!("abcd{TRUNCATED}"));
        // "é" is two bytes; byte 4 falls inside the second one.
        assert_eq!(renderer.truncate("aééb".into()), format!("aé{TRUNCATED}"));
    }
}
