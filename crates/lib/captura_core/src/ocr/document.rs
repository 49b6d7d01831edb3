//! Structured text documents.
//!
//! The shape a delta-based rich-text editor consumes directly: an ordered
//! sequence of insert operations. The store treats the serialized form as
//! an opaque blob; only ingestion and editing boundaries know this shape.

use serde::{Deserialize, Serialize};

/// A single insert operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOp {
    pub insert: String,
}

/// Rich-text document as an ordered list of insert operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    pub ops: Vec<InsertOp>,
}

impl TextDocument {
    /// Wrap plain text: each newline-separated segment becomes one insert
    /// op terminated by a newline.
    pub fn from_text(text: &str) -> Self {
        let ops = text
            .split('\n')
            .map(|line| InsertOp {
                insert: format!("{line}\n"),
            })
            .collect();
        Self { ops }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_becomes_one_op() {
        let doc = TextDocument::from_text("texto normalizado");
        assert_eq!(
            doc.ops,
            vec![InsertOp {
                insert: "texto normalizado\n".into()
            }]
        );
    }

    #[test]
    fn each_line_becomes_its_own_op() {
        let doc = TextDocument::from_text("um\ndois");
        assert_eq!(doc.ops.len(), 2);
        assert_eq!(doc.ops[0].insert, "um\n");
        assert_eq!(doc.ops[1].insert, "dois\n");
    }

    #[test]
    fn serializes_to_the_editor_delta_shape() {
        let doc = TextDocument::from_text("texto");
        let json = serde_json::to_value(&doc).expect("serialize");
        assert_eq!(json, serde_json::json!({"ops": [{"insert": "texto\n"}]}));
    }
}
