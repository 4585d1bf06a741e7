use thiserror::Error;

/// Fail-fast positional error from the registry parser (component B
/// contract in `spec.md` §4.B: "fail fast with a positional error if a
/// required child/attribute is missing").
#[derive(Debug, Error)]
#[error("{path} at line {line}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub path: String,
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(node: roxmltree::Node, doc: &roxmltree::Document, message: impl Into<String>) -> ParseError {
        let pos = doc.text_pos_at(node.range().start);
        ParseError {
            line: pos.row,
            path: format!("<{}>", node.tag_name().name()),
            message: message.into(),
        }
    }
}
