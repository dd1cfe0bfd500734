// src/data_input/block_extractor.rs

use std::cell::OnceCell;

use log::debug;

use crate::constants::{STEP_BLOCK_CLOSE, STEP_BLOCK_OPEN};
use crate::error::{KcError, KcResult};

/// Open/close delimiter pair enclosing one quasi-static step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockMarkers {
    pub open: String,
    pub close: String,
}

impl BlockMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for BlockMarkers {
    fn default() -> Self {
        Self::new(STEP_BLOCK_OPEN, STEP_BLOCK_CLOSE)
    }
}

/// One quasi-static step of a report, borrowed from the report text.
///
/// Tokens are split lazily on first access and cached, so blocks whose
/// channels are never read are never tokenized.
#[derive(Debug, Clone)]
pub struct StepBlock<'a> {
    position: usize,
    content: &'a str,
    tokens: OnceCell<Vec<&'a str>>,
}

impl<'a> StepBlock<'a> {
    pub fn new(position: usize, content: &'a str) -> Self {
        Self {
            position,
            content,
            tokens: OnceCell::new(),
        }
    }

    /// 1-based position of the block in the report.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn content(&self) -> &'a str {
        self.content
    }

    pub fn tokens(&self) -> &[&'a str] {
        self.tokens
            .get_or_init(|| self.content.split_whitespace().collect())
    }

    pub fn token(&self, field_index: usize) -> Option<&'a str> {
        self.tokens().get(field_index).copied()
    }

    pub fn token_count(&self) -> usize {
        self.tokens().len()
    }
}

/// Splits the report into the step blocks enclosed by `markers`, in document order.
///
/// A report without any block yields an empty list. An open marker that is not
/// closed, or that is followed by another open marker before its close, is a
/// parse error. Close markers outside a block are ignored.
pub fn extract_blocks<'a>(content: &'a str, markers: &BlockMarkers) -> KcResult<Vec<StepBlock<'a>>> {
    if markers.open.is_empty() || markers.close.is_empty() {
        return Err(KcError::InvalidDefinition(
            "block markers must not be empty".to_string(),
        ));
    }

    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(found) = content[cursor..].find(markers.open.as_str()) {
        let open_at = cursor + found;
        let body_start = open_at + markers.open.len();
        let position = blocks.len() + 1;

        let close_at = match content[body_start..].find(markers.close.as_str()) {
            Some(rel) => body_start + rel,
            None => {
                return Err(KcError::Parse {
                    block: position,
                    offset: open_at,
                    reason: format!("'{}' is never closed by '{}'", markers.open, markers.close),
                })
            }
        };

        let body = &content[body_start..close_at];
        if let Some(nested) = body.find(markers.open.as_str()) {
            return Err(KcError::Parse {
                block: position,
                offset: body_start + nested,
                reason: format!("'{}' opened again before '{}'", markers.open, markers.close),
            });
        }

        blocks.push(StepBlock::new(position, body));
        cursor = close_at + markers.close.len();
    }

    debug!("Extracted {} step blocks from {} bytes", blocks.len(), content.len());
    Ok(blocks)
}


// src/data_input/block_extractor.rs
