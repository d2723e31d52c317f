//! Motion errors

use fz_dom::{Document, NodeId, SelectorError};
use fz_runtime::RuntimeError;

#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("invalid selector {selector:?}: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// `querySelectorAll` that names the offending selector on failure
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<NodeId>, MotionError> {
    document
        .query_selector_all(selector)
        .map_err(|source| MotionError::Selector { selector: selector.to_string(), source })
}

pub(crate) fn query_one(document: &Document, selector: &str) -> Result<Option<NodeId>, MotionError> {
    document
        .query_selector(selector)
        .map_err(|source| MotionError::Selector { selector: selector.to_string(), source })
}
