//! Site errors

use std::path::PathBuf;

use fz_html::HtmlError;
use fz_runtime::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("no element matches {0:?}")]
    NoMatch(String),

    #[error(transparent)]
    Selector(#[from] fz_dom::SelectorError),
}
