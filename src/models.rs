use serde::{Deserialize, Serialize};

/// PageView
///
/// What a page handler behind the gate returns: the locale the page is served
/// in and the logical page path, without its locale segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub locale: String,
    /// Logical page path, `/` for the home page.
    pub page: String,
}

/// ErrorBody
///
/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
