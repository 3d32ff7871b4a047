//! Normalized product returned by the online search proxy.

use serde::{Deserialize, Serialize};

pub const MISSING_TEXT: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub price: String,
    pub link: String,
    pub image: String,
}
