//! Clothing item model

use serde::{Deserialize, Serialize};

/// One clothing item of the catalog
///
/// Deserializes both from the catalog CSV headers (`Srno`, `File path`,
/// `Style`, `Type`) and from the JSON stored with an outfit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    #[serde(alias = "Srno")]
    pub srno: i64,
    #[serde(alias = "File path")]
    pub file_path: String,
    #[serde(alias = "Style")]
    pub style: String,
    #[serde(rename = "type", alias = "Type")]
    pub item_type: String,
}
