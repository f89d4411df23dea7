//! In-memory catalog of clothing items
//!
//! The catalog is read from a CSV once at startup. Items are grouped by type
//! and each group is shuffled so the outfit builder does not always present
//! the same order. There is no refresh; the catalog is fixed for the
//! lifetime of the process.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::models::ClothingItem;

/// Type shown when the outfit builder is opened without one
pub const DEFAULT_ITEM_TYPE: &str = "fullbody wear";

/// Absolute prefix found in catalogs exported from the Windows workstation
const EXPORT_PATH_PREFIX: &str = "C:/Outfit Builder/static/";

/// Clothing catalog partitioned by item type
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<ClothingItem>,
    by_type: HashMap<String, Vec<ClothingItem>>,
}

impl Catalog {
    /// Load the catalog from a CSV file
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;
        let catalog = Self::from_reader(file)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;

        info!(
            "Loaded {} catalog items in {} types from {}",
            catalog.len(),
            catalog.by_type.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Read the catalog from CSV data with `Srno`, `File path`, `Style` and `Type` columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let items = csv_reader
            .deserialize::<ClothingItem>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_items(items))
    }

    /// Build the catalog from already parsed items
    pub fn from_items(items: Vec<ClothingItem>) -> Self {
        let items: Vec<ClothingItem> = items
            .into_iter()
            .map(|mut item| {
                item.file_path = standardize_file_path(&item.file_path);
                item
            })
            .collect();

        let mut by_type: HashMap<String, Vec<ClothingItem>> = HashMap::new();
        for item in &items {
            by_type
                .entry(item.item_type.clone())
                .or_default()
                .push(item.clone());
        }

        let mut rng = rand::thread_rng();
        for group in by_type.values_mut() {
            group.shuffle(&mut rng);
        }

        Self { items, by_type }
    }

    /// Number of items in the catalog
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item types present in the catalog, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Shuffled items of a type
    ///
    /// The requested name is capitalized before lookup, so `fullbody wear`
    /// finds the `Fullbody wear` group. Unknown types have no items.
    pub fn items_for_type(&self, item_type: &str) -> Option<(&str, &[ClothingItem])> {
        let key = capitalize(item_type);
        self.by_type
            .get_key_value(&key)
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Catalog items whose serial number was selected
    ///
    /// Items come back in catalog order, each at most once, whatever the
    /// order or repetition of `srnos`. Unknown numbers are ignored.
    pub fn select(&self, srnos: &[i64]) -> Vec<ClothingItem> {
        let wanted: HashSet<i64> = srnos.iter().copied().collect();
        self.items
            .iter()
            .filter(|item| wanted.contains(&item.srno))
            .cloned()
            .collect()
    }
}

/// Make a catalog file path relative to the static directory
pub fn standardize_file_path(file_path: &str) -> String {
    file_path.replace(EXPORT_PATH_PREFIX, "").replace('\\', "/")
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Parse the JSON list of selected serial numbers sent by the client
///
/// Entries may be numbers or numeric strings. Malformed JSON yields an empty
/// selection and entries that are not serial numbers are skipped.
pub fn parse_selection(raw: &str) -> Vec<i64> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            debug!("Ignoring malformed item selection: {}", e);
            return Vec::new();
        }
    };

    values
        .iter()
        .filter_map(|value| match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect()
}
