//! Style and item statistics over outfits
//!
//! Every count keeps labels in the order they were first seen, so ties are
//! always resolved in favour of the label encountered first.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::models::Outfit;

/// An item image and how many outfits use it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingItem {
    pub file_path: String,
    pub count: usize,
}

/// Count occurrences, keeping first-seen order
pub fn tally<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut positions: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match positions.get(&value) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// The value with the highest count; the earliest one wins a tie
fn most_common<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<(T, usize)> = None;
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// The style shared by most of the given items
///
/// Returns `None` for an empty selection.
pub fn most_reflected_style<'a, I>(styles: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    most_common(styles).map(str::to_string)
}

/// The most frequent outfit style and the most used item image of a user
///
/// Returns `(None, None)` when there are no outfits.
pub fn overall_style_preference<'a, I>(outfits: I) -> (Option<String>, Option<String>)
where
    I: IntoIterator<Item = &'a Outfit>,
{
    let outfits: Vec<&Outfit> = outfits.into_iter().collect();

    let style = most_common(outfits.iter().map(|o| o.style.as_str())).map(str::to_string);
    let image = most_common(
        outfits
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.file_path.as_str())),
    )
    .map(str::to_string);

    (style, image)
}

/// Number of outfits per style
pub fn style_distribution<'a, I>(outfits: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Outfit>,
{
    owned(tally(outfits.into_iter().map(|o| o.style.as_str())))
}

/// Number of items per item type, over all items of the outfits
pub fn type_distribution<'a, I>(outfits: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a Outfit>,
{
    owned(tally(
        outfits
            .into_iter()
            .flat_map(|o| o.items.iter().map(|i| i.item_type.as_str())),
    ))
}

/// The `limit` item images used the most across the outfits
pub fn trending_items<'a, I>(outfits: I, limit: usize) -> Vec<TrendingItem>
where
    I: IntoIterator<Item = &'a Outfit>,
{
    let mut counts = tally(
        outfits
            .into_iter()
            .flat_map(|o| o.items.iter().map(|i| i.file_path.as_str())),
    );
    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(limit)
        .map(|(file_path, count)| TrendingItem {
            file_path: file_path.to_string(),
            count,
        })
        .collect()
}

fn owned(counts: Vec<(&str, usize)>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}
