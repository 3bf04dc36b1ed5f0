//! Composition rules shared by the hosts
//!
//! Layers always apply outer to inner: mount call, router, route.
//! - Paths: segments joined with exactly one `/` between them.
//! - Tags: concatenated in layer order, duplicates dropped (first wins).
//! - Responses: overlaid in layer order, the inner layer wins a tie.
//! - Interceptors and guards: concatenated in layer order, outermost runs first.

use crate::spec::Responses;

/// Join path segments with single separators
///
/// Leading and trailing slashes of every segment are ignored and empty
/// segments are skipped, so the result never has a doubled or missing
/// separator. The joined path always starts with `/` and never ends with one
/// unless it is the root.
pub fn join_path(segments: &[&str]) -> String {
    let joined = segments
        .iter()
        .map(|segment| segment.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Ordered union of tag layers
pub fn union_tags<'a, I>(layers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in layers.into_iter().flatten() {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Overlay response layers; later layers win on the same status
pub fn overlay_responses<'a, I>(layers: I) -> Responses
where
    I: IntoIterator<Item = &'a Responses>,
{
    let mut merged = Responses::new();
    for layer in layers {
        for (status, doc) in layer {
            merged.insert(*status, doc.clone());
        }
    }
    merged
}

/// Concatenate list layers, keeping every element
pub fn concat<'a, T, I>(layers: I) -> Vec<T>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a [T]>,
{
    layers.into_iter().flatten().cloned().collect()
}
