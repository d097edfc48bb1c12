/// Splits a comma-separated model answer into trimmed, non-empty tags.
///
/// Output that holds no usable tag yields an empty list rather than an error.
pub fn parse_categories(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(String::from)
        .collect()
}
