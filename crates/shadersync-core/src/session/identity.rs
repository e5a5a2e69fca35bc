/// Extracts a document identity from user input.
///
/// Accepts a bare id or a URL; the last non-empty path segment wins. Query
/// strings and fragments are ignored.
pub fn parse_identity(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed);

    without_query
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}
