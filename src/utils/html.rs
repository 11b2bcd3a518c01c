// src/utils/html.rs

/// Cleans module rich-text content using the ammonia library.
///
/// Whitelist-based: safe formatting tags (<b>, <p>, lists, links) survive,
/// while <script>, <iframe> and event-handler attributes are stripped along
/// with the contents of <script>.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
