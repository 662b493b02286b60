use regex::Regex;
use std::sync::OnceLock;

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<[^>]*>").expect("Invalid regex"))
}

/// Plain-text synopsis: HTML tags dropped, entities decoded,
/// whitespace collapsed. Empty results become `None`.
pub fn clean_synopsis(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let stripped = tag_regex().replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&stripped);

    let text = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}
