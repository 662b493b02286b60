use regex::Regex;
use std::sync::OnceLock;

/// Transformation that can be applied to a title
///
/// Each transformation is composable and testable in isolation.
pub trait TitleTransformation: Send + Sync {
    fn transform(&self, title: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Normalizes whitespace (collapses multiple spaces, trims)
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl TitleTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, title: &str) -> String {
        title.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

/// Removes one trailing marker matched by an end-anchored pattern.
///
/// A strip that would leave nothing behind is not applied, so a title made
/// only of a marker keeps its text.
#[derive(Debug, Clone)]
pub struct StripSuffixTransform {
    name: &'static str,
    pattern: Regex,
}

impl StripSuffixTransform {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid regex pattern defined in code"),
        }
    }
}

impl TitleTransformation for StripSuffixTransform {
    fn transform(&self, title: &str) -> String {
        let stripped = self.pattern.replace(title, "");
        let stripped = stripped.trim_end();
        if stripped.is_empty() {
            title.to_string()
        } else {
            stripped.to_string()
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Title normalizer that applies a pipeline of transformations
///
/// The pipeline is re-run until the title stops changing, so the result is
/// a fixpoint: normalizing an already normalized title is a no-op. No
/// transformation lengthens its input, so the loop terminates.
pub struct TitleNormalizer {
    transformations: Vec<Box<dyn TitleTransformation>>,
}

impl TitleNormalizer {
    /// Create a new empty normalizer
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Pipeline recovering the base series name from a season title
    pub fn season_suffix_pipeline() -> Self {
        Self::new()
            .with(NormalizeWhitespaceTransform)
            .with(StripSuffixTransform::new(
                "SeasonPart",
                r"(?i)[\s:\-–—,]*\bseason\s*\d+\s*(?:part|cour)\s*(?:\d+|[ivx]+)\s*$",
            ))
            .with(StripSuffixTransform::new(
                "SeparatedSeason",
                r"(?i)\s*[\-:–—]\s*season\s*\d+\s*$",
            ))
            .with(StripSuffixTransform::new(
                "BracketedSeason",
                r"(?i)\s*[\(\[]\s*season\s*\d+\s*[\)\]]\s*$",
            ))
            .with(StripSuffixTransform::new(
                "OrdinalSeason",
                r"(?i)[\s:\-–—,]*\b\d+(?:st|nd|rd|th)\s+season\b.*$",
            ))
            .with(StripSuffixTransform::new(
                "FinalSeason",
                r"(?i)[\s:\-–—,]*\b(?:the\s+)?final\s+season\b.*$",
            ))
            .with(StripSuffixTransform::new(
                "Season",
                r"(?i)[\s:\-–—,]*\bseason\s*\d+\s*$",
            ))
            .with(StripSuffixTransform::new(
                "PartOrCour",
                r"(?i)[\s:\-–—,]*\b(?:part|cour)\s*(?:\d+|[ivx]+)\s*$",
            ))
            .with(StripSuffixTransform::new(
                "RomanNumeral",
                r"(?i)\s+(?:ii|iii|iv|v|vi|vii|viii|ix|x)\s*$",
            ))
            .with(StripSuffixTransform::new("BareNumber", r"\s+\d{1,2}\s*$"))
            .with(StripSuffixTransform::new(
                "TrailingSeparator",
                r"[\s:\-–—,]+$",
            ))
    }

    /// Add a transformation to the end of the pipeline
    pub fn with<T: TitleTransformation + 'static>(mut self, transformation: T) -> Self {
        self.transformations.push(Box::new(transformation));
        self
    }

    fn apply_once(&self, title: &str) -> String {
        let mut result = title.to_string();

        for transformation in &self.transformations {
            result = transformation.transform(&result);
            log::trace!("After {}: '{}'", transformation.name(), result);
        }

        result
    }

    /// Apply the pipeline until the title no longer changes
    pub fn normalize(&self, title: &str) -> String {
        let mut current = title.to_string();

        loop {
            let next = self.apply_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Get the number of transformations in the pipeline
    pub fn transformation_count(&self) -> usize {
        self.transformations.len()
    }
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::season_suffix_pipeline()
    }
}

fn shared_normalizer() -> &'static TitleNormalizer {
    static NORMALIZER: OnceLock<TitleNormalizer> = OnceLock::new();
    NORMALIZER.get_or_init(TitleNormalizer::season_suffix_pipeline)
}

/// Base series title of `raw`, with season/part/sequel markers removed
pub fn normalize_title(raw: &str) -> String {
    shared_normalizer().normalize(raw)
}

/// Whether normalization removed a season marker from `raw`
pub fn has_season_suffix(raw: &str) -> bool {
    let collapsed = NormalizeWhitespaceTransform.transform(raw);
    normalize_title(&collapsed) != collapsed
}

/// URL slug: lowercase, non-alphanumerics collapsed into single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());

    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}
