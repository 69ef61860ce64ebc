use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Number of sections a script is split into.
pub const SECTION_COUNT: usize = 3;

pub type Sections = [String; SECTION_COUNT];

/// Which splitting rule produced the sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentationStrategy {
    Delimiter,
    Paragraphs,
    Characters,
}

impl std::fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SegmentationStrategy::Delimiter => "delimiter",
            SegmentationStrategy::Paragraphs => "paragraphs",
            SegmentationStrategy::Characters => "characters",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub sections: Sections,
    pub strategy: SegmentationStrategy,
}

type SplitRule = fn(&Segmenter, &str) -> Option<Sections>;

/// Splits a generated script into exactly three sections.
///
/// Rules are tried in order and the first one that finds enough material wins:
/// the case-insensitive delimiter, then blank-line paragraphs, then an even
/// split by characters. Segmentation never fails.
pub struct Segmenter {
    delimiter: Regex,
    paragraph_break: Regex,
}

impl Segmenter {
    pub fn new(delimiter: &str) -> Result<Self, regex::Error> {
        let delimiter = RegexBuilder::new(&regex::escape(delimiter))
            .case_insensitive(true)
            .build()?;
        let paragraph_break = Regex::new(r"\n\s*\n")?;

        Ok(Self {
            delimiter,
            paragraph_break,
        })
    }

    pub fn segment(&self, script: &str) -> Segmentation {
        let rules: [(SegmentationStrategy, SplitRule); 2] = [
            (SegmentationStrategy::Delimiter, Self::split_on_delimiter),
            (SegmentationStrategy::Paragraphs, Self::split_on_paragraphs),
        ];

        let segmentation = rules
            .iter()
            .find_map(|(strategy, rule)| {
                rule(self, script).map(|sections| Segmentation {
                    sections,
                    strategy: *strategy,
                })
            })
            .unwrap_or_else(|| Segmentation {
                sections: split_on_characters(script),
                strategy: SegmentationStrategy::Characters,
            });

        if segmentation.strategy != SegmentationStrategy::Delimiter {
            tracing::warn!(
                strategy = %segmentation.strategy,
                script_length = script.len(),
                "Script delimiter missing or malformed, using fallback segmentation"
            );
        }

        segmentation
    }

    /// First three delimiter-separated parts. Anything after the third part is dropped.
    fn split_on_delimiter(&self, script: &str) -> Option<Sections> {
        let parts: Vec<&str> = self.delimiter.split(script).collect();
        if parts.len() < SECTION_COUNT {
            return None;
        }

        if parts.len() > SECTION_COUNT {
            // TODO: confirm with product whether extra delimited parts should be merged into the last section
            tracing::warn!(
                parts = parts.len(),
                discarded = parts.len() - SECTION_COUNT,
                "Script has more delimiters than expected, discarding trailing parts"
            );
        }

        Some([
            parts[0].trim().to_string(),
            parts[1].trim().to_string(),
            parts[2].trim().to_string(),
        ])
    }

    /// Blank-line paragraphs distributed into three contiguous groups.
    fn split_on_paragraphs(&self, script: &str) -> Option<Sections> {
        let paragraphs: Vec<&str> = self
            .paragraph_break
            .split(script)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if paragraphs.len() < SECTION_COUNT {
            return None;
        }

        let [first, second, third] = even_bounds(paragraphs.len());
        let join = |range: std::ops::Range<usize>| paragraphs[range].join("\n\n").trim().to_string();

        Some([join(first), join(second), join(third)])
    }
}

/// Three contiguous slices of near-equal character count.
fn split_on_characters(script: &str) -> Sections {
    let chars: Vec<char> = script.chars().collect();
    let [first, second, third] = even_bounds(chars.len());
    let slice = |range: std::ops::Range<usize>| chars[range].iter().collect::<String>().trim().to_string();

    [slice(first), slice(second), slice(third)]
}

/// Split `len` items into three ranges; the last one absorbs the remainder.
fn even_bounds(len: usize) -> [std::ops::Range<usize>; SECTION_COUNT] {
    let size = len / SECTION_COUNT;
    [0..size, size..2 * size, 2 * size..len]
}
