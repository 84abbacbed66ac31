//! The ordered rule table. Rule order, ids and deductions are part of the
//! report format consumers depend on.

use crate::domain::models::{CheckStatus, PageSignals};

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 65;
pub const META_DESCRIPTION_MIN_CHARS: usize = 120;
pub const MIN_WORD_COUNT: usize = 300;
pub const MIN_INTERNAL_LINKS: usize = 2;
pub const READABILITY_DIFFICULT_BELOW: u8 = 30;
pub const READABILITY_MODERATE_BELOW: u8 = 50;

/// Result of evaluating one rule before it becomes a `CheckResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: CheckStatus,
    pub message: String,
    pub deduction: u8,
}

impl Outcome {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
            deduction: 0,
        }
    }

    fn warning(deduction: u8, message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
            deduction,
        }
    }

    fn fail(deduction: u8, message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
            deduction,
        }
    }
}

pub struct Rule {
    pub id: &'static str,
    pub label: &'static str,
    pub evaluate: fn(&PageSignals, &str) -> Outcome,
}

pub static RULES: [Rule; 15] = [
    Rule { id: "title_length_short", label: "Title Length", evaluate: title_length_short },
    Rule { id: "title_length_long", label: "Title Length", evaluate: title_length_long },
    Rule { id: "title_keyword", label: "Title Keyword", evaluate: title_keyword },
    Rule { id: "h1_presence", label: "H1 Heading", evaluate: h1_presence },
    Rule { id: "h1_keyword", label: "H1 Keyword", evaluate: h1_keyword },
    Rule { id: "meta_description_presence", label: "Meta Description", evaluate: meta_description_presence },
    Rule { id: "meta_description_length", label: "Meta Description Length", evaluate: meta_description_length },
    Rule { id: "content_depth", label: "Content Depth", evaluate: content_depth },
    Rule { id: "canonical_presence", label: "Canonical URL", evaluate: canonical_presence },
    Rule { id: "social_tags", label: "Social Tags", evaluate: social_tags },
    Rule { id: "image_alt", label: "Image Alt Text", evaluate: image_alt },
    Rule { id: "structured_data", label: "Structured Data", evaluate: structured_data },
    Rule { id: "internal_links", label: "Internal Links", evaluate: internal_links },
    Rule { id: "readability_difficult", label: "Readability", evaluate: readability_difficult },
    Rule { id: "readability_moderate", label: "Readability", evaluate: readability_moderate },
];

/// Case-insensitive substring match; an empty keyword always matches.
pub fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&keyword.trim().to_lowercase())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn title_length_short(s: &PageSignals, _: &str) -> Outcome {
    let len = char_len(&s.title);
    if len < TITLE_MIN_CHARS {
        Outcome::warning(
            10,
            format!("Title too short ({} chars, recommend at least {})", len, TITLE_MIN_CHARS),
        )
    } else {
        Outcome::pass(format!("Title length is optimal ({} chars)", len))
    }
}

fn title_length_long(s: &PageSignals, _: &str) -> Outcome {
    let len = char_len(&s.title);
    if len > TITLE_MAX_CHARS {
        Outcome::warning(
            5,
            format!("Title too long ({} chars, recommend at most {})", len, TITLE_MAX_CHARS),
        )
    } else {
        Outcome::pass(format!("Title fits in search results ({} chars)", len))
    }
}

fn title_keyword(s: &PageSignals, keyword: &str) -> Outcome {
    if contains_keyword(&s.title, keyword) {
        Outcome::pass(format!("Title contains focus keyword \"{}\"", keyword))
    } else {
        Outcome::fail(15, format!("Title is missing focus keyword \"{}\"", keyword))
    }
}

fn h1_presence(s: &PageSignals, _: &str) -> Outcome {
    if s.h1.is_empty() {
        Outcome::fail(10, "Missing H1 heading")
    } else {
        Outcome::pass("H1 heading is present")
    }
}

fn h1_keyword(s: &PageSignals, keyword: &str) -> Outcome {
    if s.h1.is_empty() {
        Outcome::pass("No H1 heading to check for the focus keyword")
    } else if contains_keyword(&s.h1, keyword) {
        Outcome::pass(format!("H1 contains focus keyword \"{}\"", keyword))
    } else {
        Outcome::warning(5, format!("H1 is missing focus keyword \"{}\"", keyword))
    }
}

fn meta_description_presence(s: &PageSignals, _: &str) -> Outcome {
    if s.meta_description.is_empty() {
        Outcome::fail(10, "Missing meta description")
    } else {
        Outcome::pass("Meta description is present")
    }
}

fn meta_description_length(s: &PageSignals, _: &str) -> Outcome {
    let len = char_len(&s.meta_description);
    if len == 0 {
        Outcome::pass("No meta description to measure")
    } else if len < META_DESCRIPTION_MIN_CHARS {
        Outcome::warning(
            5,
            format!(
                "Meta description too short ({} chars, recommend at least {})",
                len, META_DESCRIPTION_MIN_CHARS
            ),
        )
    } else {
        Outcome::pass(format!("Meta description length is good ({} chars)", len))
    }
}

fn content_depth(s: &PageSignals, _: &str) -> Outcome {
    if s.word_count < MIN_WORD_COUNT {
        Outcome::fail(
            10,
            format!("Thin content ({} words, recommend at least {})", s.word_count, MIN_WORD_COUNT),
        )
    } else {
        Outcome::pass(format!("Content depth is good ({} words)", s.word_count))
    }
}

fn canonical_presence(s: &PageSignals, _: &str) -> Outcome {
    if s.canonical_url.is_empty() {
        Outcome::warning(5, "Missing canonical URL")
    } else {
        Outcome::pass(format!("Canonical URL set to {}", s.canonical_url))
    }
}

fn social_tags(s: &PageSignals, _: &str) -> Outcome {
    let missing: Vec<&str> = [("og:title", &s.og_title), ("og:image", &s.og_image)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

    if missing.is_empty() {
        Outcome::pass("Open Graph title and image are set")
    } else {
        Outcome::warning(5, format!("Missing social tags: {}", missing.join(", ")))
    }
}

fn image_alt(s: &PageSignals, _: &str) -> Outcome {
    match s.missing_alt_image_count {
        0 => Outcome::pass("All images have alt text"),
        1 => Outcome::warning(5, "1 image is missing alt text"),
        n => Outcome::warning(5, format!("{} images are missing alt text", n)),
    }
}

fn structured_data(s: &PageSignals, _: &str) -> Outcome {
    if s.has_structured_data {
        Outcome::pass("JSON-LD structured data found")
    } else {
        Outcome::warning(0, "No JSON-LD structured data found")
    }
}

fn internal_links(s: &PageSignals, _: &str) -> Outcome {
    if s.internal_link_count < MIN_INTERNAL_LINKS {
        Outcome::warning(
            5,
            format!(
                "Only {} internal links (recommend at least {})",
                s.internal_link_count, MIN_INTERNAL_LINKS
            ),
        )
    } else {
        Outcome::pass(format!("{} internal links", s.internal_link_count))
    }
}

fn readability_difficult(s: &PageSignals, _: &str) -> Outcome {
    if s.readability_score < READABILITY_DIFFICULT_BELOW {
        Outcome::warning(
            5,
            format!("Text is very difficult to read (reading ease {})", s.readability_score),
        )
    } else {
        Outcome::pass(format!("Text is not very difficult (reading ease {})", s.readability_score))
    }
}

fn readability_moderate(s: &PageSignals, _: &str) -> Outcome {
    let score = s.readability_score;
    if (READABILITY_DIFFICULT_BELOW..READABILITY_MODERATE_BELOW).contains(&score) {
        Outcome::warning(0, format!("Text is fairly difficult to read (reading ease {})", score))
    } else if score < READABILITY_DIFFICULT_BELOW {
        Outcome::pass(format!("Reading ease {} is below the moderate band", score))
    } else {
        Outcome::pass(format!("Text is easy to read (reading ease {})", score))
    }
}
