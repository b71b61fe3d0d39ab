//! Content scoring over plain node records.
//!
//! Scoring never touches the DOM. The traversal in `dom` reduces each
//! candidate container to a [`NodeRecord`] and this module ranks them.
//!
//! For a record with visible text length `T`, link text `L`, outer markup
//! length `M` and `P` paragraph blocks:
//!
//! ```text
//! length    = min(T / 100, 30)
//! paras     = min(P, 10)
//! density   = min(T / M, 1)
//! links     = min(L / T, 1)
//! score     = (length + paras) * (0.5 + density) * (1 - links)
//!           + tag_weight + class_weight + ancestor_penalty
//! ```
//!
//! Ties go to the earliest record in document order.

/// Flat description of one candidate container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRecord {
    /// Lowercase tag name
    pub tag: String,

    /// Characters of visible text (whitespace collapsed)
    pub text_len: usize,

    /// Characters of visible text inside `<a>` descendants
    pub link_text_len: usize,

    /// Bytes of the element's outer HTML
    pub markup_len: usize,

    /// Non-empty `p`/`pre`/`blockquote` descendants
    pub paragraph_count: usize,

    /// class/id tokens of the element itself
    pub own_tokens: Vec<String>,

    /// class/id tokens of every ancestor
    pub ancestor_tokens: Vec<String>,
}

pub const MAX_LENGTH_POINTS: f64 = 30.0;
pub const MAX_PARAGRAPH_POINTS: usize = 10;
pub const CLASS_WEIGHT: f64 = 25.0;
pub const ANCESTOR_PENALTY: f64 = 10.0;

const POSITIVE_TOKENS: &[&str] = &[
    "article", "body", "content", "entry", "main", "post", "story", "text", "blog", "prose",
];

const NEGATIVE_TOKENS: &[&str] = &[
    "comment", "comments", "meta", "footer", "sidebar", "widget", "promo", "related", "share",
    "sponsor", "sponsored", "tags", "nav", "menu", "ad", "ads",
];

/// Structural weight of a tag.
pub fn tag_weight(tag: &str) -> f64 {
    match tag {
        "article" => 25.0,
        "main" => 20.0,
        "section" => 5.0,
        "div" => 0.0,
        "td" | "blockquote" => -3.0,
        "body" => -5.0,
        "form" => -10.0,
        "aside" | "nav" | "header" | "footer" => -25.0,
        _ => 0.0,
    }
}

/// ±25 for the element's own class/id tokens (positive and negative can cancel).
pub fn class_weight(tokens: &[String]) -> f64 {
    let mut weight = 0.0;
    if tokens.iter().any(|t| POSITIVE_TOKENS.contains(&t.as_str())) {
        weight += CLASS_WEIGHT;
    }
    if tokens.iter().any(|t| NEGATIVE_TOKENS.contains(&t.as_str())) {
        weight -= CLASS_WEIGHT;
    }
    weight
}

pub fn link_density(record: &NodeRecord) -> f64 {
    if record.text_len == 0 {
        return 1.0;
    }
    (record.link_text_len as f64 / record.text_len as f64).min(1.0)
}

pub fn text_density(record: &NodeRecord) -> f64 {
    if record.markup_len == 0 {
        return 0.0;
    }
    (record.text_len as f64 / record.markup_len as f64).min(1.0)
}

pub fn score(record: &NodeRecord) -> f64 {
    if record.text_len == 0 {
        return f64::MIN;
    }

    let length = (record.text_len as f64 / 100.0).min(MAX_LENGTH_POINTS);
    let paragraphs = record.paragraph_count.min(MAX_PARAGRAPH_POINTS) as f64;
    let content =
        (length + paragraphs) * (0.5 + text_density(record)) * (1.0 - link_density(record));

    let ancestor = if record
        .ancestor_tokens
        .iter()
        .any(|t| NEGATIVE_TOKENS.contains(&t.as_str()))
    {
        -ANCESTOR_PENALTY
    } else {
        0.0
    };

    content + tag_weight(&record.tag) + class_weight(&record.own_tokens) + ancestor
}

/// Index of the highest-scoring record; the first one wins a tie.
pub fn best_candidate(records: &[NodeRecord]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, record) in records.iter().enumerate() {
        let s = score(record);
        match best {
            Some((_, top)) if s <= top => {}
            _ => best = Some((index, s)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: &str, text_len: usize, markup_len: usize) -> NodeRecord {
        NodeRecord {
            tag: tag.to_string(),
            text_len,
            markup_len,
            paragraph_count: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_article_outranks_div_with_same_text() {
        let article = record("article", 1200, 1500);
        let div = record("div", 1200, 1500);
        assert!(score(&article) > score(&div));
    }

    #[test]
    fn test_link_heavy_block_is_penalized() {
        let prose = record("div", 800, 1000);
        let links = NodeRecord {
            link_text_len: 700,
            ..record("div", 800, 1000)
        };
        assert!(score(&prose) > score(&links));
        assert!((link_density(&links) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_markup_beats_dense_markup() {
        let tight = record("div", 1000, 1200);
        let bloated = record("div", 1000, 9000);
        assert!(score(&tight) > score(&bloated));
    }

    #[test]
    fn test_aside_and_nav_penalized() {
        assert!(score(&record("aside", 1000, 1200)) < score(&record("div", 1000, 1200)));
        assert!(score(&record("nav", 1000, 1200)) < score(&record("section", 1000, 1200)));
    }

    #[test]
    fn test_class_tokens() {
        let content = NodeRecord {
            own_tokens: vec!["post".into(), "content".into()],
            ..record("div", 600, 800)
        };
        let widget = NodeRecord {
            own_tokens: vec!["widget".into()],
            ..record("div", 600, 800)
        };
        let under_comments = NodeRecord {
            ancestor_tokens: vec!["comments".into()],
            ..record("div", 600, 800)
        };
        let plain = record("div", 600, 800);

        assert!(score(&content) > score(&plain));
        assert!(score(&widget) < score(&plain));
        assert!(score(&under_comments) < score(&plain));
    }

    #[test]
    fn test_empty_record_never_wins() {
        let records = vec![record("article", 0, 100), record("div", 150, 400)];
        assert_eq!(best_candidate(&records), Some(1));
    }

    #[test]
    fn test_tie_goes_to_first_in_document_order() {
        let records = vec![record("div", 500, 700), record("div", 500, 700)];
        assert_eq!(best_candidate(&records), Some(0));
        assert_eq!(best_candidate(&[]), None);
    }
}
