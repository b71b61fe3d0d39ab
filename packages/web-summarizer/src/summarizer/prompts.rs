//! Prompts for the summarization call.

use crate::types::request::SummaryOptions;
use crate::types::summary::Category;

/// System prompt pinning the output format.
pub const SYSTEM_PROMPT: &str = "You are a precise summarization engine. \
You read web articles and answer with a single JSON object and nothing else. \
You never invent facts that are not present in the supplied text.";

/// Prompt for summarizing extracted page text.
pub const SUMMARIZE_PROMPT: &str = r#"Summarize the following web page.

Return a JSON object with exactly these fields:
{
    "summary": "at most {max_sentences} sentences of plain prose",
    "key_points": ["exactly {num_key_points} short, self-contained statements"],
    "category": "one of: {categories}"{citations_field}
}

Rules:
- Use only information present in the text.
- `key_points` must contain exactly {num_key_points} non-empty strings.
- `category` must be a single value from the list above, spelled exactly as shown.{citations_rule}
- Do not wrap the JSON in markdown code fences.

Title: {title}

Text:
{content}"#;

const CITATIONS_FIELD: &str = r#",
    "citations": ["verbatim quotes copied from the text"]"#;

const CITATIONS_RULE: &str = "
- Every entry in `citations` must be copied word for word from the text. Include 1-3 quotes.";

/// Follow-up sent after output that failed validation.
pub const CORRECTIVE_PROMPT: &str = r#"Your previous reply could not be used: {problem}.

Reply again with ONLY a JSON object of this exact shape and no other text:
{
    "summary": string (non-empty, at most {max_sentences} sentences),
    "key_points": array of exactly {num_key_points} non-empty strings,
    "category": one of {categories}{citations_field}
}"#;

const CORRECTIVE_CITATIONS_FIELD: &str = r#",
    "citations": array of strings quoted verbatim from the text"#;

fn category_list() -> String {
    Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Substitute `{placeholder}`s in one pass. Placeholders inside substituted
/// values are left as is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Format the summarization prompt.
pub fn format_summarize_prompt(content: &str, title: &str, options: &SummaryOptions) -> String {
    let (citations_field, citations_rule) = if options.include_citations {
        (CITATIONS_FIELD, CITATIONS_RULE)
    } else {
        ("", "")
    };

    let max_sentences = options.max_summary_sentences.to_string();
    let num_key_points = options.num_key_points.to_string();
    let categories = category_list();
    fill(
        SUMMARIZE_PROMPT,
        &[
            ("{max_sentences}", max_sentences.as_str()),
            ("{num_key_points}", num_key_points.as_str()),
            ("{categories}", categories.as_str()),
            ("{citations_field}", citations_field),
            ("{citations_rule}", citations_rule),
            ("{title}", title),
            ("{content}", content),
        ],
    )
}

/// Format the one-shot repair prompt.
pub fn format_corrective_prompt(problem: &str, options: &SummaryOptions) -> String {
    let citations_field = if options.include_citations {
        CORRECTIVE_CITATIONS_FIELD
    } else {
        ""
    };

    let max_sentences = options.max_summary_sentences.to_string();
    let num_key_points = options.num_key_points.to_string();
    let categories = category_list();
    fill(
        CORRECTIVE_PROMPT,
        &[
            ("{problem}", problem),
            ("{max_sentences}", max_sentences.as_str()),
            ("{num_key_points}", num_key_points.as_str()),
            ("{categories}", categories.as_str()),
            ("{citations_field}", citations_field),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_prompt_carries_options() {
        let options = SummaryOptions::default().with_key_points(3).with_max_sentences(2);
        let prompt = format_summarize_prompt("Body text here.", "A Title", &options);

        assert!(prompt.contains("exactly 3 non-empty strings"));
        assert!(prompt.contains("at most 2 sentences"));
        assert!(prompt.contains("Technology, Business, Science"));
        assert!(prompt.contains("Title: A Title"));
        assert!(prompt.ends_with("Body text here."));
        assert!(!prompt.contains("citations"));
        assert!(!prompt.contains("{num_key_points}"));
        assert!(!prompt.contains("{citations_rule}"));
    }

    #[test]
    fn test_citations_requested() {
        let options = SummaryOptions::default().with_citations(true);
        let prompt = format_summarize_prompt("text", "t", &options);
        assert!(prompt.contains("\"citations\""));
        assert!(prompt.contains("word for word"));

        let corrective = format_corrective_prompt("missing field `summary`", &options);
        assert!(corrective.contains("missing field `summary`"));
        assert!(corrective.contains("\"citations\""));
    }

    #[test]
    fn test_page_text_placeholders_are_not_expanded() {
        let options = SummaryOptions::default();
        let prompt =
            format_summarize_prompt("Body mentions {title} literally.", "{content}", &options);

        assert!(prompt.contains("Title: {content}\n"));
        assert!(prompt.ends_with("Body mentions {title} literally."));
        assert_eq!(prompt.matches("Body mentions").count(), 1);
        assert!(prompt.contains("\"summary\""));
    }
}
