//! Prompts and reply shapes for the chat model.

use crate::tavily::SearchHit;
use newsfax_core::Truthfulness;
use serde::Deserialize;

pub const QUOTES_SYSTEM: &str = "You extract statements that a page presents as factual. \
Copy each statement verbatim from the page: do not paraphrase, summarize or fix typos. \
Prefer concrete claims about numbers, people, events and conditions. \
Reply with a JSON object {\"quotes\": [string, ...]}; use an empty list if there are none.";

pub const VERDICT_SYSTEM: &str = "You are a fact-checker. Using only the search results provided, \
classify the statement as TRUE (supported by reliable sources), SOMEWHAT TRUE (partially correct \
or missing context) or FALSE (contradicted, or no credible evidence). \
Reply with a JSON object {\"truthfulness\": \"TRUE\" | \"SOMEWHAT TRUE\" | \"FALSE\", \
\"summary\": string of one or two sentences, \"sources\": [url, ...]} where sources are URLs \
taken from the search results that support your verdict.";

/// Reply to the quote extraction prompt.
#[derive(Debug, Deserialize)]
pub struct QuotesReply {
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// Reply to the verdict prompt.
#[derive(Debug, Deserialize)]
pub struct VerdictReply {
    pub truthfulness: Truthfulness,
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

pub fn quotes_prompt(content: &str, max_facts: usize) -> String {
    format!("Extract at most {max_facts} factual statements from this page content.\n\nContent:\n{content}")
}

pub fn verdict_prompt(statement: &str, hits: &[SearchHit]) -> String {
    let mut prompt = format!("Statement to verify: \"{statement}\"\n\nSearch results:\n");
    if hits.is_empty() {
        prompt.push_str("(no results)\n");
    }
    for (i, hit) in hits.iter().enumerate() {
        prompt.push_str(&format!("[{}] {}\nURL: {}\n{}\n\n", i + 1, hit.title, hit.url, hit.content));
    }
    prompt
}

/// Cut `content` to at most `max_chars` characters.
pub fn truncate_content(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

/// Strip whitespace, wrapping quote marks and escaped quotes from a statement.
pub fn clean_quote(raw: &str) -> String {
    let mut text = raw.trim();
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')] {
        if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
            text = &text[open.len_utf8()..text.len() - close.len_utf8()];
            break;
        }
    }
    text.replace("\\\"", "\"").trim().to_string()
}

/// Clean, drop empty and duplicate quotes, keep the first `max_facts`.
pub fn select_quotes(raw: Vec<String>, max_facts: usize) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for quote in raw.iter().map(|q| clean_quote(q)) {
        if quote.is_empty() || selected.contains(&quote) {
            continue;
        }
        selected.push(quote);
        if selected.len() == max_facts {
            break;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_content_char_boundary() {
        assert_eq!(truncate_content("héllo wörld", 5), "héllo");
        assert_eq!(truncate_content("short", 100), "short");
        assert_eq!(truncate_content("", 3), "");
    }

    #[test]
    fn test_clean_quote() {
        assert_eq!(clean_quote("  \"Unemployment fell to 3.5%.\"  "), "Unemployment fell to 3.5%.");
        assert_eq!(clean_quote("\u{201c}EVs are cleaner\u{201d}"), "EVs are cleaner");
        assert_eq!(clean_quote(r#"He said \"no\" twice"#), r#"He said "no" twice"#);
        assert_eq!(clean_quote("\""), "\"");
    }

    #[test]
    fn test_select_quotes_dedupes_and_caps() {
        let raw = vec![
            "\"a\"".to_string(),
            "a".to_string(),
            "   ".to_string(),
            "b".to_string(),
            "c".to_string(),
        ];
        assert_eq!(select_quotes(raw, 2), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_parse_verdict_reply() {
        let json = r#"{"truthfulness": "SOMEWHAT TRUE", "summary": "Missing context.", "sources": ["https://www.bls.gov/"]}"#;
        let reply: VerdictReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.truthfulness, Truthfulness::SomewhatTrue);
        assert_eq!(reply.sources.len(), 1);
    }

    #[test]
    fn test_parse_quotes_reply_missing_field() {
        let reply: QuotesReply = serde_json::from_str("{}").unwrap();
        assert!(reply.quotes.is_empty());
    }

    #[test]
    fn test_verdict_prompt_lists_hits() {
        let hits = vec![SearchHit {
            title: "IEA".to_string(),
            url: "https://www.iea.org/".to_string(),
            content: "Renewables grew.".to_string(),
        }];
        let prompt = verdict_prompt("renewable energy is cheap", &hits);
        assert!(prompt.contains("[1] IEA"));
        assert!(prompt.contains("URL: https://www.iea.org/"));
        assert!(verdict_prompt("x", &[]).contains("(no results)"));
    }
}
