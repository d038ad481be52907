//! Article text extraction.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text never counts as article content.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "noscript"];

pub const DEFAULT_LLM_MAX_WORDS: usize = 400;

fn looks_like_html(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an HTML document (or the input itself when it is not
/// HTML), whitespace-normalized.
pub fn clean_text(text: &str) -> String {
    if !looks_like_html(text) {
        return normalize_whitespace(text);
    }
    let doc = Html::parse_document(text);
    normalize_whitespace(&visible_text(doc.root_element()))
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        out.push_str(text);
        out.push(' ');
    }
    out
}

/// Text sent to a language model: title plus article body when the input is
/// HTML, cut to `max_words` words.
pub fn prepare_for_llm(text: &str, max_words: usize) -> String {
    let text = if looks_like_html(text) {
        let doc = Html::parse_document(text);
        let title = first_match(&doc, "h1")
            .map(visible_text)
            .unwrap_or_default();
        let body = first_match(&doc, "article")
            .map(visible_text)
            .unwrap_or_else(|| visible_text(doc.root_element()));
        format!("{title}\n\n{body}")
    } else {
        text.to_string()
    };

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        words.join(" ")
    }
}

fn first_match<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>t</title><style>.x { color: red }</style></head>
<body><header>Site header</header><nav>Home | About</nav>
<h1>Rover lands on Mars</h1>
<article><p>The   rover
landed today.</p><script>var launch = 1;</script></article>
<footer>Copyright</footer></body></html>"#;

    #[test]
    fn html_text_skips_chrome_and_scripts() {
        let text = clean_text(PAGE);
        assert!(text.contains("Rover lands on Mars"));
        assert!(text.contains("The rover landed today."));
        assert!(!text.contains("Site header"));
        assert!(!text.contains("Home | About"));
        assert!(!text.contains("launch"));
        assert!(!text.contains("color"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn plain_text_is_only_normalized() {
        assert_eq!(clean_text("  a\n\tb  c "), "a b c");
    }

    #[test]
    fn llm_text_prefers_title_and_article() {
        let text = prepare_for_llm(PAGE, DEFAULT_LLM_MAX_WORDS);
        assert_eq!(text, "Rover lands on Mars The rover landed today.");
    }

    #[test]
    fn llm_text_is_word_limited() {
        assert_eq!(prepare_for_llm("one two three four", 2), "one two...");
    }
}
