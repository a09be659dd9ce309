use std::collections::VecDeque;

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

/// An outbound hyperlink lifted out of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
    pub title: Option<String>,
}

/// Collect every http(s) link in a markdown document, in document order.
///
/// Quoted and code content is never searched, and a link's own anchor text
/// is not searched for further links.
pub fn extract_links(markdown: &str) -> Vec<Link> {
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &Options::default());

    let mut links = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(root);

    while let Some(node) = queue.pop_front() {
        match &node.data.borrow().value {
            NodeValue::Link(link) => {
                if !link.url.starts_with("http") {
                    continue;
                }
                links.push(Link {
                    text: node_text(node),
                    url: link.url.clone(),
                    title: match link.title.as_str() {
                        "" => None,
                        title => Some(title.to_string()),
                    },
                });
            }
            NodeValue::BlockQuote | NodeValue::Code(_) | NodeValue::CodeBlock(_) => {}
            _ => queue.extend(node.children()),
        }
    }

    links
}

/// Concatenated string content of all text leaves under `node`, left to right.
fn node_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => out.push_str(t),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_in_document_order() {
        let md = "intro [one](https://example.com/1) and [two](https://example.com/2)\n\n\
                  a later paragraph with [three](http://example.com/3)";
        let links = extract_links(md);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://example.com/1", "https://example.com/2", "http://example.com/3"]
        );
    }

    #[test]
    fn quoted_links_are_ignored() {
        let md = "> someone said [this](https://example.com/quoted)\n\nbut [keep](https://example.com/keep)";
        let links = extract_links(md);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/keep");
    }

    #[test]
    fn code_content_is_ignored() {
        let md = "inline `[a](https://example.com/span)` and\n\n\
                  ```\n[b](https://example.com/fence)\n```\n";
        assert!(extract_links(md).is_empty());
    }

    #[test]
    fn relative_links_are_skipped() {
        let md = "[wiki](/r/anime/wiki/index) vs [abs](https://www.reddit.com/r/anime/)";
        let links = extract_links(md);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://www.reddit.com/r/anime/");
    }

    #[test]
    fn anchor_text_flattens_formatting() {
        let md = "[**Best** *Comment* Nomination](https://example.com)";
        let links = extract_links(md);
        assert_eq!(links[0].text, "Best Comment Nomination");
    }

    #[test]
    fn matched_links_are_not_searched_for_more_links() {
        // A badge image inside an anchor: only the anchor's own target counts.
        let md = "[![badge](https://img.example.com/b.png)](https://example.com/target)";
        let links = extract_links(md);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/target");
    }

    #[test]
    fn empty_anchor_yields_empty_text() {
        let links = extract_links("[](https://example.com)");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text, "");
    }

    #[test]
    fn title_attribute_is_kept() {
        let links = extract_links("[t](https://example.com \"hover\")");
        assert_eq!(links[0].title.as_deref(), Some("hover"));
    }

    #[test]
    fn list_items_are_walked_in_source_order() {
        let md = "- [a](https://example.com/a)\n- [b](https://example.com/b)\n- [c](https://example.com/c)\n";
        let urls: Vec<String> = extract_links(md).into_iter().map(|l| l.url).collect();
        assert_eq!(
            urls,
            ["https://example.com/a", "https://example.com/b", "https://example.com/c"]
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let md = "[x](https://example.com/x) plain [y](https://example.com/y)";
        assert_eq!(extract_links(md), extract_links(md));
    }
}
