use scraper::node::Node;
use scraper::Html;

/// Flattens a status HTML fragment to terminal text: `<br>` becomes a line
/// break, other tags are dropped, entities are decoded, blank lines removed.
pub fn status_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name() == "br" => out.push('\n'),
            _ => {}
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use transfer_core::StatusLine;

    use super::*;

    #[test]
    fn calculating_message_splits_on_break() {
        let html = StatusLine::Calculating {
            total: 10,
            status: "starting".to_string(),
        }
        .to_html();
        assert_eq!(
            status_plain_text(&html),
            "Calculating total number of tables: 10\nstarting"
        );
    }

    #[test]
    fn progress_message_drops_span_markup() {
        let html = StatusLine::Progress {
            time_left: "3 minutes".to_string(),
            current: 4,
            total: 9,
            status: "Copying <b>orders</b> &amp; lines".to_string(),
        }
        .to_html();
        assert_eq!(
            status_plain_text(&html),
            "3 minutes (4/9)\nCopying orders & lines"
        );
    }

    #[test]
    fn empty_and_plain_text_pass_through() {
        assert_eq!(status_plain_text(""), "");
        assert_eq!(status_plain_text("Import complete"), "Import complete");
    }
}
