//! Rich text for the analysis narrative.
//!
//! The backend answers in CommonMark. [`RichText::parse`] turns it into a flat
//! list of styled blocks that a terminal can draw, and [`to_html`] renders it
//! for the web page.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser as MdParser, Tag, TagEnd};
use serde::Serialize;

/// Extensions on top of CommonMark.
const OPTIONS: Options = Options::ENABLE_STRIKETHROUGH;

/// Inline style flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl SpanStyle {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    Bullet,
    Ordered(u64),
}

/// One block of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    /// Paragraph inside `depth` levels of block quote.
    Quote { depth: usize, spans: Vec<Span> },
    ListItem {
        depth: usize,
        marker: ListMarker,
        spans: Vec<Span>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Rule,
}

impl Block {
    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph(spans)
            | Block::Quote { spans, .. }
            | Block::ListItem { spans, .. } => spans,
            Block::CodeBlock { .. } | Block::Rule => &[],
        }
    }

    /// Text content without styling.
    pub fn text(&self) -> String {
        match self {
            Block::CodeBlock { code, .. } => code.clone(),
            Block::Rule => String::new(),
            _ => self.spans().iter().map(|s| s.text.as_str()).collect(),
        }
    }
}

/// Parsed narrative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichText {
    pub blocks: Vec<Block>,
}

impl RichText {
    pub fn parse(markdown: &str) -> Self {
        let mut builder = Builder::default();
        for event in MdParser::new_ext(markdown, OPTIONS) {
            builder.event(event);
        }
        builder.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All text content, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render Markdown to HTML. Raw HTML in the source is escaped, not passed
/// through.
pub fn to_html(markdown: &str) -> String {
    let events = MdParser::new_ext(markdown, OPTIONS).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

#[derive(Default)]
struct Builder {
    blocks: Vec<Block>,
    current: Option<Block>,
    /// Next ordinal per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    quotes: usize,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    links: Vec<String>,
    code: Option<(Option<String>, String)>,
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if let Some((_, code)) = self.code.as_mut() {
                    code.push_str(&text);
                } else {
                    self.push_text(&text, false);
                }
            }
            Event::Code(text) => self.push_text(&text, true),
            Event::SoftBreak => self.push_text(" ", false),
            Event::HardBreak => self.push_text("\n", false),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.current = Some(Block::Heading {
                    level: level as u8,
                    spans: Vec::new(),
                });
            }
            Tag::Paragraph => {
                // Loose list items wrap their text in paragraphs.
                let item_has_text = match &self.current {
                    Some(Block::ListItem { spans, .. }) => Some(!spans.is_empty()),
                    _ => None,
                };
                match item_has_text {
                    Some(true) => self.push_text(" ", false),
                    Some(false) => {}
                    None => {
                        self.flush();
                        self.current = Some(match self.quotes {
                            0 => Block::Paragraph(Vec::new()),
                            depth => Block::Quote {
                                depth,
                                spans: Vec::new(),
                            },
                        });
                    }
                }
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quotes += 1;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = ListMarker::Ordered(*next);
                        *next += 1;
                        marker
                    }
                    _ => ListMarker::Bullet,
                };
                self.current = Some(Block::ListItem {
                    depth,
                    marker,
                    spans: Vec::new(),
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::Strong => self.strong += 1,
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) | TagEnd::Item => self.flush(),
            TagEnd::Paragraph => {
                if matches!(self.current, Some(Block::Paragraph(_) | Block::Quote { .. })) {
                    self.flush();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quotes = self.quotes.saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::CodeBlock => {
                if let Some((language, code)) = self.code.take() {
                    self.blocks.push(Block::CodeBlock { language, code });
                }
            }
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => {
                self.links.pop();
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        let style = SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
            link: self.links.last().cloned(),
        };

        let block = self
            .current
            .get_or_insert_with(|| Block::Paragraph(Vec::new()));
        let spans = match block {
            Block::Heading { spans, .. }
            | Block::Paragraph(spans)
            | Block::Quote { spans, .. }
            | Block::ListItem { spans, .. } => spans,
            Block::CodeBlock { .. } | Block::Rule => return,
        };

        match spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    fn flush(&mut self) {
        if let Some(block) = self.current.take() {
            if !block.spans().is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn finish(mut self) -> RichText {
        self.flush();
        RichText {
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_text() {
        let text = RichText::parse("**Buy**");
        assert_eq!(text.blocks.len(), 1);
        let spans = text.blocks[0].spans();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Buy");
        assert!(spans[0].style.strong);
        assert!(!spans[0].style.emphasis);
    }

    #[test]
    fn test_letter_structure() {
        let input = "# Recommendation\n\nDear investor,\nthe fund looks *steady*.\n\n## Metrics\n\n- CAGR: `14.2%`\n- Volatility: 12.8%\n\n---\n\n1. Hold\n2. Review yearly\n";
        let text = RichText::parse(input);

        assert_eq!(
            text.blocks[0],
            Block::Heading {
                level: 1,
                spans: vec![Span {
                    text: "Recommendation".to_string(),
                    style: SpanStyle::default(),
                }],
            }
        );
        assert_eq!(text.blocks[1].text(), "Dear investor, the fund looks steady.");
        assert!(text.blocks[1].spans()[1].style.emphasis);
        assert!(matches!(text.blocks[2], Block::Heading { level: 2, .. }));

        match &text.blocks[3] {
            Block::ListItem { depth, marker, spans } => {
                assert_eq!(*depth, 0);
                assert_eq!(*marker, ListMarker::Bullet);
                assert_eq!(spans[1].text, "14.2%");
                assert!(spans[1].style.code);
            }
            other => panic!("expected list item, got {other:?}"),
        }
        assert_eq!(text.blocks[5], Block::Rule);
        assert!(matches!(
            text.blocks[7],
            Block::ListItem {
                marker: ListMarker::Ordered(2),
                ..
            }
        ));
    }

    #[test]
    fn test_nested_list_depth() {
        let text = RichText::parse("- Risk\n  - Beta 0.9\n- Return\n");
        let depths: Vec<usize> = text
            .blocks
            .iter()
            .map(|b| match b {
                Block::ListItem { depth, .. } => *depth,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(depths, vec![0, 1, 0]);
        assert_eq!(text.blocks[1].text(), "Beta 0.9");
    }

    #[test]
    fn test_loose_list_items_keep_text_together() {
        let text = RichText::parse("- first\n\n  more\n\n- second\n");
        assert_eq!(text.blocks.len(), 2);
        assert_eq!(text.blocks[0].text(), "first more");
    }

    #[test]
    fn test_code_block_and_link() {
        let text = RichText::parse("See [AMFI](https://www.amfiindia.com).\n\n```python\ncagr = 0.14\n```\n");
        assert_eq!(
            text.blocks[0].spans()[1].style.link.as_deref(),
            Some("https://www.amfiindia.com")
        );
        assert_eq!(
            text.blocks[1],
            Block::CodeBlock {
                language: Some("python".to_string()),
                code: "cagr = 0.14\n".to_string(),
            }
        );
    }

    #[test]
    fn test_block_quote_depth() {
        let text = RichText::parse("> Past performance is no guarantee.\n>\n> > Read the offer document.\n\nAfter");
        assert_eq!(
            text.blocks[0],
            Block::Quote {
                depth: 1,
                spans: vec![Span {
                    text: "Past performance is no guarantee.".to_string(),
                    style: SpanStyle::default(),
                }],
            }
        );
        assert!(matches!(text.blocks[1], Block::Quote { depth: 2, .. }));
        assert_eq!(text.blocks[1].text(), "Read the offer document.");
        assert!(matches!(text.blocks[2], Block::Paragraph(_)));
    }

    #[test]
    fn test_strikethrough() {
        let text = RichText::parse("~~Sell~~ Hold");
        let spans = text.blocks[0].spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Sell");
        assert!(spans[0].style.strikethrough);
        assert_eq!(spans[1].text, " Hold");
        assert!(spans[1].style.is_plain());

        assert_eq!(to_html("~~Sell~~ Hold"), "<p><del>Sell</del> Hold</p>\n");
    }

    #[test]
    fn test_plain_text() {
        let text = RichText::parse("# Verdict\n\n**Buy** now");
        assert_eq!(text.plain_text(), "Verdict\nBuy now");
        assert!(RichText::parse("").is_empty());
    }

    #[test]
    fn test_html_rendering() {
        assert_eq!(to_html("**Buy**"), "<p><strong>Buy</strong></p>\n");
        assert!(to_html("# Title").contains("<h1>Title</h1>"));
    }

    #[test]
    fn test_html_escapes_raw_html() {
        let out = to_html("<script>alert(1)</script>\n\nhi <b>x</b>");
        assert!(!out.contains("<script>"));
        assert!(!out.contains("<b>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
