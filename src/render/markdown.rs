//! Markdown adapter: markdown source to rich text blocks.
//!
//! Parsing is delegated to `pulldown-cmark`; this module only maps its
//! event stream onto the [`RichText`] model.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::model::{
    InlineContent, ListInfo, Paragraph, RichText, TextBlock, TextRun, TextStyle,
};

/// Render markdown source to rich text.
pub fn to_rich_text(markdown: &str) -> RichText {
    MarkdownAdapter::new().render(markdown)
}

/// Markdown adapter.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownAdapter {
    options: Options,
}

impl MarkdownAdapter {
    /// Create a new adapter with strikethrough and task lists enabled.
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
        }
    }

    /// Render markdown source. Never fails; empty input gives empty rich text.
    pub fn render(&self, markdown: &str) -> RichText {
        let mut builder = RichTextBuilder::default();
        for event in Parser::new_ext(markdown, self.options) {
            builder.handle(event);
        }
        builder.finish()
    }
}

impl Default for MarkdownAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Open container on the builder stack. Every start event pushes exactly
/// one frame and every end event pops one.
#[derive(Debug)]
enum Frame {
    Block,
    Heading,
    Item,
    List,
    Quote,
    Code,
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        url: String,
        title: String,
        text: String,
    },
    Image {
        url: String,
        alt: String,
    },
    Other,
}

#[derive(Debug)]
struct ListState {
    next_number: Option<u64>,
}

#[derive(Debug, Default)]
struct RichTextBuilder {
    output: RichText,
    frames: Vec<Frame>,
    lists: Vec<ListState>,
    current: Option<Paragraph>,
    code: Option<(Option<String>, String)>,
}

impl RichTextBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = TextStyle {
                    code: true,
                    ..self.style()
                };
                self.push_run(TextRun::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.paragraph().add_line_break(),
            Event::Rule => {
                self.flush();
                self.output.add_block(TextBlock::HorizontalRule);
            }
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                let continues_item = matches!(self.frames.last(), Some(Frame::Item))
                    && self.current.as_ref().is_some_and(Paragraph::is_empty);
                if !continues_item {
                    self.flush();
                }
                Frame::Block
            }
            Tag::Heading { level, .. } => {
                self.flush();
                let mut heading = self.new_paragraph();
                heading.style.heading_level = Some(level as u8);
                self.current = Some(heading);
                Frame::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush();
                Frame::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
                Frame::Code
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState { next_number: start });
                Frame::List
            }
            Tag::Item => {
                self.flush();
                let level = self.lists.len().saturating_sub(1) as u8;
                let info = match self.lists.last_mut() {
                    Some(ListState {
                        next_number: Some(n),
                    }) => {
                        let number = *n;
                        *n += 1;
                        ListInfo::numbered(level, number)
                    }
                    _ => ListInfo::bullet(level),
                };
                let mut item = self.new_paragraph();
                item.style.list_info = Some(info);
                self.current = Some(item);
                Frame::Item
            }
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.to_string(),
                title: title.to_string(),
                text: String::new(),
            },
            Tag::Image {
                dest_url, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                alt: String::new(),
            },
            _ => Frame::Other,
        };
        self.frames.push(frame);
    }

    fn end(&mut self) {
        match self.frames.pop() {
            Some(Frame::Block | Frame::Heading | Frame::Item) => self.flush(),
            Some(Frame::List) => {
                self.flush();
                self.lists.pop();
            }
            Some(Frame::Code) => {
                if let Some((language, code)) = self.code.take() {
                    self.output
                        .add_block(TextBlock::CodeBlock { language, code });
                }
            }
            Some(Frame::Link { url, title, text }) => {
                let title = Some(title).filter(|t| !t.is_empty());
                self.paragraph()
                    .content
                    .push(InlineContent::Link { text, url, title });
            }
            Some(Frame::Image { url, alt }) => {
                self.paragraph()
                    .content
                    .push(InlineContent::Image { url, alt });
            }
            Some(Frame::Quote) => self.flush(),
            Some(_) | None => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        match self.frames.iter_mut().rev().find_map(|frame| match frame {
            Frame::Image { alt, .. } => Some(alt),
            Frame::Link { text, .. } => Some(text),
            _ => None,
        }) {
            Some(target) => target.push_str(text),
            None => {
                let run = TextRun::styled(text, self.style());
                self.push_run(run);
            }
        }
    }

    fn push_run(&mut self, run: TextRun) {
        self.paragraph().add_run(run);
    }

    fn style(&self) -> TextStyle {
        let mut style = TextStyle::default();
        for frame in &self.frames {
            match frame {
                Frame::Emphasis => style.italic = true,
                Frame::Strong => style.bold = true,
                Frame::Strikethrough => style.strikethrough = true,
                _ => {}
            }
        }
        style
    }

    fn quote_depth(&self) -> u8 {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::Quote))
            .count() as u8
    }

    fn new_paragraph(&self) -> Paragraph {
        let mut paragraph = Paragraph::new();
        paragraph.style.quote_depth = self.quote_depth();
        paragraph
    }

    fn paragraph(&mut self) -> &mut Paragraph {
        let depth = self.quote_depth();
        self.current.get_or_insert_with(|| {
            let mut paragraph = Paragraph::new();
            paragraph.style.quote_depth = depth;
            paragraph
        })
    }

    fn flush(&mut self) {
        let Some(paragraph) = self.current.take() else {
            return;
        };

        // A paragraph holding nothing but an image is a standalone image block.
        if let [InlineContent::Image { url, alt }] = paragraph.content.as_slice() {
            if !paragraph.is_list_item() && !paragraph.is_heading() {
                self.output.add_block(TextBlock::Image {
                    url: url.clone(),
                    alt: alt.clone(),
                });
                return;
            }
        }

        let has_image = paragraph
            .content
            .iter()
            .any(|c| matches!(c, InlineContent::Image { .. }));
        if has_image {
            self.output.add_block(TextBlock::Paragraph(paragraph));
        } else {
            self.output.add_paragraph(paragraph);
        }
    }

    fn finish(mut self) -> RichText {
        self.flush();
        self.output
    }
}
