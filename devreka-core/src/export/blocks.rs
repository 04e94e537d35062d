//! Markdown lexed into the blocks the PDF layout knows how to place

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// One laid-out unit of a message, in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { depth: u8, text: String },
    Paragraph(String),
    ListItem(String),
    /// Blank line between two top-level blocks
    Space,
}

/// Receives blocks one variant at a time
pub trait BlockVisitor {
    fn heading(&mut self, depth: u8, text: &str);
    fn paragraph(&mut self, text: &str);
    fn list_item(&mut self, text: &str);
    fn space(&mut self);
}

impl Block {
    pub fn accept<V: BlockVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Block::Heading { depth, text } => visitor.heading(*depth, text),
            Block::Paragraph(text) => visitor.paragraph(text),
            Block::ListItem(text) => visitor.list_item(text),
            Block::Space => visitor.space(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Heading(u8),
    Paragraph,
    Item,
    Code,
}

/// Lex `markdown` into blocks. Inline formatting is flattened to plain text,
/// nested list items become items of their own and code blocks become
/// paragraphs.
pub fn lex(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut target: Option<Target> = None;
    let mut depth = 0usize;
    let mut list_depth = 0usize;
    let mut previous_end: Option<usize> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        let top_level_start = depth == 0 && matches!(event, Event::Start(_) | Event::Rule);
        if top_level_start {
            if let Some(end) = previous_end {
                if has_blank_line(markdown, end, range.start) {
                    blocks.push(Block::Space);
                }
            }
        }

        match event {
            Event::Start(tag) => {
                depth += 1;
                match tag {
                    Tag::Heading { level, .. } => {
                        flush_item(&mut blocks, &mut text, target);
                        target = Some(Target::Heading(level as u8));
                    }
                    Tag::Paragraph if list_depth == 0 => {
                        text.clear();
                        target = Some(Target::Paragraph);
                    }
                    Tag::CodeBlock(_) => {
                        flush_item(&mut blocks, &mut text, target);
                        target = Some(Target::Code);
                    }
                    Tag::List(_) => {
                        flush_item(&mut blocks, &mut text, target);
                        list_depth += 1;
                    }
                    Tag::Item => {
                        text.clear();
                        target = Some(Target::Item);
                    }
                    _ => {}
                }
            }
            Event::End(tag) => {
                depth = depth.saturating_sub(1);
                match tag {
                    TagEnd::Heading(_) => {
                        if let Some(Target::Heading(level)) = target.take() {
                            blocks.push(Block::Heading {
                                depth: level,
                                text: text.trim().to_string(),
                            });
                        }
                        text.clear();
                        target = resume_item(list_depth);
                    }
                    TagEnd::Paragraph if target == Some(Target::Paragraph) => {
                        blocks.push(Block::Paragraph(text.trim().to_string()));
                        target = None;
                    }
                    TagEnd::CodeBlock => {
                        blocks.push(Block::Paragraph(text.trim_end().to_string()));
                        text.clear();
                        target = resume_item(list_depth);
                    }
                    TagEnd::Item => {
                        flush_item(&mut blocks, &mut text, target);
                        target = None;
                    }
                    TagEnd::List(_) => {
                        list_depth = list_depth.saturating_sub(1);
                        // back inside the parent item; its text was flushed already
                        if let Some(item) = resume_item(list_depth) {
                            target = Some(item);
                        }
                    }
                    TagEnd::Paragraph if target == Some(Target::Item) => text.push('\n'),
                    _ => {}
                }
                if depth == 0 {
                    previous_end = Some(range.end);
                }
            }
            Event::Text(content) | Event::Code(content) => {
                if target.is_some() {
                    text.push_str(&content);
                }
            }
            Event::SoftBreak => text.push(' '),
            Event::HardBreak => text.push('\n'),
            Event::Rule => {
                if depth == 0 {
                    previous_end = Some(range.end);
                }
            }
            _ => {}
        }
    }

    blocks
}

fn flush_item(blocks: &mut Vec<Block>, text: &mut String, target: Option<Target>) {
    if target == Some(Target::Item) {
        let item = text.trim();
        if !item.is_empty() {
            blocks.push(Block::ListItem(item.to_string()));
        }
    }
    text.clear();
}

/// Target to go back to after a block nested inside a list item
fn resume_item(list_depth: usize) -> Option<Target> {
    (list_depth > 0).then_some(Target::Item)
}

/// Whether the source between two blocks contains an empty line
fn has_blank_line(source: &str, previous_end: usize, next_start: usize) -> bool {
    if next_start <= previous_end {
        return false;
    }
    let gap = &source[previous_end..next_start];
    let newlines = gap.matches('\n').count()
        + usize::from(source[..previous_end].ends_with('\n'));
    newlines >= 2
}
