//! WordprocessingML parts (`word/document.xml`, headers, footers).
//!
//! A part is parsed into a [`Document`] while keeping its source text.
//! Rendering splices re-written paragraphs into that source, so paragraphs
//! that were not edited come back byte for byte.

use std::ops::Range;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Block, Cell, Document, DocumentError, Inline, Markup, Paragraph};
use super::{Row, Run, Table};

const PARAGRAPH: &str = "w:p";
const PARAGRAPH_PROPS: &str = "w:pPr";
const RUN: &str = "w:r";
const RUN_PROPS: &str = "w:rPr";
const TEXT: &str = "w:t";
const TABLE: &str = "w:tbl";
const TABLE_ROW: &str = "w:tr";
const TABLE_CELL: &str = "w:tc";

/// Run children that stand for a character. They are carried in the run
/// text as that character and written back as the element.
const SPECIALS: [(char, &str); 6] = [
    ('\t', "<w:tab/>"),
    ('\n', "<w:br/>"),
    ('\u{c}', "<w:br w:type=\"page\"/>"),
    ('\u{b}', "<w:br w:type=\"column\"/>"),
    ('\u{2011}', "<w:noBreakHyphen/>"),
    ('\u{ad}', "<w:softHyphen/>"),
];

fn special_markup(c: char) -> Option<&'static str> {
    SPECIALS
        .iter()
        .find(|(special, _)| *special == c)
        .map(|(_, markup)| *markup)
}

#[derive(Debug, PartialEq, Clone)]
pub struct Part {
    source: String,
    pub document: Document,
}

impl Part {
    pub fn parse(source: String) -> Result<Self, DocumentError> {
        let tokens = tokenize(&source)?;
        let parser = Parser {
            xml: &source,
            tokens: &tokens,
        };
        let blocks = parser.blocks(0, tokens.len())?;
        Ok(Self {
            source,
            document: Document::new(blocks),
        })
    }

    pub fn render(&self) -> String {
        let mut edits: Vec<(Range<usize>, String)> = self
            .document
            .paragraphs()
            .into_iter()
            .filter(|p| p.is_edited())
            .filter_map(|p| {
                p.markup
                    .as_ref()
                    .map(|m| (m.span.clone(), render_paragraph(p, m)))
            })
            .collect();
        edits.sort_by_key(|(span, _)| span.start);

        let mut out = String::with_capacity(self.source.len());
        let mut pos = 0;
        for (span, text) in edits {
            out.push_str(&self.source[pos..span.start]);
            out.push_str(&text);
            pos = span.end;
        }
        out.push_str(&self.source[pos..]);
        out
    }

    pub fn is_edited(&self) -> bool {
        self.document.paragraphs().iter().any(|p| p.is_edited())
    }
}

fn render_paragraph(paragraph: &Paragraph, markup: &Markup) -> String {
    let mut out = String::new();
    out.push_str(&markup.open_tag);
    out.push_str(&markup.props);
    for inline in paragraph.inlines.iter() {
        match inline {
            Inline::Run(run) => render_run(&mut out, run),
            Inline::Opaque(raw) => out.push_str(raw),
        }
    }
    out.push_str(&markup.close_tag);
    out
}

fn render_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");
    out.push_str(&run.props);
    let mut plain = String::new();
    for c in run.text.chars() {
        match special_markup(c) {
            Some(markup) => {
                push_text(out, &plain);
                plain.clear();
                out.push_str(markup);
            }
            None => plain.push(c),
        }
    }
    push_text(out, &plain);
    out.push_str("</w:r>");
}

fn push_text(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str("<w:t xml:space=\"preserve\">");
    out.push_str(&escape(text));
    out.push_str("</w:t>");
}

#[derive(Debug, PartialEq)]
enum Kind {
    Start(String),
    End,
    Empty(String),
    Text,
    Other,
}

#[derive(Debug)]
struct Token {
    kind: Kind,
    span: Range<usize>,
    /// Index of the matching end token, own index for anything else.
    close: usize,
}

impl Token {
    fn is(&self, name: &str) -> bool {
        matches!(&self.kind, Kind::Start(n) | Kind::Empty(n) if n == name)
    }
}

fn tokenize(xml: &str) -> Result<Vec<Token>, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut tokens: Vec<Token> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    loop {
        let start = reader.buffer_position();
        let event = reader.read_event()?;
        let end = reader.buffer_position();
        let index = tokens.len();

        let kind = match event {
            Event::Eof => break,
            Event::Start(e) => {
                open.push(index);
                Kind::Start(String::from_utf8_lossy(e.name().as_ref()).into())
            }
            Event::End(_) => {
                let opened = open.pop().ok_or_else(|| DocumentError::Malformed {
                    reason: format!("unexpected closing tag at byte {}", start),
                })?;
                tokens[opened].close = index;
                Kind::End
            }
            Event::Empty(e) => {
                Kind::Empty(String::from_utf8_lossy(e.name().as_ref()).into())
            }
            Event::Text(_) => Kind::Text,
            _ => Kind::Other,
        };
        tokens.push(Token {
            kind,
            span: start..end,
            close: index,
        });
    }

    if !open.is_empty() {
        return Err(DocumentError::Malformed {
            reason: format!("{} unclosed elements", open.len()),
        });
    }
    Ok(tokens)
}

struct Parser<'a> {
    xml: &'a str,
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    /// Source text of a whole element, from its start to its end tag.
    fn element(&self, index: usize) -> &'a str {
        let token = &self.tokens[index];
        let close = &self.tokens[token.close];
        &self.xml[token.span.start..close.span.end]
    }

    /// Source text between the start and end tag of an element.
    fn inner(&self, index: usize) -> &'a str {
        let token = &self.tokens[index];
        let close = &self.tokens[token.close];
        &self.xml[token.span.end..close.span.start]
    }

    /// Paragraphs and tables among the tokens `from..to`. Other elements
    /// are looked through, so content controls and body wrappers do not
    /// hide the paragraphs they hold.
    fn blocks(&self, from: usize, to: usize) -> Result<Vec<Block>, DocumentError> {
        let mut blocks = Vec::new();
        let mut i = from;
        while i < to {
            let token = &self.tokens[i];
            match &token.kind {
                Kind::Start(name) if name == PARAGRAPH => {
                    blocks.push(Block::Paragraph(self.paragraph(i)?));
                }
                Kind::Start(name) if name == TABLE => {
                    blocks.push(Block::Table(self.table(i)?));
                }
                Kind::Start(_) => blocks.extend(self.blocks(i + 1, token.close)?),
                Kind::Empty(name) if name == PARAGRAPH => {
                    blocks.push(Block::Paragraph(Paragraph::default()));
                }
                _ => {}
            }
            i = token.close + 1;
        }
        Ok(blocks)
    }

    /// Indices of the `name` elements among `from..to`, looking through
    /// other elements.
    fn find(&self, name: &str, from: usize, to: usize) -> Vec<usize> {
        let mut found = Vec::new();
        let mut i = from;
        while i < to {
            let token = &self.tokens[i];
            if let Kind::Start(n) = &token.kind {
                if n == name {
                    found.push(i);
                } else {
                    found.extend(self.find(name, i + 1, token.close));
                }
            }
            i = token.close + 1;
        }
        found
    }

    fn table(&self, index: usize) -> Result<Table, DocumentError> {
        let close = self.tokens[index].close;
        let mut rows = Vec::new();
        for row in self.find(TABLE_ROW, index + 1, close) {
            let mut cells = Vec::new();
            for cell in self.find(TABLE_CELL, row + 1, self.tokens[row].close) {
                cells.push(Cell {
                    blocks: self.blocks(cell + 1, self.tokens[cell].close)?,
                });
            }
            rows.push(Row { cells });
        }
        Ok(Table { rows })
    }

    fn paragraph(&self, index: usize) -> Result<Paragraph, DocumentError> {
        let token = &self.tokens[index];
        let mut props = String::new();
        let mut inlines = Vec::new();

        let mut i = index + 1;
        while i < token.close {
            let child = &self.tokens[i];
            if child.is(PARAGRAPH_PROPS) {
                props = self.element(i).to_string();
            } else if matches!(&child.kind, Kind::Start(n) if n == RUN) {
                inlines.push(self.run(i)?);
            } else {
                inlines.push(Inline::Opaque(self.element(i).to_string()));
            }
            i = child.close + 1;
        }

        Ok(Paragraph {
            inlines,
            markup: Some(Markup {
                span: token.span.start..self.tokens[token.close].span.end,
                open_tag: self.xml[token.span.clone()].to_string(),
                props,
                close_tag: self.xml[self.tokens[token.close].span.clone()]
                    .to_string(),
            }),
            edited: false,
        })
    }

    /// A run holding only properties, text, tabs, breaks and hyphens
    /// becomes a [`Run`]; fields, drawings and the like make it opaque.
    fn run(&self, index: usize) -> Result<Inline, DocumentError> {
        let close = self.tokens[index].close;
        let mut run = Run::default();

        let mut i = index + 1;
        while i < close {
            let child = &self.tokens[i];
            if child.is(RUN_PROPS) {
                run.props = self.element(i).to_string();
            } else if matches!(&child.kind, Kind::Start(n) if n == TEXT) {
                let plain = (i + 1..child.close)
                    .all(|t| self.tokens[t].kind == Kind::Text);
                if !plain {
                    return Ok(self.opaque(index));
                }
                run.text.push_str(&unescape(self.inner(i))?);
            } else if let Some(text) = self.special(i) {
                run.text.push_str(text);
            } else if child.is(TEXT) {
                // empty <w:t/>
            } else if child.kind == Kind::Text
                && self.element(i).trim().is_empty()
            {
                // formatting whitespace
            } else {
                return Ok(self.opaque(index));
            }
            i = child.close + 1;
        }
        Ok(Inline::Run(run))
    }

    /// Text a run child stands for. Rendered page break markers stand for
    /// nothing; `None` for children that are not text at all.
    fn special(&self, index: usize) -> Option<&'static str> {
        let name = match &self.tokens[index].kind {
            Kind::Start(name) | Kind::Empty(name) => name.as_str(),
            _ => return None,
        };
        match name {
            "w:tab" => Some("\t"),
            "w:cr" => Some("\n"),
            "w:br" => match self.attribute(index, "w:type").as_deref() {
                Some("page") => Some("\u{c}"),
                Some("column") => Some("\u{b}"),
                _ => Some("\n"),
            },
            "w:noBreakHyphen" => Some("\u{2011}"),
            "w:softHyphen" => Some("\u{ad}"),
            "w:lastRenderedPageBreak" => Some(""),
            _ => None,
        }
    }

    fn attribute(&self, index: usize, name: &str) -> Option<String> {
        let tag = &self.xml[self.tokens[index].span.clone()];
        let content = tag
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        let name_len = content
            .find(char::is_whitespace)
            .unwrap_or(content.len());
        let element = BytesStart::from_content(content, name_len);
        let attribute = element.try_get_attribute(name).ok().flatten()?;
        let value = attribute.unescape_value().ok()?;
        Some(value.into_owned())
    }

    fn opaque(&self, index: usize) -> Inline {
        Inline::Opaque(self.element(index).to_string())
    }
}
