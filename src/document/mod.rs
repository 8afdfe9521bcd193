//! Word processing documents as blocks of paragraphs and tables.
//!
//! Only what token substitution needs is modelled: paragraph text lives in
//! styled runs, everything else inside a paragraph is carried verbatim.

pub mod package;
pub mod substitute;
pub mod xml;

use std::io;
use std::ops::Range;

use thiserror::Error;

pub use package::Package;
pub use substitute::Placeholders;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO Error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Archive Error: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("XML Error: {source}")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },

    #[error("XML Error: {source}")]
    Escape {
        #[from]
        source: quick_xml::escape::EscapeError,
    },

    #[error("Malformed document: {reason}")]
    Malformed { reason: String },

    #[error("Not a word document, {part} is missing")]
    MissingPart { part: String },
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Cell {
    pub blocks: Vec<Block>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
    pub(crate) markup: Option<Markup>,
    pub(crate) edited: bool,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Inline {
    Run(Run),
    /// Inline markup without substitutable text, kept as written.
    Opaque(String),
}

/// Text sharing one set of run properties.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Run {
    pub props: String,
    pub text: String,
}

/// Where a parsed paragraph sits in its part and how to write it again.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Markup {
    pub span: Range<usize>,
    pub open_tag: String,
    pub props: String,
    pub close_tag: String,
}

#[cfg(test)]
impl Run {
    pub fn new(props: &str, text: &str) -> Self {
        Self {
            props: props.to_string(),
            text: text.to_string(),
        }
    }

    pub fn plain(text: &str) -> Self {
        Self::new("", text)
    }
}

#[cfg(test)]
impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            inlines: runs.into_iter().map(Inline::Run).collect(),
            markup: None,
            edited: false,
        }
    }
}

impl Paragraph {
    /// Joined run text. Tabs, breaks and hyphens written as elements
    /// appear as the characters they stand for.
    pub fn text(&self) -> String {
        self.runs().map(|run| run.text.as_str()).collect()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.inlines.iter().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Opaque(_) => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.inlines.iter_mut().filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            Inline::Opaque(_) => None,
        })
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Every paragraph, top level and inside table cells, in document order.
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut found = Vec::new();
        collect_paragraphs(&self.blocks, &mut found);
        found
    }

    pub fn for_each_paragraph<F: FnMut(&mut Paragraph)>(&mut self, mut f: F) {
        visit_paragraphs(&mut self.blocks, &mut f);
    }
}

fn collect_paragraphs<'a>(blocks: &'a [Block], found: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => found.push(paragraph),
            Block::Table(table) => {
                for cell in table.rows.iter().flat_map(|row| &row.cells) {
                    collect_paragraphs(&cell.blocks, found);
                }
            }
        }
    }
}

fn visit_paragraphs<F: FnMut(&mut Paragraph)>(blocks: &mut [Block], f: &mut F) {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => f(paragraph),
            Block::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| &mut row.cells) {
                    visit_paragraphs(&mut cell.blocks, f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> Cell {
        Cell {
            blocks: vec![Block::Paragraph(Paragraph::new(vec![Run::plain(text)]))],
        }
    }

    #[test]
    fn paragraph_text_joins_runs() {
        let mut paragraph =
            Paragraph::new(vec![Run::plain("Contract "), Run::new("<b/>", "#7")]);
        paragraph.inlines.insert(1, Inline::Opaque("<w:bookmarkEnd/>".into()));
        assert_eq!(paragraph.text(), "Contract #7");
        assert_eq!(paragraph.runs().count(), 2);
    }

    #[test]
    fn paragraphs_in_document_order() {
        let nested = Table {
            rows: vec![Row { cells: vec![cell("nested")] }],
        };
        let document = Document::new(vec![
            Block::Paragraph(Paragraph::new(vec![Run::plain("first")])),
            Block::Table(Table {
                rows: vec![
                    Row { cells: vec![cell("a1"), cell("a2")] },
                    Row {
                        cells: vec![Cell {
                            blocks: vec![Block::Table(nested)],
                        }],
                    },
                ],
            }),
            Block::Paragraph(Paragraph::new(vec![Run::plain("last")])),
        ]);

        let texts: Vec<String> =
            document.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["first", "a1", "a2", "nested", "last"]);
    }

    #[test]
    fn visits_every_paragraph_mutably() {
        let mut document = Document::new(vec![
            Block::Paragraph(Paragraph::new(vec![Run::plain("x")])),
            Block::Table(Table {
                rows: vec![Row { cells: vec![cell("y")] }],
            }),
        ]);
        document.for_each_paragraph(|p| {
            for run in p.runs_mut() {
                run.text.make_ascii_uppercase();
            }
        });
        let texts: Vec<String> =
            document.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["X", "Y"]);
    }
}
