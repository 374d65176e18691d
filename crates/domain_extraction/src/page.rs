//! Page-segmented bill text
//!
//! The engine consumes a sequence of `(page-index, text)` pairs produced by
//! an upstream PDF-to-text step. Page indexes are 1-based, matching how the
//! bill issuer numbers its pages.

use serde::{Deserialize, Serialize};

/// Form feed, the page separator written by `pdftotext`
pub const PAGE_SEPARATOR: char = '\u{000C}';

/// The text of one bill page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillPage {
    /// 1-based page number
    pub index: usize,
    /// Extracted text of the page
    pub text: String,
}

impl BillPage {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: normalize_newlines(&text.into()),
        }
    }

    /// Lines of the page with trailing whitespace removed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim_end)
    }
}

/// All pages of one bill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillDocument {
    pages: Vec<BillPage>,
}

impl BillDocument {
    /// Builds a document from page texts in order, numbering from 1
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, text)| BillPage::new(i + 1, text))
                .collect(),
        }
    }

    /// Builds a document from indexed pages, sorted by index
    pub fn from_indexed<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut pages: Vec<BillPage> = pages
            .into_iter()
            .map(|(index, text)| BillPage::new(index, text))
            .collect();
        pages.sort_by_key(|page| page.index);
        Self { pages }
    }

    /// Splits a whole-document text dump on form feeds
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<&str> = text.split(PAGE_SEPARATOR).collect();
        // pdftotext terminates the last page with a form feed as well
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        Self::from_pages(pages)
    }

    pub fn pages(&self) -> &[BillPage] {
        &self.pages
    }

    /// Returns the page with the given 1-based index
    pub fn page(&self, index: usize) -> Option<&BillPage> {
        self.pages.iter().find(|page| page.index == index)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|page| page.text.trim().is_empty())
    }

    /// Concatenated text of every page, one newline between pages
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
