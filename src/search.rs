//! Searching and printing cached news
//!
//! A news item matches when every search string occurs in its title or in its
//! date. Matches are printed in cache order, either plain or with ANSI styling.

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::data::NewsItem;

/// Returns true if every predicate is a substring of the title or the date.
///
/// An empty predicate list, or the single predicate `""`, matches everything.
pub fn matches<S: AsRef<str>>(item: &NewsItem, predicates: &[S]) -> bool {
    predicates.iter().all(|p| {
        let p = p.as_ref();
        item.title.contains(p) || item.date.contains(p)
    })
}

/// Yields the items matching all predicates, in stored order
pub fn search<'a, S: AsRef<str>>(
    items: &'a [NewsItem],
    predicates: &'a [S],
) -> impl Iterator<Item = &'a NewsItem> + 'a {
    items.iter().filter(move |item| matches(item, predicates))
}

/// Prints package headers and news items, with or without colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Creates a renderer; `color` selects ANSI styling for the whole run
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Writes the `<package>:` header line
    pub fn write_header<W: Write>(&self, out: &mut W, package: &str) -> io::Result<()> {
        let header = format!("{}:", package);
        if self.color {
            writeln!(out, "{}", header.bold().underlined().dark_red())
        } else {
            writeln!(out, "{}", header)
        }
    }

    /// Writes one item as `date title`, the URL on the next line, then a blank line
    pub fn write_item<W: Write>(&self, out: &mut W, item: &NewsItem) -> io::Result<()> {
        if self.color {
            writeln!(
                out,
                "{} {}\n{}\n",
                item.date.as_str().bold().dark_yellow(),
                item.title.as_str().dark_green(),
                item.url.as_str().italic().dark_blue()
            )
        } else {
            writeln!(out, "{} {}\n{}\n", item.date, item.title, item.url)
        }
    }

    /// Writes the header and every matching item of a package
    ///
    /// # Returns
    /// The number of items written
    pub fn write_matches<W: Write, S: AsRef<str>>(
        &self,
        out: &mut W,
        package: &str,
        items: &[NewsItem],
        predicates: &[S],
    ) -> io::Result<usize> {
        self.write_header(out, package)?;
        let mut count = 0;
        for item in search(items, predicates) {
            self.write_item(out, item)?;
            count += 1;
        }
        Ok(count)
    }
}
