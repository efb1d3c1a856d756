//! HTML generation for the admin pages.
//!
//! Uses `quick-xml`'s writer API. Text and attribute values are escaped by
//! [`BytesText::new`] and [`BytesStart::push_attribute`]; nothing here
//! formats markup by hand.

use std::{collections::BTreeSet, io::Cursor};

use axum::response::Html;
use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

// ─── Writer ──────────────────────────────────────────────────────────────────

/// An in-memory markup writer.
///
/// Writes go to a `Vec<u8>`, which cannot fail, so the writer results are
/// unwrapped the same way for every event.
pub struct HtmlWriter {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Default for HtmlWriter {
  fn default() -> Self { Self::new() }
}

impl HtmlWriter {
  pub fn new() -> Self {
    Self {
      writer: Writer::new(Cursor::new(Vec::new())),
    }
  }

  /// `<tag attr="value" ...>`
  pub fn start(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    let mut elem = BytesStart::new(tag);
    for attr in attrs {
      elem.push_attribute(*attr);
    }
    self.writer.write_event(Event::Start(elem)).unwrap();
    self
  }

  /// `</tag>`
  pub fn end(&mut self, tag: &str) -> &mut Self {
    self.writer.write_event(Event::End(BytesEnd::new(tag))).unwrap();
    self
  }

  /// Escaped character data.
  pub fn text(&mut self, text: &str) -> &mut Self {
    self.writer.write_event(Event::Text(BytesText::new(text))).unwrap();
    self
  }

  /// `<tag attrs>text</tag>`
  pub fn elem(
    &mut self,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
  ) -> &mut Self {
    self.start(tag, attrs).text(text).end(tag)
  }

  /// `<tag attrs/>`
  pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    let mut elem = BytesStart::new(tag);
    for attr in attrs {
      elem.push_attribute(*attr);
    }
    self.writer.write_event(Event::Empty(elem)).unwrap();
    self
  }

  /// `<a href="...">text</a>`
  pub fn link(&mut self, href: &str, text: &str) -> &mut Self {
    self.elem("a", &[("href", href)], text)
  }

  pub fn into_string(self) -> String {
    String::from_utf8_lossy(&self.writer.into_inner().into_inner()).into_owned()
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// A complete document whose body is written by `body`.
pub fn page(
  title: &str,
  stylesheet: Option<&str>,
  body: impl FnOnce(&mut HtmlWriter),
) -> Html<String> {
  let mut w = HtmlWriter::new();
  w.writer
    .write_event(Event::DocType(BytesText::from_escaped("html")))
    .unwrap();
  w.start("html", &[]).start("head", &[]);
  w.empty("meta", &[("charset", "utf-8")]);
  w.elem("title", &[], title);
  if let Some(css) = stylesheet {
    w.elem("style", &[], css);
  }
  w.end("head").start("body", &[]);
  body(&mut w);
  w.end("body").end("html");
  Html(w.into_string())
}

/// The "Back to" links at the top of most pages.
pub fn back_links(w: &mut HtmlWriter, links: &[(&str, &str)]) {
  w.start("p", &[]);
  for (i, (href, text)) in links.iter().enumerate() {
    if i > 0 {
      w.empty("br", &[]);
    }
    w.link(href, text);
  }
  w.end("p");
}

/// A red error paragraph shown above a re-rendered form.
pub fn error_notice(w: &mut HtmlWriter, message: &str) {
  w.elem("p", &[("class", "error")], &format!("ERROR: {message}"));
}

// ─── Tables ──────────────────────────────────────────────────────────────────

/// A result table. `None` cells render as `NULL`.
///
/// When `link` is set, cells in column `link.column` become anchors to
/// `(link.href)(value)`.
pub struct ResultTable<'a> {
  pub columns: &'a [&'a str],
  pub rows:    Vec<Vec<Option<String>>>,
  pub link:    Option<Link>,
}

#[derive(Clone, Copy)]
pub struct Link {
  pub column: usize,
  pub href:   fn(&str) -> String,
}

impl ResultTable<'_> {
  pub fn write_to(&self, w: &mut HtmlWriter) {
    w.start("table", &[]).start("thead", &[]).start("tr", &[]);
    for col in self.columns {
      w.elem("th", &[], col);
    }
    w.end("tr").end("thead").start("tbody", &[]);
    for row in &self.rows {
      w.start("tr", &[]);
      for (i, cell) in row.iter().enumerate() {
        w.start("td", &[]);
        match (self.link, cell) {
          (Some(link), Some(value)) if link.column == i => {
            w.link(&(link.href)(value), value);
          }
          _ => {
            w.text(cell.as_deref().unwrap_or("NULL"));
          }
        }
        w.end("td");
      }
      w.end("tr");
    }
    w.end("tbody").end("table");
  }
}

/// Render a flag column value the way SQLite stores it.
pub fn flag_cell(flag: bool) -> Option<String> {
  Some(u8::from(flag).to_string())
}

// ─── Form controls ───────────────────────────────────────────────────────────

/// A single-choice select whose options read `key - label`.
pub fn select(
  w: &mut HtmlWriter,
  name: &str,
  options: &[(String, String)],
  selected: Option<&str>,
) {
  w.start("select", &[("name", name)]);
  for (key, label) in options {
    option(w, key, label, selected == Some(key.as_str()));
  }
  w.end("select");
}

/// A multi-choice select. The name gets a `[]` suffix so every selected
/// option is submitted.
pub fn multi_select(
  w: &mut HtmlWriter,
  name: &str,
  options: &[(String, String)],
  selected: &BTreeSet<String>,
) {
  let name = format!("{name}[]");
  let size = options.len().to_string();
  w.start("select", &[
    ("name", name.as_str()),
    ("size", size.as_str()),
    ("multiple", "multiple"),
  ]);
  for (key, label) in options {
    option(w, key, label, selected.contains(key));
  }
  w.end("select");
}

fn option(w: &mut HtmlWriter, key: &str, label: &str, selected: bool) {
  let mut attrs = vec![("value", key)];
  if selected {
    attrs.push(("selected", "selected"));
  }
  w.elem("option", &attrs, &format!("{key} - {label}"));
}

/// Two radio buttons, `Set` (1) and `Unset` (0), with the current value
/// checked. `None` checks neither.
pub fn flag_radios(w: &mut HtmlWriter, flag: &str, value: Option<bool>) {
  for (v, key, label) in [(true, "1", " Set "), (false, "0", " Unset")] {
    let mut attrs = vec![("type", "radio"), ("name", flag), ("value", key)];
    if value == Some(v) {
      attrs.push(("checked", "checked"));
    }
    w.empty("input", &attrs).text(label);
  }
}

/// One table row per flag, each holding [`flag_radios`].
pub fn flag_rows(w: &mut HtmlWriter, flags: &[(&str, Option<bool>)]) {
  for (flag, value) in flags {
    w.start("tr", &[]).elem("td", &[], flag).start("td", &[]);
    flag_radios(w, flag, *value);
    w.end("td").end("tr");
  }
}

/// A checkbox that submits `flag=0` when ticked. Leaving it unticked omits
/// the flag so the stored value is kept.
pub fn clear_checkbox(w: &mut HtmlWriter, flag: &str) {
  w.empty("input", &[("type", "checkbox"), ("name", flag), ("value", "0")])
    .text(&format!(" {flag}"));
}

/// Submit and reset buttons.
pub fn submit_buttons(w: &mut HtmlWriter) {
  w.empty("input", &[("type", "submit"), ("value", "Submit")])
    .text(" ")
    .empty("input", &[("type", "reset"), ("value", "Reset")]);
}
