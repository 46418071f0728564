// src/core/html.rs
//! Low-level HTML string helpers.
//!
//! Deliberately naive: no DOM is built. Tags are walked left to right,
//! comments are skipped, and `<script>`/`<style>` bodies are treated as raw
//! text so that markup-looking strings inside them (`"</div>"`, `a < b`) never
//! disturb the nesting count. Tag and attribute names compare
//! case-insensitively on ASCII; attribute values compare exactly.

/// One tag as it appears in the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    pub name: &'a str,
    pub closing: bool,
    pub self_closing: bool,
    /// Raw attribute text between the name and `>`.
    pub attrs: &'a str,
}

/// Iterator over the tags of a document, see [`tags`].
pub struct Tags<'a> {
    doc: &'a str,
    pos: usize,
}

/// Walk the tags of `doc` starting at byte offset `from`.
pub fn tags(doc: &str, from: usize) -> Tags<'_> {
    Tags { doc, pos: from }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let lt = self.pos + self.doc.get(self.pos..)?.find('<')?;
            let rest = &self.doc[lt..];

            if rest.starts_with("<!--") {
                self.pos = rest.find("-->").map_or(self.doc.len(), |e| lt + e + 3);
                continue;
            }

            let gt = lt + tag_end(rest)?;
            let inner = &self.doc[lt + 1..gt];
            let (closing, body) = match inner.strip_prefix('/') {
                Some(b) => (true, b),
                None => (false, inner),
            };

            // "<!doctype", "<?xml", "a < b": not element tags
            let starts_alpha = body.bytes().next().is_some_and(|b| b.is_ascii_alphabetic());
            if !starts_alpha {
                self.pos = lt + 1;
                continue;
            }

            let name_len = body
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
                .count();
            let name = &body[..name_len];
            let attrs = body[name_len..].trim();
            let self_closing = !closing && attrs.ends_with('/');

            self.pos = gt + 1;
            if !closing && !self_closing && is_raw_text(name) {
                // Jump to the matching close tag; the body is not markup.
                let close = format!("</{name}");
                self.pos = find_ci(&self.doc[self.pos..], &close)
                    .map_or(self.doc.len(), |off| self.pos + off);
            }

            return Some(Tag { start: lt, end: gt + 1, name, closing, self_closing, attrs });
        }
    }
}

/// Offset of the `>` closing the tag that `rest` starts with. A `>` inside a
/// quoted attribute value (`x-show="n > 0"`) does not end the tag.
fn tag_end(rest: &str) -> Option<usize> {
    let b = rest.as_bytes();
    let mut after_eq = false;
    let mut i = 1usize;

    while i < b.len() {
        match b[i] {
            b'>' => return Some(i),
            b'=' => after_eq = true,
            q @ (b'"' | b'\'') if after_eq => {
                // unterminated value: fall back to the first '>'
                match rest[i + 1..].find(q as char) {
                    Some(e) => i += 1 + e,
                    None => return rest.find('>'),
                }
                after_eq = false;
            }
            c if c.is_ascii_whitespace() => {}
            _ => after_eq = false,
        }
        i += 1;
    }
    None
}

fn is_raw_text(name: &str) -> bool {
    name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style")
}

fn is_void(name: &str) -> bool {
    const VOID: [&str; 14] = [
        "area", "base", "br", "col", "embed", "hr", "img",
        "input", "link", "meta", "param", "source", "track", "wbr",
    ];
    VOID.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// ASCII case-insensitive `find`.
pub fn find_ci(hay: &str, pat: &str) -> Option<usize> {
    let p = pat.as_bytes();
    if p.is_empty() {
        return Some(0);
    }
    hay.as_bytes()
        .windows(p.len())
        .position(|w| w.eq_ignore_ascii_case(p))
}

/// Value of attribute `want` in a tag's raw attribute text.
/// Handles double-quoted, single-quoted, unquoted and bare (`async`) forms.
pub fn attr_value<'a>(attrs: &'a str, want: &str) -> Option<&'a str> {
    let b = attrs.as_bytes();
    let n = b.len();
    let mut i = 0usize;

    while i < n {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && b[i] != b'=' && b[i] != b'/' { i += 1; }
        let name = &attrs[name_start..i];
        while i < n && b[i].is_ascii_whitespace() { i += 1; }

        let mut value = "";
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            match b.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let vs = i + 1;
                    let ve = attrs[vs..].find(q as char).map_or(n, |e| vs + e);
                    value = &attrs[vs..ve];
                    i = (ve + 1).min(n);
                }
                _ => {
                    let vs = i;
                    while i < n && !b[i].is_ascii_whitespace() { i += 1; }
                    value = &attrs[vs..i];
                }
            }
        }

        if !name.is_empty() && name.eq_ignore_ascii_case(want) {
            return Some(value);
        }
    }
    None
}

/// True if the tag's `class` attribute lists `class` as one of its words.
pub fn has_class(attrs: &str, class: &str) -> bool {
    attr_value(attrs, "class")
        .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
}

/// Byte range `(start, end)` of the first element at or after byte offset
/// `from` whose `id` equals `id`, from its opening `<` to just past its
/// matching close tag.
///
/// Nesting is tracked per tag name, so `<div id=x><div>…</div></div>` ends at
/// the outer close. An element left unclosed runs to the end of the document.
pub fn element_by_id_from(doc: &str, id: &str, from: usize) -> Option<(usize, usize)> {
    let mut it = tags(doc, from);

    while let Some(open) = it.next() {
        if open.closing || attr_value(open.attrs, "id") != Some(id) {
            continue;
        }
        if open.self_closing || is_void(open.name) {
            return Some((open.start, open.end));
        }

        let mut depth = 1usize;
        for t in it.by_ref() {
            if !t.name.eq_ignore_ascii_case(open.name) { continue; }
            if t.closing {
                depth -= 1;
                if depth == 0 {
                    return Some((open.start, t.end));
                }
            } else if !t.self_closing {
                depth += 1;
            }
        }
        return Some((open.start, doc.len()));
    }
    None
}

/// Text of the first `<script>` in `block` that has a non-blank body.
/// External scripts (`<script src=…></script>`) are passed over.
pub fn first_script_text(block: &str) -> Option<&str> {
    tags(block, 0)
        .filter(|t| !t.closing && !t.self_closing && t.name.eq_ignore_ascii_case("script"))
        .map(|t| {
            let body = &block[t.end..];
            let close = find_ci(body, "</script").unwrap_or(body.len());
            &body[..close]
        })
        .find(|text| !text.trim().is_empty())
}

/// Text between the end of the opening tag at `open` and the next `</name`.
pub fn text_until_close<'a>(doc: &'a str, open: &Tag<'_>) -> &'a str {
    let body = &doc[open.end..];
    let close = find_ci(body, &format!("</{}", open.name)).unwrap_or(body.len());
    &body[..close]
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}
