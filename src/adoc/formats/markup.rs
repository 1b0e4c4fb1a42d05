//! Canonical markup serializer
//!
//!     Writes a block tree back as markup the parser reads into the same tree. Output is
//!     canonical rather than faithful: comments are gone, indentation is normalized,
//!     generated ids are not written out and every list uses the markers its bullet
//!     styles stand for.
//!
//!     Lists are where the layout matters. Nested lists follow their parent item with no
//!     blank line. A block attached to an item is written after a `+` line, preceded by
//!     one blank line for every level the attachment has to climb from the deepest item
//!     written so far:
//!
//!         * a
//!         ** b
//!         +
//!         attached to b
//!
//!         +
//!         attached to a
//!
//!     Two lists in a row are separated by two blank lines, since one would join them.

use crate::adoc::ast::attributes::{
    ElementAttributes, ATTR_CUSTOM_ID, ATTR_ID, ATTR_REFTEXT, ATTR_ROLE, ATTR_STYLE, ATTR_TITLE,
};
use crate::adoc::ast::document::DraftDocument;
use crate::adoc::ast::elements::image::default_alt;
use crate::adoc::ast::elements::{
    Block, BlockContent, BulletStyle, CheckStyle, DelimitedKind, ImageMacro, List, ListItem,
    TableRow,
};
use crate::adoc::ast::inlines::{Inline, XrefStatus};
use crate::adoc::parsing::attribute_list::block_attributes;

const URL_PREFIXES: [&str; 4] = ["http://", "https://", "ftp://", "irc://"];

/// Write `blocks` as canonical markup.
pub fn serialize_blocks(blocks: &[Block]) -> String {
    MarkupSerializer::new().serialize(blocks)
}

/// Write a draft document, title and header included.
pub fn serialize_draft(draft: &DraftDocument) -> String {
    MarkupSerializer::new().serialize_draft(draft)
}

pub struct MarkupSerializer {
    output: String,
    consecutive_newlines: usize,
    fence_depth: usize,
}

impl Default for MarkupSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupSerializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            consecutive_newlines: 2, // Start as if we have blank lines
            fence_depth: 0,
        }
    }

    pub fn serialize(mut self, blocks: &[Block]) -> String {
        self.write_blocks(blocks, 1);
        self.finish()
    }

    pub fn serialize_draft(mut self, draft: &DraftDocument) -> String {
        let mut body = &draft.blocks[..];
        if let Some(title) = &draft.title {
            self.write_line(&format!("= {}", inline_text(title)));
            let header = body
                .iter()
                .take_while(|block| matches!(block, Block::AttributeDeclaration(_)))
                .count();
            for block in &body[..header] {
                self.write_block(block);
            }
            body = &body[header..];
        }
        self.write_blocks(body, 1);
        self.finish()
    }

    fn finish(self) -> String {
        let mut output = self.output;
        let trimmed = output.trim_end_matches('\n').len();
        output.truncate(trimmed);
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }

    fn write_line(&mut self, text: &str) {
        self.output.push_str(text.trim_end());
        self.output.push('\n');
        self.consecutive_newlines = 1;
    }

    fn ensure_blank_lines(&mut self, count: usize) {
        let target_newlines = count + 1;
        while self.consecutive_newlines < target_newlines {
            self.output.push('\n');
            self.consecutive_newlines += 1;
        }
    }

    /// Write a sibling sequence. `leading` is the number of blank lines before the first
    /// block.
    fn write_blocks(&mut self, blocks: &[Block], leading: usize) {
        let mut previous: Option<&Block> = None;
        for block in blocks {
            let gap = match (previous, block) {
                (None, _) => leading,
                (Some(Block::List(_)), Block::List(_)) => 2,
                (Some(Block::AttributeDeclaration(_)), Block::AttributeDeclaration(_)) => 0,
                _ => 1,
            };
            self.ensure_blank_lines(gap);
            self.write_block(block);
            previous = Some(block);
        }
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(paragraph) => {
                self.write_metadata(&paragraph.attributes, &[]);
                for line in &paragraph.lines {
                    self.write_line(&inline_text(line));
                }
            }
            Block::Section(section) => {
                self.write_metadata(&section.attributes, &[]);
                self.write_line(&format!(
                    "{} {}",
                    "=".repeat(section.level + 1),
                    inline_text(&section.title)
                ));
                self.write_blocks(&section.blocks, 1);
            }
            Block::List(list) => self.write_list(list, &mut 0),
            Block::Delimited(delimited) => {
                self.write_metadata(&delimited.attributes, &[]);
                let fence = self.fence(delimited.kind);
                self.write_line(&fence);
                match &delimited.content {
                    BlockContent::Verbatim(lines) => {
                        for line in lines {
                            self.output.push_str(line);
                            self.output.push('\n');
                        }
                        self.consecutive_newlines = 1;
                    }
                    BlockContent::Blocks(blocks) => {
                        self.fence_depth += 1;
                        self.write_blocks(blocks, 0);
                        self.fence_depth -= 1;
                    }
                }
                self.write_line(&fence);
            }
            Block::Image(image) => {
                self.write_metadata(&image.attributes, &[]);
                self.write_line(&format!(
                    "image::{}[{}]",
                    image.image.path,
                    image_attributes(&image.image)
                ));
            }
            Block::Table(table) => {
                self.write_metadata(&table.attributes, &[]);
                let fence = self.fence(DelimitedKind::Table);
                self.write_line(&fence);
                if let Some(header) = &table.header {
                    self.write_line(&row_line(header));
                    self.ensure_blank_lines(1);
                }
                for row in &table.rows {
                    self.write_line(&row_line(row));
                }
                self.write_line(&fence);
            }
            Block::Include(include) => {
                self.write_title_and_anchor(&include.attributes, &ElementAttributes::new());
                let entries = attribute_entries(&include.attributes, &ElementAttributes::new(), &[]);
                self.write_line(&format!("include::{}[{}]", include.target, entries.join(",")));
            }
            Block::IncludeError(error) => {
                self.write_line(&format!("include::{}[]", error.target));
            }
            Block::TocMacro(toc) => {
                self.write_title_and_anchor(&toc.attributes, &ElementAttributes::new());
                let entries = attribute_entries(&toc.attributes, &ElementAttributes::new(), &[]);
                self.write_line(&format!("toc::[{}]", entries.join(",")));
            }
            Block::TableOfContents(_) => self.write_line("toc::[]"),
            Block::AttributeDeclaration(declaration) => match &declaration.value {
                Some(value) if value.is_empty() => {
                    self.write_line(&format!(":{}:", declaration.name))
                }
                Some(value) => self.write_line(&format!(":{}: {}", declaration.name, value)),
                None => self.write_line(&format!(":{}!:", declaration.name)),
            },
            Block::ThematicBreak { .. } => self.write_line("'''"),
        }
    }

    /// Write a list. `depth` is the level of the deepest item the parser would have open
    /// at this point; 0 outside of any list.
    fn write_list(&mut self, list: &List, depth: &mut usize) {
        let nested = *depth > 0;
        let mut skip = Vec::new();
        if list
            .items
            .iter()
            .any(|item| item.check_style != CheckStyle::NoCheck)
        {
            skip.push("checklist-option");
        }
        let arabic = list
            .items
            .first()
            .is_some_and(|item| item.bullet_style == BulletStyle::Arabic);
        let start = if arabic {
            skip.push("start");
            list.attributes
                .get("start")
                .and_then(|start| start.trim().parse().ok())
                .unwrap_or(1)
        } else {
            1
        };

        for (index, item) in list.items.iter().enumerate() {
            let mut lines = Vec::new();
            if index == 0 {
                lines.extend(metadata_lines(&list.attributes, &skip));
            }
            lines.extend(metadata_lines(&item.attributes, &[]));
            if !lines.is_empty() {
                if nested || index > 0 {
                    self.ensure_blank_lines(1);
                }
                for line in &lines {
                    self.write_line(line);
                }
            }
            self.write_item(item, start + index, depth);
        }
    }

    fn write_item(&mut self, item: &ListItem, ordinal: usize, depth: &mut usize) {
        let mut marker = item.bullet_style.marker(ordinal);
        match item.check_style {
            CheckStyle::Unchecked => marker.push_str(" [ ]"),
            CheckStyle::Checked => marker.push_str(" [x]"),
            CheckStyle::NoCheck => {}
        }

        let (lead, rest) = match item.elements.split_first() {
            Some((Block::Paragraph(paragraph), rest)) if paragraph.attributes.is_empty() => {
                (paragraph.lines.as_slice(), rest)
            }
            _ => (&[][..], item.elements.as_slice()),
        };
        let mut lines = lead.iter().map(|line| inline_text(line));
        match lines.next() {
            Some(first) => self.write_line(&format!("{} {}", marker, first)),
            None => self.write_line(&marker),
        }
        for line in lines {
            self.write_line(&line);
        }
        *depth = item.level;

        for block in rest {
            match block {
                Block::List(sublist) => self.write_list(sublist, depth),
                attached => {
                    for _ in item.level..*depth {
                        self.output.push('\n');
                        self.consecutive_newlines += 1;
                    }
                    self.write_line("+");
                    self.write_block(attached);
                    *depth = item.level;
                }
            }
        }
    }

    fn write_metadata(&mut self, attributes: &ElementAttributes, skip: &[&str]) {
        for line in metadata_lines(attributes, skip) {
            self.write_line(&line);
        }
    }

    fn write_title_and_anchor(&mut self, attributes: &ElementAttributes, derived: &ElementAttributes) {
        if let Some(title) = attributes.title() {
            self.write_line(&format!(".{}", title));
        }
        if let Some(anchor) = anchor_line(attributes, derived) {
            self.write_line(&anchor);
        }
    }

    /// Fence for `kind`, lengthened inside other delimited blocks so inner fences never
    /// close outer ones.
    fn fence(&self, kind: DelimitedKind) -> String {
        let base = kind.fence();
        match (kind, base.chars().last()) {
            (DelimitedKind::Open, _) | (_, None) => base.to_string(),
            (_, Some(c)) => {
                let mut fence = base.to_string();
                fence.extend(std::iter::repeat(c).take(self.fence_depth));
                fence
            }
        }
    }
}

/// Title, anchor and attribute lines for a block's attribute set.
fn metadata_lines(attributes: &ElementAttributes, skip: &[&str]) -> Vec<String> {
    let mut lines = Vec::new();
    if attributes.is_empty() {
        return lines;
    }
    let derived = attributes
        .positional(1)
        .map(block_attributes)
        .unwrap_or_default();
    if let Some(title) = attributes.title() {
        lines.push(format!(".{}", title));
    }
    if let Some(anchor) = anchor_line(attributes, &derived) {
        lines.push(anchor);
    }
    let entries = attribute_entries(attributes, &derived, skip);
    if !entries.is_empty() {
        lines.push(format!("[{}]", entries.join(",")));
    }
    lines
}

/// `[[id]]` or `[[id,reftext]]` for an author-written id the attribute line won't carry.
fn anchor_line(attributes: &ElementAttributes, derived: &ElementAttributes) -> Option<String> {
    if !attributes.has_custom_id() || derived.id() == attributes.id() {
        return None;
    }
    let id = attributes.id()?;
    Some(match attributes.get(ATTR_REFTEXT) {
        Some(reftext) => format!("[[{},{}]]", id, reftext),
        None => format!("[[{}]]", id),
    })
}

/// Entries of a bracketed attribute list: positional values in order, then named ones.
///
/// The first positional is written as found, so its `style#id.role%option` shorthand
/// produces the same keys again. Keys the shorthand, the anchor or the title line already
/// account for are left out.
fn attribute_entries(
    attributes: &ElementAttributes,
    derived: &ElementAttributes,
    skip: &[&str],
) -> Vec<String> {
    let positional_count = attributes
        .iter()
        .filter_map(|(key, _)| key.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    let mut entries: Vec<String> = (1..=positional_count)
        .map(|index| attributes.positional(index).map(quote).unwrap_or_default())
        .collect();

    let extra_options: Vec<&str> = attributes
        .iter()
        .filter_map(|(key, _)| key.strip_suffix("-option"))
        .filter(|option| {
            let key = format!("{}-option", option);
            !derived.contains(&key)
                && !skip.contains(&key.as_str())
                && !listed_option(attributes, option)
        })
        .collect();
    if !extra_options.is_empty() {
        let mut shorthand = entries.first().cloned().unwrap_or_default();
        for option in extra_options {
            shorthand.push('%');
            shorthand.push_str(option);
        }
        match entries.first_mut() {
            Some(first) => *first = shorthand,
            None => entries.push(shorthand),
        }
    }

    let derived_roles = derived.roles();
    let roles: Vec<&str> = attributes
        .roles()
        .into_iter()
        .filter(|role| !derived_roles.contains(role))
        .collect();
    if !roles.is_empty() {
        entries.push(format!("{}=\"{}\"", ATTR_ROLE, roles.join(" ")));
    }

    let anchored = attributes.has_custom_id() && derived.id() != attributes.id();
    for (key, value) in attributes.iter() {
        let structural = matches!(
            key,
            ATTR_ID | ATTR_CUSTOM_ID | ATTR_TITLE | ATTR_STYLE | ATTR_ROLE
        ) || key.parse::<usize>().is_ok()
            || key.ends_with("-option")
            || skip.contains(&key)
            || (key == ATTR_REFTEXT && anchored)
            || (key == "language"
                && attributes.style() == Some("source")
                && attributes.positional(2) == Some(value));
        if !structural {
            entries.push(format!("{}={}", key, quote(value)));
        }
    }
    entries
}

/// Whether `option` comes from an `opts`/`options` entry that is written out as is.
fn listed_option(attributes: &ElementAttributes, option: &str) -> bool {
    ["opts", "options"].iter().any(|key| {
        attributes
            .get(key)
            .is_some_and(|list| list.split(',').any(|listed| listed.trim() == option))
    })
}

fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains([',', '"'])
        || value.starts_with(['\'', ' ', '\t'])
        || value.ends_with([' ', '\t']);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn image_attributes(image: &ImageMacro) -> String {
    let alt = if image.alt == default_alt(&image.path) {
        String::new()
    } else {
        quote(&image.alt)
    };
    let mut entries = vec![
        alt,
        image.width.clone().unwrap_or_default(),
        image.height.clone().unwrap_or_default(),
    ];
    let positional_count = image
        .attributes
        .iter()
        .filter_map(|(key, _)| key.parse::<usize>().ok())
        .max()
        .unwrap_or(0);
    for index in 4..=positional_count {
        entries.push(image.attributes.positional(index).map(quote).unwrap_or_default());
    }
    while entries.last().is_some_and(String::is_empty) {
        entries.pop();
    }
    for (key, value) in image.attributes.iter() {
        if key.parse::<usize>().is_err() {
            entries.push(format!("{}={}", key, quote(value)));
        }
    }
    entries.join(",")
}

fn row_line(row: &TableRow) -> String {
    row.cells
        .iter()
        .map(|cell| format!("| {}", inline_text(cell).replace('|', "\\|")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inline content as markup.
pub fn inline_text(content: &[Inline]) -> String {
    let mut out = String::new();
    for inline in content {
        write_inline(&mut out, inline);
    }
    out
}

fn write_inline(out: &mut String, inline: &Inline) {
    match inline {
        Inline::Text(text) => out.push_str(text),
        Inline::Quoted(quoted) => {
            let c = quoted.kind.delimiter();
            let delimiter = if quoted.unconstrained {
                format!("{}{}", c, c)
            } else {
                c.to_string()
            };
            out.push_str(&delimiter);
            out.push_str(&inline_text(&quoted.elements));
            out.push_str(&delimiter);
        }
        Inline::LineBreak => out.push_str(" +"),
        Inline::AttributeRef(name) => {
            out.push('{');
            out.push_str(name);
            out.push('}');
        }
        Inline::Image(image) => {
            out.push_str(&format!("image:{}[{}]", image.path, image_attributes(image)));
        }
        Inline::Footnote(footnote) => {
            let key = footnote.key.as_deref().unwrap_or_default();
            out.push_str(&format!(
                "footnote:{}[{}]",
                key,
                inline_text(&footnote.elements)
            ));
        }
        Inline::CrossReference(xref) => {
            let target = match &xref.status {
                XrefStatus::External { path } if xref.id.is_empty() => path.clone(),
                XrefStatus::External { path } => format!("{}#{}", path, xref.id),
                _ => xref.id.clone(),
            };
            match &xref.label {
                Some(label) => out.push_str(&format!("<<{},{}>>", target, label)),
                None => out.push_str(&format!("<<{}>>", target)),
            }
        }
        Inline::Link(link) => {
            let bare = URL_PREFIXES.iter().any(|prefix| link.url.starts_with(prefix));
            let text = inline_text(&link.text);
            let text = if text.contains('=') { quote(&text) } else { text };
            if bare && text.is_empty() {
                out.push_str(&link.url);
            } else if bare || link.url.starts_with("mailto:") {
                out.push_str(&format!("{}[{}]", link.url, text));
            } else {
                out.push_str(&format!("link:{}[{}]", link.url, text));
            }
        }
        Inline::Passthrough(text) if text.contains(']') => {
            out.push_str(&format!("+++{}+++", text));
        }
        Inline::Passthrough(text) => out.push_str(&format!("pass:[{}]", text)),
    }
}
