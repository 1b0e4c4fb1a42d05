use super::macros::{bare_url, find_closing_bracket, inline_macro, short_cross_reference};
use super::tokens::InlineToken;
use crate::adoc::ast::inlines::{push_inline, push_text, Inline, InlineContent, QuoteKind, QuotedText};
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([A-Za-z0-9_][A-Za-z0-9_-]*)\}").unwrap());
static CROSS_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<<[^<>\s][^<>]*>>").unwrap());
static MACRO_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9_-]*):([^\s\[\]:][^\s\[\]]*)?\[").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:https?|ftp|irc)://[^\s\[\]<>]+").unwrap());

/// The part of `text` from `start` on that `pattern` matches, if any.
fn lookahead<'t>(text: &'t str, start: usize, pattern: &Regex) -> Option<&'t str> {
    pattern.find(&text[start..]).map(|m| m.as_str())
}

/// Parse one source line of a paragraph (or list item text).
///
/// On top of [`parse_inline_text`] this handles the line-level rules: a trailing ` +`
/// becomes a [`Inline::LineBreak`], and trailing whitespace is dropped unless it directly
/// follows an inline macro.
pub fn parse_line(line: &str) -> InlineContent {
    let (body, hard_break) = split_line_break(line);
    let mut content = parse_inline_text(body);
    trim_trailing_whitespace(&mut content);
    if hard_break {
        content.push(Inline::LineBreak);
    }
    content
}

fn split_line_break(line: &str) -> (&str, bool) {
    let trimmed = line.trim_end();
    match trimmed.strip_suffix('+') {
        Some(body) if body.ends_with([' ', '\t']) => (body.trim_end(), true),
        _ => (line, false),
    }
}

fn trim_trailing_whitespace(content: &mut InlineContent) {
    let after_macro = content.len() >= 2 && content[content.len() - 2].is_macro();
    if let Some(Inline::Text(last)) = content.last_mut() {
        if after_macro && last.trim().is_empty() {
            return;
        }
        let trimmed_len = last.trim_end().len();
        last.truncate(trimmed_len);
        if last.is_empty() {
            content.pop();
        }
    }
}

/// Parse inline text with no line-level context (titles, cells, macro bodies).
///
/// Never fails: delimiters that don't pair up stay in the output as literal text.
pub fn parse_inline_text(text: &str) -> InlineContent {
    let mut parser = InlineParser::new(text);
    parser.run();
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delimiter {
    kind: QuoteKind,
    unconstrained: bool,
}

impl Delimiter {
    fn from_token(token: InlineToken) -> Option<Self> {
        let (kind, unconstrained) = match token {
            InlineToken::DoubleAsterisk => (QuoteKind::Bold, true),
            InlineToken::Asterisk => (QuoteKind::Bold, false),
            InlineToken::DoubleUnderscore => (QuoteKind::Italic, true),
            InlineToken::Underscore => (QuoteKind::Italic, false),
            InlineToken::DoubleBacktick => (QuoteKind::Monospace, true),
            InlineToken::Backtick => (QuoteKind::Monospace, false),
            InlineToken::DoubleHash => (QuoteKind::Mark, true),
            InlineToken::Hash => (QuoteKind::Mark, false),
            InlineToken::Caret => (QuoteKind::Superscript, false),
            InlineToken::Tilde => (QuoteKind::Subscript, false),
            _ => return None,
        };
        Some(Self {
            kind,
            unconstrained,
        })
    }

    /// Superscript and subscript bind inside words even with single delimiters.
    fn binds_anywhere(self) -> bool {
        self.unconstrained || matches!(self.kind, QuoteKind::Superscript | QuoteKind::Subscript)
    }

    fn text(self) -> String {
        let c = self.kind.delimiter();
        if self.unconstrained {
            format!("{}{}", c, c)
        } else {
            c.to_string()
        }
    }

    fn can_open(self, prev: Option<char>, next: Option<char>) -> bool {
        let next_ok = matches!(next, Some(c) if !c.is_whitespace());
        if self.binds_anywhere() {
            next_ok
        } else {
            !is_word(prev) && next_ok
        }
    }

    fn can_close(self, prev: Option<char>, next: Option<char>) -> bool {
        let prev_ok = matches!(prev, Some(c) if !c.is_whitespace());
        if self.binds_anywhere() {
            prev_ok
        } else {
            prev_ok && !is_word(next)
        }
    }
}

fn is_word(ch: Option<char>) -> bool {
    ch.map(|c| c.is_alphanumeric()).unwrap_or(false)
}

struct InlineFrame {
    delimiter: Option<Delimiter>,
    buffer: String,
    children: InlineContent,
}

impl InlineFrame {
    fn new(delimiter: Option<Delimiter>) -> Self {
        Self {
            delimiter,
            buffer: String::new(),
            children: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !self.buffer.is_empty() || !self.children.is_empty()
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        push_text(&mut self.children, &text);
    }

    fn push_node(&mut self, node: Inline) {
        self.flush_buffer();
        push_inline(&mut self.children, node);
    }
}

struct InlineParser<'a> {
    text: &'a str,
    lexer: logos::Lexer<'a, InlineToken>,
    stack: Vec<InlineFrame>,
}

impl<'a> InlineParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lexer: InlineToken::lexer(text),
            stack: vec![InlineFrame::new(None)],
        }
    }

    fn top(&mut self) -> &mut InlineFrame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn push_str(&mut self, s: &str) {
        self.top().buffer.push_str(s);
    }

    fn run(&mut self) {
        while let Some(result) = self.lexer.next() {
            let span = self.lexer.span();
            let slice = self.lexer.slice();
            let Ok(token) = result else {
                self.push_str(slice);
                continue;
            };
            match token {
                InlineToken::Escaped => self.push_str(&slice[1..]),
                InlineToken::TriplePlus => self.passthrough(slice),
                InlineToken::OpenBrace => match lookahead(self.text, span.start, &ATTRIBUTE_REF) {
                    Some(found) => {
                        let name = found[1..found.len() - 1].to_string();
                        self.top().push_node(Inline::AttributeRef(name));
                        self.lexer.bump(found.len() - slice.len());
                    }
                    None => self.push_str(slice),
                },
                InlineToken::DoubleLess => {
                    let found = lookahead(self.text, span.start, &CROSS_REFERENCE)
                        .and_then(|found| short_cross_reference(found).map(|node| (found, node)));
                    match found {
                        Some((found, node)) => {
                            self.top().push_node(node);
                            self.lexer.bump(found.len() - slice.len());
                        }
                        None => self.push_str(slice),
                    }
                }
                InlineToken::Word => self.word(span.start, slice),
                InlineToken::Whitespace | InlineToken::Other => self.push_str(slice),
                _ => match Delimiter::from_token(token) {
                    Some(delimiter) => {
                        let prev = self.text[..span.start].chars().next_back();
                        let next = self.text[span.end..].chars().next();
                        self.delimiter(delimiter, prev, next, slice);
                    }
                    None => self.push_str(slice),
                },
            }
        }
    }

    fn delimiter(&mut self, delimiter: Delimiter, prev: Option<char>, next: Option<char>, slice: &str) {
        let open = self
            .stack
            .iter()
            .rposition(|frame| frame.delimiter == Some(delimiter));
        if let Some(index) = open {
            if delimiter.can_close(prev, next) && self.stack[index].has_content() {
                while self.stack.len() > index + 1 {
                    self.unwind_top();
                }
                let mut frame = self.stack.pop().unwrap_or_else(|| InlineFrame::new(None));
                frame.flush_buffer();
                self.top().push_node(Inline::Quoted(QuotedText {
                    kind: delimiter.kind,
                    unconstrained: delimiter.unconstrained,
                    elements: frame.children,
                }));
                return;
            }
        }
        if delimiter.can_open(prev, next) {
            self.top().flush_buffer();
            self.stack.push(InlineFrame::new(Some(delimiter)));
        } else {
            self.push_str(slice);
        }
    }

    /// Turn the innermost open span back into literal text.
    fn unwind_top(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut frame) = self.stack.pop() else {
            return;
        };
        frame.flush_buffer();
        let parent = self.top();
        if let Some(delimiter) = frame.delimiter {
            parent.buffer.push_str(&delimiter.text());
        }
        for child in frame.children {
            parent.push_node(child);
        }
    }

    fn passthrough(&mut self, slice: &str) {
        let remainder = self.lexer.remainder();
        match remainder.find("+++") {
            Some(end) => {
                let content = remainder[..end].to_string();
                self.top().push_node(Inline::Passthrough(content));
                self.lexer.bump(end + 3);
            }
            None => self.push_str(slice),
        }
    }

    /// A word may start an inline macro or a bare URL; otherwise it is plain text. A URL
    /// followed by `[text]` is a macro.
    fn word(&mut self, start: usize, word: &str) {
        if let Some(head) = lookahead(self.text, start, &MACRO_HEAD) {
            if self.inline_macro(start, head, word.len()) {
                return;
            }
        }
        if let Some(url) = lookahead(self.text, start, &URL) {
            let (link, rest) = bare_url(url);
            self.top().push_node(link);
            self.push_str(rest);
            self.lexer.bump(url.len() - word.len());
            return;
        }
        self.push_str(word);
    }

    /// Emit the macro whose `name:target[` head starts at `start`. Returns false, consuming
    /// nothing, when the brackets don't close or the name is not an inline macro.
    fn inline_macro(&mut self, start: usize, head: &str, lexed: usize) -> bool {
        let Some((name, target)) = head[..head.len() - 1].split_once(':') else {
            return false;
        };
        let text = self.text;
        let remainder = &text[start + head.len()..];
        let Some(close) = find_closing_bracket(remainder) else {
            return false;
        };
        let attributes = remainder[..close].replace("\\]", "]");
        match inline_macro(name, target, &attributes) {
            Some(node) => {
                self.top().push_node(node);
                self.lexer.bump(head.len() - lexed + close + 1);
                true
            }
            None => false,
        }
    }

    fn finish(mut self) -> InlineContent {
        while self.stack.len() > 1 {
            self.unwind_top();
        }
        let mut root = self.stack.pop().unwrap_or_else(|| InlineFrame::new(None));
        root.flush_buffer();
        root.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adoc::ast::inlines::{Link, XrefStatus};

    fn quoted(kind: QuoteKind, unconstrained: bool, elements: InlineContent) -> Inline {
        Inline::Quoted(QuotedText {
            kind,
            unconstrained,
            elements,
        })
    }

    #[test]
    fn parses_plain_text() {
        assert_eq!(parse_line("hello world"), vec![Inline::text("hello world")]);
    }

    #[test]
    fn parses_constrained_and_nested_spans() {
        let nodes = parse_line("*strong _inner_* text");
        assert_eq!(
            nodes,
            vec![
                quoted(
                    QuoteKind::Bold,
                    false,
                    vec![
                        Inline::text("strong "),
                        quoted(QuoteKind::Italic, false, vec![Inline::text("inner")])
                    ]
                ),
                Inline::text(" text"),
            ]
        );
    }

    #[test]
    fn italic_spans_open_before_words() {
        assert_eq!(
            parse_line("_a_"),
            vec![quoted(QuoteKind::Italic, false, vec![Inline::text("a")])]
        );
        assert_eq!(
            parse_line("__a__"),
            vec![quoted(QuoteKind::Italic, true, vec![Inline::text("a")])]
        );
        assert_eq!(
            parse_line("an _italic_ word"),
            vec![
                Inline::text("an "),
                quoted(QuoteKind::Italic, false, vec![Inline::text("italic")]),
                Inline::text(" word"),
            ]
        );
        assert_eq!(
            parse_line("an __italic__ word"),
            vec![
                Inline::text("an "),
                quoted(QuoteKind::Italic, true, vec![Inline::text("italic")]),
                Inline::text(" word"),
            ]
        );
    }

    #[test]
    fn underscore_inside_words_stays_literal() {
        assert_eq!(
            parse_line("word_ *b*"),
            vec![
                Inline::text("word_ "),
                quoted(QuoteKind::Bold, false, vec![Inline::text("b")]),
            ]
        );
        assert_eq!(parse_line("snake-case_x"), vec![Inline::text("snake-case_x")]);
    }

    #[test]
    fn unclosed_openers_leave_later_spans_intact() {
        assert_eq!(
            parse_line("{open _it_"),
            vec![
                Inline::text("{open "),
                quoted(QuoteKind::Italic, false, vec![Inline::text("it")]),
            ]
        );
        assert_eq!(
            parse_line("<<open *b*"),
            vec![
                Inline::text("<<open "),
                quoted(QuoteKind::Bold, false, vec![Inline::text("b")]),
            ]
        );
        assert_eq!(
            parse_line("_note:_ done"),
            vec![
                quoted(QuoteKind::Italic, false, vec![Inline::text("note:")]),
                Inline::text(" done"),
            ]
        );
    }

    #[test]
    fn unconstrained_binds_inside_words() {
        assert_eq!(
            parse_line("un**believ**able"),
            vec![
                Inline::text("un"),
                quoted(QuoteKind::Bold, true, vec![Inline::text("believ")]),
                Inline::text("able"),
            ]
        );
    }

    #[test]
    fn constrained_does_not_bind_inside_words() {
        assert_eq!(parse_line("snake_case_name"), vec![Inline::text("snake_case_name")]);
        assert_eq!(parse_line("2 * 3 * 4"), vec![Inline::text("2 * 3 * 4")]);
    }

    #[test]
    fn unmatched_delimiters_are_literal() {
        assert_eq!(parse_line("*open only"), vec![Inline::text("*open only")]);
        assert_eq!(
            parse_line("*a _b* c"),
            vec![
                quoted(QuoteKind::Bold, false, vec![Inline::text("a _b")]),
                Inline::text(" c"),
            ]
        );
    }

    #[test]
    fn superscript_and_subscript() {
        assert_eq!(
            parse_line("E=mc^2^ and H~2~O"),
            vec![
                Inline::text("E=mc"),
                quoted(QuoteKind::Superscript, false, vec![Inline::text("2")]),
                Inline::text(" and H"),
                quoted(QuoteKind::Subscript, false, vec![Inline::text("2")]),
                Inline::text("O"),
            ]
        );
    }

    #[test]
    fn escapes_suppress_markup() {
        assert_eq!(parse_line(r"\*not bold*"), vec![Inline::text("*not bold*")]);
        assert_eq!(parse_line(r"\{name}"), vec![Inline::text("{name}")]);
    }

    #[test]
    fn attribute_placeholders() {
        assert_eq!(
            parse_line("using {plus} symbol"),
            vec![
                Inline::text("using "),
                Inline::AttributeRef("plus".into()),
                Inline::text(" symbol"),
            ]
        );
    }

    #[test]
    fn hard_line_break() {
        assert_eq!(
            parse_line("We can even force content... +"),
            vec![Inline::text("We can even force content..."), Inline::LineBreak]
        );
        assert_eq!(parse_line("a+"), vec![Inline::text("a+")]);
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        assert_eq!(parse_line("a paragraph   \t"), vec![Inline::text("a paragraph")]);
    }

    #[test]
    fn whitespace_after_macro_is_kept() {
        let nodes = parse_line("image:images/foo.png[]  \t\t  ");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], Inline::Image(image) if image.alt == "foo"));
        assert_eq!(nodes[1], Inline::text("  \t\t  "));
    }

    #[test]
    fn image_between_text() {
        let nodes = parse_line("a foo image:images/foo.png[] bar...");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Inline::text("a foo "));
        assert!(matches!(&nodes[1], Inline::Image(image) if image.path == "images/foo.png"));
        assert_eq!(nodes[2], Inline::text(" bar..."));
    }

    #[test]
    fn block_image_macro_is_text_inline() {
        assert_eq!(
            parse_line("image::images/foo.png[]"),
            vec![Inline::text("image::images/foo.png[]")]
        );
    }

    #[test]
    fn unknown_macro_is_text() {
        assert_eq!(parse_line("kbd:[Ctrl]"), vec![Inline::text("kbd:[Ctrl]")]);
    }

    #[test]
    fn passthrough() {
        assert_eq!(
            parse_line("a +++<b>*x*</b>+++ b"),
            vec![
                Inline::text("a "),
                Inline::Passthrough("<b>*x*</b>".into()),
                Inline::text(" b"),
            ]
        );
        assert_eq!(
            parse_line("pass:[*raw*]"),
            vec![Inline::Passthrough("*raw*".into())]
        );
    }

    #[test]
    fn links() {
        assert_eq!(
            parse_line("see https://example.org."),
            vec![
                Inline::text("see "),
                Inline::Link(Link {
                    url: "https://example.org".into(),
                    text: vec![]
                }),
                Inline::text("."),
            ]
        );
        assert_eq!(
            parse_line("https://example.org[Example] or https://example.org[unclosed"),
            vec![
                Inline::Link(Link {
                    url: "https://example.org".into(),
                    text: vec![Inline::text("Example")]
                }),
                Inline::text(" or "),
                Inline::Link(Link {
                    url: "https://example.org".into(),
                    text: vec![]
                }),
                Inline::text("[unclosed"),
            ]
        );
        assert_eq!(
            parse_line("link:index.html[Home page]"),
            vec![Inline::Link(Link {
                url: "index.html".into(),
                text: vec![Inline::text("Home page")]
            })]
        );
    }

    #[test]
    fn cross_references() {
        match &parse_line("see <<intro>>")[1] {
            Inline::CrossReference(xref) => {
                assert_eq!(xref.id, "intro");
                assert_eq!(xref.status, XrefStatus::Pending);
            }
            other => panic!("unexpected {:?}", other),
        }
        match &parse_line("xref:setup[Setup]")[0] {
            Inline::CrossReference(xref) => assert_eq!(xref.label.as_deref(), Some("Setup")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn footnote_with_nested_markup() {
        match &parse_line("text.footnote:[a *bold* note]")[1] {
            Inline::Footnote(footnote) => {
                assert_eq!(footnote.elements.len(), 3);
                assert_eq!(footnote.index, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
