//! Inline tokens
//!
//! The logos lexer splits one line of text into the tokens the inline parser cares about:
//! quote delimiters, escapes and the openers of placeholders and references. Everything
//! else falls into `Word`, `Whitespace` or `Other` and ends up as plain text.
//!
//! Every token has a fixed shape or a single character class, so the lexer never has to
//! give back a partial match. Constructs with a variable tail (`{name}`, `<<id>>`,
//! `image:path[...]`, URLs) are recognised by the parser, which looks ahead in the
//! source from the opening token and skips the lexer past whatever it consumed.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineToken {
    /// Backslash followed by a character that would otherwise be markup.
    #[regex(r"\\[*_`#^~+{<\[\\]")]
    Escaped,

    #[token("**")]
    DoubleAsterisk,
    #[token("*")]
    Asterisk,
    #[token("__")]
    DoubleUnderscore,
    #[token("_")]
    Underscore,
    #[token("``")]
    DoubleBacktick,
    #[token("`")]
    Backtick,
    #[token("##")]
    DoubleHash,
    #[token("#")]
    Hash,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,

    #[token("+++")]
    TriplePlus,

    /// Opens a `{name}` placeholder.
    #[token("{")]
    OpenBrace,

    /// Opens a `<<id>>` cross-reference.
    #[token("<<")]
    DoubleLess,

    #[regex(r"[ \t]+")]
    Whitespace,

    /// Alphanumeric run. Macro names and URL schemes start with one.
    #[regex(r"[A-Za-z0-9]+")]
    Word,

    #[token("+")]
    #[token("<")]
    #[token("\\")]
    #[regex(r"[^ \t\\*_`#^~+{<A-Za-z0-9]")]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<InlineToken> {
        InlineToken::lexer(text)
            .map(|result| result.unwrap_or(InlineToken::Other))
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            kinds("hello world."),
            vec![
                InlineToken::Word,
                InlineToken::Whitespace,
                InlineToken::Word,
                InlineToken::Other
            ]
        );
    }

    #[test]
    fn test_underscore_after_word_is_a_delimiter() {
        assert_eq!(
            kinds("_inner_*"),
            vec![
                InlineToken::Underscore,
                InlineToken::Word,
                InlineToken::Underscore,
                InlineToken::Asterisk
            ]
        );
        assert_eq!(
            kinds("snake-case_x"),
            vec![
                InlineToken::Word,
                InlineToken::Other,
                InlineToken::Word,
                InlineToken::Underscore,
                InlineToken::Word
            ]
        );
    }

    #[test]
    fn test_macro_name_is_a_word() {
        let mut lexer = InlineToken::lexer("a image:foo.png[]");
        assert_eq!(lexer.nth(2), Some(Ok(InlineToken::Word)));
        assert_eq!(lexer.slice(), "image");
        assert_eq!(lexer.next(), Some(Ok(InlineToken::Other)));
    }

    #[test]
    fn test_openers() {
        assert_eq!(
            kinds("{plus}<<intro>>"),
            vec![
                InlineToken::OpenBrace,
                InlineToken::Word,
                InlineToken::Other,
                InlineToken::DoubleLess,
                InlineToken::Word,
                InlineToken::Other,
                InlineToken::Other
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds("**a*"),
            vec![
                InlineToken::DoubleAsterisk,
                InlineToken::Word,
                InlineToken::Asterisk
            ]
        );
        assert_eq!(kinds(r"\*"), vec![InlineToken::Escaped]);
        assert_eq!(kinds("+++"), vec![InlineToken::TriplePlus]);
    }
}
