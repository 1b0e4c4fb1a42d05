//! Inline parsing
//!
//!     Turns the text of one line into [`Inline`](crate::adoc::ast::Inline) nodes. The
//!     tokenizer ([tokens](tokens)) is a logos lexer; the parser ([parser](parser)) keeps a
//!     stack of open styled spans, closes them on the matching delimiter and unwinds
//!     anything left open back to literal text. Macro heads, bare URLs and the `{`/`<<`
//!     openers are matched by the parser against the source, never by the lexer.
//!
//!     Constrained delimiters (`*`, `_`, `` ` ``, `#`) only open at the start of a word and
//!     close at its end; doubled ones bind anywhere. Placeholders (`{name}`, footnotes,
//!     cross-references) are kept unresolved for the resolution stages.

pub mod macros;
pub mod parser;
pub mod tokens;

pub use macros::image_macro;
pub use parser::{parse_inline_text, parse_line};
pub use tokens::InlineToken;
