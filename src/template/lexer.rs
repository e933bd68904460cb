//! Lexer for template text using logos
//!
//! Templates are mostly literal text. The lexer only needs to find include
//! directives and placeholders; everything else comes out as `Text` (or a
//! lone `{` that did not start a recognized marker).

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// `{% include "path" %}`, carrying the quoted path
    #[regex(r#"\{%[ \t]*include[ \t]+"[^"\r\n]*"[ \t]*%\}"#, |lex| quoted(lex.slice()))]
    Include(String),

    /// `{{ name }}` or `{{ meta.key }}`, carrying the dotted path
    #[regex(
        r"\{\{[ \t]*[A-Za-z_][A-Za-z0-9_-]*(\.[A-Za-z_][A-Za-z0-9_-]*)*[ \t]*\}\}",
        |lex| placeholder_path(lex.slice())
    )]
    Placeholder(String),

    #[regex(r"[^{]+")]
    Text,

    #[token("{")]
    Brace,
}

fn quoted(directive: &str) -> String {
    match (directive.find('"'), directive.rfind('"')) {
        (Some(start), Some(end)) if end > start => directive[start + 1..end].to_string(),
        _ => String::new(),
    }
}

fn placeholder_path(marker: &str) -> String {
    marker
        .trim_start_matches("{{")
        .trim_end_matches("}}")
        .trim()
        .to_string()
}

/// Tokenize template text into spanned tokens
///
/// Every byte of the input is covered by exactly one token.
pub fn lex(input: &str) -> Lexer<'_> {
    Lexer {
        input,
        offset: 0,
        inner: Token::lexer(input),
    }
}

/// Spanned token stream over template text
///
/// A marker that fails to match gives up only its first character, and
/// lexing resumes right after it, so `{{{ name }}}` still yields the
/// placeholder.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    inner: logos::Lexer<'a, Token>,
}

impl Iterator for Lexer<'_> {
    type Item = (Token, Span);

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span = self.inner.span();
        let start = self.offset + span.start;

        match result {
            Ok(token) => Some((token, start..self.offset + span.end)),
            Err(()) => {
                let first = self.input[start..].chars().next()?;
                let end = start + first.len_utf8();
                self.offset = end;
                self.inner = Token::lexer(&self.input[end..]);
                let token = if first == '{' { Token::Brace } else { Token::Text };
                Some((token, start..end))
            }
        }
    }
}
