//! Lexer - ordered matcher list producing a flat token sequence.
//!
//! Matchers are tried in declaration order at every position and the first
//! one that matches *at* the cursor wins. Regular expressions are anchored to
//! the cursor, so a pattern can never skip ahead to a later match.

use std::fmt;

use regex::Regex;

use crate::ParseError;

/// A grammar symbol. Every symbol set reserves one value for end of input.
pub trait Symbol: Copy + Eq + fmt::Debug {
    /// The synthetic symbol appended after the last real token.
    const EOF: Self;
}

/// Something that can recognize a token at the start of a string.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exactly one character.
    Char(char),
    /// A regular expression anchored at the cursor.
    Pattern(Regex),
}

impl Matcher {
    pub fn char(c: char) -> Self {
        Matcher::Char(c)
    }

    /// Compile `pattern` so it only matches starting at the cursor.
    pub fn pattern(pattern: &str) -> Result<Self, ParseError> {
        let anchored = Regex::new(&format!(r"\A(?:{})", pattern))?;
        Ok(Matcher::Pattern(anchored))
    }

    /// Length in bytes of the match at the start of `rest`, if any.
    ///
    /// Empty matches never count; they would stall the lexer.
    fn match_len(&self, rest: &str) -> Option<usize> {
        match self {
            Matcher::Char(c) => rest.starts_with(*c).then(|| c.len_utf8()),
            Matcher::Pattern(re) => re
                .find(rest)
                .filter(|m| m.start() == 0 && m.end() > 0)
                .map(|m| m.end()),
        }
    }
}

/// One lexed token. `begin..end` is the byte range in the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<S> {
    pub symbol: S,
    pub begin: usize,
    pub end: usize,
    pub text: String,
}

impl<S: Symbol> Token<S> {
    pub fn eof(at: usize) -> Self {
        Self {
            symbol: S::EOF,
            begin: at,
            end: at,
            text: String::new(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.symbol == S::EOF
    }
}

/// Concatenate the source text of a run of tokens.
pub fn join_text<S>(tokens: &[Token<S>]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Ordered list of `(matcher, symbol)` rules.
#[derive(Debug, Clone)]
pub struct Lexer<S> {
    rules: Vec<(Matcher, S)>,
}

impl<S: Symbol> Default for Lexer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> Lexer<S> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule (builder style).
    pub fn rule(mut self, matcher: Matcher, symbol: S) -> Self {
        self.add_rule(matcher, symbol);
        self
    }

    pub fn add_rule(&mut self, matcher: Matcher, symbol: S) {
        self.rules.push((matcher, symbol));
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Tokenize the whole buffer.
    ///
    /// Fails without partial results if any position matches no rule. On
    /// success the last token is always the end-of-file token.
    pub fn process_contents(&self, buffer: &str) -> Result<Vec<Token<S>>, ParseError> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < buffer.len() {
            let rest = &buffer[pos..];
            let Some((len, symbol)) = self
                .rules
                .iter()
                .find_map(|(matcher, symbol)| matcher.match_len(rest).map(|len| (len, *symbol)))
            else {
                let (line, column) = line_column(buffer, pos);
                return Err(ParseError::Lex {
                    offset: pos,
                    line,
                    column,
                });
            };

            tokens.push(Token {
                symbol,
                begin: pos,
                end: pos + len,
                text: rest[..len].to_string(),
            });
            pos += len;
        }

        tokens.push(Token::eof(pos));
        Ok(tokens)
    }
}

/// 1-based line and column of a byte offset.
pub fn line_column(buffer: &str, offset: usize) -> (usize, usize) {
    let before = &buffer[..offset.min(buffer.len())];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}
