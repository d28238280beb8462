//! Forward-only cursor over a lexed token sequence.

use crate::lexer::{Symbol, Token};

/// A token sequence with a single forward cursor.
///
/// The list always ends with an end-of-file token and the cursor never moves
/// past it, so `at_eof()` can be asked any number of times.
#[derive(Debug, Clone)]
pub struct TokenList<S> {
    tokens: Vec<Token<S>>,
    position: usize,
}

impl<S: Symbol> TokenList<S> {
    pub fn new(mut tokens: Vec<Token<S>>) -> Self {
        if tokens.last().is_none_or(|t| !t.is_eof()) {
            let end = tokens.last().map_or(0, |t| t.end);
            tokens.push(Token::eof(end));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// The token under the cursor, without consuming it.
    pub fn current(&self) -> &Token<S> {
        &self.tokens[self.position]
    }

    pub fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    /// Index of the cursor into the token sequence.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Tokens not yet consumed, including the trailing end-of-file token.
    pub fn remaining(&self) -> &[Token<S>] {
        &self.tokens[self.position..]
    }

    /// Consume the current token if it carries `symbol`.
    ///
    /// Accepting the end-of-file symbol succeeds without moving the cursor.
    pub fn accept(&mut self, symbol: S) -> bool {
        if self.current().symbol != symbol {
            return false;
        }
        self.advance();
        true
    }

    /// Like `accept`, but hands back the consumed token.
    pub fn take(&mut self, symbol: S) -> Option<Token<S>> {
        if self.current().symbol != symbol || self.at_eof() {
            return None;
        }
        let token = self.current().clone();
        self.advance();
        Some(token)
    }

    /// Consume whatever the current token is. `None` at end of file.
    pub fn next_token(&mut self) -> Option<Token<S>> {
        if self.at_eof() {
            return None;
        }
        let token = self.current().clone();
        self.advance();
        Some(token)
    }

    /// Consume a run of `symbol`. Returns how many tokens were skipped.
    pub fn skip_over(&mut self, symbol: S) -> usize {
        let mut count = 0;
        while !self.at_eof() && self.accept(symbol) {
            count += 1;
        }
        count
    }

    /// Consume everything up to, not including, the next `symbol` or end of file.
    pub fn skip_until(&mut self, symbol: S) -> usize {
        let mut count = 0;
        while !self.at_eof() && self.current().symbol != symbol {
            self.advance();
            count += 1;
        }
        count
    }

    /// `skip_until`, keeping the skipped tokens for reassembly.
    pub fn collect_until(&mut self, symbol: S) -> Vec<Token<S>> {
        let mut skipped = Vec::new();
        while !self.at_eof() && self.current().symbol != symbol {
            skipped.push(self.current().clone());
            self.advance();
        }
        skipped
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::join_text;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sym {
        A,
        B,
        Eof,
    }

    impl Symbol for Sym {
        const EOF: Self = Sym::Eof;
    }

    fn list(symbols: &[Sym]) -> TokenList<Sym> {
        let tokens = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| Token {
                symbol: *s,
                begin: i,
                end: i + 1,
                text: format!("{:?}", s).to_lowercase(),
            })
            .collect();
        TokenList::new(tokens)
    }

    #[test]
    fn test_missing_eof_is_appended() {
        let tokens = list(&[Sym::A]);
        assert_eq!(tokens.remaining().len(), 2);
        assert_eq!(tokens.remaining()[1].begin, 1);
    }

    #[test]
    fn test_accept_consumes_only_on_match() {
        let mut tokens = list(&[Sym::A, Sym::B]);
        assert!(!tokens.accept(Sym::B));
        assert_eq!(tokens.position(), 0);
        assert!(tokens.accept(Sym::A));
        assert!(tokens.accept(Sym::B));
        assert!(tokens.at_eof());
    }

    #[test]
    fn test_accept_eof_is_idempotent() {
        let mut tokens = list(&[]);
        assert!(tokens.accept(Sym::Eof));
        assert!(tokens.accept(Sym::Eof));
        assert!(tokens.at_eof());
        assert_eq!(tokens.position(), 0);
    }

    #[test]
    fn test_take_and_next_token() {
        let mut tokens = list(&[Sym::A, Sym::B]);
        assert!(tokens.take(Sym::B).is_none());
        assert_eq!(tokens.take(Sym::A).map(|t| t.text), Some("a".to_string()));
        assert_eq!(tokens.next_token().map(|t| t.symbol), Some(Sym::B));
        assert!(tokens.next_token().is_none());
        assert!(tokens.take(Sym::Eof).is_none());
    }

    #[test]
    fn test_skip_over_run() {
        let mut tokens = list(&[Sym::A, Sym::A, Sym::A, Sym::B]);
        assert_eq!(tokens.skip_over(Sym::A), 3);
        assert_eq!(tokens.current().symbol, Sym::B);
        assert_eq!(tokens.skip_over(Sym::A), 0);
    }

    #[test]
    fn test_skip_until_stops_before_symbol() {
        let mut tokens = list(&[Sym::A, Sym::A, Sym::B, Sym::A]);
        assert_eq!(tokens.skip_until(Sym::B), 2);
        assert_eq!(tokens.current().symbol, Sym::B);
    }

    #[test]
    fn test_skip_until_stops_at_eof() {
        let mut tokens = list(&[Sym::A, Sym::A]);
        assert_eq!(tokens.skip_until(Sym::B), 2);
        assert!(tokens.at_eof());
    }

    #[test]
    fn test_collect_until_reassembles() {
        let mut tokens = list(&[Sym::A, Sym::A, Sym::B]);
        let skipped = tokens.collect_until(Sym::B);
        assert_eq!(join_text(&skipped), "aa");
    }
}
