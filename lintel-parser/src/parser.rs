//! Parser - drives a grammar entry point over a lexed buffer.

use crate::lexer::{Lexer, Symbol};
use crate::token_list::TokenList;
use crate::ParseError;

/// A grammar production: returns whether it matched, advancing the cursor
/// as a side effect. Output is accumulated into `T`.
pub type ParseCallback<S, T> = fn(&mut TokenList<S>, &mut T) -> bool;

/// Lexer plus the rule that a parse must consume its whole input.
#[derive(Debug, Clone)]
pub struct Parser<S> {
    lexer: Lexer<S>,
}

impl<S: Symbol> Parser<S> {
    pub fn new(lexer: Lexer<S>) -> Self {
        Self { lexer }
    }

    pub fn lexer(&self) -> &Lexer<S> {
        &self.lexer
    }

    /// Lex `buffer` and run `entry` over the tokens.
    ///
    /// Succeeds only if the entry production matched *and* the cursor ended
    /// on end of file. A grammar that matches a prefix is still a failure.
    pub fn parse<F>(&self, buffer: &str, entry: F) -> Result<(), ParseError>
    where
        F: FnOnce(&mut TokenList<S>) -> bool,
    {
        let tokens = self.lexer.process_contents(buffer)?;
        let mut tokens = TokenList::new(tokens);

        if !entry(&mut tokens) {
            return Err(ParseError::Rejected {
                offset: tokens.current().begin,
            });
        }

        if !tokens.at_eof() {
            let current = tokens.current();
            return Err(ParseError::TrailingInput {
                offset: current.begin,
                found: format!("{:?} {:?}", current.symbol, current.text),
            });
        }

        Ok(())
    }

    /// `parse` with a plain function entry point and an output accumulator.
    pub fn parse_with<T>(
        &self,
        buffer: &str,
        entry: ParseCallback<S, T>,
        output: &mut T,
    ) -> Result<(), ParseError> {
        self.parse(buffer, |tokens| entry(tokens, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Matcher;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Sym {
        Word,
        Comma,
        Eof,
    }

    impl Symbol for Sym {
        const EOF: Self = Sym::Eof;
    }

    fn parser() -> Parser<Sym> {
        Parser::new(
            Lexer::new()
                .rule(Matcher::pattern("[a-z]+").unwrap(), Sym::Word)
                .rule(Matcher::char(','), Sym::Comma),
        )
    }

    fn word_list(tokens: &mut TokenList<Sym>, out: &mut Vec<String>) -> bool {
        let Some(first) = tokens.take(Sym::Word) else {
            return false;
        };
        out.push(first.text);
        while tokens.accept(Sym::Comma) {
            match tokens.take(Sym::Word) {
                Some(word) => out.push(word.text),
                None => return false,
            }
        }
        true
    }

    #[test]
    fn test_full_consumption_succeeds() {
        let mut words = Vec::new();
        parser().parse_with("a,bc,d", word_list, &mut words).unwrap();
        assert_eq!(words, vec!["a", "bc", "d"]);
    }

    #[test]
    fn test_prefix_match_is_failure() {
        // The callback accepts "a" and returns true, leaving ",," behind.
        let err = parser()
            .parse("a,,", |tokens| tokens.accept(Sym::Word))
            .unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { offset: 1, .. }));
    }

    #[test]
    fn test_rejected_entry() {
        let mut words = Vec::new();
        let err = parser().parse_with(",a", word_list, &mut words).unwrap_err();
        assert!(matches!(err, ParseError::Rejected { offset: 0 }));
    }

    #[test]
    fn test_lex_failure_never_runs_grammar() {
        let mut ran = false;
        let result = parser().parse("a;b", |_| {
            ran = true;
            true
        });
        assert!(result.is_err());
        assert!(!ran);
    }

    #[test]
    fn test_empty_input_with_trivial_grammar() {
        assert!(parser().parse("", |_| true).is_ok());
    }
}
