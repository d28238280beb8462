//! Config file grammar.
//!
//! The file is a sequence of lines, each one blank, a `# comment`, or a
//! `key = value` assignment. Values are reassembled verbatim from their
//! tokens; interpreting them is left to the per-key handlers of the caller.

use crate::lexer::{join_text, Lexer, Matcher, Symbol};
use crate::parser::Parser;
use crate::token_list::TokenList;
use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSymbol {
    Newline,
    Whitespace,
    Pound,
    Equals,
    Word,
    Eof,
}

impl Symbol for ConfigSymbol {
    const EOF: Self = ConfigSymbol::Eof;
}

/// One `key = value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    /// 1-based source line.
    pub line: usize,
}

#[derive(Debug, Default)]
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
    line: usize,
}

/// Parser for the line-oriented config format.
#[derive(Debug, Clone)]
pub struct ConfigParser {
    parser: Parser<ConfigSymbol>,
}

impl ConfigParser {
    pub fn new() -> Result<Self, ParseError> {
        // Whitespace excludes '\n' so an empty value never reaches into the next line.
        let lexer = Lexer::new()
            .rule(Matcher::char('\n'), ConfigSymbol::Newline)
            .rule(Matcher::pattern(r"[^\S\n]+")?, ConfigSymbol::Whitespace)
            .rule(Matcher::char('#'), ConfigSymbol::Pound)
            .rule(Matcher::char('='), ConfigSymbol::Equals)
            .rule(Matcher::pattern(r"[^\s#=]+")?, ConfigSymbol::Word);
        Ok(Self {
            parser: Parser::new(lexer),
        })
    }

    /// Parse a whole document. All or nothing.
    pub fn parse(&self, buffer: &str) -> Result<Vec<ConfigEntry>, ParseError> {
        let mut builder = ConfigBuilder {
            entries: Vec::new(),
            line: 1,
        };
        self.parser.parse_with(buffer, config_file, &mut builder)?;
        Ok(builder.entries)
    }

    /// Parse one line, reporting it as line `line` in the resulting entry.
    pub fn parse_line(&self, text: &str, line: usize) -> Result<Option<ConfigEntry>, ParseError> {
        let mut builder = ConfigBuilder {
            entries: Vec::new(),
            line,
        };
        self.parser.parse_with(text, config_line, &mut builder)?;
        Ok(builder.entries.pop())
    }
}

fn config_file(tokens: &mut TokenList<ConfigSymbol>, out: &mut ConfigBuilder) -> bool {
    while !tokens.at_eof() {
        if !config_line(tokens, out) {
            return false;
        }
    }
    true
}

fn config_line(tokens: &mut TokenList<ConfigSymbol>, out: &mut ConfigBuilder) -> bool {
    tokens.skip_over(ConfigSymbol::Whitespace);

    match tokens.current().symbol {
        ConfigSymbol::Newline | ConfigSymbol::Eof => {}
        ConfigSymbol::Pound => {
            tokens.skip_until(ConfigSymbol::Newline);
        }
        _ => {
            if !assignment(tokens, out) {
                return false;
            }
        }
    }

    line_end(tokens, out)
}

fn assignment(tokens: &mut TokenList<ConfigSymbol>, out: &mut ConfigBuilder) -> bool {
    let Some(key) = tokens.take(ConfigSymbol::Word) else {
        return false;
    };
    tokens.skip_over(ConfigSymbol::Whitespace);
    if !tokens.accept(ConfigSymbol::Equals) {
        return false;
    }
    tokens.skip_over(ConfigSymbol::Whitespace);

    let value = join_text(&tokens.collect_until(ConfigSymbol::Newline));
    out.entries.push(ConfigEntry {
        key: key.text,
        value: value.trim_end().to_string(),
        line: out.line,
    });
    true
}

fn line_end(tokens: &mut TokenList<ConfigSymbol>, out: &mut ConfigBuilder) -> bool {
    if tokens.accept(ConfigSymbol::Newline) {
        out.line += 1;
        return true;
    }
    tokens.at_eof()
}
