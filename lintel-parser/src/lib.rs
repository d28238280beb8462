//! Lintel parser - lexer and recursive-descent parser framework.
//!
//! This crate contains:
//! - `Lexer`: ordered `(matcher, symbol)` rules, first match wins, anchored at the cursor
//! - `TokenList`: forward-only cursor with peek/accept/skip operations
//! - `Parser`: runs a grammar entry point and requires the input to be fully consumed
//! - Grammars built on top: the config file and freedesktop desktop entries

pub mod config;
pub mod desktop_entry;
pub mod lexer;
pub mod parser;
pub mod token_list;

mod error;

pub use config::{ConfigEntry, ConfigParser, ConfigSymbol};
pub use desktop_entry::{DesktopEntry, DesktopEntryParser, DesktopGroup, DesktopValue, ValueKind};
pub use error::{DesktopEntryError, ParseError};
pub use lexer::{join_text, Lexer, Matcher, Symbol, Token};
pub use parser::{ParseCallback, Parser};
pub use token_list::TokenList;
