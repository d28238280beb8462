//! Desktop entry files (`*.desktop`).
//!
//! Grammar: blank and `#` comment lines, then `[Group Name]` headers each
//! followed by `Key=Value` or `Key[locale]=Value` entries. Values are typed
//! per key as they are parsed. Structural rules (first group must be the
//! primary `Desktop Entry` group, action groups must be listed in `Actions`)
//! are applied afterwards by [`DesktopEntry::validate`].

mod value;

pub use value::{locale_candidates, split_list, unescape, DesktopValue, ValueKind};

use std::collections::HashMap;
use std::path::Path;

use crate::lexer::{join_text, Lexer, Matcher, Symbol};
use crate::parser::Parser;
use crate::token_list::TokenList;
use crate::{DesktopEntryError, ParseError};

pub const PRIMARY_GROUP: &str = "Desktop Entry";
pub const ACTION_GROUP_PREFIX: &str = "Desktop Action ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesktopSymbol {
    Newline,
    Whitespace,
    Pound,
    LeftBracket,
    RightBracket,
    Equals,
    Identifier,
    Eof,
}

impl Symbol for DesktopSymbol {
    const EOF: Self = DesktopSymbol::Eof;
}

/// The lexer used for desktop entries.
pub fn desktop_lexer() -> Result<Lexer<DesktopSymbol>, ParseError> {
    Ok(Lexer::new()
        .rule(Matcher::char('\n'), DesktopSymbol::Newline)
        .rule(Matcher::pattern(r"[^\S\n]+")?, DesktopSymbol::Whitespace)
        .rule(Matcher::char('#'), DesktopSymbol::Pound)
        .rule(Matcher::char('['), DesktopSymbol::LeftBracket)
        .rule(Matcher::char(']'), DesktopSymbol::RightBracket)
        .rule(Matcher::char('='), DesktopSymbol::Equals)
        .rule(Matcher::pattern(r"[^\s\[\]=#]+")?, DesktopSymbol::Identifier))
}

/// One `[Group]` and its entries, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesktopGroup {
    pub name: String,
    entries: Vec<(String, DesktopValue)>,
}

impl DesktopGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &DesktopValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&DesktopValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace `key`. Later assignments of the same key win.
    pub fn set(&mut self, key: impl Into<String>, value: DesktopValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn set_localized(&mut self, key: &str, locale: &str, text: String) {
        if let Some((_, DesktopValue::LocaleString(map))) =
            self.entries.iter_mut().find(|(k, _)| k == key)
        {
            map.insert(locale.to_string(), text);
            return;
        }
        let mut map = std::collections::BTreeMap::new();
        map.insert(locale.to_string(), text);
        self.set(key, DesktopValue::LocaleString(map));
    }

    fn typed(&self, key: &str, expected: ValueKind) -> Result<&DesktopValue, DesktopEntryError> {
        let value = self
            .get(key)
            .ok_or_else(|| DesktopEntryError::MissingKey(key.to_string()))?;
        if value.kind() != expected {
            return Err(DesktopEntryError::WrongType {
                key: key.to_string(),
                expected: expected.name(),
                found: value.kind().name(),
            });
        }
        Ok(value)
    }

    pub fn get_string(&self, key: &str) -> Result<&str, DesktopEntryError> {
        match self.typed(key, ValueKind::String)? {
            DesktopValue::String(s) => Ok(s),
            _ => unreachable!("kind checked by typed()"),
        }
    }

    pub fn get_strings(&self, key: &str) -> Result<&[String], DesktopEntryError> {
        match self.typed(key, ValueKind::Strings)? {
            DesktopValue::Strings(list) => Ok(list),
            _ => unreachable!("kind checked by typed()"),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, DesktopEntryError> {
        match self.typed(key, ValueKind::Boolean)? {
            DesktopValue::Boolean(b) => Ok(*b),
            _ => unreachable!("kind checked by typed()"),
        }
    }

    pub fn get_numeric(&self, key: &str) -> Result<f32, DesktopEntryError> {
        match self.typed(key, ValueKind::Numeric)? {
            DesktopValue::Numeric(n) => Ok(*n),
            _ => unreachable!("kind checked by typed()"),
        }
    }

    /// Best match for `locale` (e.g. `de_DE.UTF-8`), falling back to the
    /// unlocalized value. `None` as locale asks for the unlocalized value.
    pub fn get_locale_string(
        &self,
        key: &str,
        locale: Option<&str>,
    ) -> Result<&str, DesktopEntryError> {
        let DesktopValue::LocaleString(map) = self.typed(key, ValueKind::LocaleString)? else {
            unreachable!("kind checked by typed()");
        };
        let candidates = locale.map(locale_candidates).unwrap_or_else(|| vec![String::new()]);
        candidates
            .iter()
            .find_map(|candidate| map.get(candidate))
            .map(String::as_str)
            .ok_or_else(|| DesktopEntryError::MissingKey(key.to_string()))
    }
}

/// A parsed desktop entry document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DesktopEntry {
    pub groups: Vec<DesktopGroup>,
}

impl DesktopEntry {
    pub fn group(&self, name: &str) -> Option<&DesktopGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn primary(&self) -> Result<&DesktopGroup, DesktopEntryError> {
        self.group(PRIMARY_GROUP)
            .ok_or_else(|| DesktopEntryError::MissingGroup(PRIMARY_GROUP.to_string()))
    }

    /// Apply the structural rules of the format.
    ///
    /// The first group must be `Desktop Entry`, otherwise every group is
    /// dropped and validation fails. Group names must be unique. Action
    /// groups survive only if listed in the primary group's `Actions`;
    /// `X-` extension groups are kept and anything else is dropped.
    pub fn validate(&mut self) -> bool {
        let primary_first = self
            .groups
            .first()
            .is_some_and(|g| g.name == PRIMARY_GROUP);
        let unique = {
            let mut seen = std::collections::HashSet::new();
            self.groups.iter().all(|g| seen.insert(g.name.as_str()))
        };
        if !primary_first || !unique {
            self.groups.clear();
            return false;
        }

        let actions: Vec<String> = self.groups[0]
            .get_strings("Actions")
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let mut index = 0;
        self.groups.retain(|group| {
            let keep = index == 0
                || group.name.starts_with("X-")
                || group
                    .name
                    .strip_prefix(ACTION_GROUP_PREFIX)
                    .is_some_and(|action| actions.iter().any(|a| a == action));
            index += 1;
            keep
        });
        true
    }
}

/// Grammar state while walking the tokens.
struct EntryBuilder<'a> {
    entry: DesktopEntry,
    overrides: &'a HashMap<String, ValueKind>,
}

impl EntryBuilder<'_> {
    fn kind_of(&self, key: &str) -> ValueKind {
        self.overrides
            .get(key)
            .copied()
            .unwrap_or_else(|| ValueKind::for_key(key))
    }
}

/// Parser for desktop entry files.
#[derive(Debug, Clone)]
pub struct DesktopEntryParser {
    parser: Parser<DesktopSymbol>,
    key_types: HashMap<String, ValueKind>,
}

impl DesktopEntryParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            parser: Parser::new(desktop_lexer()?),
            key_types: HashMap::new(),
        })
    }

    /// Declare the type of a key the built-in table does not know about.
    pub fn with_key_type(mut self, key: impl Into<String>, kind: ValueKind) -> Self {
        self.key_types.insert(key.into(), kind);
        self
    }

    /// Parse a document. Validation is a separate step.
    pub fn parse(&self, buffer: &str) -> Result<DesktopEntry, ParseError> {
        let mut builder = EntryBuilder {
            entry: DesktopEntry::default(),
            overrides: &self.key_types,
        };
        self.parser.parse(buffer, |tokens| document(tokens, &mut builder))?;
        Ok(builder.entry)
    }

    /// Read, parse and validate a file.
    pub fn load(&self, path: &Path) -> Result<Option<DesktopEntry>, ParseError> {
        let contents = std::fs::read_to_string(path)?;
        let mut entry = self.parse(&contents)?;
        if !entry.validate() {
            tracing::debug!("{} is not a valid desktop entry", path.display());
            return Ok(None);
        }
        Ok(Some(entry))
    }
}

fn document(tokens: &mut TokenList<DesktopSymbol>, out: &mut EntryBuilder<'_>) -> bool {
    while !tokens.at_eof() && tokens.current().symbol != DesktopSymbol::LeftBracket {
        if !blank_or_comment(tokens) {
            return false;
        }
    }
    while !tokens.at_eof() {
        if !group(tokens, out) {
            return false;
        }
    }
    true
}

fn line_end(tokens: &mut TokenList<DesktopSymbol>) -> bool {
    tokens.skip_over(DesktopSymbol::Whitespace);
    tokens.accept(DesktopSymbol::Newline) || tokens.at_eof()
}

fn blank_or_comment(tokens: &mut TokenList<DesktopSymbol>) -> bool {
    tokens.skip_over(DesktopSymbol::Whitespace);
    if tokens.accept(DesktopSymbol::Pound) {
        tokens.skip_until(DesktopSymbol::Newline);
    }
    line_end(tokens)
}

fn group(tokens: &mut TokenList<DesktopSymbol>, out: &mut EntryBuilder<'_>) -> bool {
    if !tokens.accept(DesktopSymbol::LeftBracket) {
        return false;
    }
    let mut name = String::new();
    loop {
        match tokens.current().symbol {
            DesktopSymbol::Identifier | DesktopSymbol::Whitespace => {
                if let Some(token) = tokens.next_token() {
                    name.push_str(&token.text);
                }
            }
            _ => break,
        }
    }
    if name.is_empty() || !tokens.accept(DesktopSymbol::RightBracket) || !line_end(tokens) {
        return false;
    }

    out.entry.groups.push(DesktopGroup::new(name));
    while !tokens.at_eof() && !starts_group(tokens) {
        let ok = if is_entry_start(tokens) {
            entry(tokens, out)
        } else {
            blank_or_comment(tokens)
        };
        if !ok {
            return false;
        }
    }
    true
}

fn starts_group(tokens: &TokenList<DesktopSymbol>) -> bool {
    tokens.current().symbol == DesktopSymbol::LeftBracket
}

fn is_entry_start(tokens: &TokenList<DesktopSymbol>) -> bool {
    let rest = tokens.remaining();
    let first = rest
        .iter()
        .find(|t| t.symbol != DesktopSymbol::Whitespace)
        .map(|t| t.symbol);
    first == Some(DesktopSymbol::Identifier)
}

fn entry(tokens: &mut TokenList<DesktopSymbol>, out: &mut EntryBuilder<'_>) -> bool {
    tokens.skip_over(DesktopSymbol::Whitespace);
    let Some(key) = tokens.take(DesktopSymbol::Identifier) else {
        return false;
    };

    let locale = if tokens.accept(DesktopSymbol::LeftBracket) {
        let Some(locale) = tokens.take(DesktopSymbol::Identifier) else {
            return false;
        };
        if !tokens.accept(DesktopSymbol::RightBracket) {
            return false;
        }
        Some(locale.text)
    } else {
        None
    };

    tokens.skip_over(DesktopSymbol::Whitespace);
    if !tokens.accept(DesktopSymbol::Equals) {
        return false;
    }
    tokens.skip_over(DesktopSymbol::Whitespace);
    let raw = join_text(&tokens.collect_until(DesktopSymbol::Newline));
    let raw = raw.trim_end();

    let kind = out.kind_of(&key.text);
    let Some(group) = out.entry.groups.last_mut() else {
        return false;
    };
    match (kind, locale) {
        (ValueKind::LocaleString, Some(locale)) => {
            group.set_localized(&key.text, &locale, unescape(raw));
        }
        (ValueKind::LocaleString, None) => {
            group.set_localized(&key.text, "", unescape(raw));
        }
        (_, Some(_)) => return false,
        (kind, None) => match DesktopValue::parse(kind, raw) {
            Some(value) => group.set(key.text, value),
            None => return false,
        },
    }

    line_end(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DesktopEntry {
        DesktopEntryParser::new().unwrap().parse(text).unwrap()
    }

    #[test]
    fn test_lexer_symbol_sequence() {
        use DesktopSymbol::*;
        let tokens = desktop_lexer()
            .unwrap()
            .process_contents("# random comment\n[section header]\nkey=value\n")
            .unwrap();
        let symbols: Vec<DesktopSymbol> = tokens.iter().map(|t| t.symbol).collect();
        assert_eq!(
            symbols,
            vec![
                Pound, Whitespace, Identifier, Whitespace, Identifier, Newline, LeftBracket,
                Identifier, Whitespace, Identifier, RightBracket, Newline, Identifier, Equals,
                Identifier, Newline, Eof,
            ]
        );
    }

    #[test]
    fn test_typed_entries() {
        let entry = parse(
            "[Desktop Entry]\nType=Application\nName=Files\nName[de]=Dateien\nTerminal=false\nCategories=System;Utility;\n",
        );
        let group = entry.primary().unwrap();
        assert_eq!(group.get_string("Type").unwrap(), "Application");
        assert_eq!(group.get_locale_string("Name", None).unwrap(), "Files");
        assert_eq!(
            group.get_locale_string("Name", Some("de_DE.UTF-8")).unwrap(),
            "Dateien"
        );
        assert_eq!(group.get_locale_string("Name", Some("fr")).unwrap(), "Files");
        assert!(!group.get_bool("Terminal").unwrap());
        assert_eq!(group.get_strings("Categories").unwrap(), ["System", "Utility"]);
    }

    #[test]
    fn test_wrong_type_access_is_reported() {
        let entry = parse("[Desktop Entry]\nTerminal=true\n");
        let err = entry.primary().unwrap().get_string("Terminal").unwrap_err();
        assert_eq!(
            err,
            DesktopEntryError::WrongType {
                key: "Terminal".into(),
                expected: "string",
                found: "boolean",
            }
        );
        assert_eq!(
            entry.primary().unwrap().get_string("Exec").unwrap_err(),
            DesktopEntryError::MissingKey("Exec".into())
        );
    }

    #[test]
    fn test_spaces_around_equals_and_comments() {
        let entry = parse("# lead\n\n[Desktop Entry]\n# inner\nExec = foo --bar=baz %U\n");
        assert_eq!(
            entry.primary().unwrap().get_string("Exec").unwrap(),
            "foo --bar=baz %U"
        );
    }

    #[test]
    fn test_entry_before_group_fails() {
        let parser = DesktopEntryParser::new().unwrap();
        assert!(parser.parse("Name=x\n[Desktop Entry]\n").is_err());
    }

    #[test]
    fn test_bad_boolean_fails() {
        let parser = DesktopEntryParser::new().unwrap();
        assert!(parser.parse("[Desktop Entry]\nHidden=maybe\n").is_err());
    }

    #[test]
    fn test_localized_non_locale_key_fails() {
        let parser = DesktopEntryParser::new().unwrap();
        assert!(parser.parse("[Desktop Entry]\nExec[de]=x\n").is_err());
    }

    #[test]
    fn test_numeric_override() {
        let parser = DesktopEntryParser::new()
            .unwrap()
            .with_key_type("X-Weight", ValueKind::Numeric);
        let entry = parser.parse("[Desktop Entry]\nX-Weight=2.5\n").unwrap();
        assert_eq!(entry.primary().unwrap().get_numeric("X-Weight").unwrap(), 2.5);
    }

    #[test]
    fn test_validate_requires_primary_first() {
        let mut entry = parse("[Other]\nA=1\n[Desktop Entry]\nName=x\n");
        assert!(!entry.validate());
        assert!(entry.groups.is_empty());
    }

    #[test]
    fn test_validate_filters_unlisted_actions() {
        let mut entry = parse(
            "[Desktop Entry]\nName=x\nActions=new;\n[Desktop Action new]\nName=New\n[Desktop Action old]\nName=Old\n[X-Vendor]\nA=b\n[Stray]\nB=c\n",
        );
        assert!(entry.validate());
        let names: Vec<&str> = entry.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Desktop Entry", "Desktop Action new", "X-Vendor"]);
    }

    #[test]
    fn test_validate_rejects_duplicate_groups() {
        let mut entry = parse("[Desktop Entry]\nName=x\n[Desktop Entry]\nName=y\n");
        assert!(!entry.validate());
    }
}
