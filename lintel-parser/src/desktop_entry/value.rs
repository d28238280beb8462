//! Typed desktop-entry values.

use std::collections::BTreeMap;
use std::fmt;

/// The type a key's value is interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Strings,
    LocaleString,
    Boolean,
    Numeric,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Strings => "string list",
            ValueKind::LocaleString => "locale string",
            ValueKind::Boolean => "boolean",
            ValueKind::Numeric => "numeric",
        }
    }

    /// The type of a well-known key. Unknown and extension keys are plain strings.
    pub fn for_key(key: &str) -> ValueKind {
        match key {
            "Name" | "GenericName" | "Comment" | "Icon" | "Keywords" => ValueKind::LocaleString,
            "NoDisplay" | "Hidden" | "DBusActivatable" | "Terminal" | "StartupNotify"
            | "PrefersNonDefaultGPU" | "SingleMainWindow" => ValueKind::Boolean,
            "OnlyShowIn" | "NotShowIn" | "Actions" | "MimeType" | "Categories" | "Implements" => {
                ValueKind::Strings
            }
            _ => ValueKind::String,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed value. Locale strings hold every localized variant of one key,
/// the unlocalized one under the empty locale.
#[derive(Debug, Clone, PartialEq)]
pub enum DesktopValue {
    String(String),
    Strings(Vec<String>),
    LocaleString(BTreeMap<String, String>),
    Boolean(bool),
    Numeric(f32),
}

impl DesktopValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DesktopValue::String(_) => ValueKind::String,
            DesktopValue::Strings(_) => ValueKind::Strings,
            DesktopValue::LocaleString(_) => ValueKind::LocaleString,
            DesktopValue::Boolean(_) => ValueKind::Boolean,
            DesktopValue::Numeric(_) => ValueKind::Numeric,
        }
    }

    /// Convert raw text into a value of `kind`. `None` if the text is not
    /// valid for that type.
    pub fn parse(kind: ValueKind, raw: &str) -> Option<DesktopValue> {
        match kind {
            ValueKind::String => Some(DesktopValue::String(unescape(raw))),
            ValueKind::Strings => Some(DesktopValue::Strings(split_list(raw))),
            ValueKind::LocaleString => {
                let mut map = BTreeMap::new();
                map.insert(String::new(), unescape(raw));
                Some(DesktopValue::LocaleString(map))
            }
            ValueKind::Boolean => match raw {
                "true" | "1" => Some(DesktopValue::Boolean(true)),
                "false" | "0" => Some(DesktopValue::Boolean(false)),
                _ => None,
            },
            ValueKind::Numeric => raw.trim().parse().ok().map(DesktopValue::Numeric),
        }
    }
}

/// Expand `\s`, `\n`, `\t`, `\r` and `\\`. Unknown escapes are kept verbatim.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a `;`-separated list. `\;` is a literal semicolon and a trailing
/// separator does not produce an empty element.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => items.push(unescape(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        items.push(unescape(&current));
    }
    items
}

/// Candidate locale keys for `locale`, most specific first, ending with the
/// unlocalized entry. Follows the `lang_COUNTRY.ENCODING@MODIFIER` matching
/// order of the desktop entry format; the encoding part is ignored.
pub fn locale_candidates(locale: &str) -> Vec<String> {
    let (rest, modifier) = match locale.split_once('@') {
        Some((rest, modifier)) => (rest, Some(modifier)),
        None => (locale, None),
    };
    let rest = rest.split('.').next().unwrap_or(rest);
    let (lang, country) = match rest.split_once('_') {
        Some((lang, country)) => (lang, Some(country)),
        None => (rest, None),
    };

    let mut candidates = Vec::new();
    if let (Some(country), Some(modifier)) = (country, modifier) {
        candidates.push(format!("{}_{}@{}", lang, country, modifier));
    }
    if let Some(country) = country {
        candidates.push(format!("{}_{}", lang, country));
    }
    if let Some(modifier) = modifier {
        candidates.push(format!("{}@{}", lang, modifier));
    }
    if !lang.is_empty() {
        candidates.push(lang.to_string());
    }
    candidates.push(String::new());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\sb\\c\td"), "a b\\c\td");
        assert_eq!(unescape(r"keep\x"), r"keep\x");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_split_list_with_escaped_separator() {
        assert_eq!(split_list(r"a;b\;c;d;"), vec!["a", "b;c", "d"]);
        assert_eq!(split_list(""), Vec::<String>::new());
        assert_eq!(split_list("single"), vec!["single"]);
    }

    #[test]
    fn test_boolean_values() {
        assert_eq!(
            DesktopValue::parse(ValueKind::Boolean, "true"),
            Some(DesktopValue::Boolean(true))
        );
        assert_eq!(DesktopValue::parse(ValueKind::Boolean, "yes"), None);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(
            DesktopValue::parse(ValueKind::Numeric, "1.5"),
            Some(DesktopValue::Numeric(1.5))
        );
        assert_eq!(DesktopValue::parse(ValueKind::Numeric, "x"), None);
    }

    #[test]
    fn test_key_kinds() {
        assert_eq!(ValueKind::for_key("Name"), ValueKind::LocaleString);
        assert_eq!(ValueKind::for_key("Terminal"), ValueKind::Boolean);
        assert_eq!(ValueKind::for_key("Categories"), ValueKind::Strings);
        assert_eq!(ValueKind::for_key("X-Custom"), ValueKind::String);
    }

    #[test]
    fn test_locale_candidates() {
        assert_eq!(
            locale_candidates("sr_YU.UTF-8@Latn"),
            vec!["sr_YU@Latn", "sr_YU", "sr@Latn", "sr", ""]
        );
        assert_eq!(locale_candidates("de"), vec!["de", ""]);
    }
}
