//! Launcher icons from desktop entry files.

use std::path::{Path, PathBuf};

use lintel_area::widgets::LauncherIcon;
use lintel_parser::{DesktopEntryParser, ParseError};
use tracing::{debug, warn};

/// The message locale from the usual environment variables.
pub fn current_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty() && v != "C" && v != "POSIX")
}

/// Directories searched for themed icon names, most specific first.
pub fn icon_search_dirs(size: i32) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let sized = format!("{size}x{size}");
    let mut bases = Vec::new();
    if let Some(data) = dirs::data_dir() {
        bases.push(data.join("icons"));
    }
    bases.push(PathBuf::from("/usr/share/icons"));
    for base in bases {
        dirs.push(base.join("hicolor").join(&sized).join("apps"));
        dirs.push(base.join("hicolor").join("scalable").join("apps"));
    }
    dirs.push(PathBuf::from("/usr/share/pixmaps"));
    dirs
}

/// Resolve an `Icon` value: absolute paths are taken as-is, names are
/// looked up as `<name>.png` or `<name>.svg` in `search`.
pub fn resolve_icon(icon: &str, search: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(icon);
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    search.iter().find_map(|dir| {
        ["png", "svg", "xpm"]
            .iter()
            .map(|ext| dir.join(format!("{icon}.{ext}")))
            .find(|p| p.is_file())
    })
}

pub struct LauncherLoader {
    parser: DesktopEntryParser,
    locale: Option<String>,
    search: Vec<PathBuf>,
}

impl LauncherLoader {
    pub fn new(icon_size: i32) -> Result<Self, ParseError> {
        Ok(Self {
            parser: DesktopEntryParser::new()?,
            locale: current_locale(),
            search: icon_search_dirs(icon_size),
        })
    }

    pub fn with_locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.map(str::to_string);
        self
    }

    pub fn with_search_dirs(mut self, search: Vec<PathBuf>) -> Self {
        self.search = search;
        self
    }

    /// Build an icon for the entry at `path`. Entries that fail to parse
    /// or lack `Name` or `Exec` are skipped with a warning.
    pub fn load(&self, path: &Path) -> Option<LauncherIcon> {
        let entry = match self.parser.load(path) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                warn!("{} is not a usable desktop entry", path.display());
                return None;
            }
            Err(e) => {
                warn!("cannot load launcher item {}: {}", path.display(), e);
                return None;
            }
        };
        let group = entry.primary().ok()?;
        let locale = self.locale.as_deref();
        let name = match group.get_locale_string("Name", locale) {
            Ok(name) => name,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                return None;
            }
        };
        let exec = match group.get_string("Exec") {
            Ok(exec) => exec,
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                return None;
            }
        };

        let mut icon = LauncherIcon::new(name, exec);
        if let Ok(icon_name) = group.get_locale_string("Icon", locale) {
            icon.icon_path = resolve_icon(icon_name, &self.search);
            icon.icon_name = Some(icon_name.to_string());
        }
        debug!("launcher item {} loaded from {}", name, path.display());
        Some(icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX: &str = "\
[Desktop Entry]
Type=Application
Name=Web Browser
Name[de]=Webbrowser
Exec=firefox %u
Icon=firefox
";

    #[test]
    fn test_loads_localized_name_and_icon() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("firefox.desktop");
        std::fs::write(&entry, FIREFOX).unwrap();
        std::fs::write(dir.path().join("firefox.png"), b"png").unwrap();

        let loader = LauncherLoader::new(24)
            .unwrap()
            .with_locale(Some("de_DE.UTF-8"))
            .with_search_dirs(vec![dir.path().to_path_buf()]);
        let icon = loader.load(&entry).unwrap();

        assert_eq!(icon.name, "Webbrowser");
        assert_eq!(icon.command(), "firefox");
        assert_eq!(icon.icon_name.as_deref(), Some("firefox"));
        assert_eq!(icon.icon_path, Some(dir.path().join("firefox.png")));
    }

    #[test]
    fn test_entry_without_exec_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("broken.desktop");
        std::fs::write(&entry, "[Desktop Entry]\nName=Broken\n").unwrap();
        let loader = LauncherLoader::new(24).unwrap().with_locale(None);
        assert!(loader.load(&entry).is_none());
        assert!(loader.load(&dir.path().join("missing.desktop")).is_none());
    }

    #[test]
    fn test_absolute_icon_must_exist() {
        assert_eq!(resolve_icon("/definitely/not/here.png", &[]), None);
    }
}
