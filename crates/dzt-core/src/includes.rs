// `#include "..."` expansion. Only double-quoted, line-anchored directives
// count; `<...>` includes and preprocessor conditionals are ignored.
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*#include[ \t]+"([^"\r\n]+)""#).unwrap());

/// One visited file and the text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub text: String,
}

/// Traversal state, owned by a single `collect_config_sources` call.
#[derive(Debug, Default)]
struct Walk {
    seen: HashSet<PathBuf>,
    ordered: Vec<ConfigSource>,
}

impl Walk {
    fn visit(&mut self, path: PathBuf) {
        if self.seen.contains(&path) {
            tracing::trace!(path = %path.display(), "include already visited");
            return;
        }
        let text = match read_text(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "skipping missing include");
                return;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable include");
                return;
            }
        };
        tracing::debug!(path = %path.display(), "visiting config file");
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let includes: Vec<PathBuf> = include_directives(&text)
            .into_iter()
            .map(|rel| normalize(&base.join(rel)))
            .collect();
        self.seen.insert(path.clone());
        self.ordered.push(ConfigSource { path, text });

        for inc in includes {
            self.visit(inc);
        }
    }
}

/// `entry` and every file it transitively includes, in pre-order discovery
/// order, each exactly once, with the text each was read as. Missing
/// includes are dropped.
pub fn collect_config_sources(entry: &Path) -> Vec<ConfigSource> {
    let mut walk = Walk::default();
    walk.visit(normalize(&absolute(entry)));
    walk.ordered
}

/// Paths only, same order as [`collect_config_sources`].
pub fn collect_config_files(entry: &Path) -> Vec<PathBuf> {
    collect_config_sources(entry).into_iter().map(|s| s.path).collect()
}

/// Reads a source file, replacing invalid UTF-8 (configs are often cp1252).
pub fn read_text(path: &Path) -> std::io::Result<String> {
    fs::read(path).map(|b| String::from_utf8_lossy(&b).into_owned())
}

/// Include directives of one file, in source order, unresolved.
pub fn include_directives(text: &str) -> Vec<&str> {
    INCLUDE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

fn absolute(p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(p))
            .unwrap_or_else(|_| p.to_path_buf())
    }
}

// Lexical `.`/`..` folding; config trees commonly use backslashes too.
fn normalize(p: &Path) -> PathBuf {
    let unified = p.to_string_lossy().replace('\\', "/");
    let mut out = PathBuf::new();
    for comp in Path::new(&unified).components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            c => out.push(c.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_are_line_anchored_and_quoted() {
        let text = concat!(
            "#include \"a.hpp\"\n",
            "  #include \"sub/b.hpp\"\n",
            "#include <c.hpp>\n",
            "// x #include \"d.hpp\"\n",
        );
        assert_eq!(include_directives(text), vec!["a.hpp", "sub/b.hpp"]);
    }

    #[test]
    fn sources_carry_scanned_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.cpp"), "#include \"a.hpp\"\nclass A {};\n").unwrap();
        fs::write(dir.path().join("a.hpp"), "class B {};\n").unwrap();
        let sources = collect_config_sources(&dir.path().join("config.cpp"));
        assert_eq!(sources.len(), 2);
        assert!(sources[0].path.ends_with("config.cpp"));
        assert_eq!(sources[0].text, "#include \"a.hpp\"\nclass A {};\n");
        assert!(sources[1].path.ends_with("a.hpp"));
        assert_eq!(sources[1].text, "class B {};\n");
        let files = collect_config_files(&dir.path().join("config.cpp"));
        assert_eq!(files, sources.iter().map(|s| s.path.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn normalize_folds_dots() {
        let p = normalize(Path::new("/mods/a/./b/../c.hpp"));
        assert_eq!(p, PathBuf::from("/mods/a/c.hpp"));
        let p = normalize(Path::new("/mods/a\\sub\\x.hpp"));
        assert_eq!(p, PathBuf::from("/mods/a/sub/x.hpp"));
    }
}
