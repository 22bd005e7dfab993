// Tolerant scanner for `class CfgVehicles { ... }` sections of config.cpp-style
// sources. Never fails: anything it cannot make sense of is skipped.
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static CFG_VEHICLES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bclass\s+CfgVehicles\b").unwrap());
static SCOPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bscope\s*=\s*(\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigClass {
    pub name: String,
    pub base_class: Option<String>,
    pub scope: Option<i32>,
    /// Set by the loader; `None` for classes parsed from bare text.
    pub source_file: Option<PathBuf>,
}

impl ConfigClass {
    pub fn new(name: &str, base_class: Option<&str>, scope: Option<i32>) -> Self {
        Self {
            name: name.to_string(),
            base_class: base_class.map(str::to_string),
            scope,
            source_file: None,
        }
    }
}

#[derive(Debug)]
struct Scanner<'a> {
    src: &'a [u8],
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            src: text.as_bytes(),
        }
    }

    fn at(&self, i: usize) -> Option<u8> {
        self.src.get(i).copied()
    }

    // End of a comment or string literal starting at `i`, if one starts there.
    // Strings stop at a newline so a stray quote cannot swallow the file.
    fn trivia_end(&self, i: usize) -> Option<usize> {
        let len = self.src.len();
        match (self.at(i)?, self.at(i + 1)) {
            (b'/', Some(b'/')) => {
                let mut j = i + 2;
                while j < len && self.src[j] != b'\n' {
                    j += 1;
                }
                Some(j)
            }
            (b'/', Some(b'*')) => {
                let mut j = i + 2;
                while j + 1 < len && !(self.src[j] == b'*' && self.src[j + 1] == b'/') {
                    j += 1;
                }
                Some((j + 2).min(len))
            }
            (b'"', _) => {
                let mut j = i + 1;
                while j < len && self.src[j] != b'"' && self.src[j] != b'\n' {
                    j += 1;
                }
                Some((j + 1).min(len))
            }
            _ => None,
        }
    }

    fn skip_ws(&self, mut i: usize) -> usize {
        while let Some(b) = self.at(i) {
            if b.is_ascii_whitespace() {
                i += 1;
            } else if b == b'/' && let Some(end) = self.trivia_end(i) {
                i = end;
            } else {
                break;
            }
        }
        i
    }

    fn ident_end(&self, start: usize) -> Option<usize> {
        let mut i = start;
        while self.at(i).is_some_and(is_ident_byte) {
            i += 1;
        }
        (i > start).then_some(i)
    }

    fn word_at(&self, i: usize, word: &str) -> bool {
        let w = word.as_bytes();
        if !self.src[i..].starts_with(w) {
            return false;
        }
        let before = i.checked_sub(1).and_then(|p| self.at(p));
        let after = self.at(i + w.len());
        !before.is_some_and(is_ident_byte) && !after.is_some_and(is_ident_byte)
    }

    fn find_byte(&self, from: usize, needle: u8) -> Option<usize> {
        let mut i = from;
        while let Some(b) = self.at(i) {
            if let Some(end) = self.trivia_end(i) {
                i = end;
                continue;
            }
            if b == needle {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Walks code from `from` (itself outside any comment or string) up to
    /// `target`. `Err(end)` when `target` falls inside a comment or string
    /// ending at `end`.
    fn code_until(&self, from: usize, target: usize) -> Result<(), usize> {
        let mut i = from;
        while i < target {
            match self.trivia_end(i) {
                Some(end) if end > target => return Err(end),
                Some(end) => i = end,
                None => i += 1,
            }
        }
        Ok(())
    }

    /// Index of the `}` closing the `{` at `open`.
    fn matching_brace(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while let Some(b) = self.at(i) {
            if let Some(end) = self.trivia_end(i) {
                i = end;
                continue;
            }
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Bodies (without the outer braces) of every `class CfgVehicles { ... }`
/// block in `text`, in source order.
pub fn find_cfg_vehicles_blocks(text: &str) -> Vec<&str> {
    let sc = Scanner::new(text);
    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(m) = CFG_VEHICLES_RE.find_at(text, pos) {
        if let Err(end) = sc.code_until(pos, m.start()) {
            pos = end;
            continue;
        }
        let Some(open) = sc.find_byte(m.end(), b'{') else {
            break;
        };
        match sc.matching_brace(open) {
            Some(close) => {
                blocks.push(&text[open + 1..close]);
                pos = close + 1;
            }
            None => pos = m.end(),
        }
    }
    blocks
}

/// Every class declared with a body directly inside a `CfgVehicles` block.
/// Forward declarations (`class Foo;`) yield nothing.
pub fn parse_cfg_vehicles(text: &str) -> Vec<ConfigClass> {
    find_cfg_vehicles_blocks(text)
        .into_iter()
        .flat_map(parse_top_level_classes)
        .collect()
}

fn parse_top_level_classes(block: &str) -> Vec<ConfigClass> {
    let sc = Scanner::new(block);
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while let Some(b) = sc.at(i) {
        if let Some(end) = sc.trivia_end(i) {
            i = end;
            continue;
        }
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && sc.word_at(i, "class") => {
                if let Some((decl, next)) = parse_declaration(&sc, block, i + "class".len()) {
                    out.extend(decl);
                    i = next;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    out
}

// Parses `Name [: Base] (; | { body })` starting right after the keyword.
// Returns the record (None for forward declarations) and the resume index,
// or None when the fragment is malformed.
fn parse_declaration(
    sc: &Scanner<'_>,
    block: &str,
    after_kw: usize,
) -> Option<(Option<ConfigClass>, usize)> {
    let name_start = sc.skip_ws(after_kw);
    let name_end = sc.ident_end(name_start)?;
    let name = &block[name_start..name_end];

    let mut i = sc.skip_ws(name_end);
    let mut base = None;
    if sc.at(i) == Some(b':') {
        let base_start = sc.skip_ws(i + 1);
        if let Some(base_end) = sc.ident_end(base_start) {
            base = Some(&block[base_start..base_end]);
            i = base_end;
        } else {
            i = base_start;
        }
        i = sc.skip_ws(i);
    }

    match sc.at(i)? {
        b';' => Some((None, i + 1)),
        b'{' => {
            let Some(close) = sc.matching_brace(i) else {
                // Unterminated body: resume inside it.
                return Some((None, i + 1));
            };
            let scope = read_scope(&block[i + 1..close]);
            Some((Some(ConfigClass::new(name, base, scope)), close + 1))
        }
        _ => None,
    }
}

/// First `scope = <n>` anywhere in a class body, at any nesting depth.
pub fn read_scope(body: &str) -> Option<i32> {
    SCOPE_RE.captures(body).and_then(|c| c[1].parse().ok())
}
