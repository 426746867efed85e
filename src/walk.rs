use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{format_source, Error, Options, Outcome};

/// Formats `path` and rewrites it when the text changed.
///
/// Nothing is written when the file fails to format or opts out with
/// `; nice65: ignore`.
pub fn fix_in_place(path: &Path, options: Options) -> Result<(), Error> {
    let source = fs::read_to_string(path)?;
    match format_source(&source, options)? {
        Outcome::Formatted(text) if text == source => {
            tracing::trace!("{} already formatted", path.display());
        }
        Outcome::Formatted(text) => fs::write(path, text)?,
        Outcome::Ignored => tracing::info!("ignoring {}", path.display()),
    }
    Ok(())
}

/// Fixes every file below `root` matching `pattern` in place.
///
/// A failing file is reported and left as it was; the rest of the batch still
/// runs. Returns the failures in traversal order.
pub fn fix_all(
    root: &Path,
    pattern: &str,
    options: Options,
) -> io::Result<Vec<(PathBuf, Error)>> {
    let files = collect(root, pattern)?;
    tracing::debug!("{} files match `{pattern}`", files.len());
    let mut failed = Vec::new();
    for path in files {
        tracing::info!("fixing {}", path.display());
        if let Err(e) = fix_in_place(&path, options) {
            tracing::error!("{}: {e}", path.display());
            failed.push((path, e));
        }
    }
    Ok(failed)
}

/// Collects every file below `root` whose file name matches `pattern`,
/// in sorted order.
pub fn collect(root: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    collect_into(root, pattern, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_into(dir: &Path, pattern: &str, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, pattern, out)?;
            continue;
        }
        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| wildcard_match(pattern, name));
        if matched {
            out.push(path);
        }
    }
    Ok(())
}

/// Shell-style matching: `*`, `?`, `[abc]`, `[a-z]` and `[!abc]`.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    matches_at(&pattern, &name)
}

fn matches_at(pattern: &[char], name: &[char]) -> bool {
    match pattern.first().copied() {
        None => name.is_empty(),
        Some('*') => (0..=name.len()).any(|skip| matches_at(&pattern[1..], &name[skip..])),
        Some('?') => !name.is_empty() && matches_at(&pattern[1..], &name[1..]),
        Some('[') => {
            let Some(close) = pattern.iter().skip(2).position(|&c| c == ']') else {
                // unterminated class matches literally
                return name.first() == Some(&'[') && matches_at(&pattern[1..], &name[1..]);
            };
            let class = &pattern[1..close + 2];
            let Some(&c) = name.first() else {
                return false;
            };
            class_match(class, c) && matches_at(&pattern[close + 3..], &name[1..])
        }
        Some(p) => name.first() == Some(&p) && matches_at(&pattern[1..], &name[1..]),
    }
}

fn class_match(class: &[char], c: char) -> bool {
    let (negate, class) = match class.first().copied() {
        Some('!') => (true, &class[1..]),
        _ => (false, class),
    };
    let mut found = false;
    let mut i = 0;
    while i < class.len() {
        if i + 2 < class.len() && class[i + 1] == '-' {
            found |= (class[i]..=class[i + 2]).contains(&c);
            i += 3;
        } else {
            found |= class[i] == c;
            i += 1;
        }
    }
    found != negate
}
