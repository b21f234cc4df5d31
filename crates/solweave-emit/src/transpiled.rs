use solweave_core::Referenced;

/// Decides whether a referenced contract is a concrete implementation that has
/// an upgradeable ("transpiled") variant. Interfaces do not: a leading `I`
/// followed by an uppercase letter marks an interface name. An explicit
/// `transpiled` flag on the reference always wins, and a `draft-` file prefix
/// is ignored for the check.
pub fn infer_transpiled<R: Referenced>(reference: &R) -> bool {
    if let Some(transpiled) = reference.transpiled() {
        return transpiled;
    }

    let stem = match reference.path() {
        Some(path) => file_stem(path),
        None => reference.name(),
    };
    let stem = stem.strip_prefix("draft-").unwrap_or(stem);

    !looks_like_interface(stem)
}

fn file_stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => file,
    }
}

fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}
