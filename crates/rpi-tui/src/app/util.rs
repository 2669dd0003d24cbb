use std::path::PathBuf;

/// Turn pasted text into a file path, the way terminals deliver a dropped
/// file: optionally quoted, `file://` prefixed, or with escaped spaces.
///
/// Returns `None` unless the text names an existing regular file.
pub(super) fn parse_dropped_path(text: &str) -> Option<PathBuf> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;

    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| line.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
        .unwrap_or(line);

    let path = match unquoted.strip_prefix("file://") {
        Some(rest) => percent_decode(rest),
        None => unquoted.replace("\\ ", " "),
    };

    let path = PathBuf::from(path);
    path.is_file().then_some(path)
}

/// Decode `%XX` escapes. Malformed escapes are kept as-is.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let Some(b) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
        {
            out.push(b);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
