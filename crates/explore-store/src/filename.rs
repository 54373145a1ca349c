//! Filesystem-safe item stems

/// Characters that are escaped in every stem
const RESERVED: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>', '.'];

/// Longest stem we produce, leaving room for an extension under NAME_MAX
const MAX_STEM_BYTES: usize = 200;

/// Stem shared by both files of one item
pub fn item_stem(id: &str, title: &str) -> String {
    escape_filename(&format!("{}-{}", id, title))
}

/// Percent-escape reserved and control characters
///
/// `.` is escaped as well so the stem never contains an extension separator
/// and `Path::file_stem` always recovers it exactly. Output is capped at
/// `MAX_STEM_BYTES` on a char boundary.
pub fn escape_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_control() || RESERVED.contains(&c) {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", b));
            }
        } else {
            out.push(c);
        }
    }

    if out.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !out.is_char_boundary(end) {
            end -= 1;
        }
        out.truncate(end);
    }
    out
}
