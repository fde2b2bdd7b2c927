//! Report assembly: total ordering and line serialization.

use std::io::{self, Write};

use ogmap_core::OutputRow;

/// Sort by `(sort_key, payload)`. Equal keys (same coordinate, different
/// owners) fall back to the payload text so the order never depends on input
/// order.
pub fn sort_rows(rows: &mut [OutputRow]) {
    rows.sort_unstable_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.payload.cmp(&b.payload)));
}

/// One payload per line, each newline-terminated. No header.
pub fn write_rows<W: Write>(rows: &[OutputRow], sink: &mut W) -> io::Result<()> {
    for row in rows {
        sink.write_all(row.payload.as_bytes())?;
        sink.write_all(b"\n")?;
    }
    sink.flush()
}

/// Render the rows into one string, as [`write_rows`] would write them.
pub fn render(rows: &[OutputRow]) -> String {
    let mut out = String::with_capacity(rows.iter().map(|r| r.payload.len() + 1).sum());
    for row in rows {
        out.push_str(&row.payload);
        out.push('\n');
    }
    out
}
