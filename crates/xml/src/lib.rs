//! ogmap XML extractor: turns the raw players, universe and highscore feeds
//! into normalized records. No business rules live here.
//!
//! Elements are matched by name at any depth. Elements missing their key
//! attribute are skipped without error; a document that is not well-formed
//! fails with [`Error::DocumentParse`] tagged with the document's role.

#![forbid(unsafe_code)]

use ogmap_core::{status, DocumentRole, Error, PlanetRecord, PlayerRecord};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

type Attrs = Vec<(String, String)>;

/// Parse the players feed (`<player id name status/>`).
pub fn parse_players(xml: &str) -> Result<Vec<PlayerRecord>, Error> {
    parse_player_elements(xml, DocumentRole::Players)
}

/// Parse the highscore feed (`<player id score/>`). Same record shape as the
/// players feed; only `id` and `score` are meaningful.
pub fn parse_highscore(xml: &str) -> Result<Vec<PlayerRecord>, Error> {
    parse_player_elements(xml, DocumentRole::Highscore)
}

/// Parse the universe feed (`<planet player coords/>`).
pub fn parse_planets(xml: &str) -> Result<Vec<PlanetRecord>, Error> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    scan(xml, DocumentRole::Planets, b"planet", |mut attrs| {
        match (take(&mut attrs, "player"), take(&mut attrs, "coords")) {
            (Some(player), Some(coords)) => out.push(PlanetRecord { player, coords }),
            _ => skipped += 1,
        }
    })?;
    debug!(role = %DocumentRole::Planets, records = out.len(), skipped, "document parsed");
    Ok(out)
}

fn parse_player_elements(xml: &str, role: DocumentRole) -> Result<Vec<PlayerRecord>, Error> {
    let mut out = Vec::new();
    let mut skipped = 0usize;
    scan(xml, role, b"player", |mut attrs| {
        let Some(id) = take(&mut attrs, "id") else { skipped += 1; return };
        let name = take(&mut attrs, "name").unwrap_or_default();
        let status = take(&mut attrs, "status").map(|s| status::split_tokens(&s)).unwrap_or_default();
        let score = take(&mut attrs, "score").map(|s| parse_score(&s)).unwrap_or(0);
        out.push(PlayerRecord { id, name, status, score });
    })?;
    debug!(role = %role, records = out.len(), skipped, "document parsed");
    Ok(out)
}

/// Lenient: anything that is not a non-negative integer counts as 0.
fn parse_score(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(0)
}

/// Remove and return a non-empty attribute value. Empty values count as absent.
fn take(attrs: &mut Attrs, key: &str) -> Option<String> {
    let idx = attrs.iter().position(|(k, _)| k == key)?;
    let (_, v) = attrs.swap_remove(idx);
    if v.is_empty() { None } else { Some(v) }
}

/// Walk the whole document, checking well-formedness, and hand the attributes
/// of every `tag` element to `on_element` in document order.
fn scan<F>(xml: &str, role: DocumentRole, tag: &[u8], mut on_element: F) -> Result<(), Error>
where
    F: FnMut(Attrs),
{
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let fail = |reader: &Reader<&[u8]>, message: String| Error::DocumentParse {
        role,
        message: format!("{} at byte {}", message, reader.buffer_position()),
    };

    let mut depth = 0usize;
    let mut roots = 0usize;
    loop {
        let ev = reader.read_event().map_err(|e| fail(&reader, e.to_string()))?;
        match ev {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if depth == 0 {
                    roots += 1;
                    if roots > 1 { return Err(fail(&reader, "more than one root element".into())); }
                }
                let wanted = e.name().as_ref() == tag;
                let attrs = attributes(e, wanted).map_err(|m| fail(&reader, m))?;
                if wanted { on_element(attrs); }
                if matches!(ev, Event::Start(_)) { depth += 1; }
            }
            Event::End(_) => {
                if depth == 0 { return Err(fail(&reader, "closing tag without matching opening tag".into())); }
                depth -= 1;
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(fail(&reader, "text outside the root element".into()));
            }
            Event::Eof => {
                if depth != 0 { return Err(fail(&reader, format!("{} unclosed element(s) at end of input", depth))); }
                if roots == 0 { return Err(fail(&reader, "no root element".into())); }
                return Ok(());
            }
            _ => {}
        }
    }
}

/// Validate every attribute of `e`; collect them only when `collect` is set.
fn attributes(e: &BytesStart<'_>, collect: bool) -> Result<Attrs, String> {
    let mut out = Attrs::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        if collect {
            out.push((String::from_utf8_lossy(attr.key.as_ref()).into_owned(), value.into_owned()));
        }
    }
    Ok(out)
}
