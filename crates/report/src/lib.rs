//! ogmap report pipeline.
//!
//! Stages, each consuming the complete output of the previous one:
//! extract records -> score index -> player filter -> planet projection ->
//! sort -> write. Nothing reaches the sink unless every stage succeeded.

#![forbid(unsafe_code)]

use std::io::Write;

use metrics::gauge;
use ogmap_core::{DocumentRole, FilterConfig, OutputRow};
use serde::Serialize;
use tracing::{debug, info};

pub mod assemble;
pub mod planets;
pub mod players;
pub mod score;

pub use assemble::{render, sort_rows, write_rows};
pub use planets::{project_planets, Projection};
pub use players::{filter_players, KeptPlayers};
pub use score::ScoreIndex;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{role} document is not well-formed XML: {message}")]
    DocumentParse { role: DocumentRole, message: String },
    #[error("malformed coordinate {raw:?} (expected G:S:P)")]
    MalformedCoordinate { raw: String },
    #[error("score filtering requested but no highscore document was supplied")]
    MissingHighscore,
    #[error("writing report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ogmap_core::Error> for ReportError {
    fn from(e: ogmap_core::Error) -> Self {
        match e {
            ogmap_core::Error::DocumentParse { role, message } => ReportError::DocumentParse { role, message },
            ogmap_core::Error::MalformedCoordinate { raw } => ReportError::MalformedCoordinate { raw },
        }
    }
}

/// Counts for the caller to display after a run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub row_count: usize,
    pub player_count: usize,
    pub planets_seen: usize,
    pub planets_dropped: usize,
    pub malformed_coords: usize,
    pub collapsed_systems: usize,
    pub systems_only: bool,
}

/// Run every stage and return the sorted rows without writing them.
pub fn build_rows(
    players_xml: &str,
    planets_xml: &str,
    highscore_xml: Option<&str>,
    config: &FilterConfig,
) -> Result<(Vec<OutputRow>, ReportSummary), ReportError> {
    let scores = match (config.min_score, highscore_xml) {
        (Some(_), None) => return Err(ReportError::MissingHighscore),
        (Some(min), Some(xml)) => {
            info!(min_score = min, "processing highscore data");
            let index = ScoreIndex::from_records(&ogmap_xml::parse_highscore(xml)?);
            debug!(entries = index.len(), "score index built");
            Some(index)
        }
        (None, Some(_)) => {
            debug!("highscore document supplied without a minimum score; ignoring it");
            None
        }
        (None, None) => None,
    };

    info!("processing player data");
    let players = ogmap_xml::parse_players(players_xml)?;
    info!("processing planetary data");
    let planets = ogmap_xml::parse_planets(planets_xml)?;

    let kept = filter_players(&players, config, scores.as_ref());
    let projection = project_planets(&planets, &kept, config)?;

    info!("sorting the data");
    let mut rows = projection.rows;
    sort_rows(&mut rows);
    gauge!("report_rows", rows.len() as f64);

    let summary = ReportSummary {
        row_count: rows.len(),
        player_count: kept.len(),
        planets_seen: planets.len(),
        planets_dropped: projection.dropped_owner,
        malformed_coords: projection.malformed,
        collapsed_systems: projection.collapsed,
        systems_only: config.systems_only,
    };
    Ok((rows, summary))
}

/// End-to-end entry point: build the report and write it to `sink`.
pub fn generate_report<W: Write>(
    players_xml: &str,
    planets_xml: &str,
    highscore_xml: Option<&str>,
    config: &FilterConfig,
    sink: &mut W,
) -> Result<ReportSummary, ReportError> {
    let (rows, summary) = build_rows(players_xml, planets_xml, highscore_xml, config)?;
    write_rows(&rows, sink)?;
    Ok(summary)
}
