//! Run configuration: flags/env -> document sources + `FilterConfig`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args};
use ogmap_core::{status, CoordPolicy, FilterConfig, StatusSet};
use ogmap_fetch::{HighscoreType, Source, Universe};

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Universe shorthand `<number>-<community>` (e.g. 178-cz); fills in any feed not given explicitly
    #[arg(long = "universe", env = "OGMAP_UNIVERSE")]
    pub universe: Option<String>,

    /// Players feed (URL or file)
    #[arg(long = "players", env = "OGMAP_PLAYERS")]
    pub players: Option<String>,

    /// Universe/planets feed (URL or file)
    #[arg(long = "planets", env = "OGMAP_PLANETS")]
    pub planets: Option<String>,

    /// Highscore feed (URL or file); needed with --min-score
    #[arg(long = "highscore", env = "OGMAP_HIGHSCORE")]
    pub highscore: Option<String>,

    /// Highscore type used with --universe (0 total .. 7 honor, see `highscore-types`)
    #[arg(long = "highscore-type", default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=7))]
    pub highscore_type: u8,

    /// Minimum points; digits may be grouped with spaces ("1 000 000"). Enables score filtering
    #[arg(long = "min-score", env = "OGMAP_MIN_SCORE")]
    pub min_score: Option<String>,

    /// Status tokens to exclude, comma separated (default: every known status)
    #[arg(long = "exclude", value_delimiter = ',', conflicts_with = "exclude_none")]
    pub exclude: Option<Vec<String>>,

    /// Keep players regardless of status
    #[arg(long = "exclude-none", action = ArgAction::SetTrue)]
    pub exclude_none: bool,

    /// Only list unique solar systems (G:S)
    #[arg(long = "systems-only", action = ArgAction::SetTrue)]
    pub systems_only: bool,

    /// Abort on a malformed planet coordinate instead of skipping it
    #[arg(long = "strict-coords", action = ArgAction::SetTrue)]
    pub strict_coords: bool,

    /// Output file
    #[arg(long = "out", env = "OGMAP_OUTPUT", default_value = "ogame_map.txt")]
    pub out: PathBuf,
}

/// Where the three documents come from. `highscore` is set only when score
/// filtering is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub players: Source,
    pub planets: Source,
    pub highscore: Option<Source>,
}

/// Accept `"1000000"`, `"1 000 000"` or `"1_000_000"`.
pub fn parse_min_score(raw: &str) -> Result<u64> {
    let digits: String = raw.chars().filter(|c| *c != ' ' && *c != '_').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        bail!("invalid minimum score value {:?}", raw);
    }
    digits.parse().with_context(|| format!("minimum score {:?} out of range", raw))
}

pub fn filter_config(args: &GenerateArgs) -> Result<FilterConfig> {
    let excluded_statuses: StatusSet = if args.exclude_none {
        StatusSet::new()
    } else if let Some(tokens) = &args.exclude {
        let mut set = StatusSet::new();
        for t in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !set.iter().any(|s| s == t) { set.push(t.to_string()); }
        }
        set
    } else {
        status::default_excluded()
    };
    let min_score = args.min_score.as_deref().map(parse_min_score).transpose()?;
    Ok(FilterConfig {
        excluded_statuses,
        min_score,
        systems_only: args.systems_only,
        coord_policy: if args.strict_coords { CoordPolicy::Abort } else { CoordPolicy::Skip },
    })
}

pub fn sources(args: &GenerateArgs, score_filter: bool) -> Result<Sources> {
    let universe: Option<Universe> = args.universe.as_deref().map(|s| s.parse::<Universe>()).transpose()?;
    let pick = |explicit: &Option<String>, derived: Option<String>, flag: &str| -> Result<Source> {
        explicit
            .as_deref()
            .map(Source::parse)
            .or_else(|| derived.map(Source::Url))
            .ok_or_else(|| anyhow!("no {} feed: pass --{} or --universe", flag, flag))
    };
    let players = pick(&args.players, universe.as_ref().map(Universe::players_url), "players")?;
    let planets = pick(&args.planets, universe.as_ref().map(Universe::planets_url), "planets")?;
    let highscore = if score_filter {
        let kind = HighscoreType::from_code(args.highscore_type).unwrap_or_default();
        Some(pick(&args.highscore, universe.as_ref().map(|u| u.highscore_url(kind)), "highscore")?)
    } else {
        None
    };
    Ok(Sources { players, planets, highscore })
}

pub fn http_timeout() -> Duration {
    std::env::var("OGMAP_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(ogmap_fetch::DEFAULT_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_score_accepts_grouped_digits() {
        assert_eq!(parse_min_score("0").unwrap(), 0);
        assert_eq!(parse_min_score("1 000 000").unwrap(), 1_000_000);
        assert_eq!(parse_min_score("25_000").unwrap(), 25_000);
        for bad in ["", "   ", "1,000", "-5", "12k", "99999999999999999999999"] {
            assert!(parse_min_score(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn default_config_excludes_every_known_status() {
        let cfg = filter_config(&GenerateArgs::default()).unwrap();
        assert_eq!(cfg.excluded_statuses, status::default_excluded());
        assert_eq!(cfg.min_score, None);
        assert_eq!(cfg.coord_policy, CoordPolicy::Skip);
    }

    #[test]
    fn explicit_exclusions_and_flags() {
        let args = GenerateArgs {
            exclude: Some(vec!["i".into(), " I ".into(), "i".into(), "".into()]),
            min_score: Some("5 000".into()),
            systems_only: true,
            strict_coords: true,
            ..GenerateArgs::default()
        };
        let cfg = filter_config(&args).unwrap();
        assert_eq!(cfg.excluded_statuses.as_slice(), ["i", "I"]);
        assert_eq!(cfg.min_score, Some(5000));
        assert!(cfg.systems_only);
        assert_eq!(cfg.coord_policy, CoordPolicy::Abort);

        let none = filter_config(&GenerateArgs { exclude_none: true, ..GenerateArgs::default() }).unwrap();
        assert!(none.excluded_statuses.is_empty());
    }

    #[test]
    fn universe_fills_missing_sources() {
        let args = GenerateArgs {
            universe: Some("178-cz".into()),
            planets: Some("local/universe.xml".into()),
            highscore_type: 3,
            ..GenerateArgs::default()
        };
        let s = sources(&args, true).unwrap();
        assert_eq!(s.players, Source::Url("https://s178-cz.ogame.gameforge.com/api/players.xml".into()));
        assert_eq!(s.planets, Source::File("local/universe.xml".into()));
        assert_eq!(
            s.highscore,
            Some(Source::Url("https://s178-cz.ogame.gameforge.com/api/highscore.xml?category=1&type=3".into()))
        );
        assert_eq!(sources(&args, false).unwrap().highscore, None);
    }

    #[test]
    fn missing_sources_are_reported() {
        let args = GenerateArgs { players: Some("p.xml".into()), ..GenerateArgs::default() };
        let err = sources(&args, false).unwrap_err();
        assert!(err.to_string().contains("--planets"));

        let args = GenerateArgs { players: Some("p.xml".into()), planets: Some("u.xml".into()), ..GenerateArgs::default() };
        assert!(sources(&args, true).is_err());
        assert!(sources(&GenerateArgs { universe: Some("bogus".into()), ..args }, false).is_err());
    }
}
