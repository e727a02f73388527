//! Dataset read interface
//!
//! The flat-file store is behind the `Dataset` trait so handlers never touch
//! the filesystem directly and tests can swap in an in-memory backend.
//! `read` returns the raw tabular text for a logical dataset name; typed
//! decoding lives in [`decode`].

pub mod decode;

use crate::error::ApiError;
use cpl_types::matches::MatchRecord;
use std::fmt;
use std::path::PathBuf;

/// Logical dataset names understood by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatasetName {
    /// One season of match results.
    Season(i32),
    /// Closing odds for one season.
    Odds(i32),
    /// The league's published table for one season.
    OfficialStandings(i32),
    /// The club directory.
    Teams,
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetName::Season(year) => write!(f, "matches ({})", year),
            DatasetName::Odds(year) => write!(f, "odds ({})", year),
            DatasetName::OfficialStandings(year) => write!(f, "official standings ({})", year),
            DatasetName::Teams => write!(f, "teams"),
        }
    }
}

/// Read access to the flat-file dataset.
pub trait Dataset: Send + Sync {
    /// Raw text of a logical dataset, `NotFound` when it does not exist,
    /// `DataUnavailable` when it exists but cannot be read.
    fn read(&self, name: &DatasetName) -> Result<String, ApiError>;

    /// Seasons with a match-results file, ascending.
    fn seasons(&self) -> Result<Vec<i32>, ApiError>;

    /// Seasons with a closing-odds file, ascending.
    fn odds_seasons(&self) -> Result<Vec<i32>, ApiError>;
}

/// Filesystem-backed dataset rooted at a data directory:
///
/// ```text
/// data/
///   matches/cpl_{year}.csv
///   odds/closing_odds_{year}.csv
///   standings/official_{year}.csv
///   teams/teams.csv
/// ```
pub struct FsDataset {
    root: PathBuf,
}

impl FsDataset {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &DatasetName) -> PathBuf {
        match name {
            DatasetName::Season(year) => self.root.join("matches").join(format!("cpl_{year}.csv")),
            DatasetName::Odds(year) => self
                .root
                .join("odds")
                .join(format!("closing_odds_{year}.csv")),
            DatasetName::OfficialStandings(year) => self
                .root
                .join("standings")
                .join(format!("official_{year}.csv")),
            DatasetName::Teams => self.root.join("teams").join("teams.csv"),
        }
    }

    /// Years extracted from `{prefix}{year}.csv` filenames in a directory.
    fn scan_years(&self, dir: &str, prefix: &str) -> Result<Vec<i32>, ApiError> {
        let dir = self.root.join(dir);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ApiError::DataUnavailable(format!(
                    "cannot list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut years: Vec<i32> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter_map(|file| {
                file.strip_prefix(prefix)?
                    .strip_suffix(".csv")?
                    .parse()
                    .ok()
            })
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }
}

impl Dataset for FsDataset {
    fn read(&self, name: &DatasetName) -> Result<String, ApiError> {
        let path = self.path_for(name);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ApiError::NotFound(format!("No {} dataset", name)))
            }
            Err(e) => Err(ApiError::DataUnavailable(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn seasons(&self) -> Result<Vec<i32>, ApiError> {
        self.scan_years("matches", "cpl_")
    }

    fn odds_seasons(&self) -> Result<Vec<i32>, ApiError> {
        self.scan_years("odds", "closing_odds_")
    }
}

/// Matches for one season, or combined history across every season on file.
pub fn load_matches(
    data: &dyn Dataset,
    season: Option<i32>,
) -> Result<Vec<MatchRecord>, ApiError> {
    match season {
        Some(year) => decode::decode_matches(&data.read(&DatasetName::Season(year))?),
        None => {
            let mut all = Vec::new();
            for year in data.seasons()? {
                all.extend(decode::decode_matches(
                    &data.read(&DatasetName::Season(year))?,
                )?);
            }
            Ok(all)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_in(dir: &std::path::Path) -> FsDataset {
        let matches = dir.join("matches");
        std::fs::create_dir_all(&matches).unwrap();
        std::fs::write(
            matches.join("cpl_2023.csv"),
            "match_id,date,home_team,away_team,home_goals,away_goals,status\n\
             m1,2023-05-01,Forge FC,Cavalry FC,2,1,FINISHED\n",
        )
        .unwrap();
        std::fs::write(
            matches.join("cpl_2024.csv"),
            "match_id,date,home_team,away_team,home_goals,away_goals,status\n\
             m2,2024-05-01,Pacific FC,Valour FC,0,0,FINISHED\n",
        )
        .unwrap();
        FsDataset::new(dir)
    }

    #[test]
    fn missing_dataset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset_in(dir.path());
        let err = data.read(&DatasetName::Season(1999)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn seasons_are_scanned_from_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset_in(dir.path());
        assert_eq!(data.seasons().unwrap(), vec![2023, 2024]);
        assert!(data.odds_seasons().unwrap().is_empty());
    }

    #[test]
    fn combined_history_spans_every_season() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset_in(dir.path());
        let all = load_matches(&data, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].season, 2023);
        assert_eq!(all[1].season, 2024);

        let one = load_matches(&data, Some(2024)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].match_id, "m2");
    }
}
