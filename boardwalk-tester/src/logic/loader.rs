use boardwalk_game::{Board, BoardError, BoardLoader, RulesConfig};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("invalid rules file {path}: {source}")]
    Rules {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads board and rules JSON from disk. Without a board path the session
/// runs on an empty board, which exercises the fallback decks.
#[derive(Debug, Clone, Default)]
pub struct FileBoardLoader {
    board: Option<PathBuf>,
    rules: Option<PathBuf>,
}

impl FileBoardLoader {
    #[must_use]
    pub const fn new(board: Option<PathBuf>, rules: Option<PathBuf>) -> Self {
        Self { board, rules }
    }
}

fn read(path: &PathBuf) -> Result<String, LoaderError> {
    fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })
}

impl BoardLoader for FileBoardLoader {
    type Error = LoaderError;

    fn load_board(&self) -> Result<Board, Self::Error> {
        let Some(path) = &self.board else {
            return Ok(Board::default());
        };
        Ok(Board::from_json(&read(path)?)?)
    }

    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        let Some(path) = &self.rules else {
            return Ok(RulesConfig::default());
        };
        RulesConfig::from_json(&read(path)?).map_err(|source| LoaderError::Rules {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(label: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "boardwalk-loader-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_paths_use_defaults() {
        let loader = FileBoardLoader::default();
        assert!(loader.load_board().unwrap().squares.is_empty());
        assert_eq!(loader.load_rules().unwrap(), RulesConfig::default());
    }

    #[test]
    fn reads_board_and_rules_from_disk() {
        let board = temp_file(
            "board",
            r#"{ "squares": [ { "id": 0, "name": "Go", "type": "special" } ] }"#,
        );
        let rules = temp_file("rules", r#"{ "pass_start_bonus": 150 }"#);
        let loader = FileBoardLoader::new(Some(board), Some(rules));
        assert_eq!(loader.load_board().unwrap().size(), 1);
        assert_eq!(loader.load_rules().unwrap().pass_start_bonus, 150);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let loader = FileBoardLoader::new(Some(PathBuf::from("/definitely/not/here.json")), None);
        assert!(matches!(loader.load_board(), Err(LoaderError::Io { .. })));

        let broken = temp_file("broken", "{ not json");
        let loader = FileBoardLoader::new(Some(broken), None);
        assert!(matches!(loader.load_board(), Err(LoaderError::Board(_))));
    }
}
