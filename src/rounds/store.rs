use chrono::{DateTime, Utc};
use config::{Config, File, FileFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{GrantsError, Result, Round, RoundFrontmatter, RoundStatus};

const ROUND_EXTENSIONS: [&str; 2] = ["md", "mdx"];
const FENCE: &str = "---";

/// Rounds stored as markdown files with YAML front matter, one file per round.
/// The file stem is the round identifier.
#[derive(Debug, Clone)]
pub struct RoundStore {
    root: PathBuf,
}

impl RoundStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Identifiers of every round in the store, sorted.
    pub fn list_round_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || !is_round_file(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    pub fn load_round(&self, id: &str) -> Result<Round> {
        let path = self.find_round_file(id)
            .ok_or_else(|| GrantsError::RoundNotFound(id.to_string()))?;
        let raw = fs::read_to_string(&path)?;

        let (frontmatter, body) = parse_document(id, &raw)?;
        let round = Round {
            id: id.to_string(),
            frontmatter,
            body,
        };

        // Effective dates are trusted as given, only flagged
        match round.frontmatter.window() {
            Ok(window) if window.is_inverted() => {
                warn!("Round {} closes before it opens ({} > {})",
                    id, window.status_start(), window.status_end());
            }
            Ok(_) => {}
            Err(e) => warn!("Round {} has unusable dates: {}", id, e),
        }

        debug!("Loaded round {} from {}", id, path.display());
        Ok(round)
    }

    pub fn load_all(&self) -> Result<Vec<Round>> {
        let mut rounds = Vec::new();
        for id in self.list_round_ids()? {
            match self.load_round(&id) {
                Ok(round) => rounds.push(round),
                Err(e) => warn!("Skipping round {}: {}", id, e),
            }
        }
        Ok(rounds)
    }

    /// Rounds whose computed status at `now` equals `status`. Rounds with
    /// malformed dates are skipped.
    pub fn rounds_with_status(&self, status: RoundStatus, now: DateTime<Utc>) -> Result<Vec<Round>> {
        Ok(self.load_all()?
            .into_iter()
            .filter(|round| match round.frontmatter.window() {
                Ok(window) => window.status_at(now) == status,
                Err(_) => false,
            })
            .collect())
    }

    pub fn active_rounds(&self) -> Result<Vec<Round>> {
        self.rounds_with_status(RoundStatus::Active, Utc::now())
    }

    fn find_round_file(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
            return None;
        }

        ROUND_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file())
    }
}

fn is_round_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ROUND_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Split a document into its YAML front matter and markdown body.
fn parse_document(id: &str, raw: &str) -> Result<(RoundFrontmatter, String)> {
    let frontmatter_error = |message: &str| GrantsError::Frontmatter {
        id: id.to_string(),
        message: message.to_string(),
    };

    let raw = raw.trim_start_matches('\u{feff}');
    let mut lines = raw.lines();

    if lines.next().map(str::trim_end) != Some(FENCE) {
        return Err(frontmatter_error("missing opening '---'"));
    }

    let mut yaml = Vec::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == FENCE {
            closed = true;
            break;
        }
        yaml.push(line);
    }

    if !closed {
        return Err(frontmatter_error("missing closing '---'"));
    }

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    let frontmatter = Config::builder()
        .add_source(File::from_str(&yaml.join("\n"), FileFormat::Yaml))
        .build()
        .and_then(|c| c.try_deserialize::<RoundFrontmatter>())
        .map_err(|e| frontmatter_error(&e.to_string()))?;

    Ok((frontmatter, body))
}
