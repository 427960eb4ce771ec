//! Streak and star tracking across submissions.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Stars awarded per round.
pub const MAX_STARS: u8 = 3;

/// A learner's running reward state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Consecutive correct answers.
    pub streak: u32,
    /// Stars earned in the current round, `0..=MAX_STARS`.
    pub stars: u8,
}

impl Progress {
    /// Update after a graded submission.
    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.streak = self.streak.saturating_add(1);
            self.stars = self.stars.saturating_add(1).min(MAX_STARS);
        } else {
            self.streak = 0;
            self.stars = 0;
        }
    }

    /// Start a new round (a new problem) without touching the streak.
    pub fn reset_round(&mut self) {
        self.stars = 0;
    }

    /// Load from `path`, or start fresh if the file does not exist.
    ///
    /// Stars beyond `MAX_STARS` in a hand-edited file are clamped.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read progress from {}", path.display()))?;
        let mut progress: Self =
            serde_json::from_str(&content).context("failed to parse progress JSON")?;
        if progress.stars > MAX_STARS {
            tracing::warn!(stars = progress.stars, "stars out of range, clamping");
            progress.stars = MAX_STARS;
        }
        Ok(progress)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write progress to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answers_build_streak_and_cap_stars() {
        let mut p = Progress::default();
        for _ in 0..5 {
            p.record(true);
        }
        assert_eq!(p.streak, 5);
        assert_eq!(p.stars, MAX_STARS);
    }

    #[test]
    fn wrong_answer_resets_both() {
        let mut p = Progress { streak: 4, stars: 2 };
        p.record(false);
        assert_eq!(p, Progress::default());
    }

    #[test]
    fn new_round_keeps_streak() {
        let mut p = Progress { streak: 2, stars: 2 };
        p.reset_round();
        assert_eq!(p.streak, 2);
        assert_eq!(p.stars, 0);
    }

    #[test]
    fn record_saturates_on_out_of_range_stars() {
        let mut p: Progress = serde_json::from_str(r#"{"streak":0,"stars":255}"#).unwrap();
        p.record(true);
        assert_eq!(p.stars, MAX_STARS);
        assert_eq!(p.streak, 1);
    }

    #[tokio::test]
    async fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        assert_eq!(Progress::load(&path).await.unwrap(), Progress::default());

        let p = Progress { streak: 7, stars: 1 };
        p.save(&path).await.unwrap();
        assert_eq!(Progress::load(&path).await.unwrap(), p);
    }

    #[tokio::test]
    async fn load_clamps_corrupt_stars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        std::fs::write(&path, r#"{"streak":4,"stars":255}"#).unwrap();

        let mut p = Progress::load(&path).await.unwrap();
        assert_eq!(p, Progress { streak: 4, stars: MAX_STARS });
        p.record(true);
        assert_eq!(p, Progress { streak: 5, stars: MAX_STARS });
    }
}
