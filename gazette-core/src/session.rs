use crate::config::GameConfig;
use crate::daykey::Clock;
use crate::error::{GazetteError, Result};
use crate::ledger::ProgressLedger;
use crate::rounds::DailyRoundBuilder;
use crate::storage::ProgressStore;
use crate::types::{ContentItem, DailyRoundSet, Round};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a game session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Loading,
    Playing { round: usize },
    RoundWon { round: usize },
    RoundLost { round: usize },
    DailyComplete,
}

/// One player's run through today's round set.
///
/// Drives the round-to-round state machine over a deterministic
/// `DailyRoundSet` and a persisted `ProgressLedger`. Replay after finishing
/// the day runs the same set against an in-memory counter and never touches
/// the persisted record.
pub struct GameSession {
    ledger: ProgressLedger,
    rounds: DailyRoundSet,
    phase: GamePhase,
    replay: bool,
    replay_completed: u32,
    // Round already counted this play-through; guards double completion.
    marked_round: Option<usize>,
}

impl GameSession {
    /// Builds today's rounds from the pool and resolves the opening phase
    /// from persisted progress.
    pub fn new(
        config: GameConfig,
        store: Arc<dyn ProgressStore>,
        clock: Arc<dyn Clock>,
        pool: &[ContentItem],
    ) -> Result<Self> {
        let ledger = ProgressLedger::new(store, clock, &config)?;
        let rounds =
            DailyRoundBuilder::new(ledger.today(), config.daily_limit, config.shape).build(pool);

        let mut session = Self {
            ledger,
            rounds,
            phase: GamePhase::Loading,
            replay: false,
            replay_completed: 0,
            marked_round: None,
        };
        session.refresh();
        tracing::info!(
            day = %session.rounds.day_key,
            rounds = session.rounds.len(),
            phase = ?session.phase,
            "session started"
        );
        Ok(session)
    }

    pub fn day_key(&self) -> &str {
        &self.rounds.day_key
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn rounds(&self) -> &DailyRoundSet {
        &self.rounds
    }

    pub fn is_replay(&self) -> bool {
        self.replay
    }

    pub fn is_daily_complete(&self) -> bool {
        matches!(self.phase, GamePhase::DailyComplete)
    }

    /// The round on screen, if one is active or just resolved.
    pub fn current_round(&self) -> Option<&Round> {
        match self.phase {
            GamePhase::Playing { round }
            | GamePhase::RoundWon { round }
            | GamePhase::RoundLost { round } => self.rounds.round(round),
            GamePhase::Loading | GamePhase::DailyComplete => None,
        }
    }

    /// Rounds still available today (replay runs count against the same
    /// limit, in memory only).
    pub fn rounds_left(&self) -> u32 {
        if self.replay {
            self.ledger.daily_limit().saturating_sub(self.replay_completed)
        } else {
            self.ledger.load().rounds_left
        }
    }

    /// Re-resolves the active round from recorded progress: the next
    /// uncompleted round, or `DailyComplete` when the allowance or the set
    /// is exhausted. Also how a resumed session lands mid-sequence, and how
    /// a day rollover is picked up.
    pub fn refresh(&mut self) {
        let completed = self.completed() as usize;
        self.phase = if completed >= self.ledger.daily_limit() as usize
            || completed >= self.rounds.len()
        {
            GamePhase::DailyComplete
        } else {
            GamePhase::Playing {
                round: completed + 1,
            }
        };
        self.marked_round = None;
    }

    pub fn round_won(&mut self) -> Result<()> {
        let GamePhase::Playing { round } = self.phase else {
            return Err(GazetteError::state("no active round to win"));
        };
        self.phase = GamePhase::RoundWon { round };
        tracing::info!(day = %self.rounds.day_key, round, "round won");
        Ok(())
    }

    pub fn round_lost(&mut self) -> Result<()> {
        let GamePhase::Playing { round } = self.phase else {
            return Err(GazetteError::state("no active round to lose"));
        };
        self.phase = GamePhase::RoundLost { round };
        tracing::info!(day = %self.rounds.day_key, round, "round lost");
        Ok(())
    }

    /// Counts the current round as played. Idempotent per round: repeat
    /// calls before the next round starts are ignored.
    pub fn mark_round_complete(&mut self) -> Result<()> {
        let round = match self.phase {
            GamePhase::Playing { round }
            | GamePhase::RoundWon { round }
            | GamePhase::RoundLost { round } => round,
            GamePhase::Loading | GamePhase::DailyComplete => {
                return Err(GazetteError::state("no round in progress"));
            }
        };

        if self.marked_round == Some(round) {
            return Ok(());
        }

        if self.replay {
            self.replay_completed = self.replay_completed.max(round as u32);
        } else {
            self.ledger.mark_complete(round as u32)?;
        }
        self.marked_round = Some(round);
        Ok(())
    }

    /// Moves on from a won or lost round to the next one (or to
    /// `DailyComplete`), recording completion if it was not already marked.
    pub fn advance_round(&mut self) -> Result<()> {
        if !matches!(
            self.phase,
            GamePhase::RoundWon { .. } | GamePhase::RoundLost { .. }
        ) {
            return Err(GazetteError::state("current round is not resolved yet"));
        }
        self.mark_round_complete()?;
        self.refresh();
        Ok(())
    }

    /// Replays today's identical round set after the daily allowance is
    /// spent. Progress of the replay run lives only in memory.
    pub fn start_replay(&mut self) -> Result<()> {
        if !self.is_daily_complete() {
            return Err(GazetteError::state("replay only starts after the daily set"));
        }
        self.replay = true;
        self.replay_completed = 0;
        self.refresh();
        tracing::info!(day = %self.rounds.day_key, "replay started");
        Ok(())
    }

    fn completed(&self) -> u32 {
        if self.replay {
            self.replay_completed
        } else {
            self.ledger.load().rounds_completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daykey::FixedClock;
    use crate::storage::MemoryStore;
    use crate::types::{ContentItem, ProgressRecord};
    use chrono::NaiveDate;

    fn pool(n: usize) -> Vec<ContentItem> {
        (0..n)
            .map(|i| ContentItem::new(format!("a{i:02}"), format!("Headline {i}")))
            .collect()
    }

    fn session_parts() -> (Arc<MemoryStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        ));
        (store, clock)
    }

    fn start(store: &Arc<MemoryStore>, clock: &Arc<FixedClock>) -> GameSession {
        GameSession::new(
            GameConfig::headline_game(),
            store.clone(),
            clock.clone(),
            &pool(20),
        )
        .unwrap()
    }

    fn play_round(session: &mut GameSession) {
        session.round_won().unwrap();
        session.mark_round_complete().unwrap();
        session.advance_round().unwrap();
    }

    #[test]
    fn walks_the_daily_set_to_completion() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);

        for expected in 1..=5 {
            assert_eq!(session.phase(), GamePhase::Playing { round: expected });
            assert!(session.current_round().is_some());
            play_round(&mut session);
        }
        assert!(session.is_daily_complete());
        assert_eq!(session.rounds_left(), 0);
        assert!(session.current_round().is_none());
    }

    #[test]
    fn session_resumes_mid_sequence() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);
        play_round(&mut session);
        play_round(&mut session);

        let resumed = start(&store, &clock);
        assert_eq!(resumed.phase(), GamePhase::Playing { round: 3 });
        assert_eq!(resumed.rounds_left(), 3);
    }

    #[test]
    fn double_marking_does_not_skip_rounds() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);

        session.round_won().unwrap();
        session.mark_round_complete().unwrap();
        session.mark_round_complete().unwrap();
        session.advance_round().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing { round: 2 });
    }

    #[test]
    fn lost_rounds_still_consume_the_allowance() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);

        session.round_lost().unwrap();
        session.advance_round().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing { round: 2 });
        assert_eq!(session.rounds_left(), 4);
    }

    #[test]
    fn replay_runs_the_same_set_without_touching_the_record() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);
        let first_run = session.rounds().clone();
        for _ in 0..5 {
            play_round(&mut session);
        }

        session.start_replay().unwrap();
        assert!(session.is_replay());
        assert_eq!(session.phase(), GamePhase::Playing { round: 1 });
        assert_eq!(session.rounds(), &first_run);

        for _ in 0..5 {
            play_round(&mut session);
        }
        assert!(session.is_daily_complete());

        let raw = store.get("headline_daily_progress").unwrap().unwrap();
        let record: ProgressRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.rounds_completed, 5, "replay must not persist");
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);

        assert!(session.start_replay().is_err());
        assert!(session.advance_round().is_err());

        session.round_won().unwrap();
        assert!(session.round_won().is_err());
        assert!(session.round_lost().is_err());
    }

    #[test]
    fn insufficient_content_resolves_to_daily_complete() {
        let (store, clock) = session_parts();
        let session = GameSession::new(
            GameConfig::headline_game(),
            store.clone(),
            clock.clone(),
            &pool(2),
        )
        .unwrap();
        assert!(session.rounds().is_empty());
        assert!(session.is_daily_complete());
    }

    #[test]
    fn refresh_picks_up_day_rollover() {
        let (store, clock) = session_parts();
        let mut session = start(&store, &clock);
        play_round(&mut session);
        play_round(&mut session);
        assert_eq!(session.phase(), GamePhase::Playing { round: 3 });

        clock.set_today(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());
        session.refresh();
        assert_eq!(session.phase(), GamePhase::Playing { round: 1 });
        assert_eq!(session.rounds_left(), 5);
    }
}
