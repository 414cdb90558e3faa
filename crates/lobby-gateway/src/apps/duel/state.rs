//! Rock/scissors/paper duel state machine
//!
//! Pure data plus transition rules; the app layer handles transport and
//! persistence. The whole struct round-trips through the session store as
//! JSON, which is also exactly what clients receive in state broadcasts.

use serde::{Deserialize, Serialize};

use lobby_core::UserId;

/// One throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Scissors,
    Paper,
}

/// Result of a round from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Move {
    /// Resolve this move against an opponent's
    #[must_use]
    pub fn duel(self, other: Move) -> Outcome {
        use Move::{Paper, Rock, Scissors};
        match (self, other) {
            (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock) => Outcome::Win,
            (Scissors, Rock) | (Paper, Scissors) | (Rock, Paper) => Outcome::Loss,
            _ => Outcome::Draw,
        }
    }
}

/// Lifecycle of one duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Pending,
    Ongoing,
    Complete,
}

/// One seat at the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlayerState {
    pub id: Option<UserId>,
    pub moves: Vec<Move>,
    pub points: u32,
}

/// Errors a transition can reject with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelFault {
    /// The duel is not in a stage where this transition applies
    WrongStage,
    /// The acting user holds no seat at this table
    NotSeated,
}

/// Full duel table
///
/// Seats are assigned in lobby join order when the duel begins. A player may
/// submit a move only while at most level with the opponent's move count, so
/// the two move lists never drift more than one apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelState {
    pub player1: PlayerState,
    pub player2: PlayerState,
    pub stage: Stage,
    pub round_limit: u32,
}

impl Default for DuelState {
    fn default() -> Self {
        Self {
            player1: PlayerState::default(),
            player2: PlayerState::default(),
            stage: Stage::Pending,
            round_limit: 3,
        }
    }
}

impl DuelState {
    /// Seat two players and open the table
    ///
    /// Resets any previous table contents, so a finished duel can be
    /// restarted in place.
    pub fn begin(&mut self, p1: UserId, p2: UserId) -> Result<(), DuelFault> {
        if self.stage == Stage::Ongoing {
            return Err(DuelFault::WrongStage);
        }
        self.player1 = PlayerState {
            id: Some(p1),
            ..PlayerState::default()
        };
        self.player2 = PlayerState {
            id: Some(p2),
            ..PlayerState::default()
        };
        self.stage = Stage::Ongoing;
        Ok(())
    }

    /// Rounds already resolved (both sides have thrown)
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        u32::try_from(self.player1.moves.len().min(self.player2.moves.len())).unwrap_or(u32::MAX)
    }

    /// Whether the remaining rounds can still change the winner
    fn decided(&self) -> bool {
        let rounds_left = self.round_limit.saturating_sub(self.rounds_played());
        let lead = self.player1.points.abs_diff(self.player2.points);
        lead > rounds_left || rounds_left == 0
    }

    /// Record a move for the given user
    ///
    /// A throw from a player already one move ahead is silently dropped; the
    /// round waits for the opponent. Resolves the round as soon as both sides
    /// have thrown, and flips the stage to complete once the outcome can no
    /// longer change.
    pub fn submit(&mut self, user: UserId, mv: Move) -> Result<(), DuelFault> {
        if self.stage != Stage::Ongoing {
            return Err(DuelFault::WrongStage);
        }

        let mover_is_p1 = if self.player1.id == Some(user) {
            true
        } else if self.player2.id == Some(user) {
            false
        } else {
            return Err(DuelFault::NotSeated);
        };
        let (mover, opponent) = if mover_is_p1 {
            (&mut self.player1, &mut self.player2)
        } else {
            (&mut self.player2, &mut self.player1)
        };

        if mover.moves.len() <= opponent.moves.len() {
            mover.moves.push(mv);
        }

        // Round resolves once both sides are level again.
        if mover.moves.len() == opponent.moves.len() {
            let round = mover.moves.len() - 1;
            match mover.moves[round].duel(opponent.moves[round]) {
                Outcome::Win => mover.points += 1,
                Outcome::Loss => opponent.points += 1,
                Outcome::Draw => {}
            }
            if self.decided() {
                self.stage = Stage::Complete;
            }
        }
        Ok(())
    }

    /// Winner's seat ID once the duel is complete; `None` on a draw or while
    /// still in play
    #[must_use]
    pub fn winner(&self) -> Option<UserId> {
        if self.stage != Stage::Complete {
            return None;
        }
        match self.player1.points.cmp(&self.player2.points) {
            std::cmp::Ordering::Greater => self.player1.id,
            std::cmp::Ordering::Less => self.player2.id,
            std::cmp::Ordering::Equal => None,
        }
    }
}
