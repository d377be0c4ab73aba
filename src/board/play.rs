// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use super::dice::DiceState;
use super::material::{Color, Stack};
use super::moves::{LegalMoves, Move, MoveError, Rules};
use super::notation;
use super::point::{Destination, Origin, Point};
use super::position::Board;
use super::tracker::TurnTracker;
use super::Turn;
use crate::game::GameResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardResult {
    /// Every checker of the color has reached home.
    BorneOff(Color),
}

#[derive(Error, Debug)]
pub enum TurnError {
    #[error("No dice have been rolled this turn")]
    NotRolled,
    #[error("Legal moves remain for this roll")]
    MovesRemaining,
    #[error("The game is already over")]
    GameOver,
}
use TurnError::*;

/// A board in play: the position, the current roll, whose turn it is and
/// the moves played since the roll.
///
/// Each change builds the next value of a field and swaps it in, so the
/// state is always one whole board, roll and tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayState {
    board: Board,
    dice: DiceState,
    turn: Color,
    tracker: TurnTracker,
    rules: Rules,
    board_result: Option<BoardResult>,
}

impl PlayState {
    pub fn new(board: Board, first: Color) -> Self {
        let mut state = Self {
            board,
            dice: DiceState::empty(),
            turn: first,
            tracker: TurnTracker::new(),
            rules: Rules::default(),
            board_result: None,
        };
        state.update_result();
        state
    }

    /// The opening position with white to play.
    pub fn standard() -> Self {
        Self::new(Board::standard(), Color::White)
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn dice(&self) -> &DiceState {
        &self.dice
    }
    #[inline]
    pub fn tracker(&self) -> &TurnTracker {
        &self.tracker
    }
    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Begins the current color's turn with `dice`. Any spent values are
    /// cleared and the tracker starts over.
    pub fn start_turn(&mut self, dice: DiceState) -> Result<()> {
        if self.board_result.is_some() {
            return Err(GameOver.into());
        }
        if dice.values().is_empty() {
            return Err(NotRolled.into());
        }
        self.dice = dice.cleared();
        self.tracker = std::mem::take(&mut self.tracker).reset_for_new_turn();
        debug!(color = %self.turn, dice = ?self.dice.values(), "started turn");
        Ok(())
    }

    #[cfg(feature = "random")]
    pub fn roll(&mut self) -> Result<&DiceState> {
        self.start_turn(DiceState::roll())?;
        Ok(&self.dice)
    }

    /// Plays `mv`, which must be one of the moves `legal_moves` currently
    /// returns for its origin.
    pub fn submit_move(&mut self, mv: &Move) -> Result<()> {
        self.check_playable()?;
        if !self.legal_moves(mv.from).iter().any(|m| m == mv) {
            return Err(MoveError::InvalidMove.into());
        }
        self.play(mv.clone());
        Ok(())
    }

    /// Resolves `from`/`to` to a legal move and plays it.
    pub fn submit(&mut self, from: Origin, to: Destination) -> Result<Move> {
        self.check_playable()?;
        let mv = self.validate_move(from, to)?;
        self.play(mv.clone());
        Ok(mv)
    }

    /// Parses a move such as `"13/7"` or `"bar/20"` and plays it.
    pub fn submit_notation(&mut self, text: &str) -> Result<Move> {
        self.check_playable()?;
        let mv = notation::from_notation_with(&self.rules, &self.board, &self.dice, self.turn, text)?;
        self.play(mv.clone());
        Ok(mv)
    }

    /// Takes back the last move of this turn. Returns `false` when there is
    /// nothing to take back.
    pub fn undo(&mut self) -> bool {
        if self.tracker.is_empty() {
            return false;
        }
        let tracker = std::mem::take(&mut self.tracker);
        let (board, dice, tracker) = tracker.undo_last(&self.board, &self.dice);
        self.board = board;
        self.dice = dice;
        self.tracker = tracker;
        self.update_result();
        true
    }

    /// Passes the turn to the other color once no legal move is left.
    /// Returns the color now to play.
    pub fn end_turn(&mut self) -> Result<Color> {
        if self.board_result.is_some() {
            return Err(GameOver.into());
        }
        if self.dice.values().is_empty() {
            return Err(NotRolled.into());
        }
        if self.can_move() {
            return Err(MovesRemaining.into());
        }
        self.turn = !self.turn;
        self.dice = DiceState::empty();
        self.tracker = std::mem::take(&mut self.tracker).reset_for_new_turn();
        debug!(color = %self.turn, "turn passed");
        Ok(self.turn)
    }

    pub fn board_result(&self) -> Option<BoardResult> {
        self.board_result
    }

    /// The finished game scored as a single, gammon or backgammon win.
    pub fn game_result(&self) -> Option<GameResult> {
        self.board_result.map(|result| match result {
            BoardResult::BorneOff(winner) => GameResult::from_board(&self.board, winner),
        })
    }

    fn check_playable(&self) -> Result<()> {
        if self.board_result.is_some() {
            return Err(GameOver.into());
        }
        if self.dice.values().is_empty() {
            return Err(NotRolled.into());
        }
        Ok(())
    }

    fn play(&mut self, mv: Move) {
        let tracker = std::mem::take(&mut self.tracker);
        self.tracker = tracker.record_move(&self.board, &self.dice, &mv);
        self.board = self.board.apply_move(&mv, self.turn);
        self.dice = self.dice.mark_used(&mv.used_values);
        self.update_result();
    }

    fn update_result(&mut self) {
        let board = &self.board;
        self.board_result = Color::iter()
            .find(|c| board.checkers(*c) > 0 && board.on_points(*c) == 0 && board.bar(*c) == 0)
            .map(BoardResult::BorneOff);
        if let Some(result) = self.board_result {
            debug!(?result, "game over");
        }
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::standard()
    }
}

impl Index<Point> for PlayState {
    type Output = Option<Stack>;
    fn index(&self, index: Point) -> &Self::Output {
        self.board.index(index)
    }
}

impl Turn for PlayState {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl AsRef<Board> for PlayState {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}

impl AsRef<DiceState> for PlayState {
    fn as_ref(&self) -> &DiceState {
        &self.dice
    }
}

impl AsRef<Rules> for PlayState {
    fn as_ref(&self) -> &Rules {
        &self.rules
    }
}

impl LegalMoves for PlayState {}

#[cfg(test)]
mod tests {
    use crate::game::{GameResult, WinKind};
    use crate::*;
    use Point::*;

    fn dice(a: u8, b: u8) -> DiceState {
        DiceState::rolled(a, b).unwrap()
    }

    #[test]
    fn test_standard_starts_with_white() {
        let state = PlayState::standard();
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.board(), &Board::standard());
        assert!(state.dice().values().is_empty());
        assert!(state.board_result().is_none());
    }
    #[test]
    fn test_no_moves_before_roll() {
        let mut state = PlayState::standard();
        assert!(!state.can_move());
        assert!(state.submit(P13.into(), P7.into()).is_err());
        assert!(state.end_turn().is_err());
    }
    #[test]
    fn test_submit_and_undo() {
        let mut state = PlayState::standard();
        state.start_turn(dice(6, 1)).unwrap();
        let before = state.clone();

        let mv = state.submit(P13.into(), P7.into()).unwrap();
        assert_eq!(mv.used_values, vec![Die::try_from(6u8).unwrap()]);
        assert_eq!(state[P7], Some(Stack::white(1)));
        assert_eq!(state.tracker().len(), 1);

        assert!(state.undo());
        assert_eq!(state, before);
        assert!(!state.undo());
    }
    #[test]
    fn test_submit_move_rejects_unlisted_move() {
        let mut state = PlayState::standard();
        state.start_turn(dice(6, 1)).unwrap();
        let die = Die::try_from(5u8).unwrap();
        let mv = Move::single(P13.into(), P8.into(), die);
        assert!(state.submit_move(&mv).is_err());
        assert_eq!(state.board(), &Board::standard());

        let mv = state.legal_moves(P8.into()).get(P7.into()).next().cloned().unwrap();
        state.submit_move(&mv).unwrap();
        assert_eq!(state[P7], Some(Stack::white(1)));
    }
    #[test]
    fn test_validate_prefers_fewest_dice() {
        let mut state = PlayState::standard();
        state.start_turn(dice(2, 2)).unwrap();
        let mv = state.validate_move(P13.into(), P11.into()).unwrap();
        assert!(!mv.is_compound);
        let mv = state.validate_move(P13.into(), P9.into()).unwrap();
        assert_eq!(mv.used_values.len(), 2);
    }
    #[test]
    fn test_end_turn_requires_spent_dice() {
        let mut state = PlayState::standard();
        state.start_turn(dice(6, 5)).unwrap();
        assert!(state.end_turn().is_err());
        state.submit(P24.into(), P13.into()).unwrap();
        assert!(state.dice().is_exhausted());
        assert_eq!(state.end_turn().unwrap(), Color::Black);
        assert!(state.dice().values().is_empty());
        assert!(state.tracker().is_empty());
    }
    #[test]
    fn test_end_turn_when_blocked() {
        let board = Board::empty()
            .set_bar(Color::Black, 1)
            .set_stack(P18, Some(Stack::black(1)))
            .set_stack(P3, Some(Stack::white(2)))
            .set_stack(P5, Some(Stack::white(3)));
        let mut state = PlayState::new(board, Color::Black);
        state.start_turn(dice(3, 5)).unwrap();
        assert!(state.movable_origins().is_empty());
        assert_eq!(state.end_turn().unwrap(), Color::White);
    }
    #[test]
    fn test_start_turn_clears_used() {
        let mut state = PlayState::standard();
        let spent = dice(4, 4).mark_used(&[Die::try_from(4u8).unwrap()]);
        state.start_turn(spent).unwrap();
        assert_eq!(state.dice().remaining_slots(), 4);
    }
    #[test]
    fn test_bar_entry_through_state() {
        let board = Board::standard().set_stack(P1, Some(Stack::black(1))).set_bar(Color::Black, 1);
        let mut state = PlayState::new(board, Color::Black);
        state.start_turn(dice(3, 1)).unwrap();
        assert_eq!(state.movable_origins(), vec![Origin::Bar]);
        assert!(state.submit(P12.into(), P15.into()).is_err());
        state.submit(Origin::Bar, P3.into()).unwrap();
        assert!(state.legal_moves(P17.into()).contains(P18.into()));

        let mut permissive = PlayState::new(state.board().clone().set_bar(Color::Black, 1), Color::Black)
            .with_rules(Rules::PERMISSIVE);
        permissive.start_turn(dice(3, 1)).unwrap();
        assert!(permissive.movable_origins().len() > 1);
    }
    #[test]
    fn test_bearing_off_ends_game() {
        let board = Board::empty()
            .set_stack(P2, Some(Stack::white(1)))
            .set_home(Color::White, 14)
            .set_stack(P20, Some(Stack::black(15)));
        let mut state = PlayState::new(board, Color::White);
        state.start_turn(dice(2, 1)).unwrap();
        state.submit(P2.into(), Destination::Home).unwrap();
        assert_eq!(state.board_result(), Some(BoardResult::BorneOff(Color::White)));
        assert_eq!(
            state.game_result(),
            Some(GameResult::Win(Color::White, WinKind::Gammon))
        );
        assert!(state.end_turn().is_err());
        assert!(state.start_turn(dice(1, 1)).is_err());

        assert!(state.undo());
        assert!(state.board_result().is_none());
    }
    #[test]
    fn test_submit_notation() {
        let mut state = PlayState::standard();
        state.start_turn(dice(3, 1)).unwrap();
        let mv = state.submit_notation("8/5").unwrap();
        assert_eq!(mv.to, Destination::Point(P5));
        state.submit_notation("6/5").unwrap();
        assert_eq!(state[P5], Some(Stack::white(2)));
        assert!(state.submit_notation("13/10").is_err());
    }
    #[test]
    fn test_state_serializes() {
        let mut state = PlayState::standard();
        state.start_turn(dice(5, 2)).unwrap();
        state.submit(P13.into(), P8.into()).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let back: PlayState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
