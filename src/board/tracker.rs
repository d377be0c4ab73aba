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

use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::debug;

use super::dice::DiceState;
use super::moves::Move;
use super::position::Board;

/// A move played this turn together with the state it was played from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMoveRecord {
    pub board_before: Board,
    pub dice_before: DiceState,
    pub mv: Move,
}

/// Moves played since the last roll, most recent last.
///
/// Every operation consumes the tracker and hands back a new one, so the
/// host replaces its copy with a single assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnTracker {
    records: Vec<TurnMoveRecord>,
}

impl TurnTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(mut self, board_before: &Board, dice_before: &DiceState, mv: &Move) -> Self {
        self.records.push(TurnMoveRecord {
            board_before: board_before.clone(),
            dice_before: dice_before.clone(),
            mv: mv.clone(),
        });
        self
    }

    /// Pops the last record and returns the board and dice it was played
    /// from. With nothing recorded, `board` and `dice` come back unchanged.
    pub fn undo_last(mut self, board: &Board, dice: &DiceState) -> (Board, DiceState, Self) {
        match self.records.pop() {
            Some(record) => {
                debug!(from = %record.mv.from, to = %record.mv.to, "undid move");
                (record.board_before, record.dice_before, self)
            }
            None => (board.clone(), dice.clone(), self),
        }
    }

    pub fn reset_for_new_turn(self) -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn records(&self) -> &[TurnMoveRecord] {
        &self.records
    }
    pub fn last(&self) -> Option<&TurnMoveRecord> {
        self.records.last()
    }
    /// Moves played so far this turn, in order.
    pub fn moves(&self) -> impl Iterator<Item = &Move> {
        self.records.iter().map(|record| &record.mv)
    }
}

impl Index<usize> for TurnTracker {
    type Output = TurnMoveRecord;
    fn index(&self, index: usize) -> &Self::Output {
        self.records.index(index)
    }
}
