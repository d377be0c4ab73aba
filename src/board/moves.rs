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
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::trace;

use super::dice::{DiceState, Die};
use super::material::Color;
use super::point::{Destination, Origin, Point};
use super::position::Board;
use super::Turn;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Not a legal move")]
    InvalidMove,
}
use MoveError::*;

/// Rule switches for the two places where standard backgammon is stricter
/// than a free-form board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct Rules {
    /// A color with checkers on the bar may only move those checkers.
    pub enforce_bar_entry: bool,
    /// Bearing off requires every checker in the home board, and a roll
    /// larger than needed only moves the rearmost checker.
    pub enforce_bear_off: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Rules {
    pub const STANDARD: Self = Self {
        enforce_bar_entry: true,
        enforce_bear_off: true,
    };

    /// Any point origin is allowed while on the bar and running past the
    /// end of the board always lands home.
    pub const PERMISSIVE: Self = Self {
        enforce_bar_entry: false,
        enforce_bear_off: false,
    };

    /// Every legal move for the checker at `from`, single moves first and
    /// then compound moves. Moves reaching the same destination with a
    /// different order of dice are all kept.
    pub fn legal_moves(
        &self,
        board: &Board,
        dice: &DiceState,
        from: Origin,
        color: Color,
    ) -> MoveList {
        let mut result = MoveList::new();
        let available = dice.available_values();
        if available.is_empty() || !self.can_leave(board, from, color) {
            return result;
        }

        let mut distinct: Vec<Die> = Vec::with_capacity(2);
        for die in available.iter() {
            if !distinct.contains(die) {
                distinct.push(*die);
            }
        }

        for &die in distinct.iter() {
            if let Some(to) = self.step(board, from, die, color) {
                result.push(Move::single(from, to, die));
            }
        }

        if dice.is_doubles() {
            self.doubles_moves(board, from, available[0], available.len(), color, &mut result);
        } else if let [a, b] = distinct[..] {
            self.split_moves(board, from, [a, b], color, &mut result);
            self.split_moves(board, from, [b, a], color, &mut result);
        }

        trace!(color = %color, from = %from, count = result.len(), "generated moves");
        result
    }

    /// Origins of `color` with at least one legal move.
    pub fn movable_origins(&self, board: &Board, dice: &DiceState, color: Color) -> Vec<Origin> {
        std::iter::once(Origin::Bar)
            .chain(board.occupied_by(color).iter().map(Origin::Point))
            .filter(|from| !self.legal_moves(board, dice, *from, color).is_empty())
            .collect()
    }

    fn doubles_moves(
        &self,
        board: &Board,
        from: Origin,
        die: Die,
        slots: usize,
        color: Color,
        result: &mut MoveList,
    ) {
        let mut scratch = board.clone();
        let mut at = from;
        let mut used = Vec::with_capacity(slots);
        for _ in 0..slots {
            let Some(to) = self.step(&scratch, at, die, color) else {
                break;
            };
            used.push(die);
            if used.len() >= 2 {
                result.push(Move::compound(from, to, used.clone()));
            }
            match to {
                Destination::Point(point) => {
                    scratch.step(at, to, color);
                    at = Origin::Point(point);
                }
                // nothing continues past home
                Destination::Home => break,
            }
        }
    }

    fn split_moves(
        &self,
        board: &Board,
        from: Origin,
        order: [Die; 2],
        color: Color,
        result: &mut MoveList,
    ) {
        let [first, second] = order;
        if let Some(mid @ Destination::Point(point)) = self.step(board, from, first, color) {
            let mut scratch = board.clone();
            scratch.step(from, mid, color);
            if let Some(to) = self.step(&scratch, Origin::Point(point), second, color) {
                result.push(Move::compound(from, to, vec![first, second]));
            }
        }
    }

    fn can_leave(&self, board: &Board, from: Origin, color: Color) -> bool {
        match from {
            Origin::Bar => board.bar(color) > 0,
            Origin::Point(point) => {
                let ours = matches!(board.stack_at(point), Some(s) if s.color() == color);
                ours && (!self.enforce_bar_entry || board.bar(color) == 0)
            }
        }
    }

    /// Where one die takes a checker of `color` from `from`, if it may go there.
    fn step(&self, board: &Board, from: Origin, die: Die, color: Color) -> Option<Destination> {
        if !self.can_leave(board, from, color) {
            return None;
        }
        let target = from.track_index(color) + die.pips() * color.direction();
        match Destination::from_track_index(target, color) {
            to @ Destination::Point(point) => board.accepts(point, color).then_some(to),
            Destination::Home => {
                let point = from.point()?;
                self.may_bear_off(board, point, die, color)
                    .then_some(Destination::Home)
            }
        }
    }

    fn may_bear_off(&self, board: &Board, point: Point, die: Die, color: Color) -> bool {
        if !self.enforce_bear_off {
            return true;
        }
        if !board.is_bearing_off(color) {
            return false;
        }
        let needed = point.pips_to_off(color);
        die.value() == needed || (die.value() > needed && !board.has_checker_behind(point, color))
    }
}

/// Legal moves under the standard rules.
pub fn legal_moves(board: &Board, dice: &DiceState, from: Origin, color: Color) -> MoveList {
    Rules::STANDARD.legal_moves(board, dice, from, color)
}

/// Legal moves under an explicit rule configuration.
pub fn legal_moves_with(
    rules: &Rules,
    board: &Board,
    dice: &DiceState,
    from: Origin,
    color: Color,
) -> MoveList {
    rules.legal_moves(board, dice, from, color)
}

pub trait LegalMoves: Turn + AsRef<Board> + AsRef<DiceState> + AsRef<Rules> {
    fn legal_moves(&self, from: Origin) -> MoveList {
        let rules: &Rules = self.as_ref();
        let board: &Board = self.as_ref();
        let dice: &DiceState = self.as_ref();
        rules.legal_moves(board, dice, from, self.turn())
    }

    fn movable_origins(&self) -> Vec<Origin> {
        let rules: &Rules = self.as_ref();
        let board: &Board = self.as_ref();
        let dice: &DiceState = self.as_ref();
        rules.movable_origins(board, dice, self.turn())
    }

    fn can_move(&self) -> bool {
        !self.movable_origins().is_empty()
    }

    /// Resolves a requested origin and destination to a legal move. When
    /// several moves reach `to`, the one spending the fewest dice wins.
    fn validate_move(&self, from: Origin, to: Destination) -> Result<Move> {
        self.legal_moves(from)
            .get(to)
            .min_by_key(|mv| mv.used_values.len())
            .cloned()
            .ok_or_else(|| InvalidMove.into())
    }
}

/// A checker movement together with the dice it spends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Origin,
    pub to: Destination,
    pub used_values: Vec<Die>,
    pub is_compound: bool,
}

impl Move {
    pub fn single(from: Origin, to: Destination, die: Die) -> Self {
        Self {
            from,
            to,
            used_values: vec![die],
            is_compound: false,
        }
    }

    pub fn compound(from: Origin, to: Destination, used_values: Vec<Die>) -> Self {
        debug_assert!(used_values.len() >= 2);
        Self {
            from,
            to,
            used_values,
            is_compound: true,
        }
    }

    pub fn pips(&self) -> u8 {
        self.used_values.iter().map(|d| d.value()).sum()
    }

    /// Every point the checker lands on, in order, ending at the destination.
    pub fn landings(&self, color: Color) -> Vec<Destination> {
        let mut index = self.from.track_index(color);
        let mut result = Vec::with_capacity(self.used_values.len());
        for die in self.used_values.iter() {
            index += die.pips() * color.direction();
            let landing = Destination::from_track_index(index, color);
            result.push(landing);
            if landing.is_home() {
                break;
            }
        }
        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveList(Vec<Move>);

impl MoveList {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    pub fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
    /// All candidate moves reaching `to`.
    pub fn get(&self, to: Destination) -> impl Iterator<Item = &Move> {
        self.0.iter().filter(move |mv| mv.to == to)
    }
    pub fn contains(&self, to: Destination) -> bool {
        self.get(to).next().is_some()
    }
    /// Distinct destinations in the order they were generated.
    pub fn destinations(&self) -> Vec<Destination> {
        let mut result: Vec<Destination> = Vec::new();
        for mv in self.0.iter() {
            if !result.contains(&mv.to) {
                result.push(mv.to);
            }
        }
        result
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// All origins a color could conceivably move from, bar first.
pub fn origins() -> impl Iterator<Item = Origin> {
    std::iter::once(Origin::Bar).chain(Point::iter().map(Origin::Point))
}
