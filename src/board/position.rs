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
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

use super::material::{Color, Pair, Stack};
use super::moves::Move;
use super::point::{Destination, Mask, Origin, Point, HOME_BOARDS};

use Point::*;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Point {0} holds a stack with no checkers")]
    EmptyStack(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct Points([Option<Stack>; 24]);

impl Index<Point> for Points {
    type Output = Option<Stack>;
    fn index(&self, index: Point) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Point> for Points {
    fn index_mut(&mut self, index: Point) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

/// Plain structural form used on the wire: absent points are omitted.
#[derive(Serialize, Deserialize)]
struct BoardRepr {
    points: BTreeMap<Point, Stack>,
    bar: Pair<u8>,
    home: Pair<u8>,
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        let points = Point::iter()
            .filter_map(|point| board.stack_at(point).map(|stack| (point, stack)))
            .collect();
        Self {
            points,
            bar: board.bar,
            home: board.home,
        }
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = BoardError;
    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let mut board = Board::empty();
        for (point, stack) in repr.points {
            if stack.count() == 0 {
                return Err(BoardError::EmptyStack(point.number()));
            }
            board.points[point] = Some(stack);
        }
        board.bar = repr.bar;
        board.home = repr.home;
        Ok(board)
    }
}

/// Checker positions: 24 points plus a bar and a home per color.
///
/// A `Board` owns all of its data, so `clone()` yields a fully independent
/// copy. Nothing here checks legality; see `Rules` for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    points: Points,
    bar: Pair<u8>,
    home: Pair<u8>,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The usual opening position with fifteen checkers per side.
    pub fn standard() -> Self {
        Self::empty()
            .set_stack(P24, Some(Stack::white(2)))
            .set_stack(P13, Some(Stack::white(5)))
            .set_stack(P8, Some(Stack::white(3)))
            .set_stack(P6, Some(Stack::white(5)))
            .set_stack(P1, Some(Stack::black(2)))
            .set_stack(P12, Some(Stack::black(5)))
            .set_stack(P17, Some(Stack::black(3)))
            .set_stack(P19, Some(Stack::black(5)))
    }

    #[inline]
    pub fn stack_at(&self, point: Point) -> Option<Stack> {
        self.points[point]
    }

    pub fn set_stack(mut self, point: Point, stack: Option<Stack>) -> Self {
        self.points[point] = stack.filter(|s| s.count() > 0);
        self
    }

    pub fn set_bar(mut self, color: Color, count: u8) -> Self {
        self.bar[color] = count;
        self
    }

    pub fn set_home(mut self, color: Color, count: u8) -> Self {
        self.home[color] = count;
        self
    }

    #[inline]
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color]
    }

    #[inline]
    pub fn home(&self, color: Color) -> u8 {
        self.home[color]
    }

    /// Whether a checker of `color` may land on `point`.
    #[inline]
    pub fn accepts(&self, point: Point, color: Color) -> bool {
        self.points[point].map_or(true, |stack| stack.accepts(color))
    }

    pub fn occupied_by(&self, color: Color) -> Mask {
        Mask::from_points(
            Point::iter().filter(|p| matches!(self.points[*p], Some(s) if s.color() == color)),
        )
    }

    /// Checkers of `color` still on the points (bar and home excluded).
    pub fn on_points(&self, color: Color) -> u32 {
        self.occupied_by(color)
            .iter()
            .filter_map(|p| self.points[p])
            .map(|s| s.count() as u32)
            .sum()
    }

    /// Total checkers of `color`: points, bar and home.
    pub fn checkers(&self, color: Color) -> u32 {
        self.on_points(color) + self.bar[color] as u32 + self.home[color] as u32
    }

    pub fn pip_count(&self, color: Color) -> u32 {
        let on_points: u32 = self
            .occupied_by(color)
            .iter()
            .filter_map(|p| self.points[p].map(|s| s.count() as u32 * p.pips_to_off(color) as u32))
            .sum();
        on_points + self.bar[color] as u32 * 25
    }

    /// All of the color's remaining checkers sit in its home board.
    pub fn is_bearing_off(&self, color: Color) -> bool {
        self.bar[color] == 0 && (self.occupied_by(color) & !HOME_BOARDS[color]).is_empty()
    }

    /// Whether `color` has a checker farther from home than `point`.
    pub fn has_checker_behind(&self, point: Point, color: Color) -> bool {
        let pips = point.pips_to_off(color);
        self.bar[color] > 0
            || self
                .occupied_by(color)
                .iter()
                .any(|p| p.pips_to_off(color) > pips)
    }

    /// Applies a move produced by `Rules::legal_moves`, returning the new
    /// board. A compound move is played as its individual steps, hitting any
    /// blot it lands on along the way.
    ///
    /// # Panics
    ///
    /// Panics if the move does not fit this board: no checker of `color` at
    /// its origin, a blocked landing point, dice that do not lead to its
    /// destination, or a stack, bar or home count already at `u8::MAX`.
    pub fn apply_move(&self, mv: &Move, color: Color) -> Self {
        let landings = mv.landings(color);
        assert_eq!(
            landings.last(),
            Some(&mv.to),
            "apply_move: dice {:?} do not lead from {} to {}",
            mv.used_values,
            mv.from,
            mv.to
        );
        let mut board = self.clone();
        let mut from = mv.from;
        for to in landings {
            board.step(from, to, color);
            if let Destination::Point(point) = to {
                from = Origin::Point(point);
            }
        }
        debug!(color = %color, from = %mv.from, to = %mv.to, dice = ?mv.used_values, "applied move");
        board
    }

    /// Moves one checker, sending a hit blot to its bar. Returns the color of
    /// the hit checker, if any.
    pub(crate) fn step(&mut self, from: Origin, to: Destination, color: Color) -> Option<Color> {
        self.remove(from, color);
        self.place(to, color)
    }

    fn remove(&mut self, from: Origin, color: Color) {
        match from {
            Origin::Bar => {
                assert!(self.bar[color] > 0, "no {} checker on the bar", color);
                self.bar[color] -= 1;
            }
            Origin::Point(point) => match self.points[point] {
                Some(stack) if stack.color() == color => {
                    self.points[point] = stack.pop();
                }
                _ => panic!("no {} checker on point {}", color, point),
            },
        }
    }

    fn place(&mut self, to: Destination, color: Color) -> Option<Color> {
        match to {
            Destination::Home => {
                self.home[color] = count_up(self.home[color], "home", color);
                None
            }
            Destination::Point(point) => match self.points[point] {
                None => {
                    self.points[point] = Some(Stack::new(color, 1));
                    None
                }
                Some(stack) if stack.color() == color => {
                    self.points[point] = Some(stack.push());
                    None
                }
                Some(stack) if stack.is_blot() => {
                    let hit = stack.color();
                    self.bar[hit] = count_up(self.bar[hit], "bar", hit);
                    self.points[point] = Some(Stack::new(color, 1));
                    Some(hit)
                }
                Some(_) => panic!("point {} is blocked for {}", point, color),
            },
        }
    }
}

fn count_up(count: u8, place: &str, color: Color) -> u8 {
    match count.checked_add(1) {
        Some(count) => count,
        None => panic!("{} {} count is full", color, place),
    }
}

/// Free-function form of [`Board::apply_move`].
pub fn apply_move(board: &Board, mv: &Move, color: Color) -> Board {
    board.apply_move(mv, color)
}

impl Index<Point> for Board {
    type Output = Option<Stack>;
    #[inline]
    fn index(&self, index: Point) -> &Self::Output {
        &self.points[index]
    }
}

impl AsRef<Self> for Board {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use Point::*;

    fn die(value: u8) -> Die {
        Die::try_from(value).unwrap()
    }

    #[test]
    fn test_standard_has_fifteen_each() {
        let board = Board::standard();
        assert_eq!(board.checkers(Color::White), 15);
        assert_eq!(board.checkers(Color::Black), 15);
        assert_eq!(board.pip_count(Color::White), 167);
        assert_eq!(board.pip_count(Color::Black), 167);
    }
    #[test]
    fn test_set_stack_none_clears() {
        let board = Board::standard().set_stack(P6, None);
        assert_eq!(board.stack_at(P6), None);
        assert_eq!(board.checkers(Color::White), 10);
    }
    #[test]
    fn test_clone_is_independent() {
        let original = Board::standard();
        let copy = original.clone().set_stack(P13, None).set_bar(Color::White, 3);
        assert_eq!(original.stack_at(P13), Some(Stack::white(5)));
        assert_eq!(original.bar(Color::White), 0);
        assert_ne!(original, copy);
    }
    #[test]
    fn test_apply_simple_move() {
        let board = Board::standard();
        let mv = Move::single(P13.into(), P7.into(), die(6));
        let next = board.apply_move(&mv, Color::White);
        assert_eq!(next.stack_at(P13), Some(Stack::white(4)));
        assert_eq!(next.stack_at(P7), Some(Stack::white(1)));
        // the original board is untouched
        assert_eq!(board, Board::standard());
    }
    #[test]
    fn test_apply_removes_empty_stack() {
        let board = Board::empty().set_stack(P5, Some(Stack::black(1)));
        let mv = Move::single(P5.into(), P7.into(), die(2));
        let next = board.apply_move(&mv, Color::Black);
        assert_eq!(next.stack_at(P5), None);
        assert_eq!(next.stack_at(P7), Some(Stack::black(1)));
    }
    #[test]
    fn test_apply_hit_sends_to_bar() {
        let board = Board::empty()
            .set_stack(P13, Some(Stack::white(2)))
            .set_stack(P10, Some(Stack::black(1)));
        let mv = Move::single(P13.into(), P10.into(), die(3));
        let next = board.apply_move(&mv, Color::White);
        assert_eq!(next.stack_at(P10), Some(Stack::white(1)));
        assert_eq!(next.bar(Color::Black), 1);
        assert_eq!(next.checkers(Color::Black), 1);
        assert_eq!(next.checkers(Color::White), 2);
    }
    #[test]
    fn test_apply_compound_hits_intermediate() {
        let board = Board::empty()
            .set_stack(P1, Some(Stack::black(1)))
            .set_stack(P4, Some(Stack::white(1)));
        let mv = Move::compound(P1.into(), P6.into(), vec![die(3), die(2)]);
        let next = board.apply_move(&mv, Color::Black);
        assert_eq!(next.stack_at(P4), None);
        assert_eq!(next.stack_at(P6), Some(Stack::black(1)));
        assert_eq!(next.bar(Color::White), 1);
    }
    #[test]
    fn test_apply_from_bar_and_to_home() {
        let board = Board::empty()
            .set_bar(Color::White, 1)
            .set_stack(P2, Some(Stack::white(1)));
        let enter = Move::single(Origin::Bar, P22.into(), die(3));
        let next = board.apply_move(&enter, Color::White);
        assert_eq!(next.bar(Color::White), 0);
        assert_eq!(next.stack_at(P22), Some(Stack::white(1)));

        let bear_off = Move::single(P2.into(), Destination::Home, die(2));
        let next = next.apply_move(&bear_off, Color::White);
        assert_eq!(next.home(Color::White), 1);
        assert_eq!(next.checkers(Color::White), 2);
    }
    #[test]
    #[should_panic]
    fn test_apply_from_empty_point_panics() {
        let mv = Move::single(P9.into(), P7.into(), die(2));
        Board::empty().apply_move(&mv, Color::White);
    }
    #[test]
    #[should_panic]
    fn test_apply_onto_block_panics() {
        let board = Board::empty()
            .set_stack(P9, Some(Stack::white(1)))
            .set_stack(P7, Some(Stack::black(2)));
        let mv = Move::single(P9.into(), P7.into(), die(2));
        board.apply_move(&mv, Color::White);
    }
    #[test]
    #[should_panic(expected = "black bar count is full")]
    fn test_hit_onto_full_bar_panics() {
        let board = Board::empty()
            .set_stack(P13, Some(Stack::white(1)))
            .set_stack(P10, Some(Stack::black(1)))
            .set_bar(Color::Black, u8::MAX);
        let mv = Move::single(P13.into(), P10.into(), die(3));
        board.apply_move(&mv, Color::White);
    }
    #[test]
    #[should_panic(expected = "white home count is full")]
    fn test_bear_off_onto_full_home_panics() {
        let board = Board::empty()
            .set_stack(P2, Some(Stack::white(1)))
            .set_home(Color::White, u8::MAX);
        let mv = Move::single(P2.into(), Destination::Home, die(2));
        board.apply_move(&mv, Color::White);
    }
    #[test]
    fn test_bearing_off_eligibility() {
        let board = Board::empty()
            .set_stack(P6, Some(Stack::white(2)))
            .set_stack(P2, Some(Stack::white(1)));
        assert!(board.is_bearing_off(Color::White));
        assert!(board.has_checker_behind(P2, Color::White));
        assert!(!board.has_checker_behind(P6, Color::White));
        let board = board.set_stack(P7, Some(Stack::white(1)));
        assert!(!board.is_bearing_off(Color::White));
    }
    #[test]
    fn test_board_wire_format() {
        let board = Board::empty()
            .set_stack(P1, Some(Stack::black(2)))
            .set_stack(P24, Some(Stack::white(2)))
            .set_bar(Color::Black, 1);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["points"]["1"]["color"], "black");
        assert_eq!(json["points"]["24"]["count"], 2);
        assert!(json["points"].get("2").is_none());
        assert_eq!(json["bar"]["black"], 1);
        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
    #[test]
    fn test_board_rejects_bad_wire_data() {
        let zero = r#"{"points":{"3":{"color":"white","count":0}},"bar":{"white":0,"black":0},"home":{"white":0,"black":0}}"#;
        assert!(serde_json::from_str::<Board>(zero).is_err());
        let range = r#"{"points":{"25":{"color":"white","count":1}},"bar":{"white":0,"black":0},"home":{"white":0,"black":0}}"#;
        assert!(serde_json::from_str::<Board>(range).is_err());
    }
}
