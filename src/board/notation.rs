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
use thiserror::Error;

use super::dice::DiceState;
use super::material::Color;
use super::moves::{Move, MoveError, Rules};
use super::point::{Destination, Origin, Point};
use super::position::Board;

#[derive(Error, Debug)]
pub enum NotationError {
    #[error("Cannot parse move notation: {0:?}")]
    Malformed(String),
}

/// Render a move as `from/to`, listing every landing of a compound move
/// and marking each hit with `*`, e.g. `13/7*`, `bar/20`, `6/off`, `13/8/4`.
///
/// Panics if the move does not fit `board` (see `Board::apply_move`).
pub fn to_notation(board: &Board, mv: &Move, color: Color) -> String {
    let mut scratch = board.clone();
    let mut from = mv.from;
    let mut s = from.to_string();
    for to in mv.landings(color) {
        s.push('/');
        s.push_str(&to.to_string());
        if scratch.step(from, to, color).is_some() {
            s.push('*');
        }
        if let Destination::Point(point) = to {
            from = Origin::Point(point);
        }
    }
    s
}

/// Parse a move in the form produced by `to_notation` and resolve it
/// against the legal moves under the standard rules.
pub fn from_notation(board: &Board, dice: &DiceState, color: Color, text: &str) -> Result<Move> {
    from_notation_with(&Rules::STANDARD, board, dice, color, text)
}

pub fn from_notation_with(
    rules: &Rules,
    board: &Board,
    dice: &DiceState,
    color: Color,
    text: &str,
) -> Result<Move> {
    let (from, landings) = parse(text)?;
    let to = match landings.last() {
        Some(to) => *to,
        None => return Err(NotationError::Malformed(text.to_string()).into()),
    };

    // A bare `from/to` may be played with any dice that reach `to`; listed
    // intermediate points pin the order.
    let moves = rules.legal_moves(board, dice, from, color);
    let found = moves
        .get(to)
        .filter(|mv| landings.len() == 1 || mv.landings(color) == landings)
        .min_by_key(|mv| mv.used_values.len())
        .cloned();
    found.ok_or_else(|| MoveError::InvalidMove.into())
}

fn parse(text: &str) -> Result<(Origin, Vec<Destination>)> {
    let malformed = || NotationError::Malformed(text.to_string());
    let mut parts = text.trim().split('/');

    let from = match parts.next().map(|p| p.trim_end_matches('*')) {
        Some(p) if p.eq_ignore_ascii_case("bar") => Origin::Bar,
        Some(p) => Origin::Point(Point::try_from_string(p).ok_or_else(malformed)?),
        None => return Err(malformed().into()),
    };

    let mut landings = Vec::new();
    for part in parts {
        if landings.last().map_or(false, |to: &Destination| to.is_home()) {
            return Err(malformed().into());
        }
        let part = part.trim_end_matches('*');
        let to = if part.eq_ignore_ascii_case("off") {
            Destination::Home
        } else {
            Destination::Point(Point::try_from_string(part).ok_or_else(malformed)?)
        };
        landings.push(to);
    }
    if landings.is_empty() {
        return Err(malformed().into());
    }
    Ok((from, landings))
}
