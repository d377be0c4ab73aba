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

//! Backgammon board and rules engine
//!
//! A _board_ represents the checkers on the 24 points, the bar and
//! each side's home, and provides the core mechanisms to work out
//! which moves a roll allows and to play them. The following
//! features are supported:
//!
//! [x] Single moves and compound moves (one checker using two or more dice)
//! [x] Doubles played up to four times
//! [x] Hitting blots and re-entering from the bar
//! [x] Mandatory bar entry (configurable)
//! [x] Bearing off with the usual exact/high-roll rules (configurable)
//! [x] Undo within the current turn
//! [x] Move notation (`13/7*`, `bar/20`, `6/off`)
//! [x] Single, gammon and backgammon results
//! [ ] Forced play of both dice / the larger die
//! [ ] Doubling cube and match scoring
//!
//! Some of the key abstractions include:
//!
//! * A `Point` names one of the 24 points (`P1` .. `P24`). White
//!   travels from 24 toward 1 and bears off past point 1, black
//!   travels from 1 toward 24 and bears off past point 24. A move
//!   starts from an `Origin` (a point or the bar) and ends on a
//!   `Destination` (a point or home).
//!
//! * A `Mask` is a 24-bit value in which each bit maps to a point.
//!   Masks can be combined with `|`, `&` and `!`, and `iter()` walks
//!   the points in order from either end.
//!
//! * A `Stack` is one or more checkers of a single `Color` on a
//!   point. A stack of one is a blot and can be hit; two or more
//!   block the point for the other color.
//!
//! * A `Board` holds the stacks, the bar and home counts. It is
//!   plain data: `apply_move` returns a new board and never checks
//!   legality beyond failing loudly on a move that cannot fit.
//!
//! * `DiceState` is the current roll and the dice already spent.
//!   Doubles give four uses of the same value.
//!
//! * `Rules::legal_moves` lists every `Move` a checker may make with
//!   the remaining dice, single moves first, then compound moves.
//!
//! * `TurnTracker` snapshots the board and dice before each move so a
//!   turn can be taken back one move at a time.
//!
//! * `PlayState` ties these together for a host: it holds the board,
//!   roll, turn and tracker, accepts only legal moves and passes the
//!   turn once the roll is used up.
//!

mod dice;
mod material;
mod moves;
mod notation;
mod play;
mod point;
mod position;
mod tracker;

pub use dice::*;
pub use material::*;
pub use moves::*;
pub use notation::*;
pub use play::*;
pub use point::*;
pub use position::*;
pub use tracker::*;

pub use strum::IntoEnumIterator;

pub trait Turn {
    fn turn(&self) -> Color;
}
