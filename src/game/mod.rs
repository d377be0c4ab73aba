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

use crate::{Board, Color, HOME_BOARDS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win(Color, WinKind),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WinKind {
    Single,
    /// The loser has not borne off a single checker.
    Gammon,
    /// A gammon where the loser still has a checker on the bar or in the
    /// winner's home board.
    Backgammon,
}

impl WinKind {
    /// Classifies a finished game from the loser's remaining checkers.
    pub fn classify(board: &Board, winner: Color) -> Self {
        let loser = !winner;
        if board.home(loser) > 0 {
            return WinKind::Single;
        }
        let trapped = board.bar(loser) > 0
            || !(board.occupied_by(loser) & HOME_BOARDS[winner]).is_empty();
        if trapped {
            WinKind::Backgammon
        } else {
            WinKind::Gammon
        }
    }

    /// Multiplier applied to the cube value when scoring.
    pub fn points(&self) -> u8 {
        match self {
            WinKind::Single => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

impl GameResult {
    pub fn from_board(board: &Board, winner: Color) -> Self {
        GameResult::Win(winner, WinKind::classify(board, winner))
    }
    pub fn winner(&self) -> Color {
        match self {
            GameResult::Win(color, _) => *color,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game::*;
    use crate::{Point::*, Stack};

    #[test]
    fn test_single_win() {
        let board = Board::empty()
            .set_home(Color::White, 15)
            .set_home(Color::Black, 3)
            .set_stack(P20, Some(Stack::black(12)));
        assert_eq!(WinKind::classify(&board, Color::White), WinKind::Single);
    }
    #[test]
    fn test_gammon() {
        let board = Board::empty()
            .set_home(Color::White, 15)
            .set_stack(P20, Some(Stack::black(15)));
        let result = GameResult::from_board(&board, Color::White);
        assert_eq!(result, GameResult::Win(Color::White, WinKind::Gammon));
        assert_eq!(result.winner(), Color::White);
    }
    #[test]
    fn test_backgammon() {
        let board = Board::empty()
            .set_home(Color::Black, 15)
            .set_stack(P20, Some(Stack::white(14)))
            .set_bar(Color::White, 1);
        assert_eq!(WinKind::classify(&board, Color::Black), WinKind::Backgammon);
        let board = Board::empty()
            .set_home(Color::White, 15)
            .set_stack(P3, Some(Stack::black(1)))
            .set_stack(P20, Some(Stack::black(14)));
        assert_eq!(WinKind::classify(&board, Color::White), WinKind::Backgammon);
        assert_eq!(WinKind::Backgammon.points(), 3);
    }
}
