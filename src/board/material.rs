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
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

/// One or more checkers of a single color sharing a point.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stack {
    color: Color,
    count: u8,
}

impl Stack {
    #[inline]
    pub const fn new(color: Color, count: u8) -> Self {
        debug_assert!(count > 0);
        Self { color, count }
    }

    #[inline]
    pub const fn white(count: u8) -> Self {
        Self::new(White, count)
    }

    #[inline]
    pub const fn black(count: u8) -> Self {
        Self::new(Black, count)
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn count(&self) -> u8 {
        self.count
    }

    /// A lone checker can be hit.
    #[inline]
    pub fn is_blot(&self) -> bool {
        self.count == 1
    }

    /// Whether a checker of `color` may land here (possibly hitting).
    #[inline]
    pub fn accepts(&self, color: Color) -> bool {
        self.color == color || self.is_blot()
    }

    /// Adds one checker, returning the grown stack.
    ///
    /// # Panics
    ///
    /// Panics if the stack already holds `u8::MAX` checkers.
    #[inline]
    pub(crate) fn push(self) -> Self {
        match self.count.checked_add(1) {
            Some(count) => Self::new(self.color, count),
            None => panic!("{} stack is full", self.color),
        }
    }

    /// Removes one checker. Returns `None` once the point is empty.
    #[inline]
    pub(crate) fn pop(self) -> Option<Self> {
        match self.count {
            0 | 1 => None,
            n => Some(Self::new(self.color, n - 1)),
        }
    }
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }

    /// White travels from point 24 down to point 1, black from 1 up to 24.
    #[inline]
    pub const fn direction(&self) -> isize {
        match self {
            White => -1,
            Black => 1,
        }
    }

    /// Virtual point index a checker enters from when leaving the bar.
    #[inline]
    pub const fn bar_index(&self) -> isize {
        match self {
            White => 25,
            Black => 0,
        }
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

/// A value kept once per color, e.g. bar and home counts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pair<T> {
    white: T,
    black: T,
}

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self { white, black }
    }
    pub fn white(&self) -> &T {
        &self.white
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.white
    }
    pub fn black(&self) -> &T {
        &self.black
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.black
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn test_directions_are_opposite() {
        assert_eq!(Color::White.direction(), -Color::Black.direction());
        assert_eq!(!Color::White, Color::Black);
    }
    #[test]
    fn test_blot_accepts_either_color() {
        let blot = Stack::black(1);
        assert!(blot.accepts(Color::White));
        assert!(blot.accepts(Color::Black));
        let block = Stack::black(2);
        assert!(!block.accepts(Color::White));
        assert!(block.accepts(Color::Black));
    }
    #[test]
    fn test_stack_pop_empties_at_zero() {
        assert_eq!(Stack::white(2).pop(), Some(Stack::white(1)));
        assert_eq!(Stack::white(1).pop(), None);
        assert_eq!(Stack::white(1).push(), Stack::white(2));
    }
    #[test]
    #[should_panic(expected = "stack is full")]
    fn test_stack_push_overflow_panics() {
        Stack::black(u8::MAX).push();
    }
    #[test]
    fn test_color_displays_lowercase() {
        assert_eq!(Color::White.to_string(), "white");
        assert_eq!(Color::Black.to_string(), "black");
    }
}
