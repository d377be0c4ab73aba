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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use super::material::{Color, Pair};

use Color::*;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointError {
    #[error("Point {0} is out of range (expecting 1..=24)")]
    OutOfRange(u8),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[serde(try_from = "u8", into = "u8")]
pub enum Point {
    P1, P2, P3, P4, P5, P6,
    P7, P8, P9, P10, P11, P12,
    P13, P14, P15, P16, P17, P18,
    P19, P20, P21, P22, P23, P24,
}

use Point::{
    P1, P2, P3, P4, P5, P6,
    P7, P8, P9, P10, P11, P12,
    P13, P14, P15, P16, P17, P18,
    P19, P20, P21, P22, P23, P24,
};

impl Point {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Point; 24] = [
            P1, P2, P3, P4, P5, P6,
            P7, P8, P9, P10, P11, P12,
            P13, P14, P15, P16, P17, P18,
            P19, P20, P21, P22, P23, P24,
        ];
        debug_assert!(index < 24);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_number(number: u8) -> Option<Self> {
        match number {
            1..=24 => Some(Self::from_index(number as usize - 1)),
            _ => None,
        }
    }
    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        Self::try_from_number(name.parse().ok()?)
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn number(&self) -> u8 {
        self.to_index() as u8 + 1
    }
    #[inline]
    pub const fn to_mask(&self) -> Mask {
        Mask::new(0x1 << self.to_index())
    }

    /// Pips a checker of `color` on this point still has to travel to bear off.
    #[inline]
    pub const fn pips_to_off(&self, color: Color) -> u8 {
        match color {
            White => self.number(),
            Black => 25 - self.number(),
        }
    }

    #[inline]
    pub fn is_home_board(&self, color: Color) -> bool {
        HOME_BOARDS[color].contains(*self)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl From<Point> for u8 {
    fn from(value: Point) -> Self {
        value.number()
    }
}

impl From<Point> for usize {
    fn from(value: Point) -> Self {
        value.to_index()
    }
}

impl TryFrom<u8> for Point {
    type Error = PointError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_number(value).ok_or(PointError::OutOfRange(value))
    }
}

/// Where a moving checker starts: a point, or the bar when re-entering.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Bar,
    Point(Point),
}

impl Origin {
    /// Position on the 0..=25 track used for pip arithmetic, where 0 and 25
    /// are the virtual bar entries for black and white respectively.
    #[inline]
    pub fn track_index(&self, color: Color) -> isize {
        match self {
            Origin::Bar => color.bar_index(),
            Origin::Point(point) => point.number() as isize,
        }
    }
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            Origin::Bar => None,
            Origin::Point(point) => Some(*point),
        }
    }
}

impl From<Point> for Origin {
    fn from(value: Point) -> Self {
        Origin::Point(value)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Bar => write!(f, "bar"),
            Origin::Point(point) => write!(f, "{}", point),
        }
    }
}

/// Where a moving checker lands: a point, or the mover's home when bearing off.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Point(Point),
    Home,
}

impl Destination {
    /// Resolves a 0..=25 track index for `color`. Anything at or past the end
    /// of the board is home.
    #[inline]
    pub fn from_track_index(index: isize, color: Color) -> Self {
        let off = match color {
            White => index <= 0,
            Black => index >= 25,
        };
        if off {
            return Destination::Home;
        }
        match Point::try_from_number(index as u8) {
            Some(point) => Destination::Point(point),
            None => Destination::Home,
        }
    }
    #[inline]
    pub fn point(&self) -> Option<Point> {
        match self {
            Destination::Point(point) => Some(*point),
            Destination::Home => None,
        }
    }
    #[inline]
    pub fn is_home(&self) -> bool {
        matches!(self, Destination::Home)
    }
}

impl From<Point> for Destination {
    fn from(value: Point) -> Self {
        Destination::Point(value)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Home => write!(f, "off"),
            Destination::Point(point) => write!(f, "{}", point),
        }
    }
}

/// A set of points, one bit per point (bit 0 is point 1).
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u32);

impl Mask {
    #[inline]
    pub const fn new(val: u32) -> Self {
        Self(val & 0x00ff_ffff)
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        points
            .into_iter()
            .map(|point| point.to_mask())
            .reduce(|m1, m2| m1 | m2)
            .unwrap_or_default()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        (self.0 & point.to_mask().0) != 0
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in Point::iter().rev() {
            write!(f, "{}", if self.contains(point) { "#" } else { "." })?;
        }
        Ok(())
    }
}

impl Not for Mask {
    type Output = Self;
    fn not(self) -> Self::Output {
        Self::new(!self.0)
    }
}

impl BitOr for Mask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Mask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u32);

impl Iterator for MaskIter {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let point = Point::from_index(self.0.trailing_zeros() as usize);
            self.0 &= !point.to_mask().0;
            return Some(point);
        }
        None
    }
}

impl DoubleEndedIterator for MaskIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let point = Point::from_index(31 - self.0.leading_zeros() as usize);
            self.0 &= !point.to_mask().0;
            return Some(point);
        }
        None
    }
}

/// Each color's home board: points 1..=6 for white, 19..=24 for black.
pub static HOME_BOARDS: Lazy<Pair<Mask>> = Lazy::new(|| {
    let white = Mask::from_points(Point::iter().filter(|p| p.number() <= 6));
    let black = Mask::from_points(Point::iter().filter(|p| p.number() >= 19));
    Pair::new(white, black)
});
