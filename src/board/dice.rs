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
#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum DiceError {
    #[error("Die value {0} is out of range (expecting 1..=6)")]
    OutOfRange(u8),
    #[error("Expecting either no dice or exactly two")]
    ArgError,
}

use DiceError::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Die(u8);

impl Die {
    pub fn try_from<I: Into<u8>>(value: I) -> Result<Self> {
        let value: u8 = value.into();
        if !(1..=6).contains(&value) {
            return Err(OutOfRange(value).into());
        }
        Ok(Self(value))
    }

    #[cfg(feature = "random")]
    pub fn random() -> Self {
        Self(thread_rng().gen_range(1..=6u8))
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn pips(&self) -> isize {
        self.0 as isize
    }
}

impl TryFrom<u8> for Die {
    type Error = DiceError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=6 => Ok(Self(value)),
            _ => Err(OutOfRange(value)),
        }
    }
}

impl From<Die> for u8 {
    fn from(value: Die) -> Self {
        value.0
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The dice rolled for the current turn and the values already spent.
///
/// `values` is either empty (nothing rolled yet) or holds exactly two dice.
/// Spending a value never removes it from `values`; it is appended to
/// `used_values` instead so the full roll stays visible to the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "DiceRepr")]
pub struct DiceState {
    values: Vec<Die>,
    used_values: Vec<Die>,
}

/// Wire form, checked by `DiceState::with_used` on the way in.
#[derive(Deserialize)]
struct DiceRepr {
    values: Vec<u8>,
    used_values: Vec<u8>,
}

impl TryFrom<DiceRepr> for DiceState {
    type Error = anyhow::Error;
    fn try_from(repr: DiceRepr) -> Result<Self, Self::Error> {
        Self::with_used(&repr.values, &repr.used_values)
    }
}

impl DiceState {
    /// No roll yet. Yields no available values.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(a: Die, b: Die) -> Self {
        Self {
            values: vec![a, b],
            used_values: Vec::new(),
        }
    }

    /// Builds a fresh roll from raw values, validating each die.
    pub fn rolled(a: u8, b: u8) -> Result<Self> {
        Ok(Self::new(Die::try_from(a)?, Die::try_from(b)?))
    }

    /// Rebuilds a partially spent state, e.g. one received from a server.
    pub fn with_used(values: &[u8], used_values: &[u8]) -> Result<Self> {
        if !values.is_empty() && values.len() != 2 {
            return Err(ArgError.into());
        }
        let values = values
            .iter()
            .map(|v| Die::try_from(*v))
            .collect::<Result<Vec<_>>>()?;
        let used_values = used_values
            .iter()
            .map(|v| Die::try_from(*v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values, used_values })
    }

    #[cfg(feature = "random")]
    pub fn roll() -> Self {
        Self::new(Die::random(), Die::random())
    }

    pub fn values(&self) -> &[Die] {
        &self.values
    }

    pub fn used_values(&self) -> &[Die] {
        &self.used_values
    }

    #[inline]
    pub fn is_doubles(&self) -> bool {
        self.values.len() == 2 && self.values[0] == self.values[1]
    }

    /// How many times `die` may be spent this turn.
    fn multiplicity(&self, die: Die) -> usize {
        if self.is_doubles() {
            return 4;
        }
        self.values.iter().filter(|v| **v == die).count()
    }

    fn times_used(&self, die: Die) -> usize {
        self.used_values.iter().filter(|v| **v == die).count()
    }

    /// The multiset of die values still usable this turn, in roll order.
    pub fn available_values(&self) -> Vec<Die> {
        if self.is_doubles() {
            let die = self.values[0];
            let remaining = self.multiplicity(die).saturating_sub(self.times_used(die));
            return vec![die; remaining];
        }
        let mut result = Vec::with_capacity(self.values.len());
        for &die in self.values.iter() {
            if result.contains(&die) {
                continue;
            }
            let remaining = self.multiplicity(die).saturating_sub(self.times_used(die));
            result.extend(std::iter::repeat(die).take(remaining));
        }
        result
    }

    #[inline]
    pub fn remaining_slots(&self) -> usize {
        self.available_values().len()
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.available_values().is_empty()
    }

    /// The same roll with nothing spent.
    pub fn cleared(&self) -> Self {
        Self {
            values: self.values.clone(),
            used_values: Vec::new(),
        }
    }

    /// Returns a copy with `values` appended to the used list.
    pub fn mark_used(&self, values: &[Die]) -> Self {
        let mut result = self.clone();
        result.used_values.extend_from_slice(values);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn die(value: u8) -> Die {
        Die::try_from(value).unwrap()
    }

    #[test]
    fn test_die_range() {
        assert!(Die::try_from(0u8).is_err());
        assert!(Die::try_from(1u8).is_ok());
        assert!(Die::try_from(6u8).is_ok());
        assert!(Die::try_from(7u8).is_err());
    }
    #[test]
    fn test_empty_has_no_values() {
        let dice = DiceState::empty();
        assert!(dice.available_values().is_empty());
        assert!(!dice.is_doubles());
        assert!(dice.is_exhausted());
    }
    #[test]
    fn test_non_doubles_available() {
        let dice = DiceState::rolled(6, 5).unwrap();
        assert!(!dice.is_doubles());
        assert_eq!(dice.available_values(), vec![die(6), die(5)]);
        let dice = dice.mark_used(&[die(6)]);
        assert_eq!(dice.available_values(), vec![die(5)]);
        let dice = dice.mark_used(&[die(5)]);
        assert!(dice.is_exhausted());
    }
    #[test]
    fn test_doubles_expand_to_four() {
        let dice = DiceState::rolled(3, 3).unwrap();
        assert!(dice.is_doubles());
        assert_eq!(dice.available_values(), vec![die(3); 4]);
        let dice = dice.mark_used(&[die(3), die(3), die(3)]);
        assert_eq!(dice.remaining_slots(), 1);
    }
    #[test]
    fn test_doubles_exhausted_after_four() {
        let mut dice = DiceState::rolled(5, 5).unwrap();
        for _ in 0..4 {
            dice = dice.mark_used(&[die(5)]);
        }
        assert!(dice.available_values().is_empty());
    }
    #[test]
    fn test_mark_used_leaves_original() {
        let dice = DiceState::rolled(2, 4).unwrap();
        let used = dice.mark_used(&[die(2)]);
        assert!(dice.used_values().is_empty());
        assert_eq!(used.used_values(), &[die(2)]);
        assert_eq!(used.values(), dice.values());
    }
    #[test]
    fn test_with_used_validates() {
        assert!(DiceState::with_used(&[1, 2, 3], &[]).is_err());
        assert!(DiceState::with_used(&[1, 9], &[]).is_err());
        let dice = DiceState::with_used(&[4, 4], &[4]).unwrap();
        assert_eq!(dice.remaining_slots(), 3);
    }
    #[test]
    fn test_dice_wire_format() {
        let dice = DiceState::rolled(6, 1).unwrap().mark_used(&[die(1)]);
        let json = serde_json::to_string(&dice).unwrap();
        assert_eq!(json, r#"{"values":[6,1],"used_values":[1]}"#);
        let back: DiceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dice);
        assert!(serde_json::from_str::<DiceState>(r#"{"values":[7,1],"used_values":[]}"#).is_err());
    }
    #[test]
    fn test_dice_wire_rejects_bad_roll_length() {
        let three = r#"{"values":[1,2,3],"used_values":[]}"#;
        assert!(serde_json::from_str::<DiceState>(three).is_err());
        let one = r#"{"values":[4],"used_values":[]}"#;
        assert!(serde_json::from_str::<DiceState>(one).is_err());
        let spent = r#"{"values":[2,2],"used_values":[2,9]}"#;
        assert!(serde_json::from_str::<DiceState>(spent).is_err());
        let empty: DiceState = serde_json::from_str(r#"{"values":[],"used_values":[]}"#).unwrap();
        assert_eq!(empty, DiceState::empty());
    }
}
