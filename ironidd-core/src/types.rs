/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core identifier types for dictionary fields.
//!
//! This module provides the identifiers shared across IronIdd crates:
//! - [`Track`]: The alpha (`A`) or numeric (`N`) field-numbering namespace
//! - [`FieldId`]: A track plus its 1-based number, e.g. `A1` or `N12`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field-numbering namespace.
///
/// Alpha and numeric fields are numbered independently within an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Alpha track (`A1`, `A2`, ...).
    Alpha,
    /// Numeric track (`N1`, `N2`, ...).
    Numeric,
}

impl Track {
    /// Returns the declaration letter for this track.
    #[inline]
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Alpha => 'A',
            Self::Numeric => 'N',
        }
    }

    /// Creates a track from its declaration letter.
    ///
    /// Only uppercase `A` and `N` are field markers.
    #[inline]
    #[must_use]
    pub const fn from_letter(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Alpha),
            'N' => Some(Self::Numeric),
            _ => None,
        }
    }
}

/// Identifier of a field declaration within its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId {
    /// Alpha or numeric track.
    pub track: Track,
    /// 1-based number within the track.
    pub number: u32,
}

impl FieldId {
    /// Creates a new field identifier.
    #[inline]
    #[must_use]
    pub const fn new(track: Track, number: u32) -> Self {
        Self { track, number }
    }

    /// Creates an alpha-track identifier.
    #[inline]
    #[must_use]
    pub const fn alpha(number: u32) -> Self {
        Self::new(Track::Alpha, number)
    }

    /// Creates a numeric-track identifier.
    #[inline]
    #[must_use]
    pub const fn numeric(number: u32) -> Self {
        Self::new(Track::Numeric, number)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.track.letter(), self.number)
    }
}

/// Error returned when a string is not a field marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a field marker: {0:?}")]
pub struct InvalidFieldId(pub String);

impl FromStr for FieldId {
    type Err = InvalidFieldId;

    /// Parses `A#` or `N#`, surrounding whitespace allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let track = chars
            .next()
            .and_then(Track::from_letter)
            .ok_or_else(|| InvalidFieldId(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidFieldId(s.to_string()));
        }
        let number = digits
            .parse()
            .map_err(|_| InvalidFieldId(s.to_string()))?;
        Ok(Self::new(track, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_id_parse() {
        assert_eq!("A1".parse::<FieldId>().unwrap(), FieldId::alpha(1));
        assert_eq!(" N12 ".parse::<FieldId>().unwrap(), FieldId::numeric(12));
        assert!("a1".parse::<FieldId>().is_err());
        assert!("A".parse::<FieldId>().is_err());
        assert!("A1x".parse::<FieldId>().is_err());
        assert!("Name".parse::<FieldId>().is_err());
    }

    #[test]
    fn test_field_id_display() {
        assert_eq!(FieldId::alpha(3).to_string(), "A3");
        assert_eq!(FieldId::numeric(10).to_string(), "N10");
    }

    #[test]
    fn test_track_letter() {
        assert_eq!(Track::from_letter('A'), Some(Track::Alpha));
        assert_eq!(Track::from_letter('N'), Some(Track::Numeric));
        assert_eq!(Track::from_letter('n'), None);
        assert_eq!(Track::Numeric.letter(), 'N');
    }
}
