//! Card attribute vocabularies and the card attribute record.
//!
//! Every attribute is a closed three-value vocabulary. Construction from
//! raw values (camera pipeline output, config files) is validated and
//! fails with [`AttributeError`]; between typed values, invalid states are
//! unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejection raised when a raw value falls outside its vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("invalid symbol count {0}, expected 1, 2 or 3")]
    InvalidNumber(u8),
    #[error("unknown symbol '{0}', expected oval, diamond or wave")]
    UnknownSymbol(String),
    #[error("unknown shading '{0}', expected empty, hatched or solid")]
    UnknownShading(String),
    #[error("unknown color '{0}', expected red, green or purple")]
    UnknownColor(String),
}

/// Count of printed symbols on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    One,
    Two,
    Three,
}

impl Number {
    pub const ALL: [Number; 3] = [Number::One, Number::Two, Number::Three];

    pub fn value(self) -> u8 {
        match self {
            Number::One => 1,
            Number::Two => 2,
            Number::Three => 3,
        }
    }
}

impl TryFrom<u8> for Number {
    type Error = AttributeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Number::One),
            2 => Ok(Number::Two),
            3 => Ok(Number::Three),
            other => Err(AttributeError::InvalidNumber(other)),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Kind of symbol printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Oval,
    Diamond,
    Wave,
}

impl Symbol {
    pub const ALL: [Symbol; 3] = [Symbol::Oval, Symbol::Diamond, Symbol::Wave];

    pub fn name(self) -> &'static str {
        match self {
            Symbol::Oval => "oval",
            Symbol::Diamond => "diamond",
            Symbol::Wave => "wave",
        }
    }
}

impl FromStr for Symbol {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oval" => Ok(Symbol::Oval),
            "diamond" => Ok(Symbol::Diamond),
            "wave" => Ok(Symbol::Wave),
            other => Err(AttributeError::UnknownSymbol(other.to_string())),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fill style of the printed symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    Empty,
    Hatched,
    Solid,
}

impl Shading {
    pub const ALL: [Shading; 3] = [Shading::Empty, Shading::Hatched, Shading::Solid];

    pub fn name(self) -> &'static str {
        match self {
            Shading::Empty => "empty",
            Shading::Hatched => "hatched",
            Shading::Solid => "solid",
        }
    }
}

impl FromStr for Shading {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(Shading::Empty),
            "hatched" => Ok(Shading::Hatched),
            "solid" => Ok(Shading::Solid),
            other => Err(AttributeError::UnknownShading(other.to_string())),
        }
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ink color of the printed symbols. The game vocabulary says "purple"
/// where the ink is closest to blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Purple,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Purple];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Purple => "purple",
        }
    }
}

impl FromStr for Color {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "purple" => Ok(Color::Purple),
            other => Err(AttributeError::UnknownColor(other.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The complete, validated attribute set of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardAttributes {
    pub number: Number,
    pub symbol: Symbol,
    pub shading: Shading,
    pub color: Color,
}

impl CardAttributes {
    pub fn new(number: Number, symbol: Symbol, shading: Shading, color: Color) -> Self {
        Self {
            number,
            symbol,
            shading,
            color,
        }
    }

    /// Build from raw values, validating every field.
    pub fn parse(
        number: u8,
        symbol: &str,
        shading: &str,
        color: &str,
    ) -> Result<Self, AttributeError> {
        Ok(Self {
            number: Number::try_from(number)?,
            symbol: symbol.parse()?,
            shading: shading.parse()?,
            color: color.parse()?,
        })
    }
}

impl fmt::Display for CardAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.number, self.color, self.shading, self.symbol
        )
    }
}

/// Attribute set under construction by the classifier. A field stays
/// `None` when the corresponding stage could not decide confidently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAttributes {
    pub number: Option<Number>,
    pub symbol: Option<Symbol>,
    pub shading: Option<Shading>,
    pub color: Option<Color>,
}

impl PartialAttributes {
    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    /// Collapse into a full attribute set, or `None` if any stage failed.
    pub fn complete(&self) -> Option<CardAttributes> {
        Some(CardAttributes {
            number: self.number?,
            symbol: self.symbol?,
            shading: self.shading?,
            color: self.color?,
        })
    }
}

impl From<CardAttributes> for PartialAttributes {
    fn from(a: CardAttributes) -> Self {
        Self {
            number: Some(a.number),
            symbol: Some(a.symbol),
            shading: Some(a.shading),
            color: Some(a.color),
        }
    }
}
