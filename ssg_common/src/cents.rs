use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------       Cents       -----------------------------------------------------------
/// A monetary amount in integer cents.
///
/// Shopify transmits prices as decimal strings (`"42.50"`). `Cents` parses that form losslessly
/// and prints it back out, while storing a plain `i64` in the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Type)]
#[sqlx(transparent)]
pub struct Cents(i64);

#[derive(Debug, Clone, Error)]
#[error("Invalid price amount: {0}")]
pub struct CentsConversionError(String);

impl Cents {
    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Cents {
    type Err = CentsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let mut parts = digits.split('.');
        let whole = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(|| CentsConversionError(s.to_string()))?;
        let cents = match parts.next() {
            None | Some("") => 0,
            // A single fraction digit is tenths, i.e. "42.5" == "42.50"
            Some(frac) if frac.len() <= 2 => {
                let parsed = frac.parse::<i64>().map_err(|_| CentsConversionError(s.to_string()))?;
                if frac.len() == 1 {
                    parsed * 10
                } else {
                    parsed
                }
            },
            Some(_) => return Err(CentsConversionError(s.to_string())),
        };
        if parts.next().is_some() {
            return Err(CentsConversionError(s.to_string()));
        }
        let total = whole * 100 + cents;
        Ok(Self(if negative { -total } else { total }))
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
