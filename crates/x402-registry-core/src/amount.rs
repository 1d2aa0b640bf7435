//! USDC amounts with fixed 6-decimal precision.
//!
//! Amounts are held as an integer count of micro-USDC so that reduction,
//! comparison and digests never depend on floating point. On the wire they
//! are plain JSON numbers (`0.01`, `123.456789`).

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Number of decimal places carried by a USDC amount.
pub const USDC_DECIMALS: u32 = 6;

const MICROS_PER_USDC: u64 = 10u64.pow(USDC_DECIMALS);

pub(crate) const OUT_OF_RANGE: &str = "out of range";

/// A non-negative USDC amount, stored as micro-USDC.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsdcAmount(u64);

impl UsdcAmount {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u64::MAX);

    /// Create from a count of micro-USDC (1 USDC = 1_000_000).
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub const fn micros(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Nearest `f64`; exact for every amount below 2^53 micro-USDC.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / MICROS_PER_USDC as f64
    }

    fn from_f64(value: f64) -> Result<Self, CoreError> {
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        if !value.is_finite() {
            return Err(invalid(value.to_string(), "not a finite number"));
        }
        // f64 Display is the shortest round-tripping decimal, never exponent form.
        value.to_string().parse()
    }
}

fn invalid(input: impl Into<String>, reason: &'static str) -> CoreError {
    CoreError::InvalidAmount {
        input: input.into(),
        reason,
    }
}

impl FromStr for UsdcAmount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('-') {
            return Err(invalid(s, "must not be negative"));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) || (s.contains('.') && !digits(frac)) {
            return Err(invalid(s, "not a decimal number"));
        }
        if frac.len() > USDC_DECIMALS as usize {
            return Err(invalid(s, "more than 6 decimal places"));
        }

        let whole: u64 = whole.parse().map_err(|_| invalid(s, OUT_OF_RANGE))?;
        let mut micros_frac: u64 = 0;
        for (i, b) in frac.bytes().enumerate() {
            micros_frac += u64::from(b - b'0') * 10u64.pow(USDC_DECIMALS - 1 - i as u32);
        }

        whole
            .checked_mul(MICROS_PER_USDC)
            .and_then(|m| m.checked_add(micros_frac))
            .map(Self)
            .ok_or_else(|| invalid(s, OUT_OF_RANGE))
    }
}

impl fmt::Display for UsdcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MICROS_PER_USDC;
        let frac = self.0 % MICROS_PER_USDC;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let frac = format!("{:06}", frac);
        write!(f, "{}.{}", whole, frac.trim_end_matches('0'))
    }
}

impl fmt::Debug for UsdcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UsdcAmount({})", self)
    }
}

impl TryFrom<f64> for UsdcAmount {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl Serialize for UsdcAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MICROS_PER_USDC == 0 {
            serializer.serialize_u64(self.0 / MICROS_PER_USDC)
        } else {
            serializer.serialize_f64(self.to_f64())
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = UsdcAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number with at most 6 decimal places")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        v.checked_mul(MICROS_PER_USDC)
            .map(UsdcAmount)
            .ok_or_else(|| E::custom("USDC amount out of range"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        let v = u64::try_from(v).map_err(|_| E::custom("USDC amount must not be negative"))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        UsdcAmount::from_f64(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for UsdcAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}
