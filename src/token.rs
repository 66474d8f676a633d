use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TokenError;

const FIL_DECIMALS: usize = 18;

fn atto_per_fil() -> BigInt {
	BigInt::from(10u64).pow(FIL_DECIMALS as u32)
}

/// An amount of FIL, held in attoFIL.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(BigInt);

impl TokenAmount {
	pub fn zero() -> Self {
		Self(BigInt::zero())
	}

	pub fn from_atto(atto: impl Into<BigInt>) -> Self {
		Self(atto.into())
	}

	pub fn from_whole(fil: u64) -> Self {
		Self(BigInt::from(fil) * atto_per_fil())
	}

	pub fn atto(&self) -> &BigInt {
		&self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Parse a user-entered FIL amount: `"1.5"`, `"1.5 FIL"` or
	/// `"1500 attofil"`. Negative amounts are rejected.
	pub fn parse_fil(s: &str) -> Result<Self, TokenError> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Err(TokenError::Empty);
		}

		let lower = trimmed.to_ascii_lowercase();
		let (number, atto) = if let Some(n) = lower.strip_suffix("attofil") {
			(n.trim(), true)
		} else if let Some(n) = lower.strip_suffix("afil") {
			(n.trim(), true)
		} else if let Some(n) = lower.strip_suffix("fil") {
			(n.trim(), false)
		} else {
			(lower.as_str(), false)
		};

		if number.starts_with('-') {
			return Err(TokenError::Negative(s.to_owned()));
		}
		if atto {
			return Self::parse_atto(number).map_err(|_| TokenError::Malformed(s.to_owned()));
		}

		let (whole, frac) = number.split_once('.').unwrap_or((number, ""));
		if whole.is_empty() && frac.is_empty() {
			return Err(TokenError::Malformed(s.to_owned()));
		}
		let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
		if !digits(whole) || !digits(frac) {
			return Err(TokenError::Malformed(s.to_owned()));
		}
		if frac.len() > FIL_DECIMALS {
			return Err(TokenError::TooPrecise(s.to_owned()));
		}

		let mut joined = String::with_capacity(whole.len() + FIL_DECIMALS);
		joined.push_str(whole);
		joined.push_str(frac);
		joined.extend(std::iter::repeat('0').take(FIL_DECIMALS - frac.len()));
		let atto = BigInt::from_str(&joined).map_err(|_| TokenError::Malformed(s.to_owned()))?;
		Ok(Self(atto))
	}

	/// Parse a plain integer attoFIL string.
	pub fn parse_atto(s: &str) -> Result<Self, TokenError> {
		let s = s.trim();
		if s.is_empty() {
			return Err(TokenError::Empty);
		}
		let atto = BigInt::from_str(s).map_err(|_| TokenError::Malformed(s.to_owned()))?;
		if atto.is_negative() {
			return Err(TokenError::Negative(s.to_owned()));
		}
		Ok(Self(atto))
	}
}

impl Add for &TokenAmount {
	type Output = TokenAmount;

	fn add(self, rhs: &TokenAmount) -> TokenAmount {
		TokenAmount(&self.0 + &rhs.0)
	}
}

impl fmt::Display for TokenAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let unit = atto_per_fil();
		let sign = if self.0.is_negative() { "-" } else { "" };
		let abs = self.0.abs();
		let whole = &abs / &unit;
		let frac = &abs % &unit;
		if frac.is_zero() {
			return write!(f, "{sign}{whole} FIL");
		}
		let frac = format!("{:0>width$}", frac.to_string(), width = FIL_DECIMALS);
		write!(f, "{sign}{whole}.{} FIL", frac.trim_end_matches('0'))
	}
}

impl fmt::Debug for TokenAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

// -- Serde --

/// CBOR big integers: empty for zero, otherwise a sign byte (0 positive,
/// 1 negative) followed by the big-endian magnitude.
pub(crate) fn bigint_to_bytes(n: &BigInt) -> Vec<u8> {
	if n.is_zero() {
		return Vec::new();
	}
	let (sign, mag) = n.to_bytes_be();
	let mut out = Vec::with_capacity(mag.len() + 1);
	out.push(if sign == Sign::Minus { 1 } else { 0 });
	out.extend(mag);
	out
}

pub(crate) fn bigint_from_bytes(bytes: &[u8]) -> Result<BigInt, String> {
	match bytes.split_first() {
		None => Ok(BigInt::zero()),
		Some((0, mag)) => Ok(BigInt::from_bytes_be(Sign::Plus, mag)),
		Some((1, mag)) => Ok(BigInt::from_bytes_be(Sign::Minus, mag)),
		Some((b, _)) => Err(format!("invalid big int sign byte {b}")),
	}
}

impl Serialize for TokenAmount {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		if s.is_human_readable() {
			s.collect_str(&self.0)
		} else {
			s.serialize_bytes(&bigint_to_bytes(&self.0))
		}
	}
}

impl<'de> Deserialize<'de> for TokenAmount {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		let v = BigIntVisitor;
		let n = if d.is_human_readable() {
			d.deserialize_str(v)?
		} else {
			d.deserialize_bytes(v)?
		};
		Ok(Self(n))
	}
}

/// A big integer quantity that is not FIL, e.g. storage power in bytes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BigIntValue(pub BigInt);

impl fmt::Debug for BigIntValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for BigIntValue {
	fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
		if s.is_human_readable() {
			s.collect_str(&self.0)
		} else {
			s.serialize_bytes(&bigint_to_bytes(&self.0))
		}
	}
}

impl<'de> Deserialize<'de> for BigIntValue {
	fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
		let v = BigIntVisitor;
		let n = if d.is_human_readable() {
			d.deserialize_str(v)?
		} else {
			d.deserialize_bytes(v)?
		};
		Ok(Self(n))
	}
}

struct BigIntVisitor;

impl<'de> Visitor<'de> for BigIntVisitor {
	type Value = BigInt;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a big integer")
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
		BigInt::from_str(v).map_err(E::custom)
	}

	fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<BigInt, E> {
		bigint_from_bytes(v).map_err(E::custom)
	}
}
