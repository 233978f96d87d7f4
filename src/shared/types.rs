//! Common types used across the engine

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// Decimal places of a USD-scaled value (10^6)
pub const USD_SCALE_DECIMALS: u32 = 6;
/// Decimal places of the dominance scale (10^10)
pub const DOMINANCE_SCALE_DECIMALS: u32 = 10;
/// Decimal places of the basis-point scale (10^4)
pub const BPS_SCALE_DECIMALS: u32 = 4;
/// Decimal places of the high-precision intermediate scale (10^12)
pub const PRECISION_SCALE_DECIMALS: u32 = 12;

/// Power-of-ten scale carried by a [`Scaled`] value
pub trait Scale {
    const DECIMALS: u32;
    const NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Usd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DominanceScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BasisPoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HighPrecision;

impl Scale for Usd {
    const DECIMALS: u32 = USD_SCALE_DECIMALS;
    const NAME: &'static str = "usd";
}

impl Scale for DominanceScale {
    const DECIMALS: u32 = DOMINANCE_SCALE_DECIMALS;
    const NAME: &'static str = "dominance";
}

impl Scale for BasisPoints {
    const DECIMALS: u32 = BPS_SCALE_DECIMALS;
    const NAME: &'static str = "bps";
}

impl Scale for HighPrecision {
    const DECIMALS: u32 = PRECISION_SCALE_DECIMALS;
    const NAME: &'static str = "precision";
}

/// Arbitrary-precision integer tagged with the power-of-ten factor it is scaled by.
///
/// Values on different scales are different types, so a USD value can never be
/// passed where a dominance share is expected without an explicit conversion.
pub struct Scaled<S: Scale> {
    value: BigInt,
    _scale: PhantomData<S>,
}

/// USD value scaled by 10^6
pub type UsdValue = Scaled<Usd>;
/// Share of the pool scaled by 10^10
pub type Dominance = Scaled<DominanceScale>;
/// Basis points (a value of 10 means 0.10%)
pub type Bps = Scaled<BasisPoints>;
/// Token amount pre-multiplied by 10^12
pub type PreciseAmount = Scaled<HighPrecision>;

impl<S: Scale> Scaled<S> {
    pub fn new(value: BigInt) -> Self {
        Self {
            value,
            _scale: PhantomData,
        }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero())
    }

    /// The factor `10^DECIMALS` this scale represents
    pub fn factor() -> BigInt {
        crate::math::pow10(S::DECIMALS)
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn into_inner(self) -> BigInt {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Lossy conversion for display only
    pub fn to_display_f64(&self) -> f64 {
        crate::math::to_display_f64(&self.value, S::DECIMALS)
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }
}

impl<S: Scale> Clone for Scaled<S> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<S: Scale> fmt::Debug for Scaled<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", S::NAME, self.value)
    }
}

impl<S: Scale> fmt::Display for Scaled<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<S: Scale> PartialEq for Scaled<S> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<S: Scale> Eq for Scaled<S> {}

impl<S: Scale> PartialOrd for Scaled<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Scale> Ord for Scaled<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<S: Scale> Default for Scaled<S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<S: Scale> From<i64> for Scaled<S> {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value))
    }
}

impl<S: Scale> From<u64> for Scaled<S> {
    fn from(value: u64) -> Self {
        Self::new(BigInt::from(value))
    }
}

impl<S: Scale> From<BigInt> for Scaled<S> {
    fn from(value: BigInt) -> Self {
        Self::new(value)
    }
}

impl<S: Scale> Add for Scaled<S> {
    type Output = Scaled<S>;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value + rhs.value)
    }
}

impl<'a, S: Scale> Add<&'a Scaled<S>> for &'a Scaled<S> {
    type Output = Scaled<S>;

    fn add(self, rhs: &'a Scaled<S>) -> Self::Output {
        Scaled::new(&self.value + &rhs.value)
    }
}

impl<S: Scale> Sub for Scaled<S> {
    type Output = Scaled<S>;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value - rhs.value)
    }
}

impl<'a, S: Scale> Sub<&'a Scaled<S>> for &'a Scaled<S> {
    type Output = Scaled<S>;

    fn sub(self, rhs: &'a Scaled<S>) -> Self::Output {
        Scaled::new(&self.value - &rhs.value)
    }
}

impl<S: Scale> std::iter::Sum for Scaled<S> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

/// Decoded price feed: true price is `price * 10^exponent`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceRecord {
    pub price: BigInt,
    pub exponent: i32,
}

impl PriceRecord {
    pub fn new(price: impl Into<BigInt>, exponent: i32) -> Self {
        Self {
            price: price.into(),
            exponent,
        }
    }

    /// A non-positive price is never a valid valuation input
    pub fn is_usable(&self) -> bool {
        self.price.is_positive()
    }

    /// Lossy conversion for display only
    pub fn to_display_f64(&self) -> f64 {
        let mantissa = self.price.to_f64().unwrap_or(0.0);
        mantissa * 10_f64.powi(self.exponent)
    }
}

/// Direction of a proposed trade against the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Deposit,
    Withdraw,
}

impl TradeAction {
    pub fn is_deposit(&self) -> bool {
        matches!(self, TradeAction::Deposit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Deposit => "deposit",
            TradeAction::Withdraw => "withdraw",
        }
    }
}

impl std::str::FromStr for TradeAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deposit" | "d" => Ok(TradeAction::Deposit),
            "withdraw" | "w" => Ok(TradeAction::Withdraw),
            _ => Err(anyhow::anyhow!("Unknown trade action: {}", s)),
        }
    }
}

/// Unit a user-entered trade amount is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    /// Native units of the pool token being deposited or withdrawn
    Token,
    /// US dollars
    Usd,
    /// Pool share token (wLQI)
    Share,
}

impl std::str::FromStr for Denomination {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" | "native" => Ok(Denomination::Token),
            "usd" => Ok(Denomination::Usd),
            "share" | "wlqi" => Ok(Denomination::Share),
            _ => Err(anyhow::anyhow!("Unknown denomination: {}", s)),
        }
    }
}
