//! 任意精度权限掩码。
//!
//! 系统特权与域内权限都可能超过 64 位，统一以 `BigUint` 表达。
//! 包含判断一律使用按位与（`m & bit == bit`），不使用相等比较。

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

/// 权限掩码（无符号任意精度）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mask(BigUint);

/// 掩码解析错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mask: {0}")]
pub struct MaskParseError(pub String);

impl Mask {
    /// 空掩码。
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// 仅第 `index` 位置位的掩码。
    pub fn bit(index: u32) -> Self {
        Self(BigUint::one() << index)
    }

    /// 低 `width` 位全部置位的掩码。
    pub fn low_bits(width: u32) -> Self {
        Self((BigUint::one() << width) - BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `other` 的每一位是否都在 `self` 中置位。
    pub fn contains(&self, other: &Mask) -> bool {
        (&self.0 & &other.0) == other.0
    }

    pub fn union(&self, other: &Mask) -> Mask {
        Mask(&self.0 | &other.0)
    }

    pub fn intersection(&self, other: &Mask) -> Mask {
        Mask(&self.0 & &other.0)
    }

    /// 最高置位的位置 + 1（空掩码为 0）。
    pub fn bit_len(&self) -> u64 {
        self.0.bits()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

impl From<u64> for Mask {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for Mask {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl BitOr for &Mask {
    type Output = Mask;

    fn bitor(self, rhs: &Mask) -> Mask {
        self.union(rhs)
    }
}

impl BitAnd for &Mask {
    type Output = Mask;

    fn bitand(self, rhs: &Mask) -> Mask {
        self.intersection(rhs)
    }
}

impl FromIterator<Mask> for Mask {
    fn from_iter<I: IntoIterator<Item = Mask>>(iter: I) -> Self {
        iter.into_iter()
            .fold(BigUint::zero(), |acc, mask| acc | mask.0)
            .into()
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Mask {
    type Err = MaskParseError;

    /// 支持十进制与 `0x` 前缀十六进制。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
            None => BigUint::parse_bytes(text.as_bytes(), 10),
        };
        parsed
            .map(Mask)
            .ok_or_else(|| MaskParseError(s.to_string()))
    }
}

// JSON 数字只能安全表达 53 位，序列化统一输出十进制字符串。
impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for Mask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MaskRepr::deserialize(deserializer)? {
            MaskRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            MaskRepr::Number(value) => Ok(Mask::from(value)),
        }
    }
}
