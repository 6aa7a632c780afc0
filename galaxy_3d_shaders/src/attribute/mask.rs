/// 128-bit attribute mask.
///
/// One bit per `AttributeType` tag. Union, intersection and equality are
/// single `u128` operations, which keeps `can_render` checks in the pool
/// scan cheap.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};
use super::attribute::AttributeType;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct AttributeMask(u128);

impl AttributeMask {
    pub const EMPTY: AttributeMask = AttributeMask(0);

    /// Mask with the single bit of `ty`
    pub const fn of(ty: AttributeType) -> Self {
        Self(1u128 << ty.index())
    }

    pub fn from_types(types: &[AttributeType]) -> Self {
        types.iter().fold(Self::EMPTY, |mask, ty| mask | Self::of(*ty))
    }

    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u128 {
        self.0
    }

    pub const fn has(self, ty: AttributeType) -> bool {
        self.0 & (1u128 << ty.index()) != 0
    }

    pub fn insert(&mut self, ty: AttributeType) {
        self.0 |= 1u128 << ty.index();
    }

    pub fn remove(&mut self, ty: AttributeType) {
        self.0 &= !(1u128 << ty.index());
    }

    /// True if every bit of `other` is also set in `self`
    pub const fn contains(self, other: AttributeMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits of `self` that are not in `other`
    pub const fn difference(self, other: AttributeMask) -> Self {
        Self(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Set tags in ascending order
    pub fn iter(self) -> impl Iterator<Item = AttributeType> {
        let bits = self.0;
        (0..AttributeType::COUNT as u8)
            .filter(move |i| bits & (1u128 << i) != 0)
            .map(AttributeType::new)
    }

    /// Set tag indices in ascending order
    pub fn indices(self) -> Vec<u8> {
        self.iter().map(AttributeType::index).collect()
    }
}

impl BitOr for AttributeMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AttributeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AttributeMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for AttributeMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl fmt::Debug for AttributeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|ty| ty.alias())).finish()
    }
}

#[cfg(test)]
#[path = "mask_tests.rs"]
mod tests;
