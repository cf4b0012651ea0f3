//! Arena key trait.
//!
//! Slot nodes refer to their neighbours by arena key rather than by
//! reference. A [`Key`] carries a sentinel (`NONE`) standing in for
//! "no neighbour".

/// Trait for key types used to address slot nodes in storage.
///
/// # Example
///
/// ```
/// use storey::Key;
///
/// let key: usize = 7;
/// assert!(key.is_some());
/// assert!(usize::NONE.is_none());
/// ```
///
/// # Custom Key Types
///
/// ```
/// use storey::Key;
///
/// #[derive(Copy, Clone, PartialEq, Eq, Debug)]
/// struct BayId(u16);
///
/// impl Key for BayId {
///     const NONE: Self = BayId(u16::MAX);
///
///     fn from_usize(val: usize) -> Self {
///         BayId(val as u16)
///     }
///
///     fn as_usize(&self) -> usize {
///         self.0 as usize
///     }
/// }
///
/// assert!(BayId::NONE.is_none());
/// assert_eq!(BayId::from_usize(3).as_usize(), 3);
/// ```
pub trait Key: Copy + Eq + core::fmt::Debug {
    /// Sentinel meaning "no node".
    const NONE: Self;

    /// Creates a key from an arena index.
    fn from_usize(val: usize) -> Self;

    /// Returns the arena index for this key.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts the sentinel to `None`.
    #[inline]
    fn into_option(self) -> Option<Self> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Key for u32 {
    const NONE: Self = u32::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val as u32
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self as usize
    }
}

impl Key for usize {
    const NONE: Self = usize::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_max() {
        assert_eq!(u32::NONE, u32::MAX);
        assert_eq!(usize::NONE, usize::MAX);
        assert!(usize::NONE.is_none());
        assert!(!u32::NONE.is_some());
    }

    #[test]
    fn into_option_maps_sentinel() {
        assert_eq!(usize::NONE.into_option(), None);
        assert_eq!(0usize.into_option(), Some(0));
        assert_eq!(u32::from_usize(12).into_option(), Some(12));
    }
}
