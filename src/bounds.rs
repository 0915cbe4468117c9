//! Directional key ranges.
//!
//! A [`Bounds`] is a pair of ascending-order edges (`low`, `high`) plus a
//! [`Direction`]. Edges are always expressed in ascending key order, so a
//! reverse range still has its larger key in `high`.
//!
//! ```rust
//! use btrie::{Bounds, Direction};
//!
//! // [0x10, 0x11)
//! let forward = Bounds::from_key([0x10]).to([0x11]);
//! assert_eq!(forward.direction(), Direction::Forward);
//!
//! // (0x10, 0x11], walked from 0x11 downwards
//! let reverse = Bounds::from_key([0x11]).down_to([0x10]);
//! assert!(reverse.is_reverse());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

/// Order in which a range yields its keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Ascending key order.
    Forward,
    /// Descending key order.
    Reverse,
}

/// Errors returned by [`Bounds::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    /// The low edge is above the high edge.
    #[error("low edge {low:02X?} is above high edge {high:02X?}")]
    Inverted {
        /// Key of the low edge.
        low: Vec<u8>,
        /// Key of the high edge.
        high: Vec<u8>,
    },

    /// Both edges exclude the same key.
    #[error("both edges exclude the same key {0:02X?}")]
    Empty(Vec<u8>),
}

/// A directional, edge-typed key range.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    direction: Direction,
    low: Bound<Vec<u8>>,
    high: Bound<Vec<u8>>,
}

/// Half-built [`Bounds`] returned by [`Bounds::from_key`].
///
/// The anchor is inclusive. Finish with [`to`](Self::to) for an ascending
/// range or [`down_to`](Self::down_to) for a descending one; the second
/// anchor is exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "call `to` or `down_to` to finish the bounds"]
pub struct BoundsBuilder {
    begin: Vec<u8>,
}

impl BoundsBuilder {
    /// Finishes an ascending range `[begin, end)`.
    ///
    /// If `end == begin` a trailing `0x00` is appended to `end`, so the range
    /// holds exactly `begin`. If `end < begin` the anchors are swapped.
    pub fn to(self, end: impl Into<Vec<u8>>) -> Bounds {
        let (begin, end) = normalize_anchors(self.begin, end.into(), Ordering::Greater);
        Bounds {
            direction: Direction::Forward,
            low: Bound::Included(begin),
            high: Bound::Excluded(end),
        }
    }

    /// Finishes a descending range `(end, begin]`.
    ///
    /// If `end == begin` a trailing `0x00` is appended to `end` and the
    /// anchors are then swapped like any other inverted pair. If
    /// `end > begin` the anchors are swapped.
    pub fn down_to(self, end: impl Into<Vec<u8>>) -> Bounds {
        let (begin, end) = normalize_anchors(self.begin, end.into(), Ordering::Less);
        Bounds {
            direction: Direction::Reverse,
            low: Bound::Excluded(end),
            high: Bound::Included(begin),
        }
    }
}

/// `expected` is how `end` should compare to `begin` for a well-formed pair.
fn normalize_anchors(begin: Vec<u8>, mut end: Vec<u8>, expected: Ordering) -> (Vec<u8>, Vec<u8>) {
    if begin == end {
        tracing::debug!(anchor = ?begin, "padding equal range anchors");
        end.push(0);
    }
    if end.cmp(&begin) == expected {
        (begin, end)
    } else {
        tracing::debug!(?begin, ?end, "swapping inverted range anchors");
        (end, begin)
    }
}

impl Bounds {
    /// Every key, ascending.
    pub const FORWARD_ALL: Bounds = Bounds {
        direction: Direction::Forward,
        low: Bound::Unbounded,
        high: Bound::Unbounded,
    };

    /// Every key, descending.
    pub const REVERSE_ALL: Bounds = Bounds {
        direction: Direction::Reverse,
        low: Bound::Unbounded,
        high: Bound::Unbounded,
    };

    /// Starts a range anchored (inclusively) at `begin`.
    pub fn from_key(begin: impl Into<Vec<u8>>) -> BoundsBuilder {
        BoundsBuilder {
            begin: begin.into(),
        }
    }

    /// Builds bounds from explicit ascending-order edges.
    ///
    /// Unlike the builder, this never rewrites its input: an inverted pair
    /// is rejected.
    pub fn new(
        direction: Direction,
        low: Bound<Vec<u8>>,
        high: Bound<Vec<u8>>,
    ) -> Result<Self, BoundsError> {
        match (&low, &high) {
            (
                Bound::Included(l) | Bound::Excluded(l),
                Bound::Included(h) | Bound::Excluded(h),
            ) => match l.cmp(h) {
                Ordering::Greater => {
                    return Err(BoundsError::Inverted {
                        low: l.clone(),
                        high: h.clone(),
                    })
                }
                Ordering::Equal => {
                    if let (Bound::Excluded(_), Bound::Excluded(_)) = (&low, &high) {
                        return Err(BoundsError::Empty(l.clone()));
                    }
                }
                Ordering::Less => {}
            },
            _ => {}
        }
        Ok(Self {
            direction,
            low,
            high,
        })
    }

    /// Same edges, the other direction.
    pub fn reversed(&self) -> Self {
        let direction = match self.direction {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        };
        Self {
            direction,
            ..self.clone()
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.direction == Direction::Reverse
    }

    /// The ascending-order lower edge.
    pub fn low(&self) -> Bound<&[u8]> {
        as_slice_bound(&self.low)
    }

    /// The ascending-order upper edge.
    pub fn high(&self) -> Bound<&[u8]> {
        as_slice_bound(&self.high)
    }

    /// Where a complete key sits relative to the edges, in ascending order
    /// regardless of direction.
    ///
    /// `Less` means below the low edge, `Greater` above the high edge, and
    /// `Equal` within both.
    pub fn compare(&self, key: &[u8]) -> Ordering {
        match &self.low {
            Bound::Included(low) if key < low.as_slice() => return Ordering::Less,
            Bound::Excluded(low) if key <= low.as_slice() => return Ordering::Less,
            _ => {}
        }
        match &self.high {
            Bound::Included(high) if key > high.as_slice() => Ordering::Greater,
            Bound::Excluded(high) if key >= high.as_slice() => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }

    /// Whether `key` lies within both edges.
    #[inline]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.compare(key) == Ordering::Equal
    }

    /// The inclusive range `(min, max)` of next bytes that can extend
    /// `prefix` toward a key within the bounds, or `None` if no extension
    /// can.
    ///
    /// Only extensions are judged here; `prefix` itself is a key for
    /// [`compare`](Self::compare). Edge inclusivity never narrows the
    /// result: a child equal to an exclusive edge is still admissible and is
    /// rejected by `compare` once visited.
    pub fn child_bounds(&self, prefix: &[u8]) -> Option<(u8, u8)> {
        let min = match &self.low {
            Bound::Unbounded => 0x00,
            Bound::Included(edge) | Bound::Excluded(edge) => low_child_byte(edge, prefix)?,
        };
        let max = match &self.high {
            Bound::Unbounded => 0xFF,
            Bound::Included(edge) | Bound::Excluded(edge) => high_child_byte(edge, prefix)?,
        };
        (min <= max).then_some((min, max))
    }
}

/// Smallest next byte whose subtree can reach `edge` or above.
fn low_child_byte(edge: &[u8], prefix: &[u8]) -> Option<u8> {
    let depth = prefix.len();
    let common = depth.min(edge.len());
    match prefix[..common].cmp(&edge[..common]) {
        // Every extension of prefix stays below the edge.
        Ordering::Less => None,
        Ordering::Greater => Some(0x00),
        Ordering::Equal => match edge.get(depth) {
            Some(&next) => Some(next),
            // prefix is the edge or extends it; every child is above.
            None => Some(0x00),
        },
    }
}

/// Largest next byte whose subtree can reach `edge` or below.
fn high_child_byte(edge: &[u8], prefix: &[u8]) -> Option<u8> {
    let depth = prefix.len();
    let common = depth.min(edge.len());
    match prefix[..common].cmp(&edge[..common]) {
        Ordering::Less => Some(0xFF),
        // Every extension of prefix is already above the edge.
        Ordering::Greater => None,
        Ordering::Equal => edge.get(depth).copied(),
    }
}

fn as_slice_bound(bound: &Bound<Vec<u8>>) -> Bound<&[u8]> {
    match bound {
        Bound::Included(key) => Bound::Included(key.as_slice()),
        Bound::Excluded(key) => Bound::Excluded(key.as_slice()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Bounds {
    /// Renders as e.g. `forward [10, 11)` or `reverse (10, *)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        };
        write!(f, "{direction} ")?;
        match &self.low {
            Bound::Included(key) => write!(f, "[{}", Hex(key))?,
            Bound::Excluded(key) => write!(f, "({}", Hex(key))?,
            Bound::Unbounded => f.write_str("(*")?,
        }
        match &self.high {
            Bound::Included(key) => write!(f, ", {}]", Hex(key)),
            Bound::Excluded(key) => write!(f, ", {})", Hex(key)),
            Bound::Unbounded => f.write_str(", *)"),
        }
    }
}
