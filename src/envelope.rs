//! Axis-aligned bounding boxes.
//!
//! An [`Envelope`] whose four bounds are all exactly `0.0` is *uninitialized*. [`Envelope::union`]
//! and [`Envelope::intersect`] treat such an envelope as "nothing yet", so a genuinely
//! zero-sized box sitting at the origin cannot be told apart from an empty one.
//!
//! ```
//! use ogr::Envelope;
//!
//! let mut extent = Envelope::default();
//! assert!(!extent.is_init());
//!
//! extent = extent.union(&Envelope::new(1.0, 1.0, 2.0, 2.0));
//! extent = extent.union(&Envelope::new(-1.0, 0.5, 1.5, 3.0));
//! assert_eq!(extent, Envelope::new(-1.0, 0.5, 2.0, 3.0));
//! ```

/// A 2D bounding box in double precision. Comparisons are exact, no tolerance is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Creates an envelope from its lower-left and upper-right corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Envelope {
        Envelope {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// The all-zero envelope.
    pub fn uninitialized() -> Envelope {
        Envelope::default()
    }

    /// Returns `false` when all four bounds are zero.
    pub fn is_init(&self) -> bool {
        self.min_x != 0.0 || self.min_y != 0.0 || self.max_x != 0.0 || self.max_y != 0.0
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Smallest envelope covering both `self` and `other`.
    ///
    /// If `self` is uninitialized the result is `other` verbatim, even when `other` is
    /// uninitialized too.
    pub fn union(&self, other: &Envelope) -> Envelope {
        if !self.is_init() {
            return *other;
        }
        Envelope {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// In-place form of [`Envelope::union`].
    pub fn merge(&mut self, other: &Envelope) {
        *self = self.union(other);
    }

    /// Componentwise bounding box of two real extents. Unlike [`union`](Envelope::union),
    /// an all-zero `self` is treated as the point at the origin.
    pub(crate) fn cover(&self, other: &Envelope) -> Envelope {
        Envelope {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Overlap of `self` and `other`.
    ///
    /// Disjoint boxes produce the uninitialized envelope. If `self` is uninitialized but the
    /// boxes touch, the result is `other` verbatim.
    pub fn intersect(&self, other: &Envelope) -> Envelope {
        if !self.intersects(other) {
            return Envelope::uninitialized();
        }
        if !self.is_init() {
            return *other;
        }
        Envelope {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    /// Tests whether the boxes overlap. Touching boundaries count as intersecting.
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Tests whether `other` lies inside `self` or on its boundary.
    pub fn contains(&self, other: &Envelope) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    /// Converts into a [`geo_types::Rect`], or `None` for the uninitialized envelope.
    pub fn to_rect(&self) -> Option<geo_types::Rect<f64>> {
        if !self.is_init() {
            return None;
        }
        Some(geo_types::Rect::new(
            geo_types::coord! { x: self.min_x, y: self.min_y },
            geo_types::coord! { x: self.max_x, y: self.max_y },
        ))
    }
}

impl From<geo_types::Rect<f64>> for Envelope {
    fn from(rect: geo_types::Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Envelope::new(min.x, min.y, max.x, max.y)
    }
}
