//! Integer geometry for shape placement.
//!
//! All coordinates are EMUs (English Metric Units, 914400 per inch) as stored in
//! DrawingML `a:xfrm` elements. Values are `i64` so that sums such as
//! `left + width` never overflow for realistic slides.

/// A point (offset) in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A size (extent) in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

impl Extent {
    #[inline]
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }
}

/// A fully defined position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Transform {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl Transform {
    #[inline]
    pub const fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.top + self.height
    }

    #[inline]
    pub fn offset(&self) -> Point {
        Point::new(self.left, self.top)
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

/// A transform whose components may each be missing.
///
/// Shapes that inherit their geometry (placeholders, some group children) carry
/// no `a:off` or `a:ext`, or only one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PartialTransform {
    pub left: Option<i64>,
    pub top: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl PartialTransform {
    /// Returns the transform only when all four components are present.
    pub fn complete(&self) -> Option<Transform> {
        Some(Transform::new(self.left?, self.top?, self.width?, self.height?))
    }

    /// True when no component is present.
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.top.is_none() && self.width.is_none() && self.height.is_none()
    }
}

impl From<Transform> for PartialTransform {
    fn from(t: Transform) -> Self {
        Self {
            left: Some(t.left),
            top: Some(t.top),
            width: Some(t.width),
            height: Some(t.height),
        }
    }
}

/// Affine mapping from a group's child coordinate space to its parent's space.
///
/// Corresponds to the `a:off`, `a:ext`, `a:chOff` and `a:chExt` children of a
/// group's `a:xfrm`. A child at `child_offset` lands at `offset`, and the
/// `child_extent` box is scaled onto `extent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupTransform {
    pub offset: Point,
    pub extent: Extent,
    pub child_offset: Point,
    pub child_extent: Extent,
}

impl GroupTransform {
    /// A mapping whose child space coincides with the group frame.
    pub fn identity(frame: Transform) -> Self {
        Self {
            offset: frame.offset(),
            extent: frame.extent(),
            child_offset: frame.offset(),
            child_extent: frame.extent(),
        }
    }

    /// The group's own frame in parent space.
    pub fn frame(&self) -> Transform {
        Transform::new(self.offset.x, self.offset.y, self.extent.cx, self.extent.cy)
    }

    /// True when child coordinates equal parent coordinates.
    pub fn is_identity(&self) -> bool {
        self.offset == self.child_offset && self.extent == self.child_extent
    }

    /// Same mapping with the group moved to `offset`; child space is untouched.
    pub fn with_offset(self, offset: Point) -> Self {
        Self { offset, ..self }
    }

    #[inline]
    pub fn map_x(&self, x: i64) -> i64 {
        self.offset.x + scale(x - self.child_offset.x, self.extent.cx, self.child_extent.cx)
    }

    #[inline]
    pub fn map_y(&self, y: i64) -> i64 {
        self.offset.y + scale(y - self.child_offset.y, self.extent.cy, self.child_extent.cy)
    }

    #[inline]
    pub fn map_width(&self, cx: i64) -> i64 {
        scale(cx, self.extent.cx, self.child_extent.cx)
    }

    #[inline]
    pub fn map_height(&self, cy: i64) -> i64 {
        scale(cy, self.extent.cy, self.child_extent.cy)
    }

    /// Map a child transform into parent space.
    pub fn map(&self, t: &Transform) -> Transform {
        Transform::new(
            self.map_x(t.left),
            self.map_y(t.top),
            self.map_width(t.width),
            self.map_height(t.height),
        )
    }

    /// Map whichever components are present; absent ones stay absent.
    pub fn map_partial(&self, t: &PartialTransform) -> PartialTransform {
        PartialTransform {
            left: t.left.map(|v| self.map_x(v)),
            top: t.top.map(|v| self.map_y(v)),
            width: t.width.map(|v| self.map_width(v)),
            height: t.height.map(|v| self.map_height(v)),
        }
    }
}

/// `value * num / den` with a zero denominator meaning "no scaling".
#[inline]
fn scale(value: i64, num: i64, den: i64) -> i64 {
    if den == 0 || num == den {
        return value;
    }
    (i128::from(value) * i128::from(num) / i128::from(den)) as i64
}

/// Axis-aligned union box over a set of transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_left: i64,
    pub min_top: i64,
    pub max_right: i64,
    pub max_bottom: i64,
}

impl BoundingBox {
    /// The box covering a single transform.
    pub fn of(t: &Transform) -> Self {
        Self {
            min_left: t.left,
            min_top: t.top,
            max_right: t.right(),
            max_bottom: t.bottom(),
        }
    }

    /// Union of all transforms, or `None` for an empty set.
    pub fn from_transforms<'a, I>(transforms: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Transform>,
    {
        transforms
            .into_iter()
            .map(Self::of)
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_left: self.min_left.min(other.min_left),
            min_top: self.min_top.min(other.min_top),
            max_right: self.max_right.max(other.max_right),
            max_bottom: self.max_bottom.max(other.max_bottom),
        }
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.max_right - self.min_left
    }

    #[inline]
    pub fn height(&self) -> i64 {
        self.max_bottom - self.min_top
    }

    pub fn to_transform(&self) -> Transform {
        Transform::new(self.min_left, self.min_top, self.width(), self.height())
    }

    /// Offset that centers this box on a canvas.
    ///
    /// Integer division truncates toward zero. The result is negative when the
    /// box is larger than the canvas.
    pub fn centered_offset(&self, canvas: Extent) -> Point {
        Point::new(
            (canvas.cx - self.width()) / 2,
            (canvas.cy - self.height()) / 2,
        )
    }
}
