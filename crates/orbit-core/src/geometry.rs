//! Wedge layout for the radial menu.
//!
//! All coordinates live in a 350x350 view box centred on (175, 175). Each slice is laid out in
//! its own frame, which is then rotated by [`SliceGeometry::rotation`] about the centre; the
//! whole menu is finally turned by [`MENU_ROTATION`] so the first slice sits at the bottom.

pub const VIEWBOX_SIZE: f64 = 350.0;
pub const VIEWBOX_CENTER: f64 = VIEWBOX_SIZE / 2.0;
pub const INNER_RADIUS: f64 = 55.0;
pub const OUTER_RADIUS: f64 = 185.0;
pub const WEDGE_OVERLAP: f64 = 0.1; // degrees, hides seams between neighbours
pub const CONTENT_RADIUS: f64 = 120.0;
pub const CENTER_RADIUS: f64 = 28.0;
pub const MIN_SLICES: usize = 3;
pub const BOUNCE_DISTANCE: f64 = 8.0;
pub const MENU_ROTATION: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn polar(origin: f64, radius: f64, degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self::new(origin + radius * rad.cos(), origin + radius * rad.sin())
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Never lay out fewer than three wedges, a one or two item menu would otherwise be a
/// half circle.
pub fn effective_slice_count(item_count: usize) -> usize {
    item_count.max(MIN_SLICES)
}

pub fn slice_angle(item_count: usize) -> f64 {
    360.0 / effective_slice_count(item_count) as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceGeometry {
    pub index: usize,
    /// Angular width of every wedge, in degrees.
    pub slice_angle: f64,
    /// Rotation of this slice's frame about the centre, in degrees.
    pub rotation: f64,
    pub inner_start: Point,
    pub outer_start: Point,
    pub outer_end: Point,
    pub inner_end: Point,
    /// Where the icon and label are centred, in the slice frame.
    pub anchor: Point,
    /// Displacement applied to the hovered slice.
    pub bounce: Point,
}

impl SliceGeometry {
    pub fn calculate(item_count: usize, index: usize) -> Self {
        let slice_angle = slice_angle(item_count);
        let (start, end) = (-WEDGE_OVERLAP, slice_angle + WEDGE_OVERLAP);
        let mid = (slice_angle / 2.0).to_radians();

        Self {
            index,
            slice_angle,
            rotation: -(index as f64 * slice_angle),
            inner_start: Point::polar(VIEWBOX_CENTER, INNER_RADIUS, start),
            outer_start: Point::polar(VIEWBOX_CENTER, OUTER_RADIUS, start),
            outer_end: Point::polar(VIEWBOX_CENTER, OUTER_RADIUS, end),
            inner_end: Point::polar(VIEWBOX_CENTER, INNER_RADIUS, end),
            anchor: Point::polar(VIEWBOX_CENTER, CONTENT_RADIUS, slice_angle / 2.0),
            bounce: Point::new(BOUNCE_DISTANCE * mid.cos(), BOUNCE_DISTANCE * mid.sin()),
        }
    }

    pub fn layout(item_count: usize) -> Vec<Self> {
        (0..item_count)
            .map(|i| Self::calculate(item_count, i))
            .collect()
    }

    pub fn start_angle(&self) -> f64 {
        -WEDGE_OVERLAP
    }

    pub fn end_angle(&self) -> f64 {
        self.slice_angle + WEDGE_OVERLAP
    }

    /// Rotation that turns slice content upright again once the slice frame and the
    /// menu rotation are applied.
    pub fn content_rotation(&self) -> f64 {
        -self.rotation - MENU_ROTATION
    }

    /// Direction of the slice bisector as seen on screen, in degrees.
    pub fn screen_bisector(&self) -> f64 {
        self.rotation + self.slice_angle / 2.0 + MENU_ROTATION
    }

    /// Wedge outline in drawing order: out along the start edge, clockwise along the outer
    /// rim, back along the end edge, then counter-clockwise along the inner rim.
    pub fn outline(&self) -> [PathSegment; 6] {
        let (start, end) = (self.start_angle(), self.end_angle());
        [
            PathSegment::MoveTo(self.inner_start),
            PathSegment::LineTo(self.outer_start),
            PathSegment::Arc {
                radius: OUTER_RADIUS,
                from: start,
                to: end,
            },
            PathSegment::LineTo(self.inner_end),
            PathSegment::Arc {
                radius: INNER_RADIUS,
                from: end,
                to: start,
            },
            PathSegment::Close,
        ]
    }

    /// SVG path data for [`Self::outline`].
    pub fn path_data(&self) -> String {
        self.outline()
            .iter()
            .map(PathSegment::to_svg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    /// Arc about the view box centre. Angles in degrees; `from < to` sweeps clockwise on screen.
    Arc { radius: f64, from: f64, to: f64 },
    Close,
}

impl PathSegment {
    pub fn to_svg(&self) -> String {
        match *self {
            Self::MoveTo(p) => format!("M {} {}", p.x, p.y),
            Self::LineTo(p) => format!("L {} {}", p.x, p.y),
            Self::Arc { radius, from, to } => {
                let end = Point::polar(VIEWBOX_CENTER, radius, to);
                let large_arc = u8::from((to - from).abs() > 180.0);
                let sweep = u8::from(to > from);
                format!(
                    "A {radius} {radius} 0 {large_arc} {sweep} {} {}",
                    end.x, end.y
                )
            }
            Self::Close => "Z".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Center,
    Slice(usize),
    None,
}

/// Resolves a pointer offset from the menu centre (view-box units, screen orientation) to the
/// control under it.
pub fn hit_test(item_count: usize, offset: Point) -> Hit {
    let distance = offset.length();
    if distance <= CENTER_RADIUS {
        return Hit::Center;
    }
    if item_count == 0 || !(INNER_RADIUS..=OUTER_RADIUS).contains(&distance) {
        return Hit::None;
    }

    let angle = slice_angle(item_count);
    let frame_angle = offset.y.atan2(offset.x).to_degrees() - MENU_ROTATION;
    let index = ((angle - frame_angle).rem_euclid(360.0) / angle) as usize;

    if index < item_count {
        Hit::Slice(index)
    } else {
        Hit::None
    }
}
