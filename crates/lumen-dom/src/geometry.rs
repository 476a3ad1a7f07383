//! Geometry APIs
//!
//! DOMRect plus the per-element measurements a layout engine would provide
//! (`getBoundingClientRect`, natural image size, offset size).

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Both dimensions are strictly positive
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Measurements attached to an element by the host's layout
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementGeometry {
    /// Rendered box, if the element has been laid out
    pub bounding: Option<DOMRect>,
    /// Intrinsic size (images)
    pub natural_size: Option<(f64, f64)>,
    /// offsetWidth / offsetHeight
    pub offset_size: Option<(f64, f64)>,
}

impl ElementGeometry {
    /// Best-known rendered size: bounding box, then intrinsic, then offset
    pub fn measured_size(&self) -> Option<(f64, f64)> {
        let positive = |(w, h): (f64, f64)| (w > 0.0 && h > 0.0).then_some((w, h));

        self.bounding
            .filter(DOMRect::has_area)
            .map(|r| (r.width, r.height))
            .or_else(|| self.natural_size.and_then(positive))
            .or_else(|| self.offset_size.and_then(positive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert!(rect.has_area());
        assert!(!DOMRect::new().has_area());
    }

    #[test]
    fn test_measured_size_fallback_order() {
        let mut geometry = ElementGeometry::default();
        assert_eq!(geometry.measured_size(), None);

        geometry.offset_size = Some((40.0, 30.0));
        assert_eq!(geometry.measured_size(), Some((40.0, 30.0)));

        geometry.natural_size = Some((300.0, 200.0));
        assert_eq!(geometry.measured_size(), Some((300.0, 200.0)));

        // Zero-sized layout box falls through to intrinsic size
        geometry.bounding = Some(DOMRect::from_xywh(0.0, 0.0, 0.0, 0.0));
        assert_eq!(geometry.measured_size(), Some((300.0, 200.0)));

        geometry.bounding = Some(DOMRect::from_xywh(0.0, 0.0, 150.0, 100.0));
        assert_eq!(geometry.measured_size(), Some((150.0, 100.0)));
    }
}
