//! Integer rasterization routines.
//!
//! Every routine visits the cells a shape touches and hands them to a
//! plot callback. The callbacks decide what to write; the canvas drawing
//! methods in `draw.rs` are thin wrappers around these.

/// Outcode bits for Cohen-Sutherland clipping.
const LEFT: u8 = 1 << 0;
const RIGHT: u8 = 1 << 1;
const TOP: u8 = 1 << 2;
const BOTTOM: u8 = 1 << 3;

/// A line segment in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Segment {
    pub(crate) fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: i64::from(x1),
            y1: i64::from(y1),
            x2: i64::from(x2),
            y2: i64::from(y2),
        }
    }

    const fn swapped(self) -> Self {
        Self {
            x1: self.x2,
            y1: self.y2,
            x2: self.x1,
            y2: self.y1,
        }
    }
}

const fn outcode(x: i64, y: i64, width: i64, height: i64) -> u8 {
    let mut bits = 0;
    if x < 0 {
        bits |= LEFT;
    } else if x >= width {
        bits |= RIGHT;
    }
    if y < 0 {
        bits |= TOP;
    } else if y >= height {
        bits |= BOTTOM;
    }
    bits
}

/// Clip a segment to a `width` x `height` area.
///
/// Returns `None` when no part of the segment is visible. Endpoint order
/// may be swapped in the result.
pub(crate) fn clip(seg: Segment, width: u32, height: u32) -> Option<Segment> {
    let (w, h) = (i64::from(width), i64::from(height));
    if w == 0 || h == 0 {
        return None;
    }

    let mut s = seg;
    // Each pass moves one endpoint onto a clip edge.
    for _ in 0..16 {
        let bits1 = outcode(s.x1, s.y1, w, h);
        let bits2 = outcode(s.x2, s.y2, w, h);

        if bits1 & bits2 != 0 {
            return None;
        }
        if bits1 == 0 {
            if bits2 == 0 {
                return Some(s);
            }
            s = s.swapped();
            continue;
        }

        if bits1 & LEFT != 0 {
            s.y1 = s.y2 - s.x2 * (s.y2 - s.y1) / (s.x2 - s.x1);
            s.x1 = 0;
        } else if bits1 & RIGHT != 0 {
            let xmax = w - 1;
            s.y1 = s.y2 - (s.x2 - xmax) * (s.y2 - s.y1) / (s.x2 - s.x1);
            s.x1 = xmax;
        } else if bits1 & TOP != 0 {
            s.x1 = s.x2 - s.y2 * (s.x2 - s.x1) / (s.y2 - s.y1);
            s.y1 = 0;
        } else {
            let ymax = h - 1;
            s.x1 = s.x2 - (s.y2 - ymax) * (s.x2 - s.x1) / (s.y2 - s.y1);
            s.y1 = ymax;
        }
    }

    let visible = outcode(s.x1, s.y1, w, h) | outcode(s.x2, s.y2, w, h) == 0;
    visible.then_some(s)
}

/// Bresenham line between the endpoints of an already clipped segment.
pub(crate) fn line(seg: Segment, mut plot: impl FnMut(i32, i32)) {
    let (mut x, mut y) = (seg.x1, seg.y1);
    let mut dx = (seg.x2 - seg.x1).abs();
    let mut dy = (seg.y2 - seg.y1).abs();
    let xinc = if seg.x1 > seg.x2 { -1 } else { 1 };
    let yinc = if seg.y1 > seg.y2 { -1 } else { 1 };

    if dx >= dy {
        let dpr = dy << 1;
        let dpru = dpr - (dx << 1);
        let mut delta = dpr - dx;
        while dx >= 0 {
            plot(x as i32, y as i32);
            if delta > 0 {
                y += yinc;
                delta += dpru;
            } else {
                delta += dpr;
            }
            x += xinc;
            dx -= 1;
        }
    } else {
        let dpr = dx << 1;
        let dpru = dpr - (dy << 1);
        let mut delta = dpr - dy;
        while dy >= 0 {
            plot(x as i32, y as i32);
            if delta > 0 {
                x += xinc;
                delta += dpru;
            } else {
                delta += dpr;
            }
            y += yinc;
            dy -= 1;
        }
    }
}

/// ASCII-art line: `-` and `|` for straight runs, `,` `'` `` ` `` `.`
/// where the line steps.
pub(crate) fn thin_line(seg: Segment, mut plot: impl FnMut(i32, i32, char)) {
    let rising = seg.y1 > seg.y2;
    let (charmap_x, mut x, mut y, x2, y2) = if seg.x2 >= seg.x1 {
        let map = if rising { [',', '\''] } else { ['`', '.'] };
        (map, seg.x1, seg.y1, seg.x2, seg.y2)
    } else {
        let map = if rising { ['`', ','] } else { ['.', '\''] };
        (map, seg.x2, seg.y2, seg.x1, seg.y1)
    };

    let mut dx = (x2 - x).abs();
    let mut dy = (y2 - y).abs();
    let (charmap_y, yinc) = if y > y2 {
        ([',', '\''], -1)
    } else {
        (['`', '.'], 1)
    };

    if dx >= dy {
        let dpr = dy << 1;
        let dpru = dpr - (dx << 1);
        let mut delta = dpr - dx;
        let mut stepped = false;
        while dx >= 0 {
            if delta > 0 {
                plot(x as i32, y as i32, charmap_y[1]);
                y += yinc;
                delta += dpru;
                stepped = true;
            } else {
                plot(x as i32, y as i32, if stepped { charmap_y[0] } else { '-' });
                delta += dpr;
                stepped = false;
            }
            x += 1;
            dx -= 1;
        }
    } else {
        let dpr = dx << 1;
        let dpru = dpr - (dy << 1);
        let mut delta = dpr - dy;
        while dy >= 0 {
            if delta > 0 {
                plot(x as i32, y as i32, charmap_x[0]);
                plot(x as i32 + 1, y as i32, charmap_x[1]);
                x += 1;
                delta += dpru;
            } else {
                plot(x as i32, y as i32, '|');
                delta += dpr;
            }
            y += yinc;
            dy -= 1;
        }
    }
}

/// Bresenham circle of radius `r`. Visits first-octant offsets `(dx, dy)`
/// together with their mirror `(dy, dx)`; callers expand the four
/// quadrants.
pub(crate) fn circle(r: i32, mut plot: impl FnMut(i32, i32)) {
    let r = r.abs();
    let (mut dx, mut dy, mut test) = (0, r, 0);
    while dx <= dy {
        plot(dx, dy);
        plot(dy, dx);
        if test > 0 {
            test += dx - dy;
            dy -= 1;
        } else {
            test += dx;
        }
        dx += 1;
    }
}

/// Midpoint ellipse with semi-axes `a` and `b`. Visits first-quadrant
/// offsets `(x, y)` in order from the top of the ellipse to its side.
pub(crate) fn ellipse(a: i32, b: i32, mut plot: impl FnMut(i32, i32)) {
    ellipse_walk(a, b, |x, y, _| plot(x, y));
}

/// Horizontal spans covering a filled ellipse. Visits `(half_width, dy)`:
/// the span from `-half_width` to `half_width` on rows `dy` and `-dy`.
pub(crate) fn ellipse_spans(a: i32, b: i32, mut span: impl FnMut(i32, i32)) {
    ellipse_walk(a, b, |x, y, widest| {
        if widest {
            span(x, y);
        }
    });
}

/// Shared midpoint walk. The third callback argument is true when the
/// point is the widest one on its row.
fn ellipse_walk(a: i32, b: i32, mut visit: impl FnMut(i32, i32, bool)) {
    let a2 = i64::from(a) * i64::from(a);
    let b2 = i64::from(b) * i64::from(b);
    let (mut x, mut y) = (0_i64, i64::from(b.abs()));
    let mut d1 = b2 - a2 * y + a2 / 4;

    let mut prev = (x, y);

    while a2 * y - a2 / 2 > b2 * (x + 1) {
        if d1 < 0 {
            d1 += b2 * (2 * x + 1);
        } else {
            d1 += b2 * (2 * x) + a2 * (-2 * y + 2);
            y -= 1;
        }
        x += 1;
        visit(prev.0 as i32, prev.1 as i32, prev.1 != y);
        prev = (x, y);
    }

    let mut d2 = b2 * (2 * x + 1) * (2 * x + 1) / 4 + a2 * (y - 1) * (y - 1) - a2 * b2;
    while y > 0 {
        if d2 < 0 {
            d2 += b2 * (2 * x + 2) + a2 * (-2 * y + 3);
            x += 1;
        } else {
            d2 += a2 * (-2 * y + 3);
        }
        y -= 1;
        visit(prev.0 as i32, prev.1 as i32, true);
        prev = (x, y);
    }
    visit(prev.0 as i32, prev.1 as i32, true);
}

/// Scanline spans covering a filled triangle, clipped to `width` x
/// `height`. Visits `(y, x_start, x_end)` with `x_end` exclusive.
pub(crate) fn triangle_spans(
    points: [(i32, i32); 3],
    width: u32,
    height: u32,
    mut span: impl FnMut(i32, i32, i32),
) {
    const ONE: i64 = 0x10000;

    let mut pts = points.map(|(x, y)| (i64::from(x), i64::from(y)));
    pts.sort_by_key(|p| p.1);
    let [(x1, y1), (x2, y2), (x3, y3)] = pts;

    let slope = |xa: i64, ya: i64, xb: i64, yb: i64| {
        if ya == yb {
            0
        } else {
            (xb - xa) * ONE / (yb - ya)
        }
    };
    let sl21 = slope(x1, y1, x2, y2);
    let sl31 = slope(x1, y1, x3, y3);
    let sl32 = slope(x2, y2, x3, y3);

    let (x1, x2, x3) = (x1 * ONE, x2 * ONE, x3 * ONE);
    let (w, h) = (i64::from(width), i64::from(height));

    let ymin = y1.max(0);
    let ymax = (y3 + 1).min(h);

    let (mut xa, mut xb) = match ymin.cmp(&y2) {
        std::cmp::Ordering::Less => (x1 + sl21 * (ymin - y1), x1 + sl31 * (ymin - y1)),
        std::cmp::Ordering::Equal => (x2, if y1 == y3 { x3 } else { x1 + sl31 * (ymin - y1) }),
        std::cmp::Ordering::Greater => (x3 + sl32 * (ymin - y3), x3 + sl31 * (ymin - y3)),
    };

    for y in ymin..ymax {
        let (lo, hi) = if xa < xb { (xa, xb) } else { (xb, xa) };
        let xx1 = (lo + 0x800).div_euclid(ONE);
        let xx2 = (hi + 0x801).div_euclid(ONE);

        let start = xx1.max(0);
        let end = (xx2 + 1).min(w);
        if start < end {
            span(y as i32, start as i32, end as i32);
        }

        xa += if y < y2 { sl21 } else { sl32 };
        xb += sl31;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect_line(seg: Segment) -> Vec<(i32, i32)> {
        let mut pts = Vec::new();
        line(seg, |x, y| pts.push((x, y)));
        pts
    }

    #[test]
    fn test_clip_inside_is_untouched() {
        let seg = Segment::new(1, 1, 5, 3);
        assert_eq!(clip(seg, 10, 10), Some(seg));
    }

    #[test]
    fn test_clip_outside() {
        assert_eq!(clip(Segment::new(-5, -5, -1, -1), 10, 10), None);
        assert_eq!(clip(Segment::new(0, 0, 3, 3), 0, 0), None);
    }

    #[test]
    fn test_clip_crossing() {
        let s = clip(Segment::new(-10, 2, 20, 2), 10, 5).unwrap();
        let xs = [s.x1, s.x2];
        assert!(xs.contains(&0));
        assert!(xs.contains(&9));
        assert_eq!((s.y1, s.y2), (2, 2));
    }

    #[test]
    fn test_horizontal_line() {
        assert_eq!(
            collect_line(Segment::new(0, 0, 3, 0)),
            vec![(0, 0), (1, 0), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn test_diagonal_line() {
        assert_eq!(
            collect_line(Segment::new(2, 2, 0, 0)),
            vec![(2, 2), (1, 1), (0, 0)]
        );
    }

    #[test]
    fn test_steep_line_is_connected() {
        let pts = collect_line(Segment::new(0, 0, 2, 7));
        assert_eq!(pts.len(), 8);
        for pair in pts.windows(2) {
            assert_eq!(pair[1].1 - pair[0].1, 1);
            assert!((pair[1].0 - pair[0].0).abs() <= 1);
        }
    }

    #[test]
    fn test_thin_line_horizontal() {
        let mut out = Vec::new();
        thin_line(Segment::new(0, 0, 3, 0), |x, y, c| out.push((x, y, c)));
        assert_eq!(out, vec![(0, 0, '-'), (1, 0, '-'), (2, 0, '-'), (3, 0, '-')]);
    }

    #[test]
    fn test_thin_line_vertical() {
        let mut out = Vec::new();
        thin_line(Segment::new(1, 0, 1, 2), |x, y, c| out.push((x, y, c)));
        assert_eq!(out, vec![(1, 0, '|'), (1, 1, '|'), (1, 2, '|')]);
    }

    #[test]
    fn test_circle_points_on_radius() {
        let mut pts = Vec::new();
        circle(5, |dx, dy| pts.push((dx, dy)));
        assert!(pts.contains(&(0, 5)));
        assert!(pts.contains(&(5, 0)));
        for (dx, dy) in pts {
            let d2 = dx * dx + dy * dy;
            assert!((16..=36).contains(&d2), "({dx}, {dy}) off the circle");
        }
    }

    #[test]
    fn test_ellipse_reaches_axes() {
        let mut pts = HashSet::new();
        ellipse(6, 3, |x, y| {
            pts.insert((x, y));
        });
        assert!(pts.contains(&(0, 3)));
        assert!(pts.contains(&(6, 0)));
    }

    #[test]
    fn test_ellipse_spans_one_per_row() {
        let mut rows = Vec::new();
        ellipse_spans(6, 3, |x, y| rows.push((x, y)));
        let ys: Vec<i32> = rows.iter().map(|r| r.1).collect();
        assert_eq!(ys, vec![3, 2, 1, 0]);
        assert_eq!(rows.last(), Some(&(6, 0)));
        for pair in rows.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }

    #[test]
    fn test_triangle_spans() {
        let mut spans = Vec::new();
        triangle_spans([(0, 0), (4, 4), (0, 4)], 10, 10, |y, a, b| spans.push((y, a, b)));
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[0], (0, 0, 1));
        assert_eq!(spans[4], (4, 0, 5));
    }

    #[test]
    fn test_triangle_spans_clipped() {
        let mut spans = Vec::new();
        triangle_spans([(-5, -5), (20, 2), (2, 20)], 4, 3, |y, a, b| spans.push((y, a, b)));
        assert!(spans.iter().all(|&(y, a, b)| (0..3).contains(&y) && a >= 0 && b <= 4));
    }
}
