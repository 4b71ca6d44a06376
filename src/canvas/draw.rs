//! Drawing primitives.
//!
//! All primitives write the given glyph with the current attribute and
//! silently clip at the canvas edges.

use super::raster::{self, Segment};
use super::Canvas;

const THIN_BOX: [char; 6] = ['-', '|', ',', '`', '.', '\''];
const CP437_BOX: [char; 6] = ['─', '│', '┌', '└', '┐', '┘'];

/// Normalized inclusive corners of a box given as origin and extent.
/// Negative extents grow to the left or upwards.
fn box_corners(x: i32, y: i32, w: i32, h: i32) -> Option<(i32, i32, i32, i32)> {
    if w == 0 || h == 0 {
        return None;
    }
    let x2 = x.saturating_add(if w > 0 { w - 1 } else { w + 1 });
    let y2 = y.saturating_add(if h > 0 { h - 1 } else { h + 1 });
    Some((x.min(x2), y.min(y2), x.max(x2), y.max(y2)))
}

impl Canvas {
    fn plot(&mut self, x: i32, y: i32, ch: char) {
        self.put_char(x, y, ch as u32);
    }

    fn plot4(&mut self, xo: i32, yo: i32, dx: i32, dy: i32, ch: char) {
        let (left, right) = (xo.saturating_sub(dx), xo.saturating_add(dx));
        let (top, bottom) = (yo.saturating_sub(dy), yo.saturating_add(dy));
        self.plot(right, bottom, ch);
        self.plot(left, bottom, ch);
        self.plot(right, top, ch);
        self.plot(left, top, ch);
    }

    fn hline(&mut self, x1: i32, x2: i32, y: i32, ch: char) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let start = x1.min(x2).max(0);
        let end = x1.max(x2).min(self.width as i32 - 1);
        let mut x = start;
        while x <= end {
            x += self.put_char(x, y, ch as u32) as i32;
        }
    }

    /// Draw a line with the given glyph.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, ch: char) {
        if let Some(seg) = raster::clip(Segment::new(x1, y1, x2, y2), self.width, self.height) {
            raster::line(seg, |x, y| self.plot(x, y, ch));
        }
    }

    /// Draw connected line segments through `points`.
    pub fn draw_polyline(&mut self, points: &[(i32, i32)], ch: char) {
        for pair in points.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            self.draw_line(x1, y1, x2, y2, ch);
        }
    }

    /// Draw a line with ASCII art characters.
    pub fn draw_thin_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if let Some(seg) = raster::clip(Segment::new(x1, y1, x2, y2), self.width, self.height) {
            raster::thin_line(seg, |x, y, ch| self.plot(x, y, ch));
        }
    }

    /// Draw connected ASCII art line segments through `points`.
    pub fn draw_thin_polyline(&mut self, points: &[(i32, i32)]) {
        for pair in points.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            self.draw_thin_line(x1, y1, x2, y2);
        }
    }

    /// Draw a circle outline.
    pub fn draw_circle(&mut self, x: i32, y: i32, r: i32, ch: char) {
        raster::circle(r, |dx, dy| self.plot4(x, y, dx, dy, ch));
    }

    /// Draw an ellipse outline with semi-axes `a` and `b`.
    pub fn draw_ellipse(&mut self, x: i32, y: i32, a: i32, b: i32, ch: char) {
        raster::ellipse(a, b, |dx, dy| self.plot4(x, y, dx, dy, ch));
    }

    /// Draw an ellipse outline with ASCII art characters.
    pub fn draw_thin_ellipse(&mut self, x: i32, y: i32, a: i32, b: i32) {
        let a2 = i64::from(a) * i64::from(a);
        let b2 = i64::from(b) * i64::from(b);
        raster::ellipse(a, b, |dx, dy| {
            let (px, py) = (i64::from(dx), i64::from(dy));
            let (down, up) = if 2 * b2 * px < a2 * py {
                ('-', '-')
            } else if b2 * px > 2 * a2 * py {
                ('|', '|')
            } else {
                ('/', '\\')
            };
            let (left, right) = (x.saturating_sub(dx), x.saturating_add(dx));
            let (top, bottom) = (y.saturating_sub(dy), y.saturating_add(dy));
            self.plot(right, bottom, down);
            self.plot(left, bottom, up);
            self.plot(right, top, up);
            self.plot(left, top, down);
        });
    }

    /// Fill an ellipse.
    pub fn fill_ellipse(&mut self, x: i32, y: i32, a: i32, b: i32, ch: char) {
        raster::ellipse_spans(a, b, |dx, dy| {
            let (left, right) = (x.saturating_sub(dx), x.saturating_add(dx));
            self.hline(left, right, y.saturating_sub(dy), ch);
            if dy != 0 {
                self.hline(left, right, y.saturating_add(dy), ch);
            }
        });
    }

    /// Draw a box outline. `w` and `h` may be negative.
    pub fn draw_box(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char) {
        let Some((x1, y1, x2, y2)) = box_corners(x, y, w, h) else {
            return;
        };
        self.draw_line(x1, y1, x1, y2, ch);
        self.draw_line(x1, y2, x2, y2, ch);
        self.draw_line(x2, y2, x2, y1, ch);
        self.draw_line(x2, y1, x1, y1, ch);
    }

    /// Draw a box outline with ASCII art characters.
    pub fn draw_thin_box(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.draw_box_chars(x, y, w, h, THIN_BOX);
    }

    /// Draw a box outline with CP437 line drawing characters.
    pub fn draw_cp437_box(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.draw_box_chars(x, y, w, h, CP437_BOX);
    }

    /// `chars`: horizontal, vertical, then the top-left, bottom-left,
    /// top-right and bottom-right corners.
    fn draw_box_chars(&mut self, x: i32, y: i32, w: i32, h: i32, chars: [char; 6]) {
        let Some((x1, y1, x2, y2)) = box_corners(x, y, w, h) else {
            return;
        };
        let (xmax, ymax) = (self.width as i32 - 1, self.height as i32 - 1);
        if x2 < 0 || y2 < 0 || x1 > xmax || y1 > ymax {
            return;
        }

        for i in (x1 + 1).max(0)..x2.min(xmax + 1) {
            self.plot(i, y1, chars[0]);
            self.plot(i, y2, chars[0]);
        }
        for j in (y1 + 1).max(0)..y2.min(ymax + 1) {
            self.plot(x1, j, chars[1]);
            self.plot(x2, j, chars[1]);
        }

        self.plot(x1, y1, chars[2]);
        self.plot(x1, y2, chars[3]);
        self.plot(x2, y1, chars[4]);
        self.plot(x2, y2, chars[5]);
    }

    /// Fill a box. `w` and `h` may be negative.
    pub fn fill_box(&mut self, x: i32, y: i32, w: i32, h: i32, ch: char) {
        let Some((x1, y1, x2, y2)) = box_corners(x, y, w, h) else {
            return;
        };
        for j in y1.max(0)..=y2.min(self.height as i32 - 1) {
            self.hline(x1, x2, j, ch);
        }
    }

    /// Draw a triangle outline.
    pub fn draw_triangle(&mut self, points: [(i32, i32); 3], ch: char) {
        let [a, b, c] = points;
        self.draw_polyline(&[a, b, c, a], ch);
    }

    /// Draw a triangle outline with ASCII art characters.
    pub fn draw_thin_triangle(&mut self, points: [(i32, i32); 3]) {
        let [a, b, c] = points;
        self.draw_thin_polyline(&[a, b, c, a]);
    }

    /// Fill a triangle.
    pub fn fill_triangle(&mut self, points: [(i32, i32); 3], ch: char) {
        let (w, h) = (self.width, self.height);
        raster::triangle_spans(points, w, h, |y, x1, x2| self.hline(x1, x2 - 1, y, ch));
    }

    /// Fill a triangle with cells sampled from `texture`.
    ///
    /// `uv` gives the texture coordinates of each vertex, in `[0, 1]` on
    /// both axes; each covered cell takes the character and attribute of
    /// the texture cell at its interpolated coordinates.
    pub fn fill_triangle_textured(
        &mut self,
        points: [(i32, i32); 3],
        texture: &Canvas,
        uv: [(f32, f32); 3],
    ) {
        if texture.width == 0 || texture.height == 0 {
            return;
        }
        let [(x1, y1), (x2, y2), (x3, y3)] = points.map(|(x, y)| (f64::from(x), f64::from(y)));
        let denom = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
        if denom == 0.0 {
            return;
        }

        let (tw, th) = (f64::from(texture.width - 1), f64::from(texture.height - 1));
        let saved = self.attr;
        let (w, h) = (self.width, self.height);

        raster::triangle_spans(points, w, h, |y, start, end| {
            let py = f64::from(y);
            for x in start..end {
                let px = f64::from(x);
                let l1 = ((y2 - y3) * (px - x3) + (x3 - x2) * (py - y3)) / denom;
                let l2 = ((y3 - y1) * (px - x3) + (x1 - x3) * (py - y3)) / denom;
                let l3 = 1.0 - l1 - l2;

                let u = l1 * f64::from(uv[0].0) + l2 * f64::from(uv[1].0) + l3 * f64::from(uv[2].0);
                let v = l1 * f64::from(uv[0].1) + l2 * f64::from(uv[1].1) + l3 * f64::from(uv[2].1);
                let tx = (u.clamp(0.0, 1.0) * tw).round() as i32;
                let ty = (v.clamp(0.0, 1.0) * th).round() as i32;

                let cell = texture.cell_at(tx, ty);
                self.attr = cell.attr();
                self.put_char(x, y, cell.ch());
            }
        });

        self.attr = saved;
    }
}
