//! Importers: plain text, and escape-coded text through a VT100 parser.

use std::borrow::Cow;

use log::debug;

use crate::canvas::{AnsiColor, Attr, Canvas, Color, Style};
use crate::charset::{cp437_to_utf32, is_fullwidth, utf32_to_utf8};
use crate::error::Result;

/// Width of an ANSI art screen.
const ANSI_COLUMNS: u16 = 80;

/// DOS end-of-file marker; ANSI art often carries a SAUCE record after it.
const SUB: u8 = 0x1a;

/// SGR colour numbers 0-7 in palette order (black, blue, green, cyan, red,
/// magenta, brown, light gray). The table is its own inverse.
pub(super) const SGR_ORDER: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

/// Resize the canvas and clear its active frame with the default
/// attribute, then run `write`. The caller's attribute is restored.
fn replace_frame(
    canvas: &mut Canvas,
    width: u32,
    height: u32,
    write: impl FnOnce(&mut Canvas),
) -> Result<()> {
    canvas.set_size(width, height)?;
    let saved = canvas.attr();
    canvas.set_attr(Attr::DEFAULT);
    canvas.clear();
    write(canvas);
    canvas.set_attr(saved);
    debug!("imported {width}x{height} cells");
    Ok(())
}

/// Plain text: one row per line, as wide as the widest line.
pub(super) fn text(canvas: &mut Canvas, data: &[u8]) -> Result<usize> {
    let text = String::from_utf8_lossy(data);
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let width = lines
        .iter()
        .map(|line| {
            line.chars()
                .map(|c| if is_fullwidth(c as u32) { 2 } else { 1 })
                .sum::<u32>()
        })
        .max()
        .unwrap_or(0);

    replace_frame(canvas, width, lines.len() as u32, |cv| {
        for (y, line) in lines.iter().enumerate() {
            cv.put_str(0, y as i32, line);
        }
    })?;
    Ok(data.len())
}

/// Text with escape codes. `cp437` selects ANSI art: CP437 bytes, an
/// 80-column screen, bold meaning bright, and input ending at SUB.
pub(super) fn terminal(canvas: &mut Canvas, data: &[u8], cp437: bool) -> Result<usize> {
    let consumed = if cp437 {
        data.iter().position(|&b| b == SUB).unwrap_or(data.len())
    } else {
        data.len()
    };
    let stream = normalize(&data[..consumed], cp437);

    let cols = if cp437 {
        ANSI_COLUMNS
    } else {
        widest_line(&stream)
    };
    let lines = stream.iter().filter(|&&b| b == b'\n').count();
    let rows = (lines + stream.len() / usize::from(cols) + 1).min(usize::from(u16::MAX)) as u16;

    let mut parser = vt100::Parser::new(rows, cols, 0);
    parser.process(&stream);
    let screen = parser.screen();

    let (cursor_row, cursor_col) = screen.cursor_position();
    let mut width = u32::from(cursor_col);
    let mut height = u32::from(cursor_row) + u32::from(cursor_col > 0);
    for row in 0..rows {
        for col in 0..cols {
            let Some(cell) = screen.cell(row, col) else {
                continue;
            };
            if cell.has_contents() || cell.bgcolor() != vt100::Color::Default {
                let span = if cell.is_wide() { 2 } else { 1 };
                width = width.max(u32::from(col) + span);
                height = height.max(u32::from(row) + 1);
            }
        }
    }
    if cp437 {
        width = u32::from(ANSI_COLUMNS);
    }

    replace_frame(canvas, width, height, |cv| {
        for row in 0..height.min(u32::from(rows)) as u16 {
            for col in 0..width.min(u32::from(cols)) as u16 {
                let Some(cell) = screen.cell(row, col) else {
                    continue;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                let ch = cell.contents().chars().next().map_or(u32::from(b' '), u32::from);
                cv.set_attr(cell_attr(cell, cp437));
                cv.put_char(i32::from(col), i32::from(row), ch);
            }
        }
    })?;
    Ok(consumed)
}

/// Decode CP437 when asked and turn lone line feeds into CR LF, so a
/// newline always returns to the first column.
fn normalize(data: &[u8], cp437: bool) -> Cow<'_, [u8]> {
    let lone_lf = data
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'\n' && (i == 0 || data[i - 1] != b'\r'));
    if !cp437 && !lone_lf {
        return Cow::Borrowed(data);
    }

    let mut out = Vec::with_capacity(data.len() + data.len() / 8);
    let mut prev = 0;
    for &b in data {
        if b == b'\n' && prev != b'\r' {
            out.push(b'\r');
        }
        if cp437 && b >= 0x80 {
            let mut buf = [0; 4];
            let n = utf32_to_utf8(cp437_to_utf32(b), &mut buf);
            out.extend_from_slice(&buf[..n]);
        } else {
            out.push(b);
        }
        prev = b;
    }
    Cow::Owned(out)
}

/// Bytes in the longest line: an upper bound on its width in cells.
fn widest_line(data: &[u8]) -> u16 {
    data.split(|&b| b == b'\n')
        .map(<[u8]>::len)
        .max()
        .unwrap_or(0)
        .clamp(1, usize::from(u16::MAX)) as u16
}

fn cell_attr(cell: &vt100::Cell, cp437: bool) -> Attr {
    let mut fg = convert_color(cell.fgcolor(), cp437 && cell.bold());
    let mut bg = convert_color(cell.bgcolor(), false);
    if cell.inverse() {
        std::mem::swap(&mut fg, &mut bg);
    }

    let mut style = Style::empty();
    style.set(Style::BOLD, cell.bold());
    style.set(Style::ITALICS, cell.italic());
    style.set(Style::UNDERLINE, cell.underline());
    Attr::new(fg, bg, style)
}

fn convert_color(color: vt100::Color, bright: bool) -> Color {
    match color {
        vt100::Color::Default => Color::Ansi(AnsiColor::Default),
        vt100::Color::Idx(i) if i < 16 => {
            let mut index = SGR_ORDER[usize::from(i % 8)];
            if i >= 8 || bright {
                index += 8;
            }
            Color::Ansi(AnsiColor::from_index(index).unwrap_or(AnsiColor::Default))
        }
        vt100::Color::Idx(i) => {
            let (r, g, b) = xterm_rgb(i);
            Color::Argb(argb12(r, g, b))
        }
        vt100::Color::Rgb(r, g, b) => Color::Argb(argb12(r, g, b)),
    }
}

const fn argb12(r: u8, g: u8, b: u8) -> u16 {
    0xf000 | (((r >> 4) as u16) << 8) | (((g >> 4) as u16) << 4) | ((b >> 4) as u16)
}

/// RGB of an xterm 256-colour index above 15.
fn xterm_rgb(index: u8) -> (u8, u8, u8) {
    if index >= 232 {
        let v = 8 + (index - 232) * 10;
        return (v, v, v);
    }
    let i = index - 16;
    let level = |c: u8| if c == 0 { 0 } else { 55 + c * 40 };
    (level(i / 36), level((i / 6) % 6), level(i % 6))
}
