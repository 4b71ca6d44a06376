//! Exporters: plain text and ANSI escape-coded text.
//!
//! Escape-coded output tracks the last emitted attribute per row and
//! writes an SGR sequence only when it changes. Rows end with a reset so
//! every line stands on its own.

use std::io::Write;

use super::import::SGR_ORDER;
use crate::canvas::{Attr, Canvas, Cell, Style};
use crate::charset::{utf32_to_cp437, MAGIC_FULLWIDTH};

/// Character encoding of escape-coded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flavor {
    /// CP437 bytes; bright colours through bold and blink.
    Cp437,
    /// UTF-8; bright colours through the 90-107 SGR range.
    Utf8,
}

/// Plain text: glyphs only, one `\n`-terminated line per row.
pub(super) fn text(canvas: &Canvas) -> Vec<u8> {
    let mut out = Vec::with_capacity(canvas.cells().len() + canvas.height() as usize);
    for row in canvas.active_frame().rows() {
        for cell in row {
            emit_utf8(&mut out, cell);
        }
        out.push(b'\n');
    }
    out
}

/// Escape-coded text ending each row with `newline`.
pub(super) fn ansi(canvas: &Canvas, flavor: Flavor, newline: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(canvas.cells().len() * 4);
    for row in canvas.active_frame().rows() {
        let mut last: Option<Attr> = None;
        for cell in row {
            if cell.ch() == MAGIC_FULLWIDTH {
                continue;
            }
            if last != Some(cell.attr()) {
                emit_sgr(&mut out, cell.attr(), flavor);
                last = Some(cell.attr());
            }
            match flavor {
                Flavor::Cp437 => out.push(utf32_to_cp437(cell.ch())),
                Flavor::Utf8 => emit_utf8(&mut out, cell),
            }
        }
        if last.is_some() {
            out.extend_from_slice(b"\x1b[0m");
        }
        out.extend_from_slice(newline);
    }
    out
}

#[inline]
fn emit_utf8(out: &mut Vec<u8>, cell: &Cell) {
    if cell.ch() == MAGIC_FULLWIDTH {
        return;
    }
    let ch = char::from_u32(cell.ch()).unwrap_or('?');
    let mut buf = [0; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
}

/// Emit a full SGR sequence for `attr`, starting from a reset. Default
/// and transparent colours leave the terminal colour in place.
fn emit_sgr(out: &mut Vec<u8>, attr: Attr, flavor: Flavor) {
    out.extend_from_slice(b"\x1b[0");

    let style = attr.style();
    if style.contains(Style::BOLD) {
        out.extend_from_slice(b";1");
    }
    if style.contains(Style::ITALICS) {
        out.extend_from_slice(b";3");
    }
    if style.contains(Style::UNDERLINE) {
        out.extend_from_slice(b";4");
    }
    if style.contains(Style::BLINK) {
        out.extend_from_slice(b";5");
    }

    if let Some(index) = attr.to_ansi_fg().index() {
        let sgr = SGR_ORDER[usize::from(index % 8)];
        match (flavor, index >= 8) {
            (Flavor::Utf8, true) => {
                let _ = write!(out, ";9{sgr}");
            }
            (Flavor::Cp437, true) => {
                let _ = write!(out, ";1;3{sgr}");
            }
            (_, false) => {
                let _ = write!(out, ";3{sgr}");
            }
        }
    }
    if let Some(index) = attr.to_ansi_bg().index() {
        let sgr = SGR_ORDER[usize::from(index % 8)];
        match (flavor, index >= 8) {
            (Flavor::Utf8, true) => {
                let _ = write!(out, ";10{sgr}");
            }
            (Flavor::Cp437, true) => {
                let _ = write!(out, ";5;4{sgr}");
            }
            (_, false) => {
                let _ = write!(out, ";4{sgr}");
            }
        }
    }

    out.push(b'm');
}
