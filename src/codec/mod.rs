//! Import and export of a canvas's active frame.
//!
//! Importing replaces the canvas size and the active frame's cells;
//! exporting serializes the active frame. Formats are named by string
//! keys at the boundary and parsed into [`ImportFormat`] and
//! [`ExportFormat`].

mod export;
mod import;

use std::path::Path;

use log::debug;

use crate::canvas::Canvas;
use crate::error::Result;
use export::Flavor;

strategy! {
    /// Formats understood by [`Canvas::import_memory`].
    ImportFormat, "import", default = Auto {
        #[default]
        Auto => ("", "autodetect"),
        Text => ("text", "plain text"),
        Ansi => ("ansi", "ANSI coloured text (CP437)"),
        Utf8 => ("utf8", "UTF-8 text with ANSI escape codes"),
    }
}

strategy! {
    /// Formats produced by [`Canvas::export_memory`].
    ExportFormat, "export", default = Utf8 {
        Text => ("text", "plain text"),
        Ansi => ("ansi", "ANSI (CP437)"),
        #[default]
        Utf8 => ("utf8", "UTF-8 with ANSI escape codes"),
        Utf8Cr => ("utf8cr", "UTF-8 with ANSI escape codes and MS-DOS \\r"),
    }
}

impl ImportFormat {
    /// Guess the format of `data`: escape codes mean ANSI, and UTF-8
    /// when non-ASCII bytes decode as UTF-8; anything else is text.
    pub fn detect(data: &[u8]) -> Self {
        if !data.windows(2).any(|w| w == b"\x1b[") {
            return Self::Text;
        }
        if !data.is_ascii() && std::str::from_utf8(data).is_ok() {
            Self::Utf8
        } else {
            Self::Ansi
        }
    }
}

/// Available import formats as `(key, description)` pairs.
pub fn import_list() -> Vec<(&'static str, &'static str)> {
    ImportFormat::list()
}

/// Available export formats as `(key, description)` pairs.
pub fn export_list() -> Vec<(&'static str, &'static str)> {
    ExportFormat::list()
}

impl Canvas {
    /// Replace the canvas contents with `data` in the format named by
    /// `format` (`""` autodetects). Returns the number of bytes used.
    ///
    /// # Errors
    /// [`Error::InvalidOption`](crate::Error::InvalidOption) for an unknown
    /// format, [`Error::Busy`](crate::Error::Busy) while a display is
    /// attached, [`Error::InvalidSize`](crate::Error::InvalidSize) if the
    /// content exceeds the canvas limits.
    pub fn import_memory(&mut self, data: &[u8], format: &str) -> Result<usize> {
        self.import(data, format.parse()?)
    }

    /// Typed form of [`Canvas::import_memory`].
    ///
    /// # Errors
    /// As [`Canvas::import_memory`].
    pub fn import(&mut self, data: &[u8], format: ImportFormat) -> Result<usize> {
        let format = match format {
            ImportFormat::Auto => ImportFormat::detect(data),
            explicit => explicit,
        };
        debug!("import {} bytes as {format:?}", data.len());
        match format {
            ImportFormat::Auto | ImportFormat::Text => import::text(self, data),
            ImportFormat::Ansi => import::terminal(self, data, true),
            ImportFormat::Utf8 => import::terminal(self, data, false),
        }
    }

    /// Read a file and import it as with [`Canvas::import_memory`].
    ///
    /// # Errors
    /// [`Error::Io`](crate::Error::Io) if the file cannot be read, then as
    /// [`Canvas::import_memory`].
    pub fn import_file(&mut self, path: impl AsRef<Path>, format: &str) -> Result<usize> {
        let format = format.parse()?;
        let data = std::fs::read(path)?;
        self.import(&data, format)
    }

    /// Serialize the active frame in the format named by `format`.
    ///
    /// # Errors
    /// [`Error::InvalidOption`](crate::Error::InvalidOption) for an unknown
    /// format.
    pub fn export_memory(&self, format: &str) -> Result<Vec<u8>> {
        Ok(self.export(format.parse()?))
    }

    /// Typed form of [`Canvas::export_memory`].
    pub fn export(&self, format: ExportFormat) -> Vec<u8> {
        match format {
            ExportFormat::Text => export::text(self),
            ExportFormat::Ansi => export::ansi(self, Flavor::Cp437, b"\r\n"),
            ExportFormat::Utf8 => export::ansi(self, Flavor::Utf8, b"\n"),
            ExportFormat::Utf8Cr => export::ansi(self, Flavor::Utf8, b"\r\n"),
        }
    }
}
