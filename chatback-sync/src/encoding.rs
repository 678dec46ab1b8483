//! Storage text encoding
//!
//! Comment text is stored in a configurable byte encoding so the local
//! database can be shared with legacy site code that still reads
//! windows-1251 (or similar) directly. UTF-8 is the default and is a plain
//! pass-through. A database must always be opened with the encoding it was
//! written with.

use encoding_rs::{Encoding, UTF_8};

/// Byte encoding applied to converted text columns at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageEncoding {
    encoding: &'static Encoding,
}

impl StorageEncoding {
    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    /// Resolve a WHATWG encoding label ("utf-8", "windows-1251", "koi8-r", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(|encoding| Self { encoding })
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encode one field for storage; unmappable characters become numeric
    /// character references, so the conversion never fails
    pub fn encode_field(&self, text: &str) -> Vec<u8> {
        self.encoding.encode(text).0.into_owned()
    }

    /// Decode one stored field back to UTF-8
    pub fn decode_field(&self, bytes: &[u8]) -> String {
        self.encoding.decode(bytes).0.into_owned()
    }
}

impl Default for StorageEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}
