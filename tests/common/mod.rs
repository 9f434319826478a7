//! Synthetic ZIP archives for tests.
//!
//! Builds minimal but structurally correct archives: local file headers,
//! central directory, EOCD with optional comment, real CRCs, and both stored
//! and deflated entries.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

#[derive(Default)]
pub struct ZipBuilder {
    data: Vec<u8>,
    cd: Vec<u8>,
    count: u16,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory marker entry.
    pub fn dir(self, name: &str) -> Self {
        assert!(name.ends_with('/'), "directory names must end with '/'");
        self.add(name, &[], 0, Vec::new())
    }

    /// Add a stored (uncompressed) entry.
    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.add(name, data, 0, data.to_vec())
    }

    /// Add a deflate-compressed entry.
    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        let mut encoder =
            flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        let raw = encoder.finish().unwrap();
        self.add(name, data, 8, raw)
    }

    /// Set the archive's trailing comment, pushing the EOCD record away from
    /// its fixed-offset fast path.
    pub fn comment(mut self, text: &str) -> Self {
        self.comment = text.as_bytes().to_vec();
        self
    }

    fn add(mut self, name: &str, uncompressed: &[u8], method: u16, raw: Vec<u8>) -> Self {
        let header_offset = self.data.len() as u32;
        let crc = crc32(uncompressed);
        let name_bytes = name.as_bytes();

        // Local file header
        let out = &mut self.data;
        out.extend_from_slice(b"PK\x03\x04");
        out.write_u16::<LittleEndian>(20).unwrap(); // version needed
        out.write_u16::<LittleEndian>(0).unwrap(); // flags
        out.write_u16::<LittleEndian>(method).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // mod time
        out.write_u16::<LittleEndian>(0).unwrap(); // mod date
        out.write_u32::<LittleEndian>(crc).unwrap();
        out.write_u32::<LittleEndian>(raw.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(uncompressed.len() as u32).unwrap();
        out.write_u16::<LittleEndian>(name_bytes.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap(); // extra len
        out.extend_from_slice(name_bytes);
        out.extend_from_slice(&raw);

        // Central directory file header
        let cd = &mut self.cd;
        cd.extend_from_slice(b"PK\x01\x02");
        cd.write_u16::<LittleEndian>(20).unwrap(); // version made by
        cd.write_u16::<LittleEndian>(20).unwrap(); // version needed
        cd.write_u16::<LittleEndian>(0).unwrap(); // flags
        cd.write_u16::<LittleEndian>(method).unwrap();
        cd.write_u16::<LittleEndian>(0).unwrap(); // mod time
        cd.write_u16::<LittleEndian>(0).unwrap(); // mod date
        cd.write_u32::<LittleEndian>(crc).unwrap();
        cd.write_u32::<LittleEndian>(raw.len() as u32).unwrap();
        cd.write_u32::<LittleEndian>(uncompressed.len() as u32).unwrap();
        cd.write_u16::<LittleEndian>(name_bytes.len() as u16).unwrap();
        cd.write_u16::<LittleEndian>(0).unwrap(); // extra len
        cd.write_u16::<LittleEndian>(0).unwrap(); // comment len
        cd.write_u16::<LittleEndian>(0).unwrap(); // disk number start
        cd.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        cd.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        cd.write_u32::<LittleEndian>(header_offset).unwrap();
        cd.extend_from_slice(name_bytes);

        self.count += 1;
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        let cd_offset = self.data.len() as u32;
        let cd_size = self.cd.len() as u32;
        self.data.extend_from_slice(&self.cd);

        let out = &mut self.data;
        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap(); // disk number
        out.write_u16::<LittleEndian>(0).unwrap(); // disk with cd
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u32::<LittleEndian>(cd_size).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);

        self.data
    }
}

/// A one-symbol dependency archive: a jar containing `<symbol>.class`.
pub fn dependency_jar(symbol: &str) -> Vec<u8> {
    ZipBuilder::new()
        .stored(&format!("{symbol}.class"), format!("bytecode of {symbol}").as_bytes())
        .build()
}
