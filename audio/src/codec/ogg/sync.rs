//! Ogg sync/decoder for reading Ogg streams.

use std::collections::VecDeque;
use std::io::{self, Read};

use super::page::{Page, CAPTURE_PATTERN, HEADER_SIZE};

/// A packet reassembled from one or more pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet payload.
    pub data: Vec<u8>,
    /// Granule position of the page the packet ends on, or -1 if another
    /// packet ends later on that page.
    pub granule_position: i64,
    /// Stream serial number.
    pub serial: u32,
    /// First packet of a beginning-of-stream page.
    pub bos: bool,
    /// Last packet of an end-of-stream page.
    pub eos: bool,
}

/// Ogg sync state for reading pages and packets.
pub struct OggSync<R: Read> {
    reader: R,
    partial: Vec<u8>,
    ready: VecDeque<Packet>,
}

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

impl<R: Read> OggSync<R> {
    /// Creates a new Ogg sync state.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            partial: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    /// Reads until `buf` is full or the reader is exhausted.
    fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    /// Reads the next Ogg page and verifies its checksum.
    ///
    /// Returns `Ok(None)` at a clean end of input.
    pub fn read_page(&mut self) -> io::Result<Option<Page>> {
        let mut header = [0u8; HEADER_SIZE];
        match self.read_full(&mut header)? {
            0 => return Ok(None),
            HEADER_SIZE => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated Ogg page header",
                ));
            }
        }

        if &header[0..4] != CAPTURE_PATTERN {
            return Err(invalid_data("invalid Ogg magic"));
        }
        if header[4] != 0 {
            return Err(invalid_data("unsupported Ogg version"));
        }

        let header_type = header[5];
        let granule_position = i64::from_le_bytes(header[6..14].try_into().unwrap_or_default());
        let serial = u32::from_le_bytes(header[14..18].try_into().unwrap_or_default());
        let sequence = u32::from_le_bytes(header[18..22].try_into().unwrap_or_default());
        let checksum = u32::from_le_bytes(header[22..26].try_into().unwrap_or_default());
        let segments = header[26] as usize;

        let mut segment_table = vec![0u8; segments];
        self.reader.read_exact(&mut segment_table)?;

        let body_size: usize = segment_table.iter().map(|&s| s as usize).sum();
        let mut body = vec![0u8; body_size];
        self.reader.read_exact(&mut body)?;

        let page = Page {
            version: 0,
            header_type,
            granule_position,
            serial,
            sequence,
            checksum,
            segment_table,
            body,
        };

        if page.compute_checksum() != checksum {
            return Err(invalid_data("Ogg page checksum mismatch"));
        }

        Ok(Some(page))
    }

    /// Reads the next complete packet.
    ///
    /// Returns `Ok(None)` at a clean end of input.
    pub fn read_packet(&mut self) -> io::Result<Option<Packet>> {
        loop {
            if let Some(packet) = self.ready.pop_front() {
                return Ok(Some(packet));
            }
            match self.read_page()? {
                Some(page) => self.push_page(page)?,
                None if self.partial.is_empty() => return Ok(None),
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "Ogg stream ends inside a packet",
                    ));
                }
            }
        }
    }

    fn push_page(&mut self, page: Page) -> io::Result<()> {
        if page.is_continuation() && self.partial.is_empty() {
            return Err(invalid_data("continued packet without a start"));
        }
        if !page.is_continuation() && !self.partial.is_empty() {
            return Err(invalid_data("missing Ogg continuation page"));
        }

        let first_ready = self.ready.len();
        let mut offset = 0;
        let mut first_on_page = !page.is_continuation();

        for &lace in &page.segment_table {
            let end = offset + lace as usize;
            self.partial.extend_from_slice(&page.body[offset..end]);
            offset = end;

            if lace < 255 {
                self.ready.push_back(Packet {
                    data: std::mem::take(&mut self.partial),
                    granule_position: -1,
                    serial: page.serial,
                    bos: page.is_bos() && first_on_page,
                    eos: false,
                });
                first_on_page = false;
            }
        }

        if self.ready.len() > first_ready {
            if let Some(last) = self.ready.back_mut() {
                last.granule_position = page.granule_position;
                last.eos = page.is_eos();
            }
        }
        Ok(())
    }

    /// Returns the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
