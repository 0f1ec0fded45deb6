//! Ogg encoder/writer.

use std::io::{self, Write};
use std::mem;

use super::page::{flags, Page, MAX_SEGMENTS};
use super::stream::StreamState;

/// Body size at which a page of queued packets is closed.
pub const PAGE_FILL_BYTES: usize = 4096;

/// Ogg encoder for writing one logical stream.
///
/// [`write_packet`](Self::write_packet) puts a packet on pages of its own,
/// as header packets require. [`queue_packet`](Self::queue_packet) packs
/// packets together until a page holds [`PAGE_FILL_BYTES`] of body or
/// [`MAX_SEGMENTS`] lacing values; only the last packet completed on a
/// page sets its granule position.
pub struct OggEncoder<W: Write> {
    writer: W,
    state: StreamState,
    segments: Vec<u8>,
    body: Vec<u8>,
    page_granule: i64,
    continued: bool,
}

impl<W: Write> OggEncoder<W> {
    /// Creates a new Ogg encoder.
    pub fn new(writer: W, serial: u32) -> Self {
        Self {
            writer,
            state: StreamState::new(serial),
            segments: Vec::new(),
            body: Vec::new(),
            page_granule: -1,
            continued: false,
        }
    }

    /// Returns the number of pages written so far.
    pub fn pages_written(&self) -> u32 {
        self.state.sequence()
    }

    /// Writes an Ogg page as is.
    pub fn write_page(&mut self, page: &Page) -> io::Result<()> {
        self.writer.write_all(&page.to_bytes())
    }

    /// Writes a packet ending at the absolute `granule_position` on pages
    /// of its own, after any queued packets.
    ///
    /// `is_bos` marks the first page of the stream, `is_eos` the last.
    pub fn write_packet(
        &mut self,
        data: &[u8],
        granule_position: i64,
        is_bos: bool,
        is_eos: bool,
    ) -> io::Result<()> {
        self.flush_page(false)?;

        let lacing = lacing_values(data.len());
        let pages = lacing.chunks(MAX_SEGMENTS).count();

        let mut offset = 0;
        for (i, segments) in lacing.chunks(MAX_SEGMENTS).enumerate() {
            let body_len: usize = segments.iter().map(|&s| s as usize).sum();
            let last = i + 1 == pages;

            let mut header_type = 0u8;
            if i > 0 {
                header_type |= flags::CONTINUATION;
            }
            if is_bos && i == 0 {
                header_type |= flags::BOS;
            }
            if is_eos && last {
                header_type |= flags::EOS;
            }

            let page = Page {
                version: 0,
                header_type,
                granule_position: if last { granule_position } else { -1 },
                serial: self.state.serial(),
                sequence: self.state.next_sequence(),
                checksum: 0, // Will be calculated
                segment_table: segments.to_vec(),
                body: data[offset..offset + body_len].to_vec(),
            };
            offset += body_len;

            self.write_page(&page)?;
        }
        Ok(())
    }

    /// Queues a packet ending at the absolute `granule_position`.
    ///
    /// The packet stays pending until a later packet fills its page or
    /// [`flush_page`](Self::flush_page) is called. A packet with more lacing
    /// values than the page has room for continues on the next page.
    pub fn queue_packet(&mut self, data: &[u8], granule_position: i64) -> io::Result<()> {
        if self.body.len() >= PAGE_FILL_BYTES {
            self.emit_page(0)?;
        }

        let mut offset = 0;
        for (i, lace) in lacing_values(data.len()).into_iter().enumerate() {
            if self.segments.len() == MAX_SEGMENTS {
                self.emit_page(0)?;
                self.continued = i > 0;
            }
            let end = offset + lace as usize;
            self.segments.push(lace);
            self.body.extend_from_slice(&data[offset..end]);
            offset = end;
        }
        self.page_granule = granule_position;
        Ok(())
    }

    /// Writes the queued packets as a page, flagged EOS when `is_eos`.
    ///
    /// Does nothing when no packet is queued.
    pub fn flush_page(&mut self, is_eos: bool) -> io::Result<()> {
        if self.segments.is_empty() {
            return Ok(());
        }
        self.emit_page(if is_eos { flags::EOS } else { 0 })
    }

    fn emit_page(&mut self, mut header_type: u8) -> io::Result<()> {
        if self.continued {
            header_type |= flags::CONTINUATION;
        }
        let page = Page {
            version: 0,
            header_type,
            granule_position: self.page_granule,
            serial: self.state.serial(),
            sequence: self.state.next_sequence(),
            checksum: 0,
            segment_table: mem::take(&mut self.segments),
            body: mem::take(&mut self.body),
        };
        self.page_granule = -1;
        self.continued = false;
        self.write_page(&page)
    }

    /// Flushes the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Returns the inner writer. Queued packets that were never flushed are
    /// dropped.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Returns the lacing values for a packet of `len` bytes.
///
/// A length that is a multiple of 255 ends with a zero lacing value.
fn lacing_values(len: usize) -> Vec<u8> {
    let mut lacing = vec![255u8; len / 255];
    lacing.push((len % 255) as u8);
    lacing
}
