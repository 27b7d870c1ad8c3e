//! Text buffer writer with auto-growing capacity.

/// A byte buffer writer that grows automatically as needed.
///
/// Bytes between the flush position `x0` and the cursor `x` form the
/// current window: [`Writer::as_slice`] views it, [`Writer::flush`] copies
/// it out and starts the next one.
///
/// # Example
///
/// ```
/// use ipfix_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.ascii("{\"a\":");
/// writer.hex(&[0x0a, 0xff]);
/// writer.u8(b'}');
/// assert_eq!(writer.flush(), b"{\"a\":0aff}");
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

impl Writer {
    /// Creates a new writer with default allocation size (4KB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(1);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    // Only the unflushed window survives a grow.
    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Resets the flush position.
    pub fn reset(&mut self) {
        self.x0 = self.x;
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Returns a view of the data written since the last flush.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Shortens the current window to `len` bytes. No-op if it is already
    /// shorter.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.x = self.x0 + len;
        }
    }

    /// Removes window bytes `start..end`, shifting later bytes down.
    pub fn remove(&mut self, start: usize, end: usize) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        self.uint8.copy_within(self.x0 + end..self.x, self.x0 + start);
        self.x -= end - start;
    }

    /// Writes a single byte.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        let bytes = s.as_bytes();
        self.buf(bytes);
        bytes.len()
    }

    /// Writes an ASCII string.
    pub fn ascii(&mut self, s: &str) {
        self.utf8(s);
    }

    /// Writes every byte as two lowercase hex digits.
    pub fn hex(&mut self, bytes: &[u8]) {
        let length = bytes.len() * 2;
        self.ensure_capacity(length);
        let out = &mut self.uint8[self.x..self.x + length];
        for (pair, &b) in out.chunks_exact_mut(2).zip(bytes) {
            pair[0] = HEX_DIGITS[(b >> 4) as usize];
            pair[1] = HEX_DIGITS[(b & 0x0f) as usize];
        }
        self.x += length;
    }
}
