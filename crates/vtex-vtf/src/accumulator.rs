//! Incremental byte accumulation.

use log::trace;

use crate::{Error, Result};

/// Starting capacity of an [`Accumulator`].
pub const INITIAL_CAPACITY: usize = 1_000_000;

/// Append-only byte store that grows by doubling.
///
/// Bytes are only reachable through [`Accumulator::into_inner`] once all
/// chunks have arrived.
#[derive(Debug)]
pub struct Accumulator {
    buffer: Vec<u8>,
    capacity: usize,
}

impl Accumulator {
    /// Create an accumulator with [`INITIAL_CAPACITY`] reserved.
    pub fn new() -> Result<Self> {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an accumulator with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { requested: capacity })?;
        Ok(Self { buffer, capacity })
    }

    /// Copy `chunk` to the end of the store.
    ///
    /// When the data would outgrow the capacity, the capacity doubles until
    /// it fits. Fails with [`Error::OutOfMemory`] if that allocation fails.
    pub fn append(&mut self, chunk: &[u8]) -> Result<()> {
        let needed = self
            .buffer
            .len()
            .checked_add(chunk.len())
            .ok_or(Error::OutOfMemory { requested: usize::MAX })?;

        if needed > self.capacity {
            self.grow(needed)?;
        }

        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    fn grow(&mut self, needed: usize) -> Result<()> {
        let capacity = grown_capacity(self.capacity, needed)?;
        self.buffer
            .try_reserve_exact(capacity - self.buffer.len())
            .map_err(|_| Error::OutOfMemory { requested: capacity })?;
        trace!("accumulator grew from {} to {} bytes", self.capacity, capacity);
        self.capacity = capacity;
        Ok(())
    }

    /// Number of bytes received so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no bytes have been received.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current logical capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Finish accumulation and take the bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

/// Double `capacity` until it holds `needed` bytes.
fn grown_capacity(capacity: usize, needed: usize) -> Result<usize> {
    let mut capacity = capacity.max(1);
    while capacity < needed {
        capacity = capacity
            .checked_mul(2)
            .ok_or(Error::OutOfMemory { requested: needed })?;
    }
    Ok(capacity)
}
