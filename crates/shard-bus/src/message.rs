//! # Message
//!
//! Immutable, size-bounded payload stored in cell logs.

use crate::errors::BusError;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// A bus message.
///
/// The length is checked against the bus limit at construction and the
/// bytes never change afterwards. Clones share the same allocation, so
/// handing a message from a cell to a consumer copies a pointer only.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Message(Arc<[u8]>);

impl Message {
    /// Create a message, rejecting payloads longer than `max_size`.
    pub fn new(bytes: impl AsRef<[u8]>, max_size: usize) -> Result<Self, BusError> {
        let bytes = bytes.as_ref();
        if bytes.len() > max_size {
            return Err(BusError::MessageTooLarge {
                len: bytes.len(),
                max: max_size,
            });
        }
        Ok(Self(Arc::from(bytes)))
    }

    /// Raw payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Payload as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl AsRef<[u8]> for Message {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message").field(&self.to_string_lossy()).finish()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
