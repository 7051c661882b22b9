// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte transport between host and device.

use std::vec::Vec;

pub use crate::error::TransportError;

#[cfg(feature = "serial")]
mod serial;

#[cfg(feature = "serial")]
pub use self::serial::{SerialConfig, SerialTransport};

/// A blocking, half-duplex byte channel to the device.
///
/// Implementations must never leave a partial frame behind: every
/// [`read`](Transport::read) consumes exactly one frame or fails.
pub trait Transport {
    /// Send the whole buffer.
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Block until one frame arrived or the read timeout elapsed.
    ///
    /// Returns [`TransportError::Timeout`] if nothing or only part of a
    /// frame arrived in time.
    fn read(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying handle.
    ///
    /// Calling this more than once is a no-op.
    fn close(&mut self) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        (**self).write(frame)
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).read()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for std::boxed::Box<T> {
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        (**self).write(frame)
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).read()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        (**self).close()
    }
}
