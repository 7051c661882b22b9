// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

use crate::frame::{ErrorCode, PDU_BUFFER_SIZE};

/// pico-protocol Error
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Request payload exceeds the PDU buffer
    InvalidArgument(usize),
    /// Invalid buffer size
    BufferSize,
    /// Received frame is shorter than a full ADU
    MalformedFrame(usize),
    /// Local checksum verification failed
    InvalidChecksum { expected: u8, actual: u8 },
    /// The device rejected the request
    Device(ErrorCode),
    /// Writing the request to the transport failed
    TransportWrite,
    /// Reading the response from the transport failed
    TransportRead,
    /// No complete response arrived within the transport timeout
    Timeout,
    /// The transport has been closed
    TransportClosed,
}

impl Error {
    /// Whether the error was reported by the device itself.
    #[must_use]
    pub const fn is_device_error(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match self {
            InvalidArgument(len) => write!(
                f,
                "Invalid argument: payload of {len} bytes exceeds {PDU_BUFFER_SIZE} bytes"
            ),
            BufferSize => write!(f, "Invalid buffer size"),
            MalformedFrame(len) => write!(f, "Malformed frame: received only {len} bytes"),
            InvalidChecksum { expected, actual } => write!(
                f,
                "Invalid checksum: expected = 0x{expected:0>2X}, actual = 0x{actual:0>2X}"
            ),
            Device(code) => write!(f, "Device error: {code}"),
            TransportWrite => write!(f, "Failed to write request to transport"),
            TransportRead => write!(f, "Failed to read response from transport"),
            Timeout => write!(f, "Request timed out"),
            TransportClosed => write!(f, "Transport is closed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Failure reported by a [`Transport`](crate::Transport) implementation.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No complete frame arrived before the read timeout elapsed
    Timeout,
    /// The underlying handle has been released
    Closed,
    /// Any other I/O failure
    Io,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Transport timeout"),
            Self::Closed => write!(f, "Transport closed"),
            Self::Io => write!(f, "Transport I/O error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => Self::Timeout,
            ErrorKind::NotConnected | ErrorKind::BrokenPipe => Self::Closed,
            _ => Self::Io,
        }
    }
}
