// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serial line transport

use std::{
    boxed::Box,
    io,
    time::{Duration, Instant},
    vec,
    vec::Vec,
};

use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};

use super::{Transport, TransportError};
use crate::frame::FRAME_LEN;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Line settings of the serial port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    /// Upper bound for receiving one complete frame
    pub timeout: Duration,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    #[must_use]
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    #[must_use]
    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }
}

impl From<serialport::Error> for TransportError {
    fn from(err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::Io(kind) => io::Error::from(kind).into(),
            serialport::ErrorKind::NoDevice => Self::Closed,
            _ => Self::Io,
        }
    }
}

/// [`Transport`] over a local serial port.
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    timeout: Duration,
}

impl SerialTransport {
    /// Open the serial device at `path`.
    pub fn open(path: &str, config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .timeout(config.timeout)
            .open()
            .map_err(|err| {
                #[cfg(feature = "log")]
                log::error!("Failed to open serial port {path}: {err}");
                TransportError::from(err)
            })?;
        #[cfg(feature = "log")]
        log::debug!("Opened serial port {path} at {} baud", config.baud_rate);
        Ok(Self::from_port(port, config.timeout))
    }

    /// Wrap an already configured port.
    #[must_use]
    pub fn from_port(port: Box<dyn SerialPort>, timeout: Duration) -> Self {
        Self {
            port: Some(port),
            timeout,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, TransportError> {
        self.port.as_mut().ok_or(TransportError::Closed)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let port = self.port()?;
        // Bytes still pending from an abandoned reply would be taken
        // for the start of the next one.
        port.clear(ClearBuffer::Input)?;
        io::Write::write_all(port, frame)?;
        io::Write::flush(port)?;
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let timeout = self.timeout;
        let port = self.port()?;
        let deadline = Instant::now() + timeout;
        let mut buf = vec![0; FRAME_LEN];
        let mut len = 0;
        while len < FRAME_LEN {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                #[cfg(feature = "log")]
                log::debug!("Timeout after receiving {len} of {FRAME_LEN} bytes");
                return Err(TransportError::Timeout);
            }
            // A single read must not outlast the frame deadline.
            port.set_timeout(remaining)?;
            match io::Read::read(port, &mut buf[len..]) {
                Ok(0) => {
                    #[cfg(feature = "log")]
                    log::debug!("Line hung up after {len} of {FRAME_LEN} bytes");
                    return Err(TransportError::Timeout);
                }
                Ok(n) => len += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    #[cfg(feature = "log")]
                    if len > 0 {
                        log::debug!("Dropping {len} bytes of an incomplete frame: {err}");
                    }
                    return Err(err.into());
                }
            }
        }
        Ok(buf)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(port) = self.port.take() {
            #[cfg(feature = "log")]
            log::debug!(
                "Closing serial port {}",
                port.name().as_deref().unwrap_or("<unnamed>")
            );
            drop(port);
        }
        Ok(())
    }
}
