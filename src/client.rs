// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PICO client (host) side of the protocol.
//!
//! Every operation performs exactly one request/response exchange. Frames
//! carry no correlation id, so the transport is locked for the whole
//! exchange and concurrent callers are served one after the other.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    vec::Vec,
};

use crate::{
    codec::{checksum::Checksum, encode_request_with, extract_frame},
    error::{Error, TransportError},
    frame::{ErrorCode, FunctionCode, Pdu, Request},
    transport::Transport,
};

#[cfg(feature = "serial")]
use crate::transport::{SerialConfig, SerialTransport};

type Result<T> = core::result::Result<T, Error>;

/// A decoded, checksum verified response of the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub function: FunctionCode,
    pub error: ErrorCode,
    pub args: u16,
    /// Whole payload region of the frame, including any padding
    pub payload: Vec<u8>,
}

impl From<Pdu<'_>> for Response {
    fn from(pdu: Pdu<'_>) -> Self {
        let Pdu {
            function,
            error,
            args,
            payload,
        } = pdu;
        Self {
            function,
            error,
            args,
            payload: payload.to_vec(),
        }
    }
}

struct Link<T> {
    transport: T,
    open: bool,
}

/// Client for a single device.
pub struct Client<T: Transport> {
    link: Mutex<Link<T>>,
    checksum: &'static Checksum,
}

impl<T: Transport> Client<T> {
    /// Take ownership of `transport`.
    pub fn new(transport: T) -> Self {
        Self::with_checksum(transport, Checksum::pico())
    }

    /// Take ownership of `transport` and protect frames with `checksum`
    /// instead of the default CRC-8 variant.
    pub fn with_checksum(transport: T, checksum: &'static Checksum) -> Self {
        Self {
            link: Mutex::new(Link {
                transport,
                open: true,
            }),
            checksum,
        }
    }

    /// Check that the device answers.
    pub fn heartbeat(&self) -> Result<Response> {
        self.request(Request::Heartbeat)
    }

    /// Latest sample of a sensor.
    pub fn get_actual_data(&self, sensor_name: impl AsRef<[u8]>) -> Result<Response> {
        self.request(Request::GetActualData(sensor_name.as_ref()))
    }

    /// The last `count` samples of a sensor.
    pub fn get_history_data(&self, sensor_name: impl AsRef<[u8]>, count: u16) -> Result<Response> {
        self.request(Request::GetHistoryData(sensor_name.as_ref(), count))
    }

    /// Description of a sensor as reported by the device.
    pub fn get_sensor_info(&self, sensor_name: impl AsRef<[u8]>) -> Result<Response> {
        self.request(Request::GetSensorInfo(sensor_name.as_ref()))
    }

    /// Identification of the device's microcontroller.
    pub fn get_mcu_info(&self) -> Result<Response> {
        self.request(Request::GetMcuInfo)
    }

    /// Change how often the device samples a sensor.
    pub fn set_reading_period(&self, sensor_name: impl AsRef<[u8]>, delay: u16) -> Result<Response> {
        self.request(Request::SetReadingPeriod(sensor_name.as_ref(), delay))
    }

    /// Perform a single request/response exchange.
    ///
    /// There is no retry. A failed exchange leaves the client usable for
    /// the next call.
    pub fn request(&self, req: Request<'_>) -> Result<Response> {
        let mut link = self.lock();
        if !link.open {
            return Err(Error::TransportClosed);
        }

        let frame = encode_request_with(self.checksum, req)?;
        #[cfg(feature = "log")]
        log::trace!("Sending {req:?}");
        link.transport
            .write(&frame)
            .map_err(|err| transport_error(err, Error::TransportWrite))?;

        let reply = link
            .transport
            .read()
            .map_err(|err| transport_error(err, Error::TransportRead))?;
        let pdu = extract_frame(self.checksum, &reply)?;
        drop(link);

        #[cfg(feature = "log")]
        if pdu.function != FunctionCode::from(req) {
            log::warn!(
                "Response function code {} does not match request function code {}",
                pdu.function,
                FunctionCode::from(req)
            );
        }
        if !pdu.error.is_success() {
            #[cfg(feature = "log")]
            log::warn!("Device rejected {req:?}: {}", pdu.error);
            return Err(Error::Device(pdu.error));
        }
        Ok(pdu.into())
    }

    /// Release the transport.
    ///
    /// Only the first call closes the transport, later calls do nothing.
    /// Every operation fails with [`Error::TransportClosed`] afterwards.
    pub fn close(&self) -> core::result::Result<(), TransportError> {
        let mut link = self.lock();
        if !link.open {
            return Ok(());
        }
        link.open = false;
        #[cfg(feature = "log")]
        log::debug!("Closing transport");
        link.transport.close()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    // An exchange never leaves the link half updated, so the guard of a
    // panicked caller is still usable.
    fn lock(&self) -> MutexGuard<'_, Link<T>> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(feature = "serial")]
impl Client<SerialTransport> {
    /// Open the serial device at `path` with the default line settings.
    pub fn open(path: &str) -> core::result::Result<Self, TransportError> {
        Self::open_with(path, &SerialConfig::default())
    }

    pub fn open_with(
        path: &str,
        config: &SerialConfig,
    ) -> core::result::Result<Self, TransportError> {
        SerialTransport::open(path, config).map(Self::new)
    }
}

impl<T: Transport> Drop for Client<T> {
    fn drop(&mut self) {
        let link = self.link.get_mut().unwrap_or_else(PoisonError::into_inner);
        if link.open {
            link.open = false;
            if let Err(_err) = link.transport.close() {
                #[cfg(feature = "log")]
                log::warn!("Failed to close transport: {_err}");
            }
        }
    }
}

const fn transport_error(err: TransportError, io: Error) -> Error {
    match err {
        TransportError::Timeout => Error::Timeout,
        TransportError::Closed => Error::TransportClosed,
        TransportError::Io => io,
    }
}
