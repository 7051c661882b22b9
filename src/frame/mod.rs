// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

/// Capacity of the PDU payload buffer.
pub const PDU_BUFFER_SIZE: usize = 128;

/// Function code, error code and the two `args` bytes.
pub const HEADER_LEN: usize = 4;

/// Size of a serialized PDU.
pub const PDU_LEN: usize = HEADER_LEN + PDU_BUFFER_SIZE;

/// Size of a complete ADU on the wire: the PDU followed by one checksum byte.
pub const FRAME_LEN: usize = PDU_LEN + 1;

/// A complete wire frame.
pub type Frame = [u8; FRAME_LEN];

/// A PICO function code.
///
/// It is represented by an unsigned 8 bit integer.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCode {
    /// Function Code: `0` (`0x00`).
    Heartbeat,

    /// Function Code: `1` (`0x01`).
    GetActualData,

    /// Function Code: `2` (`0x02`).
    GetHistoryData,

    /// Function Code: `3` (`0x03`).
    GetSensorInfo,

    /// Function Code: `4` (`0x04`).
    GetMcuInfo,

    /// Function Code: `5` (`0x05`).
    SetReadingPeriod,

    /// Function code the firmware defines but this crate does not name.
    Custom(u8),
}

impl FunctionCode {
    /// Create a new [`FunctionCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x00 => Self::Heartbeat,
            0x01 => Self::GetActualData,
            0x02 => Self::GetHistoryData,
            0x03 => Self::GetSensorInfo,
            0x04 => Self::GetMcuInfo,
            0x05 => Self::SetReadingPeriod,
            code => Self::Custom(code),
        }
    }

    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Heartbeat => 0x00,
            Self::GetActualData => 0x01,
            Self::GetHistoryData => 0x02,
            Self::GetSensorInfo => 0x03,
            Self::GetMcuInfo => 0x04,
            Self::SetReadingPeriod => 0x05,
            Self::Custom(code) => code,
        }
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<FunctionCode> for u8 {
    fn from(code: FunctionCode) -> Self {
        code.value()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// An error code carried in the second byte of every frame.
///
/// Every [`u8`] maps to exactly one variant; codes the firmware does not
/// define end up in [`ErrorCode::Unknown`].
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    NoPackage,
    InvalidSensorName,
    InvalidArgument,
    InvalidFunctionCode,
    InvalidCrc,
    RequestTimeout,
    Transport,
    Unknown(u8),
}

impl ErrorCode {
    /// Create a new [`ErrorCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0 => Self::Success,
            1 => Self::NoPackage,
            2 => Self::InvalidSensorName,
            3 => Self::InvalidArgument,
            4 => Self::InvalidFunctionCode,
            5 => Self::InvalidCrc,
            6 => Self::RequestTimeout,
            7 => Self::Transport,
            code => Self::Unknown(code),
        }
    }

    /// Get the [`u8`] value of the current [`ErrorCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoPackage => 1,
            Self::InvalidSensorName => 2,
            Self::InvalidArgument => 3,
            Self::InvalidFunctionCode => 4,
            Self::InvalidCrc => 5,
            Self::RequestTimeout => 6,
            Self::Transport => 7,
            Self::Unknown(code) => code,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    const fn get_name(self) -> &'static str {
        match self {
            Self::Success => "No error",
            Self::NoPackage => "No package received",
            Self::InvalidSensorName => "Invalid sensor name",
            Self::InvalidArgument => "Invalid argument",
            Self::InvalidFunctionCode => "Invalid function code",
            Self::InvalidCrc => "Invalid CRC",
            Self::RequestTimeout => "Request timeout",
            Self::Transport => "Transport error",
            Self::Unknown(_) => "Unknown device error",
        }
    }
}

impl From<u8> for ErrorCode {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> Self {
        code.value()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "{}: 0x{code:0>2X}", self.get_name()),
            _ => write!(f, "{}", self.get_name()),
        }
    }
}

/// Sensor identifier, sent verbatim at the start of the payload.
///
/// No terminator is appended. Include one if the firmware expects it.
pub(crate) type SensorName<'r> = &'r [u8];

/// Number of history samples to fetch.
pub(crate) type Quantity = u16;

/// Sensor reading period.
pub(crate) type Delay = u16;

/// Operation specific 16 bit argument (little-endian on the wire).
pub(crate) type Args = u16;

/// A request represents a message from the host to the device.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'r> {
    Heartbeat,
    GetActualData(SensorName<'r>),
    GetHistoryData(SensorName<'r>, Quantity),
    GetSensorInfo(SensorName<'r>),
    GetMcuInfo,
    SetReadingPeriod(SensorName<'r>, Delay),
    Custom(FunctionCode, Args, &'r [u8]),
}

impl<'r> Request<'r> {
    /// Value of the `args` field.
    #[must_use]
    pub const fn args(&self) -> Args {
        match *self {
            Self::GetHistoryData(_, count) => count,
            Self::SetReadingPeriod(_, delay) => delay,
            Self::Custom(_, args, _) => args,
            Self::Heartbeat
            | Self::GetActualData(_)
            | Self::GetSensorInfo(_)
            | Self::GetMcuInfo => 0,
        }
    }

    /// Bytes that go into the payload buffer.
    #[must_use]
    pub const fn payload(&self) -> &'r [u8] {
        match *self {
            Self::GetActualData(name)
            | Self::GetHistoryData(name, _)
            | Self::GetSensorInfo(name)
            | Self::SetReadingPeriod(name, _) => name,
            Self::Custom(_, _, payload) => payload,
            Self::Heartbeat | Self::GetMcuInfo => &[],
        }
    }
}

impl<'r> From<Request<'r>> for FunctionCode {
    fn from(r: Request<'r>) -> Self {
        use Request as R;

        match r {
            R::Heartbeat => Self::Heartbeat,
            R::GetActualData(_) => Self::GetActualData,
            R::GetHistoryData(_, _) => Self::GetHistoryData,
            R::GetSensorInfo(_) => Self::GetSensorInfo,
            R::GetMcuInfo => Self::GetMcuInfo,
            R::SetReadingPeriod(_, _) => Self::SetReadingPeriod,
            R::Custom(code, _, _) => code,
        }
    }
}

/// Protocol Data Unit: every frame field except the checksum.
///
/// On the request side `payload` holds at most [`PDU_BUFFER_SIZE`] bytes
/// and is zero padded when encoded. A decoded PDU borrows the whole payload
/// region of the received frame.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pdu<'r> {
    pub function: FunctionCode,
    pub error: ErrorCode,
    pub args: Args,
    pub payload: &'r [u8],
}

impl<'r> From<Request<'r>> for Pdu<'r> {
    fn from(req: Request<'r>) -> Self {
        Self {
            function: req.into(),
            error: ErrorCode::Success,
            args: req.args(),
            payload: req.payload(),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn frame_layout() {
        assert_eq!(PDU_LEN, 132);
        assert_eq!(FRAME_LEN, 133);
    }

    #[test]
    fn function_code_into_u8() {
        let x: u8 = FunctionCode::SetReadingPeriod.value();
        assert_eq!(x, 5);
        let x: u8 = FunctionCode::Custom(0xBB).into();
        assert_eq!(x, 0xBB);
    }

    #[test]
    fn function_code_from_u8() {
        assert_eq!(FunctionCode::new(0), FunctionCode::Heartbeat);
        assert_eq!(FunctionCode::new(4), FunctionCode::GetMcuInfo);
        assert_eq!(FunctionCode::new(0xBB), FunctionCode::Custom(0xBB));
        for code in 0..=u8::MAX {
            assert_eq!(FunctionCode::new(code).value(), code);
        }
    }

    #[test]
    fn error_code_mapping_is_total() {
        for code in 0..=u8::MAX {
            let kind = ErrorCode::new(code);
            assert_eq!(kind.value(), code);
            assert_eq!(matches!(kind, ErrorCode::Unknown(_)), code > 7);
        }
    }

    #[test]
    fn error_code_named_kinds() {
        let named = [
            (0, ErrorCode::Success),
            (1, ErrorCode::NoPackage),
            (2, ErrorCode::InvalidSensorName),
            (3, ErrorCode::InvalidArgument),
            (4, ErrorCode::InvalidFunctionCode),
            (5, ErrorCode::InvalidCrc),
            (6, ErrorCode::RequestTimeout),
            (7, ErrorCode::Transport),
        ];
        for (code, expected) in named {
            assert_eq!(ErrorCode::from(code), expected);
        }
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown(0).is_success());
    }

    #[test]
    fn function_code_from_request() {
        use Request::*;
        let requests = &[
            (Heartbeat, 0),
            (GetActualData(b"temp0"), 1),
            (GetHistoryData(b"temp0", 5), 2),
            (GetSensorInfo(b"temp0"), 3),
            (GetMcuInfo, 4),
            (SetReadingPeriod(b"temp0", 10), 5),
            (Custom(FunctionCode::Custom(88), 0, &[]), 88),
        ];
        for (req, expected) in requests {
            let code: u8 = FunctionCode::from(*req).value();
            assert_eq!(*expected, code);
        }
    }

    #[test]
    fn request_args_and_payload() {
        assert_eq!(Request::Heartbeat.args(), 0);
        assert!(Request::GetMcuInfo.payload().is_empty());
        assert_eq!(Request::GetHistoryData(b"hum1", 7).args(), 7);
        assert_eq!(Request::SetReadingPeriod(b"temp0", 10).payload(), b"temp0");
        assert_eq!(
            Request::Custom(FunctionCode::Custom(9), 0x1234, &[1, 2]).args(),
            0x1234
        );
    }

    #[test]
    fn pdu_from_request() {
        let pdu = Pdu::from(Request::GetSensorInfo(b"temp0"));
        assert_eq!(
            pdu,
            Pdu {
                function: FunctionCode::GetSensorInfo,
                error: ErrorCode::Success,
                args: 0,
                payload: b"temp0",
            }
        );
    }
}
