// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{error::*, frame::*};
use byteorder::{ByteOrder, LittleEndian};

pub mod checksum;

use checksum::Checksum;

type Result<T> = core::result::Result<T, Error>;

impl Pdu<'_> {
    /// Serialize the PDU into `buf` and return the number of bytes written.
    ///
    /// The payload is left-justified in the buffer region and the rest of
    /// the region is zeroed.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if self.payload.len() > PDU_BUFFER_SIZE {
            return Err(Error::InvalidArgument(self.payload.len()));
        }
        if buf.len() < PDU_LEN {
            return Err(Error::BufferSize);
        }
        buf[0] = self.function.value();
        buf[1] = self.error.value();
        LittleEndian::write_u16(&mut buf[2..4], self.args);
        let (data, padding) = buf[HEADER_LEN..PDU_LEN].split_at_mut(self.payload.len());
        data.copy_from_slice(self.payload);
        padding.fill(0);
        Ok(PDU_LEN)
    }
}

impl<'r> TryFrom<&'r [u8]> for Pdu<'r> {
    type Error = Error;

    /// Read the PDU fields out of the frame bytes without the checksum.
    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::BufferSize);
        }
        Ok(Pdu {
            function: FunctionCode::new(bytes[0]),
            error: ErrorCode::new(bytes[1]),
            args: LittleEndian::read_u16(&bytes[2..4]),
            payload: &bytes[HEADER_LEN..],
        })
    }
}

/// Encode a request frame.
pub fn encode_request(req: Request<'_>) -> Result<Frame> {
    encode_request_with(Checksum::pico(), req)
}

/// Encode a request frame protected by the given checksum variant.
pub fn encode_request_with(checksum: &Checksum, req: Request<'_>) -> Result<Frame> {
    let mut buf = [0; FRAME_LEN];
    let len = Pdu::from(req).encode(&mut buf)?;
    buf[len] = checksum.checksum(&buf[..len]);
    Ok(buf)
}

/// Decode the fields of a response frame.
///
/// The checksum is not verified here, see [`extract_frame`].
pub fn decode_response(buf: &[u8]) -> Result<Pdu<'_>> {
    if buf.len() < FRAME_LEN {
        return Err(Error::MalformedFrame(buf.len()));
    }
    Pdu::try_from(&buf[..buf.len() - 1])
}

/// Extract a PDU out of a received frame after verifying its checksum.
pub fn extract_frame<'a>(checksum: &Checksum, buf: &'a [u8]) -> Result<Pdu<'a>> {
    if buf.len() < FRAME_LEN {
        return Err(Error::MalformedFrame(buf.len()));
    }
    let (pdu_buf, crc_buf) = buf.split_at(buf.len() - 1);
    let expected = crc_buf[0];
    let actual = checksum.checksum(pdu_buf);
    if expected != actual {
        #[cfg(feature = "log")]
        log::warn!(
            "Dropping frame with invalid checksum 0x{expected:0>2X} (calculated 0x{actual:0>2X}): {:X?}",
            &buf[..HEADER_LEN]
        );
        return Err(Error::InvalidChecksum { expected, actual });
    }
    decode_response(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_frame(function: u8, error: u8, args: u16, payload: &[u8]) -> Frame {
        let mut buf = [0; FRAME_LEN];
        buf[0] = function;
        buf[1] = error;
        LittleEndian::write_u16(&mut buf[2..4], args);
        buf[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
        buf[PDU_LEN] = checksum::checksum(&buf[..PDU_LEN]);
        buf
    }

    mod serialize_requests {
        use super::*;

        #[test]
        fn set_reading_period() {
            let frame = encode_request(Request::SetReadingPeriod(b"temp0", 10)).unwrap();
            assert_eq!(frame.len(), 133);
            assert_eq!(frame[0], FunctionCode::SetReadingPeriod.value());
            assert_eq!(frame[1], 0x00);
            assert_eq!(&frame[2..4], &[0x0A, 0x00]);
            assert_eq!(&frame[4..9], b"temp0");
            assert!(frame[9..132].iter().all(|b| *b == 0));
            assert_eq!(frame[132], checksum::checksum(&frame[0..132]));
        }

        #[test]
        fn heartbeat() {
            let frame = encode_request(Request::Heartbeat).unwrap();
            assert!(frame[..132].iter().all(|b| *b == 0));
            assert_eq!(frame[132], 0x00);
            assert!(checksum::verify(&frame));
        }

        #[test]
        fn get_history_data() {
            let frame = encode_request(Request::GetHistoryData(b"hum1", 0x0102)).unwrap();
            assert_eq!(frame[0], 0x02);
            assert_eq!(&frame[2..4], &[0x02, 0x01]);
            assert_eq!(&frame[4..8], b"hum1");
            assert!(checksum::verify(&frame));
        }

        #[test]
        fn payload_fills_whole_buffer() {
            let payload = [0xAB; PDU_BUFFER_SIZE];
            let frame =
                encode_request(Request::Custom(FunctionCode::Custom(0x10), 0, &payload)).unwrap();
            assert_eq!(&frame[HEADER_LEN..PDU_LEN], &payload[..]);
            assert!(checksum::verify(&frame));
        }

        #[test]
        fn oversized_payload() {
            let payload = [0x61; PDU_BUFFER_SIZE + 1];
            assert_eq!(
                encode_request(Request::GetActualData(&payload)),
                Err(Error::InvalidArgument(129))
            );
        }

        #[test]
        fn encode_into_small_buffer() {
            let pdu = Pdu::from(Request::GetMcuInfo);
            let buf = &mut [0; PDU_LEN - 1];
            assert_eq!(pdu.encode(buf), Err(Error::BufferSize));
        }

        #[test]
        fn encode_clears_stale_bytes() {
            let buf = &mut [0xFF; PDU_LEN];
            let len = Pdu::from(Request::GetSensorInfo(b"t")).encode(buf).unwrap();
            assert_eq!(len, PDU_LEN);
            assert_eq!(buf[4], b't');
            assert!(buf[5..].iter().all(|b| *b == 0));
        }

        #[test]
        fn custom_checksum_variant() {
            static MAXIM: Checksum = Checksum::new(&crc::CRC_8_MAXIM_DOW);
            let frame = encode_request_with(&MAXIM, Request::GetMcuInfo).unwrap();
            assert_eq!(frame[132], MAXIM.checksum(&frame[..132]));
            assert!(MAXIM.verify(&frame));
        }
    }

    mod deserialize_responses {
        use super::*;

        #[test]
        fn short_frames_are_malformed() {
            let buf = [0u8; FRAME_LEN];
            for len in 0..FRAME_LEN {
                assert_eq!(
                    decode_response(&buf[..len]),
                    Err(Error::MalformedFrame(len))
                );
                assert_eq!(
                    extract_frame(Checksum::pico(), &buf[..len]),
                    Err(Error::MalformedFrame(len))
                );
            }
        }

        #[test]
        fn decode_fields() {
            let frame = response_frame(0x04, 0x00, 0xBEEF, b"rp2040");
            let pdu = decode_response(&frame).unwrap();
            assert_eq!(pdu.function, FunctionCode::GetMcuInfo);
            assert_eq!(pdu.error, ErrorCode::Success);
            assert_eq!(pdu.args, 0xBEEF);
            assert_eq!(pdu.payload.len(), PDU_BUFFER_SIZE);
            assert_eq!(&pdu.payload[..6], b"rp2040");
        }

        #[test]
        fn decode_error_code() {
            let frame = response_frame(0x01, 0x02, 0, &[]);
            let pdu = extract_frame(Checksum::pico(), &frame).unwrap();
            assert_eq!(pdu.error, ErrorCode::InvalidSensorName);

            let frame = response_frame(0x01, 0x99, 0, &[]);
            let pdu = extract_frame(Checksum::pico(), &frame).unwrap();
            assert_eq!(pdu.error, ErrorCode::Unknown(0x99));
        }

        #[test]
        fn invalid_checksum() {
            let mut frame = response_frame(0x00, 0x00, 0, &[]);
            let actual = frame[PDU_LEN];
            frame[PDU_LEN] ^= 0xFF;
            assert_eq!(
                extract_frame(Checksum::pico(), &frame),
                Err(Error::InvalidChecksum {
                    expected: actual ^ 0xFF,
                    actual,
                })
            );
        }

        #[test]
        fn corrupted_payload() {
            let mut frame = response_frame(0x02, 0x00, 3, &[21, 22, 23]);
            frame[5] ^= 0x10;
            assert!(matches!(
                extract_frame(Checksum::pico(), &frame),
                Err(Error::InvalidChecksum { .. })
            ));
        }

        #[test]
        fn round_trip() {
            let requests = [
                Request::Heartbeat,
                Request::GetActualData(b"temp0"),
                Request::GetHistoryData(b"temp0", 5),
                Request::GetSensorInfo(b"press2"),
                Request::GetMcuInfo,
                Request::SetReadingPeriod(b"temp0", 1000),
            ];
            for req in requests {
                let frame = encode_request(req).unwrap();
                let pdu = extract_frame(Checksum::pico(), &frame).unwrap();
                assert_eq!(pdu.function, FunctionCode::from(req));
                assert_eq!(pdu.error, ErrorCode::Success);
                assert_eq!(pdu.args, req.args());
                let name = req.payload();
                assert_eq!(&pdu.payload[..name.len()], name);
                assert!(pdu.payload[name.len()..].iter().all(|b| *b == 0));
            }
        }
    }
}
