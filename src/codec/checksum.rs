// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame checksum
//!
//! Every frame ends with a CRC-8 over all preceding bytes. The parameters
//! below are the ones the device firmware is built with. If a device uses a
//! different variant, build a [`Checksum`] from your own [`Algorithm`].

use crc::{Algorithm, Crc};

/// Generator polynomial (normal form, implicit x^8).
pub const CRC8_POLY: u8 = 0x07;
/// Register value before the first byte.
pub const CRC8_INIT: u8 = 0x00;
/// Input bytes are processed MSB first.
pub const CRC8_REFIN: bool = false;
/// The register is not reflected before output.
pub const CRC8_REFOUT: bool = false;
/// Final XOR value.
pub const CRC8_XOROUT: u8 = 0x00;

/// CRC-8 as computed by the PICO firmware (CRC-8/SMBUS).
pub const CRC_8_PICO: Algorithm<u8> = Algorithm {
    width: 8,
    poly: CRC8_POLY,
    init: CRC8_INIT,
    refin: CRC8_REFIN,
    refout: CRC8_REFOUT,
    xorout: CRC8_XOROUT,
    check: 0xF4,
    residue: 0x00,
};

static PICO: Checksum = Checksum::new(&CRC_8_PICO);

/// A pinned CRC-8 variant used to protect frames.
pub struct Checksum {
    crc: Crc<u8>,
}

impl Checksum {
    #[must_use]
    pub const fn new(algorithm: &'static Algorithm<u8>) -> Self {
        Self {
            crc: Crc::<u8>::new(algorithm),
        }
    }

    /// The variant the PICO firmware uses.
    #[must_use]
    pub fn pico() -> &'static Self {
        &PICO
    }

    /// Parameters of this variant.
    #[must_use]
    pub const fn algorithm(&self) -> &'static Algorithm<u8> {
        self.crc.algorithm
    }

    /// Calculate the checksum of `data`.
    #[must_use]
    pub fn checksum(&self, data: &[u8]) -> u8 {
        self.crc.checksum(data)
    }

    /// Check the trailing checksum byte of `frame` against its other bytes.
    ///
    /// An empty frame never verifies.
    #[must_use]
    pub fn verify(&self, frame: &[u8]) -> bool {
        match frame.split_last() {
            Some((&crc, data)) => self.checksum(data) == crc,
            None => false,
        }
    }
}

impl core::fmt::Debug for Checksum {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alg = self.algorithm();
        f.debug_struct("Checksum")
            .field("poly", &alg.poly)
            .field("init", &alg.init)
            .field("refin", &alg.refin)
            .field("refout", &alg.refout)
            .field("xorout", &alg.xorout)
            .finish()
    }
}

/// Calculate the frame checksum with the firmware's CRC-8 variant.
#[must_use]
pub fn checksum(data: &[u8]) -> u8 {
    PICO.checksum(data)
}

/// Verify the trailing checksum byte of `frame` with the firmware's variant.
#[must_use]
pub fn verify(frame: &[u8]) -> bool {
    PICO.verify(frame)
}
