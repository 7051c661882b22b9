// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod codec;
mod error;
mod frame;

#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod transport;

#[cfg(feature = "std")]
pub use client::{Client, Response};
pub use codec::checksum::{self, Checksum};
pub use codec::*;
pub use error::*;
pub use frame::*;
#[cfg(feature = "std")]
pub use transport::Transport;
