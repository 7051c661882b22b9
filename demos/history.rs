// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch the last five samples of the `temp0` sensor.
//!
//! ```sh
//! cargo run --example history --features serial -- /dev/ttyACM0
//! ```

use std::{
    env,
    io::{self, BufRead, Write},
};

use pico_protocol::Client;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            print!("Device path: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim().to_owned()
        }
    };

    let client = Client::open(&path)?;
    let rsp = client.get_history_data("temp0", 5)?;
    println!("{rsp:?}");
    client.close()?;
    Ok(())
}
