// Copyright 2023 The Doge Keychain Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging, hex and various other low-level utilities shared across the
//! doge keychain workspace.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;

// Re-export so the curve backend only has to be declared once.
pub use secp256k1 as secp;

// Logging related
pub mod logger;
pub use crate::logger::{init_logger, init_test_logger};

// Static secp instance
pub mod secp_static;
pub use crate::secp_static::static_secp_instance;

pub mod types;
pub use crate::types::{LogLevel, LoggingConfig, ZeroingString};

mod hex;
pub use crate::hex::{from_hex, HexError, ToHex};

/// Encode bytes to a base64 string (standard alphabet)
pub fn to_base64(data: &[u8]) -> String {
	base64::encode(data)
}

/// Decode a base64 string (standard alphabet) to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
	base64::decode(s)
}
