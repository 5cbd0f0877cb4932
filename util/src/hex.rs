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

//! Hex encoding of bytes to string and decoding of strings to bytes.
//! Simple enough that we keep our own rather than pulling a crate in.

use std::fmt::Write;
use std::{error, fmt};

/// Failure decoding a hex string
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum HexError {
	/// Odd number of hex digits
	OddLength(usize),
	/// Character outside [0-9a-fA-F]
	BadCharacter(char),
}

impl fmt::Display for HexError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			HexError::OddLength(l) => write!(f, "odd hex length {}", l),
			HexError::BadCharacter(c) => write!(f, "invalid hex character {:?}", c),
		}
	}
}

impl error::Error for HexError {}

/// Convert to hex
pub trait ToHex {
	/// convert to hex
	fn to_hex(&self) -> String;
}

impl<T: AsRef<[u8]>> ToHex for T {
	fn to_hex(&self) -> String {
		let bytes = self.as_ref();
		let mut s = String::with_capacity(bytes.len() * 2);
		for byte in bytes {
			write!(&mut s, "{:02x}", byte).expect("writing to a String never fails");
		}
		s
	}
}

/// Decode a hex string into bytes. Accepts both cases, no 0x prefix.
pub fn from_hex(hex: &str) -> Result<Vec<u8>, HexError> {
	if hex.len() % 2 != 0 {
		return Err(HexError::OddLength(hex.len()));
	}
	hex.as_bytes()
		.chunks(2)
		.map(|pair| {
			let hi = nibble(pair[0])?;
			let lo = nibble(pair[1])?;
			Ok(hi << 4 | lo)
		})
		.collect()
}

fn nibble(c: u8) -> Result<u8, HexError> {
	match c {
		b'0'..=b'9' => Ok(c - b'0'),
		b'a'..=b'f' => Ok(c - b'a' + 10),
		b'A'..=b'F' => Ok(c - b'A' + 10),
		_ => Err(HexError::BadCharacter(c as char)),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_to_hex() {
		assert_eq!(vec![0, 0, 0, 0].to_hex(), "00000000");
		assert_eq!(vec![10, 11, 12, 13].to_hex(), "0a0b0c0d");
		assert_eq!([0, 0, 0, 255].to_hex(), "000000ff");
	}

	#[test]
	fn test_from_hex() {
		assert_eq!(from_hex(""), Ok(vec![]));
		assert_eq!(from_hex("00000000"), Ok(vec![0, 0, 0, 0]));
		assert_eq!(from_hex("0a0b0c0d"), Ok(vec![10, 11, 12, 13]));
		assert_eq!(from_hex("000000fF"), Ok(vec![0, 0, 0, 255]));
		assert_eq!(from_hex("000000fg"), Err(HexError::BadCharacter('g')));
		assert_eq!(from_hex("0"), Err(HexError::OddLength(1)));
	}

	#[test]
	fn test_round_trip() {
		let bytes = from_hex("039ca1fdedbe160cb7b14df2a798c8fed41ad4ed30b06a85ad23e03abe43c413b2").unwrap();
		assert_eq!(
			bytes.to_hex(),
			"039ca1fdedbe160cb7b14df2a798c8fed41ad4ed30b06a85ad23e03abe43c413b2"
		);
	}
}
