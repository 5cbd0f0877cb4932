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

//! Base58 and base58check encoder and decoder, over the Bitcoin alphabet.
//! Everything consensus-visible (addresses, WIF keys, extended keys) goes
//! through here, so decoding is strict: unknown characters, broken
//! checksums and oversized payloads are all hard errors.

use std::{error, fmt};

use crate::hash::sha256d;

/// Decoded payloads longer than this are rejected before the checksum is
/// even looked at. Nothing we serialize comes close (extended keys are 78
/// bytes plus checksum).
const MAX_DECODED_LENGTH: usize = 128;

/// An error that might occur during base58 decoding
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// Character outside the base58 alphabet
	BadChar(u8),
	/// Checksum was not correct (expected, actual)
	BadChecksum([u8; 4], [u8; 4]),
	/// Checked data was less than 4 bytes
	TooShort(usize),
	/// Decoded payload exceeds the length bound
	TooLong(usize),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::BadChar(b) => write!(f, "invalid base58 character 0x{:x}", b),
			Error::BadChecksum(exp, actual) => write!(
				f,
				"base58ck checksum {:02x?} does not match expected {:02x?}",
				actual, exp
			),
			Error::TooShort(l) => write!(f, "base58ck data too short for a checksum ({})", l),
			Error::TooLong(l) => write!(f, "base58 payload of {} bytes exceeds bound", l),
		}
	}
}

impl error::Error for Error {}

static BASE58_CHARS: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Alphabet position per ASCII byte, 0xff for bytes outside the alphabet.
static BASE58_DIGITS: [u8; 128] = [
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 0-7
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 8-15
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 16-23
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 24-31
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 32-39
	0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 40-47
	0xff, 0, 1, 2, 3, 4, 5, 6, // 48-55
	7, 8, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, // 56-63
	0xff, 9, 10, 11, 12, 13, 14, 15, // 64-71
	16, 0xff, 17, 18, 19, 20, 21, 0xff, // 72-79
	22, 23, 24, 25, 26, 27, 28, 29, // 80-87
	30, 31, 32, 0xff, 0xff, 0xff, 0xff, 0xff, // 88-95
	0xff, 33, 34, 35, 36, 37, 38, 39, // 96-103
	40, 41, 42, 43, 0xff, 44, 45, 46, // 104-111
	47, 48, 49, 50, 51, 52, 53, 54, // 112-119
	55, 56, 57, 0xff, 0xff, 0xff, 0xff, 0xff, // 120-127
];

/// Decode a base58-encoded string into a byte vector
pub fn from(data: &str) -> Result<Vec<u8>, Error> {
	// 11/15 is just over log_256(58)
	let mut scratch = vec![0u8; 1 + data.len() * 11 / 15];
	// Build in base 256
	for d58 in data.bytes() {
		// Compute "X = X * 58 + next_digit" in base 256
		let digit = match BASE58_DIGITS.get(d58 as usize) {
			Some(&d) if d != 0xff => d as u32,
			_ => return Err(Error::BadChar(d58)),
		};
		let mut carry = digit;
		for d256 in scratch.iter_mut().rev() {
			carry += *d256 as u32 * 58;
			*d256 = carry as u8;
			carry /= 256;
		}
		debug_assert_eq!(carry, 0);
	}

	// Copy leading zeroes directly
	let mut ret: Vec<u8> = data
		.bytes()
		.take_while(|&x| x == BASE58_CHARS[0])
		.map(|_| 0)
		.collect();
	// Copy rest of string
	ret.extend(scratch.into_iter().skip_while(|&x| x == 0));
	if ret.len() > MAX_DECODED_LENGTH {
		return Err(Error::TooLong(ret.len()));
	}
	Ok(ret)
}

/// Decode a base58check-encoded string, verifying and stripping the
/// 4-byte double-SHA256 checksum.
pub fn from_check(data: &str) -> Result<Vec<u8>, Error> {
	let mut ret: Vec<u8> = from(data)?;
	if ret.len() < 4 {
		return Err(Error::TooShort(ret.len()));
	}
	let ck_start = ret.len() - 4;
	let mut expected = [0u8; 4];
	expected.copy_from_slice(&sha256d(&ret[..ck_start])[..4]);
	let mut actual = [0u8; 4];
	actual.copy_from_slice(&ret[ck_start..]);
	if expected != actual {
		return Err(Error::BadChecksum(expected, actual));
	}

	ret.truncate(ck_start);
	Ok(ret)
}

fn encode_iter<I>(data: I) -> String
where
	I: Iterator<Item = u8> + Clone,
{
	let (len, _) = data.size_hint();

	// 7/5 is just over log_58(256)
	let mut ret = Vec::with_capacity(1 + len * 7 / 5);

	let mut leading_zero_count = 0;
	let mut leading_zeroes = true;
	// Build string in little endian with 0-58 in place of characters...
	for d256 in data {
		let mut carry = d256 as usize;
		if leading_zeroes && carry == 0 {
			leading_zero_count += 1;
		} else {
			leading_zeroes = false;
		}

		for ch in ret.iter_mut() {
			let new_ch = *ch as usize * 256 + carry;
			*ch = (new_ch % 58) as u8;
			carry = new_ch / 58;
		}
		while carry > 0 {
			ret.push((carry % 58) as u8);
			carry /= 58;
		}
	}

	// ... then reverse it and convert to chars
	for _ in 0..leading_zero_count {
		ret.push(0);
	}
	ret.reverse();
	for ch in ret.iter_mut() {
		*ch = BASE58_CHARS[*ch as usize];
	}
	String::from_utf8(ret).expect("base58 alphabet is ascii")
}

/// Directly encode a slice as base58
pub fn encode_slice(data: &[u8]) -> String {
	encode_iter(data.iter().cloned())
}

/// Obtain a string with the base58check encoding of a slice
/// (the first 4 bytes of the slice's double-SHA256 tacked onto the end).
pub fn check_encode_slice(data: &[u8]) -> String {
	let checksum = sha256d(data);
	encode_iter(data.iter().cloned().chain(checksum[0..4].iter().cloned()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::from_hex;

	#[test]
	fn test_base58_encode() {
		// Basics
		assert_eq!(&encode_slice(&[0][..]), "1");
		assert_eq!(&encode_slice(&[1][..]), "2");
		assert_eq!(&encode_slice(&[58][..]), "21");
		assert_eq!(&encode_slice(&[13, 36][..]), "211");

		// Leading zeroes
		assert_eq!(&encode_slice(&[0, 13, 36][..]), "1211");
		assert_eq!(&encode_slice(&[0, 0, 0, 0, 13, 36][..]), "1111211");

		// Addresses
		let addr = from_hex("00f8917303bfa8ef24f292e8fa1419b20460ba064d").unwrap();
		assert_eq!(
			&check_encode_slice(&addr[..]),
			"1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHH"
		);
	}

	#[test]
	fn test_base58_decode() {
		// Basics
		assert_eq!(from("1").ok(), Some(vec![0u8]));
		assert_eq!(from("2").ok(), Some(vec![1u8]));
		assert_eq!(from("21").ok(), Some(vec![58u8]));
		assert_eq!(from("211").ok(), Some(vec![13u8, 36]));

		// Leading zeroes
		assert_eq!(from("1211").ok(), Some(vec![0u8, 13, 36]));
		assert_eq!(from("111211").ok(), Some(vec![0u8, 0, 0, 13, 36]));

		// Addresses
		assert_eq!(
			from_check("1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHH").ok(),
			Some(from_hex("00f8917303bfa8ef24f292e8fa1419b20460ba064d").unwrap())
		);

		// Alphabet rejections: 0, O, I, l and non-ascii
		assert_eq!(from("0"), Err(Error::BadChar(b'0')));
		assert_eq!(from("Ol1"), Err(Error::BadChar(b'O')));
		assert!(from("café").is_err());
	}

	#[test]
	fn test_base58_checksum_failure() {
		// Flip the last character of a valid address
		assert!(matches!(
			from_check("1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHJ"),
			Err(Error::BadChecksum(_, _))
		));
		// Too short to even carry a checksum
		assert_eq!(from_check("11"), Err(Error::TooShort(2)));
	}

	#[test]
	fn test_base58_length_bound() {
		let big = vec![0xabu8; MAX_DECODED_LENGTH + 1];
		let encoded = encode_slice(&big);
		assert_eq!(from(&encoded), Err(Error::TooLong(MAX_DECODED_LENGTH + 1)));
	}

	#[test]
	fn test_base58_roundtrip() {
		let s = "dgpv557t1z21sLCnAz3cJPW5DiVErXdAi7iWpSJwBBaeN87umwje8LuTKREPTYPTNGXGnB3oNd2z6RmFFDU99WKbiRDJKKXfHxf48puZibauJYB";
		let v: Vec<u8> = from_check(s).unwrap();
		assert_eq!(check_encode_slice(&v[..]), s);
		assert_eq!(from_check(&check_encode_slice(&v[..])).ok(), Some(v));
	}
}
