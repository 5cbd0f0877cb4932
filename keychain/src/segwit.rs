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

//! Native segwit (bech32, BIP-173) address encoding for P2WPKH outputs.
//! Witness version 0 with a 20-byte program is the only form Dogecoin
//! addresses use; everything else is rejected on decode.

use bech32::{self, u5, FromBase32, ToBase32, Variant};
use std::{error, fmt};

use crate::chain::ChainParams;

/// Length of a P2WPKH witness program (hash160 of the pubkey)
pub const WITNESS_V0_KEYHASH_LEN: usize = 20;

/// An error that might occur handling a segwit address
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// Bech32-level failure: bad charset, bad checksum, mixed case
	Encoding(bech32::Error),
	/// Address carries a different human readable part than the chain
	WrongHrp(String),
	/// Encoded with bech32m or another future checksum variant
	WrongVariant,
	/// Witness version other than 0
	UnsupportedWitnessVersion(u8),
	/// Witness program of the wrong size for v0 keyhash
	BadProgramLength(usize),
	/// Data part empty (no witness version at all)
	MissingWitnessVersion,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::Encoding(ref e) => write!(f, "bech32 encoding error: {}", e),
			Error::WrongHrp(ref h) => write!(f, "unexpected address prefix {}", h),
			Error::WrongVariant => write!(f, "not a bech32 (BIP-173) checksum"),
			Error::UnsupportedWitnessVersion(v) => write!(f, "unsupported witness version {}", v),
			Error::BadProgramLength(l) => write!(f, "witness program of {} bytes", l),
			Error::MissingWitnessVersion => write!(f, "empty witness data"),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Error::Encoding(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<bech32::Error> for Error {
	fn from(e: bech32::Error) -> Error {
		Error::Encoding(e)
	}
}

/// Encode a 20-byte key hash as a witness v0 address under the chain's
/// human readable part.
pub fn encode_p2wpkh(chain: &ChainParams, program: &[u8; 20]) -> Result<String, Error> {
	let mut data = vec![u5::try_from_u8(0)?];
	data.extend(program.to_base32());
	Ok(bech32::encode(chain.bech32_hrp, data, Variant::Bech32)?)
}

/// Decode a witness v0 address, enforcing the chain's hrp and the 20-byte
/// program length. Mixed case and checksum failures surface as
/// `Error::Encoding` straight from the bech32 layer.
pub fn decode_p2wpkh(chain: &ChainParams, addr: &str) -> Result<[u8; 20], Error> {
	let (hrp, data, variant) = bech32::decode(addr)?;
	if variant != Variant::Bech32 {
		return Err(Error::WrongVariant);
	}
	if hrp != chain.bech32_hrp {
		return Err(Error::WrongHrp(hrp));
	}
	let version = match data.first() {
		Some(v) => v.to_u8(),
		None => return Err(Error::MissingWitnessVersion),
	};
	if version != 0 {
		return Err(Error::UnsupportedWitnessVersion(version));
	}
	let program = Vec::<u8>::from_base32(&data[1..])?;
	if program.len() != WITNESS_V0_KEYHASH_LEN {
		return Err(Error::BadProgramLength(program.len()));
	}
	let mut ret = [0u8; 20];
	ret.copy_from_slice(&program);
	Ok(ret)
}
