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

//! The crate-level error every facade operation reports. Each module
//! keeps its own focused error enum; this folds them together so callers
//! get one type with the failure kind preserved.

use std::{error, fmt};

use crate::base58;
use crate::extkey_bip32;
use crate::key;
use crate::path;
use crate::segwit;

/// Any failure of a keychain operation
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// base58 transport failure (bad alphabet, checksum, length)
	Base58(base58::Error),
	/// bech32 transport failure
	Segwit(segwit::Error),
	/// key-level failure (scalar, point, WIF, signature, rng)
	Key(key::Error),
	/// extended-key failure (derivation, serialization)
	ExtKey(extkey_bip32::Error),
	/// derivation path did not parse
	Path(path::Error),
	/// a verify operation found keys or addresses that do not belong
	/// together
	Mismatch,
	/// input serialized under a different network than requested
	WrongNetwork,
	/// change level outside {0, 1}
	BadChangeLevel(u32),
	/// asked for private-key output of a public-only node
	PublicMasterKey,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::Base58(ref e) => write!(f, "{}", e),
			Error::Segwit(ref e) => write!(f, "{}", e),
			Error::Key(ref e) => write!(f, "{}", e),
			Error::ExtKey(ref e) => write!(f, "{}", e),
			Error::Path(ref e) => write!(f, "{}", e),
			Error::Mismatch => f.write_str("keys and addresses do not match"),
			Error::WrongNetwork => f.write_str("input belongs to a different network"),
			Error::BadChangeLevel(v) => write!(f, "change level {} not in {{0, 1}}", v),
			Error::PublicMasterKey => {
				f.write_str("cannot produce private output from a public-only key")
			}
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Error::Base58(ref e) => Some(e),
			Error::Segwit(ref e) => Some(e),
			Error::Key(ref e) => Some(e),
			Error::ExtKey(ref e) => Some(e),
			Error::Path(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<base58::Error> for Error {
	fn from(e: base58::Error) -> Error {
		Error::Base58(e)
	}
}

impl From<segwit::Error> for Error {
	fn from(e: segwit::Error) -> Error {
		Error::Segwit(e)
	}
}

impl From<key::Error> for Error {
	fn from(e: key::Error) -> Error {
		Error::Key(e)
	}
}

impl From<extkey_bip32::Error> for Error {
	fn from(e: extkey_bip32::Error) -> Error {
		Error::ExtKey(e)
	}
}

impl From<path::Error> for Error {
	fn from(e: path::Error) -> Error {
		Error::Path(e)
	}
}
