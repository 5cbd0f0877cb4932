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

//! The fixed BIP44 account layout,
//! `m / 44' / coin_type' / account' / change / index`, with Dogecoin's
//! registered coin type.

use std::fmt;

use crate::chain::{ChainParams, ChainTag};
use crate::extkey_bip32::ChildNumber;

/// BIP44 purpose level, always hardened
pub const PURPOSE: u32 = 44;

/// SLIP44 coin type of Dogecoin mainnet
pub const COIN_TYPE_DOGE: u32 = 3;

/// SLIP44 coin type shared by all test networks
pub const COIN_TYPE_TEST: u32 = 1;

/// The registered coin type for a chain
pub fn coin_type(chain: &ChainParams) -> u32 {
	match chain.tag {
		ChainTag::Main => COIN_TYPE_DOGE,
		ChainTag::Test | ChainTag::Regtest | ChainTag::Signet => COIN_TYPE_TEST,
	}
}

/// Receiving or change branch of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
	/// External chain (0), addresses handed out for receiving
	External,
	/// Internal chain (1), change back to ourselves
	Internal,
}

impl Change {
	/// Map the conventional 0/1 encoding; anything else is not a change
	/// level.
	pub fn from_u32(v: u32) -> Option<Change> {
		match v {
			0 => Some(Change::External),
			1 => Some(Change::Internal),
			_ => None,
		}
	}

	fn index(self) -> u32 {
		match self {
			Change::External => 0,
			Change::Internal => 1,
		}
	}
}

impl fmt::Display for Change {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.index())
	}
}

/// A BIP44 position: an account branch, optionally narrowed down to a
/// single address index. Without an index the path stops at the change
/// level, which is what account-level extended keys are exported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip44Path {
	/// Hardened account number
	pub account: u32,
	/// Receiving or change branch
	pub change: Change,
	/// Leaf index; `None` addresses the branch itself
	pub index: Option<u32>,
}

impl Bip44Path {
	/// The walk from a master key to this position on the given chain
	pub fn children(&self, chain: &ChainParams) -> Vec<ChildNumber> {
		let mut path = vec![
			ChildNumber::Hardened { index: PURPOSE },
			ChildNumber::Hardened {
				index: coin_type(chain),
			},
			ChildNumber::Hardened {
				index: self.account,
			},
			ChildNumber::Normal {
				index: self.change.index(),
			},
		];
		if let Some(index) = self.index {
			path.push(ChildNumber::Normal { index });
		}
		path
	}
}

impl fmt::Display for Bip44Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "m/{}'/<coin>'/{}'/{}", PURPOSE, self.account, self.change)?;
		if let Some(index) = self.index {
			write!(f, "/{}", index)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chain::{MAINNET, REGTEST, TESTNET};

	#[test]
	fn coin_types() {
		assert_eq!(coin_type(&MAINNET), 3);
		assert_eq!(coin_type(&TESTNET), 1);
		assert_eq!(coin_type(&REGTEST), 1);
	}

	#[test]
	fn leaf_path_layout() {
		let path = Bip44Path {
			account: 1,
			change: Change::Internal,
			index: Some(7),
		};
		assert_eq!(
			path.children(&MAINNET),
			vec![
				ChildNumber::Hardened { index: 44 },
				ChildNumber::Hardened { index: 3 },
				ChildNumber::Hardened { index: 1 },
				ChildNumber::Normal { index: 1 },
				ChildNumber::Normal { index: 7 },
			]
		);
	}

	#[test]
	fn account_path_stops_at_change_level() {
		let path = Bip44Path {
			account: 0,
			change: Change::External,
			index: None,
		};
		assert_eq!(path.children(&TESTNET).len(), 4);
		assert_eq!(
			path.children(&TESTNET)[1],
			ChildNumber::Hardened { index: 1 }
		);
	}

	#[test]
	fn change_levels() {
		assert_eq!(Change::from_u32(0), Some(Change::External));
		assert_eq!(Change::from_u32(1), Some(Change::Internal));
		assert_eq!(Change::from_u32(2), None);
	}
}
