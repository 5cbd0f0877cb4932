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

//! Per-network magic bytes. A `ChainParams` value is plain read-only
//! configuration, passed explicitly to every operation that serializes or
//! parses consensus-visible bytes; nothing in here is mutable process
//! state.

use std::fmt;

/// Which Dogecoin network a set of parameters belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainTag {
	/// Production network
	Main,
	/// Public test network
	Test,
	/// Local regression test network
	Regtest,
	/// Signed test network
	Signet,
}

impl fmt::Display for ChainTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			ChainTag::Main => write!(f, "main"),
			ChainTag::Test => write!(f, "test"),
			ChainTag::Regtest => write!(f, "regtest"),
			ChainTag::Signet => write!(f, "signet"),
		}
	}
}

/// The network-specific constants every encoder and parser needs: base58
/// version bytes, BIP32 extended-key magics and the bech32 human readable
/// part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
	/// Network this parameter set belongs to
	pub tag: ChainTag,
	/// Version byte of P2PKH addresses
	pub b58_prefix_pubkey: u8,
	/// Version byte of P2SH addresses
	pub b58_prefix_script: u8,
	/// Version byte of WIF-encoded private keys
	pub b58_prefix_secret: u8,
	/// Serialization magic of extended private keys, big-endian
	pub bip32_privkey_magic: [u8; 4],
	/// Serialization magic of extended public keys, big-endian
	pub bip32_pubkey_magic: [u8; 4],
	/// Human readable part of bech32 segwit addresses
	pub bech32_hrp: &'static str,
}

/// Dogecoin mainnet. P2PKH addresses start with `D`, WIF keys with `Q`
/// (compressed), extended keys with `dgpv`/`dgub`.
pub const MAINNET: ChainParams = ChainParams {
	tag: ChainTag::Main,
	b58_prefix_pubkey: 0x1e,
	b58_prefix_script: 0x16,
	b58_prefix_secret: 0x9e,
	bip32_privkey_magic: [0x02, 0xfa, 0xc3, 0x98],
	bip32_pubkey_magic: [0x02, 0xfa, 0xca, 0xfd],
	bech32_hrp: "doge",
};

/// Dogecoin testnet.
pub const TESTNET: ChainParams = ChainParams {
	tag: ChainTag::Test,
	b58_prefix_pubkey: 0x71,
	b58_prefix_script: 0xc4,
	b58_prefix_secret: 0xf1,
	bip32_privkey_magic: [0x04, 0x32, 0xa2, 0x43],
	bip32_pubkey_magic: [0x04, 0x32, 0xa9, 0xa8],
	bech32_hrp: "tdge",
};

/// Regression test network. Shares the testnet extended-key magics and
/// script prefix, with its own address and WIF bytes and hrp.
pub const REGTEST: ChainParams = ChainParams {
	tag: ChainTag::Regtest,
	b58_prefix_pubkey: 0x6f,
	b58_prefix_script: 0xc4,
	b58_prefix_secret: 0xef,
	bip32_privkey_magic: [0x04, 0x32, 0xa2, 0x43],
	bip32_pubkey_magic: [0x04, 0x32, 0xa9, 0xa8],
	bech32_hrp: "dcrt",
};

/// Signet. Upstream assigns it no constants of its own; it rides on the
/// testnet values.
pub const SIGNET: ChainParams = ChainParams {
	tag: ChainTag::Signet,
	b58_prefix_pubkey: 0x71,
	b58_prefix_script: 0xc4,
	b58_prefix_secret: 0xf1,
	bip32_privkey_magic: [0x04, 0x32, 0xa2, 0x43],
	bip32_pubkey_magic: [0x04, 0x32, 0xa9, 0xa8],
	bech32_hrp: "tdge",
};

/// Lookup order for prefix inference. Where testnet and regtest (and
/// signet) share a byte the earlier entry wins, so shared values resolve
/// to testnet.
const CHAINS: [&ChainParams; 4] = [&MAINNET, &TESTNET, &REGTEST, &SIGNET];

/// Look up the chain a base58check-decoded payload belongs to from its
/// leading version byte. Recognizes address, script and secret prefixes.
pub fn chain_from_b58_prefix(version: u8) -> Option<&'static ChainParams> {
	CHAINS.iter().cloned().find(|c| {
		version == c.b58_prefix_pubkey
			|| version == c.b58_prefix_script
			|| version == c.b58_prefix_secret
	})
}

/// Look up chain and key kind from a BIP32 serialization magic. Returns
/// the chain and whether the magic marks an extended *private* key.
pub fn chain_from_bip32_magic(magic: &[u8; 4]) -> Option<(&'static ChainParams, bool)> {
	for c in CHAINS.iter().cloned() {
		if *magic == c.bip32_privkey_magic {
			return Some((c, true));
		}
		if *magic == c.bip32_pubkey_magic {
			return Some((c, false));
		}
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn prefix_lookup() {
		assert_eq!(chain_from_b58_prefix(0x1e).unwrap().tag, ChainTag::Main);
		assert_eq!(chain_from_b58_prefix(0x16).unwrap().tag, ChainTag::Main);
		assert_eq!(chain_from_b58_prefix(0x9e).unwrap().tag, ChainTag::Main);
		assert_eq!(chain_from_b58_prefix(0x71).unwrap().tag, ChainTag::Test);
		assert_eq!(chain_from_b58_prefix(0x6f).unwrap().tag, ChainTag::Regtest);
		assert_eq!(chain_from_b58_prefix(0xef).unwrap().tag, ChainTag::Regtest);
		// shared script prefix resolves to testnet
		assert_eq!(chain_from_b58_prefix(0xc4).unwrap().tag, ChainTag::Test);
		assert!(chain_from_b58_prefix(0x00).is_none());
	}

	#[test]
	fn magic_lookup() {
		let (chain, private) = chain_from_bip32_magic(&[0x02, 0xfa, 0xc3, 0x98]).unwrap();
		assert_eq!(chain.tag, ChainTag::Main);
		assert!(private);
		let (chain, private) = chain_from_bip32_magic(&[0x04, 0x32, 0xa9, 0xa8]).unwrap();
		assert_eq!(chain.tag, ChainTag::Test);
		assert!(!private);
		assert!(chain_from_bip32_magic(&[0x04, 0x88, 0xad, 0xe4]).is_none());
	}

	#[test]
	fn mainnet_prefixes_disjoint_from_test_chains() {
		for c in &[TESTNET, REGTEST, SIGNET] {
			assert_ne!(MAINNET.b58_prefix_pubkey, c.b58_prefix_pubkey);
			assert_ne!(MAINNET.b58_prefix_script, c.b58_prefix_script);
			assert_ne!(MAINNET.b58_prefix_secret, c.b58_prefix_secret);
			assert_ne!(MAINNET.bech32_hrp, c.bech32_hrp);
		}
	}
}
