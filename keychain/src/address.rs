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

//! Address derivation: the three forms a compressed public key can be
//! paid to on a given chain. All three depend only on the 33-byte
//! compressed serialization of the key.

use crate::base58;
use crate::chain::ChainParams;
use crate::hash::hash160;
use crate::key::PubKey;
use crate::segwit;

/// Legacy pay-to-pubkey-hash:
/// base58check(`addr version byte ‖ hash160(pubkey)`).
pub fn p2pkh(chain: &ChainParams, pubkey: &PubKey) -> String {
	let mut payload = [0u8; 21];
	payload[0] = chain.b58_prefix_pubkey;
	payload[1..].copy_from_slice(&pubkey.hash160());
	base58::check_encode_slice(&payload)
}

/// Segwit-in-P2SH: the P2WPKH output wrapped in a pay-to-script-hash
/// redeem script `OP_0 PUSH20 ‖ hash160(pubkey)` for wallets that only
/// understand base58 addresses.
pub fn p2sh_p2wpkh(chain: &ChainParams, pubkey: &PubKey) -> String {
	let mut redeem = [0u8; 22];
	redeem[0] = 0x00; // witness version
	redeem[1] = 0x14; // push of the 20-byte key hash
	redeem[2..].copy_from_slice(&pubkey.hash160());

	let mut payload = [0u8; 21];
	payload[0] = chain.b58_prefix_script;
	payload[1..].copy_from_slice(&hash160(&redeem));
	base58::check_encode_slice(&payload)
}

/// Native segwit v0 pay-to-witness-pubkey-hash, bech32 encoded
pub fn p2wpkh(chain: &ChainParams, pubkey: &PubKey) -> Result<String, segwit::Error> {
	segwit::encode_p2wpkh(chain, &pubkey.hash160())
}

/// Checksum-level validity of a base58 P2PKH address: it must decode,
/// carry a correct checksum and hold exactly a version byte plus a
/// 20-byte key hash. Does not pin the address to a network.
pub fn verify_p2pkh(addr: &str) -> bool {
	match base58::from_check(addr) {
		Ok(payload) => payload.len() == 21,
		Err(_) => false,
	}
}
