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

//! Signing of arbitrary messages under the Dogecoin message magic, and
//! recovery-based verification against a P2PKH address. The verifier is
//! deliberately tight-lipped: every failure, from transport to address
//! mismatch, is the same `false`.

use crate::address;
use crate::base58;
use crate::chain::chain_from_b58_prefix;
use crate::hash::sha256d;
use crate::key::{PrivKey, PubKey};
use crate::util::secp::{Secp256k1, Signing, Verification};
use crate::util::{from_base64, to_base64};

/// Prefix mixed into every signed message so a signature over free text
/// can never double as a transaction signature.
const MESSAGE_MAGIC: &[u8] = b"Dogecoin Signed Message:\n";

/// Base of the recovery header byte
const HEADER_BASE: u8 = 27;

/// Added to the header when the signer's pubkey serializes compressed
const HEADER_COMPRESSED_FLAG: u8 = 4;

/// Packed signature length: header byte plus r and s
const PACKED_SIGNATURE_SIZE: usize = 65;

/// Bitcoin-style variable length integer
fn push_varint(buf: &mut Vec<u8>, n: u64) {
	match n {
		0..=0xfc => buf.push(n as u8),
		0xfd..=0xffff => {
			buf.push(0xfd);
			buf.extend_from_slice(&(n as u16).to_le_bytes());
		}
		0x1_0000..=0xffff_ffff => {
			buf.push(0xfe);
			buf.extend_from_slice(&(n as u32).to_le_bytes());
		}
		_ => {
			buf.push(0xff);
			buf.extend_from_slice(&n.to_le_bytes());
		}
	}
}

/// The digest actually signed: double-SHA256 over
/// `varint(len(magic)) ‖ magic ‖ varint(len(msg)) ‖ msg`.
pub fn message_digest(msg: &[u8]) -> [u8; 32] {
	let mut buf = Vec::with_capacity(MESSAGE_MAGIC.len() + msg.len() + 10);
	push_varint(&mut buf, MESSAGE_MAGIC.len() as u64);
	buf.extend_from_slice(MESSAGE_MAGIC);
	push_varint(&mut buf, msg.len() as u64);
	buf.extend_from_slice(msg);
	sha256d(&buf)
}

/// Sign a message, producing the 65-byte `[header ‖ r ‖ s]` packed
/// signature in base64. The header carries the recovery id and the
/// compressed-pubkey flag (we only ever sign for compressed keys).
pub fn sign<C: Signing>(secp: &Secp256k1<C>, key: &PrivKey, msg: &[u8]) -> String {
	let rsig = key.sign_hash_recoverable(secp, message_digest(msg));
	let (recid, compact) = rsig.serialize_compact();
	let mut packed = [0u8; PACKED_SIGNATURE_SIZE];
	packed[0] = HEADER_BASE + recid.to_i32() as u8 + HEADER_COMPRESSED_FLAG;
	packed[1..].copy_from_slice(&compact);
	to_base64(&packed)
}

/// Check a base64 packed signature over a message against a P2PKH
/// address. The chain is read off the address's version byte; the
/// signer's key is recovered from the signature and must hash to exactly
/// the given address. Any failure along the way is reported as a plain
/// `false`.
pub fn verify<C: Verification>(
	secp: &Secp256k1<C>,
	addr: &str,
	signature_b64: &str,
	msg: &[u8],
) -> bool {
	let packed = match from_base64(signature_b64) {
		Ok(p) => p,
		Err(_) => return false,
	};
	if packed.len() != PACKED_SIGNATURE_SIZE {
		return false;
	}
	let header = packed[0];
	if header < HEADER_BASE || header >= HEADER_BASE + 8 {
		return false;
	}
	let recid = (header - HEADER_BASE) & 3;
	let mut compact = [0u8; 64];
	compact.copy_from_slice(&packed[1..]);

	let recovered = match PubKey::recover(secp, message_digest(msg), &compact, recid) {
		Ok(k) => k,
		Err(_) => return false,
	};

	let chain = match base58::from_check(addr) {
		Ok(payload) if payload.len() == 21 => match chain_from_b58_prefix(payload[0]) {
			Some(c) => c,
			None => return false,
		},
		_ => return false,
	};

	// the address is public data, plain comparison is fine here
	address::p2pkh(chain, &recovered) == addr
}
