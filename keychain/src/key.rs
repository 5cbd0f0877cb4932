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

//! Private and public keys over secp256k1, with WIF serialization.
//! `PrivKey` owns its scalar and wipes it when dropped; signatures are
//! deterministic (RFC 6979) and low-S normalized by the underlying
//! library.

use rand::{CryptoRng, RngCore};
use std::{error, fmt};
use zeroize::Zeroize;

use crate::base58;
use crate::chain::ChainParams;
use crate::hash::hash160;
use crate::util::secp::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use crate::util::secp::{Message, PublicKey, Secp256k1, SecretKey, Signing, Verification};
use crate::util::{from_hex, HexError};

/// Marker appended to the WIF payload of keys whose public key is
/// serialized compressed, the only kind we produce.
const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// How many fresh 32-byte draws we give the RNG before declaring it
/// broken. A single draw lands outside [1, n-1] with probability below
/// 2^-127, so more than a couple of retries means the entropy source is
/// not behaving like one.
const MAX_RNG_ATTEMPTS: usize = 8;

/// A key handling error
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// Secret scalar was zero or not below the curve order
	InvalidScalar,
	/// Not a valid curve point
	InvalidPoint,
	/// Version byte belongs to a different network (expected, found)
	WrongNetwork(u8, u8),
	/// Payload of unexpected size
	BadLength(usize),
	/// 34-byte WIF payload without the compression marker
	NotCompressed,
	/// Signature failed to parse or recover
	BadSignature,
	/// The system RNG refused to produce a usable scalar
	RngFailure,
	/// base58 transport failure
	Base58(base58::Error),
	/// Malformed hex input
	Hex(HexError),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::InvalidScalar => write!(f, "secret not in [1, n-1]"),
			Error::InvalidPoint => write!(f, "not a point on the curve"),
			Error::WrongNetwork(exp, got) => {
				write!(f, "network byte 0x{:02x}, expected 0x{:02x}", got, exp)
			}
			Error::BadLength(l) => write!(f, "key payload of {} bytes", l),
			Error::NotCompressed => write!(f, "WIF key without compression marker"),
			Error::BadSignature => write!(f, "malformed or unrecoverable signature"),
			Error::RngFailure => write!(f, "random number generator failure"),
			Error::Base58(ref e) => write!(f, "{}", e),
			Error::Hex(ref e) => write!(f, "{}", e),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Error::Base58(ref e) => Some(e),
			Error::Hex(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<base58::Error> for Error {
	fn from(e: base58::Error) -> Error {
		Error::Base58(e)
	}
}

impl From<HexError> for Error {
	fn from(e: HexError) -> Error {
		Error::Hex(e)
	}
}

/// A secp256k1 private key. The scalar is erased when the value is
/// dropped; equality on the inner key is constant-time.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivKey(SecretKey);

impl Drop for PrivKey {
	fn drop(&mut self) {
		self.0.non_secure_erase();
	}
}

impl fmt::Debug for PrivKey {
	// never print the scalar, not even in debug output
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PrivKey(<secret>)")
	}
}

impl PrivKey {
	/// Draw a fresh key from the given cryptographic RNG, retrying the
	/// (cosmically unlikely) draws outside [1, n-1].
	pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<PrivKey, Error> {
		let mut buf = [0u8; 32];
		for _ in 0..MAX_RNG_ATTEMPTS {
			if rng.try_fill_bytes(&mut buf).is_err() {
				buf.zeroize();
				return Err(Error::RngFailure);
			}
			if let Ok(key) = SecretKey::from_slice(&buf) {
				buf.zeroize();
				return Ok(PrivKey(key));
			}
		}
		buf.zeroize();
		Err(Error::RngFailure)
	}

	/// Key from a raw 32-byte scalar
	pub fn from_slice(data: &[u8]) -> Result<PrivKey, Error> {
		if data.len() != 32 {
			return Err(Error::BadLength(data.len()));
		}
		SecretKey::from_slice(data)
			.map(PrivKey)
			.map_err(|_| Error::InvalidScalar)
	}

	/// Key from a 64-character hex string
	pub fn from_hex(hex: &str) -> Result<PrivKey, Error> {
		let mut raw = from_hex(hex)?;
		let res = PrivKey::from_slice(&raw);
		raw.zeroize();
		res
	}

	/// The raw scalar. Callers are responsible for wiping the copy.
	pub fn secret_bytes(&self) -> [u8; 32] {
		self.0.secret_bytes()
	}

	/// Borrow the underlying secp key for derivation arithmetic
	pub fn secret_key(&self) -> &SecretKey {
		&self.0
	}

	/// Wallet Import Format: base58check over
	/// `[secret version byte, 32-byte scalar, 0x01]`.
	pub fn encode_wif(&self, chain: &ChainParams) -> String {
		let mut data = Vec::with_capacity(34);
		data.push(chain.b58_prefix_secret);
		data.extend_from_slice(&self.0.secret_bytes());
		data.push(WIF_COMPRESSED_FLAG);
		let encoded = base58::check_encode_slice(&data);
		data.zeroize();
		encoded
	}

	/// Decode a WIF string for the given chain. Accepts the legacy
	/// 33-byte (uncompressed) payload as well as the 34-byte compressed
	/// one.
	pub fn decode_wif(chain: &ChainParams, wif: &str) -> Result<PrivKey, Error> {
		let mut data = base58::from_check(wif)?;
		let res = parse_wif_payload(chain, &data);
		data.zeroize();
		res
	}

	/// The matching public key
	pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> PubKey {
		PubKey(PublicKey::from_secret_key(secp, &self.0))
	}

	/// Deterministic ECDSA over a 32-byte digest, low-S normalized
	pub fn sign_hash<C: Signing>(&self, secp: &Secp256k1<C>, hash: [u8; 32]) -> Signature {
		secp.sign_ecdsa(&Message::from_digest(hash), &self.0)
	}

	/// Deterministic ECDSA with a recovery id, for signatures the
	/// verifier reconstructs the public key from
	pub fn sign_hash_recoverable<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		hash: [u8; 32],
	) -> RecoverableSignature {
		secp.sign_ecdsa_recoverable(&Message::from_digest(hash), &self.0)
	}
}

fn parse_wif_payload(chain: &ChainParams, data: &[u8]) -> Result<PrivKey, Error> {
	if data.len() != 33 && data.len() != 34 {
		return Err(Error::BadLength(data.len()));
	}
	if data[0] != chain.b58_prefix_secret {
		return Err(Error::WrongNetwork(chain.b58_prefix_secret, data[0]));
	}
	if data.len() == 34 && data[33] != WIF_COMPRESSED_FLAG {
		return Err(Error::NotCompressed);
	}
	SecretKey::from_slice(&data[1..33])
		.map(PrivKey)
		.map_err(|_| Error::InvalidScalar)
}

/// A secp256k1 public key, serialized compressed (33 bytes) everywhere
/// an address or extended key is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubKey(PublicKey);

impl PubKey {
	/// Parse a public key; both the 33-byte compressed and 65-byte
	/// uncompressed encodings are accepted on input.
	pub fn from_slice(data: &[u8]) -> Result<PubKey, Error> {
		if data.len() != 33 && data.len() != 65 {
			return Err(Error::BadLength(data.len()));
		}
		PublicKey::from_slice(data)
			.map(PubKey)
			.map_err(|_| Error::InvalidPoint)
	}

	/// Parse a hex encoded public key
	pub fn from_hex(hex: &str) -> Result<PubKey, Error> {
		PubKey::from_slice(&from_hex(hex)?)
	}

	/// Wrap a key produced by curve arithmetic
	pub fn from_inner(key: PublicKey) -> PubKey {
		PubKey(key)
	}

	/// Borrow the underlying secp key
	pub fn public_key(&self) -> &PublicKey {
		&self.0
	}

	/// Compressed 33-byte serialization, `02/03 ‖ X`
	pub fn serialize(&self) -> [u8; 33] {
		self.0.serialize()
	}

	/// RIPEMD160(SHA256(compressed serialization)), the payload of all
	/// three address forms
	pub fn hash160(&self) -> [u8; 20] {
		hash160(&self.serialize())
	}

	/// Check a DER signature over a 32-byte digest
	pub fn verify_sig<C: Verification>(
		&self,
		secp: &Secp256k1<C>,
		hash: [u8; 32],
		sig_der: &[u8],
	) -> bool {
		match Signature::from_der(sig_der) {
			Ok(sig) => secp
				.verify_ecdsa(&Message::from_digest(hash), &sig, &self.0)
				.is_ok(),
			Err(_) => false,
		}
	}

	/// Reconstruct the signer's key from a compact signature, its
	/// recovery id and the signed digest
	pub fn recover<C: Verification>(
		secp: &Secp256k1<C>,
		hash: [u8; 32],
		sig_compact: &[u8; 64],
		recid: u8,
	) -> Result<PubKey, Error> {
		let recid = RecoveryId::from_i32(recid as i32).map_err(|_| Error::BadSignature)?;
		let sig = RecoverableSignature::from_compact(sig_compact, recid)
			.map_err(|_| Error::BadSignature)?;
		secp.recover_ecdsa(&Message::from_digest(hash), &sig)
			.map(PubKey)
			.map_err(|_| Error::BadSignature)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chain::{MAINNET, TESTNET};
	use crate::hash::sha256d;
	use crate::util::static_secp_instance;
	use crate::util::ToHex;
	use rand::thread_rng;

	const UPSTREAM_WIF: &str = "QUaohmokNWroj71dRtmPSses5eRw5SGLKsYSRSVisJHyZdxhdDCZ";
	const UPSTREAM_PUBKEY: &str = "024c33fbb2f6accde1db907e88ebf5dd1693e31433c62aaeef42f7640974f602ba";

	#[test]
	fn wif_decode_matches_upstream_vector() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let key = PrivKey::decode_wif(&MAINNET, UPSTREAM_WIF).unwrap();
		assert_eq!(key.public_key(&secp).serialize().to_hex(), UPSTREAM_PUBKEY);
		// and back out again
		assert_eq!(key.encode_wif(&MAINNET), UPSTREAM_WIF);
	}

	#[test]
	fn wif_cross_chain_decode_fails() {
		assert_eq!(
			PrivKey::decode_wif(&TESTNET, UPSTREAM_WIF),
			Err(Error::WrongNetwork(0xf1, 0x9e))
		);
	}

	#[test]
	fn wif_rejects_tampering() {
		let mut tampered = String::from(UPSTREAM_WIF);
		tampered.replace_range(0..1, "R");
		assert!(matches!(
			PrivKey::decode_wif(&MAINNET, &tampered),
			Err(Error::Base58(base58::Error::BadChecksum(_, _)))
		));
	}

	#[test]
	fn generated_keys_are_distinct_and_valid() {
		let k1 = PrivKey::generate(&mut thread_rng()).unwrap();
		let k2 = PrivKey::generate(&mut thread_rng()).unwrap();
		assert_ne!(k1, k2);
		for k in &[k1, k2] {
			let wif = k.encode_wif(&MAINNET);
			let decoded = base58::from_check(&wif).unwrap();
			assert_eq!(decoded[0], 0x9e);
			assert_eq!(decoded.len(), 34);
			// scalar round-trips through the WIF surface
			assert_eq!(&PrivKey::decode_wif(&MAINNET, &wif).unwrap(), k);
		}
	}

	#[test]
	fn pubkey_derivation_is_deterministic() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let key = PrivKey::decode_wif(&MAINNET, UPSTREAM_WIF).unwrap();
		assert_eq!(
			key.public_key(&secp).serialize(),
			key.public_key(&secp).serialize()
		);
	}

	#[test]
	fn sign_verify_recover() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let key = PrivKey::generate(&mut thread_rng()).unwrap();
		let pubkey = key.public_key(&secp);
		let digest = sha256d(b"such signature");

		let sig = key.sign_hash(&secp, digest);
		assert!(pubkey.verify_sig(&secp, digest, &sig.serialize_der()));
		assert!(!pubkey.verify_sig(&secp, sha256d(b"much tamper"), &sig.serialize_der()));

		let rsig = key.sign_hash_recoverable(&secp, digest);
		let (recid, compact) = rsig.serialize_compact();
		let recovered = PubKey::recover(&secp, digest, &compact, recid.to_i32() as u8).unwrap();
		assert_eq!(recovered, pubkey);
	}

	#[test]
	fn uncompressed_pubkey_accepted_on_input() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let key = PrivKey::decode_wif(&MAINNET, UPSTREAM_WIF).unwrap();
		let uncompressed = key.public_key(&secp).public_key().serialize_uncompressed();
		let parsed = PubKey::from_slice(&uncompressed).unwrap();
		// output form is always the 33-byte compression
		assert_eq!(parsed.serialize().to_hex(), UPSTREAM_PUBKEY);
	}
}
