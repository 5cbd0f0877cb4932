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

//! Implementation of BIP32 hierarchical deterministic wallets, as defined
//! at https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki,
//! serialized under the Dogecoin extended-key magics (`dgpv`/`dgub` on
//! mainnet).

use byteorder::{BigEndian, ByteOrder};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::str::FromStr;
use std::{error, fmt};
use zeroize::Zeroize;

use crate::base58;
use crate::chain::{chain_from_bip32_magic, ChainParams};
use crate::hash::hash160;
use crate::key::PubKey;
use crate::util::secp::{PublicKey, Scalar, Secp256k1, SecretKey, Signing};

// Create alias for HMAC-SHA512
type HmacSha512 = Hmac<Sha512>;

/// Key to the master HMAC, fixed by BIP32 across bitcoin-derived chains
const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Serialized length of an extended key, checksum excluded
const EXTENDED_KEY_SIZE: usize = 78;

/// Bounds on the master seed length in bytes
const MIN_SEED_SIZE: usize = 16;
const MAX_SEED_SIZE: usize = 64;

/// A BIP32 error
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// A pk->pk derivation was attempted on a hardened key
	CannotDeriveFromHardenedKey,
	/// A child number was provided that was out of range
	InvalidChildNumber(u32),
	/// Seed outside the 16..=64 byte window, or one whose left HMAC half
	/// is not a usable scalar
	InvalidSeed,
	/// Ran out of indices while skipping invalid children, or the tree
	/// is already at maximum depth
	InvalidDerivation,
	/// Not a well-formed 78-byte extended key payload
	MalformedExtKey,
	/// Serialization magic of an unknown network
	UnknownMagic,
	/// base58 transport failure
	Base58(base58::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::CannotDeriveFromHardenedKey => {
				f.write_str("cannot derive hardened key from public key")
			}
			Error::InvalidChildNumber(n) => write!(f, "child number {} is invalid", n),
			Error::InvalidSeed => f.write_str("seed unusable as a master key"),
			Error::InvalidDerivation => f.write_str("no derivable child at or after this index"),
			Error::MalformedExtKey => f.write_str("malformed extended key"),
			Error::UnknownMagic => f.write_str("extended key magic of an unknown network"),
			Error::Base58(ref e) => write!(f, "{}", e),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Error::Base58(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<base58::Error> for Error {
	fn from(e: base58::Error) -> Error {
		Error::Base58(e)
	}
}

/// A child number for a derived key
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ChildNumber {
	/// Non-hardened key
	Normal {
		/// Key index, within [0, 2^31 - 1]
		index: u32,
	},
	/// Hardened key
	Hardened {
		/// Key index, within [0, 2^31 - 1]
		index: u32,
	},
}

impl ChildNumber {
	/// Create a non-hardened child number; the index must be within
	/// [0, 2^31 - 1].
	pub fn from_normal_idx(index: u32) -> Result<Self, Error> {
		if index & (1 << 31) != 0 {
			return Err(Error::InvalidChildNumber(index));
		}
		Ok(ChildNumber::Normal { index })
	}

	/// Create a hardened child number; the index must be within
	/// [0, 2^31 - 1].
	pub fn from_hardened_idx(index: u32) -> Result<Self, Error> {
		if index & (1 << 31) != 0 {
			return Err(Error::InvalidChildNumber(index));
		}
		Ok(ChildNumber::Hardened { index })
	}

	/// Returns `true` if the child number is hardened
	pub fn is_hardened(self) -> bool {
		match self {
			ChildNumber::Hardened { .. } => true,
			ChildNumber::Normal { .. } => false,
		}
	}

	/// The next index within the same hardened class, for the BIP32
	/// skip-invalid-child rule. Errors once the class is exhausted.
	fn next_in_class(self) -> Result<ChildNumber, Error> {
		match self {
			ChildNumber::Normal { index } if index < (1 << 31) - 1 => {
				Ok(ChildNumber::Normal { index: index + 1 })
			}
			ChildNumber::Hardened { index } if index < (1 << 31) - 1 => {
				Ok(ChildNumber::Hardened { index: index + 1 })
			}
			_ => Err(Error::InvalidDerivation),
		}
	}
}

impl From<u32> for ChildNumber {
	fn from(number: u32) -> Self {
		if number & (1 << 31) != 0 {
			ChildNumber::Hardened {
				index: number ^ (1 << 31),
			}
		} else {
			ChildNumber::Normal { index: number }
		}
	}
}

impl From<ChildNumber> for u32 {
	fn from(cnum: ChildNumber) -> Self {
		match cnum {
			ChildNumber::Normal { index } => index,
			ChildNumber::Hardened { index } => index | (1 << 31),
		}
	}
}

impl fmt::Display for ChildNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			ChildNumber::Hardened { index } => write!(f, "{}'", index),
			ChildNumber::Normal { index } => write!(f, "{}", index),
		}
	}
}

/// Extended private key
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPrivKey {
	/// The chain this key serializes under
	pub chain: &'static ChainParams,
	/// How many derivations this key is from the master (which is 0)
	pub depth: u8,
	/// Fingerprint of the parent key (0 for master)
	pub parent_fingerprint: [u8; 4],
	/// Child number of the key used to derive from parent (0 for master)
	pub child_number: ChildNumber,
	/// Chain code
	pub chain_code: [u8; 32],
	/// Secret key
	secret_key: SecretKey,
}

impl Drop for ExtendedPrivKey {
	fn drop(&mut self) {
		self.secret_key.non_secure_erase();
		self.chain_code.zeroize();
	}
}

impl fmt::Debug for ExtendedPrivKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ExtendedPrivKey")
			.field("chain", &self.chain.tag)
			.field("depth", &self.depth)
			.field("parent_fingerprint", &self.parent_fingerprint)
			.field("child_number", &self.child_number)
			.field("secret_key", &"<secret>")
			.finish()
	}
}

/// Extended public key
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ExtendedPubKey {
	/// The chain this key serializes under
	pub chain: &'static ChainParams,
	/// How many derivations this key is from the master (which is 0)
	pub depth: u8,
	/// Fingerprint of the parent key
	pub parent_fingerprint: [u8; 4],
	/// Child number of the key used to derive from parent (0 for master)
	pub child_number: ChildNumber,
	/// Chain code
	pub chain_code: [u8; 32],
	/// Public key
	pub public_key: PubKey,
}

impl ExtendedPrivKey {
	/// Construct a new master key from a seed value of 16 to 64 bytes
	pub fn new_master(chain: &'static ChainParams, seed: &[u8]) -> Result<ExtendedPrivKey, Error> {
		if seed.len() < MIN_SEED_SIZE || seed.len() > MAX_SEED_SIZE {
			return Err(Error::InvalidSeed);
		}
		let mut hmac =
			HmacSha512::new_from_slice(MASTER_SEED_KEY).expect("HMAC can take key of any size");
		hmac.update(seed);
		let mut result = [0u8; 64];
		result.copy_from_slice(&hmac.finalize().into_bytes());

		let secret_key = SecretKey::from_slice(&result[..32]).map_err(|_| Error::InvalidSeed);
		let mut chain_code = [0u8; 32];
		chain_code.copy_from_slice(&result[32..]);
		result.zeroize();

		Ok(ExtendedPrivKey {
			chain,
			depth: 0,
			parent_fingerprint: [0; 4],
			child_number: ChildNumber::Normal { index: 0 },
			chain_code,
			secret_key: secret_key?,
		})
	}

	/// Attempts to derive an extended private key from a path
	pub fn derive_priv<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		cnums: &[ChildNumber],
	) -> Result<ExtendedPrivKey, Error> {
		let mut sk: ExtendedPrivKey = self.clone();
		for cnum in cnums {
			sk = sk.ckd_priv(secp, *cnum)?;
		}
		Ok(sk)
	}

	/// Private->Private child key derivation. An index whose HMAC left
	/// half is not a usable scalar, or whose child scalar comes out zero,
	/// is skipped in favour of the next index of the same class.
	pub fn ckd_priv<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		i: ChildNumber,
	) -> Result<ExtendedPrivKey, Error> {
		let depth = self.depth.checked_add(1).ok_or(Error::InvalidDerivation)?;
		let mut i = i;
		loop {
			let mut hmac = HmacSha512::new_from_slice(&self.chain_code)
				.expect("HMAC can take key of any size");
			match i {
				ChildNumber::Normal { .. } => {
					// Non-hardened key: compute public data and use that
					hmac.update(&PublicKey::from_secret_key(secp, &self.secret_key).serialize());
				}
				ChildNumber::Hardened { .. } => {
					// Hardened key: use only secret data to prevent public derivation
					let mut sk_bytes = self.secret_key.secret_bytes();
					hmac.update(&[0u8]);
					hmac.update(&sk_bytes);
					sk_bytes.zeroize();
				}
			}
			let mut ser_i = [0u8; 4];
			BigEndian::write_u32(&mut ser_i, u32::from(i));
			hmac.update(&ser_i);

			let mut result = [0u8; 64];
			result.copy_from_slice(&hmac.finalize().into_bytes());

			let child_key = SecretKey::from_slice(&result[..32])
				.ok()
				.and_then(|il| il.add_tweak(&Scalar::from(self.secret_key)).ok());
			match child_key {
				Some(secret_key) => {
					let mut chain_code = [0u8; 32];
					chain_code.copy_from_slice(&result[32..]);
					result.zeroize();
					return Ok(ExtendedPrivKey {
						chain: self.chain,
						depth,
						parent_fingerprint: self.fingerprint(secp),
						child_number: i,
						chain_code,
						secret_key,
					});
				}
				None => {
					// BIP32: the child at this index does not exist,
					// proceed with the next value for i
					result.zeroize();
					i = i.next_in_class()?;
				}
			}
		}
	}

	/// The public half of this node
	pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> PubKey {
		PubKey::from_inner(PublicKey::from_secret_key(secp, &self.secret_key))
	}

	/// Returns the HASH160 of the compressed public key
	pub fn identifier<C: Signing>(&self, secp: &Secp256k1<C>) -> [u8; 20] {
		hash160(&self.public_key(secp).serialize())
	}

	/// Returns the first four bytes of the identifier
	pub fn fingerprint<C: Signing>(&self, secp: &Secp256k1<C>) -> [u8; 4] {
		let mut ret = [0u8; 4];
		ret.copy_from_slice(&self.identifier(secp)[0..4]);
		ret
	}

	/// Neuter: the extended public key of this node
	pub fn to_public<C: Signing>(&self, secp: &Secp256k1<C>) -> ExtendedPubKey {
		ExtendedPubKey {
			chain: self.chain,
			depth: self.depth,
			parent_fingerprint: self.parent_fingerprint,
			child_number: self.child_number,
			chain_code: self.chain_code,
			public_key: self.public_key(secp),
		}
	}

	fn decode(data: &[u8]) -> Result<ExtendedPrivKey, Error> {
		let (chain, depth, parent_fingerprint, child_number, chain_code, key_data) =
			split_extended_payload(data, true)?;
		if key_data[0] != 0 {
			return Err(Error::MalformedExtKey);
		}
		let secret_key =
			SecretKey::from_slice(&key_data[1..]).map_err(|_| Error::MalformedExtKey)?;
		Ok(ExtendedPrivKey {
			chain,
			depth,
			parent_fingerprint,
			child_number,
			chain_code,
			secret_key,
		})
	}
}

impl fmt::Display for ExtendedPrivKey {
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut ret = [0u8; EXTENDED_KEY_SIZE];
		ret[0..4].copy_from_slice(&self.chain.bip32_privkey_magic);
		ret[4] = self.depth;
		ret[5..9].copy_from_slice(&self.parent_fingerprint);
		BigEndian::write_u32(&mut ret[9..13], u32::from(self.child_number));
		ret[13..45].copy_from_slice(&self.chain_code);
		ret[45] = 0;
		ret[46..78].copy_from_slice(&self.secret_key.secret_bytes());
		let encoded = base58::check_encode_slice(&ret);
		ret.zeroize();
		fmt.write_str(&encoded)
	}
}

impl FromStr for ExtendedPrivKey {
	type Err = Error;

	fn from_str(inp: &str) -> Result<ExtendedPrivKey, Error> {
		let mut data = base58::from_check(inp)?;
		let res = ExtendedPrivKey::decode(&data);
		data.zeroize();
		res
	}
}

impl ExtendedPubKey {
	/// Attempts to derive an extended public key from a path
	pub fn derive_pub<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		cnums: &[ChildNumber],
	) -> Result<ExtendedPubKey, Error> {
		let mut pk: ExtendedPubKey = *self;
		for cnum in cnums {
			pk = pk.ckd_pub(secp, *cnum)?;
		}
		Ok(pk)
	}

	/// Public->Public child key derivation, non-hardened indices only.
	/// Indices whose tweak is unusable or whose sum lands on the point at
	/// infinity are skipped for the next index.
	pub fn ckd_pub<C: Signing>(
		&self,
		secp: &Secp256k1<C>,
		i: ChildNumber,
	) -> Result<ExtendedPubKey, Error> {
		if i.is_hardened() {
			return Err(Error::CannotDeriveFromHardenedKey);
		}
		let depth = self.depth.checked_add(1).ok_or(Error::InvalidDerivation)?;
		let mut i = i;
		loop {
			let mut hmac = HmacSha512::new_from_slice(&self.chain_code)
				.expect("HMAC can take key of any size");
			hmac.update(&self.public_key.serialize());
			let mut ser_i = [0u8; 4];
			BigEndian::write_u32(&mut ser_i, u32::from(i));
			hmac.update(&ser_i);

			let mut result = [0u8; 64];
			result.copy_from_slice(&hmac.finalize().into_bytes());

			let child_key = SecretKey::from_slice(&result[..32]).ok().and_then(|il| {
				self.public_key
					.public_key()
					.combine(&PublicKey::from_secret_key(secp, &il))
					.ok()
			});
			match child_key {
				Some(key) => {
					let mut chain_code = [0u8; 32];
					chain_code.copy_from_slice(&result[32..]);
					result.zeroize();
					return Ok(ExtendedPubKey {
						chain: self.chain,
						depth,
						parent_fingerprint: self.fingerprint(),
						child_number: i,
						chain_code,
						public_key: PubKey::from_inner(key),
					});
				}
				None => {
					result.zeroize();
					i = i.next_in_class()?;
				}
			}
		}
	}

	/// Returns the HASH160 of the compressed public key
	pub fn identifier(&self) -> [u8; 20] {
		hash160(&self.public_key.serialize())
	}

	/// Returns the first four bytes of the identifier
	pub fn fingerprint(&self) -> [u8; 4] {
		let mut ret = [0u8; 4];
		ret.copy_from_slice(&self.identifier()[0..4]);
		ret
	}

	fn decode(data: &[u8]) -> Result<ExtendedPubKey, Error> {
		let (chain, depth, parent_fingerprint, child_number, chain_code, key_data) =
			split_extended_payload(data, false)?;
		let public_key = PubKey::from_slice(key_data).map_err(|_| Error::MalformedExtKey)?;
		Ok(ExtendedPubKey {
			chain,
			depth,
			parent_fingerprint,
			child_number,
			chain_code,
			public_key,
		})
	}
}

impl fmt::Display for ExtendedPubKey {
	fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut ret = [0u8; EXTENDED_KEY_SIZE];
		ret[0..4].copy_from_slice(&self.chain.bip32_pubkey_magic);
		ret[4] = self.depth;
		ret[5..9].copy_from_slice(&self.parent_fingerprint);
		BigEndian::write_u32(&mut ret[9..13], u32::from(self.child_number));
		ret[13..45].copy_from_slice(&self.chain_code);
		ret[45..78].copy_from_slice(&self.public_key.serialize());
		fmt.write_str(&base58::check_encode_slice(&ret))
	}
}

impl FromStr for ExtendedPubKey {
	type Err = Error;

	fn from_str(inp: &str) -> Result<ExtendedPubKey, Error> {
		let data = base58::from_check(inp)?;
		ExtendedPubKey::decode(&data)
	}
}

/// Either half of an extended key pair, as parsed from its base58 string;
/// the serialization magic decides which one (and for which chain).
#[derive(Debug, Clone)]
pub enum ExtKey {
	/// An extended private key
	Private(ExtendedPrivKey),
	/// An extended public key
	Public(ExtendedPubKey),
}

impl ExtKey {
	/// The chain the key was serialized under
	pub fn chain(&self) -> &'static ChainParams {
		match *self {
			ExtKey::Private(ref k) => k.chain,
			ExtKey::Public(ref k) => k.chain,
		}
	}

	/// The public half of this node
	pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> PubKey {
		match *self {
			ExtKey::Private(ref k) => k.public_key(secp),
			ExtKey::Public(ref k) => k.public_key,
		}
	}
}

impl FromStr for ExtKey {
	type Err = Error;

	fn from_str(inp: &str) -> Result<ExtKey, Error> {
		let mut data = base58::from_check(inp)?;
		let res = if data.len() != EXTENDED_KEY_SIZE {
			Err(Error::MalformedExtKey)
		} else {
			let mut magic = [0u8; 4];
			magic.copy_from_slice(&data[0..4]);
			match chain_from_bip32_magic(&magic) {
				Some((_, true)) => ExtendedPrivKey::decode(&data).map(ExtKey::Private),
				Some((_, false)) => ExtendedPubKey::decode(&data).map(ExtKey::Public),
				None => Err(Error::UnknownMagic),
			}
		};
		data.zeroize();
		res
	}
}

/// Common field split of the 78-byte payload, with the magic and depth
/// sanity checks.
fn split_extended_payload(
	data: &[u8],
	want_private: bool,
) -> Result<(&'static ChainParams, u8, [u8; 4], ChildNumber, [u8; 32], &[u8]), Error> {
	if data.len() != EXTENDED_KEY_SIZE {
		return Err(Error::MalformedExtKey);
	}
	let mut magic = [0u8; 4];
	magic.copy_from_slice(&data[0..4]);
	let (chain, is_private) = chain_from_bip32_magic(&magic).ok_or(Error::UnknownMagic)?;
	if is_private != want_private {
		return Err(Error::MalformedExtKey);
	}
	let depth = data[4];
	let mut parent_fingerprint = [0u8; 4];
	parent_fingerprint.copy_from_slice(&data[5..9]);
	let child_number = ChildNumber::from(BigEndian::read_u32(&data[9..13]));
	if depth == 0 && (parent_fingerprint != [0u8; 4] || u32::from(child_number) != 0) {
		return Err(Error::MalformedExtKey);
	}
	let mut chain_code = [0u8; 32];
	chain_code.copy_from_slice(&data[13..45]);
	Ok((
		chain,
		depth,
		parent_fingerprint,
		child_number,
		chain_code,
		&data[45..],
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chain::{ChainTag, MAINNET, TESTNET};
	use crate::util::{from_hex, static_secp_instance};

	const UPSTREAM_MASTER: &str = "dgpv557t1z21sLCnAz3cJPW5DiVErXdAi7iWpSJwBBaeN87umwje8LuTKREPTYPTNGXGnB3oNd2z6RmFFDU99WKbiRDJKKXfHxf48puZibauJYB";
	const UPSTREAM_CHILD_M0: &str = "dgpv544MJMFeoz5LXkwbZTWwouwFje2Yp9c1A8ReNaapDFjW44jEcLXv3B3KQg3fjWXWVC9FGRyxLaCHjN1DUeGgoYJxMYM723wrLN6BArKUxe3";

	#[test]
	fn master_seed_length_bounds() {
		assert_eq!(
			ExtendedPrivKey::new_master(&MAINNET, &[0u8; 15]),
			Err(Error::InvalidSeed)
		);
		assert_eq!(
			ExtendedPrivKey::new_master(&MAINNET, &[0u8; 65]),
			Err(Error::InvalidSeed)
		);
		assert!(ExtendedPrivKey::new_master(&MAINNET, &[0u8; 16]).is_ok());
		assert!(ExtendedPrivKey::new_master(&MAINNET, &[0u8; 64]).is_ok());
	}

	#[test]
	fn upstream_m0_derivation_vector() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let master = ExtendedPrivKey::from_str(UPSTREAM_MASTER).unwrap();
		assert_eq!(master.chain.tag, ChainTag::Main);
		assert_eq!(master.depth, 0);
		let child = master
			.ckd_priv(&secp, ChildNumber::Normal { index: 0 })
			.unwrap();
		assert_eq!(child.depth, 1);
		assert_eq!(child.to_string(), UPSTREAM_CHILD_M0);
	}

	#[test]
	fn serialization_roundtrip() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		for s in &[UPSTREAM_MASTER, UPSTREAM_CHILD_M0] {
			let key = ExtendedPrivKey::from_str(s).unwrap();
			assert_eq!(&key.to_string(), *s);
			let neutered = key.to_public(&secp);
			let reparsed = ExtendedPubKey::from_str(&neutered.to_string()).unwrap();
			assert_eq!(reparsed, neutered);
		}
	}

	#[test]
	fn public_derivation_matches_private() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let master = ExtendedPrivKey::from_str(UPSTREAM_MASTER).unwrap();
		let path = [
			ChildNumber::Normal { index: 0 },
			ChildNumber::Normal { index: 7 },
		];
		let child_priv = master.derive_priv(&secp, &path).unwrap();
		let child_pub = master.to_public(&secp).derive_pub(&secp, &path).unwrap();
		assert_eq!(child_priv.to_public(&secp), child_pub);
		assert_eq!(child_pub.depth, 2);
	}

	#[test]
	fn hardened_public_derivation_fails() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let master = ExtendedPrivKey::from_str(UPSTREAM_MASTER).unwrap();
		let pubkey = master.to_public(&secp);
		assert_eq!(
			pubkey.ckd_pub(&secp, ChildNumber::Hardened { index: 0 }),
			Err(Error::CannotDeriveFromHardenedKey)
		);
		assert_eq!(
			pubkey.derive_pub(
				&secp,
				&[
					ChildNumber::Normal { index: 1 },
					ChildNumber::Hardened { index: 2 },
				]
			),
			Err(Error::CannotDeriveFromHardenedKey)
		);
	}

	#[test]
	fn depth_increments_along_any_path() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let mut node = ExtendedPrivKey::new_master(&MAINNET, &[7u8; 32]).unwrap();
		for (expected_depth, cnum) in [
			ChildNumber::Hardened { index: 44 },
			ChildNumber::Hardened { index: 3 },
			ChildNumber::Normal { index: 0 },
			ChildNumber::Normal { index: 1 },
		]
		.iter()
		.enumerate()
		{
			node = node.ckd_priv(&secp, *cnum).unwrap();
			assert_eq!(node.depth as usize, expected_depth + 1);
		}
	}

	#[test]
	fn parse_rejects_mangled_payloads() {
		// wrong length
		assert_eq!(
			ExtendedPrivKey::from_str(&base58::check_encode_slice(&[0u8; 77])),
			Err(Error::MalformedExtKey)
		);
		// unknown magic (bitcoin xprv)
		let mut payload = [0u8; EXTENDED_KEY_SIZE];
		payload[0..4].copy_from_slice(&[0x04, 0x88, 0xad, 0xe4]);
		payload[46..78].copy_from_slice(&from_hex(&"01".repeat(32)).unwrap());
		assert_eq!(
			ExtendedPrivKey::from_str(&base58::check_encode_slice(&payload)),
			Err(Error::UnknownMagic)
		);
		// depth 0 must come with a zero parent fingerprint and child number
		payload[0..4].copy_from_slice(&MAINNET.bip32_privkey_magic);
		payload[5] = 1;
		assert_eq!(
			ExtendedPrivKey::from_str(&base58::check_encode_slice(&payload)),
			Err(Error::MalformedExtKey)
		);
		// a public magic is not an acceptable private key
		payload[5] = 0;
		payload[0..4].copy_from_slice(&MAINNET.bip32_pubkey_magic);
		assert_eq!(
			ExtendedPrivKey::from_str(&base58::check_encode_slice(&payload)),
			Err(Error::MalformedExtKey)
		);
	}

	#[test]
	fn extkey_dispatch_on_magic() {
		let secp = static_secp_instance();
		let secp = secp.lock().unwrap();
		let master = ExtendedPrivKey::from_str(UPSTREAM_MASTER).unwrap();
		match ExtKey::from_str(UPSTREAM_MASTER).unwrap() {
			ExtKey::Private(k) => assert_eq!(k, master),
			ExtKey::Public(_) => panic!("private magic parsed as public"),
		}
		let xpub = master.to_public(&secp).to_string();
		match ExtKey::from_str(&xpub).unwrap() {
			ExtKey::Public(k) => assert_eq!(k, master.to_public(&secp)),
			ExtKey::Private(_) => panic!("public magic parsed as private"),
		}
	}

	#[test]
	fn testnet_serialization_uses_testnet_magic() {
		let key = ExtendedPrivKey::new_master(&TESTNET, &[9u8; 32]).unwrap();
		let s = key.to_string();
		let parsed = ExtendedPrivKey::from_str(&s).unwrap();
		assert_eq!(parsed.chain.tag, ChainTag::Test);
	}
}
