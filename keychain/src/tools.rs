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

//! The flat operation surface: one-shot key, address and derivation
//! tools over string inputs and outputs. Every operation here exists in
//! a rich `Result` form carrying the failure kind; the `verify_*`
//! operations additionally keep a legacy boolean form that collapses
//! every failure to `false`.

use log::debug;
use rand::{thread_rng, RngCore};
use std::str::FromStr;
use zeroize::Zeroize;

use crate::address;
use crate::base58;
use crate::bip44::{Bip44Path, Change};
use crate::chain::ChainParams;
use crate::extkey_bip32::{ChildNumber, ExtKey, ExtendedPrivKey};
use crate::key::{self, PrivKey, PubKey};
use crate::message;
use crate::mnemonic::{self, Seed};
use crate::path::DerivationPath;
use crate::types::Error;
use crate::util::{static_secp_instance, ToHex};

/// Generate a fresh keypair on the given chain, returned as the WIF
/// private key and its P2PKH address.
pub fn generate_priv_pub_keypair(chain: &ChainParams) -> Result<(String, String), Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = PrivKey::generate(&mut thread_rng())?;
	let addr = address::p2pkh(chain, &key.public_key(&secp));
	debug!("generated {} keypair for {}", chain.tag, addr);
	Ok((key.encode_wif(chain), addr))
}

/// Generate a fresh private key, returned in WIF and raw hex form
pub fn gen_privatekey(chain: &ChainParams) -> Result<(String, String), Error> {
	let key = PrivKey::generate(&mut thread_rng())?;
	let mut raw = key.secret_bytes();
	let hex = raw.to_hex();
	raw.zeroize();
	Ok((key.encode_wif(chain), hex))
}

/// The compressed public key of a WIF private key, hex encoded
pub fn pubkey_from_privatekey(chain: &ChainParams, wif: &str) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = PrivKey::decode_wif(chain, wif)?;
	Ok(key.public_key(&secp).serialize().to_hex())
}

/// All three address forms of a hex compressed public key:
/// (p2pkh, p2sh-p2wpkh, p2wpkh)
pub fn addresses_from_pubkey(
	chain: &ChainParams,
	pubkey_hex: &str,
) -> Result<(String, String, String), Error> {
	let pubkey = PubKey::from_hex(pubkey_hex)?;
	Ok((
		address::p2pkh(chain, &pubkey),
		address::p2sh_p2wpkh(chain, &pubkey),
		address::p2wpkh(chain, &pubkey)?,
	))
}

/// The P2PKH address of a raw hex private key
pub fn address_from_privkey(chain: &ChainParams, priv_hex: &str) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = PrivKey::from_hex(priv_hex)?;
	Ok(address::p2pkh(chain, &key.public_key(&secp)))
}

/// Checks that a WIF private key and a P2PKH address form a pair on the
/// given chain, reporting why not
pub fn try_verify_priv_pub_keypair(
	wif: &str,
	p2pkh: &str,
	chain: &ChainParams,
) -> Result<(), Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = PrivKey::decode_wif(chain, wif)?;
	if address::p2pkh(chain, &key.public_key(&secp)) != p2pkh {
		return Err(Error::Mismatch);
	}
	Ok(())
}

/// Boolean form of [`try_verify_priv_pub_keypair`]
pub fn verify_priv_pub_keypair(wif: &str, p2pkh: &str, chain: &ChainParams) -> bool {
	try_verify_priv_pub_keypair(wif, p2pkh, chain).is_ok()
}

/// Checksum-level validation of a P2PKH address string
pub fn verify_p2pkh_address(addr: &str) -> bool {
	address::verify_p2pkh(addr)
}

/// Generate a fresh HD master key for the chain, serialized in base58
pub fn hd_gen_master(chain: &'static ChainParams) -> Result<String, Error> {
	Ok(gen_master(chain)?.to_string())
}

/// Generate a fresh HD master key, returned with the P2PKH address of
/// the master node
pub fn generate_hd_master_keypair(chain: &'static ChainParams) -> Result<(String, String), Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let master = gen_master(chain)?;
	let addr = address::p2pkh(chain, &master.public_key(&secp));
	debug!("generated {} hd master for {}", chain.tag, addr);
	Ok((master.to_string(), addr))
}

fn gen_master(chain: &'static ChainParams) -> Result<ExtendedPrivKey, Error> {
	let mut seed = [0u8; 32];
	if thread_rng().try_fill_bytes(&mut seed).is_err() {
		return Err(Error::Key(key::Error::RngFailure));
	}
	let master = ExtendedPrivKey::new_master(chain, &seed);
	seed.zeroize();
	Ok(master?)
}

/// The P2PKH address of an extended key's node. Accepts both private and
/// public keys; the chain is read off the serialization magic.
pub fn derive_hd_pub_from_master(xkey: &str) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = ExtKey::from_str(xkey)?;
	Ok(address::p2pkh(key.chain(), &key.public_key(&secp)))
}

/// Checks that an extended private master key and a P2PKH address form a
/// pair, requiring both to be serialized for the given chain
pub fn try_verify_hd_master_keypair(
	xpriv: &str,
	p2pkh: &str,
	chain: &ChainParams,
) -> Result<(), Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let master = ExtendedPrivKey::from_str(xpriv)?;
	if master.chain.bip32_privkey_magic != chain.bip32_privkey_magic {
		return Err(Error::WrongNetwork);
	}
	// the address must carry this chain's version byte, not merely any
	// valid checksum
	let payload = base58::from_check(p2pkh)?;
	if payload.len() != 21 {
		return Err(Error::Key(key::Error::BadLength(payload.len())));
	}
	if payload[0] != chain.b58_prefix_pubkey {
		return Err(Error::WrongNetwork);
	}
	if address::p2pkh(chain, &master.public_key(&secp)) != p2pkh {
		return Err(Error::Mismatch);
	}
	Ok(())
}

/// Boolean form of [`try_verify_hd_master_keypair`]
pub fn verify_hd_master_keypair(xpriv: &str, p2pkh: &str, chain: &ChainParams) -> bool {
	try_verify_hd_master_keypair(xpriv, p2pkh, chain).is_ok()
}

/// Walk a derivation path from an extended key and serialize the final
/// node. `want_private` selects private-key output; a path spelled with
/// a capital `M` always produces the public form.
pub fn derive_by_path(masterkey: &str, path: &str, want_private: bool) -> Result<String, Error> {
	let key = ExtKey::from_str(masterkey)?;
	let path = DerivationPath::from_str(path)?;
	let public_out = path.is_public() || !want_private;
	walk(&key, path.children(), public_out)
}

/// Derive the BIP44 position `m/44'/coin'/account'/change[/index]` from
/// a master key (chain taken from the key's magic) and serialize it,
/// private or public per `want_private`. Without an index the
/// change-branch node itself is produced.
pub fn derive_bip44(
	masterkey: &str,
	account: u32,
	change: u32,
	index: Option<u32>,
	want_private: bool,
) -> Result<String, Error> {
	let key = ExtKey::from_str(masterkey)?;
	let change = Change::from_u32(change).ok_or(Error::BadChangeLevel(change))?;
	let children = Bip44Path {
		account,
		change,
		index,
	}
	.children(key.chain());
	walk(&key, &children, !want_private)
}

/// Derive a child extended key by path. The extended key must belong to
/// the passed chain; private keys derive privately and stay private
/// unless the path asks otherwise.
pub fn hd_derive(chain: &ChainParams, xkey: &str, path: &str) -> Result<String, Error> {
	let key = ExtKey::from_str(xkey)?;
	if key.chain().bip32_privkey_magic != chain.bip32_privkey_magic {
		return Err(Error::WrongNetwork);
	}
	let path = DerivationPath::from_str(path)?;
	let public_out = path.is_public() || matches!(key, ExtKey::Public(_));
	walk(&key, path.children(), public_out)
}

fn walk(key: &ExtKey, children: &[ChildNumber], public_out: bool) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	match *key {
		ExtKey::Private(ref k) => {
			let derived = k.derive_priv(&secp, children)?;
			if public_out {
				Ok(derived.to_public(&secp).to_string())
			} else {
				Ok(derived.to_string())
			}
		}
		ExtKey::Public(ref k) => {
			if !public_out {
				return Err(Error::PublicMasterKey);
			}
			Ok(k.derive_pub(&secp, children)?.to_string())
		}
	}
}

/// BIP39 seed stretching; see [`mnemonic::to_seed`]
pub fn seed_from_mnemonic(mnemonic_sentence: &str, passphrase: &str) -> Seed {
	mnemonic::to_seed(mnemonic_sentence, passphrase)
}

/// The P2PKH address at `m/44'/coin'/account'/change/index` of the
/// wallet a mnemonic and passphrase describe
pub fn derive_from_mnemonic(
	account: u32,
	index: u32,
	change: u32,
	mnemonic_sentence: &str,
	passphrase: &str,
	chain: &'static ChainParams,
) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let change = Change::from_u32(change).ok_or(Error::BadChangeLevel(change))?;
	let seed = mnemonic::to_seed(mnemonic_sentence, passphrase);
	let master = ExtendedPrivKey::new_master(chain, &seed)?;
	let leaf = master.derive_priv(
		&secp,
		&Bip44Path {
			account,
			change,
			index: Some(index),
		}
		.children(chain),
	)?;
	Ok(address::p2pkh(chain, &leaf.public_key(&secp)))
}

/// The HD master keypair (xpriv, P2PKH of the master node) of the wallet
/// a mnemonic and passphrase describe
pub fn generate_hd_master_keypair_from_mnemonic(
	mnemonic_sentence: &str,
	passphrase: &str,
	chain: &'static ChainParams,
) -> Result<(String, String), Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let seed = mnemonic::to_seed(mnemonic_sentence, passphrase);
	let master = ExtendedPrivKey::new_master(chain, &seed)?;
	let addr = address::p2pkh(chain, &master.public_key(&secp));
	Ok((master.to_string(), addr))
}

/// Checks that an HD master key and address are the ones a mnemonic and
/// passphrase produce on the given chain
pub fn try_verify_hd_master_keypair_from_mnemonic(
	xpriv: &str,
	p2pkh: &str,
	mnemonic_sentence: &str,
	passphrase: &str,
	chain: &'static ChainParams,
) -> Result<(), Error> {
	let (expected_xpriv, expected_addr) =
		generate_hd_master_keypair_from_mnemonic(mnemonic_sentence, passphrase, chain)?;
	if expected_xpriv != xpriv || expected_addr != p2pkh {
		return Err(Error::Mismatch);
	}
	Ok(())
}

/// Boolean form of [`try_verify_hd_master_keypair_from_mnemonic`]
pub fn verify_hd_master_keypair_from_mnemonic(
	xpriv: &str,
	p2pkh: &str,
	mnemonic_sentence: &str,
	passphrase: &str,
	chain: &'static ChainParams,
) -> bool {
	try_verify_hd_master_keypair_from_mnemonic(xpriv, p2pkh, mnemonic_sentence, passphrase, chain)
		.is_ok()
}

/// Sign a message with a raw hex private key; base64 packed signature
pub fn sign_message(priv_hex: &str, msg: &str) -> Result<String, Error> {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	let key = PrivKey::from_hex(priv_hex)?;
	Ok(message::sign(&secp, &key, msg.as_bytes()))
}

/// Verify a base64 packed message signature against a P2PKH address.
/// Uniformly `false` on any failure.
pub fn verify_message(addr: &str, signature_b64: &str, msg: &str) -> bool {
	let secp = static_secp_instance();
	let secp = secp.lock().unwrap();
	message::verify(&secp, addr, signature_b64, msg.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::chain::{MAINNET, TESTNET};
	use crate::extkey_bip32::Error as ExtKeyError;
	use crate::util::from_hex;

	const UPSTREAM_MASTER: &str = "dgpv557t1z21sLCnAz3cJPW5DiVErXdAi7iWpSJwBBaeN87umwje8LuTKREPTYPTNGXGnB3oNd2z6RmFFDU99WKbiRDJKKXfHxf48puZibauJYB";
	const UPSTREAM_CHILD_M0: &str = "dgpv544MJMFeoz5LXkwbZTWwouwFje2Yp9c1A8ReNaapDFjW44jEcLXv3B3KQg3fjWXWVC9FGRyxLaCHjN1DUeGgoYJxMYM723wrLN6BArKUxe3";
	const TEST_MNEMONIC: &str =
		"abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

	#[test]
	fn addresses_from_pubkey_upstream_vector() {
		let (p2pkh, p2sh_p2wpkh, p2wpkh) = addresses_from_pubkey(
			&MAINNET,
			"039ca1fdedbe160cb7b14df2a798c8fed41ad4ed30b06a85ad23e03abe43c413b2",
		)
		.unwrap();
		assert_eq!(p2pkh, "DTwqVfB7tbwca2PzwBvPV1g1xDB2YPrCYh");
		assert_eq!(p2sh_p2wpkh, "A6JS4r6BucWmrMXeTuuxbVCrS9iHPckeBf");
		assert_eq!(p2wpkh, "doge1qlg5uydlgue7ywqcnt6rumf8743pm5usr5rlvmd");
	}

	#[test]
	fn pubkey_from_privatekey_upstream_vector() {
		assert_eq!(
			pubkey_from_privatekey(
				&MAINNET,
				"QUaohmokNWroj71dRtmPSses5eRw5SGLKsYSRSVisJHyZdxhdDCZ"
			)
			.unwrap(),
			"024c33fbb2f6accde1db907e88ebf5dd1693e31433c62aaeef42f7640974f602ba"
		);
	}

	#[test]
	fn hd_derive_upstream_vector() {
		assert_eq!(
			hd_derive(&MAINNET, UPSTREAM_MASTER, "m/0").unwrap(),
			UPSTREAM_CHILD_M0
		);
		// same walk through the generic path operation
		assert_eq!(
			derive_by_path(UPSTREAM_MASTER, "m/0", true).unwrap(),
			UPSTREAM_CHILD_M0
		);
		// chain mismatch is refused outright
		assert_eq!(
			hd_derive(&TESTNET, UPSTREAM_MASTER, "m/0"),
			Err(Error::WrongNetwork)
		);
	}

	#[test]
	fn gen_privatekey_shape() {
		let (wif_a, hex_a) = gen_privatekey(&MAINNET).unwrap();
		let (wif_b, _) = gen_privatekey(&MAINNET).unwrap();
		assert_ne!(wif_a, wif_b);

		let payload = base58::from_check(&wif_a).unwrap();
		assert_eq!(payload[0], 0x9e);
		assert_eq!(payload.len(), 34);
		assert_eq!(payload[1..33], from_hex(&hex_a).unwrap()[..]);
		// the scalar decodes as a valid key
		assert!(PrivKey::decode_wif(&MAINNET, &wif_a).is_ok());
	}

	#[test]
	fn keypair_verify_and_flip() {
		crate::util::init_test_logger();
		let (wif, addr) = generate_priv_pub_keypair(&MAINNET).unwrap();
		assert!(verify_priv_pub_keypair(&wif, &addr, &MAINNET));
		assert!(verify_p2pkh_address(&addr));
		// a keypair is bound to its chain
		assert!(!verify_priv_pub_keypair(&wif, &addr, &TESTNET));

		// flipping any single character of the WIF must break it
		for pos in [1, wif.len() / 2, wif.len() - 1] {
			let mut flipped: Vec<u8> = wif.clone().into_bytes();
			flipped[pos] = if flipped[pos] == b'4' { b'5' } else { b'4' };
			let flipped = String::from_utf8(flipped).unwrap();
			if flipped != wif {
				assert!(!verify_priv_pub_keypair(&flipped, &addr, &MAINNET));
			}
		}
	}

	#[test]
	fn hd_master_keypair_verify() {
		let (xpriv, addr) = generate_hd_master_keypair(&MAINNET).unwrap();
		assert!(verify_hd_master_keypair(&xpriv, &addr, &MAINNET));
		// wrong chain on either side is refused
		assert_eq!(
			try_verify_hd_master_keypair(&xpriv, &addr, &TESTNET),
			Err(Error::WrongNetwork)
		);
		// an unrelated master does not match
		let (other_xpriv, _) = generate_hd_master_keypair(&MAINNET).unwrap();
		assert_eq!(
			try_verify_hd_master_keypair(&other_xpriv, &addr, &MAINNET),
			Err(Error::Mismatch)
		);
	}

	#[test]
	fn derived_pubkey_same_from_private_and_neutered() {
		let addr_from_priv = derive_hd_pub_from_master(UPSTREAM_MASTER).unwrap();
		let xpub = derive_by_path(UPSTREAM_MASTER, "M", false).unwrap();
		let addr_from_pub = derive_hd_pub_from_master(&xpub).unwrap();
		assert_eq!(addr_from_priv, addr_from_pub);
		assert!(verify_p2pkh_address(&addr_from_priv));
	}

	#[test]
	fn neutering_equals_public_path_root() {
		// serialize_public(parse(xpriv)) must equal walking the bare "M"
		let neutered = {
			let secp = static_secp_instance();
			let secp = secp.lock().unwrap();
			let master = ExtendedPrivKey::from_str(UPSTREAM_MASTER).unwrap();
			master.to_public(&secp).to_string()
		};
		assert_eq!(derive_by_path(UPSTREAM_MASTER, "M", true).unwrap(), neutered);
	}

	#[test]
	fn hardened_fails_from_public_key() {
		let xpub = derive_by_path(UPSTREAM_MASTER, "M", false).unwrap();
		for path in &["m/0'", "m/44'/3'/0'/0/5", "M/1/2'"] {
			assert_eq!(
				derive_by_path(&xpub, path, false),
				Err(Error::ExtKey(ExtKeyError::CannotDeriveFromHardenedKey)),
				"path {} should not derive from an xpub",
				path
			);
		}
		// and private output cannot come from a public key at all
		assert_eq!(
			derive_by_path(&xpub, "m/1", true),
			Err(Error::PublicMasterKey)
		);
	}

	#[test]
	fn bip44_matches_explicit_path() {
		assert_eq!(
			derive_bip44(UPSTREAM_MASTER, 0, 0, Some(5), true).unwrap(),
			derive_by_path(UPSTREAM_MASTER, "m/44'/3'/0'/0/5", true).unwrap()
		);
		// account level: path stops at the change branch
		assert_eq!(
			derive_bip44(UPSTREAM_MASTER, 1, 1, None, false).unwrap(),
			derive_by_path(UPSTREAM_MASTER, "m/44'/3'/1'/1", false).unwrap()
		);
		assert_eq!(
			derive_bip44(UPSTREAM_MASTER, 0, 2, Some(0), true),
			Err(Error::BadChangeLevel(2))
		);
	}

	#[test]
	fn mnemonic_flow() {
		assert_eq!(seed_from_mnemonic(TEST_MNEMONIC, "").as_bytes().len(), 64);
		let (xpriv, addr) =
			generate_hd_master_keypair_from_mnemonic(TEST_MNEMONIC, "", &MAINNET).unwrap();
		assert!(xpriv.starts_with("dgpv"));
		assert!(addr.starts_with('D'));
		assert!(verify_hd_master_keypair_from_mnemonic(
			&xpriv,
			&addr,
			TEST_MNEMONIC,
			"",
			&MAINNET
		));
		// a passphrase produces a different wallet
		assert!(!verify_hd_master_keypair_from_mnemonic(
			&xpriv,
			&addr,
			TEST_MNEMONIC,
			"TREZOR",
			&MAINNET
		));

		let leaf = derive_from_mnemonic(0, 0, 0, TEST_MNEMONIC, "", &MAINNET).unwrap();
		assert!(verify_p2pkh_address(&leaf));
		// deterministic, and equal to walking the master by path
		assert_eq!(
			leaf,
			derive_from_mnemonic(0, 0, 0, TEST_MNEMONIC, "", &MAINNET).unwrap()
		);
		let by_path = derive_by_path(&xpriv, "m/44'/3'/0'/0/0", false).unwrap();
		assert_eq!(derive_hd_pub_from_master(&by_path).unwrap(), leaf);
	}

	#[test]
	fn message_sign_verify_flow() {
		let (_, priv_hex) = gen_privatekey(&MAINNET).unwrap();
		let addr = address_from_privkey(&MAINNET, &priv_hex).unwrap();

		let sig = sign_message(&priv_hex, "hello").unwrap();
		assert!(verify_message(&addr, &sig, "hello"));
		assert!(!verify_message(&addr, &sig, "hellO"));
	}
}
