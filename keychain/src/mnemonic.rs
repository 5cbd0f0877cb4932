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

//! BIP39 mnemonic-to-seed stretching, as defined at
//! https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki.
//! Wordlist membership and checksum validation belong to the wallet
//! front-end; the key tree only ever needs the stretched seed.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use std::ops::Deref;
use zeroize::Zeroize;

use crate::util::ZeroingString;

/// PBKDF2 rounds fixed by BIP39
const PBKDF2_ROUNDS: u32 = 2048;

/// Length of the stretched seed
pub const SEED_SIZE: usize = 64;

/// A 64-byte master seed, zeroed on drop. Feed it to
/// `ExtendedPrivKey::new_master` and let it fall out of scope.
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
	/// View the raw seed bytes
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl Drop for Seed {
	fn drop(&mut self) {
		self.0.zeroize();
	}
}

impl Deref for Seed {
	type Target = [u8];

	fn deref(&self) -> &[u8] {
		&self.0
	}
}

impl AsRef<[u8]> for Seed {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

/// Stretch a mnemonic sentence and passphrase into a 64-byte seed:
/// PBKDF2-HMAC-SHA512 over the mnemonic with salt `"mnemonic" ‖
/// passphrase`, 2048 rounds. The passphrase may be empty; both inputs are
/// expected in NFKD form.
pub fn to_seed(mnemonic: &str, passphrase: &str) -> Seed {
	let salt = ZeroingString::from(format!("mnemonic{}", passphrase));
	let mut seed = [0u8; SEED_SIZE];
	pbkdf2_hmac::<Sha512>(
		mnemonic.as_bytes(),
		salt.as_bytes(),
		PBKDF2_ROUNDS,
		&mut seed,
	);
	Seed(seed)
}
