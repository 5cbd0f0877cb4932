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

//! The few fixed hash constructions everything else is built from:
//! SHA256, double-SHA256 and HASH160 (RIPEMD160 over SHA256).

use digest::Digest;
use ripemd::Ripemd160;
use sha2::Sha256;

/// SHA256
pub fn sha256(data: &[u8]) -> [u8; 32] {
	let mut ret = [0u8; 32];
	ret.copy_from_slice(Sha256::digest(data).as_slice());
	ret
}

/// SHA256(SHA256(data))
pub fn sha256d(data: &[u8]) -> [u8; 32] {
	sha256(&sha256(data))
}

/// RIPEMD160(SHA256(data)), the address digest
pub fn hash160(data: &[u8]) -> [u8; 20] {
	let mut ret = [0u8; 20];
	let sha = Sha256::digest(data);
	ret.copy_from_slice(Ripemd160::digest(&sha).as_slice());
	ret
}
