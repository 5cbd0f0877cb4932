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

//! Library module for Dogecoin key handling: keys and their WIF form,
//! the three address families, BIP32 hierarchical deterministic trees,
//! BIP39 seeding, BIP44 account layout and message signing.

#[macro_use]
extern crate serde_derive;

pub use doge_util as util;

pub mod base58;
pub mod segwit;

pub mod address;
pub mod bip44;
pub mod chain;
pub mod extkey_bip32;
mod hash;
pub mod key;
pub mod message;
pub mod mnemonic;
pub mod path;
pub mod tools;
mod types;

pub use crate::chain::{chain_from_b58_prefix, chain_from_bip32_magic, ChainParams, ChainTag};
pub use crate::chain::{MAINNET, REGTEST, SIGNET, TESTNET};
pub use crate::extkey_bip32::{ChildNumber, ExtKey, ExtendedPrivKey, ExtendedPubKey};
pub use crate::key::{PrivKey, PubKey};
pub use crate::mnemonic::Seed;
pub use crate::path::DerivationPath;
pub use crate::types::Error;
