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

//! Derivation path syntax: `m/44'/3'/0'/0/5`, with `'` or `h` marking a
//! hardened step and a capital `M` declaring public-derivation intent.

use std::fmt;
use std::str::FromStr;
use std::{error, slice};

use crate::extkey_bip32::ChildNumber;

/// A path parse error
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
	/// Nothing to parse
	EmptyPath,
	/// A token that is not `m`, `M` or an index
	BadToken(String),
	/// Index at or above 2^31
	IndexOverflow(u32),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Error::EmptyPath => f.write_str("empty derivation path"),
			Error::BadToken(ref t) => write!(f, "unparseable path token {:?}", t),
			Error::IndexOverflow(i) => write!(f, "child index {} out of range", i),
		}
	}
}

impl error::Error for Error {}

/// A parsed derivation path: the steps to walk plus whether the caller
/// asked for the public-derivation form (`M` prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
	public_intent: bool,
	path: Vec<ChildNumber>,
}

impl DerivationPath {
	/// Whether the path was spelled with a capital `M`
	pub fn is_public(&self) -> bool {
		self.public_intent
	}

	/// The steps of the walk, root first
	pub fn children(&self) -> &[ChildNumber] {
		&self.path
	}

	/// Whether any step requires private material to derive
	pub fn has_hardened_step(&self) -> bool {
		self.path.iter().any(|c| c.is_hardened())
	}

	/// Iterate the steps
	pub fn iter(&self) -> slice::Iter<'_, ChildNumber> {
		self.path.iter()
	}
}

impl FromStr for DerivationPath {
	type Err = Error;

	fn from_str(path: &str) -> Result<DerivationPath, Error> {
		if path.is_empty() {
			return Err(Error::EmptyPath);
		}
		let mut parts = path.split('/');
		let public_intent = match parts.next() {
			Some("m") => false,
			Some("M") => true,
			Some(other) => return Err(Error::BadToken(other.to_string())),
			None => return Err(Error::EmptyPath),
		};
		let path = parts.map(parse_token).collect::<Result<Vec<_>, _>>()?;
		Ok(DerivationPath {
			public_intent,
			path,
		})
	}
}

impl fmt::Display for DerivationPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(if self.public_intent { "M" } else { "m" })?;
		for child in &self.path {
			write!(f, "/{}", child)?;
		}
		Ok(())
	}
}

fn parse_token(token: &str) -> Result<ChildNumber, Error> {
	if token.is_empty() {
		return Err(Error::BadToken(token.to_string()));
	}
	let (digits, hardened) = match token.strip_suffix(|c| c == '\'' || c == 'h') {
		Some(digits) => (digits, true),
		None => (token, false),
	};
	// only plain decimal digits: no signs, whitespace or a second marker
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return Err(Error::BadToken(token.to_string()));
	}
	let index: u32 = digits
		.parse()
		.map_err(|_| Error::BadToken(token.to_string()))?;
	let ctor = if hardened {
		ChildNumber::from_hardened_idx
	} else {
		ChildNumber::from_normal_idx
	};
	ctor(index).map_err(|_| Error::IndexOverflow(index))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> Result<DerivationPath, Error> {
		DerivationPath::from_str(s)
	}

	#[test]
	fn parses_private_and_public_prefixes() {
		let p = parse("m/44'/3'/0'/0/5").unwrap();
		assert!(!p.is_public());
		assert!(p.has_hardened_step());
		assert_eq!(
			p.children(),
			&[
				ChildNumber::Hardened { index: 44 },
				ChildNumber::Hardened { index: 3 },
				ChildNumber::Hardened { index: 0 },
				ChildNumber::Normal { index: 0 },
				ChildNumber::Normal { index: 5 },
			]
		);

		let p = parse("M/0/1").unwrap();
		assert!(p.is_public());
		assert!(!p.has_hardened_step());
		assert_eq!(p.to_string(), "M/0/1");
	}

	#[test]
	fn root_only_paths() {
		assert_eq!(parse("m").unwrap().children(), &[]);
		assert_eq!(parse("M").unwrap().children(), &[]);
	}

	#[test]
	fn hardened_marker_variants() {
		assert_eq!(parse("m/0h"), parse("m/0'"));
		assert_eq!(
			parse("m/2147483647'").unwrap().children(),
			&[ChildNumber::Hardened { index: 2147483647 }]
		);
	}

	#[test]
	fn rejections() {
		assert_eq!(parse(""), Err(Error::EmptyPath));
		assert_eq!(parse("n/0"), Err(Error::BadToken("n".to_string())));
		assert_eq!(parse("m/"), Err(Error::BadToken("".to_string())));
		assert_eq!(parse("m/x"), Err(Error::BadToken("x".to_string())));
		assert_eq!(parse("m/0''"), Err(Error::BadToken("0''".to_string())));
		assert_eq!(parse("m/-1"), Err(Error::BadToken("-1".to_string())));
		assert_eq!(parse("m/ 1"), Err(Error::BadToken(" 1".to_string())));
		assert_eq!(parse("m/2147483648"), Err(Error::IndexOverflow(2147483648)));
		assert_eq!(parse("m/2147483648'"), Err(Error::IndexOverflow(2147483648)));
		// 2^32 and above do not even parse as u32
		assert_eq!(
			parse("m/4294967296"),
			Err(Error::BadToken("4294967296".to_string()))
		);
	}
}
