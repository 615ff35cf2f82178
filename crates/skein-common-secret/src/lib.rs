// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential wrapper that keeps bearer tokens out of logs.
//!
//! A [`Secret<T>`] prints as `[REDACTED]` through `Debug`, `Display` and
//! `Serialize`, is zeroized on drop, and only hands out its value through an
//! explicit [`Secret::expose`] call. Service-account tokens are carried as
//! [`SecretString`] from the moment they are read off disk until they are
//! written into an `Authorization` header.
//!
//! ```
//! use skein_common_secret::SecretString;
//!
//! let token = SecretString::new("eyJhbGciOiJSUzI1NiJ9.payload".to_string());
//!
//! assert_eq!(format!("{token}"), "[REDACTED]");
//! assert_eq!(format!("{token:?}"), "Secret(\"[REDACTED]\")");
//! assert_eq!(token.expose(), "eyJhbGciOiJSUzI1NiJ9.payload");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder printed in place of a secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed, logged or serialized in clear text.
///
/// There is no `Deref` impl; callers go through [`Secret::expose`] so every
/// use of the raw value is visible at the call site.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// Bearer tokens and other string credentials.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the wrapped value.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T: Zeroize + Eq> Eq for Secret<T> {}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

// `tracing::Value` is sealed, so structured fields rely on the redacted
// Display (`%token`) and Debug (`?token`) impls above.

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T: Serialize + Zeroize> Serialize for Secret<T> {
		fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T: Deserialize<'de> + Zeroize> Deserialize<'de> for Secret<T> {
		fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const TOKEN: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6InNrZWluIn0.sa-token";

	#[test]
	fn debug_hides_token() {
		let token = SecretString::new(TOKEN.to_string());
		let output = format!("{token:?}");

		assert!(!output.contains(TOKEN));
		assert!(output.contains(REDACTED));
	}

	#[test]
	fn display_hides_token() {
		let token = SecretString::new(TOKEN.to_string());
		assert_eq!(format!("{token}"), REDACTED);
	}

	#[test]
	fn expose_returns_token() {
		let token = SecretString::from(TOKEN.to_string());
		assert_eq!(token.expose(), TOKEN);
	}

	#[test]
	fn clones_compare_equal() {
		let token = SecretString::new(TOKEN.to_string());
		let cloned = token.clone();

		assert_eq!(token, cloned);
		assert_ne!(token, SecretString::new("other".to_string()));
	}

	/// Config structs hold `Option<SecretString>`; the derived Debug of the
	/// option must still go through the redacted impl.
	#[test]
	fn optional_token_debug_is_redacted() {
		let token: Option<SecretString> = Some(SecretString::new(TOKEN.to_string()));
		let output = format!("{token:?}");

		assert!(!output.contains(TOKEN));
		assert_eq!(format!("{:?}", None::<SecretString>), "None");
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serialize_hides_token_and_deserialize_reads_it() {
		let token = SecretString::new(TOKEN.to_string());
		let json = serde_json::to_string(&token).unwrap();
		assert_eq!(json, format!("\"{REDACTED}\""));

		let parsed: SecretString = serde_json::from_str(&format!("\"{TOKEN}\"")).unwrap();
		assert_eq!(parsed.expose(), TOKEN);
	}

	proptest! {
		#[test]
		fn formatting_never_leaks(inner in "[a-zA-Z0-9._-]{8,64}") {
			prop_assume!(!inner.contains("REDACTED"));
			prop_assume!(!inner.contains("Secret"));

			let token = SecretString::new(inner.clone());
			let debug = format!("{:?}", token);
			let display = format!("{}", token);
			prop_assert!(!debug.contains(&inner), "debug output leaked: {}", debug);
			prop_assert!(!display.contains(&inner), "display output leaked: {}", display);
		}
	}
}
