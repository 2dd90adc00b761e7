// Copyright 2025 the pdfsig authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod certificate;
pub(crate) mod error;
pub mod ffi_mutex;
pub mod form;
pub mod object_model;
pub(crate) mod oids;
pub mod signature;
pub mod verify;

#[cfg(test)]
pub(crate) mod tests;

pub use certificate::{
    info::{CertificateInfo, KeyUsageFlags, NameEntry, PublicKey},
    store::{CertificateEntry, CertificateStore, EntryType},
};
pub use error::{Error, Result};
pub use ffi_mutex::{CryptoLock, CryptoLockUnavailable};
pub use signature::{Signature, SignatureReference, SignatureType};
pub use verify::{
    verify_signatures, SignatureVerificationFlags, VerificationParameters, VerificationResult,
};
