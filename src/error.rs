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

#![deny(missing_docs)]

use thiserror::Error;

/// `Error` enumerates errors returned by most pdfsig operations.
///
/// Verification *outcomes* (bad signature, untrusted chain, …) are not
/// errors; they are reported through
/// [`VerificationResult`](crate::VerificationResult) flags. This type covers
/// programmer-facing failures only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An invalid parameter was provided.
    #[error("bad parameter: {0}")]
    BadParam(String),

    /// A certificate could not be parsed from DER data.
    #[error("certificate could not be parsed")]
    InvalidCertificate,

    /// A persisted stream ended prematurely or contained malformed data.
    #[error("persisted stream is malformed: {0}")]
    PersistMalformed(String),

    /// Could not acquire the native crypto library mutex.
    #[error("could not acquire crypto library mutex")]
    CryptoLockUnavailable,

    // --- third-party errors ---
    /// An I/O error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// An error occurred in OpenSSL.
    #[error(transparent)]
    OpenSslError(#[from] openssl::error::ErrorStack),
}

impl From<crate::ffi_mutex::CryptoLockUnavailable> for Error {
    fn from(_err: crate::ffi_mutex::CryptoLockUnavailable) -> Self {
        Self::CryptoLockUnavailable
    }
}

/// A specialized `Result` type for pdfsig operations.
pub type Result<T> = std::result::Result<T, Error>;
