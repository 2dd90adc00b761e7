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

//! Serialization of all calls into the native crypto library.
//!
//! The verification engines reach into OpenSSL in three places: PKCS#7
//! signature checking, X.509 store/context chain building, and the raw RSA
//! operations of the legacy engine. libcrypto keeps library-global state
//! (error queues, lookup tables) that is not safe to touch from two threads
//! at once, so the whole crate funnels those sections through one
//! process-wide mutex. Pure-Rust parsing does not take the lock.

use std::{
    error::Error,
    fmt,
    sync::{Mutex, MutexGuard},
};

static CRYPTO_MUTEX: Mutex<()> = Mutex::new(());

/// Scoped claim on the native crypto library.
///
/// An engine acquires the lock before its first OpenSSL call and keeps the
/// guard alive until the last wrapper object of that section has been
/// dropped; concurrent verifications on other threads block in the
/// meantime. Nothing may panic while the guard is held, in test code
/// included, or the mutex stays poisoned for the rest of the process.
pub struct CryptoLock<'a> {
    _guard: MutexGuard<'a, ()>, // held purely for its Drop
}

impl CryptoLock<'_> {
    /// Wait for the crypto library to become free and claim it.
    ///
    /// The only failure mode is a poisoned mutex, reported as
    /// [`CryptoLockUnavailable`] so callers can record a verification
    /// failure instead of propagating a panic.
    pub fn acquire() -> Result<Self, CryptoLockUnavailable> {
        CRYPTO_MUTEX
            .lock()
            .map(|guard| Self { _guard: guard })
            .map_err(|_| CryptoLockUnavailable)
    }
}

/// The crypto library mutex is poisoned and can no longer be taken.
///
/// Some earlier caller panicked inside a locked section. From that point on
/// every crypto-backed operation in this process fails with this error;
/// there is no recovery short of restarting.
#[derive(Debug, Eq, PartialEq)]
pub struct CryptoLockUnavailable;

impl fmt::Display for CryptoLockUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("crypto library mutex is poisoned")
    }
}

impl Error for CryptoLockUnavailable {}
