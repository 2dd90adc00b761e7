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

//! Trust anchor seeding and certificate chain validation.

use openssl::{
    error::ErrorStack,
    stack::StackRef,
    x509::{
        store::{X509Store, X509StoreBuilder, X509StoreRef},
        verify::{X509VerifyFlags, X509VerifyParam},
        X509PurposeId, X509Ref, X509StoreContext, X509,
    },
};
use openssl_sys as ffi;

use crate::{
    certificate::info::CertificateInfo,
    verify::{result::VerificationResult, VerificationParameters},
};

/// Build the X.509 store seeded from the caller's trust store and, on
/// request, the system root store.
///
/// IMPORTANT: `CryptoLock::acquire()` must have been called by the calling
/// function.
///
/// Unparsable store entries are skipped. The chain is validated for the
/// S/MIME signing purpose, preferring trusted certificates, and with time
/// checks disabled when the caller ignores expiration dates.
pub(super) fn build_trusted_store(
    parameters: &VerificationParameters<'_>,
) -> Result<X509Store, ErrorStack> {
    let mut builder = X509StoreBuilder::new()?;

    let mut verify_param = X509VerifyParam::new()?;
    verify_param.set_purpose(X509PurposeId::SMIME_SIGN)?;
    let mut flags = X509VerifyFlags::TRUSTED_FIRST;
    if parameters.ignore_expiration_date {
        flags |= X509VerifyFlags::NO_CHECK_TIME;
    }
    verify_param.set_flags(flags)?;
    builder.set_param(&verify_param)?;

    if let Some(store) = parameters.store {
        for entry in store.entries() {
            if let Ok(certificate) = X509::from_der(entry.info().certificate_data()) {
                let _ = builder.add_cert(certificate);
            }
        }
    }

    if parameters.use_system_certificate_store {
        builder.set_default_paths()?;
    }

    Ok(builder.build())
}

/// Validate the chain of `signer` against `store`, mapping the outcome onto
/// `result`.
///
/// IMPORTANT: `CryptoLock::acquire()` must have been called by the calling
/// function.
///
/// On success the certificate infos of the shortest valid chain are
/// recorded, leaf first. On failure the most specific verification code is
/// translated and the infos of all `presented` certificates are recorded
/// instead.
pub(super) fn validate_chain(
    store: &X509StoreRef,
    signer: &X509Ref,
    untrusted: &StackRef<X509>,
    presented: &[X509],
    result: &mut VerificationResult,
) {
    let mut context = match X509StoreContext::new() {
        Ok(context) => context,
        Err(_) => {
            result.add_certificate_generic_error();
            return;
        }
    };

    let outcome = context.init(store, signer, untrusted, |context| {
        let verified = context.verify_cert()?;
        let code = context.error().as_raw();

        let mut chain_der = Vec::new();
        if verified {
            if let Some(chain) = context.chain() {
                for certificate in chain {
                    chain_der.push(certificate.to_der()?);
                }
            }
        }

        Ok((verified, code, chain_der))
    });

    match outcome {
        Err(_) => result.add_certificate_generic_error(),
        Ok((true, _, chain_der)) => {
            for der in &chain_der {
                if let Some(info) = CertificateInfo::from_der(der) {
                    result.add_certificate_info(info);
                }
            }
        }
        Ok((false, code, _)) => {
            match code {
                ffi::X509_V_OK => {
                    // Strange, this should not occur when verify_cert fails.
                }
                ffi::X509_V_ERR_CERT_HAS_EXPIRED => result.add_certificate_expired_error(),
                ffi::X509_V_ERR_DEPTH_ZERO_SELF_SIGNED_CERT => {
                    result.add_certificate_self_signed_error()
                }
                ffi::X509_V_ERR_SELF_SIGNED_CERT_IN_CHAIN => {
                    result.add_certificate_self_signed_in_chain_error()
                }
                ffi::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT
                | ffi::X509_V_ERR_UNABLE_TO_GET_ISSUER_CERT_LOCALLY => {
                    result.add_certificate_trusted_not_found_error()
                }
                ffi::X509_V_ERR_CERT_REVOKED => result.add_certificate_revoked_error(),
                other => result.add_certificate_other_error(other),
            }

            for certificate in presented {
                if let Ok(der) = certificate.to_der() {
                    if let Some(info) = CertificateInfo::from_der(&der) {
                        result.add_certificate_info(info);
                    }
                }
            }
        }
    }
}
