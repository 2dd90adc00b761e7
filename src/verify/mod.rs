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

//! Signature verification engines and their entry point.

pub(crate) mod byte_range;
mod pkcs7;
mod result;
mod rsa_legacy;
mod trust;

use log::debug;

pub use result::{SignatureVerificationFlags, VerificationResult};

use crate::{
    certificate::store::CertificateStore,
    form::{FieldType, Form},
    signature::Signature,
};

/// Verification configuration.
#[derive(Debug, Clone, Copy)]
pub struct VerificationParameters<'a> {
    /// Master switch; when false no verification runs at all.
    pub enable_verification: bool,
    /// Disable certificate time checks during chain validation.
    pub ignore_expiration_date: bool,
    /// Also seed the trust set from the operating system's root store.
    pub use_system_certificate_store: bool,
    /// Trusted certificates of the caller, borrowed for the duration of the
    /// verification.
    pub store: Option<&'a CertificateStore>,
}

impl Default for VerificationParameters<'_> {
    fn default() -> Self {
        VerificationParameters {
            enable_verification: true,
            ignore_expiration_date: false,
            use_system_certificate_store: false,
            store: None,
        }
    }
}

/// Everything one engine invocation works on.
pub(crate) struct HandlerContext<'a> {
    pub(crate) signature: Signature,
    pub(crate) source_data: &'a [u8],
    pub(crate) parameters: &'a VerificationParameters<'a>,
}

/// Verify every signature field of `form` against the raw file bytes.
///
/// Returns one [`VerificationResult`] per signature field, in the order the
/// form enumerates them. An empty list is returned when verification is
/// disabled or the document has neither an AcroForm nor an XFA form.
pub fn verify_signatures(
    form: &Form,
    source_data: &[u8],
    parameters: &VerificationParameters<'_>,
) -> Vec<VerificationResult> {
    let mut results = Vec::new();

    if parameters.enable_verification && (form.is_acro_form() || form.is_xfa_form()) {
        let mut signature_fields = Vec::new();
        form.apply(&mut |field| {
            if field.field_type() == FieldType::Signature {
                signature_fields.push((
                    field.self_reference(),
                    field.qualified_name().to_owned(),
                    field.signature(),
                ));
            }
        });

        results.reserve(signature_fields.len());
        for (reference, qualified_name, signature) in signature_fields {
            let subfilter = signature.subfilter().to_vec();
            debug!(
                "verifying signature field '{}' with subfilter '{}'",
                qualified_name,
                String::from_utf8_lossy(&subfilter)
            );

            let mut result = VerificationResult::new(reference, qualified_name);
            let context = HandlerContext {
                signature,
                source_data,
                parameters,
            };

            match subfilter.as_slice() {
                b"adbe.pkcs7.detached" => pkcs7::verify(&context, false, &mut result),
                b"adbe.pkcs7.sha1" => pkcs7::verify(&context, true, &mut result),
                b"adbe.x509.rsa_sha1" => rsa_legacy::verify(&context, &mut result),
                _ => result.add_no_handler_error(&subfilter),
            }

            results.push(result);
        }
    }

    results
}
