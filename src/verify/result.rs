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

//! Outcome of verifying one signature field.

use bitflags::bitflags;

use crate::{certificate::info::CertificateInfo, object_model::ObjectRef};

bitflags! {
    /// Flags describing the verification outcome.
    ///
    /// Three orthogonal groups: the certificate group, the signature group
    /// and warnings. [`OK`](Self::OK) is set by
    /// [`VerificationResult::validate`] if and only if both group OK bits are
    /// set; warnings never prevent it.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SignatureVerificationFlags: u32 {
        /// Both the certificate chain and the signature verified.
        const OK = 1 << 0;
        /// No error in the certificate group.
        const CERTIFICATE_OK = 1 << 1;
        /// No error in the signature group.
        const SIGNATURE_OK = 1 << 2;

        /// No verification engine exists for the signature's subfilter.
        const ERROR_NO_HANDLER = 1 << 3;

        /// Certificate container could not be parsed.
        const ERROR_CERTIFICATE_INVALID = 1 << 4;
        /// Container parsed but contained no signer info.
        const ERROR_CERTIFICATE_NO_SIGNATURES = 1 << 5;
        /// Signer certificate not found in the embedded bag.
        const ERROR_CERTIFICATE_MISSING = 1 << 6;
        /// Validation context initialization or purpose set failed.
        const ERROR_CERTIFICATE_GENERIC = 1 << 7;
        /// Certificate has expired.
        const ERROR_CERTIFICATE_EXPIRED = 1 << 8;
        /// Leaf certificate is self-signed.
        const ERROR_CERTIFICATE_SELF_SIGNED = 1 << 9;
        /// Self-signed certificate inside the chain.
        const ERROR_CERTIFICATE_SELF_SIGNED_CHAIN = 1 << 10;
        /// No trusted issuer certificate found.
        const ERROR_CERTIFICATE_TRUSTED_NOT_FOUND = 1 << 11;
        /// Certificate has been revoked.
        const ERROR_CERTIFICATE_REVOKED = 1 << 12;
        /// Any other chain validation failure; the numeric code is preserved
        /// in the message.
        const ERROR_CERTIFICATE_OTHER = 1 << 13;

        /// Signature container parse or data initialization failed.
        const ERROR_SIGNATURE_INVALID = 1 << 14;
        /// No signer info in the signature.
        const ERROR_SIGNATURE_NO_SIGNATURES_FOUND = 1 << 15;
        /// Signer certificate or its public key could not be recovered.
        const ERROR_SIGNATURE_SOURCE_CERTIFICATE_MISSING = 1 << 16;
        /// Content hash mismatch.
        const ERROR_SIGNATURE_DIGEST_FAILURE = 1 << 17;
        /// Any other signature verification failure.
        const ERROR_SIGNATURE_DATA_OTHER = 1 << 18;
        /// Byte ranges invalid or exceeding the file size.
        const ERROR_SIGNATURE_DATA_COVERED_BY_SIGNATURE_MISSING = 1 << 19;

        /// Part of the file lies outside the signed ranges.
        const WARNING_SIGNATURE_NOT_COVERED_BYTES = 1 << 20;

        /// All certificate group errors.
        const ERROR_CERTIFICATES_MASK = Self::ERROR_CERTIFICATE_INVALID.bits()
            | Self::ERROR_CERTIFICATE_NO_SIGNATURES.bits()
            | Self::ERROR_CERTIFICATE_MISSING.bits()
            | Self::ERROR_CERTIFICATE_GENERIC.bits()
            | Self::ERROR_CERTIFICATE_EXPIRED.bits()
            | Self::ERROR_CERTIFICATE_SELF_SIGNED.bits()
            | Self::ERROR_CERTIFICATE_SELF_SIGNED_CHAIN.bits()
            | Self::ERROR_CERTIFICATE_TRUSTED_NOT_FOUND.bits()
            | Self::ERROR_CERTIFICATE_REVOKED.bits()
            | Self::ERROR_CERTIFICATE_OTHER.bits();

        /// All signature group errors.
        const ERROR_SIGNATURES_MASK = Self::ERROR_SIGNATURE_INVALID.bits()
            | Self::ERROR_SIGNATURE_NO_SIGNATURES_FOUND.bits()
            | Self::ERROR_SIGNATURE_SOURCE_CERTIFICATE_MISSING.bits()
            | Self::ERROR_SIGNATURE_DIGEST_FAILURE.bits()
            | Self::ERROR_SIGNATURE_DATA_OTHER.bits()
            | Self::ERROR_SIGNATURE_DATA_COVERED_BY_SIGNATURE_MISSING.bits();
    }
}

/// Result of verifying a single signature field.
///
/// Engines never unwind on cryptographic failure; every sub-step records a
/// flag plus a human-readable message and the engine carries on where it can.
#[derive(Debug, Clone, Default)]
pub struct VerificationResult {
    signature_field_reference: ObjectRef,
    signature_field_qualified_name: String,
    flags: SignatureVerificationFlags,
    errors: Vec<String>,
    warnings: Vec<String>,
    certificate_infos: Vec<CertificateInfo>,
}

impl VerificationResult {
    /// Create a result bound to a signature field.
    pub fn new(reference: ObjectRef, qualified_name: String) -> Self {
        VerificationResult {
            signature_field_reference: reference,
            signature_field_qualified_name: qualified_name,
            ..VerificationResult::default()
        }
    }

    /// Reference of the verified signature field.
    pub fn signature_field_reference(&self) -> ObjectRef {
        self.signature_field_reference
    }

    /// Fully qualified name of the verified signature field.
    pub fn signature_field_qualified_name(&self) -> &str {
        &self.signature_field_qualified_name
    }

    /// Outcome flags.
    pub fn flags(&self) -> SignatureVerificationFlags {
        self.flags
    }

    /// Collected error messages, in the order the errors occurred.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Collected warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Certificates seen during verification, leaf first when possible.
    pub fn certificate_infos(&self) -> &[CertificateInfo] {
        &self.certificate_infos
    }

    /// Returns true when the signature verified completely.
    pub fn is_valid(&self) -> bool {
        self.flags.contains(SignatureVerificationFlags::OK)
    }

    /// Returns true when no certificate group error was recorded.
    pub fn is_certificate_valid(&self) -> bool {
        !self.has_certificate_error()
    }

    /// Returns true when no signature group error was recorded.
    pub fn is_signature_valid(&self) -> bool {
        !self.has_signature_error()
    }

    /// Returns true when a certificate group error was recorded.
    pub fn has_certificate_error(&self) -> bool {
        self.flags
            .intersects(SignatureVerificationFlags::ERROR_CERTIFICATES_MASK)
    }

    /// Returns true when a signature group error was recorded.
    pub fn has_signature_error(&self) -> bool {
        self.flags
            .intersects(SignatureVerificationFlags::ERROR_SIGNATURES_MASK)
    }

    /// Set the group OK flags from the recorded errors; sets
    /// [`OK`](SignatureVerificationFlags::OK) when both groups are clean.
    ///
    /// `OK` is monotonic: it is only ever set here and never cleared, so
    /// warnings appended later do not revoke it.
    pub fn validate(&mut self) {
        if self.is_certificate_valid() && self.is_signature_valid() {
            self.flags.insert(SignatureVerificationFlags::OK);
        }
    }

    pub(crate) fn set_flag(&mut self, flag: SignatureVerificationFlags) {
        self.flags.insert(flag);
    }

    pub(crate) fn add_certificate_info(&mut self, info: CertificateInfo) {
        self.certificate_infos.push(info);
    }

    pub(crate) fn add_no_handler_error(&mut self, format: &[u8]) {
        self.flags.insert(SignatureVerificationFlags::ERROR_NO_HANDLER);
        self.errors.push(format!(
            "No signature handler for signature format '{}'.",
            String::from_utf8_lossy(format)
        ));
    }

    pub(crate) fn add_invalid_certificate_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_INVALID);
        self.errors.push("Certificate format is invalid.".into());
    }

    pub(crate) fn add_no_signatures_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_NO_SIGNATURES);
        self.errors.push("No signatures in certificate data.".into());
    }

    pub(crate) fn add_certificate_missing_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_MISSING);
        self.errors.push("Certificate is missing.".into());
    }

    pub(crate) fn add_certificate_generic_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_GENERIC);
        self.errors
            .push("Generic error occured during certificate validation.".into());
    }

    pub(crate) fn add_certificate_expired_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_EXPIRED);
        self.errors.push("Certificate has expired.".into());
    }

    pub(crate) fn add_certificate_self_signed_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_SELF_SIGNED);
        self.errors.push("Certificate is self-signed.".into());
    }

    pub(crate) fn add_certificate_self_signed_in_chain_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_SELF_SIGNED_CHAIN);
        self.errors.push("Self-signed certificate in chain.".into());
    }

    pub(crate) fn add_certificate_trusted_not_found_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_TRUSTED_NOT_FOUND);
        self.errors.push("Trusted certificate not found.".into());
    }

    pub(crate) fn add_certificate_revoked_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_REVOKED);
        self.errors.push("Certificate has been revoked.".into());
    }

    pub(crate) fn add_certificate_other_error(&mut self, code: i32) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_CERTIFICATE_OTHER);
        self.errors
            .push(format!("Certificate validation failed with code {code}."));
    }

    pub(crate) fn add_invalid_signature_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_INVALID);
        self.errors.push("Signature is invalid.".into());
    }

    pub(crate) fn add_signature_no_signatures_found_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_NO_SIGNATURES_FOUND);
        self.errors.push("No signatures found in certificate.".into());
    }

    pub(crate) fn add_signature_certificate_missing_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_SOURCE_CERTIFICATE_MISSING);
        self.errors.push("Signature certificate is missing.".into());
    }

    pub(crate) fn add_signature_digest_failure_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_DIGEST_FAILURE);
        self.errors
            .push("Signed data has different hash function digest.".into());
    }

    pub(crate) fn add_signature_data_other_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_DATA_OTHER);
        self.errors.push("Signed data are invalid.".into());
    }

    pub(crate) fn add_signature_data_covered_by_signature_missing_error(&mut self) {
        self.flags
            .insert(SignatureVerificationFlags::ERROR_SIGNATURE_DATA_COVERED_BY_SIGNATURE_MISSING);
        self.errors
            .push("Data covered by signature are not present.".into());
    }

    pub(crate) fn add_signature_not_covered_bytes_warning(&mut self, count: i64) {
        self.flags
            .insert(SignatureVerificationFlags::WARNING_SIGNATURE_NOT_COVERED_BYTES);
        self.warnings
            .push(format!("{count} bytes are not covered by signature."));
    }
}
