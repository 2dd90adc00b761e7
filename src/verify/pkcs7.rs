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

//! Engines for the `adbe.pkcs7.detached` and `adbe.pkcs7.sha1` subfilters.
//!
//! The container structure (signer infos, certificate bag) is read with a
//! pure-Rust CMS parser; chain validation and the actual signature check go
//! through the native crypto library under [`CryptoLock`].

use cms::{
    cert::CertificateChoices,
    content_info::ContentInfo,
    signed_data::{SignedData, SignerIdentifier},
};
use der::{asn1::ObjectIdentifier, Decode, Encode};
use log::debug;
use openssl::{
    hash::{hash, MessageDigest},
    pkcs7::{Pkcs7, Pkcs7Flags},
    stack::Stack,
    x509::{store::X509StoreBuilder, X509},
};

use crate::{
    ffi_mutex::CryptoLock,
    verify::{
        byte_range, result::SignatureVerificationFlags, result::VerificationResult, trust,
        HandlerContext,
    },
};

const ID_SIGNED_DATA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.2");
const ID_SIGNED_AND_ENVELOPED_DATA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.7.4");

/// Verify a PKCS#7 signature field.
///
/// With `digest_content` set (the `adbe.pkcs7.sha1` variant) the verification
/// pipeline is fed the SHA-1 of the assembled signed bytes instead of the raw
/// bytes.
pub(super) fn verify(
    context: &HandlerContext<'_>,
    digest_content: bool,
    result: &mut VerificationResult,
) {
    verify_certificate(context, result);
    verify_signature(context, digest_content, result);
    result.validate();
}

fn verify_certificate(context: &HandlerContext<'_>, result: &mut VerificationResult) {
    match parse_signed_container(context.signature.contents()) {
        None => result.add_invalid_certificate_error(),
        Some(container) => {
            if container.signers.is_empty() || container.certificates.is_empty() {
                result.add_no_signatures_error();
            } else {
                validate_signer_chains(context, &container, result);
            }
        }
    }

    if !result.has_certificate_error() {
        result.set_flag(SignatureVerificationFlags::CERTIFICATE_OK);
    }
}

fn validate_signer_chains(
    context: &HandlerContext<'_>,
    container: &ParsedContainer,
    result: &mut VerificationResult,
) {
    let Ok(_lock) = CryptoLock::acquire() else {
        result.add_certificate_generic_error();
        return;
    };

    let store = match trust::build_trusted_store(context.parameters) {
        Ok(store) => store,
        Err(_) => {
            result.add_certificate_generic_error();
            return;
        }
    };

    // The full certificate bag acts as the untrusted chain candidates.
    let mut bag = Vec::with_capacity(container.certificates.len());
    for certificate in &container.certificates {
        match X509::from_der(&certificate.der) {
            Ok(x509) => bag.push(x509),
            Err(_) => {
                result.add_invalid_certificate_error();
                return;
            }
        }
    }

    let mut untrusted = match Stack::new() {
        Ok(stack) => stack,
        Err(_) => {
            result.add_certificate_generic_error();
            return;
        }
    };
    for x509 in &bag {
        if untrusted.push(x509.clone()).is_err() {
            result.add_certificate_generic_error();
            return;
        }
    }

    for signer in &container.signers {
        let Some(index) = container.find_certificate(signer) else {
            result.add_certificate_missing_error();
            break;
        };

        trust::validate_chain(&store, &bag[index], &untrusted, &bag, result);
    }
}

fn verify_signature(
    context: &HandlerContext<'_>,
    digest_content: bool,
    result: &mut VerificationResult,
) {
    let Some(signed_data) =
        byte_range::get_signed_data(context.source_data, &context.signature, result)
    else {
        // The byte range assembler has already recorded the error.
        finish_signature_phase(result);
        return;
    };

    let contents = context.signature.contents();
    let Some(container) = parse_signed_container(contents) else {
        result.add_invalid_signature_error();
        finish_signature_phase(result);
        return;
    };

    if container.signers.is_empty() || container.certificates.is_empty() {
        result.add_signature_no_signatures_found_error();
        finish_signature_phase(result);
        return;
    }

    for signer in &container.signers {
        if container.find_certificate(signer).is_none() {
            result.add_signature_certificate_missing_error();
            break;
        }
    }

    if !result.has_signature_error() {
        check_pkcs7_signature(contents, &signed_data.bytes, digest_content, result);
    }

    finish_signature_phase(result);
}

fn finish_signature_phase(result: &mut VerificationResult) {
    if !result.has_signature_error() {
        result.set_flag(SignatureVerificationFlags::SIGNATURE_OK);
    }
}

/// Run the native PKCS#7 signature verification over the assembled content.
///
/// Chain validation already happened in the certificate phase, so the call
/// skips it and checks the signer signatures only.
fn check_pkcs7_signature(
    contents: &[u8],
    assembled: &[u8],
    digest_content: bool,
    result: &mut VerificationResult,
) {
    let Ok(_lock) = CryptoLock::acquire() else {
        result.add_invalid_signature_error();
        return;
    };

    let pkcs7 = match Pkcs7::from_der(trim_der(contents)) {
        Ok(pkcs7) => pkcs7,
        Err(_) => {
            result.add_invalid_signature_error();
            return;
        }
    };

    let digest;
    let verified_content: &[u8] = if digest_content {
        digest = match hash(MessageDigest::sha1(), assembled) {
            Ok(digest) => digest,
            Err(_) => {
                result.add_signature_data_other_error();
                return;
            }
        };
        &digest
    } else {
        assembled
    };

    // The signer certificates come from the container itself; no extra
    // lookup certificates and no trust store are needed with NOVERIFY.
    let (certificates, store) = match (Stack::new(), X509StoreBuilder::new()) {
        (Ok(certificates), Ok(builder)) => (certificates, builder.build()),
        _ => {
            result.add_signature_data_other_error();
            return;
        }
    };

    match pkcs7.verify(
        &certificates,
        &store,
        Some(verified_content),
        None,
        Pkcs7Flags::NOVERIFY | Pkcs7Flags::BINARY,
    ) {
        Ok(()) => debug!("PKCS#7 signature verified"),
        Err(error_stack) => {
            let digest_failure = error_stack
                .errors()
                .iter()
                .any(|error| error.reason().is_some_and(|reason| reason.contains("digest failure")));
            if digest_failure {
                result.add_signature_digest_failure_error();
            } else {
                result.add_signature_data_other_error();
            }
        }
    }
}

/// One certificate of the container's bag, with the fields signer infos are
/// matched against.
pub(super) struct BagCertificate {
    pub(super) der: Vec<u8>,
    issuer_der: Vec<u8>,
    serial: Vec<u8>,
}

impl BagCertificate {
    fn from_der(der: &[u8]) -> Option<Self> {
        let certificate = cms::cert::x509::Certificate::from_der(der).ok()?;
        Some(BagCertificate {
            der: der.to_vec(),
            issuer_der: certificate.tbs_certificate.issuer.to_der().ok()?,
            serial: certificate.tbs_certificate.serial_number.as_bytes().to_vec(),
        })
    }
}

/// Structure of a signed PKCS#7 container: the certificate bag plus the
/// (issuer, serial) identity of every signer info. A signer whose identity
/// cannot be expressed that way is kept as `None` so it still counts.
pub(super) struct ParsedContainer {
    pub(super) certificates: Vec<BagCertificate>,
    pub(super) signers: Vec<Option<(Vec<u8>, Vec<u8>)>>,
}

impl ParsedContainer {
    pub(super) fn find_certificate(&self, signer: &Option<(Vec<u8>, Vec<u8>)>) -> Option<usize> {
        let (issuer_der, serial) = signer.as_ref()?;
        self.certificates
            .iter()
            .position(|certificate| {
                certificate.issuer_der == *issuer_der && certificate.serial == *serial
            })
    }
}

/// Parse the signature contents as a signed PKCS#7 container.
///
/// SignedData is read with the CMS parser; the legacy signed-and-enveloped
/// content type predates RFC 5652 and is recovered by a raw DER walk.
pub(super) fn parse_signed_container(contents: &[u8]) -> Option<ParsedContainer> {
    let trimmed = trim_der(contents);
    let content_info = ContentInfo::from_der(trimmed).ok()?;

    if content_info.content_type == ID_SIGNED_DATA {
        let signed_data = content_info.content.decode_as::<SignedData>().ok()?;
        Some(from_signed_data(&signed_data))
    } else if content_info.content_type == ID_SIGNED_AND_ENVELOPED_DATA {
        let raw = content_info.content.to_der().ok()?;
        parse_signed_and_enveloped(&raw)
    } else {
        None
    }
}

fn from_signed_data(signed_data: &SignedData) -> ParsedContainer {
    let mut certificates = Vec::new();
    if let Some(certificate_set) = &signed_data.certificates {
        for choice in certificate_set.0.iter() {
            if let CertificateChoices::Certificate(certificate) = choice {
                if let Ok(der) = certificate.to_der() {
                    if let Some(bag_certificate) = BagCertificate::from_der(&der) {
                        certificates.push(bag_certificate);
                    }
                }
            }
        }
    }

    let mut signers = Vec::new();
    for signer_info in signed_data.signer_infos.0.iter() {
        match &signer_info.sid {
            SignerIdentifier::IssuerAndSerialNumber(issuer_and_serial) => {
                let identity = issuer_and_serial.issuer.to_der().ok().map(|issuer_der| {
                    (
                        issuer_der,
                        issuer_and_serial.serial_number.as_bytes().to_vec(),
                    )
                });
                signers.push(identity);
            }
            _ => signers.push(None),
        }
    }

    ParsedContainer {
        certificates,
        signers,
    }
}

// DER universal tags used by the raw walk.
const TAG_SET: u32 = 0x11;

/// Minimal DER TLV element.
struct Tlv<'a> {
    class: u8,
    tag: u32,
    content: &'a [u8],
}

/// Read one DER element, returning it plus the remainder of the input.
/// Indefinite lengths are rejected.
fn read_tlv(data: &[u8]) -> Option<(Tlv<'_>, &'_ [u8])> {
    let first = *data.first()?;
    let class = first >> 6;
    let mut tag = u32::from(first & 0x1f);
    let mut index = 1;

    if tag == 0x1f {
        tag = 0;
        loop {
            let byte = *data.get(index)?;
            index += 1;
            tag = (tag << 7) | u32::from(byte & 0x7f);
            if byte & 0x80 == 0 {
                break;
            }
        }
    }

    let length_byte = *data.get(index)?;
    index += 1;
    let length = if length_byte & 0x80 == 0 {
        usize::from(length_byte)
    } else {
        let count = usize::from(length_byte & 0x7f);
        if count == 0 || count > 4 {
            return None;
        }
        let mut length = 0usize;
        for _ in 0..count {
            length = (length << 8) | usize::from(*data.get(index)?);
            index += 1;
        }
        length
    };

    let end = index.checked_add(length)?;
    if end > data.len() {
        return None;
    }

    Some((
        Tlv {
            class,
            tag,
            content: &data[index..end],
        },
        &data[end..],
    ))
}

/// Cut a buffer down to its first DER element, dropping the zero padding
/// PDF writers leave after the hex-encoded contents.
fn trim_der(data: &[u8]) -> &[u8] {
    match read_tlv(data) {
        Some((_, rest)) => &data[..data.len() - rest.len()],
        None => data,
    }
}

/// Walk a PKCS#7 SignedAndEnvelopedData structure:
/// `SEQUENCE { version, recipientInfos, digestAlgorithms,
/// encryptedContentInfo, certificates [0] IMPLICIT OPTIONAL,
/// crls [1] IMPLICIT OPTIONAL, signerInfos SET }`.
fn parse_signed_and_enveloped(raw: &[u8]) -> Option<ParsedContainer> {
    let (outer, _) = read_tlv(raw)?;
    let mut cursor = outer.content;

    // version, recipientInfos, digestAlgorithms, encryptedContentInfo
    for _ in 0..4 {
        let (_, rest) = read_tlv(cursor)?;
        cursor = rest;
    }

    let mut certificates = Vec::new();
    let mut signers = Vec::new();

    while !cursor.is_empty() {
        let (element, rest) = read_tlv(cursor)?;

        if element.class == 2 && element.tag == 0 {
            // certificates [0] IMPLICIT: a run of Certificate elements.
            let mut certificate_data = element.content;
            while !certificate_data.is_empty() {
                let (_, certificate_rest) = read_tlv(certificate_data)?;
                let der = &certificate_data[..certificate_data.len() - certificate_rest.len()];
                if let Some(bag_certificate) = BagCertificate::from_der(der) {
                    certificates.push(bag_certificate);
                }
                certificate_data = certificate_rest;
            }
        } else if element.class == 0 && element.tag == TAG_SET {
            let mut signer_data = element.content;
            while !signer_data.is_empty() {
                let (signer, signer_rest) = read_tlv(signer_data)?;
                signers.push(parse_raw_signer(signer.content));
                signer_data = signer_rest;
            }
        }

        cursor = rest;
    }

    Some(ParsedContainer {
        certificates,
        signers,
    })
}

/// `SignerInfo ::= SEQUENCE { version, issuerAndSerialNumber SEQUENCE
/// { issuer Name, serialNumber INTEGER }, … }`
fn parse_raw_signer(content: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
    let (_, rest) = read_tlv(content)?;
    let (issuer_and_serial, _) = read_tlv(rest)?;

    let inner = issuer_and_serial.content;
    let (_, after_issuer) = read_tlv(inner)?;
    let issuer_der = &inner[..inner.len() - after_issuer.len()];
    let (serial, _) = read_tlv(after_issuer)?;

    Some((issuer_der.to_vec(), serial.content.to_vec()))
}
