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

//! Engine for the legacy `adbe.x509.rsa_sha1` subfilter.
//!
//! No CMS container here: the contents slot carries a raw PKCS#1 v1.5 RSA
//! signature wrapped in an ASN.1 OCTET STRING, and the certificate chain
//! comes from the signature dictionary's own `Cert` array, leaf first. The
//! digest algorithm is not declared anywhere; it is recovered from the
//! DigestInfo inside the RSA-decrypted signature payload.

use log::debug;
use openssl::{
    hash::MessageDigest,
    rsa::Padding,
    sign::Verifier,
    stack::Stack,
    x509::X509,
};
use x509_parser::der_parser::der::{parse_der, parse_der_octetstring};

use crate::{
    ffi_mutex::CryptoLock,
    oids,
    verify::{
        byte_range, result::SignatureVerificationFlags, result::VerificationResult, trust,
        HandlerContext,
    },
};

/// Verify a legacy RSA signature field.
pub(super) fn verify(context: &HandlerContext<'_>, result: &mut VerificationResult) {
    verify_certificate(context, result);
    verify_signature(context, result);
    result.validate();
}

fn verify_certificate(context: &HandlerContext<'_>, result: &mut VerificationResult) {
    match context
        .signature
        .certificates()
        .and_then(|certificates| certificates.first())
    {
        None => result.add_invalid_certificate_error(),
        Some(leaf_der) => validate_certificate_chain(context, leaf_der, result),
    }

    if !result.has_certificate_error() {
        result.set_flag(SignatureVerificationFlags::CERTIFICATE_OK);
    }
}

fn validate_certificate_chain(
    context: &HandlerContext<'_>,
    leaf_der: &[u8],
    result: &mut VerificationResult,
) {
    let Ok(_lock) = CryptoLock::acquire() else {
        result.add_certificate_generic_error();
        return;
    };

    let Ok(leaf) = X509::from_der(leaf_der) else {
        result.add_invalid_certificate_error();
        return;
    };

    // The dictionary's certificate array is the chain, leaf at index 0; an
    // unparsable entry ends the chain there.
    let mut presented = vec![leaf.clone()];
    if let Some(certificates) = context.signature.certificates() {
        for der in certificates.iter().skip(1) {
            match X509::from_der(der) {
                Ok(certificate) => presented.push(certificate),
                Err(_) => break,
            }
        }
    }

    let store = match trust::build_trusted_store(context.parameters) {
        Ok(store) => store,
        Err(_) => {
            result.add_certificate_generic_error();
            return;
        }
    };

    let mut untrusted = match Stack::new() {
        Ok(stack) => stack,
        Err(_) => {
            result.add_certificate_generic_error();
            return;
        }
    };
    for certificate in &presented {
        if untrusted.push(certificate.clone()).is_err() {
            result.add_certificate_generic_error();
            return;
        }
    }

    trust::validate_chain(&store, &leaf, &untrusted, &presented, result);
}

fn verify_signature(context: &HandlerContext<'_>, result: &mut VerificationResult) {
    check_rsa_signature(context, result);

    if !result.has_signature_error() {
        result.set_flag(SignatureVerificationFlags::SIGNATURE_OK);
    }
}

fn check_rsa_signature(context: &HandlerContext<'_>, result: &mut VerificationResult) {
    let Some(leaf_der) = context
        .signature
        .certificates()
        .and_then(|certificates| certificates.first())
    else {
        result.add_signature_certificate_missing_error();
        return;
    };

    let Ok(_lock) = CryptoLock::acquire() else {
        result.add_signature_data_other_error();
        return;
    };

    let Ok(leaf) = X509::from_der(leaf_der) else {
        result.add_signature_certificate_missing_error();
        return;
    };

    let Ok(public_key) = leaf.public_key() else {
        result.add_signature_certificate_missing_error();
        return;
    };

    let Ok(rsa) = public_key.rsa() else {
        result.add_signature_certificate_missing_error();
        return;
    };

    let Some(signed_data) =
        byte_range::get_signed_data(context.source_data, &context.signature, result)
    else {
        return;
    };

    let Some(signature_bytes) = parse_octet_string(context.signature.contents()) else {
        result.add_signature_data_other_error();
        return;
    };

    // RSA-decrypt the signature to recover the DigestInfo and with it the
    // digest algorithm the signer used.
    let mut decrypted = vec![0u8; rsa.size() as usize];
    let decrypted_length =
        match rsa.public_decrypt(&signature_bytes, &mut decrypted, Padding::PKCS1) {
            Ok(length) => length,
            Err(_) => {
                result.add_signature_data_other_error();
                return;
            }
        };

    let Some(message_digest) = digest_from_digest_info(&decrypted[..decrypted_length]) else {
        result.add_signature_data_other_error();
        return;
    };

    let Ok(mut verifier) = Verifier::new(message_digest, &public_key) else {
        result.add_signature_data_other_error();
        return;
    };

    match verifier.verify_oneshot(&signature_bytes, &signed_data.bytes) {
        Ok(true) => debug!("legacy RSA signature verified"),
        Ok(false) => result.add_signature_digest_failure_error(),
        Err(_) => result.add_signature_data_other_error(),
    }
}

/// The contents slot is an ASN.1 OCTET STRING wrapping the raw RSA
/// signature; trailing padding after the element is ignored.
fn parse_octet_string(data: &[u8]) -> Option<Vec<u8>> {
    let (_, object) = parse_der_octetstring(data).ok()?;
    object.as_slice().ok().map(<[u8]>::to_vec)
}

/// `DigestInfo ::= SEQUENCE { AlgorithmIdentifier, OCTET STRING }`; only the
/// algorithm is needed, the verifier recomputes the digest itself.
fn digest_from_digest_info(data: &[u8]) -> Option<MessageDigest> {
    let (_, digest_info) = parse_der(data).ok()?;
    let sequence = digest_info.as_sequence().ok()?;
    let algorithm = sequence.first()?.as_sequence().ok()?;
    let oid = algorithm.first()?.as_oid().ok()?;

    if *oid == oids::SHA1_OID {
        Some(MessageDigest::sha1())
    } else if *oid == oids::SHA256_OID {
        Some(MessageDigest::sha256())
    } else if *oid == oids::SHA384_OID {
        Some(MessageDigest::sha384())
    } else if *oid == oids::SHA512_OID {
        Some(MessageDigest::sha512())
    } else if *oid == oids::SHA224_OID {
        Some(MessageDigest::sha224())
    } else if *oid == oids::MD5_OID {
        Some(MessageDigest::md5())
    } else {
        None
    }
}
