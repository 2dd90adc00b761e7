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

//! End-to-end verification over synthetic documents assembled around real
//! signature blobs.

use crate::{
    certificate::store::{CertificateStore, EntryType},
    form::{Form, FormField, FormType},
    object_model::ObjectRef,
    signature::{ByteRange, Signature},
    verify::{verify_signatures, SignatureVerificationFlags, VerificationParameters},
};

const ROOT_DER: &[u8] = include_bytes!("fixtures/root.der");
const LEAF_DER: &[u8] = include_bytes!("fixtures/leaf.der");
const PREFIX: &[u8] = include_bytes!("fixtures/prefix.bin");
const SUFFIX: &[u8] = include_bytes!("fixtures/suffix.bin");
const SIG_DETACHED_CHAIN: &[u8] = include_bytes!("fixtures/sig_detached_chain.der");
const SIG_DETACHED_SELF_SIGNED: &[u8] = include_bytes!("fixtures/sig_detached_selfsigned.der");
const SIG_SHA1_CHAIN: &[u8] = include_bytes!("fixtures/sig_sha1_chain.der");
const SIG_RSA_LEGACY: &[u8] = include_bytes!("fixtures/sig_rsa_legacy.der");

/// Hex window size of the contents slot, analogous to the reservation a PDF
/// writer makes before it knows the final signature size.
const CONTENTS_WINDOW: usize = 4096;

/// Build a synthetic document: the signed payload (prefix + suffix) with the
/// hex-encoded, zero-padded signature blob in between, delimited by `<`/`>`.
/// Returns the file bytes plus the signature record pointing into them.
fn build_document(signature_blob: &[u8], subfilter: &[u8], certificates: Option<Vec<Vec<u8>>>) -> (Vec<u8>, Signature) {
    assert!(signature_blob.len() <= CONTENTS_WINDOW);

    let mut contents = signature_blob.to_vec();
    contents.resize(CONTENTS_WINDOW, 0);

    let mut file = Vec::new();
    file.extend_from_slice(PREFIX);
    file.push(b'<');
    file.extend_from_slice(hex::encode(&contents).as_bytes());
    file.push(b'>');
    file.extend_from_slice(SUFFIX);

    let suffix_offset = (PREFIX.len() + 2 * CONTENTS_WINDOW + 2) as i64;
    let byte_ranges = vec![
        ByteRange {
            offset: 0,
            length: PREFIX.len() as i64,
        },
        ByteRange {
            offset: suffix_offset,
            length: SUFFIX.len() as i64,
        },
    ];

    let signature = Signature::for_test(subfilter, contents, certificates, byte_ranges);
    (file, signature)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn form_with(signature: Signature) -> Form {
    let mut form = Form::new(FormType::AcroForm);
    form.add_field(FormField::new_signature(
        ObjectRef::new(7, 0),
        "Signature1".into(),
        signature,
    ));
    form
}

fn trusted_root_store() -> CertificateStore {
    let mut store = CertificateStore::new();
    assert!(store.add_der(EntryType::User, ROOT_DER));
    store
}

#[test]
fn self_signed_signature_verifies_but_chain_does_not() {
    let (file, signature) = build_document(SIG_DETACHED_SELF_SIGNED, b"adbe.pkcs7.detached", None);
    let form = form_with(signature);

    let results = verify_signatures(&form, &file, &VerificationParameters::default());

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::SIGNATURE_OK));
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_CERTIFICATE_SELF_SIGNED));
    assert!(!result.is_valid());
    assert!(result.warnings().is_empty());
    // On chain failure the presented certificates are still reported.
    assert!(!result.certificate_infos().is_empty());
}

#[test]
fn trusted_chain_verifies_completely() {
    init_logging();
    let (file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::CERTIFICATE_OK));
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::SIGNATURE_OK));
    assert!(result.warnings().is_empty());
    // The validated chain is reported leaf first.
    assert_eq!(result.certificate_infos().len(), 2);
    assert_eq!(result.certificate_infos()[0].certificate_data(), LEAF_DER);
}

#[test]
fn appended_bytes_keep_ok_but_warn() {
    let (mut file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    file.extend_from_slice(&[0u8; 10]);
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    let result = &results[0];
    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert_eq!(result.warnings().len(), 1);
    assert!(result.warnings()[0].contains("10 bytes"));
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::WARNING_SIGNATURE_NOT_COVERED_BYTES));
}

#[test]
fn flipped_byte_fails_with_digest_failure() {
    let (mut file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    file[10] ^= 0xff;
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    let result = &results[0];
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::CERTIFICATE_OK));
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_SIGNATURE_DIGEST_FAILURE));
    assert!(!result.is_valid());
}

#[test]
fn sha1_variant_verifies() {
    let (file, signature) = build_document(SIG_SHA1_CHAIN, b"adbe.pkcs7.sha1", None);
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    let result = &results[0];
    assert!(result.is_valid(), "errors: {:?}", result.errors());
}

#[test]
fn legacy_rsa_signature_verifies() {
    init_logging();
    let (file, signature) = build_document(
        SIG_RSA_LEGACY,
        b"adbe.x509.rsa_sha1",
        Some(vec![LEAF_DER.to_vec(), ROOT_DER.to_vec()]),
    );
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    let result = &results[0];
    assert!(result.is_valid(), "errors: {:?}", result.errors());
    assert!(result.warnings().is_empty());
}

#[test]
fn legacy_rsa_rejects_tampered_data() {
    let (mut file, signature) = build_document(
        SIG_RSA_LEGACY,
        b"adbe.x509.rsa_sha1",
        Some(vec![LEAF_DER.to_vec(), ROOT_DER.to_vec()]),
    );
    file[20] ^= 0x55;
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    let result = &results[0];
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_SIGNATURE_DIGEST_FAILURE));
    assert!(!result.is_valid());
}

#[test]
fn unknown_subfilter_gets_no_handler_result() {
    let (file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.foo.unknown", None);
    let form = form_with(signature);

    let results = verify_signatures(&form, &file, &VerificationParameters::default());

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_NO_HANDLER));
    assert!(!result.is_valid());
    assert!(result.errors()[0].contains("adbe.foo.unknown"));
}

#[test]
fn empty_signature_is_rejected_cleanly() {
    let form = form_with(Signature::default());

    let results = verify_signatures(&form, &[], &VerificationParameters::default());

    // An empty subfilter has no handler; nothing must panic.
    assert_eq!(results.len(), 1);
    assert!(results[0]
        .flags()
        .contains(SignatureVerificationFlags::ERROR_NO_HANDLER));
}

#[test]
fn empty_contents_with_pkcs7_subfilter_is_invalid() {
    let signature = Signature::for_test(b"adbe.pkcs7.detached", Vec::new(), None, Vec::new());
    let form = form_with(signature);

    let results = verify_signatures(&form, b"%PDF-1.7", &VerificationParameters::default());

    let result = &results[0];
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_CERTIFICATE_INVALID));
    assert!(result
        .flags()
        .contains(SignatureVerificationFlags::ERROR_SIGNATURE_INVALID));
    assert!(!result.is_valid());
}

#[test]
fn disabled_verification_returns_no_results() {
    let (file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    let form = form_with(signature);
    let parameters = VerificationParameters {
        enable_verification: false,
        ..VerificationParameters::default()
    };

    assert!(verify_signatures(&form, &file, &parameters).is_empty());
}

#[test]
fn document_without_form_returns_no_results() {
    let (file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    let mut form = Form::new(FormType::None);
    form.add_field(FormField::new_signature(
        ObjectRef::new(7, 0),
        "Signature1".into(),
        signature,
    ));

    assert!(verify_signatures(&form, &file, &VerificationParameters::default()).is_empty());
}

#[test]
fn one_result_per_signature_field_in_form_order() {
    let (file, good) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    let unknown = Signature::for_test(b"adbe.foo.unknown", Vec::new(), None, Vec::new());

    let mut form = Form::new(FormType::AcroForm);
    form.add_field(FormField::new_signature(
        ObjectRef::new(7, 0),
        "First".into(),
        good,
    ));
    form.add_field(FormField::new_signature(
        ObjectRef::new(8, 0),
        "Second".into(),
        unknown,
    ));
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].signature_field_qualified_name(), "First");
    assert_eq!(results[1].signature_field_qualified_name(), "Second");
    assert!(results[0].is_valid());
    assert!(!results[1].is_valid());
}

#[test]
fn expired_check_can_be_disabled() {
    // With a trusted chain the flag has no visible effect; this pins down
    // that the parameter path at least keeps the verification green.
    let (file, signature) = build_document(SIG_DETACHED_CHAIN, b"adbe.pkcs7.detached", None);
    let form = form_with(signature);
    let store = trusted_root_store();
    let parameters = VerificationParameters {
        ignore_expiration_date: true,
        store: Some(&store),
        ..VerificationParameters::default()
    };

    let results = verify_signatures(&form, &file, &parameters);

    assert!(results[0].is_valid(), "errors: {:?}", results[0].errors());
}
