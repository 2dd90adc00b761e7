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

use crate::certificate::info::{CertificateInfo, KeyUsageFlags, NameEntry, PublicKey};

const LEAF_DER: &[u8] = include_bytes!("fixtures/leaf.der");
const ROOT_DER: &[u8] = include_bytes!("fixtures/root.der");
const EC_DER: &[u8] = include_bytes!("fixtures/ec.der");

#[test]
fn extracts_subject_name_entries() {
    let info = CertificateInfo::from_der(LEAF_DER).unwrap();

    assert_eq!(info.name(NameEntry::CommonName), "Test Signer");
    assert_eq!(info.name(NameEntry::CountryName), "CZ");
    assert_eq!(info.name(NameEntry::StateOrProvinceName), "South Moravia");
    assert_eq!(info.name(NameEntry::LocalityName), "Brno");
    assert_eq!(info.name(NameEntry::OrganizationName), "Example Org");
    assert_eq!(info.name(NameEntry::OrganizationalUnitName), "Document Signing");
    assert_eq!(info.name(NameEntry::Email), "signer@example.com");

    // Attributes absent from the subject come back empty.
    assert_eq!(info.name(NameEntry::Surname), "");
    assert_eq!(info.name(NameEntry::Pseudonym), "");
}

#[test]
fn extracts_key_and_version() {
    let info = CertificateInfo::from_der(LEAF_DER).unwrap();

    assert_eq!(info.public_key(), PublicKey::Rsa);
    assert_eq!(info.key_size(), 2048);
    // v3 certificate, zero-based version field.
    assert_eq!(info.version(), 2);
    assert!(info.not_valid_before().is_some());
    assert!(info.not_valid_after().is_some());
    assert!(info.not_valid_before().unwrap() < info.not_valid_after().unwrap());
    assert_eq!(info.certificate_data(), LEAF_DER);
}

#[test]
fn extracts_ec_key() {
    let info = CertificateInfo::from_der(EC_DER).unwrap();

    assert_eq!(info.public_key(), PublicKey::Ec);
    assert_eq!(info.key_size(), 256);
}

#[test]
fn key_usage_bits_follow_the_extension() {
    let leaf = CertificateInfo::from_der(LEAF_DER).unwrap();
    assert!(leaf.key_usage().contains(KeyUsageFlags::DIGITAL_SIGNATURE));
    assert!(leaf.key_usage().contains(KeyUsageFlags::NON_REPUDIATION));
    assert!(!leaf.key_usage().contains(KeyUsageFlags::CERT_SIGN));

    let root = CertificateInfo::from_der(ROOT_DER).unwrap();
    assert!(root.key_usage().contains(KeyUsageFlags::CERT_SIGN));
    assert!(root.key_usage().contains(KeyUsageFlags::CRL_SIGN));
}

#[test]
fn absent_key_usage_is_distinguishable_from_empty() {
    // The EC test certificate carries no key usage extension.
    let info = CertificateInfo::from_der(EC_DER).unwrap();

    assert_eq!(info.key_usage(), KeyUsageFlags::NOT_PRESENT);
    assert_ne!(info.key_usage(), KeyUsageFlags::empty());
}

#[test]
fn from_der_rejects_garbage() {
    assert!(CertificateInfo::from_der(b"not a certificate").is_none());
    assert!(CertificateInfo::from_der(&[]).is_none());
}

#[test]
fn from_der_round_trips_through_certificate_data() {
    let info = CertificateInfo::from_der(LEAF_DER).unwrap();
    let again = CertificateInfo::from_der(info.certificate_data()).unwrap();

    assert_eq!(info, again);
}

#[test]
fn persistence_round_trip() {
    for der in [LEAF_DER, ROOT_DER, EC_DER] {
        let info = CertificateInfo::from_der(der).unwrap();
        let restored = CertificateInfo::deserialize(&info.serialize()).unwrap();
        assert_eq!(info, restored);
    }
}

#[test]
fn deserialize_rejects_truncated_stream() {
    let info = CertificateInfo::from_der(LEAF_DER).unwrap();
    let mut data = info.serialize();
    data.truncate(data.len() / 2);

    assert!(CertificateInfo::deserialize(&data).is_err());
}
