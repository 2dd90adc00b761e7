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

//! X.509 certificate metadata extraction.

use std::collections::BTreeMap;

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use x509_parser::prelude::*;

use crate::{
    certificate::persist::{StreamReader, StreamWriter, PERSIST_VERSION},
    error::{Error, Result},
    oids,
};

/// Type of the subject public key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicKey {
    /// RSA key.
    Rsa,
    /// DSA key.
    Dsa,
    /// Diffie-Hellman key.
    Dh,
    /// Elliptic-curve key.
    Ec,
    /// Unrecognized algorithm.
    #[default]
    Unknown,
}

impl PublicKey {
    pub(crate) fn to_persisted(self) -> u32 {
        match self {
            PublicKey::Rsa => 0,
            PublicKey::Dsa => 1,
            PublicKey::Dh => 2,
            PublicKey::Ec => 3,
            PublicKey::Unknown => 4,
        }
    }

    pub(crate) fn from_persisted(value: u32) -> Self {
        match value {
            0 => PublicKey::Rsa,
            1 => PublicKey::Dsa,
            2 => PublicKey::Dh,
            3 => PublicKey::Ec,
            _ => PublicKey::Unknown,
        }
    }
}

/// Distinguished-name entry keys carried by [`CertificateInfo`].
///
/// The first seven are the RFC 5280 section 4.1.2.4 attributes every
/// implementation must be prepared to process; the rest should be processed
/// when present. `Email` is not part of that section but commonly used.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NameEntry {
    /// Country (C).
    CountryName,
    /// Organization (O).
    OrganizationName,
    /// Organizational unit (OU).
    OrganizationalUnitName,
    /// Distinguished name qualifier.
    DistinguishedName,
    /// State or province (ST).
    StateOrProvinceName,
    /// Common name (CN).
    CommonName,
    /// Serial number attribute of the subject name.
    SerialNumber,
    /// Locality (L).
    LocalityName,
    /// Title.
    Title,
    /// Surname (SN).
    Surname,
    /// Given name (GN).
    GivenName,
    /// Initials.
    Initials,
    /// Pseudonym.
    Pseudonym,
    /// Generational qualifier.
    GenerationalQualifier,
    /// E-mail address (PKCS#9).
    Email,
}

impl NameEntry {
    pub(crate) fn to_persisted(self) -> u32 {
        self as u32
    }

    pub(crate) fn from_persisted(value: u32) -> Option<Self> {
        const ALL: [NameEntry; 15] = [
            NameEntry::CountryName,
            NameEntry::OrganizationName,
            NameEntry::OrganizationalUnitName,
            NameEntry::DistinguishedName,
            NameEntry::StateOrProvinceName,
            NameEntry::CommonName,
            NameEntry::SerialNumber,
            NameEntry::LocalityName,
            NameEntry::Title,
            NameEntry::Surname,
            NameEntry::GivenName,
            NameEntry::Initials,
            NameEntry::Pseudonym,
            NameEntry::GenerationalQualifier,
            NameEntry::Email,
        ];
        ALL.get(value as usize).copied()
    }
}

bitflags! {
    /// Key usage bits, positioned exactly as the native crypto library packs
    /// the RFC 5280 key usage BIT STRING.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct KeyUsageFlags: u32 {
        /// digitalSignature
        const DIGITAL_SIGNATURE = 0x0080;
        /// nonRepudiation
        const NON_REPUDIATION = 0x0040;
        /// keyEncipherment
        const KEY_ENCIPHERMENT = 0x0020;
        /// dataEncipherment
        const DATA_ENCIPHERMENT = 0x0010;
        /// keyAgreement
        const AGREEMENT = 0x0008;
        /// keyCertSign
        const CERT_SIGN = 0x0004;
        /// cRLSign
        const CRL_SIGN = 0x0002;
        /// encipherOnly
        const ENCIPHER_ONLY = 0x0001;
        /// decipherOnly
        const DECIPHER_ONLY = 0x8000;

        /// The key usage extension is not present. Distinguishable from a
        /// present extension with no bits set.
        const NOT_PRESENT = u32::MAX;
    }
}

impl Default for KeyUsageFlags {
    fn default() -> Self {
        KeyUsageFlags::NOT_PRESENT
    }
}

/// Metadata of a single X.509 certificate, together with the exact DER bytes
/// it was extracted from.
///
/// Value equality covers every persisted field, so trust store deduplication
/// by `info` equality is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateInfo {
    version: i64,
    key_size: i32,
    public_key: PublicKey,
    name_entries: BTreeMap<NameEntry, String>,
    not_valid_before: Option<DateTime<Utc>>,
    not_valid_after: Option<DateTime<Utc>>,
    key_usage: KeyUsageFlags,
    certificate_data: Vec<u8>,
}

impl CertificateInfo {
    /// Parse a DER-encoded certificate and extract its metadata.
    ///
    /// Returns `None` for data that does not decode as an X.509 certificate.
    /// This is the entry point GUIs use to inspect a certificate without
    /// running a verification.
    pub fn from_der(certificate_data: &[u8]) -> Option<CertificateInfo> {
        let (_, certificate) = X509Certificate::from_der(certificate_data).ok()?;
        Some(Self::extract(&certificate, certificate_data))
    }

    /// Extract metadata from an already-parsed certificate.
    pub(crate) fn extract(certificate: &X509Certificate, certificate_data: &[u8]) -> Self {
        let mut info = CertificateInfo {
            version: i64::from(certificate.version().0),
            certificate_data: certificate_data.to_vec(),
            ..CertificateInfo::default()
        };

        let subject = certificate.subject();
        let name_oids: [(NameEntry, &x509_parser::oid_registry::Oid<'static>); 15] = [
            (NameEntry::CountryName, &oids::COUNTRY_NAME_OID),
            (NameEntry::OrganizationName, &oids::ORGANIZATION_NAME_OID),
            (
                NameEntry::OrganizationalUnitName,
                &oids::ORGANIZATIONAL_UNIT_NAME_OID,
            ),
            (NameEntry::DistinguishedName, &oids::DISTINGUISHED_NAME_OID),
            (
                NameEntry::StateOrProvinceName,
                &oids::STATE_OR_PROVINCE_NAME_OID,
            ),
            (NameEntry::CommonName, &oids::COMMON_NAME_OID),
            (NameEntry::SerialNumber, &oids::SERIAL_NUMBER_OID),
            (NameEntry::LocalityName, &oids::LOCALITY_NAME_OID),
            (NameEntry::Title, &oids::TITLE_OID),
            (NameEntry::Surname, &oids::SURNAME_OID),
            (NameEntry::GivenName, &oids::GIVEN_NAME_OID),
            (NameEntry::Initials, &oids::INITIALS_OID),
            (NameEntry::Pseudonym, &oids::PSEUDONYM_OID),
            (
                NameEntry::GenerationalQualifier,
                &oids::GENERATION_QUALIFIER_OID,
            ),
            (NameEntry::Email, &oids::EMAIL_OID),
        ];
        for (entry, oid) in name_oids {
            info.set_name(entry, first_name_attribute(subject, oid));
        }

        let validity = certificate.validity();
        info.not_valid_before = DateTime::from_timestamp(validity.not_before.timestamp(), 0);
        info.not_valid_after = DateTime::from_timestamp(validity.not_after.timestamp(), 0);

        let spki = certificate.public_key();
        let algorithm = &spki.algorithm.algorithm;
        info.public_key = if *algorithm == oids::RSA_OID {
            PublicKey::Rsa
        } else if *algorithm == oids::DSA_OID {
            PublicKey::Dsa
        } else if *algorithm == oids::DH_OID {
            PublicKey::Dh
        } else if *algorithm == oids::EC_PUBLICKEY_OID {
            PublicKey::Ec
        } else {
            PublicKey::Unknown
        };
        info.key_size = key_size_bits(spki);

        if let Ok(Some(extension)) = certificate.key_usage() {
            let usage = extension.value;
            let mut flags = KeyUsageFlags::empty();
            if usage.digital_signature() {
                flags |= KeyUsageFlags::DIGITAL_SIGNATURE;
            }
            if usage.non_repudiation() {
                flags |= KeyUsageFlags::NON_REPUDIATION;
            }
            if usage.key_encipherment() {
                flags |= KeyUsageFlags::KEY_ENCIPHERMENT;
            }
            if usage.data_encipherment() {
                flags |= KeyUsageFlags::DATA_ENCIPHERMENT;
            }
            if usage.key_agreement() {
                flags |= KeyUsageFlags::AGREEMENT;
            }
            if usage.key_cert_sign() {
                flags |= KeyUsageFlags::CERT_SIGN;
            }
            if usage.crl_sign() {
                flags |= KeyUsageFlags::CRL_SIGN;
            }
            if usage.encipher_only() {
                flags |= KeyUsageFlags::ENCIPHER_ONLY;
            }
            if usage.decipher_only() {
                flags |= KeyUsageFlags::DECIPHER_ONLY;
            }
            info.key_usage = flags;
        }

        info
    }

    /// X.509 version field (zero-based, 2 for v3).
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Key size in bits.
    pub fn key_size(&self) -> i32 {
        self.key_size
    }

    /// Subject public key type.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Subject name entry, empty when the attribute is absent.
    pub fn name(&self, entry: NameEntry) -> &str {
        self.name_entries.get(&entry).map_or("", String::as_str)
    }

    pub(crate) fn set_name(&mut self, entry: NameEntry, value: String) {
        self.name_entries.insert(entry, value);
    }

    /// Start of the validity window, UTC.
    pub fn not_valid_before(&self) -> Option<DateTime<Utc>> {
        self.not_valid_before
    }

    /// End of the validity window, UTC.
    pub fn not_valid_after(&self) -> Option<DateTime<Utc>> {
        self.not_valid_after
    }

    /// Key usage bits; [`KeyUsageFlags::NOT_PRESENT`] when the extension is
    /// absent.
    pub fn key_usage(&self) -> KeyUsageFlags {
        self.key_usage
    }

    /// The exact DER bytes the metadata was extracted from.
    pub fn certificate_data(&self) -> &[u8] {
        &self.certificate_data
    }

    /// Serialize into the persistence stream format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = StreamWriter::new();
        self.write_to(&mut writer);
        writer.finish()
    }

    /// Deserialize from the persistence stream format.
    pub fn deserialize(data: &[u8]) -> Result<CertificateInfo> {
        let mut reader = StreamReader::new(data);
        Self::read_from(&mut reader)
    }

    pub(crate) fn write_to(&self, writer: &mut StreamWriter) {
        writer.write_i32(PERSIST_VERSION);
        writer.write_i64(self.version);
        writer.write_i32(self.key_size);
        writer.write_u32(self.public_key.to_persisted());
        writer.write_u32(self.name_entries.len() as u32);
        for (entry, value) in &self.name_entries {
            writer.write_u32(entry.to_persisted());
            writer.write_string(value);
        }
        writer.write_i64(persisted_timestamp(self.not_valid_before));
        writer.write_i64(persisted_timestamp(self.not_valid_after));
        writer.write_u32(self.key_usage.bits());
        writer.write_bytes(&self.certificate_data);
    }

    pub(crate) fn read_from(reader: &mut StreamReader) -> Result<CertificateInfo> {
        let _persist_version = reader.read_i32()?;

        let mut info = CertificateInfo {
            version: reader.read_i64()?,
            key_size: reader.read_i32()?,
            public_key: PublicKey::from_persisted(reader.read_u32()?),
            ..CertificateInfo::default()
        };

        let entry_count = reader.read_u32()?;
        for _ in 0..entry_count {
            let key = reader.read_u32()?;
            let value = reader.read_string()?;
            match NameEntry::from_persisted(key) {
                Some(entry) => info.set_name(entry, value),
                None => {
                    return Err(Error::PersistMalformed(format!(
                        "unknown name entry key {key}"
                    )))
                }
            }
        }

        info.not_valid_before = restored_timestamp(reader.read_i64()?);
        info.not_valid_after = restored_timestamp(reader.read_i64()?);
        info.key_usage = KeyUsageFlags::from_bits_retain(reader.read_u32()?);
        info.certificate_data = reader.read_bytes()?;

        Ok(info)
    }
}

const ABSENT_TIMESTAMP: i64 = i64::MIN;

fn persisted_timestamp(value: Option<DateTime<Utc>>) -> i64 {
    value.map_or(ABSENT_TIMESTAMP, |datetime| datetime.timestamp())
}

fn restored_timestamp(value: i64) -> Option<DateTime<Utc>> {
    if value == ABSENT_TIMESTAMP {
        None
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// UTF-8 value of the first subject name attribute with the given OID, empty
/// when absent or not string-typed.
fn first_name_attribute(name: &X509Name, oid: &x509_parser::oid_registry::Oid) -> String {
    name.iter_attributes()
        .find(|attribute| attribute.attr_type() == oid)
        .and_then(|attribute| attribute.as_str().ok())
        .map_or_else(String::new, str::to_owned)
}

/// Size of the subject public key in bits.
fn key_size_bits(spki: &SubjectPublicKeyInfo) -> i32 {
    match spki.parsed() {
        Ok(x509_parser::public_key::PublicKey::RSA(rsa)) => bit_length(rsa.modulus),
        Ok(x509_parser::public_key::PublicKey::EC(point)) => {
            // Uncompressed SEC 1 point: 0x04 || X || Y.
            let data = point.data();
            if data.len() > 1 {
                (((data.len() - 1) / 2) * 8) as i32
            } else {
                0
            }
        }
        Ok(x509_parser::public_key::PublicKey::DSA(y)) => bit_length(y),
        _ => 0,
    }
}

fn bit_length(big_endian: &[u8]) -> i32 {
    let mut bytes = big_endian;
    while let Some((first, rest)) = bytes.split_first() {
        if *first == 0 {
            bytes = rest;
        } else {
            return (rest.len() * 8) as i32 + (8 - first.leading_zeros() as i32);
        }
    }
    0
}
