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

//! Persistable store of trusted certificates.

use serde::{Deserialize, Serialize};

use crate::{
    certificate::{
        info::CertificateInfo,
        persist::{StreamReader, StreamWriter, PERSIST_VERSION},
    },
    error::Result,
};

/// Origin of a trust store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Entry imported from the operating system.
    System,
    /// Entry added by the user.
    User,
}

impl EntryType {
    fn to_persisted(self) -> u32 {
        match self {
            EntryType::System => 0,
            EntryType::User => 1,
        }
    }

    fn from_persisted(value: u32) -> Self {
        match value {
            0 => EntryType::System,
            _ => EntryType::User,
        }
    }
}

/// One trusted certificate with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateEntry {
    entry_type: EntryType,
    info: CertificateInfo,
}

impl CertificateEntry {
    /// Origin of the entry.
    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    /// Certificate metadata.
    pub fn info(&self) -> &CertificateInfo {
        &self.info
    }

    fn write_to(&self, writer: &mut StreamWriter) {
        writer.write_i32(PERSIST_VERSION);
        writer.write_u32(self.entry_type.to_persisted());
        self.info.write_to(writer);
    }

    fn read_from(reader: &mut StreamReader) -> Result<Self> {
        let _persist_version = reader.read_i32()?;
        let entry_type = EntryType::from_persisted(reader.read_u32()?);
        let info = CertificateInfo::read_from(reader)?;
        Ok(CertificateEntry { entry_type, info })
    }
}

/// Deduplicated set of trusted certificates, in insertion order.
///
/// The store is a plain value object: a verification run borrows it
/// read-only for its whole duration, and concurrent writers must coordinate
/// externally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertificateStore {
    certificates: Vec<CertificateEntry>,
}

impl CertificateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a certificate unless an entry with equal metadata already
    /// exists. Returns true when the logical set changed.
    pub fn add(&mut self, entry_type: EntryType, info: CertificateInfo) -> bool {
        if self.contains(&info) {
            return false;
        }

        self.certificates.push(CertificateEntry { entry_type, info });
        true
    }

    /// Parse a DER certificate and insert it. Returns false for unparsable
    /// data or an already-present certificate.
    pub fn add_der(&mut self, entry_type: EntryType, certificate_data: &[u8]) -> bool {
        match CertificateInfo::from_der(certificate_data) {
            Some(info) => self.add(entry_type, info),
            None => false,
        }
    }

    /// Returns true if an entry with equal metadata exists.
    pub fn contains(&self, info: &CertificateInfo) -> bool {
        self.certificates.iter().any(|entry| entry.info == *info)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CertificateEntry] {
        &self.certificates
    }

    /// Serialize into the persistence stream format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = StreamWriter::new();
        writer.write_i32(PERSIST_VERSION);
        writer.write_u32(self.certificates.len() as u32);
        for entry in &self.certificates {
            entry.write_to(&mut writer);
        }
        writer.finish()
    }

    /// Deserialize from the persistence stream format.
    pub fn deserialize(data: &[u8]) -> Result<CertificateStore> {
        let mut reader = StreamReader::new(data);
        let _persist_version = reader.read_i32()?;
        let count = reader.read_u32()?;

        let mut store = CertificateStore::new();
        store.certificates.reserve(count as usize);
        for _ in 0..count {
            store.certificates.push(CertificateEntry::read_from(&mut reader)?);
        }

        Ok(store)
    }
}
