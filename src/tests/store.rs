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

use crate::certificate::{
    info::CertificateInfo,
    store::{CertificateStore, EntryType},
};

const LEAF_DER: &[u8] = include_bytes!("fixtures/leaf.der");
const ROOT_DER: &[u8] = include_bytes!("fixtures/root.der");

#[test]
fn add_is_idempotent() {
    let info = CertificateInfo::from_der(ROOT_DER).unwrap();
    let mut store = CertificateStore::new();

    assert!(store.add(EntryType::User, info.clone()));
    assert!(!store.add(EntryType::User, info.clone()));
    assert_eq!(store.entries().len(), 1);
    assert!(store.contains(&info));
}

#[test]
fn add_der_parses_and_inserts() {
    let mut store = CertificateStore::new();

    assert!(store.add_der(EntryType::System, ROOT_DER));
    assert!(!store.add_der(EntryType::System, ROOT_DER));
    assert!(!store.add_der(EntryType::User, b"garbage"));
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn entries_keep_insertion_order() {
    let mut store = CertificateStore::new();
    store.add_der(EntryType::User, LEAF_DER);
    store.add_der(EntryType::System, ROOT_DER);

    let entries = store.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entry_type(), EntryType::User);
    assert_eq!(entries[0].info().certificate_data(), LEAF_DER);
    assert_eq!(entries[1].entry_type(), EntryType::System);
    assert_eq!(entries[1].info().certificate_data(), ROOT_DER);
}

#[test]
fn serialization_round_trip() {
    let mut store = CertificateStore::new();
    store.add_der(EntryType::User, LEAF_DER);
    store.add_der(EntryType::System, ROOT_DER);

    let restored = CertificateStore::deserialize(&store.serialize()).unwrap();

    assert_eq!(store, restored);
}

#[test]
fn empty_store_round_trip() {
    let store = CertificateStore::new();
    let restored = CertificateStore::deserialize(&store.serialize()).unwrap();

    assert_eq!(store, restored);
    assert!(restored.entries().is_empty());
}

#[test]
fn deserialize_rejects_truncated_stream() {
    let mut store = CertificateStore::new();
    store.add_der(EntryType::User, LEAF_DER);
    let mut data = store.serialize();
    data.truncate(data.len() - 10);

    assert!(CertificateStore::deserialize(&data).is_err());
}
