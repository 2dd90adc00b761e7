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

use chrono::{TimeZone, Utc};

use crate::{
    object_model::{Dictionary, Object, ObjectRef, ObjectStorage},
    signature::{AuthentificationType, Signature, SignatureType, TransformMethod},
};

fn integer_array(values: &[i64]) -> Object {
    Object::Array(values.iter().map(|value| Object::Integer(*value)).collect())
}

fn signature_dictionary() -> Dictionary {
    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Sig".into()));
    dictionary.set("Filter", Object::Name("Adobe.PPKLite".into()));
    dictionary.set("SubFilter", Object::Name("adbe.pkcs7.detached".into()));
    dictionary.set("Contents", Object::String(vec![0x30, 0x82, 0x01, 0x00]));
    dictionary.set("ByteRange", integer_array(&[0, 100, 200, 50]));
    dictionary.set("Name", Object::String(b"Test Signer".to_vec()));
    dictionary.set("M", Object::String(b"D:20240101120000Z".to_vec()));
    dictionary.set("Location", Object::String(b"Brno".to_vec()));
    dictionary.set("Reason", Object::String(b"Approval".to_vec()));
    dictionary.set("ContactInfo", Object::String(b"signer@example.com".to_vec()));
    dictionary.set("R", Object::Integer(2));
    dictionary.set("V", Object::Integer(1));
    dictionary.set("Prop_AuthTime", Object::Integer(30));
    dictionary.set("Prop_AuthType", Object::Name("PIN".into()));
    dictionary
}

#[test]
fn parses_full_dictionary() {
    let storage = ObjectStorage::new();
    let object = Object::Dictionary(signature_dictionary());

    let signature = Signature::parse(&storage, &object);

    assert_eq!(signature.signature_type(), SignatureType::Sig);
    assert_eq!(signature.filter(), b"Adobe.PPKLite");
    assert_eq!(signature.subfilter(), b"adbe.pkcs7.detached");
    assert_eq!(signature.contents(), &[0x30, 0x82, 0x01, 0x00]);
    assert_eq!(signature.byte_ranges().len(), 2);
    assert_eq!(signature.byte_ranges()[0].offset, 0);
    assert_eq!(signature.byte_ranges()[0].length, 100);
    assert_eq!(signature.byte_ranges()[1].offset, 200);
    assert_eq!(signature.byte_ranges()[1].length, 50);
    assert_eq!(signature.name(), "Test Signer");
    assert_eq!(
        signature.signing_datetime(),
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
    );
    assert_eq!(signature.location(), "Brno");
    assert_eq!(signature.reason(), "Approval");
    assert_eq!(signature.contact_info(), "signer@example.com");
    assert_eq!(signature.r(), 2);
    assert_eq!(signature.v(), 1);
    assert_eq!(signature.prop_time(), 30);
    assert_eq!(signature.prop_type(), AuthentificationType::PIN);
    assert!(signature.certificates().is_none());
}

#[test]
fn empty_dictionary_produces_defaults() {
    let storage = ObjectStorage::new();
    let object = Object::Dictionary(Dictionary::new());

    let signature = Signature::parse(&storage, &object);

    assert_eq!(signature.signature_type(), SignatureType::Sig);
    assert!(signature.subfilter().is_empty());
    assert!(signature.contents().is_empty());
    assert!(signature.byte_ranges().is_empty());
    assert_eq!(signature.prop_type(), AuthentificationType::Invalid);
    assert_eq!(signature.signing_datetime(), None);
    assert_eq!(signature.r(), 0);
}

#[test]
fn non_dictionary_produces_defaults() {
    let storage = ObjectStorage::new();

    let signature = Signature::parse(&storage, &Object::Integer(5));

    assert_eq!(signature, Signature::default());
}

#[test]
fn unknown_type_falls_back_to_sig() {
    let storage = ObjectStorage::new();
    let mut dictionary = signature_dictionary();
    dictionary.set("Type", Object::Name("Frobnicate".into()));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.signature_type(), SignatureType::Sig);
}

#[test]
fn doc_time_stamp_type_is_recognized() {
    let storage = ObjectStorage::new();
    let mut dictionary = signature_dictionary();
    dictionary.set("Type", Object::Name("DocTimeStamp".into()));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.signature_type(), SignatureType::DocTimeStamp);
}

#[test]
fn odd_byte_range_array_drops_trailing_element() {
    let storage = ObjectStorage::new();
    let mut dictionary = signature_dictionary();
    dictionary.set("ByteRange", integer_array(&[0, 100, 200]));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.byte_ranges().len(), 1);
    assert_eq!(signature.byte_ranges()[0].length, 100);
}

#[test]
fn cert_entry_accepts_string_and_array() {
    let storage = ObjectStorage::new();

    let mut dictionary = signature_dictionary();
    dictionary.set("Cert", Object::String(b"leaf".to_vec()));
    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));
    assert_eq!(signature.certificates(), Some(&vec![b"leaf".to_vec()]));

    let mut dictionary = signature_dictionary();
    dictionary.set(
        "Cert",
        Object::Array(vec![
            Object::String(b"leaf".to_vec()),
            Object::String(b"root".to_vec()),
        ]),
    );
    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));
    assert_eq!(
        signature.certificates(),
        Some(&vec![b"leaf".to_vec(), b"root".to_vec()])
    );
}

#[test]
fn indirect_references_are_resolved() {
    let mut storage = ObjectStorage::new();
    let contents_reference = ObjectRef::new(12, 0);
    storage.insert(contents_reference, Object::String(vec![1, 2, 3]));

    let mut dictionary = signature_dictionary();
    dictionary.set("Contents", Object::Reference(contents_reference));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.contents(), &[1, 2, 3]);
}

#[test]
fn references_and_changes_are_parsed() {
    let storage = ObjectStorage::new();
    let mut reference_dictionary = Dictionary::new();
    reference_dictionary.set("TransformMethod", Object::Name("DocMDP".into()));
    reference_dictionary.set("DigestMethod", Object::Name("SHA256".into()));

    let mut dictionary = signature_dictionary();
    dictionary.set(
        "References",
        Object::Array(vec![Object::Dictionary(reference_dictionary)]),
    );
    dictionary.set("Changes", integer_array(&[4, 1, 2]));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.references().len(), 1);
    assert_eq!(
        signature.references()[0].transform_method(),
        TransformMethod::DocMDP
    );
    assert_eq!(signature.references()[0].digest_method(), b"SHA256");
    assert_eq!(signature.changes(), Some(&[4, 1, 2]));
}

#[test]
fn unknown_transform_method_is_invalid() {
    let storage = ObjectStorage::new();
    let mut reference_dictionary = Dictionary::new();
    reference_dictionary.set("TransformMethod", Object::Name("docmdp".into()));

    let mut dictionary = signature_dictionary();
    dictionary.set(
        "References",
        Object::Array(vec![Object::Dictionary(reference_dictionary)]),
    );

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    // The lookup is case sensitive.
    assert_eq!(
        signature.references()[0].transform_method(),
        TransformMethod::Invalid
    );
}

#[test]
fn pdf_date_with_timezone_offset() {
    let storage = ObjectStorage::new();
    let mut dictionary = signature_dictionary();
    dictionary.set("M", Object::String(b"D:20240101120000+02'00'".to_vec()));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(
        signature.signing_datetime(),
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
    );
}

#[test]
fn malformed_date_is_none() {
    let storage = ObjectStorage::new();
    let mut dictionary = signature_dictionary();
    dictionary.set("M", Object::String(b"yesterday".to_vec()));

    let signature = Signature::parse(&storage, &Object::Dictionary(dictionary));

    assert_eq!(signature.signing_datetime(), None);
}
