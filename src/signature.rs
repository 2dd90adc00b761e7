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

//! Signature dictionary parsing.
//!
//! Every field of a signature dictionary is optional from the parser's point
//! of view: unknown or malformed entries fall back to defaults, and a fully
//! empty dictionary still produces a [`Signature`] that the verification
//! engines reject cleanly later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::object_model::{Loader, Object, ObjectStorage};

/// Type of a signature dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureType {
    /// Ordinary signature.
    #[default]
    Sig,
    /// Document time stamp (RFC 3161 token); verified with the same PKCS#7
    /// pipeline as ordinary signatures.
    DocTimeStamp,
}

/// Authentication used when the signature was created (`Prop_AuthType`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthentificationType {
    /// Personal identification number.
    PIN,
    /// Password.
    Password,
    /// Fingerprint.
    Fingerprint,
    /// Missing or unrecognized value.
    #[default]
    Invalid,
}

/// Transform method of a signature reference dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformMethod {
    /// Document modification detection and prevention.
    DocMDP,
    /// Usage rights.
    UR,
    /// Form field modification detection.
    FieldMDP,
    /// Missing or unrecognized value.
    #[default]
    Invalid,
}

/// One signed region of the file: `length` bytes starting at `offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange {
    /// Offset of the first signed byte.
    pub offset: i64,
    /// Number of signed bytes.
    pub length: i64,
}

impl ByteRange {
    /// Offset of the byte following the last signed byte.
    pub fn end(&self) -> i64 {
        self.offset + self.length
    }
}

/// Signature reference dictionary (`References` array element).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignatureReference {
    transform_method: TransformMethod,
    transform_params: Object,
    data: Object,
    digest_method: Vec<u8>,
}

impl SignatureReference {
    /// Parse a signature reference dictionary.
    pub fn parse(storage: &ObjectStorage, object: &Object) -> Self {
        let mut result = SignatureReference::default();

        if let Some(dictionary) = storage.get_dictionary_from_object(object) {
            let loader = Loader::new(storage);

            const TRANSFORM_METHODS: [(&str, TransformMethod); 3] = [
                ("DocMDP", TransformMethod::DocMDP),
                ("UR", TransformMethod::UR),
                ("FieldMDP", TransformMethod::FieldMDP),
            ];

            result.transform_method = loader.read_enum_by_name(
                dictionary.get("TransformMethod"),
                &TRANSFORM_METHODS,
                TransformMethod::Invalid,
            );
            result.transform_params = dictionary.get("TransformParams").clone();
            result.data = dictionary.get("Data").clone();
            result.digest_method = loader.read_name_from_dictionary(dictionary, "DigestMethod");
        }

        result
    }

    /// Transform method of this reference.
    pub fn transform_method(&self) -> TransformMethod {
        self.transform_method
    }

    /// Transform parameters dictionary, [`Object::Null`] when absent.
    pub fn transform_params(&self) -> &Object {
        &self.transform_params
    }

    /// Reference to the transformed data, [`Object::Null`] when absent.
    pub fn data(&self) -> &Object {
        &self.data
    }

    /// Digest method name, empty if absent.
    pub fn digest_method(&self) -> &[u8] {
        &self.digest_method
    }
}

/// Decoded signature dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    signature_type: SignatureType,
    filter: Vec<u8>,
    subfilter: Vec<u8>,
    contents: Vec<u8>,
    certificates: Option<Vec<Vec<u8>>>,
    byte_ranges: Vec<ByteRange>,
    references: Vec<SignatureReference>,
    changes: Option<[i64; 3]>,
    name: String,
    signing_datetime: Option<DateTime<Utc>>,
    location: String,
    reason: String,
    contact_info: String,
    r: i64,
    v: i64,
    prop_build: Object,
    prop_time: i64,
    prop_type: AuthentificationType,
}

impl Signature {
    /// Parse a signature dictionary into a [`Signature`] record.
    pub fn parse(storage: &ObjectStorage, object: &Object) -> Self {
        let mut result = Signature::default();

        let Some(dictionary) = storage.get_dictionary_from_object(object) else {
            return result;
        };
        let loader = Loader::new(storage);

        const TYPES: [(&str, SignatureType); 2] = [
            ("Sig", SignatureType::Sig),
            ("DocTimeStamp", SignatureType::DocTimeStamp),
        ];
        result.signature_type =
            loader.read_enum_by_name(dictionary.get("Type"), &TYPES, SignatureType::Sig);
        result.filter = loader.read_name_from_dictionary(dictionary, "Filter");
        result.subfilter = loader.read_name_from_dictionary(dictionary, "SubFilter");
        result.contents = loader.read_string_from_dictionary(dictionary, "Contents");

        if dictionary.has_key("Cert") {
            let certificates = storage.get_object(dictionary.get("Cert"));
            if certificates.is_string() {
                result.certificates = Some(vec![loader.read_string(certificates)]);
            } else if certificates.is_array() {
                result.certificates = Some(loader.read_string_array(certificates));
            }
        }

        // Pairs are laid out flat: [offset, length, offset, length, …]. An
        // odd trailing element is dropped.
        let byte_ranges_array = loader.read_integer_array_from_dictionary(dictionary, "ByteRange");
        let byte_range_count = byte_ranges_array.len() / 2;
        result.byte_ranges.reserve(byte_range_count);
        for i in 0..byte_range_count {
            result.byte_ranges.push(ByteRange {
                offset: byte_ranges_array[2 * i],
                length: byte_ranges_array[2 * i + 1],
            });
        }

        result.references =
            loader.read_object_list(dictionary.get("References"), |storage, object| {
                SignatureReference::parse(storage, object)
            });

        let changes = loader.read_integer_array_from_dictionary(dictionary, "Changes");
        if changes.len() == 3 {
            result.changes = Some([changes[0], changes[1], changes[2]]);
        }

        result.name = loader.read_text_string_from_dictionary(dictionary, "Name", "");
        result.signing_datetime =
            parse_pdf_datetime(&loader.read_string_from_dictionary(dictionary, "M"));
        result.location = loader.read_text_string_from_dictionary(dictionary, "Location", "");
        result.reason = loader.read_text_string_from_dictionary(dictionary, "Reason", "");
        result.contact_info =
            loader.read_text_string_from_dictionary(dictionary, "ContactInfo", "");
        result.r = loader.read_integer_from_dictionary(dictionary, "R", 0);
        result.v = loader.read_integer_from_dictionary(dictionary, "V", 0);
        result.prop_build = dictionary.get("Prop_Build").clone();
        result.prop_time = loader.read_integer_from_dictionary(dictionary, "Prop_AuthTime", 0);

        const AUTHENTIFICATION_TYPES: [(&str, AuthentificationType); 3] = [
            ("PIN", AuthentificationType::PIN),
            ("Password", AuthentificationType::Password),
            ("Fingerprint", AuthentificationType::Fingerprint),
        ];
        result.prop_type = loader.read_enum_by_name(
            dictionary.get("Prop_AuthType"),
            &AUTHENTIFICATION_TYPES,
            AuthentificationType::Invalid,
        );

        result
    }

    /// Signature type (`Sig` by default).
    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    /// Handler family (`Filter`).
    pub fn filter(&self) -> &[u8] {
        &self.filter
    }

    /// Encoding variant (`SubFilter`), selects the verification engine.
    pub fn subfilter(&self) -> &[u8] {
        &self.subfilter
    }

    /// Raw binary signature blob (hex-decoded `Contents`).
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// DER certificates of the legacy `adbe.x509.rsa_sha1` variant, leaf
    /// first. `None` for PKCS#7 variants, which embed certificates inside
    /// [`contents`](Self::contents).
    pub fn certificates(&self) -> Option<&Vec<Vec<u8>>> {
        self.certificates.as_ref()
    }

    /// Signed regions of the file, in array order.
    pub fn byte_ranges(&self) -> &[ByteRange] {
        &self.byte_ranges
    }

    /// Signature reference dictionaries.
    pub fn references(&self) -> &[SignatureReference] {
        &self.references
    }

    /// `Changes` triple (object count, pages added, fields added/updated).
    pub fn changes(&self) -> Option<&[i64; 3]> {
        self.changes.as_ref()
    }

    /// Signer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Claimed signing time, parsed from the `M` date string.
    pub fn signing_datetime(&self) -> Option<DateTime<Utc>> {
        self.signing_datetime
    }

    /// Signing location.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Signing reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Signer contact information.
    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    /// Handler revision (`R`).
    pub fn r(&self) -> i64 {
        self.r
    }

    /// Signature dictionary format version (`V`).
    pub fn v(&self) -> i64 {
        self.v
    }

    /// Opaque build properties dictionary (`Prop_Build`).
    pub fn prop_build(&self) -> &Object {
        &self.prop_build
    }

    /// Authentication time (`Prop_AuthTime`).
    pub fn prop_time(&self) -> i64 {
        self.prop_time
    }

    /// Authentication type (`Prop_AuthType`).
    pub fn prop_type(&self) -> AuthentificationType {
        self.prop_type
    }

    #[cfg(test)]
    pub(crate) fn for_test(
        subfilter: &[u8],
        contents: Vec<u8>,
        certificates: Option<Vec<Vec<u8>>>,
        byte_ranges: Vec<ByteRange>,
    ) -> Self {
        Signature {
            subfilter: subfilter.to_vec(),
            contents,
            certificates,
            byte_ranges,
            ..Signature::default()
        }
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS` with optional timezone
/// suffix `Z`, `+HH'mm'` or `-HH'mm'`) into a UTC timestamp.
///
/// Components after the year are optional and default to the start of their
/// range, matching how viewers treat truncated date strings.
pub(crate) fn parse_pdf_datetime(data: &[u8]) -> Option<DateTime<Utc>> {
    let text = std::str::from_utf8(data).ok()?;
    let text = text.trim().strip_prefix("D:").unwrap_or(text.trim());

    let digits = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        if text.len() >= range.end {
            text.get(range)?.parse().ok()
        } else {
            Some(default)
        }
    };

    let year: i32 = text.get(0..4)?.parse().ok()?;
    let month = digits(4..6, 1)?;
    let day = digits(6..8, 1)?;
    let hour = digits(8..10, 0)?;
    let minute = digits(10..12, 0)?;
    let second = digits(12..14, 0)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = date.and_hms_opt(hour, minute, second)?;
    let mut timestamp = naive.and_utc().timestamp();

    // Timezone suffix: 'Z', or sign + "HH'mm'".
    if let Some(rest) = text.get(14..) {
        if rest.starts_with('+') || rest.starts_with('-') {
            let sign: i64 = if rest.starts_with('-') { -1 } else { 1 };
            let tz_hour: i64 = rest.get(1..3).and_then(|s| s.parse().ok()).unwrap_or(0);
            let tz_minute: i64 = rest.get(4..6).and_then(|s| s.parse().ok()).unwrap_or(0);
            timestamp -= sign * (tz_hour * 3600 + tz_minute * 60);
        }
    }

    DateTime::from_timestamp(timestamp, 0)
}
