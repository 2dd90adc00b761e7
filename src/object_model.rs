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

//! Decoded PDF object model, as handed over by the document parser.
//!
//! The object graph parser lives outside this crate; verification only needs
//! already-decoded objects, a storage that resolves indirect references, and
//! a handful of typed readers.

use std::collections::HashMap;

/// Identity of an indirect object within the document.
///
/// Verification only needs this as an opaque handle: it ties a
/// [`VerificationResult`](crate::VerificationResult) back to the signature
/// field dictionary it was produced from, and it keys the lookup table of
/// [`ObjectStorage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number.
    pub number: u32,
    /// Generation number.
    pub generation: u16,
}

impl ObjectRef {
    /// Handle for the object with the given number and generation.
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj {} gen {}", self.number, self.generation)
    }
}

/// A value decoded out of the document's object graph.
///
/// Only the shapes a signature dictionary and its referenced values can
/// take are modeled; content streams never reach this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Absent or explicitly written null.
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// Whole number, as carried by `ByteRange` pairs or revision fields.
    Integer(i64),
    /// Fractional number.
    Real(f64),
    /// Byte string; the hex or literal source form arrives already decoded.
    String(Vec<u8>),
    /// Name token, stored without its leading slash.
    Name(String),
    /// Ordered sequence of values.
    Array(Vec<Object>),
    /// Name-keyed mapping of values.
    Dictionary(Dictionary),
    /// Pointer to an indirect object, resolved through [`ObjectStorage`].
    Reference(ObjectRef),
}

impl Default for Object {
    fn default() -> Self {
        Object::Null
    }
}

impl Object {
    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to a string byte slice.
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to a name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true if the object is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Object::String(_))
    }

    /// Returns true if the object is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Object::Array(_))
    }
}

static NULL_OBJECT: Object = Object::Null;

/// Dictionary of decoded objects keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary(HashMap<String, Object>);

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, returning [`Object::Null`] when absent.
    pub fn get(&self, key: &str) -> &Object {
        self.0.get(key).unwrap_or(&NULL_OBJECT)
    }

    /// Returns true if the dictionary carries the given key.
    pub fn has_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a key-value pair.
    pub fn set(&mut self, key: impl Into<String>, value: Object) {
        self.0.insert(key.into(), value);
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Storage of indirect objects, resolving references to decoded objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectStorage {
    objects: HashMap<ObjectRef, Object>,
}

impl ObjectStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an indirect object.
    pub fn insert(&mut self, reference: ObjectRef, object: Object) {
        self.objects.insert(reference, object);
    }

    /// Resolve an object, following indirect references.
    ///
    /// Unresolvable or cyclic references resolve to [`Object::Null`].
    pub fn get_object<'a>(&'a self, object: &'a Object) -> &'a Object {
        let mut current = object;
        // Reference chains in well-formed files are short; the bound guards
        // against reference cycles.
        for _ in 0..32 {
            match current {
                Object::Reference(r) => match self.objects.get(r) {
                    Some(resolved) => current = resolved,
                    None => return &NULL_OBJECT,
                },
                other => return other,
            }
        }
        &NULL_OBJECT
    }

    /// Resolve an object and view it as a dictionary, if it is one.
    pub fn get_dictionary_from_object<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        match self.get_object(object) {
            Object::Dictionary(dictionary) => Some(dictionary),
            _ => None,
        }
    }
}

/// Typed readers over an [`ObjectStorage`].
///
/// All readers are total: missing or mismatched values produce the provided
/// default instead of failing, which is what the signature dictionary parser
/// relies on.
pub struct Loader<'a> {
    storage: &'a ObjectStorage,
}

impl<'a> Loader<'a> {
    /// Create a loader over the given storage.
    pub fn new(storage: &'a ObjectStorage) -> Self {
        Self { storage }
    }

    /// Read a name from a dictionary entry as raw bytes.
    pub fn read_name_from_dictionary(&self, dictionary: &Dictionary, key: &str) -> Vec<u8> {
        match self.storage.get_object(dictionary.get(key)) {
            Object::Name(name) => name.clone().into_bytes(),
            _ => Vec::new(),
        }
    }

    /// Read a binary string from a dictionary entry.
    pub fn read_string_from_dictionary(&self, dictionary: &Dictionary, key: &str) -> Vec<u8> {
        match self.storage.get_object(dictionary.get(key)) {
            Object::String(string) => string.clone(),
            _ => Vec::new(),
        }
    }

    /// Read a binary string from an already-resolved object.
    pub fn read_string(&self, object: &Object) -> Vec<u8> {
        match self.storage.get_object(object) {
            Object::String(string) => string.clone(),
            _ => Vec::new(),
        }
    }

    /// Read a text string from a dictionary entry, decoding as UTF-8.
    pub fn read_text_string_from_dictionary(
        &self,
        dictionary: &Dictionary,
        key: &str,
        default: &str,
    ) -> String {
        match self.storage.get_object(dictionary.get(key)) {
            Object::String(string) => String::from_utf8_lossy(string).into_owned(),
            _ => default.to_owned(),
        }
    }

    /// Read an integer from a dictionary entry.
    pub fn read_integer_from_dictionary(
        &self,
        dictionary: &Dictionary,
        key: &str,
        default: i64,
    ) -> i64 {
        self.storage
            .get_object(dictionary.get(key))
            .as_integer()
            .unwrap_or(default)
    }

    /// Read an array of integers from a dictionary entry; non-integer
    /// elements are skipped.
    pub fn read_integer_array_from_dictionary(
        &self,
        dictionary: &Dictionary,
        key: &str,
    ) -> Vec<i64> {
        match self.storage.get_object(dictionary.get(key)) {
            Object::Array(array) => array
                .iter()
                .filter_map(|item| self.storage.get_object(item).as_integer())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Read an array of binary strings from an already-resolved object.
    pub fn read_string_array(&self, object: &Object) -> Vec<Vec<u8>> {
        match self.storage.get_object(object) {
            Object::Array(array) => array
                .iter()
                .map(|item| self.read_string(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve an enum value by case-sensitive name lookup against a closed
    /// table, falling back to `default` for missing or unknown names.
    pub fn read_enum_by_name<E: Copy>(
        &self,
        object: &Object,
        table: &[(&str, E)],
        default: E,
    ) -> E {
        match self.storage.get_object(object).as_name() {
            Some(name) => table
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .unwrap_or(default),
            None => default,
        }
    }

    /// Read a list of objects, applying `parse` to every array element.
    ///
    /// A non-array value produces an empty list.
    pub fn read_object_list<T>(
        &self,
        object: &Object,
        parse: impl Fn(&ObjectStorage, &Object) -> T,
    ) -> Vec<T> {
        match self.storage.get_object(object) {
            Object::Array(array) => array
                .iter()
                .map(|item| parse(self.storage, item))
                .collect(),
            _ => Vec::new(),
        }
    }
}
