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

//! Length-tagged binary stream used to persist certificate metadata and the
//! trust store.
//!
//! The stream is positional: fields are written in a fixed order, big endian,
//! byte strings prefixed with a `u32` length. Every record starts with an
//! integer format version which readers skip, so any version value is
//! tolerated as long as the field order holds.

use crate::error::{Error, Result};

/// Current format version written by [`StreamWriter`] users.
pub(crate) const PERSIST_VERSION: i32 = 1;

#[derive(Debug, Default)]
pub(crate) struct StreamWriter {
    buffer: Vec<u8>,
}

impl StreamWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_bytes(&mut self, value: &[u8]) {
        self.write_u32(value.len() as u32);
        self.buffer.extend_from_slice(value);
    }

    pub(crate) fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

#[derive(Debug)]
pub(crate) struct StreamReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> StreamReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| Error::PersistMalformed("stream ended prematurely".into()))?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(raw))
    }

    pub(crate) fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let length = self.read_u32()? as usize;
        Ok(self.take(length)?.to_vec())
    }

    pub(crate) fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes)
            .map_err(|_| Error::PersistMalformed("string is not valid UTF-8".into()))
    }
}
