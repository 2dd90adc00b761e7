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

//! Reconstruction of the signed byte stream from a signature's byte ranges,
//! with a coverage report over the whole file.

use log::debug;

use crate::{signature::Signature, verify::result::VerificationResult};

/// Set of closed intervals over file offsets, kept normalized: sorted and
/// with overlapping-or-adjacent intervals merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ClosedIntervalSet {
    intervals: Vec<(i64, i64)>,
}

impl ClosedIntervalSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add the closed interval `[low, high]`.
    pub(crate) fn add_interval(&mut self, low: i64, high: i64) {
        self.intervals.push((low, high));
        self.normalize();
    }

    /// Returns true when `[low, high]` is fully covered and nothing outside
    /// it is.
    pub(crate) fn is_covered(&self, low: i64, high: i64) -> bool {
        let mut temporary = ClosedIntervalSet::new();
        temporary.add_interval(low, high);
        *self == temporary
    }

    /// Total number of covered offsets.
    pub(crate) fn total_length(&self) -> i64 {
        self.intervals
            .iter()
            .map(|(low, high)| high - low + 1)
            .sum()
    }

    fn normalize(&mut self) {
        self.intervals.sort_unstable();

        let mut intervals = Vec::with_capacity(self.intervals.len());
        let mut iterator = self.intervals.iter().copied();

        if let Some(mut current) = iterator.next() {
            for interval in iterator {
                if Self::overlaps_or_adjacent(current, interval) {
                    current = (current.0.min(interval.0), current.1.max(interval.1));
                } else {
                    intervals.push(current);
                    current = interval;
                }
            }
            intervals.push(current);
        }

        self.intervals = intervals;
    }

    fn overlaps_or_adjacent(a: (i64, i64), b: (i64, i64)) -> bool {
        let (a, b) = if a.0 > b.0 { (b, a) } else { (a, b) };
        // [1, 2] and [3, 4] merge as well, hence the + 1.
        b.0 <= a.1 + 1
    }
}

/// Reconstructed signed content plus the coverage outcome.
#[derive(Debug)]
pub(crate) struct SignedData {
    /// Concatenation of the signed regions, in byte range array order.
    pub(crate) bytes: Vec<u8>,
    /// Number of file bytes outside the covered set; zero when the coverage
    /// is complete.
    #[allow(dead_code)] // reported through the result; kept for callers
    pub(crate) uncovered_byte_count: i64,
}

/// Reconstruct the signed byte stream of `signature` out of `source_data`.
///
/// Hard failures (ranges not within the file) record
/// `Error_Signature_DataCoveredBySignatureMissing` and return `None`.
/// Incomplete coverage of the file is legitimate after incremental updates
/// and only records a `NotCoveredBytes` warning with the uncovered count.
pub(crate) fn get_signed_data(
    source_data: &[u8],
    signature: &Signature,
    result: &mut VerificationResult,
) -> Option<SignedData> {
    let source_size = source_data.len() as i64;

    let total_size: i64 = signature
        .byte_ranges()
        .iter()
        .map(|byte_range| byte_range.length)
        .sum();
    if total_size > source_size {
        result.add_signature_data_covered_by_signature_missing_error();
        return None;
    }

    let mut covered = ClosedIntervalSet::new();
    let mut bytes = Vec::with_capacity(total_size.max(0) as usize);

    for byte_range in signature.byte_ranges() {
        let start_offset = byte_range.offset;
        let end_offset = byte_range.end();

        if start_offset == end_offset {
            // Zero byte range.
            continue;
        }

        if start_offset > end_offset
            || start_offset < 0
            || end_offset < 0
            || start_offset >= source_size
            || end_offset > source_size
        {
            result.add_signature_data_covered_by_signature_missing_error();
            return None;
        }

        bytes.extend_from_slice(&source_data[start_offset as usize..end_offset as usize]);
        covered.add_interval(start_offset, end_offset - 1);
    }

    // The hex-encoded contents string is the gap between the byte ranges.
    // We look for its first occurrence only; a second one would mean the
    // signature covers itself.
    let contents = signature.contents();
    if !contents.is_empty() {
        let lower = hex::encode(contents);
        let index = find_subslice(source_data, lower.as_bytes())
            .or_else(|| find_subslice(source_data, hex::encode_upper(contents).as_bytes()));

        if let Some(index) = index {
            let mut first_byte_index = index as i64;
            let mut last_byte_index = (index + lower.len() - 1) as i64;

            if first_byte_index > 0 && source_data[first_byte_index as usize - 1] == b'<' {
                first_byte_index -= 1;
            }
            if last_byte_index + 1 < source_size && source_data[last_byte_index as usize + 1] == b'>'
            {
                last_byte_index += 1;
            }
            covered.add_interval(first_byte_index, last_byte_index);
        }
    }

    let mut uncovered_byte_count = 0;
    if source_size > 0 && !covered.is_covered(0, source_size - 1) {
        uncovered_byte_count = source_size - covered.total_length();
        result.add_signature_not_covered_bytes_warning(uncovered_byte_count);
    }

    debug!(
        "assembled {} signed bytes, {} not covered",
        bytes.len(),
        uncovered_byte_count
    );

    Some(SignedData {
        bytes,
        uncovered_byte_count,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
