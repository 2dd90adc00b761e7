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

use crate::ffi_mutex::CryptoLock;

#[test]
fn acquire_released_on_drop() {
    {
        let _lock = CryptoLock::acquire().unwrap();
    }

    // The guard from the block above must be gone or this would deadlock.
    let _lock = CryptoLock::acquire().unwrap();
}
