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

//! OID constants used during extraction and verification.

#![allow(dead_code)] // Usage varies by engine.

use x509_parser::{der_parser::oid, oid_registry::Oid};

// Digest algorithms.
pub(crate) const MD5_OID: Oid<'static> = oid!(1.2.840 .113549 .2 .5);
pub(crate) const SHA1_OID: Oid<'static> = oid!(1.3.14 .3 .2 .26);
pub(crate) const SHA224_OID: Oid<'static> = oid!(2.16.840 .1 .101 .3 .4 .2 .4);
pub(crate) const SHA256_OID: Oid<'static> = oid!(2.16.840 .1 .101 .3 .4 .2 .1);
pub(crate) const SHA384_OID: Oid<'static> = oid!(2.16.840 .1 .101 .3 .4 .2 .2);
pub(crate) const SHA512_OID: Oid<'static> = oid!(2.16.840 .1 .101 .3 .4 .2 .3);

// Subject public key algorithms.
pub(crate) const RSA_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .1 .1);
pub(crate) const DSA_OID: Oid<'static> = oid!(1.2.840 .10040 .4 .1);
pub(crate) const DH_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .3 .1);
pub(crate) const EC_PUBLICKEY_OID: Oid<'static> = oid!(1.2.840 .10045 .2 .1);

// Distinguished name attributes (RFC 5280, section 4.1.2.4).
pub(crate) const COMMON_NAME_OID: Oid<'static> = oid!(2.5.4 .3);
pub(crate) const SURNAME_OID: Oid<'static> = oid!(2.5.4 .4);
pub(crate) const SERIAL_NUMBER_OID: Oid<'static> = oid!(2.5.4 .5);
pub(crate) const COUNTRY_NAME_OID: Oid<'static> = oid!(2.5.4 .6);
pub(crate) const LOCALITY_NAME_OID: Oid<'static> = oid!(2.5.4 .7);
pub(crate) const STATE_OR_PROVINCE_NAME_OID: Oid<'static> = oid!(2.5.4 .8);
pub(crate) const ORGANIZATION_NAME_OID: Oid<'static> = oid!(2.5.4 .10);
pub(crate) const ORGANIZATIONAL_UNIT_NAME_OID: Oid<'static> = oid!(2.5.4 .11);
pub(crate) const TITLE_OID: Oid<'static> = oid!(2.5.4 .12);
pub(crate) const GIVEN_NAME_OID: Oid<'static> = oid!(2.5.4 .42);
pub(crate) const INITIALS_OID: Oid<'static> = oid!(2.5.4 .43);
pub(crate) const GENERATION_QUALIFIER_OID: Oid<'static> = oid!(2.5.4 .44);
pub(crate) const DISTINGUISHED_NAME_OID: Oid<'static> = oid!(2.5.4 .49);
pub(crate) const PSEUDONYM_OID: Oid<'static> = oid!(2.5.4 .65);
pub(crate) const EMAIL_OID: Oid<'static> = oid!(1.2.840 .113549 .1 .9 .1);
