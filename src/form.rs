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

//! Interactive form view, as handed over by the document parser.
//!
//! Only the parts verification needs: form type, the field tree, and the
//! signature payload of signature fields.

use crate::{object_model::ObjectRef, signature::Signature};

/// Kind of interactive form present in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormType {
    /// No form.
    #[default]
    None,
    /// AcroForm.
    AcroForm,
    /// XFA form.
    XfaForm,
}

/// Form field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Push button, check box or radio button.
    Button,
    /// Text field.
    Text,
    /// Combo box or list box.
    Choice,
    /// Signature field.
    Signature,
}

/// A node of the form field tree.
#[derive(Debug, Clone)]
pub struct FormField {
    field_type: FieldType,
    self_reference: ObjectRef,
    qualified_name: String,
    signature: Option<Signature>,
    children: Vec<FormField>,
}

impl FormField {
    /// Create a non-signature field.
    pub fn new(field_type: FieldType, self_reference: ObjectRef, qualified_name: String) -> Self {
        FormField {
            field_type,
            self_reference,
            qualified_name,
            signature: None,
            children: Vec::new(),
        }
    }

    /// Create a signature field carrying a decoded [`Signature`].
    pub fn new_signature(
        self_reference: ObjectRef,
        qualified_name: String,
        signature: Signature,
    ) -> Self {
        FormField {
            field_type: FieldType::Signature,
            self_reference,
            qualified_name,
            signature: Some(signature),
            children: Vec::new(),
        }
    }

    /// Append a child field.
    pub fn add_child(&mut self, child: FormField) {
        self.children.push(child);
    }

    /// Field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Reference of the field's own dictionary.
    pub fn self_reference(&self) -> ObjectRef {
        self.self_reference
    }

    /// Fully qualified field name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The decoded signature of a signature field. A signature field with an
    /// absent `V` entry carries an empty default [`Signature`].
    pub fn signature(&self) -> Signature {
        self.signature.clone().unwrap_or_default()
    }

    /// Child fields.
    pub fn children(&self) -> &[FormField] {
        &self.children
    }
}

/// Interactive form: the field tree plus the form type.
#[derive(Debug, Clone, Default)]
pub struct Form {
    form_type: FormType,
    fields: Vec<FormField>,
}

impl Form {
    /// Create a form of the given type.
    pub fn new(form_type: FormType) -> Self {
        Form {
            form_type,
            fields: Vec::new(),
        }
    }

    /// Append a root field.
    pub fn add_field(&mut self, field: FormField) {
        self.fields.push(field);
    }

    /// Returns true for AcroForm documents.
    pub fn is_acro_form(&self) -> bool {
        self.form_type == FormType::AcroForm
    }

    /// Returns true for XFA documents.
    pub fn is_xfa_form(&self) -> bool {
        self.form_type == FormType::XfaForm
    }

    /// Visit every field of the tree in depth-first document order.
    pub fn apply(&self, visitor: &mut dyn FnMut(&FormField)) {
        fn walk(fields: &[FormField], visitor: &mut dyn FnMut(&FormField)) {
            for field in fields {
                visitor(field);
                walk(field.children(), visitor);
            }
        }
        walk(&self.fields, visitor);
    }
}
