//! Input helper domains
//!
//! Helpers are the user-editable `input_*` entities. Which domains count as
//! helpers is fixed here; everything else in the agent filters and validates
//! against this list.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::entity_id::domain_of;
use crate::EntityState;

/// A helper domain accepted by the create endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperType {
    /// Toggle/switch
    InputBoolean,
    /// Text input
    InputText,
    /// Number slider or box
    InputNumber,
    /// Date and/or time picker
    InputDatetime,
    /// Dropdown selection
    InputSelect,
}

/// Rejected helper type, carrying the offending value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid helper type. Must be one of: {}", HelperType::valid_list())]
pub struct InvalidHelperType(pub String);

impl HelperType {
    /// All helper domains, in the order they are reported to clients
    pub const ALL: [HelperType; 5] = [
        HelperType::InputBoolean,
        HelperType::InputText,
        HelperType::InputNumber,
        HelperType::InputDatetime,
        HelperType::InputSelect,
    ];

    /// The Home Assistant domain for this helper
    pub fn domain(self) -> &'static str {
        match self {
            HelperType::InputBoolean => "input_boolean",
            HelperType::InputText => "input_text",
            HelperType::InputNumber => "input_number",
            HelperType::InputDatetime => "input_datetime",
            HelperType::InputSelect => "input_select",
        }
    }

    /// Helper type of an entity id, if its domain is a helper domain.
    ///
    /// An id only matches when the domain is followed by a `.`, so
    /// `input_boolean` alone or `input_booleanx.y` are not helpers.
    pub fn from_entity_id(entity_id: &str) -> Option<Self> {
        let domain = domain_of(entity_id);
        if domain.len() == entity_id.len() {
            return None;
        }
        domain.parse().ok()
    }

    fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.domain())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for HelperType {
    type Err = InvalidHelperType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.domain() == s)
            .ok_or_else(|| InvalidHelperType(s.to_string()))
    }
}

impl fmt::Display for HelperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain())
    }
}

/// Check whether a state belongs to one of the helper domains
pub fn is_helper_entity(state: &EntityState) -> bool {
    HelperType::from_entity_id(&state.entity_id).is_some()
}
