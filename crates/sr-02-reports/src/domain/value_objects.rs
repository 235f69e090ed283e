//! # Value Objects
//!
//! Conditions codes and the situational checklist vocabulary.

use super::errors::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Overall conditions at the reporting location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conditions {
    /// All Stable.
    #[default]
    A,
    /// Moderate Disruptions.
    B,
    /// Severe Disruptions.
    C,
}

impl Conditions {
    /// Single-letter code as persisted.
    pub fn code(self) -> &'static str {
        match self {
            Conditions::A => "A",
            Conditions::B => "B",
            Conditions::C => "C",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Conditions::A => "All Stable",
            Conditions::B => "Moderate Disruptions",
            Conditions::C => "Severe Disruptions",
        }
    }

    /// Whether checklist fields may be recorded.
    pub fn allows_checklist(self) -> bool {
        self != Conditions::A
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Conditions {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Conditions::A),
            "B" | "b" => Ok(Conditions::B),
            "C" | "c" => Ok(Conditions::C),
            other => Err(ReportError::Validation(format!(
                "unknown conditions code '{other}'"
            ))),
        }
    }
}

/// One of the coded checklist questions.
///
/// Codes are advisory: the store accepts any text, these tables only drive
/// prompts and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChecklistField {
    /// Reporter position.
    Position,
    /// Commercial power.
    CommercialPower,
    /// Drinking water.
    Water,
    /// Sanitation.
    Sanitation,
    /// Grid communications.
    GridComms,
    /// Transportation.
    Transportation,
}

impl ChecklistField {
    /// All coded fields in form order.
    pub const ALL: [ChecklistField; 6] = [
        ChecklistField::Position,
        ChecklistField::CommercialPower,
        ChecklistField::Water,
        ChecklistField::Sanitation,
        ChecklistField::GridComms,
        ChecklistField::Transportation,
    ];

    /// Column name.
    pub fn name(self) -> &'static str {
        match self {
            ChecklistField::Position => "position",
            ChecklistField::CommercialPower => "commercial_power",
            ChecklistField::Water => "water",
            ChecklistField::Sanitation => "sanitation",
            ChecklistField::GridComms => "grid_comms",
            ChecklistField::Transportation => "transportation",
        }
    }

    /// Known codes and their labels.
    pub fn options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ChecklistField::Position => &[("H", "Home"), ("M", "Mobile"), ("P", "Portable")],
            ChecklistField::CommercialPower => &[
                ("Y", "Up and Running"),
                ("I", "Intermittent / Brown-outs"),
                ("N", "No, Commercial Power is down"),
            ],
            ChecklistField::Water => &[("Y", "Yes"), ("C", "Contaminated"), ("N", "No")],
            ChecklistField::Sanitation
            | ChecklistField::GridComms
            | ChecklistField::Transportation => &[("Y", "Yes"), ("N", "No")],
        }
    }

    /// Label for a code, if known.
    pub fn label(self, code: &str) -> Option<&'static str> {
        self.options()
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
            .map(|(_, label)| *label)
    }
}
