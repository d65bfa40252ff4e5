//! Gerber (RS-274X) commands
//!
//! Each command serialises with its Gerber command code under
//! `command_code`, and renders to Gerber text with
//! [`GerberCommand::to_gerber_string`]. Coordinates use the `4.6` format
//! declared by [`GerberCommand::FormatSpecification`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal digits of every coordinate (`%FSLAX46Y46*%`)
pub const COORDINATE_DECIMALS: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GerberUnit {
    Mm,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Dark,
    Clear,
}

/// Shape of a standard aperture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "standard_template_code")]
pub enum ApertureTemplateConfig {
    #[serde(rename = "C")]
    Circle { diameter: f64 },
    #[serde(rename = "R")]
    Rectangle { x_size: f64, y_size: f64 },
}

impl fmt::Display for ApertureTemplateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApertureTemplateConfig::Circle { diameter } => {
                write!(f, "C,{}", format_decimal(*diameter))
            }
            ApertureTemplateConfig::Rectangle { x_size, y_size } => write!(
                f,
                "R,{}X{}",
                format_decimal(*x_size),
                format_decimal(*y_size)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command_code")]
pub enum GerberCommand {
    #[serde(rename = "FS")]
    FormatSpecification,
    #[serde(rename = "MO")]
    SetUnit { unit: GerberUnit },
    #[serde(rename = "G04")]
    Comment { comment: String },
    #[serde(rename = "LP")]
    SetLayerPolarity { polarity: Polarity },
    #[serde(rename = "TF")]
    AddFileAttribute {
        attribute_name: String,
        attribute_value: Vec<String>,
    },
    #[serde(rename = "TA")]
    AddApertureAttribute {
        attribute_name: String,
        attribute_value: Vec<String>,
    },
    /// Deletes one attribute, or every aperture attribute when unnamed
    #[serde(rename = "TD")]
    DeleteAttribute { attribute_name: Option<String> },
    #[serde(rename = "ADD")]
    DefineApertureTemplate {
        aperture_number: u32,
        #[serde(flatten)]
        template: ApertureTemplateConfig,
    },
    #[serde(rename = "D")]
    SelectAperture { aperture_number: u32 },
    #[serde(rename = "G01")]
    SetLinearInterpolation,
    #[serde(rename = "D02")]
    MoveOperation { x: f64, y: f64 },
    #[serde(rename = "D01")]
    PlotOperation { x: f64, y: f64 },
    #[serde(rename = "D03")]
    FlashOperation { x: f64, y: f64 },
    #[serde(rename = "G36")]
    StartRegion,
    #[serde(rename = "G37")]
    EndRegion,
    #[serde(rename = "M02")]
    EndOfFile,
}

impl GerberCommand {
    pub fn comment(comment: impl Into<String>) -> Self {
        GerberCommand::Comment {
            comment: comment.into(),
        }
    }

    pub fn command_code(&self) -> &'static str {
        match self {
            GerberCommand::FormatSpecification => "FS",
            GerberCommand::SetUnit { .. } => "MO",
            GerberCommand::Comment { .. } => "G04",
            GerberCommand::SetLayerPolarity { .. } => "LP",
            GerberCommand::AddFileAttribute { .. } => "TF",
            GerberCommand::AddApertureAttribute { .. } => "TA",
            GerberCommand::DeleteAttribute { .. } => "TD",
            GerberCommand::DefineApertureTemplate { .. } => "ADD",
            GerberCommand::SelectAperture { .. } => "D",
            GerberCommand::SetLinearInterpolation => "G01",
            GerberCommand::MoveOperation { .. } => "D02",
            GerberCommand::PlotOperation { .. } => "D01",
            GerberCommand::FlashOperation { .. } => "D03",
            GerberCommand::StartRegion => "G36",
            GerberCommand::EndRegion => "G37",
            GerberCommand::EndOfFile => "M02",
        }
    }

    pub fn to_gerber_string(&self) -> String {
        match self {
            GerberCommand::FormatSpecification => "%FSLAX46Y46*%".to_string(),
            GerberCommand::SetUnit { unit } => match unit {
                GerberUnit::Mm => "%MOMM*%".to_string(),
                GerberUnit::In => "%MOIN*%".to_string(),
            },
            GerberCommand::Comment { comment } => format!("G04 {}*", comment),
            GerberCommand::SetLayerPolarity { polarity } => match polarity {
                Polarity::Dark => "%LPD*%".to_string(),
                Polarity::Clear => "%LPC*%".to_string(),
            },
            GerberCommand::AddFileAttribute {
                attribute_name,
                attribute_value,
            } => format!("%TF.{},{}*%", attribute_name, attribute_value.join(",")),
            GerberCommand::AddApertureAttribute {
                attribute_name,
                attribute_value,
            } => format!("%TA.{},{}*%", attribute_name, attribute_value.join(",")),
            GerberCommand::DeleteAttribute { attribute_name } => match attribute_name {
                Some(name) => format!("%TD.{}*%", name),
                None => "%TD*%".to_string(),
            },
            GerberCommand::DefineApertureTemplate {
                aperture_number,
                template,
            } => format!("%ADD{}{}*%", aperture_number, template),
            GerberCommand::SelectAperture { aperture_number } => format!("D{}*", aperture_number),
            GerberCommand::SetLinearInterpolation => "G01*".to_string(),
            GerberCommand::MoveOperation { x, y } => format!("X{}Y{}D02*", coord(*x), coord(*y)),
            GerberCommand::PlotOperation { x, y } => format!("X{}Y{}D01*", coord(*x), coord(*y)),
            GerberCommand::FlashOperation { x, y } => format!("X{}Y{}D03*", coord(*x), coord(*y)),
            GerberCommand::StartRegion => "G36*".to_string(),
            GerberCommand::EndRegion => "G37*".to_string(),
            GerberCommand::EndOfFile => "M02*".to_string(),
        }
    }
}

/// Fixed-point coordinate in units of 10^-6
fn coord(value: f64) -> i64 {
    (value * 10f64.powi(COORDINATE_DECIMALS)).round() as i64
}

/// Up to six decimals, trailing zeros trimmed
fn format_decimal(value: f64) -> String {
    let s = format!("{:.6}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
