//! Fill [`Measures`] from spreadsheet or MATLAB tables.
//!
//! Field names are passed explicitly through [`MeasureReadOptions`]; the
//! defaults match the standard entity templates. Decoding the file
//! itself is the job of the [`TableSource`] supplied by the caller.
//!
//! # Layouts
//! - `.mat`: struct `entity.measures` (or bare `measures`) with one array per
//!   variable; hazard intensity comes as separate `a` and `b` arrays.
//! - `.xlsx` / `.xls`: sheet `measures` with one column per variable; hazard
//!   intensity is either a single column (read as `(1, value)`) or two
//!   columns suffixed ` a` and ` b`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Measure, Measures};
use crate::entity::tag::Tag;
use crate::io::{FileFormat, Table, TableSource, ensure_file};
use crate::risk_error::RiskError;

/// Variable names inside the MATLAB `measures` struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatVarNames {
    pub name: String,
    pub color: String,
    pub cost: String,
    pub haz_int_a: String,
    pub haz_int_b: String,
    pub haz_frq: String,
    pub haz_set: String,
    pub mdd_a: String,
    pub mdd_b: String,
    pub paa_a: String,
    pub paa_b: String,
    pub risk_att: String,
    pub risk_cov: String,
}

impl Default for MatVarNames {
    fn default() -> Self {
        Self {
            name: "name".into(),
            color: "color".into(),
            cost: "cost".into(),
            haz_int_a: "hazard_intensity_impact_a".into(),
            haz_int_b: "hazard_intensity_impact_b".into(),
            haz_frq: "hazard_high_frequency_cutoff".into(),
            haz_set: "hazard_event_set".into(),
            mdd_a: "MDD_impact_a".into(),
            mdd_b: "MDD_impact_b".into(),
            paa_a: "PAA_impact_a".into(),
            paa_b: "PAA_impact_b".into(),
            risk_att: "risk_transfer_attachement".into(),
            risk_cov: "risk_transfer_cover".into(),
        }
    }
}

/// Location and variable names of measures in a MATLAB file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatFieldNames {
    /// Optional enclosing struct.
    pub sup_field_name: String,
    pub field_name: String,
    pub var_name: MatVarNames,
}

impl Default for MatFieldNames {
    fn default() -> Self {
        Self {
            sup_field_name: "entity".into(),
            field_name: "measures".into(),
            var_name: MatVarNames::default(),
        }
    }
}

/// Column names of the measures sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelColNames {
    pub name: String,
    pub color: String,
    pub cost: String,
    pub haz_int: String,
    pub haz_frq: String,
    pub haz_set: String,
    pub mdd_a: String,
    pub mdd_b: String,
    pub paa_a: String,
    pub paa_b: String,
    pub risk_att: String,
    pub risk_cov: String,
}

impl Default for ExcelColNames {
    fn default() -> Self {
        Self {
            name: "name".into(),
            color: "color".into(),
            cost: "cost".into(),
            haz_int: "hazard intensity impact".into(),
            haz_frq: "hazard high frequency cutoff".into(),
            haz_set: "hazard event set".into(),
            mdd_a: "MDD impact a".into(),
            mdd_b: "MDD impact b".into(),
            paa_a: "PAA impact a".into(),
            paa_b: "PAA impact b".into(),
            risk_att: "risk transfer attachement".into(),
            risk_cov: "risk transfer cover".into(),
        }
    }
}

/// Sheet and column names of measures in a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelFieldNames {
    pub sheet_name: String,
    pub col_name: ExcelColNames,
}

impl Default for ExcelFieldNames {
    fn default() -> Self {
        Self {
            sheet_name: "measures".into(),
            col_name: ExcelColNames::default(),
        }
    }
}

/// Field-name configuration for both layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureReadOptions {
    pub mat: MatFieldNames,
    pub excel: ExcelFieldNames,
}

/// Standard template names, used when no options are given.
pub static DEF_READ_OPTIONS: Lazy<MeasureReadOptions> = Lazy::new(MeasureReadOptions::default);

/// Reads the measures stored in `path`.
///
/// The format is chosen from the file extension. A missing file yields
/// [`RiskError::FileNotFound`]; a missing variable or column yields
/// [`RiskError::MissingColumn`] / [`RiskError::MissingField`]; unparsable
/// values yield [`RiskError::MalformedContent`].
pub fn read_measures(
    path: &Path,
    description: &str,
    options: Option<&MeasureReadOptions>,
    source: &dyn TableSource,
) -> Result<Measures, RiskError> {
    let options = options.unwrap_or(&*DEF_READ_OPTIONS);
    ensure_file(path)?;
    let format = FileFormat::from_path(path).inspect_err(|e| log::error!("{e}"))?;

    let parsed = match format {
        FileFormat::Matrix => read_mat(path, &options.mat, source),
        FileFormat::Spreadsheet => read_excel(path, &options.excel, source),
    };
    let parsed = parsed.inspect_err(|e| match e {
        RiskError::MissingColumn(_) | RiskError::MissingField(_) => {
            log::error!("Not existing variable. {e}")
        }
        _ => log::error!("Reading measures from {} failed: {e}", path.display()),
    })?;

    let mut measures = Measures::new();
    measures.tag = Tag::new(path.display().to_string(), description);
    for meas in parsed {
        measures.add_measure(meas);
    }
    Ok(measures)
}

fn read_mat(
    path: &Path,
    names: &MatFieldNames,
    source: &dyn TableSource,
) -> Result<Vec<Measure>, RiskError> {
    let nested = format!("{}.{}", names.sup_field_name, names.field_name);
    let table = match source.read_table(path, &nested) {
        Err(RiskError::MissingField(_)) => source.read_table(path, &names.field_name)?,
        other => other?,
    };
    measures_from_mat_table(&table, &names.var_name)
}

fn read_excel(
    path: &Path,
    names: &ExcelFieldNames,
    source: &dyn TableSource,
) -> Result<Vec<Measure>, RiskError> {
    let table = source.read_table(path, &names.sheet_name)?;
    measures_from_excel_table(&table, &names.col_name)
}

/// Parses a colour given as three whitespace-separated floats.
pub fn parse_color(raw: &str) -> Result<[f64; 3], RiskError> {
    let values = raw
        .split_whitespace()
        .map(|v| v.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| RiskError::MalformedContent(format!("invalid color: `{raw}`")))?;
    <[f64; 3]>::try_from(values.as_slice())
        .map_err(|_| RiskError::MalformedContent(format!("color needs 3 values: `{raw}`")))
}

/// Measures from a MATLAB-layout table.
pub fn measures_from_mat_table(table: &Table, var: &MatVarNames) -> Result<Vec<Measure>, RiskError> {
    table.validate()?;
    let n = table.column(&var.name)?.len();
    (0..n)
        .map(|idx| {
            Ok(Measure {
                name: table.text(&var.name, idx)?,
                color_rgb: parse_color(&table.text(&var.color, idx)?)?,
                cost: table.number(&var.cost, idx)?,
                hazard_freq_cutoff: table.number(&var.haz_frq, idx)?,
                hazard_event_set: table.text(&var.haz_set, idx)?,
                hazard_intensity: (
                    table.number(&var.haz_int_a, idx)?,
                    table.number(&var.haz_int_b, idx)?,
                ),
                mdd_impact: (table.number(&var.mdd_a, idx)?, table.number(&var.mdd_b, idx)?),
                paa_impact: (table.number(&var.paa_a, idx)?, table.number(&var.paa_b, idx)?),
                risk_transf_attach: table.number(&var.risk_att, idx)?,
                risk_transf_cover: table.number(&var.risk_cov, idx)?,
            })
        })
        .collect()
}

/// Measures from a spreadsheet-layout table.
pub fn measures_from_excel_table(
    table: &Table,
    col: &ExcelColNames,
) -> Result<Vec<Measure>, RiskError> {
    table.validate()?;
    let n = table.column(&col.name)?.len();
    let haz_int_a = format!("{} a", col.haz_int);
    let haz_int_b = format!("{} b", col.haz_int);
    let single_intensity = table.has_column(&col.haz_int);
    (0..n)
        .map(|idx| {
            let hazard_intensity = if single_intensity {
                (1.0, table.number(&col.haz_int, idx)?)
            } else {
                (table.number(&haz_int_a, idx)?, table.number(&haz_int_b, idx)?)
            };
            Ok(Measure {
                name: table.text(&col.name, idx)?,
                color_rgb: parse_color(&table.text(&col.color, idx)?)?,
                cost: table.number(&col.cost, idx)?,
                hazard_freq_cutoff: table.number(&col.haz_frq, idx)?,
                hazard_event_set: table.text(&col.haz_set, idx)?,
                hazard_intensity,
                mdd_impact: (table.number(&col.mdd_a, idx)?, table.number(&col.mdd_b, idx)?),
                paa_impact: (table.number(&col.paa_a, idx)?, table.number(&col.paa_b, idx)?),
                risk_transf_attach: table.number(&col.risk_att, idx)?,
                risk_transf_cover: table.number(&col.risk_cov, idx)?,
            })
        })
        .collect()
}
