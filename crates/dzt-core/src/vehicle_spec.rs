// JSON vehicle loadout spec -> spawnabletypes.xml.
//
// Input is loosely typed (`serde_json::Value`); `validate` collects every
// problem, and only a validated `VehicleSpec` can be rendered.
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value as J;

use crate::error::{Error, Result};
use crate::xml::{SPAWNABLE_ROOT, XML_DECL, escape_xml};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleSpec {
    pub vehicles: Vec<Vehicle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub name: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    /// Already normalised to two decimals, e.g. `"0.50"`.
    pub chance: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub ok: bool,
    pub errors: Vec<String>,
}

pub fn validate(spec: &J) -> Validation {
    let mut errors = Vec::new();
    let Some(obj) = spec.as_object() else {
        errors.push("Spec must be a JSON object.".to_string());
        return Validation { ok: false, errors };
    };
    let Some(vehicles) = obj.get("vehicles").and_then(J::as_array) else {
        errors.push("Spec.vehicles must be an array.".to_string());
        return Validation { ok: false, errors };
    };
    for (i, v) in vehicles.iter().enumerate() {
        let Some(vo) = v.as_object() else {
            errors.push(format!("vehicles[{i}] must be an object."));
            continue;
        };
        if name_of(v).is_none() {
            errors.push(format!("vehicles[{i}].name is required."));
        }
        if let Some(att) = vo.get("attachments")
            && !att.is_null()
            && !att.is_array()
        {
            errors.push(format!("vehicles[{i}].attachments must be an array."));
        }
    }
    Validation {
        ok: errors.is_empty(),
        errors,
    }
}

/// Validates and converts in one step.
pub fn parse_spec(spec: &J) -> Result<VehicleSpec> {
    let v = validate(spec);
    if !v.ok {
        return Err(Error::MalformedSpec(v.errors));
    }
    let vehicles = spec["vehicles"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(|v| {
            let name = name_of(v)?;
            let attachments = v
                .get("attachments")
                .and_then(J::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .filter_map(|a| {
                    Some(Attachment {
                        name: name_of(a)?,
                        chance: normalize_chance(a.get("chance")),
                    })
                })
                .collect();
            Some(Vehicle { name, attachments })
        })
        .collect();
    Ok(VehicleSpec { vehicles })
}

pub fn parse_spec_str(text: &str) -> Result<VehicleSpec> {
    let value: J = serde_json::from_str(text)?;
    parse_spec(&value)
}

// Names must be non-empty strings.
fn name_of(v: &J) -> Option<String> {
    match v.get("name")? {
        J::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Two-decimal chance string; `"1.00"` when absent or unparseable.
pub fn normalize_chance(v: Option<&J>) -> String {
    let num = match v {
        Some(J::Number(n)) => n.as_f64(),
        Some(J::String(s)) => leading_float(s),
        _ => None,
    };
    match num {
        Some(n) if n.is_finite() => to_fixed2(n),
        _ => "1.00".to_string(),
    }
}

// Two decimals, exact ties rounded away from zero. `{:.2}` alone rounds
// ties to even, so 0.125 would print as "0.12". Only multiples of 1/8 with
// an odd numerator are exact ties at the third decimal; anything else
// (1.005 is really 1.00499...) is already rounded correctly by `{:.2}`.
fn to_fixed2(n: f64) -> String {
    let eighths = n * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() % 2.0 == 1.0 {
        let cents = (n * 100.0).round();
        return format!("{:.2}", cents / 100.0);
    }
    format!("{n:.2}")
}

// Longest numeric prefix, so "0.5x" reads as 0.5.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        match bytes[end] {
            b'+' | b'-' if end == 0 || matches!(bytes[end - 1], b'e' | b'E') => {}
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }
    // back off over a dangling exponent/sign, "1e" or "1e-"
    while end > 0 {
        if let Ok(n) = s[..end].parse::<f64>() {
            return Some(n);
        }
        end -= 1;
    }
    None
}

/// One `<attachments>` wrapper per attachment, each holding a single item.
pub fn emit(spec: &VehicleSpec) -> String {
    let mut out = String::new();
    write_spec_document(&mut out, spec).ok();
    out
}

fn write_spec_document(out: &mut String, spec: &VehicleSpec) -> std::fmt::Result {
    writeln!(out, "{XML_DECL}")?;
    writeln!(out, "<{SPAWNABLE_ROOT}>")?;
    for v in &spec.vehicles {
        writeln!(out, "  <type name=\"{}\">", escape_xml(&v.name))?;
        for a in &v.attachments {
            writeln!(out, "    <attachments chance=\"{}\">", a.chance)?;
            writeln!(
                out,
                "      <item name=\"{}\" chance=\"{}\" />",
                escape_xml(&a.name),
                a.chance
            )?;
            writeln!(out, "    </attachments>")?;
        }
        writeln!(out, "  </type>")?;
    }
    writeln!(out, "</{SPAWNABLE_ROOT}>")
}
