//! Keyword resolver: the local, deterministic fallback.
//!
//! Picks a tool from an ordered phrase table (or the first word of the
//! input), then binds the numerals found in the text to the tool's required
//! parameters strictly by position.

use crate::resolve::{ResolutionOutcome, ToolInvocation};
use crate::tools::{ParamSpec, ParamType, ToolCatalog, ToolDescriptor};
use crate::types::{Error, Result};
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;

/// Phrase → canonical tool. Scanned in order; the first phrase present in the
/// text whose tool is in the catalog wins, wherever it sits in the text.
pub const PHRASE_TABLE: &[(&str, &str)] = &[
    ("add", "add"),
    ("plus", "add"),
    ("subtract", "subtract"),
    ("minus", "subtract"),
    ("multiply", "multiply"),
    ("times", "multiply"),
    ("divide", "divide"),
    ("over", "divide"),
    ("power", "power"),
    ("to the power of", "power"),
    ("sqrt", "sqrt"),
    ("square root", "sqrt"),
    ("cosine", "cosine"),
    ("cos", "cosine"),
    ("sine", "sine"),
    ("sin", "sine"),
    ("tangent", "tangent"),
    ("tan", "tangent"),
    ("acos", "acos"),
    ("asin", "asin"),
    ("recent", "get_recent_calculations"),
    ("history", "get_recent_calculations"),
    ("log", "get_recent_calculations"),
];

/// ASCII digits only: other scripts' digits are not numerals here.
const NUMERAL_PATTERN: &str = r"[-+]?[0-9]*\.?[0-9]+";

#[allow(clippy::expect_used)]
fn numeral_regex() -> &'static Regex {
    static NUMERAL: OnceLock<Regex> = OnceLock::new();
    NUMERAL.get_or_init(|| {
        Regex::new(NUMERAL_PATTERN).expect("numeral pattern is a valid literal")
    })
}

/// Resolve `text` against `catalog` without any network access.
pub fn resolve_keywords(text: &str, catalog: &ToolCatalog) -> ResolutionOutcome {
    match try_resolve(text, catalog) {
        Ok(invocation) => ResolutionOutcome::Resolved(invocation),
        Err(e) => {
            tracing::debug!(kind = e.kind(), "keyword_resolution_declined: {}", e);
            ResolutionOutcome::Unresolved
        }
    }
}

/// Same as [`resolve_keywords`] but reports why the input was declined.
pub fn try_resolve(text: &str, catalog: &ToolCatalog) -> Result<ToolInvocation> {
    let normalized = text.to_lowercase();
    let tool = match_tool(&normalized, catalog)?;

    if tool.required.is_empty() {
        return Ok(ToolInvocation::new(tool.name.clone(), Map::new()));
    }

    let numerals = extract_numerals(&normalized);
    let required: Vec<&ParamSpec> = tool.required_params().collect();
    if numerals.len() < required.len() {
        return Err(Error::InsufficientArguments {
            tool: tool.name.clone(),
            required: required.len(),
            found: numerals.len(),
        });
    }

    let mut args = Map::new();
    for (param, raw) in required.into_iter().zip(numerals) {
        args.insert(param.name.clone(), coerce(param, raw)?);
    }
    Ok(ToolInvocation::new(tool.name.clone(), args))
}

/// Identify the tool: phrase table first, then the first word as a literal name.
fn match_tool<'c>(normalized: &str, catalog: &'c ToolCatalog) -> Result<&'c ToolDescriptor> {
    let by_phrase = PHRASE_TABLE
        .iter()
        .find(|(phrase, tool)| normalized.contains(phrase) && catalog.contains(tool))
        .map(|(_, tool)| *tool);

    let name = match by_phrase {
        Some(name) => name,
        None => normalized
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::tool_not_found("<empty input>"))?,
    };
    catalog.get(name)
}

/// Every signed decimal numeral, in order of appearance.
pub fn extract_numerals(normalized: &str) -> Vec<&str> {
    numeral_regex()
        .find_iter(normalized)
        .map(|m| m.as_str())
        .collect()
}

fn coerce(param: &ParamSpec, raw: &str) -> Result<Value> {
    let failure = |reason: &str| Error::Coercion {
        param: param.name.clone(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    match param.param_type {
        ParamType::Integer => {
            let truncated = parse_decimal(raw)
                .ok_or_else(|| failure("not a finite decimal"))?
                .trunc();
            if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
                return Err(failure("out of integer range"));
            }
            Ok(Value::from(truncated as i64))
        }
        ParamType::Number => {
            let value = parse_decimal(raw).ok_or_else(|| failure("not a finite decimal"))?;
            Number::from_f64(value)
                .map(Value::Number)
                .ok_or_else(|| failure("not representable as JSON number"))
        }
        ParamType::String | ParamType::Other(_) => Ok(Value::String(raw.to_string())),
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
