//! Comunica API wire models

use crate::config::DATE_FORMAT;
use crate::domain::Record;
use chrono::NaiveDate;
use serde::Serialize;

/// Query string of a single-day page request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub sigla_tribunal: String,
    pub data_disponibilizacao_inicio: String,
    pub data_disponibilizacao_fim: String,
    pub pagina: u32,
    pub itens_por_pagina: usize,
}

impl PageQuery {
    /// Query for page `page` of `day`, using the day as both window bounds
    pub fn for_day(tribunal: &str, day: NaiveDate, page: u32, page_size: usize) -> Self {
        let day = day.format(DATE_FORMAT).to_string();
        Self {
            sigla_tribunal: tribunal.to_string(),
            data_disponibilizacao_inicio: day.clone(),
            data_disponibilizacao_fim: day,
            pagina: page,
            itens_por_pagina: page_size,
        }
    }
}

/// Pulls the `items` list out of a response document
///
/// A missing or null `items` field means no items. Any other non-array value
/// is a payload the collector cannot use.
pub fn extract_items(body: serde_json::Value) -> Result<Vec<Record>, String> {
    let serde_json::Value::Object(mut map) = body else {
        return Ok(Vec::new());
    };

    match map.remove("items") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => Ok(items.into_iter().map(Record::new).collect()),
        Some(other) => Err(format!(
            "field 'items' is not an array (found {})",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
