//! Record normalization: loosely-typed candidates in, [`DealRecord`]s out.
//!
//! Every schema field is looked up through [`FIELD_ALIASES`], which lists the
//! canonical key first followed by the synonyms used by older or alternate
//! feeds. Supporting a new naming convention is a change to that table only.

use serde_json::Value;

use crate::model::{CandidateRecord, DealRecord, OUTPUT_FIELDS};

/// Fallback `data_source` when neither the feed nor its adapter names one.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Candidate keys per output field, in lookup priority order.
///
/// `scraped_at` is absent on purpose: it is always stamped at normalization
/// time.
pub const FIELD_ALIASES: [(&str, &[&str]); 17] = [
    ("id", &["id", "uuid"]),
    ("name", &["name", "nombre"]),
    ("sector", &["sector"]),
    ("sub_sector", &["sub_sector", "subsector"]),
    ("country", &["country", "pais"]),
    ("stage", &["stage", "estado", "status"]),
    ("description", &["description", "descripcion"]),
    ("website", &["website", "url"]),
    ("tags", &["tags", "labels"]),
    (
        "primary_technology",
        &["primary_technology", "tecnologia_principal"],
    ),
    ("water_efficiency", &["water_efficiency", "eficiencia_hidrica"]),
    (
        "regenerative_technologies",
        &[
            "regenerative_technologies",
            "tecnologias_regenerativas",
            "regenerative_tech",
        ],
    ),
    (
        "environmental_impact",
        &["environmental_impact", "impacto_medioambiental"],
    ),
    ("social_impact", &["social_impact", "impacto_social"]),
    ("digital_model", &["digital_model", "modelo_digital"]),
    (
        "sustainability_indicator",
        &["sustainability_indicator", "indicador_sostenibilidad"],
    ),
    ("data_source", &["data_source", "fuente_datos"]),
];

/// Returns `false` for `null`, `false`, zero, `""`, `[]` and `{}`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Trimmed text form of a truthy value; falsy values become `""`.
pub fn scalar_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts a `tags` value into an ordered list of trimmed, non-empty tags.
///
/// Strings are split on commas. Arrays keep their order, skipping falsy
/// entries. Objects are treated as unordered collections of their keys and
/// are traversed in map order, which callers must not rely on. Any other
/// truthy scalar becomes a single tag. Duplicates are kept.
pub fn coerce_tags(value: &Value) -> Vec<String> {
    if !is_truthy(value) {
        return Vec::new();
    }
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter(|item| is_truthy(item))
            .map(scalar_text)
            .filter(|tag| !tag.is_empty())
            .collect(),
        Value::Object(map) => map
            .keys()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect(),
        other => vec![scalar_text(other)],
    }
}

/// First truthy value among `keys`, in order.
fn first_truthy<'a>(raw: &'a CandidateRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| is_truthy(value))
}

/// Normalizes a candidate record, stamping the current Unix time.
pub fn normalise_deal(raw: &CandidateRecord) -> DealRecord {
    normalise_deal_at(raw, unix_now())
}

/// Normalizes a candidate record with an explicit `scraped_at` stamp.
///
/// Never fails: absent keys, `null` and wrong-typed values all map to
/// defined output.
pub fn normalise_deal_at(raw: &CandidateRecord, scraped_at: i64) -> DealRecord {
    let mut record = DealRecord::blank(scraped_at);

    for (field, keys) in FIELD_ALIASES {
        let found = first_truthy(raw, keys);
        if field == "tags" {
            record.tags = found.map(coerce_tags).unwrap_or_default();
        } else if let Some(slot) = record.text_field_mut(field) {
            *slot = found.map(scalar_text).unwrap_or_default();
        }
    }

    if record.data_source.is_empty() {
        record.data_source = UNKNOWN_SOURCE.to_string();
    }

    debug_assert!(OUTPUT_FIELDS.iter().all(|f| record.cell(f).is_some()));
    record
}

pub(crate) fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> CandidateRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test candidate must be an object"),
        }
    }

    #[test]
    fn test_alias_table_covers_schema() {
        let mapped: Vec<&str> = FIELD_ALIASES.iter().map(|(field, _)| *field).collect();
        let expected: Vec<&str> = OUTPUT_FIELDS
            .iter()
            .copied()
            .filter(|f| *f != "scraped_at")
            .collect();
        assert_eq!(mapped, expected);
        assert!(FIELD_ALIASES.iter().all(|(field, keys)| keys[0] == *field));
    }

    #[test]
    fn test_coerce_tags_list_drops_falsy_and_stringifies() {
        assert_eq!(coerce_tags(&json!(["Agtech", null, 42])), vec!["Agtech", "42"]);
    }

    #[test]
    fn test_coerce_tags_comma_string() {
        assert_eq!(
            coerce_tags(&json!("agtech, water , ,biotech")),
            vec!["agtech", "water", "biotech"]
        );
    }

    #[test]
    fn test_coerce_tags_falsy_inputs() {
        assert!(coerce_tags(&Value::Null).is_empty());
        assert!(coerce_tags(&json!(0)).is_empty());
        assert!(coerce_tags(&json!(false)).is_empty());
        assert!(coerce_tags(&json!("")).is_empty());
        assert!(coerce_tags(&json!([])).is_empty());
        assert!(coerce_tags(&json!("  ")).is_empty());
    }

    #[test]
    fn test_coerce_tags_scalar_and_duplicates() {
        assert_eq!(coerce_tags(&json!(3.5)), vec!["3.5"]);
        assert_eq!(coerce_tags(&json!(true)), vec!["true"]);
        assert_eq!(
            coerce_tags(&json!(["water", " water ", "  "])),
            vec!["water", "water"]
        );
    }

    #[test]
    fn test_coerce_tags_object_keys() {
        let mut tags = coerce_tags(&json!({"energy": 1, "water": null}));
        tags.sort();
        assert_eq!(tags, vec!["energy", "water"]);
    }

    #[test]
    fn test_empty_candidate() {
        let before = unix_now();
        let record = normalise_deal(&CandidateRecord::new());
        let after = unix_now();

        for field in OUTPUT_FIELDS {
            if matches!(field, "tags" | "scraped_at" | "data_source") {
                continue;
            }
            assert_eq!(record.cell(field), Some(json!("")), "field {field}");
        }
        assert!(record.tags.is_empty());
        assert_eq!(record.data_source, UNKNOWN_SOURCE);
        assert!(record.scraped_at >= before && record.scraped_at <= after + 1);
    }

    #[test]
    fn test_handles_non_string_values() {
        let raw = candidate(json!({
            "name": null,
            "sector": 101,
            "description": "   ",
            "social_impact": false,
            "stage": 0,
            "data_source": null,
            "tags": ["Agtech", null, 42],
        }));

        let record = normalise_deal(&raw);

        assert_eq!(record.name, "");
        assert_eq!(record.sector, "101");
        assert_eq!(record.description, "");
        assert_eq!(record.social_impact, "");
        assert_eq!(record.stage, "");
        assert_eq!(record.data_source, UNKNOWN_SOURCE);
        assert_eq!(record.tags, vec!["Agtech", "42"]);
    }

    #[test]
    fn test_whitespace_data_source_falls_back() {
        let record = normalise_deal(&candidate(json!({"data_source": "   "})));
        assert_eq!(record.data_source, UNKNOWN_SOURCE);
    }

    #[test]
    fn test_synonyms_in_priority_order() {
        let raw = candidate(json!({
            "uuid": "abc-123",
            "nombre": "  Acme Agro ",
            "status": "seed",
            "estado": "",
            "url": "https://acme.example",
            "labels": "soil, water",
            "regenerative_tech": "biochar",
            "fuente_datos": "Legacy Feed",
            "pais": "España",
        }));

        let record = normalise_deal_at(&raw, 7);

        assert_eq!(record.id, "abc-123");
        assert_eq!(record.name, "Acme Agro");
        assert_eq!(record.stage, "seed");
        assert_eq!(record.website, "https://acme.example");
        assert_eq!(record.tags, vec!["soil", "water"]);
        assert_eq!(record.regenerative_technologies, "biochar");
        assert_eq!(record.data_source, "Legacy Feed");
        assert_eq!(record.country, "España");
        assert_eq!(record.scraped_at, 7);
    }

    #[test]
    fn test_canonical_key_wins() {
        let raw = candidate(json!({"name": "Canonical", "nombre": "Legacy"}));
        assert_eq!(normalise_deal_at(&raw, 0).name, "Canonical");
    }

    #[test]
    fn test_scraped_at_is_overwritten() {
        let raw = candidate(json!({"scraped_at": 1}));
        assert!(normalise_deal(&raw).scraped_at > 1);
    }

    #[test]
    fn test_whitespace_tags_normalize_to_empty() {
        let raw = candidate(json!({"tags": "  "}));
        assert!(normalise_deal_at(&raw, 0).tags.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = candidate(json!({
            "id": 17,
            "name": " Acme ",
            "sector": "Food",
            "tags": "a, b",
            "website": "acme.example ",
        }));
        let first = normalise_deal_at(&raw, 1);

        let mut again = match serde_json::to_value(&first).unwrap() {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        again.remove("scraped_at");
        let second = normalise_deal_at(&again, 1);

        assert_eq!(first, second);
    }
}
