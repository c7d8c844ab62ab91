//! Per-layer shape checks run before layers are merged.
//!
//! Catching unknown keys here (rather than after merging) lets errors name
//! the layer file the mistake came from.

use crate::ConfigError;
use serde_json::Value;

/// Expected JSON type of a leaf field.
#[derive(Debug, Clone, Copy)]
enum Kind {
    String,
    OptionalString,
    Integer,
    OptionalInteger,
    Number,
    Bool,
}

impl Kind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::OptionalString => value.is_null() || value.is_string(),
            Self::Integer => value.is_u64(),
            Self::OptionalInteger => value.is_null() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Bool => value.is_boolean(),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::String => "expected string",
            Self::OptionalString => "expected string or null",
            Self::Integer => "expected non-negative integer",
            Self::OptionalInteger => "expected non-negative integer or null",
            Self::Number => "expected number",
            Self::Bool => "expected bool",
        }
    }
}

type Section = (&'static str, &'static [(&'static str, Kind)]);

const SECTIONS: &[Section] = &[
    ("server", &[("host", Kind::String), ("port", Kind::Integer)]),
    (
        "storage",
        &[
            ("data_dir", Kind::String),
            ("database_file", Kind::String),
            ("artifacts_dir", Kind::String),
        ],
    ),
    (
        "completion",
        &[
            ("base_url", Kind::String),
            ("model", Kind::String),
            ("temperature", Kind::Number),
            ("top_p", Kind::Number),
            ("max_tokens", Kind::Integer),
            ("timeout_secs", Kind::OptionalInteger),
        ],
    ),
    (
        "generation",
        &[
            ("base_url_template", Kind::String),
            ("api_key", Kind::OptionalString),
            ("text_to_image_app", Kind::String),
            ("image_to_3d_app", Kind::String),
            ("default_user", Kind::String),
            ("timeout_secs", Kind::OptionalInteger),
        ],
    ),
    ("pipeline", &[("analyze", Kind::Bool)]),
];

/// Check one layer's keys and leaf types; `layer` prefixes error paths.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let Some(root) = value.as_object() else {
        return Err(invalid_field(layer, "root", "expected object"));
    };
    for (key, value) in root {
        if key == "$schema" {
            if !Kind::String.accepts(value) {
                return Err(invalid_field(layer, key, Kind::String.expected()));
            }
            continue;
        }
        let Some((_, fields)) = SECTIONS.iter().find(|(name, _)| *name == key.as_str()) else {
            return Err(invalid_field(layer, key, "unknown key"));
        };
        check_section(value, layer, key, fields)?;
    }
    Ok(())
}

fn check_section(
    value: &Value,
    layer: &str,
    section: &str,
    fields: &[(&str, Kind)],
) -> Result<(), ConfigError> {
    let Some(map) = value.as_object() else {
        return Err(invalid_field(layer, section, "expected object"));
    };
    for (key, value) in map {
        let path = format!("{section}.{key}");
        match fields.iter().find(|(name, _)| *name == key.as_str()) {
            None => return Err(invalid_field(layer, &path, "unknown key")),
            Some((_, kind)) if !kind.accepts(value) => {
                return Err(invalid_field(layer, &path, kind.expected()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
