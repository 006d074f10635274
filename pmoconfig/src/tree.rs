//! Opérations sur l'arbre YAML de la configuration.
//!
//! Les clés sont insensibles à la casse : elles sont mises en minuscules au
//! chargement et à chaque accès.

use anyhow::{Result, bail};
use serde_yaml::{Mapping, Value};

/// Overlays `overlay` onto `base`. Mappings are merged key by key, any other
/// node of `overlay` replaces the one in `base`.
pub(crate) fn overlay(base: &mut Value, overlay_value: &Value) {
    match (base, overlay_value) {
        (Value::Mapping(base_map), Value::Mapping(top)) => {
            for (key, value) in top {
                if let Some(slot) = base_map.get_mut(key) {
                    overlay(slot, value);
                } else {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Lower-cases every string key, recursively.
pub(crate) fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (key, lowercase_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

pub(crate) fn lookup<'a>(root: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut node = root;
    for (depth, key) in path.iter().enumerate() {
        let Value::Mapping(map) = node else {
            bail!("{} is not a section", path[..depth].join("."));
        };
        match map.get(key.to_lowercase().as_str()) {
            Some(child) => node = child,
            None => bail!("{} is not set", path[..=depth].join(".")),
        }
    }
    Ok(node)
}

/// Stores `value` at `path`, creating the missing sections.
pub(crate) fn insert(root: &mut Value, path: &[&str], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for key in parents {
        let Value::Mapping(map) = node else {
            bail!("cannot create {}: parent is not a section", path.join("."));
        };
        node = map
            .entry(Value::String(key.to_lowercase()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    match node {
        Value::Mapping(map) => {
            map.insert(Value::String(last.to_lowercase()), value);
            Ok(())
        }
        _ => bail!("cannot set {}: parent is not a section", path.join(".")),
    }
}

/// Applies `PREFIX` + `SECTION__KEY=value` variables. Values are read as YAML
/// scalars so that `8080` or `true` keep their type.
pub(crate) fn apply_env<I>(root: &mut Value, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, raw) in vars {
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let path: Vec<&str> = suffix.split("__").collect();
        let value =
            serde_yaml::from_str::<Value>(&raw).unwrap_or_else(|_| Value::String(raw.clone()));
        if let Err(e) = insert(root, &path, value) {
            tracing::warn!(variable=%name, error=%e, "Ignoring configuration override");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_overlay_keeps_untouched_defaults() {
        let mut base = yaml("a: 1\nb:\n  c: 2\n  d: 3\n");
        overlay(&mut base, &yaml("b:\n  c: 20\n"));

        assert_eq!(lookup(&base, &["b", "c"]).unwrap(), &Value::from(20));
        assert_eq!(lookup(&base, &["b", "d"]).unwrap(), &Value::from(3));
        assert_eq!(lookup(&base, &["a"]).unwrap(), &Value::from(1));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let root = lowercase_keys(yaml("WiFi:\n  AP_Name: X\n"));
        assert_eq!(lookup(&root, &["WIFI", "ap_name"]).unwrap(), &Value::from("X"));
    }

    #[test]
    fn test_insert_creates_sections() {
        let mut root = Value::Mapping(Mapping::new());
        insert(&mut root, &["radio", "tick_ms"], Value::from(5)).unwrap();
        assert_eq!(lookup(&root, &["RADIO", "TICK_MS"]).unwrap(), &Value::from(5));

        assert!(insert(&mut root, &["radio", "tick_ms", "x"], Value::from(1)).is_err());
        assert!(lookup(&root, &["radio", "missing"]).is_err());
    }

    #[test]
    fn test_env_overrides_keep_scalar_types() {
        let mut root = yaml("host:\n  http_port: 80\n");
        apply_env(
            &mut root,
            "P__",
            [
                ("P__HOST__HTTP_PORT".to_string(), "8080".to_string()),
                ("P__WIFI__AP_NAME".to_string(), "WEBRADIO".to_string()),
                ("P__RADIO__PERSIST_PLAYBACK".to_string(), "true".to_string()),
                ("OTHER".to_string(), "ignored".to_string()),
            ],
        );

        assert_eq!(lookup(&root, &["host", "http_port"]).unwrap(), &Value::from(8080));
        assert_eq!(lookup(&root, &["wifi", "ap_name"]).unwrap(), &Value::from("WEBRADIO"));
        assert_eq!(
            lookup(&root, &["radio", "persist_playback"]).unwrap(),
            &Value::Bool(true)
        );
        assert!(lookup(&root, &["other"]).is_err());
    }
}
