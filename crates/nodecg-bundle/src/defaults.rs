//! Schema default synthesis and config merging.

use serde_json::{Map, Value};
use std::collections::HashSet;

/// Guards against `$ref` cycles.
const MAX_DEPTH: usize = 64;

/// Build the default config described by a JSON Schema.
///
/// Every node with a `default` keyword contributes its value. Objects collect
/// the defaults of their properties; nested objects and arrays with nothing
/// declared inside them only appear when the parent lists them in `required`.
/// Local `$ref`s (`#/definitions/...`, `#/$defs/...`) and `allOf` branches are
/// followed. The result is always an object when the schema has no usable
/// root default.
#[must_use]
pub fn schema_defaults(schema: &Value) -> Value {
    Synthesizer { root: schema }
        .defaults(schema, 0)
        .map(|synth| synth.value)
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Deep-merge `overlay` onto `base`.
///
/// Objects merge key by key and arrays merge index by index, so a shorter
/// overlay array keeps the tail of the base array. Anywhere else the overlay
/// value wins outright.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => {
                        let merged = deep_merge(existing.take(), value);
                        *existing = merged;
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            for (index, value) in overlay.into_iter().enumerate() {
                match base.get_mut(index) {
                    Some(existing) => {
                        let merged = deep_merge(existing.take(), value);
                        *existing = merged;
                    }
                    None => base.push(value),
                }
            }
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}

/// A synthesized value, and whether any `default` keyword produced it.
struct Synth {
    value: Value,
    explicit: bool,
}

impl Synth {
    fn structural(value: Value) -> Self {
        Self {
            value,
            explicit: false,
        }
    }
}

struct Synthesizer<'a> {
    root: &'a Value,
}

impl Synthesizer<'_> {
    fn defaults(&self, schema: &Value, depth: usize) -> Option<Synth> {
        if depth > MAX_DEPTH {
            return None;
        }
        let node = schema.as_object()?;

        if let Some(default) = node.get("default") {
            return Some(Synth {
                value: default.clone(),
                explicit: true,
            });
        }

        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            let target = self.resolve(reference)?;
            return self.defaults(target, depth + 1);
        }

        let own = self.structural(node, depth);

        let Some(branches) = node.get("allOf").and_then(Value::as_array) else {
            return own;
        };

        branches
            .iter()
            .filter_map(|branch| self.defaults(branch, depth + 1))
            .chain(own)
            .reduce(|acc, next| Synth {
                value: deep_merge(acc.value, next.value),
                explicit: acc.explicit || next.explicit,
            })
    }

    fn structural(&self, node: &Map<String, Value>, depth: usize) -> Option<Synth> {
        if has_type(node, "object") || (node.get("type").is_none() && node.contains_key("properties"))
        {
            return Some(self.object_defaults(node, depth));
        }

        if has_type(node, "array") {
            return Some(self.array_defaults(node, depth));
        }

        None
    }

    fn object_defaults(&self, node: &Map<String, Value>, depth: usize) -> Synth {
        let required: HashSet<&str> = node
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut out = Map::new();
        let mut explicit = false;

        if let Some(properties) = node.get("properties").and_then(Value::as_object) {
            for (key, property) in properties {
                let Some(synth) = self.defaults(property, depth + 1) else {
                    continue;
                };
                if synth.explicit || required.contains(key.as_str()) {
                    explicit |= synth.explicit;
                    out.insert(key.clone(), synth.value);
                }
            }
        }

        Synth {
            value: Value::Object(out),
            explicit,
        }
    }

    fn array_defaults(&self, node: &Map<String, Value>, depth: usize) -> Synth {
        let min_items = node
            .get("minItems")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);

        let item = node
            .get("items")
            .and_then(|items| self.defaults(items, depth + 1))
            .filter(|item| item.explicit);

        match item {
            Some(item) if min_items > 0 => Synth {
                value: Value::Array(vec![item.value; min_items]),
                explicit: true,
            },
            _ => Synth::structural(Value::Array(Vec::new())),
        }
    }

    fn resolve(&self, reference: &str) -> Option<&Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(self.root);
        }
        self.root.pointer(pointer)
    }
}

fn has_type(node: &Map<String, Value>, wanted: &str) -> bool {
    match node.get("type") {
        Some(Value::String(ty)) => ty == wanted,
        Some(Value::Array(types)) => types.iter().any(|ty| ty.as_str() == Some(wanted)),
        _ => false,
    }
}
