use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::backend::CompletionBackend;
use crate::error::ChatError;
use crate::params::types::ChatParameter;

/// Current value for every [`ChatParameter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: BTreeMap<ChatParameter, f64>,
}

impl ParameterSet {
    pub fn builtin_defaults() -> Self {
        Self {
            values: ChatParameter::ALL
                .into_iter()
                .map(|param| (param, param.range().default))
                .collect(),
        }
    }

    pub fn get(&self, param: ChatParameter) -> f64 {
        self.values
            .get(&param)
            .copied()
            .unwrap_or_else(|| param.range().default)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChatParameter, f64)> + '_ {
        self.values.iter().map(|(param, value)| (*param, *value))
    }

    /// Request-ready JSON object; integer-stepped knobs become JSON integers.
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.iter()
            .map(|(param, value)| (param.as_str().to_string(), json_number(param, value)))
            .collect()
    }

    /// Builds a full set from a `{"defaults": {...}}` payload.
    ///
    /// Every known key must be present and numeric. Unknown keys are skipped
    /// unless `strict` is set, in which case they fail the whole payload.
    pub fn from_defaults_payload(payload: &Value, strict: bool) -> Result<Self, ChatError> {
        let defaults = payload
            .get("defaults")
            .and_then(|d| d.as_object())
            .ok_or_else(|| ChatError::remote_defaults("defaults payload has no 'defaults' object"))?;

        let mut values = BTreeMap::new();
        for (key, raw) in defaults {
            let Ok(param) = key.parse::<ChatParameter>() else {
                if strict {
                    return Err(ChatError::remote_defaults(&format!(
                        "defaults payload carries unknown parameter '{}'",
                        key
                    )));
                }
                log::debug!("ignoring unknown default parameter '{}'", key);
                continue;
            };
            let number = raw.as_f64().ok_or_else(|| {
                ChatError::remote_defaults(&format!(
                    "default for '{}' is not a number: {}",
                    key, raw
                ))
            })?;
            let normalized = param
                .range()
                .normalize(number)
                .map_err(|e| ChatError::remote_defaults(&e.message))?;
            values.insert(param, normalized);
        }

        if let Some(missing) = ChatParameter::ALL
            .into_iter()
            .find(|param| !values.contains_key(param))
        {
            return Err(ChatError::remote_defaults(&format!(
                "defaults payload is missing '{}'",
                missing
            )));
        }

        Ok(Self { values })
    }

    fn insert(&mut self, param: ChatParameter, value: f64) {
        self.values.insert(param, value);
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::builtin_defaults()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (param, value) in self.iter() {
            map.serialize_entry(param.as_str(), &json_number(param, value))?;
        }
        map.end()
    }
}

fn json_number(param: ChatParameter, value: f64) -> Value {
    if param.is_integer() {
        Value::from(value.round() as i64)
    } else {
        Value::from(value)
    }
}

/// Owns the session's [`ParameterSet`].
#[derive(Debug, Clone)]
pub struct ParameterStore {
    values: ParameterSet,
    strict_defaults: bool,
}

impl ParameterStore {
    pub fn new(strict_defaults: bool) -> Self {
        Self {
            values: ParameterSet::builtin_defaults(),
            strict_defaults,
        }
    }

    pub fn get(&self) -> ParameterSet {
        self.values.clone()
    }

    /// Clamps and stores one value. Unknown keys are a programming error, not user input.
    pub fn set(&mut self, key: &str, raw_value: f64) -> Result<ParameterSet, ChatError> {
        let param = key.parse::<ChatParameter>()?;
        self.set_value(param, raw_value)
    }

    pub fn set_value(
        &mut self,
        param: ChatParameter,
        raw_value: f64,
    ) -> Result<ParameterSet, ChatError> {
        let value = param.range().normalize(raw_value)?;
        if value != raw_value {
            log::debug!("{} adjusted from {} to {}", param, raw_value, value);
        }
        let previous = self.values.get(param);
        if previous != value {
            log::info!("{} changed: {} -> {}", param, previous, value);
        }
        self.values.insert(param, value);
        Ok(self.get())
    }

    /// Fetches canonical defaults and swaps them in whole; on any failure the set is untouched.
    pub async fn reset_to_defaults<B: CompletionBackend>(
        &mut self,
        backend: &B,
    ) -> Result<ParameterSet, ChatError> {
        let reply = backend
            .fetch_defaults()
            .await
            .map_err(ChatError::into_remote_defaults)?;

        if !reply.is_success() {
            return Err(ChatError::remote_defaults(&format!(
                "defaults endpoint answered HTTP {}",
                reply.status
            )));
        }

        let replacement = ParameterSet::from_defaults_payload(&reply.body, self.strict_defaults)?;
        self.values = replacement;
        Ok(self.get())
    }
}
