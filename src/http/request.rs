use serde_json::{Value, json};

use crate::params::ParameterSet;

pub struct RequestBuilder {
    body: serde_json::Map<String, Value>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            body: serde_json::Map::new(),
        }
    }

    pub fn add_required<T: Into<Value>>(mut self, key: &str, value: T) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn merge(mut self, extra: serde_json::Map<String, Value>) -> Self {
        self.body.extend(extra);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.body)
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Single user turn merged with every sampling knob of the snapshot.
pub fn build_chat_request(prompt: &str, snapshot: &ParameterSet) -> Value {
    RequestBuilder::new()
        .add_required("messages", json!([{ "role": "user", "content": prompt }]))
        .merge(snapshot.to_json_map())
        .build()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::build_chat_request;
    use crate::params::ParameterSet;

    #[test]
    fn wraps_prompt_as_single_user_turn() {
        let body = build_chat_request("find a beginner repo", &ParameterSet::builtin_defaults());
        assert_eq!(
            body["messages"],
            json!([{ "role": "user", "content": "find a beginner repo" }])
        );
    }

    #[test]
    fn carries_every_parameter() {
        let body = build_chat_request("hi", &ParameterSet::builtin_defaults());
        for key in [
            "temperature",
            "top_p",
            "top_k",
            "max_tokens",
            "frequency_penalty",
            "presence_penalty",
        ] {
            assert!(body.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(body["max_tokens"], json!(256));
        assert_eq!(body.as_object().unwrap().len(), 7);
    }
}
