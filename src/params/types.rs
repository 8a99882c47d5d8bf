use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ChatError;

/// The six sampling knobs the console lets a user tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChatParameter {
    Temperature,
    TopP,
    TopK,
    MaxTokens,
    FrequencyPenalty,
    PresencePenalty,
}

impl ChatParameter {
    pub const ALL: [ChatParameter; 6] = [
        ChatParameter::Temperature,
        ChatParameter::TopP,
        ChatParameter::TopK,
        ChatParameter::MaxTokens,
        ChatParameter::FrequencyPenalty,
        ChatParameter::PresencePenalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::TopP => "top_p",
            Self::TopK => "top_k",
            Self::MaxTokens => "max_tokens",
            Self::FrequencyPenalty => "frequency_penalty",
            Self::PresencePenalty => "presence_penalty",
        }
    }

    pub fn range(&self) -> &'static ParameterRange {
        match self {
            Self::Temperature => &TEMPERATURE_RANGE,
            Self::TopP => &TOP_P_RANGE,
            Self::TopK => &TOP_K_RANGE,
            Self::MaxTokens => &MAX_TOKENS_RANGE,
            Self::FrequencyPenalty => &FREQUENCY_PENALTY_RANGE,
            Self::PresencePenalty => &PRESENCE_PENALTY_RANGE,
        }
    }

    /// Whether the completion service expects a JSON integer for this knob.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::TopK | Self::MaxTokens)
    }
}

impl fmt::Display for ChatParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatParameter {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChatParameter::ALL
            .into_iter()
            .find(|param| param.as_str() == s)
            .ok_or_else(|| ChatError::validation(&format!("unknown parameter '{}'", s)))
    }
}

/// Static bounds for one parameter, known only to the client.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub description: &'static str,
    #[serde(skip)]
    decimals: i32,
}

static TEMPERATURE_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 2.0,
    step: 0.1,
    default: 0.7,
    description: "Controls randomness in output",
    decimals: 1,
};

static TOP_P_RANGE: ParameterRange = ParameterRange {
    min: 0.0,
    max: 1.0,
    step: 0.05,
    default: 0.9,
    description: "Nucleus sampling parameter",
    decimals: 2,
};

static TOP_K_RANGE: ParameterRange = ParameterRange {
    min: 1.0,
    max: 100.0,
    step: 1.0,
    default: 40.0,
    description: "Top-k sampling parameter",
    decimals: 0,
};

static MAX_TOKENS_RANGE: ParameterRange = ParameterRange {
    min: 1.0,
    max: 4096.0,
    step: 1.0,
    default: 256.0,
    description: "Maximum tokens to generate",
    decimals: 0,
};

static FREQUENCY_PENALTY_RANGE: ParameterRange = ParameterRange {
    min: -2.0,
    max: 2.0,
    step: 0.1,
    default: 0.0,
    description: "Penalize repeated tokens",
    decimals: 1,
};

static PRESENCE_PENALTY_RANGE: ParameterRange = ParameterRange {
    min: -2.0,
    max: 2.0,
    step: 0.1,
    default: 0.0,
    description: "Penalize new topics",
    decimals: 1,
};

impl ParameterRange {
    /// Clamps into `[min, max]` and snaps to the nearest multiple of `step` above `min`.
    pub fn normalize(&self, raw: f64) -> Result<f64, ChatError> {
        if !raw.is_finite() {
            return Err(ChatError::validation(&format!(
                "parameter value must be a finite number, got {}",
                raw
            )));
        }
        let clamped = raw.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).clamp(self.min, self.max);

        // float noise from the step arithmetic, e.g. 0.30000000000000004
        let scale = 10f64.powi(self.decimals);
        let rounded = (snapped * scale).round() / scale;
        Ok(if rounded == 0.0 { 0.0 } else { rounded })
    }
}

#[cfg(test)]
mod tests {
    use super::ChatParameter;

    #[test]
    fn parses_every_known_key() {
        for param in ChatParameter::ALL {
            assert_eq!(param.as_str().parse::<ChatParameter>().unwrap(), param);
        }
    }

    #[test]
    fn rejects_unknown_key() {
        let err = "repeat_penalty".parse::<ChatParameter>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.message.contains("repeat_penalty"));
    }

    #[test]
    fn clamps_temperature_to_upper_bound() {
        let range = ChatParameter::Temperature.range();
        assert_eq!(range.normalize(5.0).unwrap(), 2.0);
        assert_eq!(range.normalize(-1.0).unwrap(), 0.0);
    }

    #[test]
    fn snaps_to_step() {
        assert_eq!(ChatParameter::Temperature.range().normalize(0.74).unwrap(), 0.7);
        assert_eq!(ChatParameter::TopP.range().normalize(0.93).unwrap(), 0.95);
        assert_eq!(ChatParameter::TopK.range().normalize(12.6).unwrap(), 13.0);
        assert_eq!(
            ChatParameter::FrequencyPenalty.range().normalize(-0.04).unwrap(),
            0.0
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let range = ChatParameter::MaxTokens.range();
        assert!(range.normalize(f64::NAN).unwrap_err().is_validation());
        assert!(range.normalize(f64::INFINITY).is_err());
    }
}
