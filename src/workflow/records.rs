use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub answer: String,
    /// Preset answers offered for selection; may be empty.
    pub choices: Vec<String>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            answer: String::new(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_answered(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOption {
    pub name: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

impl DecisionOption {
    pub fn new<I, S>(name: impl Into<String>, pros: I, cons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            pros: pros.into_iter().map(Into::into).collect(),
            cons: cons.into_iter().map(Into::into).collect(),
        }
    }
}

/// Importance tier. Always one of 1, 2 or 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Clamps any integer into a tier: `>= 3` is high, `2` medium, anything
    /// lower is low.
    pub fn from_level(level: i64) -> Self {
        match level {
            l if l >= 3 => Importance::High,
            2 => Importance::Medium,
            _ => Importance::Low,
        }
    }

    /// Coerces numbers, numeric strings and tier names. Unrecognized values
    /// fall to the lowest tier.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => match number.as_i64() {
                Some(level) => Self::from_level(level),
                None => number
                    .as_f64()
                    .filter(|level| level.is_finite())
                    .map(|level| Self::from_level(level.floor() as i64))
                    .unwrap_or(Importance::Low),
            },
            Some(Value::String(raw)) => Self::parse(raw),
            _ => Importance::Low,
        }
    }

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(level) = raw.parse::<i64>() {
            return Self::from_level(level);
        }
        match raw.to_ascii_lowercase().as_str() {
            "high" | "critical" | "very high" => Importance::High,
            "medium" | "moderate" => Importance::Medium,
            _ => Importance::Low,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Importance::Low => 1,
            Importance::Medium => 2,
            Importance::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Importance::Low => "Low",
            Importance::Medium => "Medium",
            Importance::High => "High",
        }
    }

    pub fn weight_percent(self) -> u8 {
        match self {
            Importance::Low => 33,
            Importance::Medium => 67,
            Importance::High => 100,
        }
    }

    pub fn tone(self) -> &'static str {
        match self {
            Importance::Low => "muted",
            Importance::Medium => "accent",
            Importance::High => "emphasis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priority {
    pub name: String,
    pub importance: Importance,
}

impl Priority {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            name: name.into(),
            importance: Importance::from_level(level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bias {
    pub name: String,
    pub explanation: String,
}

impl Bias {
    pub fn new(name: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionCanvas {
    pub options: Vec<DecisionOption>,
    pub priorities: Vec<Priority>,
}

/// Canonical record committed for a stage. Leaving stage n commits the record
/// of stage n+1 (and, from `Clarify`, the decision statement as well).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageRecord {
    Decision(String),
    Questions(Vec<Question>),
    Canvas(DecisionCanvas),
    Biases(Vec<Bias>),
    Recommendation(String),
}

impl StageRecord {
    pub fn is_empty(&self) -> bool {
        match self {
            StageRecord::Decision(text) | StageRecord::Recommendation(text) => {
                text.trim().is_empty()
            }
            StageRecord::Questions(questions) => questions.is_empty(),
            StageRecord::Canvas(canvas) => {
                canvas.options.is_empty() && canvas.priorities.is_empty()
            }
            StageRecord::Biases(biases) => biases.is_empty(),
        }
    }
}
