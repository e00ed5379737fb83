//! Tonemapping operators and parameters

use std::fmt;
use std::str::FromStr;

use crate::hdr_pipeline::common::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneOperator {
    /// Log-luminance contrast compression (default)
    #[default]
    Mantiuk,
    /// Adaptive logarithmic mapping
    Drago,
    /// Global photographic operator
    Reinhard,
}

impl ToneOperator {
    pub const ALL: [ToneOperator; 3] = [
        ToneOperator::Mantiuk,
        ToneOperator::Drago,
        ToneOperator::Reinhard,
    ];

    /// Lowercase name, as used in output file names.
    pub fn name(&self) -> &'static str {
        match self {
            ToneOperator::Mantiuk => "mantiuk",
            ToneOperator::Drago => "drago",
            ToneOperator::Reinhard => "reinhard",
        }
    }
}

impl fmt::Display for ToneOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToneOperator {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        ToneOperator::ALL
            .into_iter()
            .find(|op| s.trim().eq_ignore_ascii_case(op.name()))
            .ok_or_else(|| PipelineError::UnknownOperator(s.to_string()))
    }
}

/// Parameters for one tonemapping pass.
///
/// `contrast` is interpreted per operator: the log-contrast scale for
/// Mantiuk, the bias for Drago and the key value for Reinhard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParameters {
    pub operator: ToneOperator,
    pub saturation: f32,
    pub contrast: f32,
    pub gamma: f32,
    /// Multiplier applied after the output is rescaled to a peak of 1.
    pub brightness: f32,
}

impl Default for ToneParameters {
    fn default() -> Self {
        Self::for_operator(ToneOperator::default())
    }
}

impl ToneParameters {
    /// Canonical parameters for an operator.
    pub fn for_operator(operator: ToneOperator) -> Self {
        let (saturation, contrast) = match operator {
            ToneOperator::Mantiuk => (1.6, 0.7),
            ToneOperator::Drago => (1.0, 0.85),
            ToneOperator::Reinhard => (1.0, 0.18),
        };
        Self {
            operator,
            saturation,
            contrast,
            gamma: 1.0,
            brightness: 1.0,
        }
    }

    pub fn builder(operator: ToneOperator) -> ToneParametersBuilder {
        ToneParametersBuilder {
            operator,
            ..Default::default()
        }
    }

    /// Every parameter must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("gamma", self.gamma),
            ("brightness", self.brightness),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::InvalidToneParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Builder for ToneParameters
#[derive(Default)]
pub struct ToneParametersBuilder {
    operator: ToneOperator,
    saturation: Option<f32>,
    contrast: Option<f32>,
    gamma: Option<f32>,
    brightness: Option<f32>,
}

impl ToneParametersBuilder {
    pub fn saturation(mut self, saturation: f32) -> Self {
        self.saturation = Some(saturation);
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = Some(contrast);
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn build(self) -> ToneParameters {
        let default = ToneParameters::for_operator(self.operator);
        ToneParameters {
            operator: self.operator,
            saturation: self.saturation.unwrap_or(default.saturation),
            contrast: self.contrast.unwrap_or(default.contrast),
            gamma: self.gamma.unwrap_or(default.gamma),
            brightness: self.brightness.unwrap_or(default.brightness),
        }
    }
}
