//! Customer onboarding steps.
//!
//! The current step is never stored. It is derived from which of the
//! profile name, property type and preferred frequency already exist, and
//! the earliest missing one is where the customer resumes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    BasicInfo,
    PropertyDetails,
    ServicePreferences,
    Completed,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl OnboardingStep {
    pub fn resume(name: Option<&str>, property_type: Option<&str>, frequency: Option<&str>) -> Self {
        if !present(name) {
            OnboardingStep::BasicInfo
        } else if !present(property_type) {
            OnboardingStep::PropertyDetails
        } else if !present(frequency) {
            OnboardingStep::ServicePreferences
        } else {
            OnboardingStep::Completed
        }
    }

    pub fn next(self) -> Self {
        match self {
            OnboardingStep::BasicInfo => OnboardingStep::PropertyDetails,
            OnboardingStep::PropertyDetails => OnboardingStep::ServicePreferences,
            OnboardingStep::ServicePreferences | OnboardingStep::Completed => OnboardingStep::Completed,
        }
    }

    /// Previous form step. `Completed` has nothing to go back to.
    pub fn back(self) -> Option<Self> {
        match self {
            OnboardingStep::BasicInfo => Some(OnboardingStep::BasicInfo),
            OnboardingStep::PropertyDetails => Some(OnboardingStep::BasicInfo),
            OnboardingStep::ServicePreferences => Some(OnboardingStep::PropertyDetails),
            OnboardingStep::Completed => None,
        }
    }

    /// 1-based position among the three form steps.
    pub fn number(self) -> Option<u8> {
        match self {
            OnboardingStep::BasicInfo => Some(1),
            OnboardingStep::PropertyDetails => Some(2),
            OnboardingStep::ServicePreferences => Some(3),
            OnboardingStep::Completed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStep::BasicInfo => "basic-info",
            OnboardingStep::PropertyDetails => "property-details",
            OnboardingStep::ServicePreferences => "service-preferences",
            OnboardingStep::Completed => "completed",
        }
    }

    /// Whether a form for `step` may be submitted while the customer is at `self`.
    /// Earlier steps can always be resubmitted; later ones cannot be skipped to.
    pub fn allows(self, step: OnboardingStep) -> bool {
        step <= self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnboardingSnapshot {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub property_type: Option<String>,
    pub address: Option<String>,
    pub frequency: Option<String>,
    pub time_preference: Option<String>,
}

impl OnboardingSnapshot {
    pub fn step(&self) -> OnboardingStep {
        OnboardingStep::resume(
            self.name.as_deref(),
            self.property_type.as_deref(),
            self.frequency.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingStatus {
    pub step: OnboardingStep,
    pub step_number: Option<u8>,
    pub previous: Option<OnboardingStep>,
    pub data: OnboardingSnapshot,
}

impl From<OnboardingSnapshot> for OnboardingStatus {
    fn from(data: OnboardingSnapshot) -> Self {
        let step = data.step();
        Self {
            step,
            step_number: step.number(),
            previous: step.back().filter(|prev| *prev != step),
            data,
        }
    }
}
