//! Named proportion knobs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the nine proportion controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Knob {
    HeadSize,
    ShoulderWidth,
    TorsoWidth,
    TorsoLength,
    HipWidth,
    ArmLength,
    ArmThickness,
    LegLength,
    LegThickness,
}

impl Knob {
    pub const ALL: [Knob; 9] = [
        Knob::HeadSize,
        Knob::ShoulderWidth,
        Knob::TorsoWidth,
        Knob::TorsoLength,
        Knob::HipWidth,
        Knob::ArmLength,
        Knob::ArmThickness,
        Knob::LegLength,
        Knob::LegThickness,
    ];

    /// Human-readable label, e.g. `"Head Size"`
    pub fn display_name(self) -> &'static str {
        match self {
            Knob::HeadSize => "Head Size",
            Knob::ShoulderWidth => "Shoulder Width",
            Knob::TorsoWidth => "Torso Width",
            Knob::TorsoLength => "Torso Length",
            Knob::HipWidth => "Hip Width",
            Knob::ArmLength => "Arm Length",
            Knob::ArmThickness => "Arm Thickness",
            Knob::LegLength => "Leg Length",
            Knob::LegThickness => "Leg Thickness",
        }
    }

    /// Manifest key, e.g. `"head_size"`
    pub fn key(self) -> &'static str {
        match self {
            Knob::HeadSize => "head_size",
            Knob::ShoulderWidth => "shoulder_width",
            Knob::TorsoWidth => "torso_width",
            Knob::TorsoLength => "torso_length",
            Knob::HipWidth => "hip_width",
            Knob::ArmLength => "arm_length",
            Knob::ArmThickness => "arm_thickness",
            Knob::LegLength => "leg_length",
            Knob::LegThickness => "leg_thickness",
        }
    }
}

impl fmt::Display for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown proportion knob: {0:?}")]
pub struct UnknownKnob(pub String);

impl FromStr for Knob {
    type Err = UnknownKnob;

    /// Accepts display names (any case) and manifest keys
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Knob::ALL
            .into_iter()
            .find(|k| k.display_name().eq_ignore_ascii_case(trimmed) || k.key() == trimmed)
            .ok_or_else(|| UnknownKnob(s.to_string()))
    }
}

/// Knob values, all defaulting to 1.0 (no change)
///
/// The conventional range is `[0.5, 1.8]`; the deformer does not enforce it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProportionKnobs {
    pub head_size: f32,
    pub shoulder_width: f32,
    pub torso_width: f32,
    pub torso_length: f32,
    pub hip_width: f32,
    pub arm_length: f32,
    pub arm_thickness: f32,
    pub leg_length: f32,
    pub leg_thickness: f32,
}

impl Default for ProportionKnobs {
    fn default() -> Self {
        Self {
            head_size: 1.0,
            shoulder_width: 1.0,
            torso_width: 1.0,
            torso_length: 1.0,
            hip_width: 1.0,
            arm_length: 1.0,
            arm_thickness: 1.0,
            leg_length: 1.0,
            leg_thickness: 1.0,
        }
    }
}

impl ProportionKnobs {
    pub fn get(&self, knob: Knob) -> f32 {
        match knob {
            Knob::HeadSize => self.head_size,
            Knob::ShoulderWidth => self.shoulder_width,
            Knob::TorsoWidth => self.torso_width,
            Knob::TorsoLength => self.torso_length,
            Knob::HipWidth => self.hip_width,
            Knob::ArmLength => self.arm_length,
            Knob::ArmThickness => self.arm_thickness,
            Knob::LegLength => self.leg_length,
            Knob::LegThickness => self.leg_thickness,
        }
    }

    pub fn set(&mut self, knob: Knob, value: f32) {
        let slot = match knob {
            Knob::HeadSize => &mut self.head_size,
            Knob::ShoulderWidth => &mut self.shoulder_width,
            Knob::TorsoWidth => &mut self.torso_width,
            Knob::TorsoLength => &mut self.torso_length,
            Knob::HipWidth => &mut self.hip_width,
            Knob::ArmLength => &mut self.arm_length,
            Knob::ArmThickness => &mut self.arm_thickness,
            Knob::LegLength => &mut self.leg_length,
            Knob::LegThickness => &mut self.leg_thickness,
        };
        *slot = value;
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, knob: Knob, value: f32) -> Self {
        self.set(knob, value);
        self
    }

    /// Build from `(display name or key, value)` pairs; missing knobs stay 1.0
    pub fn from_named<'a, I>(pairs: I) -> Result<Self, UnknownKnob>
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut knobs = Self::default();
        for (name, value) in pairs {
            knobs.set(name.parse()?, value);
        }
        Ok(knobs)
    }

    /// Every knob with its value, in [`Knob::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Knob, f32)> + '_ {
        Knob::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// True when every knob is exactly 1.0
    pub fn is_identity(&self) -> bool {
        self.iter().all(|(_, v)| v == 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names_and_keys() {
        assert_eq!("Head Size".parse::<Knob>().unwrap(), Knob::HeadSize);
        assert_eq!("leg thickness".parse::<Knob>().unwrap(), Knob::LegThickness);
        assert_eq!("torso_length".parse::<Knob>().unwrap(), Knob::TorsoLength);
        assert!("Tail Length".parse::<Knob>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for knob in Knob::ALL {
            assert_eq!(knob.to_string().parse::<Knob>().unwrap(), knob);
        }
    }

    #[test]
    fn test_get_set() {
        let mut knobs = ProportionKnobs::default();
        assert!(knobs.is_identity());
        knobs.set(Knob::ArmLength, 1.3);
        assert_eq!(knobs.get(Knob::ArmLength), 1.3);
        assert_eq!(knobs.arm_length, 1.3);
        assert!(!knobs.is_identity());
    }

    #[test]
    fn test_from_named() {
        let knobs = ProportionKnobs::from_named([("Hip Width", 1.2), ("leg_length", 0.8)]).unwrap();
        assert_eq!(knobs.hip_width, 1.2);
        assert_eq!(knobs.leg_length, 0.8);
        assert_eq!(knobs.head_size, 1.0);

        let err = ProportionKnobs::from_named([("Neck", 2.0)]).unwrap_err();
        assert_eq!(err, UnknownKnob("Neck".to_string()));
    }

    #[test]
    fn test_toml_partial_table() {
        let knobs: ProportionKnobs = toml::from_str("head_size = 1.1\nleg_length = 1.2\n").unwrap();
        assert_eq!(knobs.head_size, 1.1);
        assert_eq!(knobs.leg_length, 1.2);
        assert_eq!(knobs.torso_width, 1.0);

        assert!(toml::from_str::<ProportionKnobs>("neck_length = 2.0").is_err());
    }
}
