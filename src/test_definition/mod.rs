// src/test_definition/mod.rs

pub mod protocols;

pub use protocols::Protocol;

use crate::side_names::Side;

/// Numeric conversion applied to a field right after it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    /// Rig exports angles in radians; reports use degrees.
    RadToDeg,
    /// Sign flip to bring one side into the common rig convention.
    Negate,
}

impl Transform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Transform::Identity => value,
            Transform::RadToDeg => value.to_degrees(),
            Transform::Negate => -value,
        }
    }
}

/// A named physical quantity read from a fixed token position of every step block.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub field_index: usize,
    pub transform: Transform,
}

impl ChannelSpec {
    pub const fn new(name: &'static str, field_index: usize, transform: Transform) -> Self {
        Self {
            name,
            field_index,
            transform,
        }
    }
}

/// Which channel table a regression reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableVariant {
    /// Absolute rig values, e.g. wheel load against wheel travel.
    Raw,
    /// Values relative to the reference (neutral) row.
    Offset,
}

/// Inclusive bounds on the independent axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionWindow {
    pub low: f64,
    pub high: f64,
}

impl RegressionWindow {
    pub const fn symmetric(half_width: f64) -> Self {
        Self {
            low: -half_width,
            high: half_width,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Independent-axis channel per side.
#[derive(Debug, Clone, PartialEq)]
pub struct IndependentAxis {
    pub left: &'static str,
    pub right: &'static str,
    pub label: &'static str,
}

impl IndependentAxis {
    pub fn channel(&self, side: Side) -> &'static str {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// One derived parameter reported for both wheels.
#[derive(Debug, Clone, PartialEq)]
pub struct SidePair {
    pub parameter: &'static str,
    pub left: &'static str,
    pub right: &'static str,
    pub table: TableVariant,
    /// Multiplier from the fitted slope unit to the reporting unit.
    pub display_scale: f64,
    /// Reporting unit after `display_scale` is applied.
    pub unit: &'static str,
    /// Axis label of the dependent channel, in table units.
    pub label: &'static str,
}

impl SidePair {
    pub fn dependent(&self, side: Side) -> &'static str {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Everything protocol specific: field positions, reference row, window and outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct TestDefinition {
    pub protocol: Protocol,
    pub title: &'static str,
    pub channels: Vec<ChannelSpec>,
    pub reference_channel: &'static str,
    pub independent_axis: IndependentAxis,
    pub window: RegressionWindow,
    pub side_pairs: Vec<SidePair>,
    pub rounding_decimals: u32,
}

impl TestDefinition {
    pub fn channel(&self, name: &str) -> Option<&ChannelSpec> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Output parameter name as used in the result tables, e.g. `bump_Wheel_Rate_li`.
    pub fn parameter_name(&self, pair: &SidePair, side: Side) -> String {
        format!("{}_{}_{}", self.protocol.key(), pair.parameter, side.suffix())
    }

    /// Highest field index any channel reads; blocks must have more tokens than this.
    pub fn max_field_index(&self) -> Option<usize> {
        self.channels.iter().map(|c| c.field_index).max()
    }

    /// Checks that every name referenced by the definition is a declared, unique channel.
    pub fn validate(&self) -> Result<(), crate::error::KcError> {
        use crate::error::KcError;

        for (i, channel) in self.channels.iter().enumerate() {
            if self.channels[..i].iter().any(|c| c.name == channel.name) {
                return Err(KcError::InvalidDefinition(format!(
                    "duplicate channel '{}'",
                    channel.name
                )));
            }
        }
        if !(self.window.low <= self.window.high) {
            return Err(KcError::InvalidDefinition(format!(
                "window [{}, {}] is empty",
                self.window.low, self.window.high
            )));
        }
        let referenced = std::iter::once(self.reference_channel)
            .chain([self.independent_axis.left, self.independent_axis.right])
            .chain(self.side_pairs.iter().flat_map(|p| [p.left, p.right]));
        for name in referenced {
            if self.channel(name).is_none() {
                return Err(KcError::InvalidDefinition(format!(
                    "'{}' is not a declared channel of {}",
                    name,
                    self.protocol.key()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_apply() {
        assert_eq!(Transform::Identity.apply(1.5), 1.5);
        assert_eq!(Transform::Negate.apply(1.5), -1.5);
        assert!((Transform::RadToDeg.apply(std::f64::consts::PI) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_inclusive() {
        let window = RegressionWindow::symmetric(10.0);
        assert!(window.contains(-10.0));
        assert!(window.contains(10.0));
        assert!(!window.contains(10.000001));
    }

    #[test]
    fn test_validate_rejects_duplicate_channel() {
        let mut def = Protocol::Bump.definition().clone();
        def.channels.push(ChannelSpec::new("toe_li", 1, Transform::Identity));
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_undeclared_reference() {
        let mut def = Protocol::Roll.definition().clone();
        def.reference_channel = "steer_wheel_angle";
        assert!(def.validate().is_err());
    }
}

// src/test_definition/mod.rs
