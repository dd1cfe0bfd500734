// src/test_definition/protocols.rs
//
// Field positions of the quasi-static step blocks. All positions are 0-based
// token indices after splitting a block on whitespace. A change in the rig
// export layout only touches the tables in this file.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::{
    ChannelSpec, IndependentAxis, RegressionWindow, SidePair, TableVariant, TestDefinition,
    Transform,
};
use crate::constants::{
    FORCE_DECIMALS, FORCE_WINDOW_N, PER_KN_SCALE, PER_METRE_SCALE, ROLL_WINDOW_MM,
    TRAVEL_DECIMALS, VERTICAL_WINDOW_MM,
};

// Wheel centre and wheel load fields.
const WHEEL_TRAVEL: (usize, usize) = (918, 919);
const WHEEL_CENTER_X: (usize, usize) = (922, 923);
const WHEEL_CENTER_Y: (usize, usize) = (924, 925);
const VERTICAL_FORCE: (usize, usize) = (934, 935);
// Alignment angles (radians in the export).
const TOE: (usize, usize) = (1025, 1026);
const CAMBER: (usize, usize) = (1027, 1028);
// Tyre contact patch and tyre forces.
const CONTACT_PATCH_Y: (usize, usize) = (1057, 1062);
// Inferred from the tyre force layout next to TIRE_FORCE_Y; not yet confirmed against a braking export.
const TIRE_FORCE_X: (usize, usize) = (1096, 1108);
const TIRE_FORCE_Y: (usize, usize) = (1097, 1109);

/// Supported K&C load cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Vertical in-phase wheel travel (parallel bump).
    Bump,
    /// Vertical anti-phase wheel travel (body roll).
    Roll,
    /// Lateral force at the contact patch, both wheels same direction.
    LateralInPhase,
    /// Lateral force at the contact patch, wheels in opposite directions.
    LateralAntiPhase,
    /// Longitudinal (braking) force at the contact patch.
    Braking,
}

pub const ALL_PROTOCOLS: [Protocol; 5] = [
    Protocol::Bump,
    Protocol::Roll,
    Protocol::LateralInPhase,
    Protocol::LateralAntiPhase,
    Protocol::Braking,
];

impl Protocol {
    /// Short key used in parameter names and output file names.
    pub fn key(self) -> &'static str {
        match self {
            Protocol::Bump => "bump",
            Protocol::Roll => "roll",
            Protocol::LateralInPhase => "lat_inphase",
            Protocol::LateralAntiPhase => "lat_antiphase",
            Protocol::Braking => "braking",
        }
    }

    /// The static definition of this load case.
    pub fn definition(self) -> &'static TestDefinition {
        static BUMP: OnceLock<TestDefinition> = OnceLock::new();
        static ROLL: OnceLock<TestDefinition> = OnceLock::new();
        static LAT_INPHASE: OnceLock<TestDefinition> = OnceLock::new();
        static LAT_ANTIPHASE: OnceLock<TestDefinition> = OnceLock::new();
        static BRAKING: OnceLock<TestDefinition> = OnceLock::new();

        match self {
            Protocol::Bump => BUMP.get_or_init(bump_definition),
            Protocol::Roll => ROLL.get_or_init(roll_definition),
            Protocol::LateralInPhase => {
                LAT_INPHASE.get_or_init(|| lateral_definition(Protocol::LateralInPhase))
            }
            Protocol::LateralAntiPhase => {
                LAT_ANTIPHASE.get_or_init(|| lateral_definition(Protocol::LateralAntiPhase))
            }
            Protocol::Braking => BRAKING.get_or_init(braking_definition),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bump" | "parallel_bump" | "vertical" => Ok(Protocol::Bump),
            "roll" | "bump_anti" | "bump_antiphase" => Ok(Protocol::Roll),
            "lat_inphase" | "lateral_inphase" | "lat_in_phase" => Ok(Protocol::LateralInPhase),
            "lat_antiphase" | "lateral_antiphase" | "lat_anti_phase" => {
                Ok(Protocol::LateralAntiPhase)
            }
            "braking" | "brake" | "longitudinal" => Ok(Protocol::Braking),
            other => Err(format!(
                "unknown test protocol '{}', expected one of: {}",
                other,
                ALL_PROTOCOLS.map(|p| p.key()).join(", ")
            )),
        }
    }
}

fn pair(name: [&'static str; 2], fields: (usize, usize), transform: [Transform; 2]) -> [ChannelSpec; 2] {
    [
        ChannelSpec::new(name[0], fields.0, transform[0]),
        ChannelSpec::new(name[1], fields.1, transform[1]),
    ]
}

const PLAIN: [Transform; 2] = [Transform::Identity, Transform::Identity];
const ANGLE: [Transform; 2] = [Transform::RadToDeg, Transform::RadToDeg];

fn travel_axis() -> IndependentAxis {
    IndependentAxis {
        left: "wheel_travel_li",
        right: "wheel_travel_re",
        label: "Wheel Travel [mm]",
    }
}

fn wheel_rate_pair() -> SidePair {
    SidePair {
        parameter: "Wheel_Rate",
        left: "vertical_force_li",
        right: "vertical_force_re",
        table: TableVariant::Raw,
        display_scale: 1.0,
        unit: "N/mm",
        label: "Vertical Force [N]",
    }
}

fn alignment_pairs(scale: f64, unit: &'static str) -> [SidePair; 2] {
    [
        SidePair {
            parameter: "Toe_Change",
            left: "toe_li",
            right: "toe_re",
            table: TableVariant::Offset,
            display_scale: scale,
            unit,
            label: "Toe [deg]",
        },
        SidePair {
            parameter: "Camber_Change",
            left: "camber_li",
            right: "camber_re",
            table: TableVariant::Offset,
            display_scale: scale,
            unit,
            label: "Camber [deg]",
        },
    ]
}

fn bump_definition() -> TestDefinition {
    let mut channels = Vec::new();
    channels.extend(pair(["wheel_travel_li", "wheel_travel_re"], WHEEL_TRAVEL, PLAIN));
    channels.extend(pair(["toe_li", "toe_re"], TOE, ANGLE));
    channels.extend(pair(["camber_li", "camber_re"], CAMBER, ANGLE));
    channels.extend(pair(["vertical_force_li", "vertical_force_re"], VERTICAL_FORCE, PLAIN));
    channels.extend(pair(["wheel_base_li", "wheel_base_re"], WHEEL_CENTER_X, PLAIN));
    // Left contact patch y points inboard in rig coordinates.
    channels.extend(pair(
        ["tire_cp_y_li", "tire_cp_y_re"],
        CONTACT_PATCH_Y,
        [Transform::Negate, Transform::Identity],
    ));

    let mut side_pairs = vec![wheel_rate_pair()];
    side_pairs.extend(alignment_pairs(PER_METRE_SCALE, "deg/m"));
    side_pairs.push(SidePair {
        parameter: "Wheel_Base_Change",
        left: "wheel_base_li",
        right: "wheel_base_re",
        table: TableVariant::Offset,
        display_scale: PER_METRE_SCALE,
        unit: "mm/m",
        label: "Wheel Centre X [mm]",
    });
    side_pairs.push(SidePair {
        parameter: "Track_Change",
        left: "tire_cp_y_li",
        right: "tire_cp_y_re",
        table: TableVariant::Offset,
        display_scale: PER_METRE_SCALE,
        unit: "mm/m",
        label: "Contact Patch Y [mm]",
    });

    TestDefinition {
        protocol: Protocol::Bump,
        title: "Bump (Vertical In-Phase)",
        channels,
        reference_channel: "wheel_travel_li",
        independent_axis: travel_axis(),
        window: RegressionWindow::symmetric(VERTICAL_WINDOW_MM),
        side_pairs,
        rounding_decimals: TRAVEL_DECIMALS,
    }
}

fn roll_definition() -> TestDefinition {
    let mut channels = Vec::new();
    channels.extend(pair(["wheel_travel_li", "wheel_travel_re"], WHEEL_TRAVEL, PLAIN));
    channels.extend(pair(["toe_li", "toe_re"], TOE, ANGLE));
    channels.extend(pair(["camber_li", "camber_re"], CAMBER, ANGLE));
    channels.extend(pair(["vertical_force_li", "vertical_force_re"], VERTICAL_FORCE, PLAIN));

    let mut side_pairs = vec![wheel_rate_pair()];
    side_pairs.extend(alignment_pairs(PER_METRE_SCALE, "deg/m"));

    TestDefinition {
        protocol: Protocol::Roll,
        title: "Roll (Vertical Anti-Phase)",
        channels,
        reference_channel: "wheel_travel_li",
        independent_axis: travel_axis(),
        window: RegressionWindow::symmetric(ROLL_WINDOW_MM),
        side_pairs,
        rounding_decimals: TRAVEL_DECIMALS,
    }
}

fn lateral_definition(protocol: Protocol) -> TestDefinition {
    let mut channels = Vec::new();
    // Left lateral force and right wheel centre y are mirrored across the vehicle centre plane.
    channels.extend(pair(
        ["tire_force_y_li", "tire_force_y_re"],
        TIRE_FORCE_Y,
        [Transform::Negate, Transform::Identity],
    ));
    channels.extend(pair(["toe_li", "toe_re"], TOE, ANGLE));
    channels.extend(pair(["camber_li", "camber_re"], CAMBER, ANGLE));
    channels.extend(pair(
        ["wc_track_li", "wc_track_re"],
        WHEEL_CENTER_Y,
        [Transform::Identity, Transform::Negate],
    ));

    let mut side_pairs = vec![SidePair {
        parameter: "Compliance",
        left: "wc_track_li",
        right: "wc_track_re",
        table: TableVariant::Offset,
        display_scale: PER_KN_SCALE,
        unit: "mm/kN",
        label: "Wheel Centre Y [mm]",
    }];
    side_pairs.extend(alignment_pairs(PER_KN_SCALE, "deg/kN"));

    let title = match protocol {
        Protocol::LateralAntiPhase => "Lateral Force (Anti-Phase)",
        _ => "Lateral Force (In-Phase)",
    };

    TestDefinition {
        protocol,
        title,
        channels,
        reference_channel: "tire_force_y_li",
        independent_axis: IndependentAxis {
            left: "tire_force_y_li",
            right: "tire_force_y_re",
            label: "Lateral Force [N]",
        },
        window: RegressionWindow::symmetric(FORCE_WINDOW_N),
        side_pairs,
        rounding_decimals: FORCE_DECIMALS,
    }
}

fn braking_definition() -> TestDefinition {
    let mut channels = Vec::new();
    channels.extend(pair(["tire_force_x_li", "tire_force_x_re"], TIRE_FORCE_X, PLAIN));
    channels.extend(pair(["toe_li", "toe_re"], TOE, ANGLE));
    channels.extend(pair(["camber_li", "camber_re"], CAMBER, ANGLE));
    channels.extend(pair(["wheel_base_li", "wheel_base_re"], WHEEL_CENTER_X, PLAIN));

    let mut side_pairs = vec![SidePair {
        parameter: "Compliance",
        left: "wheel_base_li",
        right: "wheel_base_re",
        table: TableVariant::Offset,
        display_scale: PER_KN_SCALE,
        unit: "mm/kN",
        label: "Wheel Centre X [mm]",
    }];
    side_pairs.extend(alignment_pairs(PER_KN_SCALE, "deg/kN"));

    TestDefinition {
        protocol: Protocol::Braking,
        title: "Braking Force (Longitudinal)",
        channels,
        reference_channel: "tire_force_x_li",
        independent_axis: IndependentAxis {
            left: "tire_force_x_li",
            right: "tire_force_x_re",
            label: "Longitudinal Force [N]",
        },
        window: RegressionWindow::symmetric(FORCE_WINDOW_N),
        side_pairs,
        rounding_decimals: FORCE_DECIMALS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_definitions_validate() {
        for protocol in ALL_PROTOCOLS {
            let def = protocol.definition();
            assert_eq!(def.protocol, protocol);
            def.validate()
                .unwrap_or_else(|e| panic!("{} definition invalid: {}", protocol, e));
        }
    }

    #[test]
    fn test_protocol_from_str_round_trip() {
        for protocol in ALL_PROTOCOLS {
            assert_eq!(protocol.key().parse::<Protocol>(), Ok(protocol));
        }
        assert_eq!("Lat-InPhase".parse::<Protocol>(), Ok(Protocol::LateralInPhase));
        assert!("steering".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_bump_layout() {
        let def = Protocol::Bump.definition();
        assert_eq!(def.channel("wheel_travel_li").map(|c| c.field_index), Some(918));
        assert_eq!(def.channel("tire_cp_y_re").map(|c| c.field_index), Some(1062));
        assert_eq!(def.max_field_index(), Some(1062));
        assert_eq!(def.side_pairs.len(), 5);
        assert_eq!(def.side_pairs[0].table, TableVariant::Raw);
        assert_eq!(def.parameter_name(&def.side_pairs[0], crate::side_names::Side::Right), "bump_Wheel_Rate_re");
    }

    #[test]
    fn test_lateral_sign_conventions() {
        let def = Protocol::LateralAntiPhase.definition();
        assert_eq!(def.channel("tire_force_y_li").map(|c| c.transform), Some(Transform::Negate));
        assert_eq!(def.channel("tire_force_y_re").map(|c| c.transform), Some(Transform::Identity));
        assert_eq!(def.channel("wc_track_re").map(|c| c.transform), Some(Transform::Negate));
        assert_eq!(def.window, RegressionWindow::symmetric(500.0));
        assert_eq!(def.rounding_decimals, 5);
    }
}

// src/test_definition/protocols.rs
