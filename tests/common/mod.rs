// tests/common/mod.rs

#![allow(dead_code)]

use KC_Report_Render::constants::{STEP_BLOCK_CLOSE, STEP_BLOCK_OPEN};

/// Token count of one synthetic step block; covers every field index the protocols read.
pub const BLOCK_FIELDS: usize = 1120;

// Field positions used by the bump and lateral protocols.
pub const WHEEL_TRAVEL: (usize, usize) = (918, 919);
pub const WHEEL_CENTER_X: (usize, usize) = (922, 923);
pub const WHEEL_CENTER_Y: (usize, usize) = (924, 925);
pub const VERTICAL_FORCE: (usize, usize) = (934, 935);
pub const TOE: (usize, usize) = (1025, 1026);
pub const CAMBER: (usize, usize) = (1027, 1028);
pub const CONTACT_PATCH_Y: (usize, usize) = (1057, 1062);
pub const TIRE_FORCE_X: (usize, usize) = (1096, 1108);
pub const TIRE_FORCE_Y: (usize, usize) = (1097, 1109);

/// Content of one block: zeros except for the given fields.
pub fn block_content(field_count: usize, fields: &[(usize, f64)]) -> String {
    let mut tokens = vec!["0".to_string(); field_count];
    for &(index, value) in fields {
        tokens[index] = format!("{:e}", value);
    }
    tokens.join(" ")
}

/// Wraps block contents in the default step markers with some surrounding report noise.
pub fn report(blocks: &[String]) -> String {
    let mut out = String::from("Adams/Car K&C results\n<Header version=\"1\"/>\n");
    for content in blocks {
        out.push_str(STEP_BLOCK_OPEN);
        out.push('\n');
        out.push_str(content);
        out.push('\n');
        out.push_str(STEP_BLOCK_CLOSE);
        out.push('\n');
    }
    out.push_str("<End/>\n");
    out
}

/// Bump report: wheel travel `x`, forces `10 x` (left) and `12 x + 3` (right),
/// toe `0.001 x` rad, left contact patch y `-0.5 x` in rig coordinates.
pub fn bump_report(travel: &[f64]) -> String {
    let blocks: Vec<String> = travel
        .iter()
        .map(|&x| {
            block_content(
                BLOCK_FIELDS,
                &[
                    (WHEEL_TRAVEL.0, x),
                    (WHEEL_TRAVEL.1, x),
                    (VERTICAL_FORCE.0, 10.0 * x),
                    (VERTICAL_FORCE.1, 12.0 * x + 3.0),
                    (TOE.0, 0.001 * x),
                    (TOE.1, -0.001 * x),
                    (CONTACT_PATCH_Y.0, -0.5 * x),
                    (CONTACT_PATCH_Y.1, 0.25 * x),
                ],
            )
        })
        .collect();
    report(&blocks)
}

// tests/common/mod.rs
