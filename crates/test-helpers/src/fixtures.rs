//! Configuration fixtures.
//!
//! Every fixture uses the same two nine-base DNA strands, `top` and
//! `bottom`, which are exact complements.

use strandsim_config::{validate, ConfigurationObject};
use strandsim_types::{RawFields, RawValue};

pub const TOP: &str = "GTTCGGAAC";
pub const BOTTOM: &str = "GTTCCGAAC";
pub const DUPLEX: &str = "(((((((((+)))))))))";

/// Validate raw fields, panicking with the full report on failure.
pub fn validated(raw: RawFields) -> ConfigurationObject {
    match validate(&raw) {
        Ok(config) => config,
        Err(report) => panic!("fixture failed validation: {}", report),
    }
}

fn strands() -> RawValue {
    RawValue::map([("top", TOP), ("bottom", BOTTOM)])
}

fn metropolis(raw: RawFields) -> RawFields {
    raw.with("rate_method", "Metropolis")
        .with("unimolecular_scaling", 2.41e6)
        .with("bimolecular_scaling", 8.01e5)
}

fn condition(kind: &str, strands: &[&str]) -> RawValue {
    RawValue::map([
        ("kind", RawValue::from(kind)),
        ("strands", RawValue::list(strands.iter().copied())),
    ])
}

/// Melting of a fully paired duplex, first passage time mode.
///
/// Four trajectories; stop condition `melted` fires when `top` is alone.
pub fn duplex_fields() -> RawFields {
    metropolis(RawFields::new().with("experiment_tag", "duplex-melting"))
        .with("temperature", 298.15)
        .with("num_simulations", 4)
        .with("simulation_time", 1.0)
        .with("initial_seed", 42)
        .with("strands", strands())
        .with(
            "complexes",
            RawValue::map([(
                "duplex",
                RawValue::map([
                    ("strands", RawValue::list(["top", "bottom"])),
                    ("structure", RawValue::from(DUPLEX)),
                ]),
            )]),
        )
        .with(
            "stop_conditions",
            RawValue::map([("melted", condition("Dissociation", &["top"]))]),
        )
}

pub fn duplex_config() -> ConfigurationObject {
    validated(duplex_fields())
}

/// The duplex run in trajectory mode, snapshotting every 0.1 s.
pub fn trajectory_fields() -> RawFields {
    duplex_fields()
        .with("experiment_tag", "duplex-trajectory")
        .with("simulation_mode", "Trajectory")
        .with("output_time", 0.1)
}

pub fn trajectory_config() -> ConfigurationObject {
    validated(trajectory_fields())
}

/// Association of the two free strands from a forced collision.
///
/// FirstStep mode, four trajectories; `bound` fires on hybridization and
/// `failed` when `top` drifts off alone again.
pub fn association_fields() -> RawFields {
    metropolis(RawFields::new().with("experiment_tag", "association"))
        .with("temperature", 298.15)
        .with("join_concentration", 1e-6)
        .with("simulation_mode", "FirstStep")
        .with("num_simulations", 4)
        .with("simulation_time", 1.0)
        .with("strands", strands())
        .with(
            "complexes",
            RawValue::map([
                ("top", RawValue::map([("strands", RawValue::list(["top"]))])),
                (
                    "bottom",
                    RawValue::map([("strands", RawValue::list(["bottom"]))]),
                ),
            ]),
        )
        .with(
            "stop_conditions",
            RawValue::map([
                ("bound", condition("Bound", &["top", "bottom"])),
                ("failed", condition("Dissociation", &["top"])),
            ]),
        )
}

pub fn association_config() -> ConfigurationObject {
    validated(association_fields())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_validate() {
        assert_eq!(duplex_config().num_simulations(), 4);
        assert_eq!(trajectory_config().stop_conditions().len(), 1);
        assert_eq!(association_config().molecular().complexes().len(), 2);
    }
}
