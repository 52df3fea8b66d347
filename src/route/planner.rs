use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::Direction,
    route::{Enclosure, ViaLevel},
    technology::{AccessTechnology, IncompleteViaStackError, ViaArray},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid enclosure policy {0:?}")]
pub struct InvalidEnclosurePolicyError(pub String);

/// How metal is extended around via cuts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnclosurePolicy {
    /// The same extension on all four sides.
    #[default]
    #[serde(rename = "uniform")]
    Uniform,
    /// A large extension along the wire and a small one across it, on the
    /// outermost metals of the stack.
    #[serde(rename = "asymmetric", alias = "asymm")]
    Asymmetric,
}

impl FromStr for EnclosurePolicy {
    type Err = InvalidEnclosurePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(EnclosurePolicy::Uniform),
            "asymmetric" | "asymm" => Ok(EnclosurePolicy::Asymmetric),
            other => Err(InvalidEnclosurePolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for EnclosurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnclosurePolicy::Uniform => write!(f, "uniform"),
            EnclosurePolicy::Asymmetric => write!(f, "asymmetric"),
        }
    }
}

/// A planned change of direction and/or layer at the route head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSpec {
    pub incoming: Direction,
    pub outgoing: Direction,
    pub from_layer: usize,
    pub to_layer: usize,
    pub policy: EnclosurePolicy,
    /// Cut levels from bottom to top, empty when the layer stays.
    pub levels: Vec<ViaLevel>,
}

impl TurnSpec {
    pub fn is_via(&self) -> bool {
        self.from_layer != self.to_layer
    }

    pub fn is_turn(&self) -> bool {
        self.incoming != self.outgoing
    }
}

/// Resolves the via stack between `from_layer` and `to_layer` and sizes the
/// enclosure of every level.
///
/// Under the asymmetric policy the bottom metal takes its orientation from
/// the wire on the lower layer and the top metal from the wire on the upper
/// layer. Intermediate landing metals stay uniform.
pub fn plan_turn(
    technology: &impl AccessTechnology,
    incoming: Direction,
    from_layer: usize,
    outgoing: Direction,
    to_layer: usize,
    policy: EnclosurePolicy,
    array: Option<ViaArray>,
) -> Result<TurnSpec, IncompleteViaStackError> {
    let mut levels = vec![];

    if from_layer != to_layer {
        let (lower, upper) = (from_layer.min(to_layer), from_layer.max(to_layer));
        let (lower_direction, upper_direction) = if from_layer == lower {
            (incoming, outgoing)
        } else {
            (outgoing, incoming)
        };

        let stack = technology.via_stack(lower, upper)?;
        let last = stack.len() - 1;

        for (index, (via, bottom, top)) in stack.into_iter().enumerate() {
            let uniform = Enclosure::uniform(via.uniform_enclosure);
            let asymmetric = |direction: Direction| {
                Enclosure::along(
                    direction.axis(),
                    via.asymmetric_enclosure.large,
                    via.asymmetric_enclosure.small,
                )
            };

            let (bottom_enclosure, top_enclosure) = match policy {
                EnclosurePolicy::Uniform => (uniform, uniform),
                EnclosurePolicy::Asymmetric => (
                    if index == 0 {
                        asymmetric(lower_direction)
                    } else {
                        uniform
                    },
                    if index == last {
                        asymmetric(upper_direction)
                    } else {
                        uniform
                    },
                ),
            };

            levels.push(ViaLevel {
                name: via.name.clone(),
                bottom,
                top,
                cut_size: via.cut_size,
                cut_pitch: via.cut_pitch,
                array: array.unwrap_or(via.default_array),
                bottom_enclosure,
                top_enclosure,
            });
        }
    }

    Ok(TurnSpec {
        incoming,
        outgoing,
        from_layer,
        to_layer,
        policy,
        levels,
    })
}
