use std::io::Read;

use bimap::BiHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::technology::{LayerRules, ViaRules};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("layer {0} is not part of the stack")]
pub struct UnknownLayerError(pub usize);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not complete via stack from {from} to {to}")]
pub struct IncompleteViaStackError {
    pub from: String,
    pub to: String,
}

#[derive(Error, Debug)]
pub enum TechnologyError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("layer {0:?} is declared twice")]
    DuplicateLayer(String),
    #[error("via {via:?} names unknown layer {layername:?}")]
    UnknownViaLayer { via: String, layername: String },
    #[error("via {0:?} does not go upward")]
    InvertedVia(String),
    #[error("layer {0:?} has more than one upward via")]
    AmbiguousVia(String),
}

pub trait AccessTechnology {
    /// User units per database unit.
    fn resolution(&self) -> f64;
    fn layer_count(&self) -> usize;
    fn layer(&self, layer: usize) -> Option<&LayerRules>;
    fn layer_layername(&self, layer: usize) -> Option<&str>;
    fn layername_layer(&self, layername: &str) -> Option<usize>;
    /// Via leaving `layer` upward, together with the layer it lands on.
    fn via_up(&self, layer: usize) -> Option<(&ViaRules, usize)>;

    fn layer_rules(&self, layer: usize) -> Result<&LayerRules, UnknownLayerError> {
        self.layer(layer).ok_or(UnknownLayerError(layer))
    }

    /// Chain of cuts from `lower` up to `upper`, following each layer's
    /// upward via.
    fn via_stack(
        &self,
        lower: usize,
        upper: usize,
    ) -> Result<Vec<(&ViaRules, usize, usize)>, IncompleteViaStackError> {
        let mut stack = vec![];
        let mut current = lower;

        while current < upper {
            let Some((via, next)) = self.via_up(current) else {
                break;
            };

            if next > upper {
                break;
            }

            stack.push((via, current, next));
            current = next;
        }

        if current != upper {
            return Err(IncompleteViaStackError {
                from: self.layername_or_index(lower),
                to: self.layername_or_index(upper),
            });
        }

        Ok(stack)
    }

    fn layername_or_index(&self, layer: usize) -> String {
        self.layer_layername(layer)
            .map(str::to_string)
            .unwrap_or_else(|| layer.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TechnologyFile {
    #[serde(default = "default_resolution")]
    resolution: f64,
    layers: Vec<LayerRules>,
    #[serde(default)]
    vias: Vec<ViaRules>,
}

fn default_resolution() -> f64 {
    0.001
}

/// Layer stack, ordered from bottom to top, with the cuts between layers.
#[derive(Debug, Clone)]
pub struct Technology {
    resolution: f64,
    layers: Vec<LayerRules>,
    vias: Vec<ViaRules>,
    layernames: BiHashMap<usize, String>,
    up_vias: Vec<Option<(usize, usize)>>,
}

impl Technology {
    pub fn new(
        resolution: f64,
        layers: Vec<LayerRules>,
        vias: Vec<ViaRules>,
    ) -> Result<Self, TechnologyError> {
        let mut layernames = BiHashMap::new();

        for (index, layer) in layers.iter().enumerate() {
            if layernames.contains_right(&layer.name) {
                return Err(TechnologyError::DuplicateLayer(layer.name.clone()));
            }
            layernames.insert(index, layer.name.clone());
        }

        let mut up_vias = vec![None; layers.len()];

        for (index, via) in vias.iter().enumerate() {
            let lookup = |layername: &String| {
                layernames
                    .get_by_right(layername)
                    .copied()
                    .ok_or_else(|| TechnologyError::UnknownViaLayer {
                        via: via.name.clone(),
                        layername: layername.clone(),
                    })
            };
            let bottom = lookup(&via.bottom)?;
            let top = lookup(&via.top)?;

            if top <= bottom {
                return Err(TechnologyError::InvertedVia(via.name.clone()));
            }

            if up_vias[bottom].is_some() {
                return Err(TechnologyError::AmbiguousVia(via.bottom.clone()));
            }

            up_vias[bottom] = Some((index, top));
        }

        Ok(Self {
            resolution,
            layers,
            vias,
            layernames,
            up_vias,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, TechnologyError> {
        let file: TechnologyFile = serde_json::from_str(json)?;
        Self::new(file.resolution, file.layers, file.vias)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, TechnologyError> {
        let file: TechnologyFile = serde_json::from_reader(reader)?;
        Self::new(file.resolution, file.layers, file.vias)
    }

    pub fn layers(&self) -> &[LayerRules] {
        &self.layers
    }

    pub fn vias(&self) -> &[ViaRules] {
        &self.vias
    }
}

impl AccessTechnology for Technology {
    fn resolution(&self) -> f64 {
        self.resolution
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, layer: usize) -> Option<&LayerRules> {
        self.layers.get(layer)
    }

    fn layer_layername(&self, layer: usize) -> Option<&str> {
        self.layernames.get_by_left(&layer).map(|s| s.as_str())
    }

    fn layername_layer(&self, layername: &str) -> Option<usize> {
        self.layernames.get_by_right(layername).copied()
    }

    fn via_up(&self, layer: usize) -> Option<(&ViaRules, usize)> {
        let (via, top) = (*self.up_vias.get(layer)?)?;
        Some((&self.vias[via], top))
    }
}
