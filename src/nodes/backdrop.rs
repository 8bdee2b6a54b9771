//! Backdrop node: a labelled frame drawn behind other nodes. It has no
//! plugs and computes nothing.

use serde::{Deserialize, Serialize};

use crate::graph::{TableHandle, TableMap};
use crate::nodes::{ComputeContext, NodeCompute, NodeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropSettings {
    pub width: f64,
    pub height: f64,
    pub text: String,
}

impl Default for BackdropSettings {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 100.0,
            text: String::new(),
        }
    }
}

impl NodeCompute for BackdropSettings {
    fn compute(&self, _ctx: &ComputeContext, _inputs: &[Option<TableHandle>]) -> NodeResult<TableMap> {
        Ok(TableMap::new())
    }
}
