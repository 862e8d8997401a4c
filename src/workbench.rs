//! Caller-owned working state: the stage list being edited, the last cascade
//! result, and the four conversion states.
//!
//! Nothing here is global. An editor, script or test creates a [`Workbench`],
//! mutates it, and asks it to recalculate.

use crate::cascade::{cascade_nodes, compute_cascade, CascadeResult};
use crate::conversion::{Conversion, PowerConversions};
use crate::error::ComputeError;
use crate::node::CascadeNode;
use crate::stage::Stage;

#[derive(Clone, Debug, PartialEq)]
pub struct Workbench {
    stages: Vec<Stage>,
    result: Option<CascadeResult>,
    conversions: PowerConversions,
}

impl Default for Workbench {
    /// A single low noise amplifier and default conversion inputs, nothing calculated yet.
    fn default() -> Self {
        Self::with_stages(vec![Stage::new("LNA", 20.0, 1.5, 10.0, 20.0)])
    }
}

impl Workbench {
    pub fn new() -> Workbench {
        Workbench::default()
    }

    pub fn with_stages(stages: Vec<Stage>) -> Workbench {
        Workbench {
            stages,
            result: None,
            conversions: PowerConversions::default(),
        }
    }

    pub fn with_conversions(mut self, conversions: PowerConversions) -> Workbench {
        self.conversions = conversions;
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Append a `Stage N` placeholder and return its index.
    pub fn add_stage(&mut self) -> usize {
        let index = self.stages.len();
        self.stages.push(Stage::placeholder(index + 1));
        index
    }

    pub fn push_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut Stage> {
        self.stages.get_mut(index)
    }

    pub fn remove_stage(&mut self, index: usize) -> Option<Stage> {
        if index < self.stages.len() {
            Some(self.stages.remove(index))
        } else {
            None
        }
    }

    /// Most recently calculated result, if any.
    pub fn result(&self) -> Option<&CascadeResult> {
        self.result.as_ref()
    }

    /// Recompute the cascade from the current stages.
    ///
    /// On any error, including an empty stage list, the previous result is
    /// kept as it was.
    pub fn calculate(&mut self) -> Result<&CascadeResult, ComputeError> {
        let result = compute_cascade(&self.stages)?;
        let stored: &CascadeResult = self.result.insert(result);
        Ok(stored)
    }

    /// Whether the stored result still matches the current stages.
    ///
    /// False when nothing has been calculated, or when the stages were edited
    /// since the last successful calculation.
    pub fn result_is_current(&self) -> bool {
        match &self.result {
            Some(stored) => compute_cascade(&self.stages).as_ref() == Ok(stored),
            None => false,
        }
    }

    /// Per-stage cumulative lineup for the current stages.
    pub fn lineup(&self) -> Result<Vec<CascadeNode>, ComputeError> {
        cascade_nodes(&self.stages)
    }

    pub fn conversions(&self) -> &PowerConversions {
        &self.conversions
    }

    /// Update one conversion kind and return its new result.
    pub fn set_conversion(&mut self, conversion: Conversion) -> Result<f64, ComputeError> {
        self.conversions.set(conversion)
    }
}
