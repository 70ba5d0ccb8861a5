//! Cuts, joints, cut timbers and the frame they assemble into.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use kerf_ir::{difference, prism, Aabb, CsgNode};
use kerf_kernel_math::{integer, vec3i, Orientation, Scalar};
use kerf_kernel_timber::{ReferenceEnd, Timber};

use crate::Accessory;

// =============================================================================
// Operations
// =============================================================================

/// A labeled negative solid in a timber's local frame.
///
/// `end_cut` marks a cut that replaces one end of the timber; the rendered
/// timber body is left open at that end so the cut defines it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cut {
    /// Human-readable label.
    pub label: String,
    /// Material removed, in timber-local coordinates.
    pub negative: CsgNode,
    /// End this cut shapes, if any.
    pub end_cut: Option<ReferenceEnd>,
}

impl Cut {
    /// Create a cut.
    pub fn new(label: impl Into<String>, negative: CsgNode, end_cut: Option<ReferenceEnd>) -> Self {
        Self {
            label: label.into(),
            negative,
            end_cut,
        }
    }
}

/// One thing a joint does to a timber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimberOperation {
    /// Remove material.
    Cut(Cut),
    /// Attach a loose part.
    Accessory(Accessory),
}

// =============================================================================
// Joint
// =============================================================================

/// The operations a joint applies to one timber.
#[derive(Debug, Clone)]
pub struct JointEntry {
    /// The timber, shared with every other joint that touches it.
    pub timber: Arc<Timber>,
    /// Operations in the order they were added.
    pub operations: Vec<TimberOperation>,
}

/// The result of a joint construction: per-timber operation lists.
///
/// Timbers are identified by `Arc` identity, not by value.
#[derive(Debug, Clone, Default)]
pub struct Joint {
    entries: Vec<JointEntry>,
}

impl Joint {
    /// An empty joint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation to a timber's list, adding the timber if needed.
    pub fn push(&mut self, timber: &Arc<Timber>, operation: TimberOperation) {
        match self
            .entries
            .iter_mut()
            .find(|e| Arc::ptr_eq(&e.timber, timber))
        {
            Some(entry) => entry.operations.push(operation),
            None => self.entries.push(JointEntry {
                timber: Arc::clone(timber),
                operations: vec![operation],
            }),
        }
    }

    /// Include a timber the joint leaves uncut.
    pub fn with_timber(mut self, timber: &Arc<Timber>) -> Self {
        if !self.entries.iter().any(|e| Arc::ptr_eq(&e.timber, timber)) {
            self.entries.push(JointEntry {
                timber: Arc::clone(timber),
                operations: Vec::new(),
            });
        }
        self
    }

    /// Builder form of [`Joint::push`] for a cut.
    pub fn with_cut(mut self, timber: &Arc<Timber>, cut: Cut) -> Self {
        self.push(timber, TimberOperation::Cut(cut));
        self
    }

    /// Builder form of [`Joint::push`] for an accessory.
    pub fn with_accessory(mut self, timber: &Arc<Timber>, accessory: Accessory) -> Self {
        self.push(timber, TimberOperation::Accessory(accessory));
        self
    }

    /// Entries in the order timbers were first touched.
    pub fn entries(&self) -> &[JointEntry] {
        &self.entries
    }

    /// Cuts applied to a timber.
    pub fn cuts_for<'a>(&'a self, timber: &'a Arc<Timber>) -> impl Iterator<Item = &'a Cut> + 'a {
        self.entries
            .iter()
            .filter(move |e| Arc::ptr_eq(&e.timber, timber))
            .flat_map(|e| e.operations.iter())
            .filter_map(|op| match op {
                TimberOperation::Cut(c) => Some(c),
                TimberOperation::Accessory(_) => None,
            })
    }

    /// Every accessory in the joint.
    pub fn accessories(&self) -> impl Iterator<Item = &Accessory> {
        self.entries
            .iter()
            .flat_map(|e| e.operations.iter())
            .filter_map(|op| match op {
                TimberOperation::Accessory(a) => Some(a),
                TimberOperation::Cut(_) => None,
            })
    }
}

// =============================================================================
// CutTimber
// =============================================================================

/// A timber with every cut applied to it.
#[derive(Debug, Clone)]
pub struct CutTimber {
    timber: Arc<Timber>,
    cuts: Vec<Cut>,
}

impl CutTimber {
    /// A timber with no cuts yet.
    pub fn new(timber: Arc<Timber>) -> Self {
        Self {
            timber,
            cuts: Vec::new(),
        }
    }

    /// The timber.
    pub fn timber(&self) -> &Arc<Timber> {
        &self.timber
    }

    /// Cuts in application order.
    pub fn cuts(&self) -> &[Cut] {
        &self.cuts
    }

    /// Add a cut.
    pub fn add_cut(&mut self, cut: Cut) {
        self.cuts.push(cut);
    }

    /// The timber body, left open at every end that an end cut shapes.
    pub fn extended_csg_local(&self) -> CsgNode {
        let cuts_end = |end| self.cuts.iter().any(|c| c.end_cut == Some(end));
        let start = (!cuts_end(ReferenceEnd::Bottom)).then(|| integer(0));
        let end = (!cuts_end(ReferenceEnd::Top)).then(|| self.timber.length().clone());
        prism(
            self.timber.size().clone(),
            vec3i(0, 0, 0),
            Orientation::identity(),
            start,
            end,
        )
    }

    /// The finished timber in its local frame.
    pub fn render_csg_local(&self) -> CsgNode {
        if self.cuts.is_empty() {
            return self.timber.csg_local();
        }
        difference(
            self.extended_csg_local(),
            self.cuts.iter().map(|c| c.negative.clone()).collect(),
        )
    }

    /// The finished timber in world space.
    pub fn render_csg_global(&self) -> CsgNode {
        self.render_csg_local().transformed(
            self.timber.orientation(),
            self.timber.bottom_position(),
        )
    }
}

// =============================================================================
// Frame
// =============================================================================

/// Every cut timber and loose part of a structure.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    cut_timbers: Vec<CutTimber>,
    accessories: Vec<Accessory>,
}

impl Frame {
    /// Gather joints into one [`CutTimber`] per distinct timber.
    ///
    /// Timbers appear in the order they are first met; cuts keep joint
    /// order.
    pub fn from_joints(joints: &[Joint]) -> Frame {
        let mut frame = Frame::default();
        for entry in joints.iter().flat_map(|j| j.entries.iter()) {
            let index = match frame
                .cut_timbers
                .iter()
                .position(|ct| Arc::ptr_eq(&ct.timber, &entry.timber))
            {
                Some(i) => i,
                None => {
                    frame.cut_timbers.push(CutTimber::new(Arc::clone(&entry.timber)));
                    frame.cut_timbers.len() - 1
                }
            };
            for op in &entry.operations {
                match op {
                    TimberOperation::Cut(c) => frame.cut_timbers[index].add_cut(c.clone()),
                    TimberOperation::Accessory(a) => frame.accessories.push(a.clone()),
                }
            }
        }
        tracing::debug!(
            timbers = frame.cut_timbers.len(),
            accessories = frame.accessories.len(),
            "assembled frame"
        );
        frame
    }

    /// Add a timber that no joint touches.
    pub fn add_timber(&mut self, timber: Arc<Timber>) {
        if !self.cut_timbers.iter().any(|ct| Arc::ptr_eq(&ct.timber, &timber)) {
            self.cut_timbers.push(CutTimber::new(timber));
        }
    }

    /// Cut timbers in first-seen order.
    pub fn cut_timbers(&self) -> &[CutTimber] {
        &self.cut_timbers
    }

    /// Loose parts in joint order.
    pub fn accessories(&self) -> &[Accessory] {
        &self.accessories
    }

    /// The cut timber for a timber, if it is part of the frame.
    pub fn find(&self, timber: &Arc<Timber>) -> Option<&CutTimber> {
        self.cut_timbers
            .iter()
            .find(|ct| Arc::ptr_eq(&ct.timber, timber))
    }

    /// Box around every timber corner, grown by `padding` on each side.
    ///
    /// Renderers clip half-plane cuts against it. `None` for an empty
    /// frame.
    pub fn structure_extent(&self, padding: &Scalar) -> Option<Aabb> {
        let mut timbers = self.cut_timbers.iter().map(|ct| ct.timber.bounding_box());
        let first = timbers.next()?;
        Some(timbers.fold(first, |acc, b| acc.union(&b)).pad(padding))
    }
}
