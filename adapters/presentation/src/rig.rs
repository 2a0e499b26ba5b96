//! Sprite rigs for portraits and lineup candidates.

use lineup_core::{Candidate, FaceConfiguration, FeatureSlot, SLOT_COUNT};

use crate::PresentationSlot;

/// One optional presentation slot per facial feature.
pub struct FaceRig {
    slots: [Option<Box<dyn PresentationSlot>>; SLOT_COUNT],
}

impl FaceRig {
    /// Creates a rig with no slots attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Attaches the presentation slot rendering `slot`.
    #[must_use]
    pub fn with_slot(mut self, slot: FeatureSlot, target: Box<dyn PresentationSlot>) -> Self {
        self.slots[slot.index()] = Some(target);
        self
    }

    /// Number of attached slots.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Pushes every feature of `face` to the attached slots.
    pub fn apply(&mut self, face: &FaceConfiguration) {
        for (slot, asset) in face.iter() {
            if let Some(target) = self.slots[slot.index()].as_mut() {
                target.set_asset(asset);
            }
        }
    }
}

impl Default for FaceRig {
    fn default() -> Self {
        Self::new()
    }
}

/// Body sprite plus face rig of one lineup position.
#[derive(Default)]
pub struct CandidateRig {
    body: Option<Box<dyn PresentationSlot>>,
    face: FaceRig,
}

impl CandidateRig {
    /// Creates a rig with nothing attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the body sprite slot.
    #[must_use]
    pub fn with_body(mut self, body: Box<dyn PresentationSlot>) -> Self {
        self.body = Some(body);
        self
    }

    /// Replaces the face rig.
    #[must_use]
    pub fn with_face(mut self, face: FaceRig) -> Self {
        self.face = face;
        self
    }

    /// Dresses the rig as `candidate`.
    pub fn apply(&mut self, candidate: &Candidate) {
        if let Some(body) = self.body.as_mut() {
            body.set_asset(candidate.body());
        }
        self.face.apply(candidate.face());
    }
}
