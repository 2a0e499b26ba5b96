#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure order-phase system translating pointer input into hover and pick commands.

use glam::Vec2;
use lineup_core::{CandidateId, Command, Event};

/// Screen-space rectangle a candidate occupies on stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitBox {
    candidate: CandidateId,
    min: Vec2,
    max: Vec2,
}

impl HitBox {
    /// Creates a hit box spanning the two provided corners.
    #[must_use]
    pub fn new(candidate: CandidateId, a: Vec2, b: Vec2) -> Self {
        Self {
            candidate,
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Lays out `count` equally sized boxes left to right, starting at `origin`.
    #[must_use]
    pub fn row(count: usize, origin: Vec2, size: Vec2, spacing: f32) -> Vec<Self> {
        (0..count)
            .map(|index| {
                let min = origin + Vec2::new(index as f32 * (size.x + spacing), 0.0);
                Self::new(CandidateId::new(index), min, min + size)
            })
            .collect()
    }

    /// Candidate owning the box.
    #[must_use]
    pub const fn candidate(&self) -> CandidateId {
        self.candidate
    }

    /// Centre of the box, useful for aiming the pointer at a candidate.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Reports whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SelectionInput {
    /// Indicates whether the primary action was pressed on this frame.
    pub primary_pressed: bool,
    /// Pointer position in the same space as the hit boxes.
    pub pointer: Option<Vec2>,
}

impl SelectionInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(primary_pressed: bool, pointer: Option<Vec2>) -> Self {
        Self {
            primary_pressed,
            pointer,
        }
    }
}

/// Order-phase selection system.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    enabled: bool,
    hovered: Option<CandidateId>,
}

impl Selection {
    /// Creates a new selection system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: false,
            hovered: None,
        }
    }

    /// Consumes world events and pointer input to emit hover and pick commands.
    ///
    /// Boxes later in `hit_boxes` are treated as drawn on top.
    pub fn handle(
        &mut self,
        events: &[Event],
        hit_boxes: &[HitBox],
        input: SelectionInput,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::SelectionChanged { enabled } => {
                    self.enabled = *enabled;
                    if !enabled {
                        self.hovered = None;
                    }
                }
                Event::PhaseChanged { .. } => {
                    self.enabled = false;
                    self.hovered = None;
                }
                Event::HoverChanged { candidate } => self.hovered = *candidate,
                _ => {}
            }
        }

        if !self.enabled {
            return;
        }

        let target = input.pointer.and_then(|pointer| {
            hit_boxes
                .iter()
                .rev()
                .find(|hit_box| hit_box.contains(pointer))
                .map(HitBox::candidate)
        });

        if target != self.hovered {
            self.hovered = target;
            out.push(Command::HoverCandidate { candidate: target });
        }

        if input.primary_pressed {
            if let Some(candidate) = target {
                out.push(Command::ChooseCandidate { candidate });
            }
        }
    }
}
