//! Short-lived explosion segments left behind by bombs.
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Shape of a segment for directional display.
///
/// Has no effect on gameplay.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum SegmentKind {
    Center,
    Horizontal,
    Vertical,
    /// Last segment of a ray going in the given direction.
    End(Dir),
}

impl SegmentKind {
    /// Segment kind for a ray going in `dir`.
    pub fn along(dir: Dir, is_end: bool) -> Self {
        if is_end {
            SegmentKind::End(dir)
        } else if dir.is_horizontal() {
            SegmentKind::Horizontal
        } else {
            SegmentKind::Vertical
        }
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub pos: IVec2,
    pub kind: SegmentKind,
    pub remaining: Timer,
}

impl Segment {
    /// Opacity for fade-out display, 1.0 when fresh.
    pub fn fade(&self) -> f32 {
        self.remaining.fraction_left()
    }
}

/// Currently burning explosion segments, at most one per cell.
#[derive(Clone, Default, Debug, Deref, Serialize, Deserialize)]
pub struct Explosions(Vec<Segment>);

impl Explosions {
    /// Add a segment, replacing any existing one on the same cell.
    pub fn spawn(&mut self, pos: IVec2, kind: SegmentKind, duration: f32) {
        let seg = Segment {
            pos,
            kind,
            remaining: Timer::new(duration),
        };
        if let Some(old) = self.0.iter_mut().find(|s| s.pos == pos) {
            *old = seg;
        } else {
            self.0.push(seg);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        for s in self.0.iter_mut() {
            s.remaining.tick(dt);
        }
        self.0.retain(|s| !s.remaining.is_done());
    }

    pub fn is_burning(&self, pos: IVec2) -> bool {
        self.0.iter().any(|s| s.pos == pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_shapes() {
        assert_eq!(
            SegmentKind::along(Dir::Left, false),
            SegmentKind::Horizontal
        );
        assert_eq!(SegmentKind::along(Dir::Up, false), SegmentKind::Vertical);
        assert_eq!(
            SegmentKind::along(Dir::Down, true),
            SegmentKind::End(Dir::Down)
        );
    }

    #[test]
    fn burn_out() {
        let mut e = Explosions::default();
        e.spawn(ivec2(1, 1), SegmentKind::Center, 0.5);
        e.spawn(ivec2(2, 1), SegmentKind::Horizontal, 1.0);
        assert!(e.is_burning(ivec2(1, 1)));

        e.tick(0.25);
        assert_eq!(e.len(), 2);
        assert_eq!(e[0].fade(), 0.5);

        e.tick(0.25);
        assert!(!e.is_burning(ivec2(1, 1)));
        assert!(e.is_burning(ivec2(2, 1)));

        e.tick(1.0);
        assert!(e.is_empty());
    }

    #[test]
    fn one_segment_per_cell() {
        let mut e = Explosions::default();
        e.spawn(ivec2(1, 1), SegmentKind::Center, 0.5);
        e.tick(0.4);
        e.spawn(ivec2(1, 1), SegmentKind::Vertical, 0.5);
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].kind, SegmentKind::Vertical);
        assert_eq!(e[0].fade(), 1.0);
    }
}
