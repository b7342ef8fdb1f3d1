//! Event types and sinks for observing generation cycles.
//!
//! [`run_cycle`](crate::scatter::runner::run_cycle) reports progress as [`CycleEvent`]s
//! through an [`EventSink`]. Use `()` to ignore events, [`VecSink`] to collect them, or
//! [`FnSink`] to forward them to a closure.
use crate::scatter::binder::PlacementPlan;
use crate::scatter::selection::SelectionBranch;
use crate::scatter::LayerKind;

/// Describes events emitted during a generation cycle.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CycleEvent {
    /// The scene was reset and the cycle is starting.
    CycleStarted,

    /// A sampling attempt for a layer returned no points.
    SamplingRetried {
        layer: LayerKind,
        /// 1-based number of the attempt that came back empty.
        attempt: u32,
    },

    /// A layer's objects were imported and positioned.
    LayerPlaced {
        layer: LayerKind,
        /// Size of the sampled point cloud the placements were drawn from.
        sampled: usize,
        /// Number of objects placed.
        placed: usize,
        branch: SelectionBranch,
    },

    /// Background and occluder objects received materials.
    MaterialsAssigned {
        objects: usize,
        /// Number of different color maps used.
        distinct: usize,
    },

    /// Scale and rotation were applied to a layer.
    LayerRandomized { layer: LayerKind, objects: usize },

    /// An environment map was chosen.
    LightingChosen { environment: String, strength: f32 },

    /// Camera effects were rolled.
    CameraEffectsRolled { enabled: usize },

    /// The cycle completed.
    CycleFinished { placed: usize },
}

impl CycleEvent {
    pub(crate) fn layer_placed(plan: &PlacementPlan, sampled: usize) -> Self {
        CycleEvent::LayerPlaced {
            layer: plan.layer,
            sampled,
            placed: plan.len(),
            branch: plan.branch,
        }
    }
}

/// A generic event sink that accepts [`CycleEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: CycleEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = CycleEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: CycleEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(CycleEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(CycleEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CycleEvent),
{
    #[inline]
    fn send(&mut self, event: CycleEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<CycleEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<CycleEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[CycleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: CycleEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink = VecSink::new();
        sink.send_many([CycleEvent::CycleStarted, CycleEvent::CycleFinished { placed: 3 }]);
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink.as_slice()[0], CycleEvent::CycleStarted));
        assert!(matches!(
            sink.into_inner()[1],
            CycleEvent::CycleFinished { placed: 3 }
        ));
    }

    #[test]
    fn fn_sink_forwards_events() {
        let mut count = 0;
        {
            let mut sink = FnSink::new(|_e| count += 1);
            sink.send(CycleEvent::CycleStarted);
            sink.send(CycleEvent::CameraEffectsRolled { enabled: 2 });
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn unit_sink_ignores_events() {
        EventSink::send(&mut (), CycleEvent::CycleStarted);
    }
}
