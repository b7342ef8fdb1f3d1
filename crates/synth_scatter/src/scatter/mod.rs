//! Layered placement pipeline: quantity allocation, point-to-asset binding, and the
//! generation-cycle runner.
use std::fmt;

pub mod binder;
pub mod events;
pub mod plan;
pub mod quantity;
pub mod runner;
pub mod selection;

/// One of the three placement layers of a generated scene, in placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    /// Backdrop plane behind the subject.
    Background,
    /// Labeled subject objects.
    Foreground,
    /// Clutter in front of the subject.
    Occluder,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [
        LayerKind::Background,
        LayerKind::Foreground,
        LayerKind::Occluder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Background => "background",
            LayerKind::Foreground => "foreground",
            LayerKind::Occluder => "occluder",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_display_lowercase_in_placement_order() {
        let names: Vec<String> = LayerKind::ALL.iter().map(|l| l.to_string()).collect();
        assert_eq!(names, ["background", "foreground", "occluder"]);
    }
}
