/// Screen-level state of an editing front end. The pixel pipeline never
/// looks at this; front ends use it to decide which controls are live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Workflow {
    #[default]
    AwaitingImage,
    ImageLoaded,
    Simplified,
    Generated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowEvent {
    ImageLoaded,
    PaletteChosen,
    SimplifiedEdited,
    OutputsGenerated,
}

impl Workflow {
    /// Next state for `event`, or `None` if the event is not allowed here.
    pub fn on(self, event: WorkflowEvent) -> Option<Workflow> {
        use Workflow::*;
        use WorkflowEvent as E;

        match (self, event) {
            (_, E::ImageLoaded) => Some(ImageLoaded),
            (ImageLoaded | Simplified | Generated, E::PaletteChosen) => Some(Simplified),
            (Simplified | Generated, E::SimplifiedEdited) => Some(Simplified),
            (Simplified | Generated, E::OutputsGenerated) => Some(Generated),
            _ => None,
        }
    }

    pub fn can_edit_source(self) -> bool {
        self != Workflow::AwaitingImage
    }

    pub fn can_edit_simplified(self) -> bool {
        matches!(self, Workflow::Simplified | Workflow::Generated)
    }

    pub fn has_outputs(self) -> bool {
        self == Workflow::Generated
    }
}
