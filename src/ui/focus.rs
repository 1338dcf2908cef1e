// Focus management for the converter screen

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Formats,
    Presets,
    /// Advanced field editor, only reachable in advanced mode
    Fields,
}

impl Pane {
    /// Next pane in Tab order
    pub fn next(self, advanced: bool) -> Self {
        match self {
            Self::Formats => Self::Presets,
            Self::Presets if advanced => Self::Fields,
            Self::Presets | Self::Fields => Self::Formats,
        }
    }

    /// Previous pane in Shift+Tab order
    pub fn prev(self, advanced: bool) -> Self {
        match self {
            Self::Formats if advanced => Self::Fields,
            Self::Formats => Self::Presets,
            Self::Presets => Self::Formats,
            Self::Fields => Self::Presets,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Formats => "Target format",
            Self::Presets => "Presets",
            Self::Fields => "Advanced settings",
        }
    }
}
