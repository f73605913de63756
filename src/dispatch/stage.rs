use std::fmt;

/// States of a single kernel run, in the order they are entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchStage {
    /// Assembling and compiling the fragment stage, linking the program.
    Compiling,
    /// Uploading the input texture and creating the render target.
    Uploading,
    /// Drawing the full-screen quad.
    Rendering,
    /// Copying the render target back into the buffer.
    ReadingBack,
    /// Result exposed to the caller.
    Done,
    /// Terminal state after an error.
    Failed,
}

impl DispatchStage {
    /// Stage entered after this one succeeds.
    pub fn next(self) -> Self {
        match self {
            Self::Compiling => Self::Uploading,
            Self::Uploading => Self::Rendering,
            Self::Rendering => Self::ReadingBack,
            Self::ReadingBack | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compiling => "compiling",
            Self::Uploading => "uploading",
            Self::Rendering => "rendering",
            Self::ReadingBack => "reading-back",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}
