use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the capture session. All of them are terminal at the
/// granularity they occur: there is no retry policy anywhere in the loop.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The camera could not be opened. The session never starts.
    #[error("unable to open camera device {index}: {source}")]
    DeviceUnavailable {
        index: u32,
        #[source]
        source: nokhwa::NokhwaError,
    },

    /// A capture call returned no usable data. Ends the session.
    #[error("failed to read frame from camera: {source}")]
    FrameRead {
        #[source]
        source: nokhwa::NokhwaError,
    },

    /// The detector model could not be loaded. Vestigial: the heuristic
    /// path continues unaffected.
    #[error("failed to load detector model {path:?}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
