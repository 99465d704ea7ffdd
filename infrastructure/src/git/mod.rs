//! Git working-copy inspection.
//!
//! Provides [`GitRemoteDetector`], the adapter behind the
//! [`RemoteDetectorPort`](recipes_application::RemoteDetectorPort).

mod remote_detector;

pub use remote_detector::GitRemoteDetector;
