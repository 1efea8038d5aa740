//! Classifier capabilities and the fail-open adapter in front of them.

use std::sync::Arc;

use proctor_common::error::ProctorResult;
use proctor_session_model::classification::{
    ClassificationResult, DetectedObject, Face, RawFace, RawPrediction,
};

use crate::frame::Frame;

/// Face detection model.
#[async_trait::async_trait]
pub trait FaceDetector: Send + Sync {
    /// Faces visible in `frame`, landmarks ordered left eye, right eye, nose.
    async fn detect_faces(&self, frame: &Frame) -> ProctorResult<Vec<RawFace>>;
}

/// Object detection model.
#[async_trait::async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect_objects(&self, frame: &Frame) -> ProctorResult<Vec<RawPrediction>>;
}

/// Runs both detectors on a frame and validates their output.
///
/// A failing detector contributes nothing to the tick: errors are logged
/// and treated as an empty result, never retried. Faces with unusable
/// boxes and objects outside the tracked label set are dropped here, so
/// everything downstream works with validated types.
#[derive(Clone)]
pub struct ClassifierAdapter {
    faces: Arc<dyn FaceDetector>,
    objects: Arc<dyn ObjectDetector>,
}

impl ClassifierAdapter {
    pub fn new(faces: Arc<dyn FaceDetector>, objects: Arc<dyn ObjectDetector>) -> Self {
        Self { faces, objects }
    }

    /// Adapter over a single backend that implements both detectors.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: FaceDetector + ObjectDetector + 'static,
    {
        Self {
            faces: backend.clone(),
            objects: backend,
        }
    }

    /// Classify one frame. Never fails.
    pub async fn classify(&self, frame: &Frame) -> ClassificationResult {
        let (faces, objects) = tokio::join!(
            self.faces.detect_faces(frame),
            self.objects.detect_objects(frame)
        );

        let faces = match faces {
            Ok(raw) => validate_faces(raw, frame.sequence),
            Err(e) => {
                tracing::warn!(frame = frame.sequence, error = %e, "Face detection failed");
                Vec::new()
            }
        };
        let objects = match objects {
            Ok(raw) => validate_objects(raw, frame.sequence),
            Err(e) => {
                tracing::warn!(frame = frame.sequence, error = %e, "Object detection failed");
                Vec::new()
            }
        };

        ClassificationResult::new(faces, objects)
    }
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter").finish_non_exhaustive()
    }
}

fn validate_faces(raw: Vec<RawFace>, sequence: u64) -> Vec<Face> {
    raw.into_iter()
        .filter_map(|face| match Face::try_from(face) {
            Ok(face) => Some(face),
            Err(e) => {
                tracing::debug!(frame = sequence, reason = %e, "Dropping face");
                None
            }
        })
        .collect()
}

fn validate_objects(raw: Vec<RawPrediction>, sequence: u64) -> Vec<DetectedObject> {
    raw.into_iter()
        .filter_map(|prediction| match DetectedObject::try_from(prediction) {
            Ok(object) => Some(object),
            Err(e) => {
                tracing::debug!(frame = sequence, reason = %e, "Dropping prediction");
                None
            }
        })
        .collect()
}
