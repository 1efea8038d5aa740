//! Classifier output contracts.
//!
//! Face and object models report loosely-shaped predictions (`RawFace`,
//! `RawPrediction`). They are validated once, at the classifier adapter
//! boundary, into the typed `Face` and `DetectedObject` values the tracker
//! consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned face bounding box. Always non-degenerate once validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Horizontal centre of the box.
    pub fn center_x(&self) -> f64 {
        self.top_left.x + self.width() / 2.0
    }
}

/// The facial landmarks the focus estimator relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: Point,
    pub right_eye: Point,
    pub nose: Point,
}

impl FaceLandmarks {
    /// Midpoint between the eyes.
    pub fn eye_center(&self) -> Point {
        Point::new(
            (self.left_eye.x + self.right_eye.x) / 2.0,
            (self.left_eye.y + self.right_eye.y) / 2.0,
        )
    }
}

/// A validated face detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub bounding_box: BoundingBox,
    pub landmarks: Option<FaceLandmarks>,
}

impl Face {
    /// Face without landmarks.
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            bounding_box: BoundingBox {
                top_left,
                bottom_right,
            },
            landmarks: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: FaceLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }
}

/// Face prediction as reported by a face model.
///
/// Landmarks are an ordered list of `[x, y]` pairs: left eye, right eye,
/// nose, then any model-specific extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFace {
    pub top_left: [f64; 2],
    pub bottom_right: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<[f64; 2]>>,
}

/// Why a raw prediction was rejected at the adapter boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("bounding box has non-finite coordinates")]
    NonFiniteBox,

    #[error("bounding box is degenerate ({width}x{height})")]
    DegenerateBox { width: f64, height: f64 },

    #[error("untracked object label: {0}")]
    UntrackedLabel(String),

    #[error("confidence {0} outside [0, 1]")]
    InvalidConfidence(f64),
}

impl TryFrom<RawFace> for Face {
    type Error = ClassificationError;

    fn try_from(raw: RawFace) -> Result<Self, Self::Error> {
        let top_left = Point::new(raw.top_left[0], raw.top_left[1]);
        let bottom_right = Point::new(raw.bottom_right[0], raw.bottom_right[1]);
        if !top_left.is_finite() || !bottom_right.is_finite() {
            return Err(ClassificationError::NonFiniteBox);
        }

        let face = Face::new(top_left, bottom_right);
        let (width, height) = (face.bounding_box.width(), face.bounding_box.height());
        if width <= 0.0 || height <= 0.0 {
            return Err(ClassificationError::DegenerateBox { width, height });
        }

        // Incomplete or non-finite landmark sets are treated as missing.
        let landmarks = raw.landmarks.and_then(|points| {
            let point = |i: usize| points.get(i).map(|p| Point::new(p[0], p[1]));
            let landmarks = FaceLandmarks {
                left_eye: point(0)?,
                right_eye: point(1)?,
                nose: point(2)?,
            };
            [landmarks.left_eye, landmarks.right_eye, landmarks.nose]
                .iter()
                .all(Point::is_finite)
                .then_some(landmarks)
        });

        Ok(Self { landmarks, ..face })
    }
}

/// Object classes the monitor cares about. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectLabel {
    #[serde(rename = "cell phone")]
    CellPhone,
    #[serde(rename = "book")]
    Book,
    #[serde(rename = "laptop")]
    Laptop,
    #[serde(rename = "tv")]
    Tv,
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "keyboard")]
    Keyboard,
}

impl ObjectLabel {
    pub const TRACKED: [ObjectLabel; 6] = [
        ObjectLabel::CellPhone,
        ObjectLabel::Book,
        ObjectLabel::Laptop,
        ObjectLabel::Tv,
        ObjectLabel::Remote,
        ObjectLabel::Keyboard,
    ];

    /// Class name as reported by the object model.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectLabel::CellPhone => "cell phone",
            ObjectLabel::Book => "book",
            ObjectLabel::Laptop => "laptop",
            ObjectLabel::Tv => "tv",
            ObjectLabel::Remote => "remote",
            ObjectLabel::Keyboard => "keyboard",
        }
    }

    /// Look up a model class name. Returns `None` for untracked classes.
    pub fn from_class(class: &str) -> Option<Self> {
        Self::TRACKED.into_iter().find(|label| label.as_str() == class)
    }
}

impl fmt::Display for ObjectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated object detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: ObjectLabel,
    pub confidence: f64,
}

impl DetectedObject {
    pub fn new(label: ObjectLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }
}

/// Object prediction as reported by an object model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub class: String,
    pub score: f64,
}

impl RawPrediction {
    pub fn new(class: impl Into<String>, score: f64) -> Self {
        Self {
            class: class.into(),
            score,
        }
    }
}

impl TryFrom<RawPrediction> for DetectedObject {
    type Error = ClassificationError;

    fn try_from(raw: RawPrediction) -> Result<Self, Self::Error> {
        let label = ObjectLabel::from_class(&raw.class)
            .ok_or_else(|| ClassificationError::UntrackedLabel(raw.class.clone()))?;
        if !(0.0..=1.0).contains(&raw.score) {
            return Err(ClassificationError::InvalidConfidence(raw.score));
        }
        Ok(Self::new(label, raw.score))
    }
}

/// Everything the classifiers reported for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub faces: Vec<Face>,
    pub objects: Vec<DetectedObject>,
}

impl ClassificationResult {
    pub fn new(faces: Vec<Face>, objects: Vec<DetectedObject>) -> Self {
        Self { faces, objects }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Labels of every object seen this tick, regardless of confidence.
    pub fn object_labels(&self) -> Vec<ObjectLabel> {
        self.objects.iter().map(|obj| obj.label).collect()
    }
}
