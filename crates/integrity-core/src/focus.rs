//! Focus estimation from facial landmarks.
//!
//! A face counts as focused when the midpoint between its eyes sits close
//! to the horizontal centre of its bounding box. Only the first face is
//! considered.

use proctor_session_model::classification::Face;

/// Default maximum eye-centre deviation, as a fraction of face width.
pub const DEFAULT_FOCUS_DEVIATION_RATIO: f64 = 0.3;

/// Whether the candidate appears to be looking at the screen.
///
/// No faces means not focused. A face without landmarks is assumed focused.
pub fn is_focused(faces: &[Face]) -> bool {
    is_focused_within(faces, DEFAULT_FOCUS_DEVIATION_RATIO)
}

/// [`is_focused`] with an explicit deviation ratio.
pub fn is_focused_within(faces: &[Face], max_deviation_ratio: f64) -> bool {
    let Some(face) = faces.first() else {
        return false;
    };
    let Some(landmarks) = face.landmarks else {
        return true;
    };

    let width = face.bounding_box.width();
    let deviation = (landmarks.eye_center().x - face.bounding_box.center_x()).abs() / width;
    deviation < max_deviation_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use proctor_session_model::classification::{FaceLandmarks, Point};

    /// 200px wide face centred at x = 200.
    fn face_with_eyes_at(eye_center_x: f64) -> Face {
        Face::new(Point::new(100.0, 50.0), Point::new(300.0, 250.0)).with_landmarks(
            FaceLandmarks {
                left_eye: Point::new(eye_center_x - 40.0, 120.0),
                right_eye: Point::new(eye_center_x + 40.0, 120.0),
                nose: Point::new(eye_center_x, 170.0),
            },
        )
    }

    #[test]
    fn test_no_faces_is_unfocused() {
        assert!(!is_focused(&[]));
    }

    #[test]
    fn test_missing_landmarks_is_focused() {
        let face = Face::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(is_focused(&[face]));
    }

    #[test]
    fn test_centred_eyes_are_focused() {
        assert!(is_focused(&[face_with_eyes_at(200.0)]));
        // 50px off a 200px face = 0.25
        assert!(is_focused(&[face_with_eyes_at(250.0)]));
    }

    #[test]
    fn test_deviation_boundary_is_strict() {
        // 60px off a 200px face = exactly 0.3
        assert!(!is_focused(&[face_with_eyes_at(260.0)]));
        assert!(!is_focused(&[face_with_eyes_at(130.0)]));
    }

    #[test]
    fn test_only_first_face_counts() {
        let focused = face_with_eyes_at(200.0);
        let turned = face_with_eyes_at(290.0);
        assert!(is_focused(&[focused.clone(), turned.clone()]));
        assert!(!is_focused(&[turned, focused]));
    }

    #[test]
    fn test_custom_ratio() {
        assert!(is_focused_within(&[face_with_eyes_at(260.0)], 0.35));
    }
}
