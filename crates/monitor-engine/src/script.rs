//! Scripted classifier backends.
//!
//! A tick script is a JSONL file with one object per tick describing what
//! the models "see" on that tick:
//!
//! ```text
//! {"faces":[{"top_left":[200,100],"bottom_right":[400,300],"landmarks":[[260,170],[340,170],[300,220]]}]}
//! {"faces":[],"objects":[{"class":"cell phone","score":0.87}]}
//! {"face_error":true}
//! ```
//!
//! Missing fields default to empty / `false`. Blank lines and lines starting
//! with `#` are ignored. The script drives both offline replay and a live
//! `ScriptedClassifier` + `ScriptedFrameSource` pair.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use proctor_common::error::{ProctorError, ProctorResult};
use proctor_session_model::classification::{RawFace, RawPrediction};

use crate::classifier::{FaceDetector, ObjectDetector};
use crate::frame::{Frame, FrameSource};

/// Model output for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedTick {
    pub faces: Vec<RawFace>,
    pub objects: Vec<RawPrediction>,
    /// Make the face detector fail on this tick.
    pub face_error: bool,
    /// Make the object detector fail on this tick.
    pub object_error: bool,
}

/// An ordered list of scripted ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickScript {
    ticks: Vec<ScriptedTick>,
}

impl TickScript {
    pub fn new(ticks: Vec<ScriptedTick>) -> Self {
        Self { ticks }
    }

    /// Parse a JSONL script. Errors carry the 1-based line number.
    pub fn parse(jsonl: &str) -> ProctorResult<Self> {
        let mut ticks = Vec::new();
        for (index, line) in jsonl.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let tick = serde_json::from_str(line)
                .map_err(|e| ProctorError::script(index + 1, e.to_string()))?;
            ticks.push(tick);
        }
        Ok(Self { ticks })
    }

    /// Load a script from disk.
    pub fn load(path: &Path) -> ProctorResult<Self> {
        if !path.exists() {
            return Err(ProctorError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let script = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), ticks = script.len(), "Loaded tick script");
        Ok(script)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScriptedTick> {
        self.ticks.get(index)
    }
}

/// Face and object detector that answers from a script, keyed by frame
/// sequence number.
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    script: Arc<TickScript>,
}

impl ScriptedClassifier {
    pub fn new(script: Arc<TickScript>) -> Self {
        Self { script }
    }

    fn tick_for(&self, frame: &Frame) -> ProctorResult<&ScriptedTick> {
        usize::try_from(frame.sequence)
            .ok()
            .and_then(|index| self.script.get(index))
            .ok_or_else(|| {
                ProctorError::classifier(format!("no scripted tick for frame {}", frame.sequence))
            })
    }
}

#[async_trait::async_trait]
impl FaceDetector for ScriptedClassifier {
    async fn detect_faces(&self, frame: &Frame) -> ProctorResult<Vec<RawFace>> {
        let tick = self.tick_for(frame)?;
        if tick.face_error {
            return Err(ProctorError::classifier("scripted face detector failure"));
        }
        Ok(tick.faces.clone())
    }
}

#[async_trait::async_trait]
impl ObjectDetector for ScriptedClassifier {
    async fn detect_objects(&self, frame: &Frame) -> ProctorResult<Vec<RawPrediction>> {
        let tick = self.tick_for(frame)?;
        if tick.object_error {
            return Err(ProctorError::classifier("scripted object detector failure"));
        }
        Ok(tick.objects.clone())
    }
}

/// Hands out one empty frame per call, numbered from 0, until the script
/// runs out.
#[derive(Debug)]
pub struct ScriptedFrameSource {
    frames: u64,
    next: AtomicU64,
}

impl ScriptedFrameSource {
    pub fn new(script: &TickScript) -> Self {
        Self {
            frames: script.len() as u64,
            next: AtomicU64::new(0),
        }
    }

    /// Frames handed out so far.
    pub fn served(&self) -> u64 {
        self.next.load(Ordering::SeqCst).min(self.frames)
    }

    /// True once every scripted frame has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.next.load(Ordering::SeqCst) >= self.frames
    }
}

impl FrameSource for ScriptedFrameSource {
    fn current_frame(&self) -> Option<Frame> {
        let sequence = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                (next < self.frames).then_some(next + 1)
            })
            .ok()?;
        Some(Frame::empty(sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
# warm-up
{"faces":[{"top_left":[200,100],"bottom_right":[400,300]}]}

{"objects":[{"class":"book","score":0.8}],"face_error":true}
{}
"#;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let script = TickScript::parse(SCRIPT).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.ticks[0].faces.len(), 1);
        assert!(script.ticks[0].faces[0].landmarks.is_none());
        assert!(script.ticks[1].face_error);
        assert!(!script.ticks[1].object_error);
        assert_eq!(script.ticks[2], ScriptedTick::default());
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = TickScript::parse("{}\n\n{\"faces\": 3}\n").unwrap_err();
        match err {
            ProctorError::Script { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = TickScript::load(Path::new("/nonexistent/ticks.jsonl")).unwrap_err();
        assert!(matches!(err, ProctorError::FileNotFound { .. }));
    }

    #[test]
    fn test_frame_source_runs_out() {
        let script = TickScript::parse(SCRIPT).unwrap();
        let source = ScriptedFrameSource::new(&script);

        let sequences: Vec<_> = std::iter::from_fn(|| source.current_frame())
            .map(|frame| frame.sequence)
            .collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert!(source.is_exhausted());
        assert_eq!(source.served(), 3);
        assert!(source.current_frame().is_none());
    }

    #[tokio::test]
    async fn test_classifier_follows_script() {
        let script = Arc::new(TickScript::parse(SCRIPT).unwrap());
        let classifier = ScriptedClassifier::new(script);

        assert_eq!(classifier.detect_faces(&Frame::empty(0)).await.unwrap().len(), 1);
        assert!(classifier.detect_faces(&Frame::empty(1)).await.is_err());
        assert_eq!(
            classifier.detect_objects(&Frame::empty(1)).await.unwrap()[0].class,
            "book"
        );
        assert!(classifier.detect_objects(&Frame::empty(9)).await.is_err());
    }
}
