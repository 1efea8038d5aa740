//! Video frames handed to the classifiers.

use std::sync::Arc;

/// One captured video frame.
///
/// Pixel data is shared, so cloning a frame is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Capture order, starting at 0.
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Packed RGBA pixels.
    pub data: Arc<[u8]>,
}

impl Frame {
    pub fn new(sequence: u64, width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            sequence,
            width,
            height,
            data: data.into(),
        }
    }

    /// A frame with no pixel data, for backends that do not look at pixels.
    pub fn empty(sequence: u64) -> Self {
        Self::new(sequence, 0, 0, Vec::new())
    }
}

/// Where the scheduler pulls frames from.
///
/// Owned outside the monitor; `None` means no frame is ready yet and the
/// tick is skipped.
pub trait FrameSource: Send + Sync {
    fn current_frame(&self) -> Option<Frame>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_pixels() {
        let frame = Frame::new(3, 2, 1, vec![0u8; 8]);
        let copy = frame.clone();
        assert!(Arc::ptr_eq(&frame.data, &copy.data));
        assert_eq!(copy.sequence, 3);
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::empty(7);
        assert_eq!(frame.sequence, 7);
        assert!(frame.data.is_empty());
    }
}
