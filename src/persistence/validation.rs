//! Sanity checks for decoded recordings

use super::StoredFrame;

/// Reject frames that would put the replayed drone somewhere impossible
pub fn validate_frames(frames: &[StoredFrame]) -> Result<(), String> {
    for (i, frame) in frames.iter().enumerate() {
        let finite = frame
            .position
            .iter()
            .chain(frame.rotation.iter())
            .all(|v| v.is_finite())
            && frame.timestamp.is_finite();
        if !finite {
            return Err(format!("frame {i} has a non-finite value"));
        }
        if frame.position[1] < 0.0 {
            return Err(format!("frame {i} is below ground"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_below_ground() {
        let frames = [StoredFrame {
            position: [0.0, -1.0, 0.0],
            rotation: [0.0; 3],
            timestamp: 0.0,
        }];
        assert!(validate_frames(&frames).is_err());
    }

    #[test]
    fn test_accepts_empty_and_valid() {
        assert!(validate_frames(&[]).is_ok());
        let frames = [StoredFrame {
            position: [3.0, 0.0, -2.0],
            rotation: [0.1, 3.0, -0.2],
            timestamp: 1_700_000_000_000.0,
        }];
        assert!(validate_frames(&frames).is_ok());
    }
}
