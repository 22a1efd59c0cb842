use crate::sim::error::{Result, SimError};
use std::collections::VecDeque;
use tracing::debug;

/// Hands out physical frame numbers: reclaimed frames first, then frames
/// never used before, up to `total`.
#[derive(Debug)]
pub struct FrameAllocator {
    /// Frames returned by eviction, reused oldest first.
    free: VecDeque<u32>,
    /// Every frame below this has been handed out at least once.
    next_unused: u32,
    total: u32,
}

impl FrameAllocator {
    pub fn new(total: u32) -> Self {
        FrameAllocator {
            free: VecDeque::new(),
            next_unused: 0,
            total,
        }
    }

    pub fn allocate(&mut self) -> Result<u32> {
        if let Some(pfn) = self.free.pop_front() {
            debug!(pfn, "reusing reclaimed frame");
            return Ok(pfn);
        }
        if self.next_unused < self.total {
            let pfn = self.next_unused;
            self.next_unused += 1;
            return Ok(pfn);
        }
        Err(SimError::FramesExhausted { total: self.total })
    }

    /// Give back a frame previously returned by `allocate`.
    pub fn release(&mut self, pfn: u32) {
        debug_assert!(pfn < self.next_unused, "frame {pfn} was never allocated");
        debug_assert!(!self.free.contains(&pfn), "frame {pfn} released twice");
        self.free.push_back(pfn);
    }

    /// Frames that can still be handed out.
    pub fn available(&self) -> usize {
        self.free.len() + (self.total - self.next_unused) as usize
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hands_out_fresh_frames_in_order() {
        let mut frames = FrameAllocator::new(3);
        assert_eq!(frames.allocate().unwrap(), 0);
        assert_eq!(frames.allocate().unwrap(), 1);
        assert_eq!(frames.allocate().unwrap(), 2);
        assert!(matches!(
            frames.allocate(),
            Err(SimError::FramesExhausted { total: 3 })
        ));
    }

    #[test]
    fn test_reclaimed_frames_come_first() {
        let mut frames = FrameAllocator::new(4);
        let a = frames.allocate().unwrap();
        let b = frames.allocate().unwrap();
        frames.release(b);
        frames.release(a);
        assert_eq!(frames.available(), 4);
        assert_eq!(frames.allocate().unwrap(), b);
        assert_eq!(frames.allocate().unwrap(), a);
        assert_eq!(frames.allocate().unwrap(), 2);
    }
}
