//! Frame mapping: emitted source line → originating frame.
//!
//! Each entry records the line range a frame emitted, so a backend
//! diagnostic pointing at a generated line can be traced back to the frame
//! that produced it. Scope owners cover their whole block, including the
//! frames nested inside it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMap {
    pub entries: Vec<FrameMapEntry>,
}

/// One frame and the 1-based, inclusive range of lines it emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMapEntry {
    /// Insertion index in the method shape. The implicit return frame, when
    /// present, takes the index after the last explicit frame.
    pub frame_index: usize,
    pub description: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl FrameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        frame_index: usize,
        description: impl Into<String>,
        start_line: u32,
        end_line: u32,
    ) {
        self.entries.push(FrameMapEntry {
            frame_index,
            description: description.into(),
            start_line,
            end_line,
        });
    }

    /// The innermost frame whose range covers `line`.
    pub fn frame_at_line(&self, line: u32) -> Option<&FrameMapEntry> {
        self.entries
            .iter()
            .filter(|e| e.start_line <= line && line <= e.end_line)
            .min_by_key(|e| e.end_line - e.start_line)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrameMap {
        let mut map = FrameMap::new();
        map.push(0, "new Demo.Widget()", 3, 6);
        map.push(1, "Demo.Consumer.Take(Demo.Widget)", 5, 5);
        map
    }

    #[test]
    fn innermost_frame_wins() {
        let map = sample();
        assert_eq!(map.frame_at_line(5).map(|e| e.frame_index), Some(1));
        assert_eq!(map.frame_at_line(3).map(|e| e.frame_index), Some(0));
        assert!(map.frame_at_line(1).is_none());
    }

    #[test]
    fn json_keeps_entries() {
        let map = sample();
        let back = FrameMap::from_json(&map.to_json().unwrap()).expect("parse failed");
        assert_eq!(back, map);
        assert!(FrameMap::from_json("not json").is_err());
    }
}
