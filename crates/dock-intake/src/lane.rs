use dock_scan::{ScanClassifier, ScanConfig};
use dock_types::Lane;

/// Input state of one scan lane.
#[derive(Clone, Debug)]
pub(crate) struct LaneState {
    /// Current contents of the lane's input field.
    pub buffer: String,
    pub classifier: ScanClassifier,
    /// Barcode most recently handed to the backend from this lane.
    pub last_processed: Option<String>,
    /// Bumped on every buffer change; a debounce task only fires if the
    /// generation it was scheduled under is still current.
    pub generation: u64,
}

impl LaneState {
    fn new(config: &ScanConfig) -> Self {
        Self {
            buffer: String::new(),
            classifier: ScanClassifier::new(config.clone()),
            last_processed: None,
            generation: 0,
        }
    }

    /// Invalidate any pending debounce task and return the new generation.
    pub fn bump(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.classifier.reset();
        self.bump();
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Lanes {
    returns: LaneState,
    damage: LaneState,
}

impl Lanes {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            returns: LaneState::new(config),
            damage: LaneState::new(config),
        }
    }

    pub fn get(&self, lane: Lane) -> &LaneState {
        match lane {
            Lane::Return => &self.returns,
            Lane::Damage => &self.damage,
        }
    }

    pub fn get_mut(&mut self, lane: Lane) -> &mut LaneState {
        match lane {
            Lane::Return => &mut self.returns,
            Lane::Damage => &mut self.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn lanes_are_independent() {
        let mut lanes = Lanes::new(&ScanConfig::default());
        lanes.get_mut(Lane::Return).buffer.push_str("123456");
        assert_eq!(lanes.get(Lane::Return).buffer, "123456");
        assert!(lanes.get(Lane::Damage).buffer.is_empty());
    }

    #[test]
    fn clear_buffer_bumps_generation_and_resets_classifier() {
        let mut lanes = Lanes::new(&ScanConfig::default());
        let lane = lanes.get_mut(Lane::Damage);
        let t0 = Instant::now();
        lane.buffer.push_str("12345");
        lane.classifier.observe("12345", t0);
        let before = lane.generation;

        lane.clear_buffer();
        assert!(lane.buffer.is_empty());
        assert_eq!(lane.generation, before + 1);
        // With the previous update forgotten, growth is no longer manual.
        assert!(lane.classifier.observe("123456", t0).is_auto_commit());
    }
}
