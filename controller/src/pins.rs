use powerplug_common::{Level, OutputId};
use tracing::info;

/// Physical output driver. Writes are assumed to always succeed; a hardware
/// fault is outside this layer.
pub trait OutputPins {
    fn write(&mut self, id: OutputId, level: Level);
}

/// Host stand-in: GPIO writes become log lines, deduplicated so the
/// per-pass level sync only logs actual transitions.
pub struct LogPins {
    last: [Option<Level>; 2],
}

impl LogPins {
    pub fn new() -> Self {
        Self { last: [None, None] }
    }

    fn slot(id: OutputId) -> usize {
        match id {
            OutputId::Indicator => 0,
            OutputId::Relay => 1,
        }
    }
}

impl OutputPins for LogPins {
    fn write(&mut self, id: OutputId, level: Level) {
        let slot = Self::slot(id);
        if self.last[slot] == Some(level) {
            return;
        }
        self.last[slot] = Some(level);
        info!(
            "{} (GPIO {}) -> {}",
            id.as_str(),
            id.pin(),
            level.as_digit()
        );
    }
}
