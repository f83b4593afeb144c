use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Materializing,
    Harvesting,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Materializing => "materializing",
            Stage::Harvesting => "harvesting",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub done: usize,
    pub total: usize,
    pub elapsed_wall_s: f64,
}

impl ProgressEvent {
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Adapts a per-item `(done, total)` callback into stage events.
pub(crate) struct Reporter<'a> {
    stage: Stage,
    started: Instant,
    sink: Option<&'a mut dyn FnMut(ProgressEvent)>,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(stage: Stage, sink: Option<&'a mut dyn FnMut(ProgressEvent)>) -> Self {
        Self {
            stage,
            started: Instant::now(),
            sink,
        }
    }

    pub(crate) fn tick(&mut self, done: usize, total: usize) {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink(ProgressEvent {
                stage: self.stage,
                done,
                total,
                elapsed_wall_s: self.started.elapsed().as_secs_f64(),
            });
        }
    }
}
