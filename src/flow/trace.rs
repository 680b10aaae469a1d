/// Records every augmentation a solver performs: the path it pushed along,
/// the bottleneck amount, and the running total afterwards.
pub struct FlowTrace<N> {
    steps: Vec<TraceStep<N>>,
}

pub struct TraceStep<N> {
    pub path: Vec<N>,
    pub amount: u64,
    pub total: u64,
}

impl<N> FlowTrace<N> {
    pub fn new() -> Self {
        FlowTrace { steps: Vec::new() }
    }

    pub fn record_step(&mut self, path: Vec<N>, amount: u64, total: u64) {
        self.steps.push(TraceStep {
            path,
            amount,
            total,
        });
    }

    pub fn steps(&self) -> &[TraceStep<N>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<N> Default for FlowTrace<N> {
    fn default() -> Self {
        FlowTrace::new()
    }
}
