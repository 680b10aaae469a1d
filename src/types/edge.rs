/// One forward edge of a network, with the flow a solver assigned to it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlowEdge<N> {
    pub from: N,
    pub to: N,
    pub capacity: u64,
    pub flow: u64,
}

impl<N> FlowEdge<N> {
    pub fn is_saturated(&self) -> bool {
        self.flow == self.capacity
    }
}
