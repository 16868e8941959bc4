use crate::graph::{node::GraphNode, oversample::Oversampled, through::Through};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    /// Run this node at twice the sample rate.
    fn oversampled(self) -> Oversampled<Self> {
        Oversampled::new(self)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}
