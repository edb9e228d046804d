use crate::{navigation::HeaderEntry, parsing::blocks::Block};

/// Receives the output of a render pass.
pub trait RenderSink {
    /// A new render started; anything received so far is obsolete.
    fn reset(&mut self);

    /// One completed block, in source order.
    fn push(&mut self, block: Block);

    /// The render reached the end of its document.
    fn finished(&mut self, headings: &[HeaderEntry]);
}

/// Collects render output in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    pub blocks: Vec<Block>,
    pub headings: Vec<HeaderEntry>,
    pub finished: bool,
}

impl RenderSink for VecSink {
    fn reset(&mut self) {
        self.blocks.clear();
        self.headings.clear();
        self.finished = false;
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn finished(&mut self, headings: &[HeaderEntry]) {
        self.headings = headings.to_vec();
        self.finished = true;
    }
}
