use std::ops::ControlFlow;

/// An incremental computation advanced one bounded unit of work at a time.
pub trait Step<Ctx, B, C = ()> {
    type Error;

    fn step(&mut self, context: &mut Ctx) -> Result<ControlFlow<B, C>, Self::Error>;

    fn finish(&mut self, context: &mut Ctx) -> Result<B, Self::Error> {
        loop {
            if let ControlFlow::Break(outcome) = self.step(context)? {
                return Ok(outcome);
            }
        }
    }

    /// Like [`Step::finish`], but gives up with `None` after `limit` steps.
    fn finish_within(&mut self, context: &mut Ctx, limit: usize) -> Result<Option<B>, Self::Error> {
        for _ in 0..limit {
            if let ControlFlow::Break(outcome) = self.step(context)? {
                return Ok(Some(outcome));
            }
        }

        Ok(None)
    }
}
