use crate::tracker::EyeState;

/// Per-frame eye-state classifier. How it decides is its own business.
pub trait EyeClassifier<F> {
    fn classify(&mut self, frame: &F) -> EyeState;
}

impl<F, T> EyeClassifier<F> for T
where
    T: FnMut(&F) -> EyeState,
{
    fn classify(&mut self, frame: &F) -> EyeState {
        self(frame)
    }
}

/// Classifier for sources whose frames already carry an eye state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl EyeClassifier<EyeState> for PassThrough {
    fn classify(&mut self, frame: &EyeState) -> EyeState {
        *frame
    }
}
