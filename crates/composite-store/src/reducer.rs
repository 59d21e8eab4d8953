/// Reducer - pure function that produces new state from current state + action
///
/// Reducers must be total (unknown actions return the input unchanged),
/// deterministic and free of side effects. Any plain function or closure
/// with the signature `Fn(S, &A) -> S` is a reducer.
pub trait Reducer<S, A>: Send {
    fn reduce(&self, state: S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(S, &A) -> S + Send,
{
    fn reduce(&self, state: S, action: &A) -> S {
        self(state, action)
    }
}
