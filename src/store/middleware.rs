use crate::error::StoreError;

type MiddlewareFn<S> = dyn Fn(&S, S) -> Result<S, String> + Send + Sync;

/// A named stage in the update pipeline.
///
/// Stages run in registration order. Each one receives the pre-update state
/// and the proposed state produced by the previous stage, and either returns
/// the state to hand onward (possibly transformed) or a reason string that
/// rejects the whole update. There is no continuation callback to forget or
/// double-invoke; returning is advancing.
pub struct Middleware<S> {
    name: String,
    run: Box<MiddlewareFn<S>>,
}

impl<S> Middleware<S> {
    /// Create a middleware stage.
    ///
    /// The name identifies the stage in rejection errors and logs.
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&S, S) -> Result<S, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, current: &S, proposed: S) -> Result<S, StoreError> {
        (self.run)(current, proposed).map_err(|reason| StoreError::Rejected {
            middleware: self.name.clone(),
            reason,
        })
    }
}

/// Run the full stack against a proposed state.
///
/// `current` stays the pre-update state for every stage; `proposed` threads
/// through the stages in order. The first rejection aborts the chain.
pub(crate) fn run_chain<S>(
    stack: &[Middleware<S>],
    current: &S,
    mut proposed: S,
) -> Result<S, StoreError> {
    for middleware in stack {
        proposed = match middleware.apply(current, proposed) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(middleware = middleware.name(), error = %err, "update rejected");
                return Err(err);
            }
        };
    }
    Ok(proposed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_runs_in_registration_order() {
        let stack = vec![
            Middleware::new("add-one", |_: &Vec<i32>, mut next: Vec<i32>| {
                next.push(1);
                Ok(next)
            }),
            Middleware::new("add-two", |_: &Vec<i32>, mut next: Vec<i32>| {
                next.push(2);
                Ok(next)
            }),
        ];

        let result = run_chain(&stack, &vec![], vec![0]).unwrap();
        assert_eq!(result, vec![0, 1, 2]);
    }

    #[test]
    fn every_stage_sees_the_pre_update_state() {
        let stack = vec![
            Middleware::new("double", |_: &i32, next: i32| Ok(next * 2)),
            Middleware::new("check-origin", |current: &i32, next: i32| {
                assert_eq!(*current, 10);
                Ok(next)
            }),
        ];

        assert_eq!(run_chain(&stack, &10, 3).unwrap(), 6);
    }

    #[test]
    fn rejection_names_the_stage() {
        let stack = vec![
            Middleware::new("pass", |_: &i32, next: i32| Ok(next)),
            Middleware::new("no-negatives", |_: &i32, next: i32| {
                if next < 0 {
                    Err("negative values are not allowed".to_string())
                } else {
                    Ok(next)
                }
            }),
        ];

        let err = run_chain(&stack, &0, -1).unwrap_err();
        match err {
            StoreError::Rejected { middleware, reason } => {
                assert_eq!(middleware, "no-negatives");
                assert_eq!(reason, "negative values are not allowed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_chain_passes_through() {
        let stack: Vec<Middleware<i32>> = Vec::new();
        assert_eq!(run_chain(&stack, &0, 7).unwrap(), 7);
    }
}
