// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Objective Management
//!
//! Decides what "better" means for a resolution. A satisfaction resolution
//! has no objective; an optimization resolution tracks the best value seen
//! and, after every solution, posts a *cut* that forces subsequent solutions
//! to strictly improve on it. The bound lives outside the trail, which is
//! what lets it survive backtracking and restarts: the cut is simply posted
//! again in every freshly opened world.

use crate::engine::Contradiction;
use fathom_model::index::VariableId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;

/// The result of posting the objective cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOutcome {
    /// The network accepted the cut (possibly without any change).
    Applied,
    /// The cut wiped out the objective domain: no strictly better solution
    /// exists below the current world.
    Contradiction,
}

impl CutOutcome {
    /// Converts the outcome into the control-flow signal of a failed branch.
    #[inline]
    pub fn into_result(self) -> Result<(), Contradiction> {
        match self {
            CutOutcome::Applied => Ok(()),
            CutOutcome::Contradiction => Err(Contradiction),
        }
    }
}

/// Satisfaction, minimization or maximization of a single variable, together
/// with the best bound found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveManager<T> {
    /// No objective: every solution is as good as any other.
    #[default]
    Satisfaction,
    /// Drive the variable as low as possible.
    Minimize {
        variable: VariableId,
        best: Option<T>,
    },
    /// Drive the variable as high as possible.
    Maximize {
        variable: VariableId,
        best: Option<T>,
    },
}

impl<T> ObjectiveManager<T>
where
    T: DomainValue,
{
    /// Creates the no-objective manager.
    #[inline]
    pub fn satisfaction() -> Self {
        ObjectiveManager::Satisfaction
    }

    /// Creates a minimization manager over `variable`.
    #[inline]
    pub fn minimize(variable: VariableId) -> Self {
        ObjectiveManager::Minimize {
            variable,
            best: None,
        }
    }

    /// Creates a maximization manager over `variable`.
    #[inline]
    pub fn maximize(variable: VariableId) -> Self {
        ObjectiveManager::Maximize {
            variable,
            best: None,
        }
    }

    /// Returns `true` for minimization and maximization.
    #[inline]
    pub fn is_optimization(&self) -> bool {
        !matches!(self, ObjectiveManager::Satisfaction)
    }

    /// Returns the objective variable, if any.
    #[inline]
    pub fn variable(&self) -> Option<VariableId> {
        match self {
            ObjectiveManager::Satisfaction => None,
            ObjectiveManager::Minimize { variable, .. }
            | ObjectiveManager::Maximize { variable, .. } => Some(*variable),
        }
    }

    /// Returns the best objective value recorded so far, if any.
    #[inline]
    pub fn best(&self) -> Option<T> {
        match self {
            ObjectiveManager::Satisfaction => None,
            ObjectiveManager::Minimize { best, .. } | ObjectiveManager::Maximize { best, .. } => {
                *best
            }
        }
    }

    /// Records the objective value of the current state, keeping the better
    /// of it and the previous best. Called on every solution, where the
    /// objective variable is instantiated and its minimum is its value.
    pub fn update_best(&mut self, store: &DomainStore<T>) {
        match self {
            ObjectiveManager::Satisfaction => {}
            ObjectiveManager::Minimize { variable, best } => {
                let value = store.min(*variable);
                if best.map_or(true, |b| value < b) {
                    *best = Some(value);
                }
            }
            ObjectiveManager::Maximize { variable, best } => {
                let value = store.max(*variable);
                if best.map_or(true, |b| value > b) {
                    *best = Some(value);
                }
            }
        }
    }

    /// Tightens the network so that only strictly better solutions remain:
    /// `objective < best` for minimization, `objective > best` for
    /// maximization, nothing for satisfaction or while no solution is known.
    ///
    /// The cut acts on the current world and is undone with it; the bound
    /// itself is not trailed, so re-posting after a backtrack or restart
    /// reproduces the same pruning.
    pub fn post_cut(&self, store: &mut DomainStore<T>) -> CutOutcome {
        match self {
            ObjectiveManager::Satisfaction => CutOutcome::Applied,
            ObjectiveManager::Minimize { variable, best } => match best {
                None => CutOutcome::Applied,
                Some(b) => match b.checked_sub(&T::one()) {
                    None => CutOutcome::Contradiction,
                    Some(bound) => match store.try_set_max(*variable, bound) {
                        Ok(_) => CutOutcome::Applied,
                        Err(_) => CutOutcome::Contradiction,
                    },
                },
            },
            ObjectiveManager::Maximize { variable, best } => match best {
                None => CutOutcome::Applied,
                Some(b) => match b.checked_add(&T::one()) {
                    None => CutOutcome::Contradiction,
                    Some(bound) => match store.try_set_min(*variable, bound) {
                        Ok(_) => CutOutcome::Applied,
                        Err(_) => CutOutcome::Contradiction,
                    },
                },
            },
        }
    }
}

impl<T> std::fmt::Display for ObjectiveManager<T>
where
    T: DomainValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveManager::Satisfaction => write!(f, "Satisfaction"),
            ObjectiveManager::Minimize { variable, best } => match best {
                Some(b) => write!(f, "Minimize({}, best: {})", variable, b),
                None => write!(f, "Minimize({})", variable),
            },
            ObjectiveManager::Maximize { variable, best } => match best {
                Some(b) => write!(f, "Maximize({}, best: {})", variable, b),
                None => write!(f, "Maximize({})", variable),
            },
        }
    }
}
