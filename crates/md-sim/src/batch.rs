//! Independent replications across seeds.

use md_core::TravelTimes;
use md_policy::Policy;

use crate::{run_day, DaySummary, MealDeliveryMdp, NoopObserver, SimResult};

/// Simulate one day per seed and return the summaries in seed order.
///
/// `make` builds a fresh engine and policy for a seed, so replications share
/// nothing.  With the `parallel` feature they run on Rayon's thread pool;
/// results are identical either way.
pub fn replicate<T, P, F>(seeds: &[u64], max_steps: u64, make: F) -> SimResult<Vec<DaySummary>>
where
    T: TravelTimes,
    P: Policy,
    F: Fn(u64) -> SimResult<(MealDeliveryMdp<T>, P)> + Sync + Send,
{
    let run_one = |&seed: &u64| -> SimResult<DaySummary> {
        let (mut mdp, mut policy) = make(seed)?;
        run_day(&mut mdp, &mut policy, &mut NoopObserver, max_steps)
    };

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(run_one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        seeds.par_iter().map(run_one).collect()
    }
}
