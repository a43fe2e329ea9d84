mod callback;
mod regret_bound;
