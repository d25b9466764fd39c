// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token, resolved to a Principal)
// → Private (no auth, mounted only in the local environment)
pub mod private;
pub mod protected;
pub mod public;
