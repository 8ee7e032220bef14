//! Sample orchestration.
//!
//! - [`provisioner`] - the remote operations, as a trait
//! - [`run`] - the ordered steps with their cleanup
//! - [`cleanup`] - resource group teardown

mod cleanup;
mod provisioner;
mod run;

pub use cleanup::{cleanup, CleanupOutcome};
pub use provisioner::{NetworkProvisioner, UnreadResourceGroup};
pub use run::{run_sample, SampleInputs, SampleReport};
