//! Mocks registration module.
//!
//! - [`Mocker`](mocker::Mocker): Contract every registered mock satisfies
//! - [`Controller`](controller::Controller): Holds registered mocks and fans out finish/wait over them

pub mod controller;
pub mod mocker;
