//! Response assertions
//!
//! [`ResponseExt::expect`] turns a response into an [`Expect`] view whose
//! checks report failures to an explicit [`Reporter`].

pub mod expect;
pub mod reporter;

pub use expect::{Expect, ResponseExt};
pub use reporter::{PanicReporter, Recorder, Reporter};
