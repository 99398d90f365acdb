//! # ExSync Gateway
//!
//! Late-bound access to an external exchange SDK.
//!
//! This crate provides:
//! - Type and member resolution by qualified name, with additive caching
//! - Uniform invocation with failure unwrapping (the original cause is
//!   always preserved)
//! - Deferred (suspending) invocation that blocks until the remote call
//!   resolves
//! - Normalization of wrapped outcome objects to their value
//!
//! ## Key Invariants
//!
//! - Caches are purely additive within a process lifetime and explicitly
//!   clearable for test isolation
//! - A cache hit always returns the handle from the first successful
//!   resolution for identical inputs
//! - Cache population uses insert-if-absent semantics, so concurrent first
//!   lookups of the same key converge on one cached value

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod outcome;
mod runtime;
mod value;

pub use error::{GatewayError, GatewayResult};
pub use gateway::ServiceGateway;
pub use outcome::{IsSuccessConvention, OutcomeConvention, SuccessConvention};
pub use runtime::{
    CapabilityRuntime, DeferredValue, MemberFlags, MemberHandle, MemberSpec, MemoryRuntime,
    SearchScope, TypeHandle,
};
pub use value::{FromSdkValue, SdkValue};
