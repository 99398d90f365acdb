//! The service gateway: cached resolution and uniform invocation.

use crate::error::{GatewayError, GatewayResult};
use crate::outcome::{IsSuccessConvention, OutcomeConvention, SuccessConvention};
use crate::runtime::{CapabilityRuntime, MemberHandle, MemberSpec, SearchScope, TypeHandle};
use crate::value::{FromSdkValue, SdkValue};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Cache key for member resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemberKey {
    type_token: u64,
    spec: MemberSpec,
}

/// Invokes capabilities of an external SDK by name at runtime.
///
/// Resolution results are cached additively for the lifetime of the gateway;
/// caches are safe for concurrent reads and populated with insert-if-absent
/// semantics. [`ServiceGateway::clear_caches`] exists for test isolation.
pub struct ServiceGateway<R: CapabilityRuntime> {
    runtime: R,
    type_cache: RwLock<HashMap<String, TypeHandle>>,
    member_cache: RwLock<HashMap<MemberKey, MemberHandle>>,
}

impl<R: CapabilityRuntime> ServiceGateway<R> {
    /// Creates a gateway over the given runtime.
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            type_cache: RwLock::new(HashMap::new()),
            member_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the underlying runtime.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Resolves a type by qualified name, scanning `scope` first.
    ///
    /// Returns `None` when the type is absent; absence is never an error at
    /// this layer, callers decide whether it is fatal. Misses are not
    /// cached.
    pub fn resolve_type(&self, name: &str, scope: SearchScope) -> Option<TypeHandle> {
        if let Some(handle) = self.type_cache.read().get(name) {
            trace!(name, "type cache hit");
            return Some(handle.clone());
        }

        let resolved = self.runtime.lookup_type(name, scope)?;
        debug!(name, token = resolved.token, "resolved type");
        let mut cache = self.type_cache.write();
        // Insert-if-absent: a racing first lookup wins and later callers
        // observe its handle.
        Some(
            cache
                .entry(name.to_string())
                .or_insert(resolved)
                .clone(),
        )
    }

    /// Resolves a member of a resolved type.
    ///
    /// Cached by `(type, name, flags, signature)`. Returns `None` on miss.
    pub fn resolve_member(&self, ty: &TypeHandle, spec: &MemberSpec) -> Option<MemberHandle> {
        let key = MemberKey {
            type_token: ty.token,
            spec: spec.clone(),
        };
        if let Some(handle) = self.member_cache.read().get(&key) {
            trace!(member = %spec.name, "member cache hit");
            return Some(handle.clone());
        }

        let resolved = self.runtime.lookup_member(ty, spec)?;
        debug!(member = %spec.name, token = resolved.token, "resolved member");
        let mut cache = self.member_cache.write();
        Some(cache.entry(key).or_insert(resolved).clone())
    }

    /// Resolves a member or fails with a fatal [`GatewayError::Resolution`].
    pub fn require_member(&self, ty: &TypeHandle, spec: &MemberSpec) -> GatewayResult<MemberHandle> {
        self.resolve_member(ty, spec)
            .ok_or_else(|| GatewayError::resolution(format!("{}.{}", ty.name, spec.name)))
    }

    /// Invokes a resolved member.
    ///
    /// On failure the underlying cause is unwrapped into a uniform error
    /// with the original message preserved.
    pub fn invoke(
        &self,
        target: Option<&SdkValue>,
        member: &MemberHandle,
        args: &[SdkValue],
    ) -> GatewayResult<SdkValue> {
        self.runtime
            .call(target, member, args)
            .map_err(|message| GatewayError::invocation(member.name.clone(), message))
    }

    /// Issues a suspending invocation and blocks until it resolves.
    ///
    /// Cancellation is not supported at this layer; propagate cancellation
    /// from the caller above.
    pub fn invoke_deferred(
        &self,
        target: Option<&SdkValue>,
        member: &MemberHandle,
        args: &[SdkValue],
    ) -> GatewayResult<SdkValue> {
        let deferred = self
            .runtime
            .call_deferred(target, member, args)
            .map_err(|message| GatewayError::invocation(member.name.clone(), message))?;
        deferred
            .wait()
            .map_err(|message| GatewayError::invocation(member.name.clone(), message))
    }

    /// Normalizes a possibly wrapped outcome object.
    ///
    /// Wrapped outcomes (either naming convention) yield their `Value` on
    /// success and a [`GatewayError::Outcome`] carrying the failure
    /// message(s) otherwise. Values that are not wrappers pass through
    /// unchanged; `Null` stays `Null`.
    pub fn normalize(&self, raw: SdkValue) -> GatewayResult<SdkValue> {
        if raw.is_null() {
            return Ok(SdkValue::Null);
        }

        let conventions: [&dyn OutcomeConvention; 2] = [&IsSuccessConvention, &SuccessConvention];
        for convention in conventions {
            if let Some(success) = convention.success_flag(&raw) {
                if success {
                    return Ok(convention.value(&raw).cloned().unwrap_or(SdkValue::Null));
                }
                let mut messages = convention.failures(&raw);
                if messages.is_empty() {
                    messages.push("operation failed without a message".to_string());
                }
                return Err(GatewayError::outcome(messages));
            }
        }

        Ok(raw)
    }

    /// Normalizes an outcome and converts it to a concrete type.
    ///
    /// `Null` yields the type's zero value.
    pub fn normalize_as<T: FromSdkValue>(&self, raw: SdkValue) -> GatewayResult<T> {
        let value = self.normalize(raw)?;
        if value.is_null() {
            return Ok(T::default());
        }
        T::from_sdk_value(&value).ok_or(GatewayError::Conversion {
            expected: T::EXPECTED,
        })
    }

    /// Clears all resolution caches.
    pub fn clear_caches(&self) {
        self.type_cache.write().clear();
        self.member_cache.write().clear();
        debug!("gateway caches cleared");
    }
}
