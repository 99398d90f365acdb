//! The capability runtime seam and its in-memory test implementation.

use crate::value::SdkValue;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

/// Which SDK module a type lookup scans first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchScope {
    /// The core data-model module.
    DataModel,
    /// The transport/client module.
    Client,
    /// All loaded modules, in load order.
    All,
}

/// An opaque handle to a resolved SDK type.
///
/// Handles compare by resolution token: two handles are equal exactly when
/// they came from the same resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    /// Resolution token assigned by the runtime.
    pub token: u64,
    /// Qualified type name.
    pub name: String,
}

/// An opaque handle to a resolved SDK member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberHandle {
    /// Resolution token assigned by the runtime.
    pub token: u64,
    /// Token of the owning type.
    pub type_token: u64,
    /// Member name.
    pub name: String,
}

/// Binding flags narrowing a member lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemberFlags {
    /// Match static members instead of instance members.
    pub is_static: bool,
    /// Include non-public members in the search.
    pub non_public: bool,
}

/// Identifies a member to resolve: name, flags and optional signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberSpec {
    /// Member name.
    pub name: String,
    /// Binding flags.
    pub flags: MemberFlags,
    /// Parameter type names, when disambiguation is needed.
    pub signature: Option<Vec<String>>,
}

impl MemberSpec {
    /// Creates a spec matching an instance member by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: MemberFlags::default(),
            signature: None,
        }
    }

    /// Sets the binding flags.
    #[must_use]
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the parameter-type signature.
    #[must_use]
    pub fn with_signature(mut self, signature: Vec<String>) -> Self {
        self.signature = Some(signature);
        self
    }
}

/// The result of a suspending SDK call.
///
/// Resolution blocks the calling thread; cancellation is not supported at
/// this layer and must be propagated by the caller above.
pub struct DeferredValue {
    receiver: mpsc::Receiver<Result<SdkValue, String>>,
}

impl DeferredValue {
    /// Creates an already-resolved deferred value.
    #[must_use]
    pub fn ready(result: Result<SdkValue, String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        // Receiver holds the buffered message; send cannot fail here.
        let _ = sender.send(result);
        Self { receiver }
    }

    /// Creates an unresolved deferred value and its resolver.
    #[must_use]
    pub fn pending() -> (mpsc::Sender<Result<SdkValue, String>>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self { receiver })
    }

    /// Blocks until the call resolves.
    pub fn wait(self) -> Result<SdkValue, String> {
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err("deferred call abandoned".to_string()))
    }
}

/// Access to the external SDK: lookups and invocations.
///
/// Raw failures are reported as plain strings; the gateway wraps them into
/// structured errors without losing the original message.
pub trait CapabilityRuntime: Send + Sync {
    /// Looks up a type by qualified name, scanning `scope` first.
    fn lookup_type(&self, name: &str, scope: SearchScope) -> Option<TypeHandle>;

    /// Looks up a member of a resolved type.
    fn lookup_member(&self, ty: &TypeHandle, spec: &MemberSpec) -> Option<MemberHandle>;

    /// Invokes a resolved member synchronously.
    fn call(
        &self,
        target: Option<&SdkValue>,
        member: &MemberHandle,
        args: &[SdkValue],
    ) -> Result<SdkValue, String>;

    /// Issues a suspending invocation.
    ///
    /// The default implementation runs [`CapabilityRuntime::call`] eagerly
    /// and returns an already-resolved value.
    fn call_deferred(
        &self,
        target: Option<&SdkValue>,
        member: &MemberHandle,
        args: &[SdkValue],
    ) -> Result<DeferredValue, String> {
        Ok(DeferredValue::ready(self.call(target, member, args)))
    }
}

type MemberBody = Arc<dyn Fn(Option<&SdkValue>, &[SdkValue]) -> Result<SdkValue, String> + Send + Sync>;

/// An in-memory capability runtime for tests and loopback hosts.
///
/// Types and members are registered up front; lookups are counted so cache
/// behavior can be asserted.
#[derive(Default)]
pub struct MemoryRuntime {
    next_token: AtomicU64,
    types: Mutex<HashMap<String, TypeHandle>>,
    members: Mutex<HashMap<(u64, String), (MemberHandle, MemberBody)>>,
    type_lookups: AtomicUsize,
    member_lookups: AtomicUsize,
}

impl MemoryRuntime {
    /// Creates an empty runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type under its qualified name.
    pub fn register_type(&self, name: impl Into<String>) -> TypeHandle {
        let name = name.into();
        let handle = TypeHandle {
            token: self.next_token.fetch_add(1, Ordering::SeqCst),
            name: name.clone(),
        };
        self.types.lock().insert(name, handle.clone());
        handle
    }

    /// Registers a member with its behavior.
    pub fn register_member<F>(&self, ty: &TypeHandle, name: impl Into<String>, body: F) -> MemberHandle
    where
        F: Fn(Option<&SdkValue>, &[SdkValue]) -> Result<SdkValue, String> + Send + Sync + 'static,
    {
        let name = name.into();
        let handle = MemberHandle {
            token: self.next_token.fetch_add(1, Ordering::SeqCst),
            type_token: ty.token,
            name: name.clone(),
        };
        self.members
            .lock()
            .insert((ty.token, name), (handle.clone(), Arc::new(body)));
        handle
    }

    /// Number of type lookups that reached the runtime.
    #[must_use]
    pub fn type_lookups(&self) -> usize {
        self.type_lookups.load(Ordering::SeqCst)
    }

    /// Number of member lookups that reached the runtime.
    #[must_use]
    pub fn member_lookups(&self) -> usize {
        self.member_lookups.load(Ordering::SeqCst)
    }
}

impl CapabilityRuntime for MemoryRuntime {
    fn lookup_type(&self, name: &str, _scope: SearchScope) -> Option<TypeHandle> {
        self.type_lookups.fetch_add(1, Ordering::SeqCst);
        self.types.lock().get(name).cloned()
    }

    fn lookup_member(&self, ty: &TypeHandle, spec: &MemberSpec) -> Option<MemberHandle> {
        self.member_lookups.fetch_add(1, Ordering::SeqCst);
        self.members
            .lock()
            .get(&(ty.token, spec.name.clone()))
            .map(|(handle, _)| handle.clone())
    }

    fn call(
        &self,
        target: Option<&SdkValue>,
        member: &MemberHandle,
        args: &[SdkValue],
    ) -> Result<SdkValue, String> {
        let body = self
            .members
            .lock()
            .get(&(member.type_token, member.name.clone()))
            .map(|(_, body)| Arc::clone(body))
            .ok_or_else(|| format!("member not registered: {}", member.name))?;
        body(target, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_type_is_found() {
        let runtime = MemoryRuntime::new();
        runtime.register_type("Exchange.DataModel.Asset");

        let handle = runtime
            .lookup_type("Exchange.DataModel.Asset", SearchScope::DataModel)
            .unwrap();
        assert_eq!(handle.name, "Exchange.DataModel.Asset");
        assert!(runtime.lookup_type("Missing", SearchScope::All).is_none());
    }

    #[test]
    fn member_call_dispatches_to_body() {
        let runtime = MemoryRuntime::new();
        let ty = runtime.register_type("Exchange.Client");
        let member = runtime.register_member(&ty, "Ping", |_, args| {
            Ok(SdkValue::Integer(args.len() as i64))
        });

        let result = runtime
            .call(None, &member, &[SdkValue::Null, SdkValue::Null])
            .unwrap();
        assert_eq!(result, SdkValue::Integer(2));
    }

    #[test]
    fn deferred_ready_resolves_immediately() {
        let deferred = DeferredValue::ready(Ok(SdkValue::text("done")));
        assert_eq!(deferred.wait().unwrap(), SdkValue::text("done"));
    }

    #[test]
    fn deferred_pending_resolves_from_another_thread() {
        let (resolver, deferred) = DeferredValue::pending();
        let handle = std::thread::spawn(move || deferred.wait());
        resolver.send(Ok(SdkValue::Integer(7))).unwrap();
        assert_eq!(handle.join().unwrap().unwrap(), SdkValue::Integer(7));
    }

    #[test]
    fn abandoned_deferred_reports_error() {
        let (resolver, deferred) = DeferredValue::pending();
        drop(resolver);
        assert!(deferred.wait().is_err());
    }
}
