//! Role resolution and phase coordination
//!
//! Every compensable call enters [`resolve_role`]; the result selects one
//! path through [`Coordinator::coordinate`], which drives the
//! [`TransactionManager`] and the intercepted business logic, and always
//! finishes with cleanup.

use crate::error::{CoordinatorError, InterceptError};
use crate::manager::TransactionManager;
use crate::scope::TransactionScope;
use crate::transaction::Transaction;
use std::future::Future;
use std::sync::Arc;
use tcc_common::{ParticipantRole, ParticipantStatus, TransactionStatus, TransactionXid};
use tcc_protocol::{TransactionContext, TransactionPhase};

/// Per-call-site dispatch options
///
/// Both flags default to synchronous: the call blocks until the
/// confirm/cancel fan-out completes and observes its errors. Setting a
/// flag makes the corresponding decision fire-and-forget.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompensableOptions {
    /// Dispatch confirmation without blocking the return of this call
    pub async_confirm: bool,
    /// Dispatch cancellation without blocking the return of this call
    pub async_cancel: bool,
}

/// Description of one intercepted call
#[derive(Debug, Clone)]
pub struct CompensableCall {
    /// Whether the call site is marked compensable
    pub compensable: bool,
    /// Inbound transaction context, when this call arrived over RPC
    pub context: Option<TransactionContext>,
    /// Dispatch options for this call site
    pub options: CompensableOptions,
}

impl CompensableCall {
    /// A compensable call with no inbound context (root candidate)
    pub fn root(options: CompensableOptions) -> Self {
        Self {
            compensable: true,
            context: None,
            options,
        }
    }

    /// A compensable call carrying an inbound context (provider candidate)
    pub fn inbound(context: TransactionContext, options: CompensableOptions) -> Self {
        Self {
            compensable: true,
            context: Some(context),
            options,
        }
    }
}

/// Classify the role a call plays in an in-flight transaction
///
/// Pure function of its inputs, recomputed per call:
/// - `Root` iff the call is compensable, carries no inbound context, and
///   no transaction is active on the call chain.
/// - `Provider` iff the call is compensable, carries an inbound context,
///   and no transaction is active on the call chain.
/// - `Normal` otherwise.
pub fn resolve_role(
    compensable: bool,
    context: Option<&TransactionContext>,
    active: Option<&Transaction>,
) -> ParticipantRole {
    if !compensable || active.is_some() {
        return ParticipantRole::Normal;
    }
    match context {
        None => ParticipantRole::Root,
        Some(_) => ParticipantRole::Provider,
    }
}

/// Releases the call's transaction binding when the coordination call
/// exits, whichever way it exits.
struct CompletionGuard<'a, M: TransactionManager + ?Sized> {
    manager: &'a M,
    scope: &'a TransactionScope,
    transaction: Option<Transaction>,
}

impl<'a, M: TransactionManager + ?Sized> CompletionGuard<'a, M> {
    fn new(manager: &'a M, scope: &'a TransactionScope) -> Self {
        Self {
            manager,
            scope,
            transaction: None,
        }
    }

    fn hold(&mut self, transaction: Transaction) {
        self.transaction = Some(transaction);
    }
}

impl<M: TransactionManager + ?Sized> Drop for CompletionGuard<'_, M> {
    fn drop(&mut self) {
        self.manager
            .clean_after_completion(self.scope, self.transaction.as_ref());
    }
}

/// Drives the Try/Confirm/Cancel protocol around intercepted business
/// calls
pub struct Coordinator<M: TransactionManager> {
    manager: Arc<M>,
}

impl<M: TransactionManager> Coordinator<M> {
    /// Create a coordinator over the given manager
    pub fn new(manager: Arc<M>) -> Self {
        Self { manager }
    }

    /// The manager this coordinator drives
    pub fn manager(&self) -> &Arc<M> {
        &self.manager
    }

    /// Run one compensable call under the protocol
    ///
    /// `business` is the intercepted logic; it is invoked for root,
    /// trying-provider, and pass-through calls, and skipped entirely on
    /// the Confirm/Cancel decision passes, which return `T::default()`.
    /// That default carries no information and must not be inspected.
    ///
    /// Business errors are re-raised unchanged as
    /// [`InterceptError::Business`]; the only coordination failure a
    /// Cancel delivery can surface is
    /// [`CoordinatorError::IllegalTransactionStatus`].
    pub async fn coordinate<T, E, F, Fut>(
        &self,
        scope: &TransactionScope,
        call: &CompensableCall,
        business: F,
    ) -> Result<T, InterceptError<E>>
    where
        T: Default,
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let active = self.manager.current(scope);
        let role = resolve_role(call.compensable, call.context.as_ref(), active.as_ref());

        match (role, &call.context) {
            (ParticipantRole::Root, _) => self.root_call(scope, call.options, business).await,
            (ParticipantRole::Provider, Some(context)) => {
                self.provider_call(scope, context, call.options, business)
                    .await
            }
            _ => business().await.map_err(InterceptError::Business),
        }
    }

    /// Root path: begin, run business, commit on success or rollback on
    /// failure, cleanup always
    async fn root_call<T, E, F, Fut>(
        &self,
        scope: &TransactionScope,
        options: CompensableOptions,
        business: F,
    ) -> Result<T, InterceptError<E>>
    where
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut guard = CompletionGuard::new(self.manager.as_ref(), scope);
        let transaction = self.manager.begin(scope, TransactionXid::new())?;
        tracing::debug!("began root transaction {}", transaction.xid);
        guard.hold(transaction);

        match business().await {
            Ok(value) => {
                self.manager.commit(scope, options.async_confirm)?;
                Ok(value)
            }
            Err(trying_err) => {
                // The caller must see the true failure; a rollback error
                // is logged rather than allowed to mask it.
                if let Err(rollback_err) = self.manager.rollback(scope, options.async_cancel) {
                    tracing::error!(
                        "rollback after failed try did not complete: {}",
                        rollback_err
                    );
                }
                Err(InterceptError::Business(trying_err))
            }
        }
    }

    /// Provider path: driven entirely by the inbound context's phase
    async fn provider_call<T, E, F, Fut>(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
        options: CompensableOptions,
        business: F,
    ) -> Result<T, InterceptError<E>>
    where
        T: Default,
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match context.phase() {
            TransactionPhase::Trying => self.provider_try(scope, context, business).await,
            TransactionPhase::Confirming => {
                self.provider_confirm(scope, context, options)?;
                Ok(T::default())
            }
            TransactionPhase::Cancelling => {
                self.provider_cancel(scope, context, options)?;
                Ok(T::default())
            }
        }
    }

    async fn provider_try<T, E, F, Fut>(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
        business: F,
    ) -> Result<T, InterceptError<E>>
    where
        E: std::error::Error,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut guard = CompletionGuard::new(self.manager.as_ref(), scope);
        let transaction = self.manager.propagation_new_begin(scope, context)?;
        guard.hold(transaction);

        match business().await {
            Ok(value) => {
                self.manager
                    .change_status(scope, TransactionStatus::TrySuccess)?;
                Ok(value)
            }
            Err(trying_err) => {
                if let Err(status_err) = self
                    .manager
                    .change_status(scope, TransactionStatus::TryFailed)
                {
                    tracing::error!("failed to record try failure: {}", status_err);
                }
                Err(InterceptError::Business(trying_err))
            }
        }
    }

    fn provider_confirm(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
        options: CompensableOptions,
    ) -> crate::error::Result<()> {
        let mut guard = CompletionGuard::new(self.manager.as_ref(), scope);

        match self.manager.propagation_exist_begin(scope, context) {
            Ok(transaction) => {
                guard.hold(transaction);
                self.manager.commit(scope, options.async_confirm)?;
            }
            Err(CoordinatorError::NoExistedTransaction(xid)) => {
                // Already confirmed by an earlier delivery of this same
                // decision; a duplicate resolves as a no-op.
                tracing::warn!(
                    "no existing branch for {} at confirm stage, treating as already confirmed",
                    xid
                );
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }

    fn provider_cancel(
        &self,
        scope: &TransactionScope,
        context: &TransactionContext,
        options: CompensableOptions,
    ) -> crate::error::Result<()> {
        // The caller's own last-known Try outcome, carried to break the
        // race where this branch's status change has not landed yet.
        let reported = context.participant_status();

        let mut guard = CompletionGuard::new(self.manager.as_ref(), scope);

        match self.manager.propagation_exist_begin(scope, context) {
            Ok(transaction) => {
                let status = transaction.status;
                guard.hold(transaction);

                let safe = matches!(
                    status,
                    TransactionStatus::TrySuccess
                        | TransactionStatus::TryFailed
                        | TransactionStatus::Cancelling
                ) || reported == ParticipantStatus::TrySuccess;

                if safe {
                    self.manager.rollback(scope, options.async_cancel)?;
                } else if status == TransactionStatus::Trying {
                    // Try outcome genuinely unknown on both sides. The
                    // Try may still complete concurrently, so only the
                    // recovery job may resolve this.
                    self.log_refusal(scope);
                    return Err(CoordinatorError::IllegalTransactionStatus(format!(
                        "branch {} is still trying and the caller reported {}, \
                         cannot rollback directly, waiting for recovery job",
                        context.xid(),
                        reported
                    )));
                } else {
                    self.log_refusal(scope);
                    return Err(CoordinatorError::IllegalTransactionStatus(format!(
                        "branch {} reached cancel stage in unexpected status {}",
                        context.xid(),
                        status
                    )));
                }
            }
            Err(CoordinatorError::NoExistedTransaction(xid)) => {
                // Already rolled back by an earlier delivery.
                tracing::info!(
                    "no existing branch for {} at cancel stage, treating as already cancelled",
                    xid
                );
            }
            Err(other) => return Err(other),
        }
        Ok(())
    }

    /// Log a refused cancel with the branch's full record for diagnosis.
    /// Both refusal outcomes go through here. Serialization problems
    /// stay local to the log line.
    fn log_refusal(&self, scope: &TransactionScope) {
        if let Some(transaction) = scope.current() {
            let detail = serde_json::to_string(&transaction).unwrap_or_else(|e| {
                tracing::error!("failed to serialize transaction for logging: {}", e);
                transaction.xid.to_string()
            });
            tracing::warn!("refusing cancel for branch: {}", detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use parking_lot::Mutex;
    use tcc_common::TransactionXid;

    #[derive(Debug, thiserror::Error)]
    #[error("business failed: {0}")]
    struct BusinessError(&'static str);

    /// Manager double that records the operation sequence and serves a
    /// configurable branch record.
    struct RecordingManager {
        ops: Mutex<Vec<String>>,
        branch_status: Mutex<Option<TransactionStatus>>,
        fail_commit: bool,
    }

    impl RecordingManager {
        fn new() -> Self {
            Self {
                ops: Mutex::new(Vec::new()),
                branch_status: Mutex::new(None),
                fail_commit: false,
            }
        }

        fn with_branch(status: TransactionStatus) -> Self {
            let manager = Self::new();
            *manager.branch_status.lock() = Some(status);
            manager
        }

        fn failing_commit() -> Self {
            let mut manager = Self::new();
            manager.fail_commit = true;
            manager
        }

        fn ops(&self) -> Vec<String> {
            self.ops.lock().clone()
        }

        fn record(&self, op: &str) {
            self.ops.lock().push(op.to_string());
        }
    }

    impl TransactionManager for RecordingManager {
        fn current(&self, scope: &TransactionScope) -> Option<Transaction> {
            scope.current()
        }

        fn begin(&self, scope: &TransactionScope, xid: TransactionXid) -> Result<Transaction> {
            self.record("begin");
            let transaction = Transaction::root(xid);
            scope.bind(transaction.clone());
            Ok(transaction)
        }

        fn propagation_new_begin(
            &self,
            scope: &TransactionScope,
            context: &TransactionContext,
        ) -> Result<Transaction> {
            self.record("propagation_new_begin");
            let transaction = Transaction::branch(*context.xid());
            scope.bind(transaction.clone());
            Ok(transaction)
        }

        fn propagation_exist_begin(
            &self,
            scope: &TransactionScope,
            context: &TransactionContext,
        ) -> Result<Transaction> {
            self.record("propagation_exist_begin");
            let status = self
                .branch_status
                .lock()
                .ok_or(CoordinatorError::NoExistedTransaction(*context.xid()))?;
            let mut transaction = Transaction::branch(*context.xid());
            transaction.status = status;
            scope.bind(transaction.clone());
            Ok(transaction)
        }

        fn change_status(&self, _scope: &TransactionScope, status: TransactionStatus) -> Result<()> {
            self.record(&format!("change_status:{}", status));
            Ok(())
        }

        fn commit(&self, _scope: &TransactionScope, async_confirm: bool) -> Result<()> {
            self.record(&format!("commit:async={}", async_confirm));
            if self.fail_commit {
                return Err(CoordinatorError::Storage("commit refused".into()));
            }
            Ok(())
        }

        fn rollback(&self, _scope: &TransactionScope, async_cancel: bool) -> Result<()> {
            self.record(&format!("rollback:async={}", async_cancel));
            Ok(())
        }

        fn clean_after_completion(
            &self,
            scope: &TransactionScope,
            transaction: Option<&Transaction>,
        ) {
            self.record("clean_after_completion");
            if transaction.is_some() {
                scope.unbind();
            }
        }
    }

    fn coordinator(manager: RecordingManager) -> Coordinator<RecordingManager> {
        Coordinator::new(Arc::new(manager))
    }

    fn trying_context() -> TransactionContext {
        TransactionContext::trying(TransactionXid::new().derive_branch())
    }

    fn context_for(phase: TransactionPhase, reported: ParticipantStatus) -> TransactionContext {
        TransactionContext::new(TransactionXid::new().derive_branch(), phase, reported)
    }

    async fn ok_business() -> std::result::Result<u32, BusinessError> {
        Ok(7)
    }

    async fn failing_business() -> std::result::Result<u32, BusinessError> {
        Err(BusinessError("boom"))
    }

    // --- role resolution ---

    #[test]
    fn test_role_table() {
        let context = trying_context();
        let active = Transaction::root(TransactionXid::new());

        // compensable x context x active, all eight combinations
        let cases = [
            (true, None, None, ParticipantRole::Root),
            (true, Some(&context), None, ParticipantRole::Provider),
            (true, None, Some(&active), ParticipantRole::Normal),
            (true, Some(&context), Some(&active), ParticipantRole::Normal),
            (false, None, None, ParticipantRole::Normal),
            (false, Some(&context), None, ParticipantRole::Normal),
            (false, None, Some(&active), ParticipantRole::Normal),
            (false, Some(&context), Some(&active), ParticipantRole::Normal),
        ];

        for (compensable, ctx, act, expected) in cases {
            assert_eq!(resolve_role(compensable, ctx, act), expected);
        }
    }

    // --- root path ---

    #[tokio::test]
    async fn test_root_success_commits() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::root(CompensableOptions::default());

        let value = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(
            coordinator.manager().ops(),
            vec!["begin", "commit:async=false", "clean_after_completion"]
        );
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_root_failure_rolls_back_and_reraises() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::root(CompensableOptions::default());

        let err = coordinator
            .coordinate(&scope, &call, failing_business)
            .await
            .unwrap_err();

        let business = err.business().expect("business error must pass through");
        assert_eq!(business.0, "boom");
        assert_eq!(
            coordinator.manager().ops(),
            vec!["begin", "rollback:async=false", "clean_after_completion"]
        );
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_root_commit_error_still_cleans_up() {
        let coordinator = coordinator(RecordingManager::failing_commit());
        let scope = TransactionScope::new();
        let call = CompensableCall::root(CompensableOptions::default());

        let err = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InterceptError::Coordinator(CoordinatorError::Storage(_))
        ));
        assert_eq!(
            coordinator.manager().ops(),
            vec!["begin", "commit:async=false", "clean_after_completion"]
        );
    }

    #[tokio::test]
    async fn test_root_honors_async_flags() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let options = CompensableOptions {
            async_confirm: true,
            async_cancel: false,
        };

        coordinator
            .coordinate(&scope, &CompensableCall::root(options), ok_business)
            .await
            .unwrap();

        assert!(coordinator
            .manager()
            .ops()
            .contains(&"commit:async=true".to_string()));
    }

    // --- provider: trying ---

    #[tokio::test]
    async fn test_provider_try_success_records_outcome() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(trying_context(), CompensableOptions::default());

        let value = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(
            coordinator.manager().ops(),
            vec![
                "propagation_new_begin",
                "change_status:try_success",
                "clean_after_completion"
            ]
        );
    }

    #[tokio::test]
    async fn test_provider_try_failure_records_and_reraises() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(trying_context(), CompensableOptions::default());

        let err = coordinator
            .coordinate::<u32, _, _, _>(&scope, &call, failing_business)
            .await
            .unwrap_err();

        assert!(err.business().is_some());
        assert_eq!(
            coordinator.manager().ops(),
            vec![
                "propagation_new_begin",
                "change_status:try_failed",
                "clean_after_completion"
            ]
        );
    }

    // --- provider: confirming ---

    #[tokio::test]
    async fn test_provider_confirm_commits_existing_branch() {
        let coordinator = coordinator(RecordingManager::with_branch(
            TransactionStatus::TrySuccess,
        ));
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(
            context_for(TransactionPhase::Confirming, ParticipantStatus::TrySuccess),
            CompensableOptions::default(),
        );

        let value: u32 = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        // The business method is not invoked on the decision pass; the
        // return value is the uninformative default.
        assert_eq!(value, 0);
        assert_eq!(
            coordinator.manager().ops(),
            vec![
                "propagation_exist_begin",
                "commit:async=false",
                "clean_after_completion"
            ]
        );
    }

    #[tokio::test]
    async fn test_provider_confirm_duplicate_delivery_is_noop() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(
            context_for(TransactionPhase::Confirming, ParticipantStatus::TrySuccess),
            CompensableOptions::default(),
        );

        let value: u32 = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 0);
        assert_eq!(
            coordinator.manager().ops(),
            vec!["propagation_exist_begin", "clean_after_completion"]
        );
    }

    // --- provider: cancelling ---

    #[tokio::test]
    async fn test_provider_cancel_rolls_back_settled_branch() {
        for status in [
            TransactionStatus::TrySuccess,
            TransactionStatus::TryFailed,
            TransactionStatus::Cancelling,
        ] {
            let coordinator = coordinator(RecordingManager::with_branch(status));
            let scope = TransactionScope::new();
            let call = CompensableCall::inbound(
                context_for(TransactionPhase::Cancelling, ParticipantStatus::Trying),
                CompensableOptions::default(),
            );

            let value: u32 = coordinator
                .coordinate(&scope, &call, ok_business)
                .await
                .unwrap();

            assert_eq!(value, 0);
            assert!(coordinator
                .manager()
                .ops()
                .contains(&"rollback:async=false".to_string()));
        }
    }

    #[tokio::test]
    async fn test_provider_cancel_trying_with_reported_success_rolls_back() {
        let coordinator = coordinator(RecordingManager::with_branch(TransactionStatus::Trying));
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(
            context_for(TransactionPhase::Cancelling, ParticipantStatus::TrySuccess),
            CompensableOptions::default(),
        );

        let value: u32 = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 0);
        assert!(coordinator
            .manager()
            .ops()
            .contains(&"rollback:async=false".to_string()));
    }

    #[tokio::test]
    async fn test_provider_cancel_trying_without_report_is_refused() {
        for reported in [ParticipantStatus::Trying, ParticipantStatus::TryFailed] {
            let coordinator = coordinator(RecordingManager::with_branch(TransactionStatus::Trying));
            let scope = TransactionScope::new();
            let call = CompensableCall::inbound(
                context_for(TransactionPhase::Cancelling, reported),
                CompensableOptions::default(),
            );

            let err = coordinator
                .coordinate::<u32, _, _, _>(&scope, &call, ok_business)
                .await
                .unwrap_err();

            assert!(matches!(
                err,
                InterceptError::Coordinator(CoordinatorError::IllegalTransactionStatus(_))
            ));
            let ops = coordinator.manager().ops();
            assert!(!ops.iter().any(|op| op.starts_with("rollback")));
            assert!(ops.contains(&"clean_after_completion".to_string()));
        }
    }

    #[tokio::test]
    async fn test_provider_cancel_unexpected_status_is_fatal() {
        let coordinator = coordinator(RecordingManager::with_branch(
            TransactionStatus::Confirming,
        ));
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(
            context_for(TransactionPhase::Cancelling, ParticipantStatus::TryFailed),
            CompensableOptions::default(),
        );

        let err = coordinator
            .coordinate::<u32, _, _, _>(&scope, &call, ok_business)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InterceptError::Coordinator(CoordinatorError::IllegalTransactionStatus(_))
        ));
        // Refused the same way as an unsettled branch: no rollback, and
        // cleanup still runs.
        let ops = coordinator.manager().ops();
        assert!(!ops.iter().any(|op| op.starts_with("rollback")));
        assert!(ops.contains(&"clean_after_completion".to_string()));
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_provider_cancel_duplicate_delivery_is_noop() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        let call = CompensableCall::inbound(
            context_for(TransactionPhase::Cancelling, ParticipantStatus::TrySuccess),
            CompensableOptions::default(),
        );

        let value: u32 = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 0);
        assert_eq!(
            coordinator.manager().ops(),
            vec!["propagation_exist_begin", "clean_after_completion"]
        );
    }

    // --- normal ---

    #[tokio::test]
    async fn test_normal_call_is_pure_pass_through() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();
        scope.bind(Transaction::root(TransactionXid::new()));

        let call = CompensableCall::inbound(trying_context(), CompensableOptions::default());
        let value = coordinator
            .coordinate(&scope, &call, ok_business)
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert!(coordinator.manager().ops().is_empty());
    }

    #[tokio::test]
    async fn test_normal_error_passes_through_unchanged() {
        let coordinator = coordinator(RecordingManager::new());
        let scope = TransactionScope::new();

        let call = CompensableCall {
            compensable: false,
            context: None,
            options: CompensableOptions::default(),
        };
        let err = coordinator
            .coordinate::<u32, _, _, _>(&scope, &call, failing_business)
            .await
            .unwrap_err();

        assert_eq!(err.business().expect("unchanged business error").0, "boom");
        assert!(coordinator.manager().ops().is_empty());
    }
}
