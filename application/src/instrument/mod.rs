//! Call interception for connected capabilities.
//!
//! [`Instrumented<T>`] wraps any capability and implements every capability
//! port `T` implements, with the same signatures. Catalogued operations are
//! traced; everything else is delegated untouched.
//!
//! Per intercepted call:
//!
//! ```text
//! PRE_CALL      record_input(kind, event) -> TraceIndex
//!     │
//! IN_FLIGHT     inner.operation(..)
//!     │
//!     ├─ Ok   ─▶ POST_SUCCESS  record_output(kind, index, Ok(payload))
//!     │                        telemetry event, value returned unchanged
//!     └─ Err  ─▶ POST_ERROR    normalize to NodeError
//!                              record_output(kind, index, Err(error))
//!                              structured error returned to the caller
//! ```
//!
//! Sink failures are logged at debug level and never change the outcome.

mod capabilities;
mod model;
mod tool;

use crate::ports::chat_model::{GatewayError, RetryAdvice, classify_failed_attempt};
use crate::ports::telemetry::{NoTelemetry, TelemetryEvent, TelemetryPort};
use crate::ports::trace_sink::{TraceIndex, TraceSink};
use aicore_domain::{CallEvent, CapabilityError, CapabilityKind, NodeError, ToolError};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Rewrites the description of errors that already have the host shape.
pub type DescriptionMapper = dyn Fn(&NodeError) -> Option<String> + Send + Sync;

/// Errors returned by capability ports, seen from the interception layer.
pub trait InterceptedError: Sized {
    /// The error itself if it already has the host's structured shape.
    fn into_structured(self) -> Result<NodeError, Self>;

    /// Message kept when a plain error is wrapped.
    fn plain_message(&self) -> String;

    /// Description kept when a plain error is wrapped. Defaults to the message.
    fn plain_description(&self) -> Option<String> {
        None
    }

    /// Status code kept when a plain error is wrapped.
    fn plain_http_code(&self) -> Option<u16> {
        None
    }

    /// Retry marker kept when a plain error is wrapped.
    fn plain_retryable(&self) -> Option<bool> {
        None
    }

    /// The error handed back to the caller.
    fn from_node_error(error: NodeError) -> Self;
}

impl InterceptedError for CapabilityError {
    fn into_structured(self) -> Result<NodeError, Self> {
        match self {
            CapabilityError::Node(error) => Ok(error),
            other => Err(other),
        }
    }

    fn plain_message(&self) -> String {
        self.to_string()
    }

    fn from_node_error(error: NodeError) -> Self {
        CapabilityError::Node(error)
    }
}

impl InterceptedError for ToolError {
    fn into_structured(self) -> Result<NodeError, Self> {
        match self.to_node_error() {
            Some(error) => Ok(error),
            None => Err(self),
        }
    }

    fn plain_message(&self) -> String {
        self.message.clone()
    }

    fn plain_description(&self) -> Option<String> {
        self.details.clone()
    }

    fn from_node_error(error: NodeError) -> Self {
        ToolError::from(error)
    }
}

impl InterceptedError for GatewayError {
    fn into_structured(self) -> Result<NodeError, Self> {
        match self {
            GatewayError::Node(error) => Ok(error),
            other => Err(other),
        }
    }

    fn plain_message(&self) -> String {
        self.to_string()
    }

    fn plain_http_code(&self) -> Option<u16> {
        self.status_code()
    }

    fn plain_retryable(&self) -> Option<bool> {
        (classify_failed_attempt(self) == RetryAdvice::DoNotRetry).then_some(false)
    }

    fn from_node_error(error: NodeError) -> Self {
        GatewayError::Node(error)
    }
}

/// What one intercepted operation records.
pub(crate) struct Interception {
    pub kind: CapabilityKind,
    pub operation: &'static str,
    pub input: Value,
    pub success_event: &'static str,
    pub error_event: Option<&'static str>,
}

impl Interception {
    pub fn new(
        kind: CapabilityKind,
        operation: &'static str,
        input: Value,
        success_event: &'static str,
    ) -> Self {
        Self {
            kind,
            operation,
            input,
            success_event,
            error_event: None,
        }
    }

    pub fn on_error(mut self, event: &'static str) -> Self {
        self.error_event = Some(event);
        self
    }
}

/// Output payload and telemetry payload of a successful call.
pub(crate) struct Recorded {
    pub output: Value,
    pub telemetry: Value,
}

/// A capability whose catalogued operations are traced.
pub struct Instrumented<T> {
    inner: T,
    sink: Arc<dyn TraceSink>,
    telemetry: Arc<dyn TelemetryPort>,
    description_mapper: Option<Arc<DescriptionMapper>>,
    toolkit: Option<String>,
}

/// Wrap `capability` so its calls are recorded on `sink`.
pub fn wrap<T>(capability: T, sink: Arc<dyn TraceSink>) -> Instrumented<T> {
    Instrumented::new(capability, sink)
}

impl<T> Instrumented<T> {
    pub fn new(inner: T, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            inner,
            sink,
            telemetry: Arc::new(NoTelemetry),
            description_mapper: None,
            toolkit: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetryPort>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_description_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&NodeError) -> Option<String> + Send + Sync + 'static,
    {
        self.description_mapper = Some(Arc::new(mapper));
        self
    }

    /// Mark a wrapped tool as a member of `toolkit`; its input records then
    /// carry the tool identity.
    pub fn with_toolkit(mut self, toolkit: impl Into<String>) -> Self {
        self.toolkit = Some(toolkit.into());
        self
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Same sink and settings around another value.
    pub(crate) fn rewrap<U>(&self, inner: U) -> Instrumented<U> {
        Instrumented {
            inner,
            sink: self.sink.clone(),
            telemetry: self.telemetry.clone(),
            description_mapper: self.description_mapper.clone(),
            toolkit: self.toolkit.clone(),
        }
    }

    pub(crate) async fn intercept<R, E, Fut, F>(
        &self,
        call: Interception,
        delegate: Fut,
        record: F,
    ) -> Result<R, E>
    where
        Fut: Future<Output = Result<R, E>>,
        E: InterceptedError,
        F: FnOnce(&R) -> Recorded,
    {
        let event = CallEvent::new(call.kind, call.operation, call.input);
        let index = match self.sink.record_input(call.kind, &event) {
            Ok(index) => Some(index),
            Err(e) => {
                debug!(kind = %call.kind, operation = call.operation, error = %e, "Failed to record input");
                None
            }
        };

        match delegate.await {
            Ok(value) => {
                let recorded = record(&value);
                self.record_output(call.kind, index, Ok(recorded.output));
                self.telemetry
                    .track(TelemetryEvent::new(call.success_event, recorded.telemetry));
                Ok(value)
            }
            Err(error) => {
                let error = self.normalize(error);
                debug!(
                    kind = %call.kind,
                    operation = call.operation,
                    error = %error,
                    "Intercepted call failed"
                );
                self.record_output(call.kind, index, Err(error.clone()));
                if let Some(name) = call.error_event {
                    self.telemetry.track(TelemetryEvent::new(
                        name,
                        serde_json::json!({
                            "error": error.message,
                            "input": event.input,
                        }),
                    ));
                }
                Err(E::from_node_error(error))
            }
        }
    }

    fn record_output(
        &self,
        kind: CapabilityKind,
        index: Option<TraceIndex>,
        outcome: Result<Value, NodeError>,
    ) {
        let Some(index) = index else {
            return;
        };
        if let Err(e) = self.sink.record_output(kind, index, outcome) {
            debug!(kind = %kind, index = %index, error = %e, "Failed to record output");
        }
    }

    fn normalize<E: InterceptedError>(&self, error: E) -> NodeError {
        match error.into_structured() {
            Ok(mut error) => {
                if let Some(mapper) = &self.description_mapper
                    && let Some(description) = mapper(&error)
                {
                    error.description = Some(description);
                }
                error
            }
            Err(plain) => {
                let mut error =
                    NodeError::wrap_plain(plain.plain_message(), plain.plain_description());
                error.http_code = plain.plain_http_code();
                error.retryable = plain.plain_retryable();
                error
            }
        }
    }
}

impl<T: Clone> Clone for Instrumented<T> {
    fn clone(&self) -> Self {
        self.rewrap(self.inner.clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Instrumented<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instrumented")
            .field("inner", &self.inner)
            .field("toolkit", &self.toolkit)
            .finish_non_exhaustive()
    }
}
