//! # Mock Framework
//!
//! Utilities for testing page actors without a backend.
//!
//! [`create_mock_transport`] returns a transport and a receiver. Every request
//! the code under test sends shows up on the receiver as a [`PendingCall`];
//! the test inspects it and answers with [`PendingCall::reply`] or
//! [`PendingCall::fail`], in whatever order it likes. Holding a call back
//! while answering a later one is how request races are reproduced.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::ActorContext;
use crate::api::{ApiRequest, Method, SharedTransport, Transport};
use crate::error::ApiError;
use crate::notify::{AutoConfirm, Notification, Notifier};

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(50);

/// A request waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingCall {
    pub request: ApiRequest,
    respond_to: oneshot::Sender<Result<Value, ApiError>>,
}

impl PendingCall {
    pub fn reply(self, body: Value) {
        let _ = self.respond_to.send(Ok(body));
    }

    pub fn fail(self, error: ApiError) {
        let _ = self.respond_to.send(Err(error));
    }
}

struct MockTransport {
    sender: mpsc::UnboundedSender<PendingCall>,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PendingCall { request, respond_to })
            .map_err(|_| ApiError::Network("mock receiver dropped".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Network("mock call dropped without a reply".to_string()))?
    }
}

pub fn create_mock_transport() -> (SharedTransport, mpsc::UnboundedReceiver<PendingCall>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Arc::new(MockTransport { sender }), receiver)
}

/// The test's side of a mocked console: calls to answer and notifications to check.
pub struct MockHarness {
    pub calls: mpsc::UnboundedReceiver<PendingCall>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

/// Actor context backed by a mock transport. `confirm` is the answer every
/// confirmation prompt gets.
pub fn mock_context(confirm: bool) -> (ActorContext, MockHarness) {
    let (transport, calls) = create_mock_transport();
    let (notifier, notifications) = Notifier::channel();
    let ctx = ActorContext {
        transport,
        notifier,
        confirm: Arc::new(AutoConfirm(confirm)),
        buffer_size: 16,
        page_limit: 10,
    };
    (ctx, MockHarness { calls, notifications })
}

/// Next request, whatever it is.
pub async fn expect_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>) -> PendingCall {
    match tokio::time::timeout(WAIT, calls.recv()).await {
        Ok(Some(call)) => call,
        Ok(None) => panic!("Transport dropped while a request was expected"),
        Err(_) => panic!("Timed out waiting for a request"),
    }
}

/// Next request, which must be a GET to `path`.
pub async fn expect_get(calls: &mut mpsc::UnboundedReceiver<PendingCall>, path: &str) -> PendingCall {
    let call = expect_call(calls).await;
    assert_eq!(call.request.method, Method::Get, "unexpected request: {:?}", call.request);
    assert_eq!(call.request.path, path, "unexpected request: {:?}", call.request);
    call
}

/// True when no request arrives within a short quiet period.
pub async fn no_pending_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>) -> bool {
    !matches!(tokio::time::timeout(QUIET, calls.recv()).await, Ok(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_round_trip() {
        let (transport, mut calls) = create_mock_transport();

        let task = tokio::spawn(async move { transport.send(ApiRequest::get("admin/zones")).await });

        let call = expect_get(&mut calls, "admin/zones").await;
        call.reply(json!({ "data": [] }));

        assert_eq!(task.await.unwrap(), Ok(json!({ "data": [] })));
    }

    #[tokio::test]
    async fn test_dropped_call_is_network_error() {
        let (transport, mut calls) = create_mock_transport();
        let task = tokio::spawn(async move { transport.send(ApiRequest::get("admin/zones")).await });

        drop(expect_call(&mut calls).await);
        assert!(matches!(task.await.unwrap(), Err(ApiError::Network(_))));
    }
}
