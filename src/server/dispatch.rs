//! Request dispatch
//!
//! Routes a method name plus raw JSON params to a [`Handler`], decoding the
//! params into typed requests and encoding typed results back to JSON.
//! Framing and the JSON-RPC envelope stay with the transport.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    error::{McpError, McpResult},
    logging,
    schema::{
        Notification, METHOD_INITIALIZE, METHOD_PING, METHOD_PROMPTS_GET, METHOD_PROMPTS_LIST,
        METHOD_RESOURCES_LIST, METHOD_RESOURCES_READ, METHOD_RESOURCES_TEMPLATES_LIST,
        METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, NOTIFICATION_CANCELLED,
    },
    syncmap::SyncMap,
};

use super::{context::RequestContext, handler::Handler};

/// Cancellation handle of a running request.
#[derive(Clone)]
struct InFlight {
    seq: u64,
    token: CancellationToken,
}

/// Removes a request's in-flight entry when the request finishes or its
/// future is dropped.
struct InFlightGuard<'a> {
    in_flight: &'a SyncMap<String, InFlight>,
    id: String,
    seq: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let seq = self.seq;
        self.in_flight.delete_if(self.id.as_str(), |entry| entry.seq == seq);
    }
}

/// Dispatches requests for one session to its handler.
pub struct Dispatcher {
    handler: Arc<dyn Handler>,
    in_flight: SyncMap<String, InFlight>,
    next_seq: AtomicU64,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            in_flight: SyncMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Number of requests currently running that can be cancelled by id.
    pub fn in_flight(&self) -> usize {
        self.in_flight.size()
    }

    /// Handle one request and return its JSON result.
    ///
    /// Methods the handler does not implement fail with `UnknownMethod`
    /// without reaching the handler. Handler errors are returned unchanged.
    ///
    /// While a request id is in flight, a second request reusing it is
    /// served but cannot be cancelled; the first one keeps the id.
    pub async fn dispatch(
        &self,
        ctx: RequestContext,
        method: &str,
        params: Option<Value>,
    ) -> McpResult<Value> {
        let span = logging::request_span(
            method,
            ctx.request_id.as_deref(),
            ctx.session_id.as_deref(),
        );
        let _guard = self.track(&ctx);

        async move {
            let start = Instant::now();
            logging::log_handler_start(method);
            let result = self.route(&ctx, method, params).await;
            match &result {
                Ok(_) => logging::log_handler_success(method, start.elapsed()),
                Err(McpError::UnknownMethod(_)) => {}
                Err(e) => logging::log_handler_error(method, &e.to_string(), start.elapsed()),
            }
            result
        }
        .instrument(span)
        .await
    }

    fn track(&self, ctx: &RequestContext) -> Option<InFlightGuard<'_>> {
        let id = ctx.request_id.clone()?;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = InFlight {
            seq,
            token: ctx.cancellation.clone(),
        };
        if !self.in_flight.put_if_absent(id.clone(), entry) {
            logging::log_duplicate_request_id(&id);
            return None;
        }
        Some(InFlightGuard {
            in_flight: &self.in_flight,
            id,
            seq,
        })
    }

    /// Deliver a client notification.
    ///
    /// `notifications/cancelled` also cancels the matching in-flight request.
    pub async fn notification(&self, ctx: RequestContext, notification: Notification) {
        logging::log_notification_received(&notification.method);
        if notification.method == NOTIFICATION_CANCELLED {
            if let Some(id) = notification
                .params
                .as_ref()
                .and_then(|p| p.get("requestId"))
                .and_then(request_id_string)
            {
                if let Some(entry) = self.in_flight.get(&id) {
                    entry.token.cancel();
                }
            }
        }
        self.handler.on_notification(&ctx, notification).await;
    }

    async fn route(
        &self,
        ctx: &RequestContext,
        method: &str,
        params: Option<Value>,
    ) -> McpResult<Value> {
        if !self.handler.implements(method) {
            logging::log_unknown_method(method);
            return Err(McpError::UnknownMethod(method.to_string()));
        }

        let handler = &self.handler;
        match method {
            METHOD_INITIALIZE => encode(handler.initialize(ctx, decode(params)?).await?),
            METHOD_PING => {
                handler.ping(ctx).await?;
                Ok(Value::Object(Default::default()))
            }
            METHOD_RESOURCES_LIST => {
                encode(handler.list_resources(ctx, decode_or_default(params)?).await?)
            }
            METHOD_RESOURCES_TEMPLATES_LIST => encode(
                handler
                    .list_resource_templates(ctx, decode_or_default(params)?)
                    .await?,
            ),
            METHOD_RESOURCES_READ => encode(handler.read_resource(ctx, decode(params)?).await?),
            METHOD_TOOLS_LIST => {
                encode(handler.list_tools(ctx, decode_or_default(params)?).await?)
            }
            METHOD_TOOLS_CALL => encode(handler.call_tool(ctx, decode(params)?).await?),
            METHOD_PROMPTS_LIST => {
                encode(handler.list_prompts(ctx, decode_or_default(params)?).await?)
            }
            METHOD_PROMPTS_GET => encode(handler.get_prompt(ctx, decode(params)?).await?),
            other => {
                logging::log_unknown_method(other);
                Err(McpError::UnknownMethod(other.to_string()))
            }
        }
    }
}

/// Decode required params.
fn decode<T: DeserializeOwned>(params: Option<Value>) -> McpResult<T> {
    let params = params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

/// Decode optional params; absent or `null` means the type's default.
fn decode_or_default<T: DeserializeOwned + Default>(params: Option<Value>) -> McpResult<T> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(params) => {
            serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
        }
    }
}

fn encode<T: Serialize>(result: T) -> McpResult<Value> {
    Ok(serde_json::to_value(result)?)
}

fn request_id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
