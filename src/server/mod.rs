//! Server side of the protocol: registry, URI templates, capability
//! negotiation, the handler contract and request dispatch.

pub mod capabilities;
pub mod context;
pub mod default_handler;
pub mod dispatch;
pub mod handler;
pub mod notifier;
pub mod registry;
pub mod template;

pub use capabilities::Negotiator;
pub use context::RequestContext;
pub use default_handler::DefaultHandler;
pub use dispatch::Dispatcher;
pub use handler::{new_handler, Handler, HandlerDeps, NewHandler, Operations};
pub use notifier::{ChannelNotifier, NoopNotifier, Notifier};
pub use registry::{
    PromptEntry, PromptHandlerFunc, Registry, ResourceEntry, ResourceHandlerFunc,
    ResourceTemplateEntry, ToolEntry, ToolHandlerFunc,
};
pub use template::{matches_template, TemplateError, UriTemplate};
