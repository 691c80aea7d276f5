//! Discover Tools use case.
//!
//! Turns the values connected to a node's tool input into the [`ToolSet`]
//! handed to the orchestrator.
//!
//! # Discovery Process
//!
//! 1. Toolkits are flattened, one level deep
//! 2. Each candidate is checked for a non-empty name without surrounding
//!    whitespace
//! 3. With `enforce_unique_names`, the first repeated name fails the whole
//!    discovery
//! 4. Candidates without an invocation member are skipped
//! 5. Structured tools are converted to string-input tools (optional)
//! 6. Descriptions are brace-escaped (optional)
//!
//! Skipped candidates are logged, never fatal.

use crate::instrument::Instrumented;
use crate::ports::invocable::Invocable;
use crate::ports::telemetry::{NoTelemetry, TelemetryEvent, TelemetryPort};
use crate::ports::trace_sink::TraceSink;
use crate::tools::{ConnectedTool, DescribedTool, ToolSet};
use aicore_domain::escape_curly_braces;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that fail a whole discovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error(
        "You have multiple tools with the same name: '{name}', please rename them to avoid conflicts"
    )]
    DuplicateToolName { name: String },
}

/// Discovery switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryOptions {
    pub enforce_unique_names: bool,
    /// Convert structured tools with `as_dynamic_tool`.
    pub convert_native_tools: bool,
    pub escape_curly_braces: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            enforce_unique_names: true,
            convert_native_tools: true,
            escape_curly_braces: false,
        }
    }
}

/// A tool waiting for validation, with the toolkit it came from.
struct Candidate {
    tool: ConnectedTool,
    toolkit: Option<String>,
}

/// Use case for discovering connected tools.
pub struct DiscoverToolsUseCase {
    telemetry: Arc<dyn TelemetryPort>,
    trace_sink: Option<Arc<dyn TraceSink>>,
}

impl Default for DiscoverToolsUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoverToolsUseCase {
    pub fn new() -> Self {
        Self {
            telemetry: Arc::new(NoTelemetry),
            trace_sink: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetryPort>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Wrap every discovered tool so its calls are traced on `sink`.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace_sink = Some(sink);
        self
    }

    pub fn execute(
        &self,
        sources: Vec<ConnectedTool>,
        options: &DiscoveryOptions,
    ) -> Result<ToolSet, DiscoveryError> {
        match self.discover(sources, options) {
            Ok(tools) => {
                info!(count = tools.len(), "Discovered {} tools", tools.len());
                self.telemetry.track(TelemetryEvent::new(
                    "ai-tools-discovered",
                    serde_json::json!({
                        "count": tools.len(),
                        "names": tools.names(),
                    }),
                ));
                Ok(tools)
            }
            Err(e) => {
                warn!(error = %e, "Tool discovery failed");
                self.telemetry.track(TelemetryEvent::new(
                    "ai-tools-discovery-failed",
                    serde_json::json!({"error": e.to_string()}),
                ));
                Err(e)
            }
        }
    }

    fn discover(
        &self,
        sources: Vec<ConnectedTool>,
        options: &DiscoveryOptions,
    ) -> Result<ToolSet, DiscoveryError> {
        let mut seen = HashSet::new();
        let mut tools = ToolSet::new();

        for Candidate { tool, toolkit } in flatten(sources) {
            let Some(name) = candidate_name(&tool) else {
                warn!(shape = tool.shape(), "Skipping connected value without a tool name");
                continue;
            };

            if options.enforce_unique_names && !seen.insert(name.clone()) {
                return Err(DiscoveryError::DuplicateToolName { name });
            }

            let Some(invocable) = into_invocable(tool, options.convert_native_tools) else {
                warn!(tool = %name, "Skipping tool without an invocation member");
                continue;
            };

            tools.push(self.finish(invocable, toolkit, options));
            debug!(tool = %name, "Registered tool");
        }

        Ok(tools)
    }

    fn finish(
        &self,
        tool: Arc<dyn Invocable>,
        toolkit: Option<String>,
        options: &DiscoveryOptions,
    ) -> Arc<dyn Invocable> {
        let mut tool = tool;
        if options.escape_curly_braces {
            let escaped = escape_curly_braces(tool.description());
            if escaped != tool.description() {
                tool = Arc::new(DescribedTool::new(tool, escaped));
            }
        }

        let Some(sink) = &self.trace_sink else {
            return tool;
        };
        let mut wrapped = Instrumented::new(tool, sink.clone()).with_telemetry(self.telemetry.clone());
        if let Some(toolkit) = toolkit {
            wrapped = wrapped.with_toolkit(toolkit);
        }
        Arc::new(wrapped)
    }
}

/// Expand toolkits one level; nested toolkits are not tools and are dropped.
fn flatten(sources: Vec<ConnectedTool>) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for source in sources {
        match source {
            ConnectedTool::Toolkit(kit) => {
                for member in kit.tools {
                    if let ConnectedTool::Toolkit(nested) = &member {
                        warn!(
                            toolkit = %kit.name,
                            nested = %nested.name,
                            "Skipping toolkit nested in a toolkit"
                        );
                        continue;
                    }
                    candidates.push(Candidate {
                        tool: member,
                        toolkit: Some(kit.name.clone()),
                    });
                }
            }
            other => candidates.push(Candidate {
                tool: other,
                toolkit: None,
            }),
        }
    }
    candidates
}

fn candidate_name(tool: &ConnectedTool) -> Option<String> {
    let name = match tool {
        ConnectedTool::Invocable(t) => t.name(),
        ConnectedTool::Structured(t) => t.name(),
        ConnectedTool::Legacy(t) => t.tool_name()?,
        ConnectedTool::Toolkit(_) | ConnectedTool::Other(_) => return None,
    };
    if name.trim().is_empty() {
        return None;
    }
    // Lookups match the name exactly, so " calc" could never be called as "calc".
    if name.trim() != name {
        warn!(tool = %name, "Tool name has surrounding whitespace");
        return None;
    }
    Some(name.to_string())
}

fn into_invocable(tool: ConnectedTool, convert_native: bool) -> Option<Arc<dyn Invocable>> {
    match tool {
        ConnectedTool::Invocable(t) => Some(t),
        ConnectedTool::Structured(t) if convert_native => Some(Arc::new(t.as_dynamic_tool())),
        ConnectedTool::Structured(t) => Some(Arc::new(t)),
        ConnectedTool::Legacy(t) => t
            .into_invocable()
            .map(|adapter| Arc::new(adapter) as Arc<dyn Invocable>),
        ConnectedTool::Toolkit(_) | ConnectedTool::Other(_) => None,
    }
}
