// SPDX-License-Identifier: Apache-2.0

mod backoff;
mod decoder;
mod error;
mod gateway;
mod history;
mod http_gateway;
mod responses;
mod retry;

pub use backoff::backoff_with_jitter;
pub use decoder::StreamingJsonDecoder;
pub use error::LlmError;
pub use gateway::LlmGateway;
pub use history::History;
pub use http_gateway::HttpLlmGateway;
pub use retry::RetryPolicy;
pub use responses::{
    AdjustUnitTest, CheckCompletion, DefineThreshold, DesignInspection, DraftSteadyState, K8sAppAssumption, ToolSpec,
    WriteUnitTest,
};
