// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template render failed: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("template variables failed to serialize: {0}")]
    Vars(#[from] serde_json::Error),
}
