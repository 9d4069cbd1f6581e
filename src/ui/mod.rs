//! UI module for consistent CLI output
//!
//! Uses `cliclack` for styled logs and spinners, with automatic fallback to
//! plain output in CI/non-interactive environments. Quiet contexts (used for
//! `--json`) print nothing but the primary result.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{
    command_outcome, key_value, remark, section, step_error_detail, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
